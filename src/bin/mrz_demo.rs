use luppa_mrz::models::{CountryCodes, GlyphLabels};
use luppa_mrz::{EngineConfig, MrzError, PassportValidator};

// ICAO 9303 specimen documents, issued by the fictional state of Utopia.
const SPECIMENS: [(&str, &[&str]); 3] = [
    (
        "TD3 passport",
        &[
            "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<",
            "L898902C36UTO7408122F1204159ZE184226B<<<<<10",
        ],
    ),
    (
        "TD2 identity card",
        &[
            "I<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<",
            "D231458907UTO7408122F1204159<<<<<<<6",
        ],
    ),
    (
        "TD1 identity card",
        &[
            "I<UTOD231458907<<<<<<<<<<<<<<<",
            "7408122F1204159UTO<<<<<<<<<<<6",
            "ERIKSSON<<ANNA<MARIA<<<<<<<<<<",
        ],
    ),
];

fn main() -> Result<(), MrzError> {
    env_logger::init();

    println!("MRZ Demo");
    println!("--------");

    // Utopia is not a real country, so it has to be added to the list.
    let countries = CountryCodes::from_codes(CountryCodes::icao().iter().chain(["UTO"]))?;
    let validator = PassportValidator::with_reference_data(
        GlyphLabels::standard(),
        countries,
        EngineConfig::default(),
    )?;

    for (name, lines) in SPECIMENS {
        println!("\nParsing {}...", name);
        for line in lines {
            println!("  {}", line);
        }

        match validator.parse_from_lines(lines) {
            Some(result) => {
                println!("  Holder: {}, {}", result.surname, result.given_names);
                println!("  Document Number: {}", result.document_number);
                println!(
                    "  Check digits: {}",
                    if result.all_check_digits_valid {
                        "VALID"
                    } else {
                        "INVALID"
                    }
                );
            }
            None => println!("  No MRZ found"),
        }
    }

    // A misread check digit rejects the whole frame.
    let misread = ["P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<", "L898902C37UTO7408122F1204159ZE184226B<<<<<10"];
    println!("\nParsing TD3 passport with a misread check digit...");
    match validator.parse_from_lines(&misread) {
        Some(_) => println!("  Unexpectedly accepted"),
        None => println!("  Rejected, waiting for the next frame"),
    }

    Ok(())
}
