// MRZ reader command line tool

use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use log::info;

use luppa_mrz::{
    models::{CountryCodes, Detection, GlyphLabels, MrzResult},
    EngineConfig, MrzError, PassportValidator,
};

/// Parse machine readable zones from OCR output
#[derive(Parser)]
#[command(name = "luppa-mrz")]
#[command(about = "Assemble, correct and validate passport MRZ text")]
struct Args {
    /// Label file, one class label per line
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Country code file, one three-letter code per line
    #[arg(long)]
    countries: Option<PathBuf>,

    /// JSON engine configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the result as JSON instead of a report
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    input: Input,
}

#[derive(Subcommand)]
enum Input {
    /// Parse MRZ lines given as arguments
    Lines {
        #[arg(required = true)]
        lines: Vec<String>,
    },
    /// Parse a JSON array of glyph detections
    Detections { file: PathBuf },
}

// Function to print a detailed MRZ report
fn print_detailed_report(result: &MrzResult) {
    let check = |valid: bool| if valid { "PASSED" } else { "FAILED" };

    println!("\n===============================================");
    println!("             MRZ DETAILED REPORT");
    println!("===============================================\n");

    println!("DOCUMENT INFORMATION:");
    println!("  Format: {:?}", result.document_format);
    println!("  Document Type: {}", result.document_type);
    println!("  Issuing Country: {}", result.issuing_country);
    println!("  Document Number: {}", result.document_number);
    println!("  Surname: {}", result.surname);
    println!("  Given Names: {}", result.given_names);
    println!("  Nationality: {}", result.nationality);
    if let Some(birthdate) = result.birthdate {
        println!("  Date of Birth: {}", birthdate);
    }
    if let Some(sex) = result.sex {
        println!("  Sex: {}", sex);
    }
    if let Some(expiry) = result.expiry_date {
        println!("  Date of Expiry: {}", expiry);
    }
    println!("  Personal Number: {}", result.personal_number);
    if let Some(optional) = &result.personal_number2 {
        println!("  Optional Data: {}", optional);
    }

    println!("\nCHECK DIGITS:");
    println!("  1. Document Number: {}", check(result.is_document_number_valid));
    println!("  2. Date of Birth: {}", check(result.is_birthdate_valid));
    println!("  3. Date of Expiry: {}", check(result.is_expiry_date_valid));
    match result.is_personal_number_valid {
        Some(valid) => println!("  4. Personal Number: {}", check(valid)),
        None => println!("  4. Personal Number: NOT PRESENT"),
    }
    println!("  5. Composite: {}", check(result.is_composite_valid));

    println!(
        "\nMRZ validation result: {}",
        if result.all_check_digits_valid {
            "VALID"
        } else {
            "INVALID"
        }
    );
}

fn build_validator(args: &Args) -> Result<PassportValidator, MrzError> {
    let labels = match &args.labels {
        Some(path) => GlyphLabels::from_file(path)?,
        None => GlyphLabels::standard(),
    };
    let countries = match &args.countries {
        Some(path) => CountryCodes::from_file(path)?,
        None => CountryCodes::icao(),
    };
    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    PassportValidator::with_reference_data(labels, countries, config)
}

fn main() -> Result<(), MrzError> {
    env_logger::init();
    let args = Args::parse();

    let validator = build_validator(&args)?;
    let today = Local::now().date_naive();

    let outcome = match &args.input {
        Input::Lines { lines } => validator.scan_lines(lines.as_slice(), today),
        Input::Detections { file } => {
            let content = std::fs::read_to_string(file)?;
            let detections: Vec<Detection> = serde_json::from_str(&content)?;
            info!("Loaded {} detections from {}", detections.len(), file.display());
            validator.scan_detections(&detections, today)
        }
    };

    match outcome {
        Ok(result) if args.json => println!("{}", serde_json::to_string_pretty(&result)?),
        Ok(result) => print_detailed_report(&result),
        Err(rejection) => {
            eprintln!("No MRZ found: {} (stopped after {:?})", rejection, rejection.stage());
            std::process::exit(1);
        }
    }

    Ok(())
}
