use log::debug;

use crate::models::{CountryCodes, FieldType, FILLER};

/// Letters an OCR model confuses with digits, for fields that can only hold digits.
pub fn letter_to_digit(c: char) -> char {
    match c {
        'O' | 'Q' | 'U' | 'D' => '0',
        'I' => '1',
        'Z' => '2',
        'B' => '3',
        'A' => '4',
        'S' => '5',
        _ => c,
    }
}

/// Digits an OCR model confuses with letters, for fields that can only hold letters.
pub fn digit_to_letter(c: char) -> char {
    match c {
        '0' => 'O',
        '1' => 'I',
        '2' => 'Z',
        '3' => 'B',
        '4' => 'A',
        '8' => 'B',
        _ => c,
    }
}

pub fn replace_letters(text: &str) -> String {
    text.chars().map(letter_to_digit).collect()
}

pub fn replace_digits(text: &str) -> String {
    text.chars().map(digit_to_letter).collect()
}

/// FieldCorrection applies the letter/digit fixes that are safe for a
/// given field, based on which alphabet the field is restricted to.
pub struct FieldCorrection<'a> {
    matcher: NationalityMatcher<'a>,
}

impl<'a> FieldCorrection<'a> {
    pub fn new(countries: &'a CountryCodes) -> Self {
        FieldCorrection {
            matcher: NationalityMatcher::new(countries),
        }
    }

    /// Corrected value of a raw field, or `None` if the nationality could
    /// not be matched to any known country.
    pub fn correct(&self, raw: &str, field_type: FieldType) -> Option<String> {
        let corrected = match field_type {
            FieldType::Birthdate | FieldType::ExpiryDate | FieldType::Hash => replace_letters(raw),
            FieldType::Names | FieldType::CountryCode => replace_digits(raw),
            // "FM" is not a document type; the P is regularly read as F.
            FieldType::DocumentType => replace_digits(&raw.replace("FM", "PM")),
            FieldType::Sex => raw.replace('P', "F").replace('7', "F"),
            FieldType::Nationality => replace_digits(&self.matcher.resolve(raw)?),
            FieldType::DocumentNumber | FieldType::PersonalNumber | FieldType::OptionalData => {
                raw.to_string()
            }
        };
        if corrected != raw {
            debug!("Corrected {:?}: {} -> {}", field_type, raw, corrected);
        }
        Some(corrected)
    }
}

/// Resolves a possibly misread three-letter code against the country list.
pub struct NationalityMatcher<'a> {
    countries: &'a CountryCodes,
}

impl<'a> NationalityMatcher<'a> {
    pub fn new(countries: &'a CountryCodes) -> Self {
        NationalityMatcher { countries }
    }

    /// Tries an exact match, then unique partial matches on the first two,
    /// last two, and outer two characters, in that order. Fillers only
    /// ever match exactly.
    pub fn resolve(&self, code: &str) -> Option<String> {
        if code.chars().count() != 3 {
            return None;
        }
        if self.countries.contains(code) {
            return Some(code.to_string());
        }

        let corrected: Vec<char> = replace_digits(code).chars().collect();
        let keys: [[usize; 2]; 3] = [[0, 1], [1, 2], [0, 2]];
        for positions in keys {
            if let Some(found) = self.unique_match(&corrected, positions) {
                debug!("Nationality {} matched to {} on positions {:?}", code, found, positions);
                return Some(found.to_string());
            }
        }

        debug!("Nationality {} matches no known country", code);
        None
    }

    fn unique_match(&self, code: &[char], positions: [usize; 2]) -> Option<&'a str> {
        if positions.iter().any(|&p| code[p] == FILLER) {
            return None;
        }
        let countries: &'a CountryCodes = self.countries;
        let mut candidates = countries.iter().filter(|candidate| {
            let candidate: Vec<char> = candidate.chars().collect();
            candidate.len() == 3
                && !candidate.contains(&FILLER)
                && positions.iter().all(|&p| candidate[p] == code[p])
        });
        match (candidates.next(), candidates.next()) {
            (Some(found), None) => Some(found),
            _ => None,
        }
    }
}
