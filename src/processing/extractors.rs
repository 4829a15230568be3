use chrono::{Datelike, NaiveDate};

use crate::models::{
    CountryCodes, FieldDescriptor, FieldType, FieldValue, MrzField, MrzFormat, Rejection, Sex,
    FILLER,
};
use crate::processing::field_correction::{letter_to_digit, FieldCorrection};
use crate::validation::checksum;

/// Slices MRZ lines into fields, corrects them and parses their values.
pub struct FieldFormatter<'a> {
    correction: Option<FieldCorrection<'a>>,
    /// Two-digit year used to place birthdates in the right century.
    current_year: u32,
}

impl<'a> FieldFormatter<'a> {
    pub fn new(countries: &'a CountryCodes, ocr_correction: bool, today: NaiveDate) -> Self {
        FieldFormatter {
            correction: ocr_correction.then(|| FieldCorrection::new(countries)),
            current_year: today.year().rem_euclid(100) as u32,
        }
    }

    /// Extract every field of `format`, in layout order.
    pub fn extract<S: AsRef<str>>(
        &self,
        lines: &[S],
        format: MrzFormat,
    ) -> Result<Vec<MrzField>, Rejection> {
        format
            .fields()
            .iter()
            .map(|descriptor| self.field(lines, descriptor))
            .collect()
    }

    pub fn field<S: AsRef<str>>(
        &self,
        lines: &[S],
        descriptor: &FieldDescriptor,
    ) -> Result<MrzField, Rejection> {
        let out_of_range = || Rejection::FieldOutOfRange(format!("{:?}", descriptor.field_type));
        let line = lines.get(descriptor.line).ok_or_else(out_of_range)?.as_ref();
        let value_end = descriptor.start + descriptor.length;

        let raw_value = line.get(descriptor.start..value_end).ok_or_else(out_of_range)?;
        let check_digit = if descriptor.check_digit {
            let c = line
                .get(value_end..value_end + 1)
                .and_then(|s| s.chars().next())
                .ok_or_else(out_of_range)?;
            // Check digits are numeric, so any letter there is a misread.
            Some(letter_to_digit(c))
        } else {
            None
        };

        let corrected = match &self.correction {
            Some(correction) => correction.correct(raw_value, descriptor.field_type),
            None => Some(raw_value.to_string()),
        };

        let field = match corrected {
            Some(corrected_value) => MrzField {
                field_type: descriptor.field_type,
                raw_value: raw_value.to_string(),
                is_valid: check_digit.map(|cd| checksum::is_value_valid(&corrected_value, cd)),
                value: self.format(&corrected_value, descriptor.field_type),
                corrected_value,
                check_digit,
            },
            // Unresolved nationality: keep the field but without a value.
            None => MrzField {
                field_type: descriptor.field_type,
                raw_value: raw_value.to_string(),
                corrected_value: raw_value.to_string(),
                check_digit,
                is_valid: check_digit.map(|cd| checksum::is_value_valid(raw_value, cd)),
                value: None,
            },
        };
        Ok(field)
    }

    fn format(&self, value: &str, field_type: FieldType) -> Option<FieldValue> {
        match field_type {
            FieldType::Names => Some(Self::names(value)),
            FieldType::Birthdate => self.birthdate(value).map(FieldValue::Date),
            FieldType::ExpiryDate => Self::expiry_date(value).map(FieldValue::Date),
            FieldType::Sex => Self::sex(value).map(FieldValue::Sex),
            FieldType::DocumentType
            | FieldType::CountryCode
            | FieldType::DocumentNumber
            | FieldType::Nationality
            | FieldType::PersonalNumber
            | FieldType::OptionalData
            | FieldType::Hash => Some(FieldValue::Text(Self::text(value))),
        }
    }

    // Surname and given names are separated by a double filler.
    fn names(value: &str) -> FieldValue {
        let identifiers: Vec<String> = value
            .trim_matches(FILLER)
            .split("<<")
            .map(|part| part.replace(FILLER, " "))
            .collect();
        FieldValue::Names {
            surname: identifiers.first().cloned().unwrap_or_default(),
            given_names: identifiers.get(1).cloned().unwrap_or_default(),
        }
    }

    fn sex(value: &str) -> Option<Sex> {
        match value {
            "M" => Some(Sex::Male),
            "F" => Some(Sex::Female),
            "<" => Some(Sex::Unspecified),
            _ => None,
        }
    }

    // A birthdate can't lie in the future.
    fn birthdate(&self, value: &str) -> Option<NaiveDate> {
        let (year, month, day) = Self::date_parts(value)?;
        let century = if year > self.current_year { 1900 } else { 2000 };
        NaiveDate::from_ymd_opt((century + year) as i32, month, day)
    }

    fn expiry_date(value: &str) -> Option<NaiveDate> {
        let (year, month, day) = Self::date_parts(value)?;
        let century = if year >= 30 { 1900 } else { 2000 };
        NaiveDate::from_ymd_opt((century + year) as i32, month, day)
    }

    /// Split a `YYMMDD` string made of digits only.
    fn date_parts(value: &str) -> Option<(u32, u32, u32)> {
        if value.len() != 6 || !value.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let year = value[0..2].parse().ok()?;
        let month = value[2..4].parse().ok()?;
        let day = value[4..6].parse().ok()?;
        Some((year, month, day))
    }

    fn text(value: &str) -> String {
        value.trim_matches(FILLER).replace(FILLER, " ")
    }
}
