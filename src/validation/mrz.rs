use log::debug;

use crate::models::{FieldType, FieldValue, MrzField, MrzFormat, MrzResult, Rejection};
use crate::validation::checksum;

pub struct MrzValidator;

impl MrzValidator {
    /// Cross-check extracted fields and build the final record.
    ///
    /// Any inconsistency rejects the whole record; no partially valid
    /// result is returned.
    pub fn validate<S: AsRef<str>>(
        lines: &[S],
        format: MrzFormat,
        fields: &[MrzField],
    ) -> Result<MrzResult, Rejection> {
        let sex = Self::field(fields, FieldType::Sex)?
            .sex()
            .ok_or(Rejection::UnreadableSex)?;

        let nationality_field = Self::field(fields, FieldType::Nationality)?;
        let nationality = nationality_field
            .text()
            .ok_or(Rejection::UnresolvedNationality)?
            .to_string();

        let birthdate_field = Self::field(fields, FieldType::Birthdate)?;
        let birthdate = birthdate_field.date().ok_or(Rejection::MalformedBirthdate)?;
        let expiry_field = Self::field(fields, FieldType::ExpiryDate)?;
        let expiry_date = expiry_field.date().ok_or(Rejection::MalformedExpiryDate)?;

        let (surname, given_names) = match &Self::field(fields, FieldType::Names)?.value {
            Some(FieldValue::Names {
                surname,
                given_names,
            }) => (surname.clone(), given_names.clone()),
            _ => (String::new(), String::new()),
        };
        for (name, value) in [
            ("surname", &surname),
            ("given names", &given_names),
            ("nationality", &nationality),
        ] {
            if value.chars().any(|c| c.is_ascii_digit()) {
                return Err(Rejection::DigitInAlphabeticField(name));
            }
        }

        let document_number_field = Self::field(fields, FieldType::DocumentNumber)?;
        if !Self::document_number_matches_text(lines, format, document_number_field) {
            return Err(Rejection::DocumentNumberChecksum);
        }

        let is_composite_valid = Self::composite_valid(format, fields);
        let all_check_digits_valid =
            is_composite_valid && fields.iter().all(|f| f.is_valid != Some(false));

        let personal_number_field = fields
            .iter()
            .find(|f| f.field_type == FieldType::PersonalNumber);
        let personal_number2 = fields
            .iter()
            .find(|f| f.field_type == FieldType::OptionalData)
            .and_then(|f| f.text())
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        Ok(MrzResult {
            document_format: format,
            document_type: Self::text(fields, FieldType::DocumentType),
            issuing_country: Self::text(fields, FieldType::CountryCode),
            surname,
            given_names,
            document_number: Self::text(fields, FieldType::DocumentNumber),
            nationality,
            birthdate: Some(birthdate),
            sex: Some(sex),
            expiry_date: Some(expiry_date),
            personal_number: Self::text(fields, FieldType::PersonalNumber),
            personal_number2,
            is_document_number_valid: document_number_field.is_valid == Some(true),
            is_birthdate_valid: birthdate_field.is_valid == Some(true),
            is_expiry_date_valid: expiry_field.is_valid == Some(true),
            is_personal_number_valid: personal_number_field.and_then(|f| f.is_valid),
            is_composite_valid,
            all_check_digits_valid,
        })
    }

    fn field(fields: &[MrzField], field_type: FieldType) -> Result<&MrzField, Rejection> {
        fields
            .iter()
            .find(|f| f.field_type == field_type)
            .ok_or(Rejection::InvalidFormat)
    }

    fn text(fields: &[MrzField], field_type: FieldType) -> String {
        fields
            .iter()
            .find(|f| f.field_type == field_type)
            .and_then(|f| f.text())
            .unwrap_or_default()
            .to_string()
    }

    /// Recompute the document number check digit and compare it with the
    /// digit at the format's check digit offset in the assembled text.
    fn document_number_matches_text<S: AsRef<str>>(
        lines: &[S],
        format: MrzFormat,
        document_number: &MrzField,
    ) -> bool {
        let text = lines
            .iter()
            .map(|line| line.as_ref())
            .collect::<Vec<_>>()
            .join("\n");
        let expected = format
            .document_number_check_offset()
            .and_then(|offset| text.chars().nth(offset))
            .and_then(|c| c.to_digit(10));
        let actual = checksum::compute_check_digit(&document_number.corrected_value);

        match (expected, actual) {
            (Some(expected), Some(actual)) if expected == actual => true,
            _ => {
                debug!(
                    "Document number {} check digit {:?} does not match {:?} in text",
                    document_number.corrected_value, actual, expected
                );
                false
            }
        }
    }

    /// Composite check over the composite members and their check digits,
    /// in layout order.
    fn composite_valid(format: MrzFormat, fields: &[MrzField]) -> bool {
        let Some(hash) = fields
            .iter()
            .find(|f| f.field_type == FieldType::Hash)
            .and_then(|f| f.corrected_value.chars().next())
        else {
            return false;
        };

        let composite: String = format
            .fields()
            .iter()
            .zip(fields)
            .filter(|(descriptor, _)| descriptor.composite)
            .flat_map(|(_, f)| f.corrected_value.chars().chain(f.check_digit))
            .collect();
        checksum::is_value_valid(&composite, hash)
    }
}
