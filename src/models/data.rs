use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::layouts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MrzFormat {
    TD1,     // ID Card, 3 lines of 30
    TD2,     // ID Card, 2 lines of 36
    TD3,     // Passport, 2 lines of 44
    Invalid,
}

impl MrzFormat {
    pub fn mrz_lines(&self) -> usize {
        match self {
            MrzFormat::TD1 => 3,
            MrzFormat::TD2 => 2,
            MrzFormat::TD3 => 2,
            MrzFormat::Invalid => 0,
        }
    }

    pub fn mrz_chars_per_line(&self) -> usize {
        match self {
            MrzFormat::TD1 => 30,
            MrzFormat::TD2 => 36,
            MrzFormat::TD3 => 44,
            MrzFormat::Invalid => 0,
        }
    }

    /// Field layout for this format. Empty for `Invalid`.
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        match self {
            MrzFormat::TD1 => layouts::TD1_FIELDS,
            MrzFormat::TD2 => layouts::TD2_FIELDS,
            MrzFormat::TD3 => layouts::TD3_FIELDS,
            MrzFormat::Invalid => &[],
        }
    }

    /// Offset of the document number check digit inside the assembled
    /// text, i.e. the lines joined with `\n`.
    /// 54 for TD3.
    pub fn document_number_check_offset(&self) -> Option<usize> {
        let descriptor = self
            .fields()
            .iter()
            .find(|d| d.field_type == FieldType::DocumentNumber && d.check_digit)?;
        let line_stride = self.mrz_chars_per_line() + 1;
        Some(descriptor.line * line_stride + descriptor.start + descriptor.length)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    DocumentType,
    CountryCode,
    Names,
    DocumentNumber,
    Nationality,
    Birthdate,
    Sex,
    ExpiryDate,
    PersonalNumber,
    OptionalData,
    Hash,
}

/// Where a field lives inside the MRZ of one format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub field_type: FieldType,
    pub line: usize,
    pub start: usize,
    pub length: usize,
    /// A single check digit character directly follows the field.
    pub check_digit: bool,
    /// The field (and its check digit) is part of the composite check input.
    pub composite: bool,
}

impl FieldDescriptor {
    pub const fn new(field_type: FieldType, line: usize, start: usize, length: usize) -> Self {
        FieldDescriptor {
            field_type,
            line,
            start,
            length,
            check_digit: false,
            composite: false,
        }
    }

    pub const fn checked(self) -> Self {
        FieldDescriptor {
            check_digit: true,
            ..self
        }
    }

    pub const fn composite(self) -> Self {
        FieldDescriptor {
            composite: true,
            ..self
        }
    }

    /// One past the last character the field occupies, check digit included.
    pub fn end(&self) -> usize {
        self.start + self.length + usize::from(self.check_digit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sex {
    Male,
    Female,
    Unspecified,
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Sex::Male => write!(f, "Male"),
            Sex::Female => write!(f, "Female"),
            Sex::Unspecified => write!(f, "Unspecified"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Names { surname: String, given_names: String },
    Date(NaiveDate),
    Sex(Sex),
}

/// One field sliced out of the MRZ, after correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MrzField {
    pub field_type: FieldType,
    pub raw_value: String,
    pub corrected_value: String,
    pub check_digit: Option<char>,
    /// `None` when no check digit applies.
    pub is_valid: Option<bool>,
    /// `None` when the corrected value could not be parsed.
    pub value: Option<FieldValue>,
}

impl MrzField {
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Some(FieldValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self.value {
            Some(FieldValue::Date(date)) => Some(date),
            _ => None,
        }
    }

    pub fn sex(&self) -> Option<Sex> {
        match self.value {
            Some(FieldValue::Sex(sex)) => Some(sex),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        BoundingBox {
            x,
            y,
            width,
            height,
        }
    }
}

/// A single classified glyph reported by the detection model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_index: usize,
    pub confidence: f32,
    pub rect: BoundingBox,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssembledLine {
    pub text: String,
    pub confidence: f32,
    pub glyph_count: usize,
}

/// Lines rebuilt from one frame's detections.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub lines: Vec<AssembledLine>,
    /// Sum of every retained glyph's confidence, sentinels excluded.
    pub confidence: f32,
    pub glyph_count: usize,
}

impl Assembly {
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|line| line.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MrzResult {
    pub document_format: MrzFormat,
    pub document_type: String,
    pub issuing_country: String,
    pub surname: String,
    pub given_names: String,
    pub document_number: String,
    pub nationality: String,
    pub birthdate: Option<NaiveDate>,
    pub sex: Option<Sex>,
    pub expiry_date: Option<NaiveDate>,
    pub personal_number: String,
    pub personal_number2: Option<String>,

    pub is_document_number_valid: bool,
    pub is_birthdate_valid: bool,
    pub is_expiry_date_valid: bool,
    pub is_personal_number_valid: Option<bool>,
    pub is_composite_valid: bool,
    pub all_check_digits_valid: bool,
}
