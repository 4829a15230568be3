// ICAO Doc 9303 field layouts, one table per document size.
// Composite members are listed in the order the composite check concatenates them.

use crate::models::{FieldDescriptor, FieldType};

use FieldType::*;

pub const TD1_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new(DocumentType, 0, 0, 2),
    FieldDescriptor::new(CountryCode, 0, 2, 3),
    FieldDescriptor::new(DocumentNumber, 0, 5, 9).checked().composite(),
    FieldDescriptor::new(PersonalNumber, 0, 15, 15).composite(),
    FieldDescriptor::new(Birthdate, 1, 0, 6).checked().composite(),
    FieldDescriptor::new(Sex, 1, 7, 1),
    FieldDescriptor::new(ExpiryDate, 1, 8, 6).checked().composite(),
    FieldDescriptor::new(Nationality, 1, 15, 3),
    FieldDescriptor::new(OptionalData, 1, 18, 11).composite(),
    FieldDescriptor::new(Hash, 1, 29, 1),
    FieldDescriptor::new(Names, 2, 0, 30),
];

pub const TD2_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new(DocumentType, 0, 0, 2),
    FieldDescriptor::new(CountryCode, 0, 2, 3),
    FieldDescriptor::new(Names, 0, 5, 31),
    FieldDescriptor::new(DocumentNumber, 1, 0, 9).checked().composite(),
    FieldDescriptor::new(Nationality, 1, 10, 3),
    FieldDescriptor::new(Birthdate, 1, 13, 6).checked().composite(),
    FieldDescriptor::new(Sex, 1, 20, 1),
    FieldDescriptor::new(ExpiryDate, 1, 21, 6).checked().composite(),
    FieldDescriptor::new(PersonalNumber, 1, 28, 7).composite(),
    FieldDescriptor::new(Hash, 1, 35, 1),
];

pub const TD3_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new(DocumentType, 0, 0, 2),
    FieldDescriptor::new(CountryCode, 0, 2, 3),
    FieldDescriptor::new(Names, 0, 5, 39),
    FieldDescriptor::new(DocumentNumber, 1, 0, 9).checked().composite(),
    FieldDescriptor::new(Nationality, 1, 10, 3),
    FieldDescriptor::new(Birthdate, 1, 13, 6).checked().composite(),
    FieldDescriptor::new(Sex, 1, 20, 1),
    FieldDescriptor::new(ExpiryDate, 1, 21, 6).checked().composite(),
    FieldDescriptor::new(PersonalNumber, 1, 28, 14).checked().composite(),
    FieldDescriptor::new(Hash, 1, 43, 1),
];
