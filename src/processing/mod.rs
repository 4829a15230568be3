pub mod assembler;
pub mod extractors;
pub mod field_correction;

pub use assembler::DetectionAssembler;
pub use extractors::FieldFormatter;
pub use field_correction::{FieldCorrection, NationalityMatcher};
