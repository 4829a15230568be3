pub mod data;
pub mod layouts;
pub mod outcome;
pub mod reference;

pub use data::*;
pub use outcome::{PipelineStage, Rejection};
pub use reference::{CountryCodes, Glyph, GlyphLabels, FILLER};
