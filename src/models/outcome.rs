use thiserror::Error;

/// Steps a single parse attempt moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    LinesAssembled,
    FormatDetected,
    FieldsExtracted,
    Corrected,
    Validated,
}

/// Why a frame produced no record. The caller just tries the next frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("no MRZ lines could be assembled")]
    NoLines,

    #[error("only {glyphs} glyphs detected, {required} required")]
    TooFewGlyphs { glyphs: usize, required: usize },

    #[error("aggregate confidence {confidence:.3} does not exceed {required}")]
    LowConfidence { confidence: f32, required: f32 },

    #[error("lines do not match any MRZ layout")]
    InvalidFormat,

    #[error("field {0} lies outside the MRZ")]
    FieldOutOfRange(String),

    #[error("sex could not be read")]
    UnreadableSex,

    #[error("nationality could not be resolved")]
    UnresolvedNationality,

    #[error("birthdate is malformed")]
    MalformedBirthdate,

    #[error("expiry date is malformed")]
    MalformedExpiryDate,

    #[error("digit found in {0}")]
    DigitInAlphabeticField(&'static str),

    #[error("document number check digit mismatch")]
    DocumentNumberChecksum,
}

impl Rejection {
    /// The last stage the attempt completed before it was rejected.
    pub fn stage(&self) -> PipelineStage {
        match self {
            Rejection::NoLines | Rejection::TooFewGlyphs { .. } | Rejection::LowConfidence { .. } => {
                PipelineStage::Idle
            }
            Rejection::InvalidFormat => PipelineStage::LinesAssembled,
            Rejection::FieldOutOfRange(_) => PipelineStage::FormatDetected,
            Rejection::UnresolvedNationality => PipelineStage::FieldsExtracted,
            Rejection::UnreadableSex
            | Rejection::MalformedBirthdate
            | Rejection::MalformedExpiryDate
            | Rejection::DigitInAlphabeticField(_)
            | Rejection::DocumentNumberChecksum => PipelineStage::Corrected,
        }
    }
}
