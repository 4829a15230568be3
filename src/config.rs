use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::MrzError;

/// Thresholds for rebuilding MRZ lines out of glyph detections.
///
/// Coordinates are in the detection model's input space (640 × 640).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Detections further than this above the top-left glyph are dropped.
    pub noise_margin: f32,
    /// Glyphs in the first line of a two-line document.
    pub line_split: usize,
    /// Minimum retained glyphs for a frame to be parsed.
    pub min_glyphs: usize,
    /// Aggregate confidence a frame must exceed to be parsed.
    pub min_confidence: f32,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        AssemblerConfig {
            noise_margin: 20.0,
            line_split: 44,
            min_glyphs: 88,
            min_confidence: 0.88,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub assembler: AssemblerConfig,
    /// Apply field-aware letter/digit correction before validation.
    pub ocr_correction: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            assembler: AssemblerConfig::default(),
            ocr_correction: true,
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MrzError> {
        let content = std::fs::read_to_string(&path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MrzError> {
        let assembler = &self.assembler;
        if assembler.line_split == 0 {
            return Err(MrzError::Config("line_split must be positive".to_string()));
        }
        if !assembler.noise_margin.is_finite() || assembler.noise_margin < 0.0 {
            return Err(MrzError::Config(format!(
                "noise_margin must be a non-negative number, got {}",
                assembler.noise_margin
            )));
        }
        if !assembler.min_confidence.is_finite() {
            return Err(MrzError::Config("min_confidence must be finite".to_string()));
        }
        Ok(())
    }
}
