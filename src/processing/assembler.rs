use std::cmp::Ordering;

use log::debug;

use crate::config::AssemblerConfig;
use crate::models::{AssembledLine, Assembly, Detection, Glyph, GlyphLabels, Rejection};

/// Rebuilds the two MRZ lines of a passport page from unordered glyph
/// detections.
///
/// Only two-line documents are reconstructed: the first `line_split`
/// glyphs in top-to-bottom order form the first line. Three-line TD1
/// cards need a different split and are not assembled here.
pub struct DetectionAssembler<'a> {
    labels: &'a GlyphLabels,
    config: &'a AssemblerConfig,
}

impl<'a> DetectionAssembler<'a> {
    pub fn new(labels: &'a GlyphLabels, config: &'a AssemblerConfig) -> Self {
        DetectionAssembler { labels, config }
    }

    /// Assemble lines and apply the glyph count / confidence gate.
    pub fn assemble(&self, detections: &[Detection]) -> Result<Assembly, Rejection> {
        let known: Vec<Detection> = detections
            .iter()
            .filter(|d| self.labels.glyph(d.class_index).is_some())
            .copied()
            .collect();
        if known.len() != detections.len() {
            debug!(
                "Dropped {} detections with unknown class indices",
                detections.len() - known.len()
            );
        }

        let gated = self.remove_noise(&known);
        let glyphs: Vec<Detection> = sort_by_y(&gated)
            .into_iter()
            .filter(|d| !self.labels.is_sentinel(d.class_index))
            .collect();

        let glyph_count = glyphs.len();
        let confidence: f32 = glyphs.iter().map(|d| d.confidence).sum();
        debug!("Assembling {} glyphs, confidence {:.3}", glyph_count, confidence);

        self.check_gate(glyph_count, confidence)?;

        let split = self.config.line_split.min(glyph_count);
        let (first, second) = glyphs.split_at(split);
        if first.is_empty() || second.is_empty() {
            return Err(Rejection::NoLines);
        }

        let lines = remove_short_lines(vec![self.build_line(first), self.build_line(second)]);
        if lines.is_empty() {
            return Err(Rejection::NoLines);
        }

        Ok(Assembly {
            lines,
            confidence,
            glyph_count,
        })
    }

    /// Drop detections lying above the MRZ band.
    ///
    /// The anchor is the upper of the two leftmost detections; anything
    /// more than `noise_margin` above it is not part of the MRZ.
    fn remove_noise(&self, detections: &[Detection]) -> Vec<Detection> {
        let by_x = sort_by_x(detections);
        let anchor = match by_x.as_slice() {
            [first, second, ..] => {
                if first.rect.y > second.rect.y {
                    *second
                } else {
                    *first
                }
            }
            _ => return detections.to_vec(),
        };

        let floor = anchor.rect.y - self.config.noise_margin;
        let kept: Vec<Detection> = detections
            .iter()
            .filter(|d| d.rect.y >= floor)
            .copied()
            .collect();
        if kept.len() != detections.len() {
            debug!(
                "Removed {} detections above y={:.1}",
                detections.len() - kept.len(),
                floor
            );
        }
        kept
    }

    // Joined with its line break the text must be longer than `min_glyphs`,
    // so two complete 44 character lines pass an 88 threshold.
    fn check_gate(&self, glyph_count: usize, confidence: f32) -> Result<(), Rejection> {
        if glyph_count < self.config.min_glyphs {
            return Err(Rejection::TooFewGlyphs {
                glyphs: glyph_count,
                required: self.config.min_glyphs,
            });
        }
        if confidence <= self.config.min_confidence {
            return Err(Rejection::LowConfidence {
                confidence,
                required: self.config.min_confidence,
            });
        }
        Ok(())
    }

    fn build_line(&self, bin: &[Detection]) -> AssembledLine {
        let text: String = sort_by_x(bin)
            .iter()
            .filter_map(|d| match self.labels.glyph(d.class_index) {
                Some(Glyph::Char(c)) => Some(c),
                _ => None,
            })
            .filter(|c| !c.is_whitespace())
            .collect();
        AssembledLine {
            text,
            confidence: bin.iter().map(|d| d.confidence).sum(),
            glyph_count: bin.len(),
        }
    }
}

/// Drop empty lines and lines shorter than the mean line length; these
/// come from stray detections rather than the MRZ itself.
pub fn remove_short_lines(lines: Vec<AssembledLine>) -> Vec<AssembledLine> {
    let lines: Vec<AssembledLine> = lines.into_iter().filter(|l| !l.text.is_empty()).collect();
    if lines.is_empty() {
        return lines;
    }
    let mean = lines.iter().map(|l| l.text.len()).sum::<usize>() / lines.len();
    lines.into_iter().filter(|l| l.text.len() >= mean).collect()
}

fn sort_by_y(detections: &[Detection]) -> Vec<Detection> {
    let mut sorted = detections.to_vec();
    sorted.sort_by(|a, b| a.rect.y.partial_cmp(&b.rect.y).unwrap_or(Ordering::Equal));
    sorted
}

fn sort_by_x(detections: &[Detection]) -> Vec<Detection> {
    let mut sorted = detections.to_vec();
    sorted.sort_by(|a, b| a.rect.x.partial_cmp(&b.rect.x).unwrap_or(Ordering::Equal));
    sorted
}
