use crate::models::MrzFormat;

pub struct FormatValidator;

impl FormatValidator {
    /// Classify MRZ lines by line count and uniform line length.
    pub fn detect<S: AsRef<str>>(lines: &[S]) -> MrzFormat {
        let Some(length) = Self::uniform_line_length(lines) else {
            return MrzFormat::Invalid;
        };

        match (lines.len(), length) {
            (2, 36) => MrzFormat::TD2,
            (2, 44) => MrzFormat::TD3,
            (3, 30) => MrzFormat::TD1,
            _ => MrzFormat::Invalid,
        }
    }

    /// Shared length of every line, `None` if lines differ, are empty or
    /// hold non-ASCII characters.
    fn uniform_line_length<S: AsRef<str>>(lines: &[S]) -> Option<usize> {
        let first = lines.first()?.as_ref();
        if lines.iter().any(|line| !line.as_ref().is_ascii()) {
            return None;
        }
        let length = first.len();
        if lines.iter().any(|line| line.as_ref().len() != length) {
            return None;
        }
        Some(length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_each_format() {
        assert_eq!(FormatValidator::detect(&["<".repeat(44), "<".repeat(44)]), MrzFormat::TD3);
        assert_eq!(FormatValidator::detect(&["<".repeat(36), "<".repeat(36)]), MrzFormat::TD2);
        assert_eq!(
            FormatValidator::detect(&["<".repeat(30), "<".repeat(30), "<".repeat(30)]),
            MrzFormat::TD1
        );
    }

    #[test]
    fn test_unequal_lines_are_invalid() {
        assert_eq!(FormatValidator::detect(&["<".repeat(44), "<".repeat(43)]), MrzFormat::Invalid);
        assert_eq!(
            FormatValidator::detect(&["<".repeat(30), "<".repeat(30), "<".repeat(29)]),
            MrzFormat::Invalid
        );
    }

    #[test]
    fn test_wrong_length_or_count_is_invalid() {
        assert_eq!(FormatValidator::detect(&["<".repeat(30), "<".repeat(30)]), MrzFormat::Invalid);
        assert_eq!(
            FormatValidator::detect(&["<".repeat(44), "<".repeat(44), "<".repeat(44)]),
            MrzFormat::Invalid
        );
        assert_eq!(FormatValidator::detect(&["<".repeat(44)]), MrzFormat::Invalid);
        assert_eq!(FormatValidator::detect::<String>(&[]), MrzFormat::Invalid);
    }

    #[test]
    fn test_non_ascii_is_invalid() {
        let line = format!("{}É", "<".repeat(42));
        assert_eq!(line.len(), 44);
        assert_eq!(FormatValidator::detect(&[line.clone(), line]), MrzFormat::Invalid);
    }
}
