use std::collections::HashSet;
use std::path::Path;

use lazy_static::lazy_static;
use log::warn;
use regex::Regex;

use crate::utils::MrzError;

/// Label the detection model uses for the box around the whole MRZ band.
pub const SENTINEL_LABEL: &str = "mrz";
/// Label the detection model uses for the `<` filler glyph.
pub const FILLER_LABEL: &str = "sign";
pub const FILLER: char = '<';

lazy_static! {
    static ref COUNTRY_CODE_PATTERN: Regex = Regex::new(r"^[A-Z<]{3}$").unwrap();
}

/// How a class index renders into MRZ text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Sentinel,
    Char(char),
}

/// Class index → glyph lookup for the detection model.
#[derive(Debug, Clone)]
pub struct GlyphLabels {
    glyphs: Vec<Option<Glyph>>,
}

impl GlyphLabels {
    /// Label set of the bundled passport model: digits, letters, filler, sentinel.
    pub fn standard() -> Self {
        let glyphs = ('0'..='9')
            .chain('A'..='Z')
            .chain([FILLER])
            .map(|c| Some(Glyph::Char(c)))
            .chain([Some(Glyph::Sentinel)])
            .collect();
        GlyphLabels { glyphs }
    }

    /// Reads one label per line; the line number is the class index.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MrzError> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            MrzError::ReferenceData(format!(
                "Failed to read label file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_labels(content.lines().map(str::to_string))
    }

    pub fn from_labels<I, S>(labels: I) -> Result<Self, MrzError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let glyphs: Vec<Option<Glyph>> = labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| {
                let label = label.as_ref().trim();
                let glyph = Self::glyph_for_label(label);
                if glyph.is_none() && !label.is_empty() {
                    warn!("Ignoring label {} at class index {}", label, index);
                }
                glyph
            })
            .collect();

        if !glyphs.contains(&Some(Glyph::Sentinel)) {
            return Err(MrzError::ReferenceData(format!(
                "Label table has no '{}' sentinel class",
                SENTINEL_LABEL
            )));
        }
        if !glyphs.contains(&Some(Glyph::Char(FILLER))) {
            return Err(MrzError::ReferenceData(format!(
                "Label table has no '{}' filler class",
                FILLER_LABEL
            )));
        }

        Ok(GlyphLabels { glyphs })
    }

    fn glyph_for_label(label: &str) -> Option<Glyph> {
        match label {
            SENTINEL_LABEL => Some(Glyph::Sentinel),
            FILLER_LABEL => Some(Glyph::Char(FILLER)),
            _ => {
                let mut chars = label.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_uppercase() || c.is_ascii_digit() || c == FILLER => {
                        Some(Glyph::Char(c))
                    }
                    _ => None,
                }
            }
        }
    }

    pub fn glyph(&self, class_index: usize) -> Option<Glyph> {
        self.glyphs.get(class_index).copied().flatten()
    }

    pub fn is_sentinel(&self, class_index: usize) -> bool {
        self.glyph(class_index) == Some(Glyph::Sentinel)
    }

    /// First class index rendering to `c`, if any.
    pub fn class_index_of(&self, c: char) -> Option<usize> {
        self.glyphs.iter().position(|g| *g == Some(Glyph::Char(c)))
    }

    pub fn sentinel_index(&self) -> Option<usize> {
        self.glyphs.iter().position(|g| *g == Some(Glyph::Sentinel))
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Reference list of valid three-letter nationality / issuing state codes.
#[derive(Debug, Clone)]
pub struct CountryCodes {
    codes: Vec<String>,
    index: HashSet<String>,
}

impl CountryCodes {
    /// ISO 3166-1 alpha-3 codes plus the ICAO Doc 9303 specific codes.
    pub fn icao() -> Self {
        let codes: Vec<String> = ICAO_COUNTRY_CODES.iter().map(|c| c.to_string()).collect();
        let index = codes.iter().cloned().collect();
        CountryCodes { codes, index }
    }

    /// Reads one code per line. Malformed lines are skipped.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MrzError> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            MrzError::ReferenceData(format!(
                "Failed to read country list '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_codes(content.lines())
    }

    pub fn from_codes<I, S>(codes: I) -> Result<Self, MrzError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Vec::new();
        let mut index = HashSet::new();
        for code in codes {
            let code = code.as_ref().trim();
            if code.is_empty() {
                continue;
            }
            if !COUNTRY_CODE_PATTERN.is_match(code) {
                warn!("Skipping malformed country code {:?}", code);
                continue;
            }
            if index.insert(code.to_string()) {
                list.push(code.to_string());
            }
        }

        if list.is_empty() {
            return Err(MrzError::ReferenceData(
                "Country list contains no valid codes".to_string(),
            ));
        }

        Ok(CountryCodes { codes: list, index })
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains(code)
    }

    /// Codes in the order they were loaded.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[rustfmt::skip]
const ICAO_COUNTRY_CODES: &[&str] = &[
    "ABW", "AFG", "AGO", "AIA", "ALA", "ALB", "AND", "ARE", "ARG", "ARM", "ASM", "ATA", "ATF", "ATG",
    "AUS", "AUT", "AZE", "BDI", "BEL", "BEN", "BES", "BFA", "BGD", "BGR", "BHR", "BHS", "BIH", "BLM",
    "BLR", "BLZ", "BMU", "BOL", "BRA", "BRB", "BRN", "BTN", "BVT", "BWA", "CAF", "CAN", "CCK", "CHE",
    "CHL", "CHN", "CIV", "CMR", "COD", "COG", "COK", "COL", "COM", "CPV", "CRI", "CUB", "CUW", "CXR",
    "CYM", "CYP", "CZE", "D<<", "DEU", "DJI", "DMA", "DNK", "DOM", "DZA", "ECU", "EGY", "ERI", "ESH",
    "ESP", "EST", "ETH", "EUE", "FIN", "FJI", "FLK", "FRA", "FRO", "FSM", "GAB", "GBD", "GBN", "GBO",
    "GBP", "GBR", "GBS", "GEO", "GGY", "GHA", "GIB", "GIN", "GLP", "GMB", "GNB", "GNQ", "GRC", "GRD",
    "GRL", "GTM", "GUF", "GUM", "GUY", "HKG", "HMD", "HND", "HRV", "HTI", "HUN", "IDN", "IMN", "IND",
    "IOT", "IRL", "IRN", "IRQ", "ISL", "ISR", "ITA", "JAM", "JEY", "JOR", "JPN", "KAZ", "KEN", "KGZ",
    "KHM", "KIR", "KNA", "KOR", "KWT", "LAO", "LBN", "LBR", "LBY", "LCA", "LIE", "LKA", "LSO", "LTU",
    "LUX", "LVA", "MAC", "MAF", "MAR", "MCO", "MDA", "MDG", "MDV", "MEX", "MHL", "MKD", "MLI", "MLT",
    "MMR", "MNE", "MNG", "MNP", "MOZ", "MRT", "MSR", "MTQ", "MUS", "MWI", "MYS", "MYT", "NAM", "NCL",
    "NER", "NFK", "NGA", "NIC", "NIU", "NLD", "NOR", "NPL", "NRU", "NZL", "OMN", "PAK", "PAN", "PCN",
    "PER", "PHL", "PLW", "PNG", "POL", "PRI", "PRK", "PRT", "PRY", "PSE", "PYF", "QAT", "REU", "RKS",
    "ROU", "RUS", "RWA", "SAU", "SDN", "SEN", "SGP", "SGS", "SHN", "SJM", "SLB", "SLE", "SLV", "SMR",
    "SOM", "SPM", "SRB", "SSD", "STP", "SUR", "SVK", "SVN", "SWE", "SWZ", "SXM", "SYC", "SYR", "TCA",
    "TCD", "TGO", "THA", "TJK", "TKL", "TKM", "TLS", "TON", "TTO", "TUN", "TUR", "TUV", "TWN", "TZA",
    "UGA", "UKR", "UMI", "UNA", "UNK", "UNO", "URY", "USA", "UZB", "VAT", "VCT", "VEN", "VGB", "VIR",
    "VNM", "VUT", "WLF", "WSM", "XCC", "XOM", "XPO", "XXA", "XXB", "XXC", "XXX", "YEM", "ZAF", "ZMB",
    "ZWE",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_standard_labels() {
        let labels = GlyphLabels::standard();
        assert_eq!(labels.len(), 38);
        assert_eq!(labels.glyph(0), Some(Glyph::Char('0')));
        assert_eq!(labels.glyph(10), Some(Glyph::Char('A')));
        assert_eq!(labels.glyph(36), Some(Glyph::Char('<')));
        assert_eq!(labels.sentinel_index(), Some(37));
        assert!(labels.is_sentinel(37));
        assert_eq!(labels.glyph(38), None);
    }

    #[test]
    fn test_labels_without_reserved_classes_are_rejected() {
        assert!(GlyphLabels::from_labels(["A", "B", "sign"]).is_err());
        assert!(GlyphLabels::from_labels(["A", "B", "mrz"]).is_err());
    }

    #[test]
    fn test_labels_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "mrz\nsign\nK\n\nlogo\n7").unwrap();

        let labels = GlyphLabels::from_file(file.path()).unwrap();
        assert!(labels.is_sentinel(0));
        assert_eq!(labels.glyph(1), Some(Glyph::Char('<')));
        assert_eq!(labels.glyph(2), Some(Glyph::Char('K')));
        assert_eq!(labels.glyph(3), None);
        assert_eq!(labels.glyph(4), None);
        assert_eq!(labels.class_index_of('7'), Some(5));
    }

    #[test]
    fn test_missing_label_file_is_fatal() {
        let result = GlyphLabels::from_file("/nonexistent/classes.txt");
        assert!(matches!(result, Err(MrzError::ReferenceData(_))));
    }

    #[test]
    fn test_country_codes_skip_malformed_lines() {
        let codes = CountryCodes::from_codes(["USA", "us", "GBR", "", "TOOLONG", "USA", "D<<"]).unwrap();
        assert_eq!(codes.iter().collect::<Vec<_>>(), vec!["USA", "GBR", "D<<"]);
        assert!(codes.contains("GBR"));
        assert!(!codes.contains("us"));
    }

    #[test]
    fn test_empty_country_list_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "\n\n").unwrap();
        assert!(CountryCodes::from_file(file.path()).is_err());
    }

    #[test]
    fn test_icao_list() {
        let codes = CountryCodes::icao();
        assert!(codes.contains("MEX"));
        assert!(codes.contains("D<<"));
        assert!(codes.contains("UNO"));
        assert!(!codes.contains("UTO"));
        assert_eq!(codes.len(), ICAO_COUNTRY_CODES.len());
    }
}
