use std::path::Path;

use chrono::{Local, NaiveDate};
use log::{debug, info};

use crate::config::EngineConfig;
use crate::models::{
    CountryCodes, Detection, GlyphLabels, MrzFormat, MrzResult, PipelineStage, Rejection,
};
use crate::processing::{DetectionAssembler, FieldFormatter};
use crate::utils::MrzError;
use crate::validation::{FormatValidator, MrzValidator};

/// Entry point of the MRZ engine.
///
/// Holds the reference tables, which are read-only after construction, so
/// one validator can serve any number of frames, including concurrently.
pub struct PassportValidator {
    labels: GlyphLabels,
    countries: CountryCodes,
    config: EngineConfig,
}

impl Default for PassportValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl PassportValidator {
    /// Validator using the bundled label set and ICAO country list.
    pub fn new() -> Self {
        PassportValidator {
            labels: GlyphLabels::standard(),
            countries: CountryCodes::icao(),
            config: EngineConfig::default(),
        }
    }

    pub fn with_reference_data(
        labels: GlyphLabels,
        countries: CountryCodes,
        config: EngineConfig,
    ) -> Result<Self, MrzError> {
        config.validate()?;
        Ok(PassportValidator {
            labels,
            countries,
            config,
        })
    }

    /// Load the label table and country list from disk. Failing to read
    /// either is fatal: the engine can't run without them.
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        labels_path: P,
        countries_path: Q,
        config: EngineConfig,
    ) -> Result<Self, MrzError> {
        let labels = GlyphLabels::from_file(labels_path)?;
        let countries = CountryCodes::from_file(countries_path)?;
        Self::with_reference_data(labels, countries, config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn labels(&self) -> &GlyphLabels {
        &self.labels
    }

    pub fn countries(&self) -> &CountryCodes {
        &self.countries
    }

    /// Parse one frame's glyph detections. `None` means "try the next frame".
    pub fn parse_from_detections(&self, detections: &[Detection]) -> Option<MrzResult> {
        self.parse_from_detections_at(detections, Local::now().date_naive())
    }

    pub fn parse_from_detections_at(
        &self,
        detections: &[Detection],
        today: NaiveDate,
    ) -> Option<MrzResult> {
        self.scan_detections(detections, today).ok()
    }

    /// Parse already assembled MRZ lines.
    pub fn parse_from_lines<S: AsRef<str>>(&self, lines: &[S]) -> Option<MrzResult> {
        self.parse_from_lines_at(lines, Local::now().date_naive())
    }

    pub fn parse_from_lines_at<S: AsRef<str>>(
        &self,
        lines: &[S],
        today: NaiveDate,
    ) -> Option<MrzResult> {
        self.scan_lines(lines, today).ok()
    }

    /// Parse MRZ text with lines separated by `\n`.
    pub fn parse_from_string(&self, mrz: &str) -> Option<MrzResult> {
        let lines: Vec<&str> = mrz.split('\n').collect();
        self.parse_from_lines(&lines)
    }

    /// Like `parse_from_detections_at`, but reports why a frame was rejected.
    pub fn scan_detections(
        &self,
        detections: &[Detection],
        today: NaiveDate,
    ) -> Result<MrzResult, Rejection> {
        // Step 1: Rebuild text lines from the detections
        let assembler = DetectionAssembler::new(&self.labels, &self.config.assembler);
        let assembly = assembler.assemble(detections).map_err(Self::rejected)?;

        // Step 2: Parse the lines
        self.scan_lines(&assembly.texts(), today)
    }

    /// Like `parse_from_lines_at`, but reports why the lines were rejected.
    pub fn scan_lines<S: AsRef<str>>(
        &self,
        lines: &[S],
        today: NaiveDate,
    ) -> Result<MrzResult, Rejection> {
        Self::advance(PipelineStage::LinesAssembled);

        // Step 1: Detect the document format
        let format = FormatValidator::detect(lines);
        if format == MrzFormat::Invalid {
            return Err(Self::rejected(Rejection::InvalidFormat));
        }
        Self::advance(PipelineStage::FormatDetected);

        // Step 2: Extract and correct every field of the layout
        let formatter = FieldFormatter::new(&self.countries, self.config.ocr_correction, today);
        let fields = formatter.extract(lines, format).map_err(Self::rejected)?;
        Self::advance(PipelineStage::Corrected);

        // Step 3: Cross-check the fields and build the record
        let result = MrzValidator::validate(lines, format, &fields).map_err(Self::rejected)?;
        Self::advance(PipelineStage::Validated);

        info!(
            "Accepted {:?} document {} (all check digits valid: {})",
            result.document_format, result.document_number, result.all_check_digits_valid
        );
        Ok(result)
    }

    fn advance(stage: PipelineStage) {
        debug!("MRZ pipeline reached {:?}", stage);
    }

    fn rejected(rejection: Rejection) -> Rejection {
        debug!("MRZ rejected after {:?}: {}", rejection.stage(), rejection);
        rejection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldType, Sex};
    use crate::processing::assembler::tests::{detections_for, TD3};

    const TD2: [&str; 2] = [
        "I<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<",
        "D231458907UTO7408122F1204159<<<<<<<6",
    ];

    const TD1: [&str; 3] = [
        "I<UTOD231458907<<<<<<<<<<<<<<<",
        "7408122F1204159UTO<<<<<<<<<<<6",
        "ERIKSSON<<ANNA<MARIA<<<<<<<<<<",
    ];

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn validator() -> PassportValidator {
        let countries = CountryCodes::from_codes(["UTO", "USA", "MEX"]).unwrap();
        PassportValidator::with_reference_data(
            GlyphLabels::standard(),
            countries,
            EngineConfig::default(),
        )
        .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_td3_specimen() {
        let result = validator().parse_from_lines_at(&TD3, today()).unwrap();

        assert_eq!(result.document_format, MrzFormat::TD3);
        assert_eq!(result.document_type, "P");
        assert_eq!(result.issuing_country, "UTO");
        assert_eq!(result.surname, "ERIKSSON");
        assert_eq!(result.given_names, "ANNA MARIA");
        assert_eq!(result.document_number, "L898902C3");
        assert_eq!(result.nationality, "UTO");
        assert_eq!(result.birthdate, date(1974, 8, 12));
        assert_eq!(result.sex, Some(Sex::Female));
        assert_eq!(result.expiry_date, date(2012, 4, 15));
        assert_eq!(result.personal_number, "ZE184226B");
        assert_eq!(result.personal_number2, None);
        assert!(result.is_document_number_valid);
        assert!(result.is_birthdate_valid);
        assert!(result.is_expiry_date_valid);
        assert_eq!(result.is_personal_number_valid, Some(true));
        assert!(result.is_composite_valid);
        assert!(result.all_check_digits_valid);
    }

    #[test]
    fn test_flipped_document_number_check_digit_rejects() {
        let validator = validator();
        let flipped = [TD3[0].to_string(), TD3[1].replacen("C36", "C37", 1)];

        assert_eq!(
            validator.scan_lines(&flipped, today()),
            Err(Rejection::DocumentNumberChecksum)
        );
        assert_eq!(validator.parse_from_lines_at(&flipped, today()), None);

        // The fields themselves still parse the same way.
        let formatter = FieldFormatter::new(validator.countries(), true, today());
        let clean = formatter.extract(&TD3, MrzFormat::TD3).unwrap();
        let changed = formatter.extract(&flipped, MrzFormat::TD3).unwrap();
        for (before, after) in clean.iter().zip(&changed) {
            assert_eq!(before.value, after.value);
        }
        let number = changed
            .iter()
            .find(|f| f.field_type == FieldType::DocumentNumber)
            .unwrap();
        assert_eq!(number.is_valid, Some(false));
    }

    #[test]
    fn test_td3_with_ocr_errors_is_corrected() {
        let noisy = [
            "P<UT0ER1KSSON<<ANNA<MAR1A<<<<<<<<<<<<<<<<<<<",
            "L898902C36UT074O8122P1204159ZE184226B<<<<<10",
        ];
        let result = validator().parse_from_lines_at(&noisy, today()).unwrap();

        assert_eq!(result.issuing_country, "UTO");
        assert_eq!(result.surname, "ERIKSSON");
        assert_eq!(result.given_names, "ANNA MARIA");
        assert_eq!(result.nationality, "UTO");
        assert_eq!(result.birthdate, date(1974, 8, 12));
        assert_eq!(result.sex, Some(Sex::Female));
        assert!(result.all_check_digits_valid);
    }

    #[test]
    fn test_without_ocr_correction_noise_is_rejected() {
        let noisy = [
            "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<",
            "L898902C36UTO74O8122F1204159ZE184226B<<<<<10",
        ];
        let config = EngineConfig {
            ocr_correction: false,
            ..EngineConfig::default()
        };
        let validator = PassportValidator::with_reference_data(
            GlyphLabels::standard(),
            CountryCodes::from_codes(["UTO"]).unwrap(),
            config,
        )
        .unwrap();

        assert_eq!(
            validator.scan_lines(&noisy, today()),
            Err(Rejection::MalformedBirthdate)
        );
        assert!(validator.parse_from_lines_at(&TD3, today()).is_some());
    }

    #[test]
    fn test_misread_document_type() {
        let lines = [TD3[0].replacen("P<", "FM", 1), TD3[1].to_string()];
        let result = validator().parse_from_lines_at(&lines, today()).unwrap();
        assert_eq!(result.document_type, "PM");
    }

    #[test]
    fn test_td2_specimen() {
        let result = validator().parse_from_lines_at(&TD2, today()).unwrap();

        assert_eq!(result.document_format, MrzFormat::TD2);
        assert_eq!(result.document_type, "I");
        assert_eq!(result.document_number, "D23145890");
        assert_eq!(result.surname, "ERIKSSON");
        assert_eq!(result.birthdate, date(1974, 8, 12));
        assert_eq!(result.expiry_date, date(2012, 4, 15));
        assert_eq!(result.personal_number, "");
        assert_eq!(result.is_personal_number_valid, None);
        assert!(result.all_check_digits_valid);
    }

    #[test]
    fn test_td1_specimen() {
        let result = validator().parse_from_lines_at(&TD1, today()).unwrap();

        assert_eq!(result.document_format, MrzFormat::TD1);
        assert_eq!(result.document_type, "I");
        assert_eq!(result.issuing_country, "UTO");
        assert_eq!(result.document_number, "D23145890");
        assert_eq!(result.surname, "ERIKSSON");
        assert_eq!(result.given_names, "ANNA MARIA");
        assert_eq!(result.nationality, "UTO");
        assert_eq!(result.sex, Some(Sex::Female));
        assert_eq!(result.personal_number2, None);
        assert!(result.is_composite_valid);
        assert!(result.all_check_digits_valid);
    }

    #[test]
    fn test_td1_document_number_check_is_read_from_its_own_offset() {
        // Offset 54 does not exist in TD1 text; the check digit sits at 14.
        let broken = [TD1[0].replacen("907", "908", 1), TD1[1].to_string(), TD1[2].to_string()];
        assert_eq!(
            validator().scan_lines(&broken, today()),
            Err(Rejection::DocumentNumberChecksum)
        );
    }

    #[test]
    fn test_blank_or_misread_nationality_is_rejected() {
        let validator = PassportValidator::new();
        for nationality in ["<<<", "Q<<"] {
            let mut second = TD3[1].to_string();
            second.replace_range(10..13, nationality);
            let lines = [TD3[0].to_string(), second];

            let rejection = validator.scan_lines(&lines, today()).unwrap_err();
            assert_eq!(rejection, Rejection::UnresolvedNationality);
            assert_eq!(rejection.stage(), PipelineStage::FieldsExtracted);
        }
    }

    #[test]
    fn test_unequal_lines_are_invalid() {
        let lines = [TD3[0], &TD3[1][..43]];
        let rejection = validator().scan_lines(&lines, today()).unwrap_err();
        assert_eq!(rejection, Rejection::InvalidFormat);
        assert_eq!(rejection.stage(), PipelineStage::LinesAssembled);
    }

    #[test]
    fn test_result_serializes_to_json() {
        let result = validator().parse_from_lines_at(&TD3, today()).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["document_format"], "TD3");
        assert_eq!(json["sex"], "Female");
        assert_eq!(json["birthdate"], "1974-08-12");
        assert_eq!(json["personal_number2"], serde_json::Value::Null);
    }

    #[test]
    fn test_parse_from_string() {
        let text = format!("{}\n{}", TD3[0], TD3[1]);
        let result = validator().parse_from_string(&text).unwrap();
        assert_eq!(result.document_number, "L898902C3");
        assert!(validator().parse_from_string(TD3[0]).is_none());
    }

    #[test]
    fn test_detections_produce_the_same_record() {
        let validator = validator();
        let detections = detections_for(&TD3, validator.labels(), 0.97);

        let from_detections = validator.parse_from_detections_at(&detections, today()).unwrap();
        let from_lines = validator.parse_from_lines_at(&TD3, today()).unwrap();
        assert_eq!(from_detections, from_lines);
    }

    #[test]
    fn test_detection_gate_runs_before_format_detection() {
        let validator = validator();
        let detections: Vec<Detection> = detections_for(&TD3, validator.labels(), 0.97)
            .into_iter()
            .skip(2)
            .collect();

        let rejection = validator.scan_detections(&detections, today()).unwrap_err();
        assert!(matches!(rejection, Rejection::TooFewGlyphs { glyphs: 86, .. }));
        assert_eq!(rejection.stage(), PipelineStage::Idle);
    }

    #[test]
    fn test_uneven_assembled_lines_are_rejected() {
        let validator = validator();
        let long_second = format!("{}<", TD3[1]);
        let detections = detections_for(&[TD3[0], &long_second], validator.labels(), 0.97);

        assert_eq!(
            validator.scan_detections(&detections, today()),
            Err(Rejection::InvalidFormat)
        );
    }

    #[test]
    fn test_reference_files() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut labels = NamedTempFile::new().unwrap();
        for label in ('0'..='9').chain('A'..='Z') {
            writeln!(labels, "{}", label).unwrap();
        }
        writeln!(labels, "sign\nmrz").unwrap();
        let mut countries = NamedTempFile::new().unwrap();
        writeln!(countries, "UTO\nUSA").unwrap();

        let validator =
            PassportValidator::from_files(labels.path(), countries.path(), EngineConfig::default())
                .unwrap();
        assert!(validator.parse_from_lines_at(&TD3, today()).is_some());

        let missing = PassportValidator::from_files(
            labels.path(),
            "/nonexistent/nationality.txt",
            EngineConfig::default(),
        );
        assert!(matches!(missing, Err(MrzError::ReferenceData(_))));
    }

    #[test]
    fn test_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PassportValidator>();

        let validator = validator();
        let detections = detections_for(&TD3, validator.labels(), 0.97);
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        (0..25)
                            .filter(|_| validator.parse_from_detections_at(&detections, today()).is_some())
                            .count()
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), 25);
            }
        });
    }

    #[test]
    fn test_default_validator_knows_real_countries() {
        let mexican = [
            "P<MEXCHAIREZ<DE<LA<CRUZ<<DULCE<IVONNE<<<<<<<",
            "G391371538MEX8311265F2609290<<<<<<<<<<<<<<04",
        ];
        let result = PassportValidator::new().parse_from_lines_at(&mexican, today()).unwrap();
        assert_eq!(result.surname, "CHAIREZ DE LA CRUZ");
        assert_eq!(result.given_names, "DULCE IVONNE");
        assert_eq!(result.birthdate, date(1983, 11, 26));
        assert_eq!(result.expiry_date, date(2026, 9, 29));
    }
}
