// tests/config_dataset_files_test.rs
//! Configuration and dataset files on disk

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use vexp_harness::config::{ConfigError, HarnessConfig};
    use vexp_harness::counters::CounterKind;
    use vexp_harness::dataset::{DatasetError, ExpDatasets};
    use vexp_harness::harness::{exit_code, HarnessDriver, HarnessError};

    #[test]
    fn test_config_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("harness.toml");

        let mut config = HarnessConfig::default();
        config.validation.tolerance = 0.25;
        config.counters.source = CounterKind::Software;
        config.save_to_file(&path).unwrap();

        let loaded = HarnessConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = HarnessConfig::from_toml_str("[validation]\ntolerance = 0.5\n").unwrap();
        assert_eq!(config.validation.tolerance, 0.5);
        assert_eq!(config.dataset.expected_f64, 128);
        assert_eq!(config.dataset.expected_f32, 256);
        assert_eq!(config.counters.source, CounterKind::Auto);
    }

    #[test]
    fn test_invalid_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[dataset]\nexpected_f64 = 0\n").unwrap();

        assert!(matches!(
            HarnessConfig::from_file(&path),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            HarnessConfig::from_file(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_oversized_count_is_rejected_before_allocation() {
        let mut config = HarnessConfig::default();
        config.dataset.expected_f64 = usize::MAX / 8;

        assert!(matches!(
            HarnessDriver::from_config(config),
            Err(HarnessError::Config(ConfigError::Validation(_)))
        ));
    }

    #[test]
    fn test_dataset_file_drives_the_harness() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dataset.json");
        ExpDatasets::generate(21, 128, 256, -4.0..4.0).save_json(&path).unwrap();

        let mut config = HarnessConfig::default();
        config.dataset.file = Some(path);
        config.counters.source = CounterKind::Software;

        let mut driver = HarnessDriver::from_config(config).unwrap();
        assert_eq!(driver.datasets().len_f64(), 128);

        let result = driver.run(&mut std::io::sink());
        assert_eq!(exit_code(&result), 0);
    }

    #[test]
    fn test_short_dataset_file_fails_size_check() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("short.json");
        ExpDatasets::generate(21, 100, 256, -4.0..4.0).save_json(&path).unwrap();

        let mut config = HarnessConfig::default();
        config.dataset.file = Some(path);

        let mut driver = HarnessDriver::from_config(config).unwrap();
        let mut out = Vec::new();
        let result = driver.run(&mut out);

        assert!(matches!(result, Err(HarnessError::SizeMismatch { width: 64, .. })));
        assert_eq!(exit_code(&result), 1);
        assert!(out.is_empty());
    }

    #[test]
    fn test_inconsistent_dataset_file() {
        let json = r#"{
            "N_f64": 3, "exponents_f64": [0.0, 1.0], "gold_results_f64": [1.0, 2.718281828459045],
            "N_f32": 0, "exponents_f32": [], "gold_results_f32": []
        }"#;
        assert!(matches!(
            ExpDatasets::from_json_str(json),
            Err(DatasetError::Shape { width: 64, reported: 3, .. })
        ));
    }

    #[test]
    fn test_assembly_output_lists_every_symbol() {
        let datasets = ExpDatasets::generate(1, 4, 8, -1.0..1.0);
        let mut out = Vec::new();
        datasets.write_assembly(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        for symbol in [
            "N_f64",
            "exponents_f64",
            "gold_results_f64",
            "N_f32",
            "exponents_f32",
            "gold_results_f32",
        ] {
            assert!(text.contains(&format!("{}:\n", symbol)), "missing {}", symbol);
        }
    }
}
