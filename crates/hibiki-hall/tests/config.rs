//! Loading hall configuration from disk.

use std::io::Write;

use hibiki_hall::{HallConfig, HallError, ParamIndex, Step};

#[test]
fn load_and_build_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
sample_rate = 96000
queue_capacity = 16

[macros]
size = 4
tonality = 0
presence = 1

[overrides]
l_time = 6.0
e_hpf = 20.0
"#
    )
    .unwrap();

    let config = HallConfig::load(file.path()).unwrap();
    assert_eq!(config.sample_rate, 96000);
    assert_eq!(config.macros.shape, 2);

    let hall = config.build().unwrap();
    assert_eq!(hall.sample_rate(), 96000.0);
    assert_eq!(hall.settings().size, Step::S4);
    assert_eq!(hall.settings().tonality, Step::S0);
    assert_eq!(hall.get_parameter_value(ParamIndex::LateDecay.index()), 6.0);
    assert_eq!(hall.get_parameter_value(ParamIndex::EarlyHighPass.index()), 20.0);
    // Not overridden: size 4 × tonality 0.
    assert_eq!(hall.get_parameter_value(ParamIndex::LateLowPass.index()), 2000.0);

    assert_eq!(config.shared().capacity(), 16);
}

#[test]
fn override_values_are_clamped_like_host_writes() {
    let config = HallConfig::from_toml_str("[overrides]\nl_delay = 250.0\n").unwrap();
    let hall = config.build().unwrap();
    assert_eq!(hall.get_parameter_value(ParamIndex::LatePredelay.index()), 100.0);
}

#[test]
fn missing_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = HallConfig::load(&path).unwrap_err();
    assert!(matches!(err, HallError::ConfigRead { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[macros\nsize = 1").unwrap();
    let err = HallConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, HallError::ConfigParse(_)));
}

#[test]
fn serialized_config_parses_back() {
    let mut config = HallConfig::default();
    config.macros.presence = 4;
    config.overrides.insert("spin".into(), 1.5);
    let text = toml::to_string(&config).unwrap();
    assert_eq!(HallConfig::from_toml_str(&text).unwrap(), config);
}
