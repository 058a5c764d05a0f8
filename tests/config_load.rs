use std::time::Duration;

use bandmap::{
    config::{BandmapConfig, ConfigError},
    engine::weights::Weights,
    types::Band,
};

#[test]
fn missing_fields_take_defaults() {
    let config = BandmapConfig::from_json_str(r#"{ "max_age_secs": 120, "weights": { "spots": 0.5 } }"#)
        .expect("config");

    assert_eq!(config.bands, Band::CONTEST_BANDS.to_vec());
    assert_eq!(config.max_age(), Duration::from_secs(120));
    assert_eq!(config.weights.spots, 0.5);
    assert_eq!(config.weights.age_seconds, Weights::default().age_seconds);
}

#[test]
fn band_list_is_read_in_order() {
    let config = BandmapConfig::from_json_str(r#"{ "bands": ["B20m", "B40m"] }"#).expect("config");
    assert_eq!(config.bands, vec![Band::B20m, Band::B40m]);
}

#[test]
fn unusable_configs_are_rejected() {
    assert!(matches!(
        BandmapConfig::from_json_str(r#"{ "bands": [] }"#),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        BandmapConfig::from_json_str(r#"{ "max_age_secs": 0 }"#),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        BandmapConfig::from_json_str("{ not json"),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn bands_serialize_by_name() {
    let json = serde_json::to_string(&BandmapConfig::default().bands).expect("serialize");
    assert_eq!(json, r#"["B160m","B80m","B40m","B20m","B15m","B10m"]"#);
}
