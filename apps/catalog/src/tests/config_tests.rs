use std::{collections::HashMap, io::Write};

use super::*;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn defaults_match_simulated_latency_window() {
    let settings = Settings::default();
    assert_eq!(settings.min_delay_ms, 2_000);
    assert_eq!(settings.max_delay_ms, 60_000);
    assert!(settings.forward_logs);
    assert_eq!(settings.products_file, None);
}

#[test]
fn reads_partial_config_file_over_defaults() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "base_url = \"https://shop.example\"").expect("write");
    writeln!(file, "max_delay_ms = 6000").expect("write");

    let settings = read_config_file(file.path()).expect("parse");
    assert_eq!(settings.base_url, "https://shop.example");
    assert_eq!(settings.max_delay_ms, 6_000);
    assert_eq!(settings.min_delay_ms, 2_000);
}

#[test]
fn explicit_missing_config_file_is_an_error() {
    let err = load_settings(Some(Path::new("/no/such/catalog.toml"))).expect_err("missing");
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn malformed_config_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "min_delay_ms = \"soon\"").expect("write");

    assert!(read_config_file(file.path()).is_err());
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let settings = apply_env(
        Settings::default(),
        env_from(&[
            ("CATALOG_BASE_URL", "http://plain:1"),
            ("APP__BASE_URL", "http://prefixed:2"),
            ("APP__MIN_DELAY_MS", "100"),
            ("APP__MAX_DELAY_MS", "not-a-number"),
            ("APP__FORWARD_LOGS", "off"),
            ("APP__RNG_SEED", "9"),
            ("APP__PRODUCTS_FILE", "fixtures/products.json"),
        ]),
    );

    assert_eq!(settings.base_url, "http://prefixed:2");
    assert_eq!(settings.min_delay_ms, 100);
    assert_eq!(settings.max_delay_ms, 60_000);
    assert!(!settings.forward_logs);
    assert_eq!(settings.rng_seed, Some(9));
    assert_eq!(
        settings.products_file,
        Some(PathBuf::from("fixtures/products.json"))
    );
}
