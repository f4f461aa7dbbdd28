use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_point_at_local_catalog_api() {
    let settings = Settings::default();
    assert_eq!(settings.api_base_url, "http://localhost:5002/api");
    assert_eq!(settings.request_timeout(), Duration::from_secs(10));
    assert_eq!(settings.limits.row, 10);
    assert_eq!(settings.limits.grid, 12);
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r#"
api_base_url = "https://catalog.example.com/api"
request_timeout_secs = 3

[limits]
row = 6
"#,
    )
    .expect("parse");

    assert_eq!(settings.api_base_url, "https://catalog.example.com/api");
    assert_eq!(settings.request_timeout_secs, 3);
    assert_eq!(settings.limits.row, 6);
    assert_eq!(settings.limits.grid, 12);
}

#[test]
fn malformed_file_is_an_error() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, "request_timeout_secs = \"soon\"").is_err());
}

#[test]
fn app_prefixed_env_wins_over_plain_name() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        lookup_from(&[
            ("CATALOG_API_BASE_URL", "http://plain/api"),
            ("APP__API_BASE_URL", "http://prefixed/api"),
            ("APP__REQUEST_TIMEOUT_SECS", " 4 "),
        ]),
    );

    assert_eq!(settings.api_base_url, "http://prefixed/api");
    assert_eq!(settings.request_timeout_secs, 4);
}

#[test]
fn unparseable_env_timeout_is_ignored() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        lookup_from(&[("APP__REQUEST_TIMEOUT_SECS", "forever")]),
    );
    assert_eq!(settings.request_timeout_secs, 10);
}

#[test]
fn zero_timeout_is_raised_to_one_second() {
    let settings = Settings {
        request_timeout_secs: 0,
        ..Settings::default()
    };
    assert_eq!(settings.request_timeout(), Duration::from_secs(1));
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("browse_missing_{suffix}.toml"));

    let settings = load_settings(&path).expect("load");
    assert_eq!(settings.limits, SectionLimits::default());
}

#[test]
fn reads_config_file_from_disk() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("browse_config_{suffix}.toml"));
    fs::write(&path, "[limits]\ngrid = 3\n").expect("write");

    let settings = load_settings(&path).expect("load");
    assert_eq!(settings.limits.grid, 3);

    fs::remove_file(path).expect("cleanup");
}
