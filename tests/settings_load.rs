use std::fs;
use std::path::PathBuf;

use playql::PlayqlError;
use playql::engine::GrammarMode;
use playql::settings::{OutputFormat, Settings};

#[test]
fn defaults_run_the_reference_query() {
    let settings = Settings::default();
    assert_eq!(settings.data_file, PathBuf::from("spotify-2023.csv"));
    assert_eq!(settings.grammar_mode, GrammarMode::Enforced);
    assert_eq!(settings.output, OutputFormat::Text);
    assert_eq!(settings.log_filter, "info");
    assert_eq!(
        settings.queries,
        vec![
            "SELECT track_name, artist FROM playlist WHERE released_day = 17 AND released_year = 2023"
        ]
    );
}

#[test]
fn file_values_override_defaults() {
    let path = std::env::temp_dir().join(format!("playql-settings-{}.json", std::process::id()));
    fs::write(
        &path,
        r#"{
            "data_file": "charts.csv",
            "grammar_mode": "advisory",
            "output": "json",
            "queries": ["SELECT bpm FROM playlist WHERE bpm > 100"]
        }"#,
    )
    .unwrap();
    let loaded = Settings::load(path.to_str());
    fs::remove_file(&path).unwrap();
    let settings = loaded.unwrap();
    assert_eq!(settings.data_file, PathBuf::from("charts.csv"));
    assert_eq!(settings.grammar_mode, GrammarMode::Advisory);
    assert_eq!(settings.output, OutputFormat::Json);
    assert_eq!(settings.log_filter, "info");
    assert_eq!(settings.queries, vec!["SELECT bpm FROM playlist WHERE bpm > 100"]);
}

#[test]
fn explicit_missing_file_is_a_config_error() {
    let err = Settings::load(Some("/definitely/not/here/playql.toml")).unwrap_err();
    assert!(matches!(err, PlayqlError::Config(_)));
}
