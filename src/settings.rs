//! Runtime settings for the `playql` binary, read with the `config` crate.
//!
//! Settings come from an optional file (`playql.toml`, `playql.json`, ... in
//! the working directory, or an explicit path). Every key has a default, so
//! running without any file works.
use std::path::PathBuf;

use config::{Config, File};
use serde::Deserialize;

use crate::engine::GrammarMode;
use crate::error::Result;

pub const DEFAULT_SETTINGS_NAME: &str = "playql";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_file: PathBuf,
    pub grammar_mode: GrammarMode,
    pub output: OutputFormat,
    pub log_filter: String,
    pub queries: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("spotify-2023.csv"),
            grammar_mode: GrammarMode::Enforced,
            output: OutputFormat::Text,
            log_filter: "info".to_string(),
            queries: vec![
                "SELECT track_name, artist FROM playlist WHERE released_day = 17 AND released_year = 2023"
                    .to_string(),
            ],
        }
    }
}

impl Settings {
    /// Loads settings from `path` when given (the file must then exist),
    /// otherwise from an optional `playql.*` file in the working directory.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let source = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name(DEFAULT_SETTINGS_NAME).required(false),
        };
        let settings = Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }
}
