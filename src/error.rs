//! Crate wide error type.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayqlError {
    /// The command does not have the SELECT/FROM/WHERE shape, or the grammar
    /// automaton rejected it.
    #[error("Grammar error in `{command}`: {reason}")]
    Grammar { command: String, reason: String },
    /// A WHERE fragment contains none of the recognized operators.
    #[error("Unsupported condition: {fragment}")]
    ConditionSyntax { fragment: String },
    /// A source row could not be turned into a record.
    #[error("Cannot construct record from field `{field}`: {message}")]
    Construction { field: String, message: String },
    /// An automaton table refers to a state it does not declare.
    #[error("Invalid automaton: {0}")]
    Automaton(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, PlayqlError>;

impl PlayqlError {
    pub fn grammar(command: &str, reason: impl Into<String>) -> Self {
        Self::Grammar {
            command: command.to_string(),
            reason: reason.into(),
        }
    }
    pub fn construction(field: &str, message: impl Into<String>) -> Self {
        Self::Construction {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// Helper conversions
impl From<std::io::Error> for PlayqlError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
impl From<config::ConfigError> for PlayqlError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
