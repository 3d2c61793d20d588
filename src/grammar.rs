//! The accepted shape of a query command, expressed as automaton tables.
//!
//! Raw commands are lexed into tokens (quoted literals stay whole, operators
//! and commas stand alone) and each token is classified into a grammar symbol
//! before it is handed to the [`Automaton`]:
//! * keywords `SELECT`, `FROM`, `WHERE`, `AND`, `OR` (any case) map to their
//!   upper case spelling,
//! * operators and `,` map to themselves,
//! * names of the record schema map to themselves,
//! * everything else (numbers, quoted text, source names) maps to [`VALUE`].
use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::automaton::{Automaton, Verdict};
use crate::error::{PlayqlError, Result};
use crate::record::Record;

/// Symbol standing for any literal or free-form name.
pub const VALUE: &str = "<value>";
pub const COMMA: &str = ",";
pub const KEYWORDS: [&str; 5] = ["SELECT", "FROM", "WHERE", "AND", "OR"];
pub const OPERATORS: [&str; 6] = [">=", "<=", "!=", "=", "<", ">"];

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"'[^']*'|>=|<=|!=|=|<|>|,|[^\s,=<>!']+|\S").unwrap();
    static ref ATTRIBUTE_NAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Grammar positions, in the order a well formed command visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Position {
    Start,
    SelectClause,
    AttributeList,
    FromClause,
    SourceName,
    WhereClause,
    Condition,
    OperatorApplied,
    Accept,
}

impl Position {
    pub const ALL: [Position; 9] = [
        Position::Start,
        Position::SelectClause,
        Position::AttributeList,
        Position::FromClause,
        Position::SourceName,
        Position::WhereClause,
        Position::Condition,
        Position::OperatorApplied,
        Position::Accept,
    ];
}

#[derive(Debug, Clone)]
pub struct Grammar {
    automaton: Automaton<Position>,
    attributes: BTreeSet<String>,
}

impl Grammar {
    /// Builds the grammar for the given attribute vocabulary. Names must be
    /// plain identifiers and must not collide with a keyword.
    pub fn new<N: AsRef<str>>(attributes: impl IntoIterator<Item = N>) -> Result<Self> {
        let mut names = BTreeSet::new();
        for name in attributes {
            let name = name.as_ref();
            if !ATTRIBUTE_NAME.is_match(name) {
                return Err(PlayqlError::Automaton(format!(
                    "attribute `{}` is not an identifier",
                    name
                )));
            }
            if keyword(name).is_some() {
                return Err(PlayqlError::Automaton(format!(
                    "attribute `{}` collides with a keyword",
                    name
                )));
            }
            names.insert(name.to_string());
        }

        use Position::*;
        let mut transitions: Vec<(Position, String, Position)> = vec![
            (Start, "SELECT".into(), SelectClause),
            (AttributeList, COMMA.into(), SelectClause),
            (AttributeList, "FROM".into(), FromClause),
            (FromClause, VALUE.into(), SourceName),
            (SourceName, "WHERE".into(), WhereClause),
            (OperatorApplied, VALUE.into(), Accept),
            // unquoted text may span several tokens
            (Accept, VALUE.into(), Accept),
            (Accept, "AND".into(), WhereClause),
            (Accept, "OR".into(), WhereClause),
        ];
        for operator in OPERATORS {
            transitions.push((Condition, operator.into(), OperatorApplied));
        }
        for name in &names {
            transitions.push((SelectClause, name.clone(), AttributeList));
            transitions.push((FromClause, name.clone(), SourceName));
            transitions.push((WhereClause, name.clone(), Condition));
            transitions.push((OperatorApplied, name.clone(), Accept));
            // a schema name may also be a word of an unquoted literal
            transitions.push((Accept, name.clone(), Accept));
        }

        let alphabet = KEYWORDS
            .iter()
            .chain(OPERATORS.iter())
            .map(|s| s.to_string())
            .chain([COMMA.to_string(), VALUE.to_string()])
            .chain(names.iter().cloned());
        let automaton = Automaton::new(Position::ALL, alphabet, Start, [Accept], transitions)?;
        debug!(
            attributes = names.len(),
            transitions = automaton.transition_count(),
            "query grammar built"
        );
        Ok(Self {
            automaton,
            attributes: names,
        })
    }

    /// The grammar over the attribute names of `R`.
    pub fn for_record<R: Record>() -> Result<Self> {
        Self::new(R::attribute_names())
    }

    /// Splits a raw command into lexical tokens.
    pub fn tokenize(command: &str) -> Vec<&str> {
        TOKEN.find_iter(command).map(|m| m.as_str()).collect()
    }

    /// Maps one lexical token onto the automaton alphabet.
    pub fn classify<'t>(&self, token: &'t str) -> &'t str {
        if let Some(keyword) = keyword(token) {
            return keyword;
        }
        if token == COMMA || OPERATORS.contains(&token) || self.attributes.contains(token) {
            return token;
        }
        VALUE
    }

    pub fn symbols<'t>(&self, command: &'t str) -> Vec<&'t str> {
        Self::tokenize(command)
            .into_iter()
            .map(|token| self.classify(token))
            .collect()
    }

    /// Runs the grammar automaton over the command.
    pub fn check(&self, command: &str) -> Verdict<Position> {
        self.automaton.accepts(&self.symbols(command))
    }

    pub fn automaton(&self) -> &Automaton<Position> {
        &self.automaton
    }
    pub fn attributes(&self) -> &BTreeSet<String> {
        &self.attributes
    }
}

fn keyword(token: &str) -> Option<&'static str> {
    KEYWORDS
        .into_iter()
        .find(|keyword| keyword.eq_ignore_ascii_case(token))
}
