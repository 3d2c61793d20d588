//! Turns a `SELECT <fields> FROM <source> WHERE <conditions>` command into a
//! [`CompiledPredicate`].
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{PlayqlError, Result};

lazy_static! {
    static ref QUERY_SHAPE: Regex =
        Regex::new(r"(?is)^\s*SELECT\s+(.+?)\s+FROM\s+(\S+)\s+WHERE\s+(.+?)\s*$").unwrap();
    static ref CONNECTIVE: Regex = Regex::new(r"(?i)\s+(AND|OR)\s+").unwrap();
    // same pairing as the grammar lexer: a lone quote opens nothing
    static ref QUOTED: Regex = Regex::new(r"'[^']*'").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Operator {
    /// Order in which a condition is scanned for operators. Two character
    /// operators come before their one character prefixes.
    pub const SCAN_ORDER: [Operator; 6] = [
        Operator::Ge,
        Operator::Le,
        Operator::Ne,
        Operator::Gt,
        Operator::Lt,
        Operator::Eq,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }

    /// Whether `left <op> right` holds given how `left` orders against `right`.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Le => ordering != Ordering::Greater,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Ge => ordering != Ordering::Less,
        }
    }
}
impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Integer(i64),
    Text(String),
}

impl Literal {
    /// Digit-only text becomes an integer, anything else (including digits
    /// too large for an `i64`) stays text.
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(i) = raw.parse::<i64>() {
                return Literal::Integer(i);
            }
        }
        Literal::Text(raw.to_string())
    }
}
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Text(s) => write!(f, "'{}'", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub operator: Operator,
    pub literal: Literal,
}

/// Conditions keyed by attribute. A later condition on the same attribute
/// replaces an earlier one.
pub type Conditions = BTreeMap<String, Condition>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPredicate {
    pub source: String,
    pub fields: Vec<String>,
    pub conditions: Conditions,
}

impl fmt::Display for CompiledPredicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] from {} where", self.fields.join(", "), self.source)?;
        let mut first = true;
        for (attribute, condition) in &self.conditions {
            if !first {
                write!(f, " and")?;
            }
            write!(f, " {} {} {}", attribute, condition.operator, condition.literal)?;
            first = false;
        }
        Ok(())
    }
}

/// Compiles a command. The source name is taken as given; attribute names are
/// not checked here, unknown ones simply never match during evaluation.
///
/// `AND` and `OR` are both read as conjunction.
pub fn compile(command: &str) -> Result<CompiledPredicate> {
    let captures = QUERY_SHAPE.captures(command).ok_or_else(|| {
        PlayqlError::grammar(command, "expected SELECT <fields> FROM <source> WHERE <conditions>")
    })?;
    let (fields, source, conditions) = match (captures.get(1), captures.get(2), captures.get(3)) {
        (Some(f), Some(s), Some(c)) => (f.as_str(), s.as_str(), c.as_str()),
        _ => return Err(PlayqlError::grammar(command, "incomplete command")),
    };
    let predicate = CompiledPredicate {
        source: source.to_string(),
        fields: fields.split(',').map(|field| field.trim().to_string()).collect(),
        conditions: parse_conditions(conditions)?,
    };
    debug!(%predicate, "compiled");
    Ok(predicate)
}

/// Parses the WHERE payload into conditions.
pub fn parse_conditions(payload: &str) -> Result<Conditions> {
    let mut conditions = Conditions::new();
    for fragment in split_connectives(payload) {
        let (attribute, condition) = parse_condition(fragment)?;
        conditions.insert(attribute, condition);
    }
    Ok(conditions)
}

fn parse_condition(fragment: &str) -> Result<(String, Condition)> {
    for operator in Operator::SCAN_ORDER {
        if let Some(at) = find_unquoted(fragment, operator.symbol()) {
            let attribute = fragment[..at].trim();
            let literal = fragment[at + operator.symbol().len()..].trim().trim_matches('\'');
            return Ok((
                attribute.to_string(),
                Condition {
                    operator,
                    literal: Literal::parse(literal),
                },
            ));
        }
    }
    Err(PlayqlError::ConditionSyntax {
        fragment: fragment.trim().to_string(),
    })
}

/// Splits on `AND`/`OR` occurring outside single quotes.
fn split_connectives(payload: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut from = 0;
    for connective in CONNECTIVE.captures_iter(payload) {
        let (Some(whole), Some(word)) = (connective.get(0), connective.get(1)) else {
            continue;
        };
        if quoted_at(payload, whole.start()) {
            continue;
        }
        if word.as_str().eq_ignore_ascii_case("OR") {
            warn!(condition = payload, "OR is evaluated as AND");
        }
        fragments.push(&payload[from..whole.start()]);
        from = whole.end();
    }
    fragments.push(&payload[from..]);
    fragments
}

fn find_unquoted(fragment: &str, needle: &str) -> Option<usize> {
    fragment
        .match_indices(needle)
        .map(|(at, _)| at)
        .find(|at| !quoted_at(fragment, *at))
}

// inside a closed '...' span
fn quoted_at(text: &str, at: usize) -> bool {
    QUOTED
        .find_iter(text)
        .take_while(|span| span.start() < at)
        .any(|span| at < span.end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connectives_inside_quotes_are_kept() {
        let fragments = split_connectives("artist = 'Simon and Garfunkel' and bpm > 90");
        assert_eq!(fragments, vec!["artist = 'Simon and Garfunkel'", "bpm > 90"]);
    }

    #[test]
    fn apostrophes_do_not_open_quotes() {
        let fragments = split_connectives("track_name = Don't Stop and released_year = 2023");
        assert_eq!(fragments, vec!["track_name = Don't Stop", "released_year = 2023"]);
        assert!(!quoted_at("Guns N' Roses = x", 14));
        assert!(quoted_at("a = 'b<c' ", 6));
    }

    #[test]
    fn operators_inside_quotes_are_skipped() {
        let (attribute, condition) = parse_condition("track_name = 'a<b'").unwrap();
        assert_eq!(attribute, "track_name");
        assert_eq!(condition.operator, Operator::Eq);
        assert_eq!(condition.literal, Literal::Text("a<b".into()));
    }

    #[test]
    fn holds_follows_ordering() {
        assert!(Operator::Le.holds(Ordering::Equal));
        assert!(!Operator::Lt.holds(Ordering::Equal));
        assert!(Operator::Ne.holds(Ordering::Less));
    }
}
