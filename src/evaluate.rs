//! Scans records against a compiled predicate and projects the matches.
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::compiler::{CompiledPredicate, Conditions, Literal, Operator};
use crate::record::{Record, Value};

/// Ordered field -> value mapping built from one matching record. A field the
/// record does not have is kept with a void (`None`) value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Projection {
    entries: Vec<(String, Option<Value>)>,
}

impl Projection {
    /// Value of `field`, `None` when the field is void or was not selected.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, value)| value.as_ref())
    }
    pub fn contains(&self, field: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == field)
    }
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    // the first occurrence of a field keeps its position
    fn insert(&mut self, field: &str, value: Option<Value>) {
        if !self.contains(field) {
            self.entries.push((field.to_string(), value));
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                Some(Value::Text(s)) => write!(f, "{}: '{}'", name, s)?,
                Some(v) => write!(f, "{}: {}", name, v)?,
                None => write!(f, "{}: null", name)?,
            }
        }
        write!(f, "}}")
    }
}

impl Serialize for Projection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Applies `operator` between a record value and a literal. Only integers
/// compare with integers and text with text; any other pairing never holds.
pub fn compare(value: &Value, operator: Operator, literal: &Literal) -> bool {
    let ordering = match (value, literal) {
        (Value::Integer(v), Literal::Integer(l)) => v.cmp(l),
        (Value::Text(v), Literal::Text(l)) => v.as_str().cmp(l.as_str()),
        _ => return false,
    };
    operator.holds(ordering)
}

/// True when every condition holds for the record. A condition on an
/// attribute the record lacks fails the match.
pub fn matches<R: Record>(record: &R, conditions: &Conditions) -> bool {
    conditions.iter().all(|(attribute, condition)| {
        record
            .attribute(attribute)
            .is_some_and(|value| compare(&value, condition.operator, &condition.literal))
    })
}

pub fn project<R: Record>(record: &R, fields: &[String]) -> Projection {
    let mut projection = Projection::default();
    for field in fields {
        projection.insert(field, record.attribute(field));
    }
    projection
}

/// Projections of the matching records, in store order.
pub fn evaluate<'r, R, I>(predicate: &CompiledPredicate, records: I) -> Vec<Projection>
where
    R: Record + 'r,
    I: IntoIterator<Item = &'r R>,
{
    records
        .into_iter()
        .filter(|record| matches(*record, &predicate.conditions))
        .map(|record| project(record, &predicate.fields))
        .collect()
}
