//! Front door for running query commands against a record store.
//!
//! The engine owns an immutable [`Grammar`] and decides, according to its
//! [`GrammarMode`], whether the grammar verdict gates compilation or is only
//! reported alongside the results.
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::automaton::Verdict;
use crate::compiler::{compile, CompiledPredicate};
use crate::error::{PlayqlError, Result};
use crate::evaluate::{evaluate, Projection};
use crate::grammar::{Grammar, Position};
use crate::record::{Record, RecordStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrammarMode {
    /// A rejected command fails with a grammar error before compilation.
    #[default]
    Enforced,
    /// The verdict is computed and logged; compilation proceeds regardless.
    Advisory,
}

#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub verdict: Verdict<Position>,
    pub predicate: CompiledPredicate,
    pub rows: Vec<Projection>,
}

impl QueryOutcome {
    /// The selected field names, in SELECT order.
    pub fn columns(&self) -> &[String] {
        &self.predicate.fields
    }
}

#[derive(Debug, Clone)]
pub struct QueryEngine {
    grammar: Grammar,
    mode: GrammarMode,
}

impl QueryEngine {
    pub fn new(grammar: Grammar, mode: GrammarMode) -> Self {
        Self { grammar, mode }
    }

    /// An engine whose grammar is built from the schema of `R`.
    pub fn for_record<R: Record>(mode: GrammarMode) -> Result<Self> {
        Ok(Self::new(Grammar::for_record::<R>()?, mode))
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
    pub fn mode(&self) -> GrammarMode {
        self.mode
    }

    pub fn check(&self, command: &str) -> Verdict<Position> {
        self.grammar.check(command)
    }

    /// Checks the command against the grammar and compiles it.
    pub fn compile(&self, command: &str) -> Result<(Verdict<Position>, CompiledPredicate)> {
        let verdict = self.check(command);
        if !verdict.is_accepted() {
            match self.mode {
                GrammarMode::Enforced => {
                    return Err(PlayqlError::grammar(command, "rejected by the query grammar"));
                }
                GrammarMode::Advisory => {
                    warn!(command, "grammar rejected the command, compiling anyway");
                }
            }
        }
        debug!(%verdict, "grammar verdict");
        Ok((verdict, compile(command)?))
    }

    pub fn execute<R: Record>(&self, command: &str, store: &RecordStore<R>) -> Result<QueryOutcome> {
        let (verdict, predicate) = self.compile(command)?;
        let rows = evaluate(&predicate, store);
        info!(
            source = %predicate.source,
            scanned = store.len(),
            matched = rows.len(),
            "query complete"
        );
        Ok(QueryOutcome {
            verdict,
            predicate,
            rows,
        })
    }
}
