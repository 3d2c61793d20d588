//! Nondeterministic finite automaton over explicit state/transition tables.
//!
//! Acceptance is decided by subset simulation: the run tracks the set of all
//! states reachable after each token. The tables are never mutated by a run,
//! so a single automaton can be shared (e.g. behind an `Arc`) and queried from
//! many threads at once.
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::{BuildHasherDefault, Hash};

use seahash::SeaHasher;
use tracing::{debug, trace};

use crate::error::{PlayqlError, Result};

pub type TableHasher = BuildHasherDefault<SeaHasher>;

type Destinations<S> = HashSet<S, TableHasher>;

/// Anything usable as an automaton state. States are ordered so that the set
/// of live states, and with it the trace, comes out the same on every run.
pub trait State: Clone + Eq + Hash + Ord + fmt::Debug {}
impl<T: Clone + Eq + Hash + Ord + fmt::Debug> State for T {}

/// Outcome of a run. Rejection is an ordinary result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<S> {
    Accepted { trace: Vec<(S, String)> },
    Rejected,
}

impl<S> Verdict<S> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }
    pub fn trace(&self) -> Option<&[(S, String)]> {
        match self {
            Verdict::Accepted { trace } => Some(trace),
            Verdict::Rejected => None,
        }
    }
}

impl<S: fmt::Debug> fmt::Display for Verdict<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Verdict::Accepted { trace } => {
                write!(f, "accept")?;
                for (state, symbol) in trace {
                    write!(f, " ({:?}, {})", state, symbol)?;
                }
                Ok(())
            }
            Verdict::Rejected => write!(f, "reject"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Automaton<S: State> {
    states: HashSet<S, TableHasher>,
    alphabet: HashSet<String, TableHasher>,
    start: S,
    accept: HashSet<S, TableHasher>,
    // state -> symbol -> destinations
    transitions: HashMap<S, HashMap<String, Destinations<S>, TableHasher>, TableHasher>,
}

impl<S: State> Automaton<S> {
    /// Builds an automaton and checks that the start state, every accept
    /// state and both ends of every transition are declared in `states`.
    pub fn new<Y>(
        states: impl IntoIterator<Item = S>,
        alphabet: impl IntoIterator<Item = Y>,
        start: S,
        accept: impl IntoIterator<Item = S>,
        transitions: impl IntoIterator<Item = (S, Y, S)>,
    ) -> Result<Self>
    where
        Y: Into<String>,
    {
        let states: HashSet<S, TableHasher> = states.into_iter().collect();
        if !states.contains(&start) {
            return Err(PlayqlError::Automaton(format!(
                "start state {:?} is not a declared state",
                start
            )));
        }
        let accept: HashSet<S, TableHasher> = accept.into_iter().collect();
        if let Some(stray) = accept.iter().find(|s| !states.contains(*s)) {
            return Err(PlayqlError::Automaton(format!(
                "accept state {:?} is not a declared state",
                stray
            )));
        }
        let mut automaton = Self {
            states,
            alphabet: alphabet.into_iter().map(Into::into).collect(),
            start,
            accept,
            transitions: HashMap::default(),
        };
        for (from, symbol, to) in transitions {
            automaton.add_transition(from, symbol, to)?;
        }
        Ok(automaton)
    }

    /// Inserts `to` into the destination set of `(from, symbol)`, creating the
    /// set when absent. Returns `false` when the transition already existed.
    pub fn add_transition(&mut self, from: S, symbol: impl Into<String>, to: S) -> Result<bool> {
        for state in [&from, &to] {
            if !self.states.contains(state) {
                return Err(PlayqlError::Automaton(format!(
                    "transition uses undeclared state {:?}",
                    state
                )));
            }
        }
        let symbol = symbol.into();
        if !self.alphabet.contains(&symbol) {
            // the alphabet is informational only
            trace!(symbol = %symbol, "transition symbol outside the declared alphabet");
        }
        Ok(self
            .transitions
            .entry(from)
            .or_default()
            .entry(symbol)
            .or_default()
            .insert(to))
    }

    /// Runs the automaton over an already tokenized input.
    pub fn accepts<T: AsRef<str>>(&self, tokens: &[T]) -> Verdict<S> {
        let mut current: BTreeSet<&S> = BTreeSet::new();
        current.insert(&self.start);
        let mut trace = Vec::new();
        for (position, token) in tokens.iter().enumerate() {
            let symbol = token.as_ref();
            let mut next: BTreeSet<&S> = BTreeSet::new();
            for state in &current {
                if let Some(destinations) = self.destinations(state, symbol) {
                    next.extend(destinations.iter());
                    trace.push(((*state).clone(), symbol.to_string()));
                }
            }
            if next.is_empty() {
                debug!(position, symbol, "no live states left, rejecting");
                return Verdict::Rejected;
            }
            current = next;
        }
        if current.iter().any(|state| self.accept.contains(*state)) {
            Verdict::Accepted { trace }
        } else {
            debug!(live = ?current, "input exhausted outside the accept states");
            Verdict::Rejected
        }
    }

    /// Splits `input` on whitespace and runs the automaton over the pieces.
    /// Quoted text is not treated specially.
    pub fn accepts_str(&self, input: &str) -> Verdict<S> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        self.accepts(&tokens)
    }

    pub fn destinations(&self, state: &S, symbol: &str) -> Option<&HashSet<S, TableHasher>> {
        self.transitions.get(state)?.get(symbol)
    }
    pub fn start(&self) -> &S {
        &self.start
    }
    pub fn states(&self) -> &HashSet<S, TableHasher> {
        &self.states
    }
    pub fn alphabet(&self) -> &HashSet<String, TableHasher> {
        &self.alphabet
    }
    pub fn is_accepting(&self, state: &S) -> bool {
        self.accept.contains(state)
    }
    /// Number of distinct `(state, symbol, destination)` triples.
    pub fn transition_count(&self) -> usize {
        self.transitions
            .values()
            .flat_map(|by_symbol| by_symbol.values())
            .map(|destinations| destinations.len())
            .sum()
    }
}
