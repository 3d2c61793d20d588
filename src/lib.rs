//! Playql – a nondeterministic finite automaton and a small query language
//! over in-memory records.
//!
//! Playql answers commands of the form
//! `SELECT <fields> FROM <source> WHERE <conditions>` against a collection of
//! typed records (songs, out of the box). Two pieces do the work:
//! * An [`automaton::Automaton`] simulates a nondeterministic finite automaton
//!   over explicit state/transition tables and yields a [`automaton::Verdict`].
//! * A query front-end [`compiler::compile`]s the command into a
//!   [`compiler::CompiledPredicate`] which [`evaluate::evaluate`] runs against
//!   the records, producing one [`evaluate::Projection`] per match.
//!
//! The [`grammar::Grammar`] is an automaton instance describing the accepted
//! command shape. It is built from the attribute names of a
//! [`record::Record`] type, so grammar and schema cannot drift apart. The
//! [`engine::QueryEngine`] ties everything together and, depending on its
//! [`engine::GrammarMode`], lets the grammar verdict gate compilation.
//!
//! ## Modules
//! * [`automaton`] – Subset simulation over state/transition tables.
//! * [`grammar`] – The query grammar as automaton tables, plus the lexer and
//!   token classifier feeding it.
//! * [`compiler`] – Operators, literals and the command compiler.
//! * [`record`] – Typed values, the [`record::Record`] trait, [`record::Song`]
//!   and the append-only [`record::RecordStore`].
//! * [`evaluate`] – Condition matching and field projection.
//! * [`engine`] – Grammar gate + compile + evaluate.
//! * [`ingest`] – Loading songs from comma separated text.
//! * [`settings`] – Configuration for the binary.
//!
//! ## Semantics worth knowing
//! * All conditions are combined by conjunction; `OR` behaves like `AND`.
//! * Digit-only literals are integers, everything else is text. Integers only
//!   compare with integer fields and text only with text fields.
//! * A condition on an unknown attribute matches nothing. An unknown field in
//!   the SELECT list is projected as a void value (when the grammar is not
//!   enforced; an enforced grammar rejects unknown names up front).
//!
//! ## Quick Start
//! ```
//! use playql::engine::{GrammarMode, QueryEngine};
//! use playql::record::{Playlist, Song, Value};
//!
//! let mut playlist = Playlist::new();
//! playlist.push(Song::new("Flowers", "Miley Cyrus", 2023, 1, 12, 1316855716, 118, "", "Major").unwrap());
//! playlist.push(Song::new("Anti-Hero", "Taylor Swift", 2022, 10, 21, 999748277, 97, "E", "Major").unwrap());
//!
//! let engine = QueryEngine::for_record::<Song>(GrammarMode::Enforced).unwrap();
//! let outcome = engine
//!     .execute("SELECT track_name FROM playlist WHERE released_year = 2023", &playlist)
//!     .unwrap();
//! assert_eq!(outcome.rows.len(), 1);
//! assert_eq!(outcome.rows[0].get("track_name"), Some(&Value::Text("Flowers".into())));
//! ```

pub mod automaton;
pub mod compiler;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod grammar;
pub mod ingest;
pub mod record;
pub mod settings;

pub use error::{PlayqlError, Result};
