use playql::PlayqlError;
use playql::engine::{GrammarMode, QueryEngine};
use playql::grammar::Position;
use playql::record::{Playlist, Song, Value};

fn playlist() -> Playlist {
    [
        Song::new("Seven", "Jung Kook", 2023, 7, 14, 1000, 125, "B", "Major").unwrap(),
        Song::new("Flowers", "Miley Cyrus", 2023, 1, 12, 2000, 118, "", "Major").unwrap(),
        Song::new("Cruel Summer", "Taylor Swift", 2019, 8, 23, 3000, 170, "", "Major").unwrap(),
    ]
    .into_iter()
    .collect()
}

fn engine(mode: GrammarMode) -> QueryEngine {
    QueryEngine::for_record::<Song>(mode).unwrap()
}

#[test]
fn enforced_is_the_default_mode() {
    assert_eq!(GrammarMode::default(), GrammarMode::Enforced);
}

#[test]
fn executes_an_accepted_query() {
    let outcome = engine(GrammarMode::Enforced)
        .execute(
            "SELECT track_name, streams FROM playlist WHERE released_year = 2023 AND streams > 1500",
            &playlist(),
        )
        .unwrap();
    assert!(outcome.verdict.is_accepted());
    assert_eq!(outcome.columns(), &["track_name".to_string(), "streams".to_string()]);
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].get("track_name"), Some(&Value::Text("Flowers".into())));
    assert_eq!(outcome.rows[0].get("streams"), Some(&Value::Integer(2000)));
}

#[test]
fn enforced_mode_stops_rejected_commands() {
    let engine = engine(GrammarMode::Enforced);
    let err = engine
        .execute("SELECT loudness FROM playlist WHERE bpm > 1", &playlist())
        .unwrap_err();
    assert_eq!(
        err,
        PlayqlError::Grammar {
            command: "SELECT loudness FROM playlist WHERE bpm > 1".to_string(),
            reason: "rejected by the query grammar".to_string(),
        }
    );
}

#[test]
fn advisory_mode_reports_the_verdict_and_runs_anyway() {
    let outcome = engine(GrammarMode::Advisory)
        .execute("SELECT track_name, loudness FROM playlist WHERE bpm >= 170", &playlist())
        .unwrap();
    assert!(!outcome.verdict.is_accepted());
    assert_eq!(outcome.rows.len(), 1);
    assert!(outcome.rows[0].contains("loudness"));
    assert_eq!(outcome.rows[0].get("loudness"), None);
}

#[test]
fn advisory_mode_still_surfaces_compile_errors() {
    let engine = engine(GrammarMode::Advisory);
    let err = engine
        .execute("SELECT bpm FROM playlist WHERE bpm 100", &playlist())
        .unwrap_err();
    assert_eq!(
        err,
        PlayqlError::ConditionSyntax {
            fragment: "bpm 100".to_string()
        }
    );
    let err = engine.execute("SELECT bpm FROM playlist", &playlist()).unwrap_err();
    assert!(matches!(err, PlayqlError::Grammar { .. }));
}

#[test]
fn a_failed_query_leaves_the_next_one_alone() {
    let engine = engine(GrammarMode::Enforced);
    let songs = playlist();
    let results: Vec<_> = [
        "SELECT bpm FROM playlist WHERE bpm 1",
        "SELECT track_name FROM playlist WHERE artist = 'Taylor Swift'",
    ]
    .iter()
    .map(|command| engine.execute(command, &songs))
    .collect();
    assert!(results[0].is_err());
    let outcome = results[1].as_ref().unwrap();
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(
        outcome.rows[0].get("track_name"),
        Some(&Value::Text("Cruel Summer".into()))
    );
    assert_eq!(songs.len(), 3);
}

#[test]
fn compile_returns_the_trace_with_the_predicate() {
    let (verdict, predicate) = engine(GrammarMode::Enforced)
        .compile("SELECT bpm FROM playlist WHERE key = 'B'")
        .unwrap();
    let trace = verdict.trace().unwrap();
    assert_eq!(trace[0], (Position::Start, "SELECT".to_string()));
    assert_eq!(predicate.fields, vec!["bpm"]);
    assert!(predicate.conditions.contains_key("key"));
}

#[test]
fn empty_store_yields_no_rows() {
    let outcome = engine(GrammarMode::Enforced)
        .execute("SELECT bpm FROM playlist WHERE bpm > 0", &Playlist::new())
        .unwrap();
    assert!(outcome.rows.is_empty());
}

#[test]
fn enforced_query_with_an_apostrophe_keeps_every_condition() {
    let songs: Playlist = [
        Song::new("Don't Stop", "Fleetwood Mac", 1977, 7, 1, 10, 119, "A", "Major").unwrap(),
        Song::new("Don't Stop", "Someone New", 2023, 3, 3, 20, 100, "B", "Minor").unwrap(),
    ]
    .into_iter()
    .collect();
    let outcome = engine(GrammarMode::Enforced)
        .execute(
            "SELECT track_name, artist FROM playlist WHERE track_name = Don't Stop AND released_year = 2023",
            &songs,
        )
        .unwrap();
    assert!(outcome.verdict.is_accepted());
    assert_eq!(outcome.predicate.conditions.len(), 2);
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(
        outcome.rows[0].get("artist"),
        Some(&Value::Text("Someone New".into()))
    );
}
