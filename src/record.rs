// used for the release date derived from year/month/day
use chrono::NaiveDate;
use serde::Serialize;

// used to print out readable forms of records and values
use std::fmt;
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{PlayqlError, Result};

/// A typed attribute value as read from a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Text(String),
    Date(NaiveDate),
}
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Name-keyed access to the typed fields of a fixed-schema record.
///
/// The attribute names double as the vocabulary of the query grammar, so a
/// record type and the grammar built for it cannot disagree about which
/// attributes exist.
pub trait Record {
    /// Attribute names in schema order.
    fn attribute_names() -> &'static [&'static str];
    /// `None` when the record has no attribute by that name.
    fn attribute(&self, name: &str) -> Option<Value>;
}

// ------------- Song -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    TrackName,
    Artist,
    ReleasedYear,
    ReleasedMonth,
    ReleasedDay,
    Streams,
    Bpm,
    Key,
    Mode,
    ReleasedDate,
}

const SONG_ATTRIBUTES: [&str; 10] = [
    "track_name",
    "artist",
    "released_year",
    "released_month",
    "released_day",
    "streams",
    "bpm",
    "key",
    "mode",
    "released_date",
];

impl Attribute {
    pub const ALL: [Attribute; 10] = [
        Attribute::TrackName,
        Attribute::Artist,
        Attribute::ReleasedYear,
        Attribute::ReleasedMonth,
        Attribute::ReleasedDay,
        Attribute::Streams,
        Attribute::Bpm,
        Attribute::Key,
        Attribute::Mode,
        Attribute::ReleasedDate,
    ];
    pub fn name(self) -> &'static str {
        SONG_ATTRIBUTES[self as usize]
    }
}
impl FromStr for Attribute {
    type Err = PlayqlError;
    fn from_str(name: &str) -> Result<Self> {
        Attribute::ALL
            .into_iter()
            .find(|attribute| attribute.name() == name)
            .ok_or_else(|| PlayqlError::construction(name, "unknown attribute"))
    }
}
impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    track_name: String,
    artist: String,
    released_year: i64,
    released_month: i64,
    released_day: i64,
    streams: i64,
    bpm: i64,
    key: String,
    mode: String,
    released_date: NaiveDate,
}

impl Song {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        track_name: impl Into<String>,
        artist: impl Into<String>,
        released_year: i64,
        released_month: i64,
        released_day: i64,
        streams: i64,
        bpm: i64,
        key: impl Into<String>,
        mode: impl Into<String>,
    ) -> Result<Self> {
        let released_date = release_date(released_year, released_month, released_day)?;
        Ok(Self {
            track_name: track_name.into(),
            artist: artist.into(),
            released_year,
            released_month,
            released_day,
            streams,
            bpm,
            key: key.into(),
            mode: mode.into(),
            released_date,
        })
    }

    /// Builds a song from a string-keyed row. Fails on the first missing
    /// field, non-integer numeric field, or impossible calendar date.
    pub fn from_fields(row: &HashMap<String, String>) -> Result<Self> {
        Self::new(
            text(row, Attribute::TrackName)?,
            text(row, Attribute::Artist)?,
            integer(row, Attribute::ReleasedYear)?,
            integer(row, Attribute::ReleasedMonth)?,
            integer(row, Attribute::ReleasedDay)?,
            integer(row, Attribute::Streams)?,
            integer(row, Attribute::Bpm)?,
            text(row, Attribute::Key)?,
            text(row, Attribute::Mode)?,
        )
    }

    pub fn get(&self, attribute: Attribute) -> Value {
        match attribute {
            Attribute::TrackName => Value::Text(self.track_name.clone()),
            Attribute::Artist => Value::Text(self.artist.clone()),
            Attribute::ReleasedYear => Value::Integer(self.released_year),
            Attribute::ReleasedMonth => Value::Integer(self.released_month),
            Attribute::ReleasedDay => Value::Integer(self.released_day),
            Attribute::Streams => Value::Integer(self.streams),
            Attribute::Bpm => Value::Integer(self.bpm),
            Attribute::Key => Value::Text(self.key.clone()),
            Attribute::Mode => Value::Text(self.mode.clone()),
            Attribute::ReleasedDate => Value::Date(self.released_date),
        }
    }
    pub fn track_name(&self) -> &str {
        &self.track_name
    }
    pub fn artist(&self) -> &str {
        &self.artist
    }
    pub fn streams(&self) -> i64 {
        self.streams
    }
    pub fn released_date(&self) -> NaiveDate {
        self.released_date
    }
}

impl Record for Song {
    fn attribute_names() -> &'static [&'static str] {
        &SONG_ATTRIBUTES
    }
    fn attribute(&self, name: &str) -> Option<Value> {
        name.parse::<Attribute>().ok().map(|attribute| self.get(attribute))
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} by {} ({}) - Streams: {}, BPM: {}, Key: {}, Mode: {}",
            self.track_name,
            self.artist,
            self.released_date.format("%Y-%m-%d"),
            self.streams,
            self.bpm,
            self.key,
            self.mode
        )
    }
}

fn text(row: &HashMap<String, String>, attribute: Attribute) -> Result<String> {
    row.get(attribute.name())
        .cloned()
        .ok_or_else(|| PlayqlError::construction(attribute.name(), "missing field"))
}

fn integer(row: &HashMap<String, String>, attribute: Attribute) -> Result<i64> {
    let raw = text(row, attribute)?;
    raw.trim().parse::<i64>().map_err(|e| {
        PlayqlError::construction(attribute.name(), format!("`{}` is not an integer ({})", raw, e))
    })
}

fn release_date(year: i64, month: i64, day: i64) -> Result<NaiveDate> {
    let invalid = || {
        PlayqlError::construction(
            Attribute::ReleasedDate.name(),
            format!("{}-{}-{} is not a calendar date", year, month, day),
        )
    };
    // calendar years start at 1
    if year < 1 {
        return Err(invalid());
    }
    let year = i32::try_from(year).map_err(|_| invalid())?;
    let month = u32::try_from(month).map_err(|_| invalid())?;
    let day = u32::try_from(day).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

// ------------- Store -------------

/// Append-only, ordered collection of records. Populated during ingestion
/// and only read afterwards.
#[derive(Debug, Clone)]
pub struct RecordStore<R> {
    records: Vec<R>,
}
impl<R> RecordStore<R> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }
    pub fn push(&mut self, record: R) {
        self.records.push(record);
    }
    pub fn records(&self) -> &[R] {
        &self.records
    }
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }
    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
impl<R> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}
impl<R> FromIterator<R> for RecordStore<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
impl<R> Extend<R> for RecordStore<R> {
    fn extend<I: IntoIterator<Item = R>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}
impl<'a, R> IntoIterator for &'a RecordStore<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;
    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

pub type Playlist = RecordStore<Song>;
