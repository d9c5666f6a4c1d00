//! Typed simulation events and their gzipped JSON-lines log format.
//!
//! The driving engine appends one event per line; the analysis replays whole
//! files. A file that fails to decompress or parse yields an error without
//! handing any of its events to the caller, so corrupt files can be skipped
//! atomically.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::ContagionError;
use crate::person::{DiseaseStatus, PersonId};

/// Length of one simulated day, in the time unit of event timestamps.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// One transmission, emitted when the infection model returned a positive
/// outcome to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfectionEvent {
    /// Simulation time in seconds since day 0.
    pub time: f64,
    pub infector: PersonId,
    /// The person who got infected.
    pub person: PersonId,
    /// Raw activity pairing the infection happened in, e.g. "home" or
    /// "work_educ_primary".
    pub infection_type: String,
}

/// A change of one person's disease status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonStatusEvent {
    /// Simulation time in seconds since day 0.
    pub time: f64,
    pub person: PersonId,
    pub status: DiseaseStatus,
}

/// A typed entry of a simulation event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    Infection(InfectionEvent),
    PersonStatus(PersonStatusEvent),
}

impl Event {
    pub fn time(&self) -> f64 {
        match self {
            Event::Infection(event) => event.time,
            Event::PersonStatus(event) => event.time,
        }
    }
}

/// The simulated day an event time falls into.
pub fn day_of(time: f64) -> usize {
    (time / SECONDS_PER_DAY).floor() as usize
}

/// Reads a gzipped JSON-lines event file in full.
///
/// # Errors
///
/// Returns a `ContagionError` on any I/O or parse failure; in that case none
/// of the file's events are returned.
pub fn read_events(path: &Path) -> Result<Vec<Event>, ContagionError> {
    let file = File::open(path)?;
    let reader = BufReader::new(GzDecoder::new(BufReader::new(file)));

    let mut events = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        events.push(serde_json::from_str(&line)?);
    }
    Ok(events)
}

/// Appends events to a gzipped JSON-lines file, one event per line.
pub struct EventWriter {
    writer: GzEncoder<BufWriter<File>>,
}

impl EventWriter {
    /// Creates the file, truncating any previous content.
    ///
    /// # Errors
    ///
    /// Returns a `ContagionError` if the file cannot be created.
    pub fn create(path: &Path) -> Result<EventWriter, ContagionError> {
        let file = File::create(path)?;
        Ok(EventWriter {
            writer: GzEncoder::new(BufWriter::new(file), Compression::default()),
        })
    }

    /// # Errors
    ///
    /// Returns a `ContagionError` if serialization or the underlying write
    /// fails.
    pub fn write_event(&mut self, event: &Event) -> Result<(), ContagionError> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flushes the compressed stream. Dropping the writer without calling
    /// this leaves a truncated gzip trailer behind.
    ///
    /// # Errors
    ///
    /// Returns a `ContagionError` if the trailing gzip frame cannot be
    /// written.
    pub fn finish(self) -> Result<(), ContagionError> {
        self.writer.finish()?.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sample_events() -> Vec<Event> {
        vec![
            Event::PersonStatus(PersonStatusEvent {
                time: 3.0 * SECONDS_PER_DAY,
                person: PersonId(7),
                status: DiseaseStatus::Contagious,
            }),
            Event::Infection(InfectionEvent {
                time: 3.0 * SECONDS_PER_DAY + 120.0,
                infector: PersonId(7),
                person: PersonId(12),
                infection_type: "work_business".to_string(),
            }),
        ]
    }

    #[test]
    fn write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("day_003.json.gz");

        let events = sample_events();
        let mut writer = EventWriter::create(&path).unwrap();
        for event in &events {
            writer.write_event(event).unwrap();
        }
        writer.finish().unwrap();

        assert_eq!(read_events(&path).unwrap(), events);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corrupt.json.gz");
        fs::write(&path, b"this is not gzip at all").unwrap();
        assert!(read_events(&path).is_err());
    }

    #[test]
    fn corrupt_line_fails_the_whole_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.json.gz");

        let mut writer = EventWriter::create(&path).unwrap();
        writer.write_event(&sample_events()[0]).unwrap();
        writer.writer.write_all(b"{\"type\": \"infec").unwrap();
        writer.finish().unwrap();

        assert!(read_events(&path).is_err());
    }

    #[test]
    fn day_boundaries() {
        assert_eq!(day_of(0.0), 0);
        assert_eq!(day_of(SECONDS_PER_DAY - 1.0), 0);
        assert_eq!(day_of(SECONDS_PER_DAY), 1);
        assert_eq!(day_of(3.5 * SECONDS_PER_DAY), 3);
    }

    #[test]
    fn infection_event_json_shape() {
        let event = Event::Infection(InfectionEvent {
            time: 60.0,
            infector: PersonId(1),
            person: PersonId(2),
            infection_type: "leisure".to_string(),
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"infection\""));
        assert!(json.contains("\"infectionType\":\"leisure\""));
    }
}
