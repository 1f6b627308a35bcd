//! Loader for the static chronology content table.
//!
//! Content is authored as one JSON document:
//!
//! ```json
//! {
//!   "periods": [{ "id": "exodus", "name": {"en": "…", "he": "…"}, "start_year": -1491, "end_year": -1451 }],
//!   "events":  [{ "id": "red_sea", "name": "…", "year": -1491, "tags": ["major"] }],
//!   "people":  [{ "id": "moses", "name": "…", "lifespan": {"born": -1571, "died": -1451}, "special": true }]
//! }
//! ```

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use crate::model::{Chronology, Interval, LocalizedText, RecordKind, TimeRecord};

const BUILTIN_CONTENT: &str = include_str!("../content/chronology.json");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("interval ends before it starts: {start}..{end}")]
    InvertedInterval { start: i32, end: i32 },
    #[error("{kind:?} record has an empty id")]
    EmptyId { kind: RecordKind },
    #[error("duplicate {kind:?} id: {id}")]
    DuplicateId { kind: RecordKind, id: String },
    #[error("{id}: {source}")]
    Record {
        id: String,
        #[source]
        source: Box<ContentError>,
    },
}

#[derive(Debug, Deserialize)]
struct ContentFile {
    #[serde(default)]
    periods: Vec<PeriodEntry>,
    #[serde(default)]
    events: Vec<EventEntry>,
    #[serde(default)]
    people: Vec<PersonEntry>,
}

#[derive(Debug, Deserialize)]
struct PeriodEntry {
    id: String,
    name: LocalizedText,
    #[serde(default)]
    description: Option<LocalizedText>,
    start_year: i32,
    end_year: i32,
}

#[derive(Debug, Deserialize)]
struct EventEntry {
    id: String,
    name: LocalizedText,
    #[serde(default)]
    description: Option<LocalizedText>,
    year: i32,
    #[serde(default)]
    period: Option<String>,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PersonEntry {
    id: String,
    name: LocalizedText,
    #[serde(default)]
    role: Option<LocalizedText>,
    #[serde(default)]
    description: Option<LocalizedText>,
    #[serde(default)]
    period: Option<String>,
    #[serde(default)]
    lifespan: Option<Lifespan>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    special: bool,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    parent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Lifespan {
    born: i32,
    #[serde(default)]
    died: Option<i32>,
}

/// Parse and validate a content document.
///
/// People without a lifespan cannot be placed on the timeline and are
/// dropped. Parent ids are not checked here; dangling parents are skipped
/// when connectors are drawn.
pub fn parse_chronology(data: &[u8]) -> Result<Chronology, ContentError> {
    let file: ContentFile = serde_json::from_slice(data)?;

    let periods = file
        .periods
        .into_iter()
        .map(|entry| {
            let interval = Interval::new(entry.start_year, Some(entry.end_year))
                .map_err(|e| in_record(&entry.id, e))?;
            let mut record =
                TimeRecord::new(entry.id, RecordKind::Period, entry.name, interval);
            record.description = entry.description;
            Ok(record)
        })
        .collect::<Result<Vec<_>, ContentError>>()?;

    let events = file
        .events
        .into_iter()
        .map(|entry| {
            let mut record = TimeRecord::new(
                entry.id,
                RecordKind::Event,
                entry.name,
                Interval::instant(entry.year),
            )
            .with_tags(entry.tags);
            record.description = entry.description;
            record.period = entry.period;
            record.reference = entry.reference;
            record
        })
        .collect::<Vec<_>>();

    let mut people = Vec::with_capacity(file.people.len());
    for entry in file.people {
        let Some(lifespan) = entry.lifespan else {
            tracing::debug!(id = %entry.id, "person has no lifespan, not placed on the timeline");
            continue;
        };
        let interval =
            Interval::new(lifespan.born, lifespan.died).map_err(|e| in_record(&entry.id, e))?;
        let mut record = TimeRecord::new(entry.id, RecordKind::Person, entry.name, interval)
            .with_tags(entry.tags)
            .with_tags(entry.gender);
        if entry.special {
            record.tags.insert("special".to_string());
        }
        record.role = entry.role;
        record.description = entry.description;
        record.period = entry.period;
        record.parent = entry.parent;
        people.push(record);
    }

    let chronology = Chronology {
        periods,
        events,
        people,
    };
    validate_ids(&chronology)?;

    tracing::debug!(
        periods = chronology.periods.len(),
        events = chronology.events.len(),
        people = chronology.people.len(),
        "loaded chronology"
    );
    Ok(chronology)
}

/// The chronology shipped with the crate.
pub fn builtin() -> Result<Chronology, ContentError> {
    parse_chronology(BUILTIN_CONTENT.as_bytes())
}

fn in_record(id: &str, source: ContentError) -> ContentError {
    ContentError::Record {
        id: id.to_string(),
        source: Box::new(source),
    }
}

/// Ids must be non-empty and unique within their collection.
fn validate_ids(chronology: &Chronology) -> Result<(), ContentError> {
    for kind in [RecordKind::Period, RecordKind::Event, RecordKind::Person] {
        let mut seen = HashSet::new();
        for record in chronology.collection(kind) {
            if record.id.trim().is_empty() {
                return Err(ContentError::EmptyId { kind });
            }
            if !seen.insert(record.id.as_str()) {
                return Err(ContentError::DuplicateId {
                    kind,
                    id: record.id.clone(),
                });
            }
        }
    }
    Ok(())
}
