use std::collections::BTreeSet;

use bible_timeline_protocol::{ItemKind, ItemRef};
use serde::{Deserialize, Serialize};

use crate::content::ContentError;
use crate::model::text::{Lang, LocalizedText};

/// Which collection of the chronology a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Person,
    Event,
    Period,
}

impl From<RecordKind> for ItemKind {
    fn from(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Person => ItemKind::Person,
            RecordKind::Event => ItemKind::Event,
            RecordKind::Period => ItemKind::Period,
        }
    }
}

impl From<ItemKind> for RecordKind {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Person => RecordKind::Person,
            ItemKind::Event => RecordKind::Event,
            ItemKind::Period => RecordKind::Period,
        }
    }
}

/// A span of calendar years. Negative years are BCE.
///
/// `end == None` means open-ended (death year unknown). Events are
/// instants with `end == Some(start)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    start: i32,
    end: Option<i32>,
}

impl Interval {
    pub fn new(start: i32, end: Option<i32>) -> Result<Self, ContentError> {
        if let Some(end) = end
            && end < start
        {
            return Err(ContentError::InvertedInterval { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn instant(year: i32) -> Self {
        Self {
            start: year,
            end: Some(year),
        }
    }

    pub fn open(start: i32) -> Self {
        Self { start, end: None }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> Option<i32> {
        self.end
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Length in years, for closed intervals.
    pub fn span_years(&self) -> Option<i64> {
        self.end.map(|end| i64::from(end) - i64::from(self.start))
    }

    /// Whether `year` falls inside the closed interval. Open intervals
    /// contain only their start year.
    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && year <= self.end.unwrap_or(self.start)
    }

    /// Both intervals closed and sharing at least one year.
    pub fn overlaps(&self, other: &Interval) -> bool {
        match (self.end, other.end) {
            (Some(end), Some(other_end)) => other.start <= end && other_end >= self.start,
            _ => false,
        }
    }
}

/// A person, event, or period from the content table.
///
/// Built once at load time and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRecord {
    pub id: String,
    pub kind: RecordKind,
    pub name: LocalizedText,
    pub description: Option<LocalizedText>,
    pub role: Option<LocalizedText>,
    pub interval: Interval,
    pub tags: BTreeSet<String>,
    /// Id of the parent person, for family connectors.
    pub parent: Option<String>,
    /// Id of the period this record belongs to.
    pub period: Option<String>,
    /// Scripture reference, e.g. "Genesis 12".
    pub reference: Option<String>,
}

impl TimeRecord {
    pub fn new(
        id: impl Into<String>,
        kind: RecordKind,
        name: LocalizedText,
        interval: Interval,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            name,
            description: None,
            role: None,
            interval,
            tags: BTreeSet::new(),
            parent: None,
            period: None,
            reference: None,
        }
    }

    /// Tags are stored trimmed and lowercased.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags
            .extend(tags.into_iter().map(|t| t.as_ref().trim().to_lowercase()));
        self
    }

    pub fn with_description(mut self, description: LocalizedText) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn display_name(&self, lang: Lang) -> &str {
        self.name.get(lang)
    }

    pub fn item_ref(&self) -> ItemRef {
        ItemRef::new(self.kind.into(), self.id.as_str())
    }

    pub fn is_male(&self) -> bool {
        self.has_tag("male")
    }

    pub fn is_female(&self) -> bool {
        self.has_tag("female")
    }

    pub fn is_special(&self) -> bool {
        self.has_tag("special")
    }
}
