use bible_timeline_protocol::ItemRef;
use serde::{Deserialize, Serialize};

use crate::model::record::{RecordKind, TimeRecord};

/// The read-only content table: periods, events and people, each in
/// authoring order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chronology {
    pub periods: Vec<TimeRecord>,
    pub events: Vec<TimeRecord>,
    pub people: Vec<TimeRecord>,
}

/// Everything the person detail view shows besides the person itself.
#[derive(Debug, Clone)]
pub struct PersonDetails<'a> {
    pub person: &'a TimeRecord,
    pub years_lived: Option<i64>,
    pub parent: Option<&'a TimeRecord>,
    pub children: Vec<&'a TimeRecord>,
    pub contemporaries: Vec<&'a TimeRecord>,
    pub life_events: Vec<&'a TimeRecord>,
    pub period: Option<&'a TimeRecord>,
}

/// Summary numbers shown above the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimelineStats {
    pub total: usize,
    pub male: usize,
    pub female: usize,
    pub special: usize,
    /// Rounded mean of closed lifespans; 0 when there are none.
    pub average_lifespan: i64,
    /// Number of years the timeline domain covers.
    pub year_range: i64,
}

/// Number of life events listed in a person's details.
pub const LIFE_EVENTS_SHOWN: usize = 5;

impl Chronology {
    pub fn collection(&self, kind: RecordKind) -> &[TimeRecord] {
        match kind {
            RecordKind::Person => &self.people,
            RecordKind::Event => &self.events,
            RecordKind::Period => &self.periods,
        }
    }

    pub fn records(&self) -> impl Iterator<Item = &TimeRecord> {
        self.periods
            .iter()
            .chain(self.events.iter())
            .chain(self.people.iter())
    }

    pub fn len(&self) -> usize {
        self.periods.len() + self.events.len() + self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look a record up by id across all collections.
    pub fn record(&self, id: &str) -> Option<&TimeRecord> {
        self.records().find(|r| r.id == id)
    }

    pub fn find(&self, kind: RecordKind, id: &str) -> Option<&TimeRecord> {
        self.collection(kind).iter().find(|r| r.id == id)
    }

    /// The record a click region points at. Ids are only unique within
    /// one collection, so the kind decides where to look.
    pub fn resolve(&self, item: &ItemRef) -> Option<&TimeRecord> {
        self.find(item.kind.into(), &item.id)
    }

    /// The record's parent person. `None` when it has no parent or the
    /// parent id does not resolve.
    pub fn parent_of(&self, record: &TimeRecord) -> Option<&TimeRecord> {
        let parent_id = record.parent.as_deref()?;
        self.find(RecordKind::Person, parent_id)
    }

    pub fn children_of(&self, id: &str) -> Vec<&TimeRecord> {
        self.people
            .iter()
            .filter(|p| p.parent.as_deref() == Some(id))
            .collect()
    }

    /// Other people whose closed lifespans overlap this person's.
    pub fn contemporaries(&self, person: &TimeRecord) -> Vec<&TimeRecord> {
        self.people
            .iter()
            .filter(|other| other.id != person.id && person.interval.overlaps(&other.interval))
            .collect()
    }

    /// Events that happened during a closed lifespan, at most `limit`.
    pub fn events_during(&self, person: &TimeRecord, limit: usize) -> Vec<&TimeRecord> {
        if person.interval.is_open() {
            return Vec::new();
        }
        self.events
            .iter()
            .filter(|e| person.interval.contains(e.interval.start()))
            .take(limit)
            .collect()
    }

    /// The first period whose span contains `year`.
    pub fn period_at(&self, year: i32) -> Option<&TimeRecord> {
        self.periods.iter().find(|p| p.interval.contains(year))
    }

    pub fn major_events(&self) -> impl Iterator<Item = &TimeRecord> {
        self.events.iter().filter(|e| e.has_tag("major"))
    }

    pub fn person_details(&self, id: &str) -> Option<PersonDetails<'_>> {
        let person = self.find(RecordKind::Person, id)?;
        let period = match person.period.as_deref() {
            Some(period_id) => self.find(RecordKind::Period, period_id),
            None => self.period_at(person.interval.start()),
        };
        Some(PersonDetails {
            person,
            years_lived: person.interval.span_years(),
            parent: self.parent_of(person),
            children: self.children_of(&person.id),
            contemporaries: self.contemporaries(person),
            life_events: self.events_during(person, LIFE_EVENTS_SHOWN),
            period,
        })
    }
}

impl TimelineStats {
    pub fn from_people<'a>(
        people: impl IntoIterator<Item = &'a TimeRecord>,
        year_range: i64,
    ) -> Self {
        let mut stats = TimelineStats {
            year_range,
            ..Default::default()
        };
        let mut lifespan_sum: i64 = 0;
        let mut lifespan_count: i64 = 0;

        for person in people {
            stats.total += 1;
            if person.is_female() {
                stats.female += 1;
            } else if person.is_male() {
                stats.male += 1;
            }
            if person.is_special() {
                stats.special += 1;
            }
            if let Some(years) = person.interval.span_years() {
                lifespan_sum = lifespan_sum.saturating_add(years);
                lifespan_count += 1;
            }
        }

        if lifespan_count > 0 {
            stats.average_lifespan = (lifespan_sum as f64 / lifespan_count as f64).round() as i64;
        }
        stats
    }
}
