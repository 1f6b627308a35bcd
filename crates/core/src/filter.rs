//! Text and classification-tag filtering over bilingual records.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{Chronology, TimeRecord};

/// Classification filter applied alongside the text query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagFilter {
    #[default]
    All,
    Tag(String),
}

impl TagFilter {
    pub fn matches(&self, record: &TimeRecord) -> bool {
        match self {
            Self::All => true,
            Self::Tag(tag) => record.has_tag(tag),
        }
    }
}

impl FromStr for TagFilter {
    type Err = Infallible;

    /// `"all"` (any case, surrounding whitespace ignored) and the empty
    /// string mean no filtering; anything else names a tag, lowercased to
    /// match stored tags.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Tag(s.to_lowercase()))
        }
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Tag(tag) => f.write_str(tag),
        }
    }
}

/// The user's current filter selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub tag: TagFilter,
    pub query: String,
}

impl FilterState {
    pub fn apply<'a>(&self, records: &'a [TimeRecord]) -> Vec<&'a TimeRecord> {
        filter_records(records, &self.query, &self.tag)
    }

    pub fn is_active(&self) -> bool {
        self.tag != TagFilter::All || !self.query.trim().is_empty()
    }
}

/// Records matching `tag` whose name or description contains `query`.
///
/// The query is trimmed and compared case-insensitively against every
/// language variant. A blank query only applies the tag filter. Input
/// order is preserved.
pub fn filter_records<'a>(
    records: &'a [TimeRecord],
    query: &str,
    tag: &TagFilter,
) -> Vec<&'a TimeRecord> {
    let needle = query.trim().to_lowercase();
    records
        .iter()
        .filter(|r| tag.matches(r))
        .filter(|r| needle.is_empty() || text_matches(r, &needle))
        .collect()
}

fn text_matches(record: &TimeRecord, needle: &str) -> bool {
    record.name.contains_ci(needle)
        || record
            .description
            .as_ref()
            .is_some_and(|d| d.contains_ci(needle))
}

/// Matches from the global search, grouped by collection.
#[derive(Debug, Clone, Default)]
pub struct SearchResults<'a> {
    pub periods: Vec<&'a TimeRecord>,
    pub events: Vec<&'a TimeRecord>,
    pub people: Vec<&'a TimeRecord>,
}

impl SearchResults<'_> {
    pub fn len(&self) -> usize {
        self.periods.len() + self.events.len() + self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Search every collection at once.
///
/// Besides name and description, events also match on their tags and
/// people on their role. A blank query finds nothing.
pub fn search<'a>(chronology: &'a Chronology, query: &str) -> SearchResults<'a> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return SearchResults::default();
    }

    SearchResults {
        periods: chronology
            .periods
            .iter()
            .filter(|p| text_matches(p, &needle))
            .collect(),
        events: chronology
            .events
            .iter()
            .filter(|e| {
                text_matches(e, &needle)
                    || e.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .collect(),
        people: chronology
            .people
            .iter()
            .filter(|p| {
                text_matches(p, &needle) || p.role.as_ref().is_some_and(|r| r.contains_ci(&needle))
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Interval, LocalizedText, RecordKind};
    use proptest::prelude::*;

    fn person(id: &str, en: &str, he: &str) -> TimeRecord {
        TimeRecord::new(
            id,
            RecordKind::Person,
            LocalizedText::bilingual(en, he),
            Interval::open(-1000),
        )
    }

    fn people() -> Vec<TimeRecord> {
        vec![
            person("david", "David", "דוד").with_tags(["king"]),
            person("moses", "Moses", "משה")
                .with_tags(["prophet"])
                .with_description(LocalizedText::bilingual(
                    "Led Israel out of Egypt",
                    "הוציא את ישראל ממצרים",
                )),
            person("solomon", "Solomon", "שלמה").with_tags(["king"]),
        ]
    }

    fn ids(records: &[&TimeRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn prefix_matches_case_insensitively() {
        let records = people();
        assert_eq!(ids(&filter_records(&records, "Dav", &TagFilter::All)), vec!["david"]);
        assert_eq!(ids(&filter_records(&records, "dAV", &TagFilter::All)), vec!["david"]);
    }

    #[test]
    fn query_is_trimmed() {
        let records = people();
        assert_eq!(ids(&filter_records(&records, "  mos ", &TagFilter::All)), vec!["moses"]);
    }

    #[test]
    fn matches_hebrew_variant_and_description() {
        let records = people();
        assert_eq!(ids(&filter_records(&records, "שלמ", &TagFilter::All)), vec!["solomon"]);
        assert_eq!(ids(&filter_records(&records, "egypt", &TagFilter::All)), vec!["moses"]);
    }

    #[test]
    fn tag_and_query_combine() {
        let records = people();
        let kings = TagFilter::Tag("king".into());
        assert_eq!(ids(&filter_records(&records, "", &kings)), vec!["david", "solomon"]);
        assert_eq!(ids(&filter_records(&records, "sol", &kings)), vec!["solomon"]);
        assert!(filter_records(&records, "moses", &kings).is_empty());
    }

    #[test]
    fn tag_filter_parses_all() {
        assert_eq!("all".parse::<TagFilter>(), Ok(TagFilter::All));
        assert_eq!(" ALL ".parse::<TagFilter>(), Ok(TagFilter::All));
        assert_eq!("".parse::<TagFilter>(), Ok(TagFilter::All));
        assert_eq!("female".parse::<TagFilter>(), Ok(TagFilter::Tag("female".into())));
    }

    #[test]
    fn tags_match_regardless_of_case() {
        let david = person("david", "David", "דוד").with_tags([" King "]);
        assert!(david.has_tag("king"));
        let filter: TagFilter = "King".parse().unwrap_or_default();
        assert_eq!(filter, TagFilter::Tag("king".into()));
        assert!(filter.matches(&david));
    }

    #[test]
    fn search_groups_and_uses_roles_and_tags() {
        let mut moses = person("moses", "Moses", "משה");
        moses.role = Some(LocalizedText::bilingual("Lawgiver", "מחוקק"));
        let chron = Chronology {
            periods: vec![TimeRecord::new(
                "exodus",
                RecordKind::Period,
                LocalizedText::bilingual("Exodus & Wandering", "יציאת מצרים"),
                Interval::open(-1491),
            )],
            events: vec![
                TimeRecord::new(
                    "sinai",
                    RecordKind::Event,
                    LocalizedText::plain("The Ten Commandments"),
                    Interval::instant(-1491),
                )
                .with_tags(["law"]),
            ],
            people: vec![moses],
        };

        let hits = search(&chron, "law");
        assert_eq!(ids(&hits.events), vec!["sinai"]);
        assert_eq!(ids(&hits.people), vec!["moses"]);
        assert!(hits.periods.is_empty());

        assert_eq!(search(&chron, "exodus").periods.len(), 1);
        assert!(search(&chron, "   ").is_empty());
    }

    fn arb_records() -> impl Strategy<Value = Vec<TimeRecord>> {
        let names = prop::sample::select(vec![
            ("David", "דוד"),
            ("Moses", "משה"),
            ("Miriam", "מרים"),
            ("Deborah", "דבורה"),
            ("Daniel", "דניאל"),
        ]);
        let tags = prop::sample::select(vec!["king", "prophet", "judge"]);
        prop::collection::vec((names, tags), 0..12).prop_map(|entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(i, ((en, he), tag))| person(&format!("p{i}"), en, he).with_tags([tag]))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent(
            records in arb_records(),
            query in "[a-zA-Z ]{0,4}",
            tag in prop::sample::select(vec!["all", "king", "prophet"]),
        ) {
            let tag: TagFilter = tag.parse().unwrap_or_default();
            let once: Vec<TimeRecord> = filter_records(&records, &query, &tag)
                .into_iter()
                .cloned()
                .collect();
            let twice = filter_records(&once, &query, &tag);
            prop_assert_eq!(twice.len(), once.len());
            prop_assert!(twice.iter().zip(&once).all(|(a, b)| a.id == b.id));
        }

        #[test]
        fn blank_query_and_all_is_identity(records in arb_records(), blank in " {0,3}") {
            let out = filter_records(&records, &blank, &TagFilter::All);
            prop_assert_eq!(out.len(), records.len());
            prop_assert!(out.iter().zip(&records).all(|(a, b)| a.id == b.id));
        }
    }
}
