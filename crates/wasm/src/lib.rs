use bible_timeline_core::content;
use bible_timeline_core::filter::{SearchResults, search};
use bible_timeline_core::html::render_html;
use bible_timeline_core::model::{Chronology, Lang, LocalizedText, TimeRecord};
use bible_timeline_core::svg::render_svg;
use bible_timeline_core::{TagFilter, TimelineConfig, TimelineController};
use bible_timeline_protocol::ItemKind;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A timeline instance owned by the page. Holds all view state; nothing
/// is kept in globals.
#[wasm_bindgen]
pub struct Timeline {
    controller: TimelineController,
}

#[wasm_bindgen]
impl Timeline {
    /// Build from optional content JSON and config TOML. Missing inputs
    /// fall back to the built-in content and default layout.
    #[wasm_bindgen(constructor)]
    pub fn new(
        content_json: Option<String>,
        config_toml: Option<String>,
    ) -> Result<Timeline, JsError> {
        let chronology = match content_json {
            Some(json) => content::parse_chronology(json.as_bytes()),
            None => content::builtin(),
        }
        .map_err(|e| JsError::new(&e.to_string()))?;
        let config = match config_toml {
            Some(toml) => TimelineConfig::from_toml_str(&toml)
                .map_err(|e| JsError::new(&e.to_string()))?,
            None => TimelineConfig::default(),
        };
        let controller =
            TimelineController::new(chronology, config).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self { controller })
    }

    /// `"all"` clears the tag filter.
    pub fn set_filter(&mut self, tag: &str) {
        let tag: TagFilter = tag.parse().unwrap_or_default();
        self.controller.set_tag_filter(tag);
    }

    pub fn set_query(&mut self, query: &str) {
        self.controller.set_query(query);
    }

    /// Returns the new zoom factor.
    pub fn zoom_in(&mut self) -> f64 {
        self.controller.zoom_in().get()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.controller.zoom_out().get()
    }

    pub fn reset_zoom(&mut self) {
        self.controller.reset_zoom();
    }

    pub fn zoom_percent(&self) -> u32 {
        self.controller.zoom_percent()
    }

    /// Returns the new language code.
    pub fn toggle_language(&mut self) -> String {
        self.controller.toggle_language().code().to_string()
    }

    pub fn set_language(&mut self, code: &str) -> Result<(), JsError> {
        let lang = code
            .parse::<Lang>()
            .map_err(|e| JsError::new(&e.to_string()))?;
        self.controller.set_language(lang);
        Ok(())
    }

    pub fn language(&self) -> String {
        self.controller.context().lang.code().to_string()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.controller.resize(width, height);
    }

    /// Render the current state. Returns the frame (commands, placements,
    /// stats, content size) as JSON.
    pub fn render(&mut self) -> Result<String, JsError> {
        let frame = self.controller.render();
        to_json(&frame)
    }

    /// Render the current state straight to an SVG document.
    pub fn render_svg(&mut self, dark: bool) -> String {
        let frame = self.controller.render();
        render_svg(&frame.commands, frame.content_width, frame.content_height, dark)
    }

    /// Render the current state to positioned HTML elements.
    pub fn render_html(&mut self) -> String {
        let frame = self.controller.render();
        let lang = self.controller.context().lang;
        render_html(&frame.commands, frame.content_width, frame.content_height, lang)
    }

    /// The record under a content-space point from the last render, as
    /// `{"kind": ..., "id": ...}` JSON.
    pub fn hit_test(&self, x: f64, y: f64) -> Result<Option<String>, JsError> {
        self.controller
            .hit_test(x, y)
            .map(|item| to_json(&item))
            .transpose()
    }

    pub fn scroll_offset_for_year(&self, year: i32) -> f64 {
        self.controller.scroll_offset_for_year(year)
    }

    pub fn stats(&self) -> Result<String, JsError> {
        to_json(&self.controller.stats())
    }

    /// Detail view of a person as JSON, or `None` for an unknown id.
    pub fn person_details(&self, id: &str) -> Result<Option<String>, JsError> {
        let lang = self.controller.context().lang;
        person_details(self.controller.chronology(), id, lang)
            .map(|details| to_json(&details))
            .transpose()
    }

    /// Global search across periods, events and people as JSON.
    pub fn search(&self, query: &str) -> Result<String, JsError> {
        let lang = self.controller.context().lang;
        let results = search(self.controller.chronology(), query);
        to_json(&SearchView::new(&results, lang))
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&e.to_string()))
}

/// A record flattened to display strings in one language.
#[derive(Debug, Serialize)]
struct RecordSummary {
    id: String,
    kind: &'static str,
    name: String,
    description: String,
    role: String,
    start: i32,
    end: Option<i32>,
    reference: Option<String>,
}

impl RecordSummary {
    fn new(record: &TimeRecord, lang: Lang) -> Self {
        let text = |t: &Option<LocalizedText>| {
            t.as_ref().map(|t| t.get(lang).to_string()).unwrap_or_default()
        };
        Self {
            id: record.id.clone(),
            kind: ItemKind::from(record.kind).as_str(),
            name: record.display_name(lang).to_string(),
            description: text(&record.description),
            role: text(&record.role),
            start: record.interval.start(),
            end: record.interval.end(),
            reference: record.reference.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PersonDetailsView {
    person: RecordSummary,
    years_lived: Option<i64>,
    parent: Option<RecordSummary>,
    children: Vec<RecordSummary>,
    contemporaries: Vec<RecordSummary>,
    life_events: Vec<RecordSummary>,
    period: Option<RecordSummary>,
}

fn person_details(chronology: &Chronology, id: &str, lang: Lang) -> Option<PersonDetailsView> {
    let details = chronology.person_details(id)?;
    let summarize = |records: &[&TimeRecord]| {
        records
            .iter()
            .map(|r| RecordSummary::new(r, lang))
            .collect::<Vec<_>>()
    };
    Some(PersonDetailsView {
        person: RecordSummary::new(details.person, lang),
        years_lived: details.years_lived,
        parent: details.parent.map(|p| RecordSummary::new(p, lang)),
        children: summarize(&details.children),
        contemporaries: summarize(&details.contemporaries),
        life_events: summarize(&details.life_events),
        period: details.period.map(|p| RecordSummary::new(p, lang)),
    })
}

#[derive(Debug, Serialize)]
struct SearchView {
    periods: Vec<RecordSummary>,
    events: Vec<RecordSummary>,
    people: Vec<RecordSummary>,
}

impl SearchView {
    fn new(results: &SearchResults<'_>, lang: Lang) -> Self {
        let summarize = |records: &[&TimeRecord]| {
            records
                .iter()
                .map(|r| RecordSummary::new(r, lang))
                .collect::<Vec<_>>()
        };
        Self {
            periods: summarize(&results.periods),
            events: summarize(&results.events),
            people: summarize(&results.people),
        }
    }
}
