//! Owns the content, the layout constants and the user's view state, and
//! turns them into frames.

use bible_timeline_protocol::{ItemRef, Point, Viewport};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, TimelineConfig};
use crate::filter::{FilterState, TagFilter};
use crate::layout::Zoom;
use crate::model::{Chronology, Lang, TimelineStats};
use crate::surface::HitRegions;
use crate::views::{TimelineFrame, render_timeline};

/// Mutable view state that feeds every render.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderContext {
    pub filter: FilterState,
    pub zoom: Zoom,
    pub lang: Lang,
    pub viewport: Viewport,
}

pub struct TimelineController {
    chronology: Chronology,
    config: TimelineConfig,
    ctx: RenderContext,
    /// Click regions of the last rendered frame.
    hits: HitRegions,
}

impl TimelineController {
    pub fn new(chronology: Chronology, config: TimelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            chronology,
            config,
            ctx: RenderContext::default(),
            hits: HitRegions::default(),
        })
    }

    pub fn chronology(&self) -> &Chronology {
        &self.chronology
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn set_tag_filter(&mut self, tag: TagFilter) {
        self.ctx.filter.tag = tag;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.ctx.filter.query = query.into();
    }

    pub fn zoom_in(&mut self) -> Zoom {
        self.scale_zoom(self.config.zoom.step)
    }

    pub fn zoom_out(&mut self) -> Zoom {
        self.scale_zoom(1.0 / self.config.zoom.step)
    }

    pub fn reset_zoom(&mut self) {
        self.ctx.zoom = Zoom::ONE;
    }

    /// Set an explicit zoom, clamped to the configured bounds.
    pub fn set_zoom(&mut self, zoom: Zoom) -> Zoom {
        let (min, max) = self.config.zoom_bounds();
        self.ctx.zoom = zoom.clamp(min, max);
        self.ctx.zoom
    }

    fn scale_zoom(&mut self, factor: f64) -> Zoom {
        match Zoom::new(self.ctx.zoom.get() * factor) {
            Ok(zoom) => self.set_zoom(zoom),
            Err(_) => self.ctx.zoom,
        }
    }

    /// Zoom as a whole percentage, e.g. 130 for 1.3.
    pub fn zoom_percent(&self) -> u32 {
        (self.ctx.zoom.get() * 100.0).round() as u32
    }

    pub fn toggle_language(&mut self) -> Lang {
        self.ctx.lang = self.ctx.lang.toggle();
        self.ctx.lang
    }

    pub fn set_language(&mut self, lang: Lang) {
        self.ctx.lang = lang;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.ctx.viewport.width = width;
        self.ctx.viewport.height = height;
    }

    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.ctx.viewport.x = x.max(0.0);
        self.ctx.viewport.y = y.max(0.0);
    }

    /// Recompute the whole timeline for the current state.
    pub fn render(&mut self) -> TimelineFrame {
        let frame = render_timeline(&self.chronology, &self.config, &self.ctx);
        self.hits = HitRegions::from_commands(&frame.commands);
        frame
    }

    /// The record under a point in content coordinates, from the last
    /// rendered frame.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<ItemRef> {
        self.hits.hit(Point::new(x, y)).cloned()
    }

    /// Horizontal scroll offset that centres `year` in the viewport,
    /// never negative.
    pub fn scroll_offset_for_year(&self, year: i32) -> f64 {
        let x = self.config.mapper(self.ctx.zoom).year_to_x(year);
        (x - self.ctx.viewport.width / 2.0).max(0.0)
    }

    /// Year at the centre of the current viewport.
    pub fn centre_year(&self) -> f64 {
        let centre = self.ctx.viewport.x + self.ctx.viewport.width / 2.0;
        self.config.mapper(self.ctx.zoom).x_to_year(centre)
    }

    /// Stats over the people the current filter leaves visible.
    pub fn stats(&self) -> TimelineStats {
        let visible = self.ctx.filter.apply(&self.chronology.people);
        TimelineStats::from_people(visible, self.config.domain().range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Interval, LocalizedText, RecordKind, TimeRecord};
    use bible_timeline_protocol::ItemKind;

    fn controller() -> TimelineController {
        let chron = Chronology {
            periods: vec![],
            events: vec![],
            people: vec![
                TimeRecord::new(
                    "david",
                    RecordKind::Person,
                    LocalizedText::bilingual("David", "דוד"),
                    Interval::new(-1085, Some(-1015)).unwrap_or(Interval::open(-1085)),
                )
                .with_tags(["king"]),
                TimeRecord::new(
                    "moses",
                    RecordKind::Person,
                    LocalizedText::bilingual("Moses", "משה"),
                    Interval::new(-1571, Some(-1451)).unwrap_or(Interval::open(-1571)),
                ),
            ],
        };
        TimelineController::new(chron, TimelineConfig::default()).expect("default config")
    }

    #[test]
    fn zoom_steps_and_clamps() {
        let mut c = controller();
        c.zoom_in();
        assert_eq!(c.zoom_percent(), 130);
        for _ in 0..20 {
            c.zoom_in();
        }
        assert_eq!(c.context().zoom.get(), 3.0);
        for _ in 0..40 {
            c.zoom_out();
        }
        assert_eq!(c.context().zoom.get(), 0.3);
        c.reset_zoom();
        assert_eq!(c.zoom_percent(), 100);
    }

    #[test]
    fn query_narrows_render_and_stats() {
        let mut c = controller();
        c.set_query("Dav");
        let frame = c.render();
        assert_eq!(frame.placements.len(), 1);
        assert_eq!(frame.placements[0].id, "david");
        assert_eq!(c.stats().total, 1);

        c.set_query("");
        c.set_tag_filter(TagFilter::Tag("king".into()));
        assert_eq!(c.render().placements.len(), 1);
        c.set_tag_filter(TagFilter::All);
        assert_eq!(c.render().placements.len(), 2);
    }

    #[test]
    fn hit_test_finds_person_bar() {
        let mut c = controller();
        let frame = c.render();
        let david = frame.placement("david").expect("david placed").placement;
        let hit = c.hit_test(david.left + 1.0, david.top + 1.0);
        assert_eq!(hit, Some(ItemRef::new(ItemKind::Person, "david")));
        assert!(c.hit_test(-50.0, -50.0).is_none());
    }

    #[test]
    fn scroll_offset_centres_and_clamps() {
        let mut c = controller();
        c.resize(1000.0, 600.0);
        // -2202 maps to x = 2500 at zoom 1.
        assert_eq!(c.scroll_offset_for_year(-2202), 2000.0);
        assert_eq!(c.scroll_offset_for_year(-4004), 0.0);
    }

    #[test]
    fn language_toggles() {
        let mut c = controller();
        assert_eq!(c.toggle_language(), Lang::He);
        assert_eq!(c.toggle_language(), Lang::En);
        c.set_language(Lang::He);
        assert_eq!(c.context().lang, Lang::He);
    }

    #[test]
    fn extreme_years_render_without_overflow() {
        let config = TimelineConfig::from_toml_str(
            "start_year = -2000000000\nend_year = 2000000000\nmarker_interval = 1\n",
        )
        .expect("ordered domain is valid");
        let chron = Chronology {
            people: vec![TimeRecord::new(
                "ancient",
                RecordKind::Person,
                LocalizedText::plain("Ancient"),
                Interval::new(-2_000_000_000, Some(2_000_000_000))
                    .unwrap_or(Interval::open(-2_000_000_000)),
            )],
            ..Chronology::default()
        };
        let mut c = TimelineController::new(chron, config).expect("valid config");
        let frame = c.render();
        assert_eq!(frame.placements.len(), 1);
        assert_eq!(frame.stats.year_range, 4_000_000_000);
        assert_eq!(frame.stats.average_lifespan, 4_000_000_000);
        assert!(frame.content_width.is_finite());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = TimelineConfig {
            drawable_width: 0.0,
            ..TimelineConfig::default()
        };
        assert!(TimelineController::new(Chronology::default(), config).is_err());
    }
}
