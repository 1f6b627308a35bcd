use bible_timeline_protocol::RenderCommand;
use serde::Serialize;

use crate::config::TimelineConfig;
use crate::controller::RenderContext;
use crate::model::{Chronology, TimelineStats};
use crate::views::people::{PersonPlacement, render_people};
use crate::views::{events, periods, time_axis};

const BOTTOM_PADDING: f64 = 40.0;

/// Everything one render pass produces.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineFrame {
    pub commands: Vec<RenderCommand>,
    /// Visible people in placement order.
    pub placements: Vec<PersonPlacement>,
    pub stats: TimelineStats,
    pub content_width: f64,
    pub content_height: f64,
}

impl TimelineFrame {
    pub fn placement(&self, id: &str) -> Option<&PersonPlacement> {
        self.placements.iter().find(|p| p.id == id)
    }
}

/// Compose all layers for the current filter, zoom and language.
///
/// Layers are emitted back to front: period bands, axis, event markers,
/// family connectors, person bars.
pub fn render_timeline(
    chronology: &Chronology,
    config: &TimelineConfig,
    ctx: &RenderContext,
) -> TimelineFrame {
    let mapper = config.mapper(ctx.zoom);
    let visible = ctx.filter.apply(&chronology.people);
    let query_matched = !ctx.filter.query.trim().is_empty();
    let people = render_people(&visible, &mapper, config, ctx.lang, query_matched);

    let lowest_bar = people
        .placements
        .iter()
        .map(|p| p.placement.top + config.people.bar_height)
        .fold(0.0_f64, f64::max);
    let content_height =
        lowest_bar.max(config.periods.top + config.periods.height) + BOTTOM_PADDING;
    let content_width = mapper
        .content_width()
        .max(people.placements.iter().map(|p| p.placement.right()).fold(0.0, f64::max));

    let major: Vec<_> = chronology.major_events().collect();

    let mut commands = periods::render_periods(&chronology.periods, &mapper, config, ctx.lang);
    commands.extend(time_axis::render_time_axis(
        &mapper,
        config.marker_interval,
        content_height - time_axis::AXIS_Y - BOTTOM_PADDING,
        ctx.lang,
    ));
    commands.extend(events::render_events(
        &major,
        &mapper,
        config,
        content_height - BOTTOM_PADDING,
        ctx.lang,
    ));
    commands.extend(people.commands);

    let stats = TimelineStats::from_people(visible.iter().copied(), mapper.domain.range());

    tracing::debug!(
        people = visible.len(),
        events = major.len(),
        commands = commands.len(),
        zoom = ctx.zoom.get(),
        lang = %ctx.lang,
        "rendered timeline"
    );

    TimelineFrame {
        commands,
        placements: people.placements,
        stats,
        content_width,
        content_height,
    }
}
