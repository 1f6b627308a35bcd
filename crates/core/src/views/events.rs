use bible_timeline_protocol::{Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken};

use crate::config::TimelineConfig;
use crate::layout::{CoordinateMapper, LaneSpan, assign_lanes};
use crate::model::{Lang, TimeRecord};
use crate::views::estimate_text_width;
use crate::views::time_axis::AXIS_Y;

const FONT_SIZE: f64 = 11.0;
const LABEL_PADDING: f64 = 4.0;

/// Render a vertical marker and a label for each event.
///
/// Labels run rightwards from their marker and are stacked with the lane
/// assigner, so events sharing a year do not print over each other.
/// Markers extend from the axis to `bottom`.
pub fn render_events(
    events: &[&TimeRecord],
    mapper: &CoordinateMapper,
    config: &TimelineConfig,
    bottom: f64,
    lang: Lang,
) -> Vec<RenderCommand> {
    let mut commands = Vec::with_capacity(events.len() * 3 + 2);
    commands.push(RenderCommand::BeginGroup {
        id: "events".into(),
        label: Some("Major events".into()),
    });

    let spans: Vec<LaneSpan> = events
        .iter()
        .map(|e| {
            let x = mapper.year_to_x(e.interval.start());
            let width = estimate_text_width(e.display_name(lang), FONT_SIZE) + LABEL_PADDING * 2.0;
            LaneSpan::new(x, width)
        })
        .collect();
    let placements = assign_lanes(&spans, &config.event_label_lanes());
    let label_height = config.events.label_lane_height;

    for (event, place) in events.iter().zip(&placements) {
        let x = place.left;
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, AXIS_Y),
            to: Point::new(x, bottom),
            color: ThemeToken::EventMarker,
            width: 1.5,
            dashed: false,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x + LABEL_PADDING, place.top + FONT_SIZE + 2.0),
            text: SharedStr::from(event.display_name(lang)),
            color: ThemeToken::EventLabel,
            font_size: FONT_SIZE,
            align: TextAlign::Left,
        });
        commands.push(RenderCommand::ClickRegion {
            rect: Rect::new(x, place.top, place.width, label_height),
            target: event.item_ref(),
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands
}
