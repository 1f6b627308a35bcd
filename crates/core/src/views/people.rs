use std::collections::HashMap;

use bible_timeline_protocol::{Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken};
use serde::Serialize;

use crate::config::TimelineConfig;
use crate::layout::{CoordinateMapper, LanePlacement, LaneSpan, assign_lanes};
use crate::model::{Lang, TimeRecord};
use crate::views::lifespan_label;

const NAME_FONT_SIZE: f64 = 12.0;
const YEARS_FONT_SIZE: f64 = 10.0;
const TEXT_INSET: f64 = 6.0;
const CONNECTOR_WIDTH: f64 = 3.0;

/// A person's computed position, keyed by record id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonPlacement {
    pub id: String,
    #[serde(flatten)]
    pub placement: LanePlacement,
}

/// Output of the people layer.
#[derive(Debug, Clone, Default)]
pub struct PeopleLayer {
    pub commands: Vec<RenderCommand>,
    pub placements: Vec<PersonPlacement>,
}

/// Lay out and draw person bars plus parent-to-child connectors.
///
/// People are placed in order of birth year (ties keep input order) so
/// the lane assigner fills from the left. A parent that is not among
/// `people` gets no connector. With `query_matched` set, every bar is
/// outlined as a search hit.
pub fn render_people(
    people: &[&TimeRecord],
    mapper: &CoordinateMapper,
    config: &TimelineConfig,
    lang: Lang,
    query_matched: bool,
) -> PeopleLayer {
    let mut ordered: Vec<&TimeRecord> = people.to_vec();
    ordered.sort_by_key(|p| p.interval.start());

    let spans: Vec<LaneSpan> = ordered
        .iter()
        .map(|p| {
            LaneSpan::new(
                mapper.year_to_x(p.interval.start()),
                mapper.interval_width(&p.interval),
            )
        })
        .collect();
    let placed = assign_lanes(&spans, &config.people_lanes());
    let bar_height = config.people.bar_height;
    let border = if query_matched {
        ThemeToken::SearchHighlight
    } else {
        ThemeToken::PersonBorder
    };

    let mut commands = Vec::with_capacity(ordered.len() * 5 + 4);

    commands.push(RenderCommand::BeginGroup {
        id: "family".into(),
        label: Some("Family connections".into()),
    });
    let by_id: HashMap<&str, &LanePlacement> = ordered
        .iter()
        .zip(&placed)
        .map(|(p, place)| (p.id.as_str(), place))
        .collect();
    for (child, child_place) in ordered.iter().zip(&placed) {
        let Some(parent_id) = child.parent.as_deref() else {
            continue;
        };
        let Some(parent_place) = by_id.get(parent_id) else {
            tracing::trace!(child = %child.id, parent = parent_id, "parent not visible, no connector");
            continue;
        };
        commands.push(RenderCommand::DrawLine {
            from: Point::new(
                parent_place.left + parent_place.width / 2.0,
                parent_place.top + bar_height / 2.0,
            ),
            to: Point::new(child_place.left, child_place.top + bar_height / 2.0),
            color: ThemeToken::FamilyConnector,
            width: CONNECTOR_WIDTH,
            dashed: true,
        });
    }
    commands.push(RenderCommand::EndGroup);

    commands.push(RenderCommand::BeginGroup {
        id: "people".into(),
        label: Some("People".into()),
    });
    for (person, place) in ordered.iter().zip(&placed) {
        let rect = Rect::new(place.left, place.top, place.width, bar_height);
        commands.push(RenderCommand::DrawRect {
            rect,
            color: person_color(person),
            border_color: Some(border),
            label: Some(SharedStr::from(tooltip(person, lang))),
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(place.left + TEXT_INSET, place.top + NAME_FONT_SIZE + 2.0),
            text: SharedStr::from(person.display_name(lang)),
            color: ThemeToken::TextPrimary,
            font_size: NAME_FONT_SIZE,
            align: TextAlign::Left,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(place.left + TEXT_INSET, place.top + bar_height - 4.0),
            text: SharedStr::from(lifespan_label(&person.interval, lang)),
            color: ThemeToken::TextSecondary,
            font_size: YEARS_FONT_SIZE,
            align: TextAlign::Left,
        });
        commands.push(RenderCommand::ClickRegion {
            rect,
            target: person.item_ref(),
        });
    }
    commands.push(RenderCommand::EndGroup);

    let placements = ordered
        .iter()
        .zip(placed)
        .map(|(p, placement)| PersonPlacement {
            id: p.id.clone(),
            placement,
        })
        .collect();

    PeopleLayer {
        commands,
        placements,
    }
}

/// Special outranks female; everyone else is drawn as male.
fn person_color(person: &TimeRecord) -> ThemeToken {
    if person.is_special() {
        ThemeToken::PersonSpecial
    } else if person.is_female() {
        ThemeToken::PersonFemale
    } else {
        ThemeToken::PersonMale
    }
}

/// Name in the active language, with the other language in brackets when
/// it differs.
fn tooltip(person: &TimeRecord, lang: Lang) -> String {
    let primary = person.display_name(lang);
    let secondary = person.display_name(lang.toggle());
    if secondary.is_empty() || secondary == primary {
        primary.to_string()
    } else {
        format!("{primary} ({secondary})")
    }
}
