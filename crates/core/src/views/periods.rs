use bible_timeline_protocol::{Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken};

use crate::config::TimelineConfig;
use crate::layout::CoordinateMapper;
use crate::model::{Lang, TimeRecord};

const HEADER_HEIGHT: f64 = 24.0;
const FONT_SIZE: f64 = 13.0;
const LABEL_INSET: f64 = 8.0;

/// Render one background band per period, labelled at the top.
///
/// The click region covers only the label strip so bars drawn over the
/// band stay clickable on their own.
pub fn render_periods(
    periods: &[TimeRecord],
    mapper: &CoordinateMapper,
    config: &TimelineConfig,
    lang: Lang,
) -> Vec<RenderCommand> {
    let mut commands = Vec::with_capacity(periods.len() * 3 + 2);
    commands.push(RenderCommand::BeginGroup {
        id: "periods".into(),
        label: Some("Periods".into()),
    });

    let top = config.periods.top;
    for period in periods {
        let x = mapper.year_to_x(period.interval.start());
        let w = mapper.interval_width(&period.interval);
        let name = period.display_name(lang);

        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(x, top, w, config.periods.height),
            color: ThemeToken::PeriodBand,
            border_color: Some(ThemeToken::PeriodBorder),
            label: Some(SharedStr::from(name)),
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x + LABEL_INSET, top + FONT_SIZE + 4.0),
            text: SharedStr::from(name),
            color: ThemeToken::PeriodLabel,
            font_size: FONT_SIZE,
            align: TextAlign::Left,
        });
        commands.push(RenderCommand::ClickRegion {
            rect: Rect::new(x, top, w, HEADER_HEIGHT),
            target: period.item_ref(),
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Zoom;
    use crate::model::{Interval, LocalizedText, RecordKind};
    use bible_timeline_protocol::ItemKind;

    fn exodus() -> TimeRecord {
        TimeRecord::new(
            "exodus",
            RecordKind::Period,
            LocalizedText::bilingual("Exodus & Wandering", "יציאת מצרים והנדודים"),
            Interval::new(-1491, Some(-1451)).unwrap_or(Interval::open(-1491)),
        )
    }

    #[test]
    fn band_spans_the_period() {
        let config = TimelineConfig::default();
        let mapper = config.mapper(Zoom::ONE);
        let cmds = render_periods(&[exodus()], &mapper, &config, Lang::He);

        let band = cmds.iter().find_map(|c| match c {
            RenderCommand::DrawRect { rect, .. } => Some(*rect),
            _ => None,
        });
        let band = band.expect("period band is drawn");
        assert_eq!(band.x, mapper.year_to_x(-1491));
        assert!((band.right() - mapper.year_to_x(-1451)).abs() < 1e-9);
        assert_eq!(band.y, config.periods.top);

        assert!(cmds.iter().any(|c| matches!(
            c,
            RenderCommand::DrawText { text, .. } if text.as_str() == "יציאת מצרים והנדודים"
        )));
        assert!(cmds.iter().any(|c| matches!(
            c,
            RenderCommand::ClickRegion { target, .. } if target.kind == ItemKind::Period
        )));
    }

    #[test]
    fn no_periods_is_an_empty_group() {
        let config = TimelineConfig::default();
        let cmds = render_periods(&[], &config.mapper(Zoom::ONE), &config, Lang::En);
        assert_eq!(cmds.len(), 2);
    }
}
