use bible_timeline_protocol::{Point, RenderCommand, SharedStr, TextAlign, ThemeToken};

use crate::layout::CoordinateMapper;
use crate::model::Lang;
use crate::views::format_year;

pub const AXIS_Y: f64 = 24.0;
const TICK_HEIGHT: f64 = 8.0;
const LABEL_Y: f64 = 16.0;
const FONT_SIZE: f64 = 11.0;

/// Render the year ruler along the top of the timeline.
///
/// Ticks sit on every multiple of `marker_interval` inside the domain,
/// each with a year label and a faint gridline running `grid_height`
/// pixels down from the axis.
pub fn render_time_axis(
    mapper: &CoordinateMapper,
    marker_interval: i32,
    grid_height: f64,
    lang: Lang,
) -> Vec<RenderCommand> {
    let start_x = mapper.year_to_x(mapper.domain.start());
    let end_x = mapper.year_to_x(mapper.domain.end());
    let years = tick_years(mapper.domain.start(), mapper.domain.end(), marker_interval);

    let mut commands = Vec::with_capacity(years.len() * 3 + 3);
    commands.push(RenderCommand::BeginGroup {
        id: "axis".into(),
        label: Some("Years".into()),
    });

    commands.push(RenderCommand::DrawLine {
        from: Point::new(start_x, AXIS_Y),
        to: Point::new(end_x, AXIS_Y),
        color: ThemeToken::AxisLine,
        width: 2.0,
        dashed: false,
    });

    for year in years {
        let x = mapper.year_to_x(year);
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, AXIS_Y),
            to: Point::new(x, AXIS_Y + TICK_HEIGHT),
            color: ThemeToken::AxisTick,
            width: 1.0,
            dashed: false,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x, LABEL_Y),
            text: SharedStr::from(format_year(year, lang)),
            color: ThemeToken::AxisLabel,
            font_size: FONT_SIZE,
            align: TextAlign::Center,
        });
        if grid_height > 0.0 {
            commands.push(RenderCommand::DrawLine {
                from: Point::new(x, AXIS_Y + TICK_HEIGHT),
                to: Point::new(x, AXIS_Y + grid_height),
                color: ThemeToken::Border,
                width: 0.5,
                dashed: false,
            });
        }
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

/// Upper bound on labelled ticks; wider domains thin out to a coarser
/// multiple of the interval.
const MAX_TICKS: i64 = 1000;

/// Multiples of `interval` in `[start, end]`, at most [`MAX_TICKS`].
fn tick_years(start: i32, end: i32, interval: i32) -> Vec<i32> {
    if interval <= 0 || end < start {
        return Vec::new();
    }
    let (start, end) = (i64::from(start), i64::from(end));
    let mut step = i64::from(interval);
    let span = end - start;
    if span / step >= MAX_TICKS {
        step *= span / step / MAX_TICKS + 1;
    }
    let first = start.div_euclid(step) * step;
    let first = if first < start { first + step } else { first };
    std::iter::successors(Some(first), |year| Some(year + step))
        .take_while(|&year| year <= end)
        .filter_map(|year| i32::try_from(year).ok())
        .collect()
}
