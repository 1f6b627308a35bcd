//! View transforms: chronology records in, render commands out.
//!
//! Each layer is wrapped in a `BeginGroup`/`EndGroup` pair so back-ends can
//! treat it as a unit.

pub mod events;
pub mod people;
pub mod periods;
pub mod time_axis;
pub mod timeline;

pub use people::PersonPlacement;
pub use timeline::{TimelineFrame, render_timeline};

use crate::model::{Interval, Lang};

/// "1491 BCE" / "1491 לפנה״ס".
pub fn format_year(year: i32, lang: Lang) -> String {
    let era = match (year < 0, lang) {
        (true, Lang::En) => "BCE",
        (true, Lang::He) => "לפנה״ס",
        (false, Lang::En) => "CE",
        (false, Lang::He) => "לספירה",
    };
    format!("{} {era}", year.unsigned_abs())
}

/// Short lifespan caption drawn under a person's name: "70 yrs", or the
/// birth year followed by `+` when the death year is unknown.
pub fn lifespan_label(interval: &Interval, lang: Lang) -> String {
    match (interval.span_years(), lang) {
        (Some(years), Lang::En) => format!("{years} yrs"),
        (Some(years), Lang::He) => format!("{years} שנים"),
        (None, _) => format!("{}+", format_year(interval.start(), lang)),
    }
}

/// Rough rendered width of a label, for layout before any font is known.
pub(crate) fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * 0.6
}
