use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by each back-end's palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    Border,

    // People
    PersonMale,
    PersonFemale,
    PersonSpecial,
    PersonBorder,
    FamilyConnector,

    // Periods
    PeriodBand,
    PeriodBorder,
    PeriodLabel,

    // Events
    EventMarker,
    EventLabel,

    // Axis
    AxisLine,
    AxisTick,
    AxisLabel,

    TextPrimary,
    TextSecondary,

    /// Outline for records matching the active text query.
    SearchHighlight,
}
