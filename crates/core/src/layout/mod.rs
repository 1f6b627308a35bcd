//! Horizontal and vertical placement of records on the timeline surface.

pub mod lanes;
pub mod mapper;

pub use lanes::{LaneParams, LanePlacement, LaneSpan, assign_lanes};
pub use mapper::{CoordinateMapper, Domain, Zoom, year_to_x};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("timeline domain must end after it starts: {start}..{end}")]
    DegenerateDomain { start: i32, end: i32 },
    #[error("zoom must be a positive finite number, got {0}")]
    InvalidZoom(f64),
}
