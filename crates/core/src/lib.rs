pub mod config;
pub mod content;
pub mod controller;
pub mod filter;
pub mod html;
pub mod layout;
pub mod model;
pub mod surface;
pub mod svg;
pub mod views;

pub use config::{ConfigError, TimelineConfig};
pub use content::ContentError;
pub use controller::{RenderContext, TimelineController};
pub use filter::{FilterState, TagFilter};
pub use layout::LayoutError;
