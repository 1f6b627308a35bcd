use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::theme::ThemeToken;
use crate::types::{ItemRef, Point, Rect};

/// A single, stateless render instruction.
///
/// Views emit a `Vec<RenderCommand>`; every back-end (SVG, HTML, terminal,
/// a browser canvas fed through the wasm bridge) consumes the list in order.
/// Each command carries all the data it needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle, optionally with a tooltip label.
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
        label: Option<SharedStr>,
    },

    /// Draw a text string anchored at a position.
    DrawText {
        position: Point,
        text: SharedStr,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },

    /// Draw a line segment. Dashed lines are used for family connectors.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
        dashed: bool,
    },

    /// Declare a clickable area tied to a record. Draws nothing.
    ClickRegion { rect: Rect, target: ItemRef },

    /// Begin a logical group (a layer such as "people" or "axis").
    BeginGroup {
        id: SharedStr,
        label: Option<SharedStr>,
    },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}
