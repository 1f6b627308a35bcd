//! The drawing-surface seam every back-end implements.

use bible_timeline_protocol::{ItemRef, Point, Rect, RenderCommand, TextAlign, ThemeToken};

/// A target that render commands can be replayed onto.
pub trait Surface {
    fn draw_rect(
        &mut self,
        rect: Rect,
        color: ThemeToken,
        border: Option<ThemeToken>,
        label: Option<&str>,
    );

    fn draw_line(&mut self, from: Point, to: Point, color: ThemeToken, width: f64, dashed: bool);

    fn draw_text(
        &mut self,
        position: Point,
        text: &str,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    );

    fn register_click_region(&mut self, rect: Rect, target: &ItemRef);

    fn begin_group(&mut self, _id: &str, _label: Option<&str>) {}

    fn end_group(&mut self) {}
}

/// Drive `surface` with every command, in order.
pub fn replay<S: Surface + ?Sized>(commands: &[RenderCommand], surface: &mut S) {
    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
            } => surface.draw_rect(*rect, *color, *border_color, label.as_deref()),
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width,
                dashed,
            } => surface.draw_line(*from, *to, *color, *width, *dashed),
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => surface.draw_text(*position, text, *color, *font_size, *align),
            RenderCommand::ClickRegion { rect, target } => {
                surface.register_click_region(*rect, target);
            }
            RenderCommand::BeginGroup { id, label } => surface.begin_group(id, label.as_deref()),
            RenderCommand::EndGroup => surface.end_group(),
        }
    }
}

/// Collects click regions only. Used for hit-testing without drawing.
#[derive(Debug, Default)]
pub struct HitRegions {
    regions: Vec<(Rect, ItemRef)>,
}

impl HitRegions {
    pub fn from_commands(commands: &[RenderCommand]) -> Self {
        let mut hits = Self::default();
        replay(commands, &mut hits);
        hits
    }

    /// The last registered region containing `point`; later regions are
    /// painted above earlier ones.
    pub fn hit(&self, point: Point) -> Option<&ItemRef> {
        self.regions
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(point))
            .map(|(_, target)| target)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl Surface for HitRegions {
    fn draw_rect(&mut self, _: Rect, _: ThemeToken, _: Option<ThemeToken>, _: Option<&str>) {}

    fn draw_line(&mut self, _: Point, _: Point, _: ThemeToken, _: f64, _: bool) {}

    fn draw_text(&mut self, _: Point, _: &str, _: ThemeToken, _: f64, _: TextAlign) {}

    fn register_click_region(&mut self, rect: Rect, target: &ItemRef) {
        self.regions.push((rect, target.clone()));
    }
}
