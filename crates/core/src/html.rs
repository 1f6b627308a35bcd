//! HTML renderer: absolutely positioned elements, one per command.
//!
//! Lines are collected into a single SVG overlay drawn above the boxes,
//! since a `div` cannot draw a diagonal.

use bible_timeline_protocol::{ItemRef, Point, Rect, RenderCommand, TextAlign, ThemeToken};

use crate::model::Lang;
use crate::surface::{Surface, replay};
use crate::svg::{escape_xml, resolve_color};

/// Render a list of commands as an HTML fragment.
///
/// The root element carries `lang` and, for Hebrew, `dir="rtl"`.
pub fn render_html(commands: &[RenderCommand], width: f64, height: f64, lang: Lang) -> String {
    let mut surface = HtmlSurface::new(width, height, lang);
    replay(commands, &mut surface);
    surface.finish()
}

pub struct HtmlSurface {
    out: String,
    lines: String,
    width: f64,
    height: f64,
}

impl HtmlSurface {
    pub fn new(width: f64, height: f64, lang: Lang) -> Self {
        let dir = if lang.is_rtl() { "rtl" } else { "ltr" };
        let mut out = String::with_capacity(16 * 1024);
        out.push_str(&format!(
            r#"<div class="timeline-container" lang="{}" dir="{dir}" style="position:relative;width:{width}px;height:{height}px;background:{}">"#,
            lang.code(),
            resolve_color(ThemeToken::Background, false),
        ));
        Self {
            out,
            lines: String::new(),
            width,
            height,
        }
    }

    pub fn finish(mut self) -> String {
        if !self.lines.is_empty() {
            self.out.push_str(&format!(
                r#"<svg class="family-connections" width="{w}" height="{h}" style="position:absolute;left:0;top:0;pointer-events:none">{}</svg>"#,
                self.lines,
                w = self.width,
                h = self.height,
            ));
        }
        self.out.push_str("</div>");
        self.out
    }
}

impl Surface for HtmlSurface {
    fn draw_rect(
        &mut self,
        rect: Rect,
        color: ThemeToken,
        border: Option<ThemeToken>,
        label: Option<&str>,
    ) {
        self.out.push_str(&format!(
            r#"<div style="position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;background:{};border-radius:4px"#,
            rect.x,
            rect.y,
            rect.w,
            rect.h,
            resolve_color(color, false),
        ));
        if let Some(border) = border {
            self.out.push_str(&format!(";border:1px solid {}", resolve_color(border, false)));
        }
        self.out.push('"');
        if let Some(label) = label {
            self.out.push_str(&format!(r#" title="{}""#, escape_xml(label)));
        }
        self.out.push_str("></div>");
    }

    fn draw_line(&mut self, from: Point, to: Point, color: ThemeToken, width: f64, dashed: bool) {
        self.lines.push_str(&format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{width}""#,
            from.x,
            from.y,
            to.x,
            to.y,
            resolve_color(color, false),
        ));
        if dashed {
            self.lines.push_str(r#" stroke-dasharray="6,4""#);
        }
        self.lines.push_str("/>");
    }

    fn draw_text(
        &mut self,
        position: Point,
        text: &str,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    ) {
        let shift = match align {
            TextAlign::Left => "",
            TextAlign::Center => ";transform:translateX(-50%)",
            TextAlign::Right => ";transform:translateX(-100%)",
        };
        // Positions are baselines; lift the box by the font size.
        self.out.push_str(&format!(
            r#"<span style="position:absolute;left:{}px;top:{}px;color:{};font-size:{font_size}px;white-space:nowrap;pointer-events:none{shift}">{}</span>"#,
            position.x,
            position.y - font_size,
            resolve_color(color, false),
            escape_xml(text),
        ));
    }

    fn register_click_region(&mut self, rect: Rect, target: &ItemRef) {
        self.out.push_str(&format!(
            r#"<div class="click-region" data-kind="{}" data-id="{}" style="position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;cursor:pointer"></div>"#,
            target.kind.as_str(),
            escape_xml(&target.id),
            rect.x,
            rect.y,
            rect.w,
            rect.h,
        ));
    }

    fn begin_group(&mut self, id: &str, label: Option<&str>) {
        self.out.push_str(&format!(r#"<div class="layer-{}""#, escape_xml(id)));
        if let Some(label) = label {
            self.out.push_str(&format!(r#" aria-label="{}""#, escape_xml(label)));
        }
        self.out.push('>');
    }

    fn end_group(&mut self) {
        self.out.push_str("</div>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bible_timeline_protocol::ItemKind;

    #[test]
    fn hebrew_root_is_right_to_left() {
        let html = render_html(&[], 100.0, 100.0, Lang::He);
        assert!(html.starts_with(r#"<div class="timeline-container" lang="he" dir="rtl""#));
        assert!(html.ends_with("</div>"));
        assert!(render_html(&[], 100.0, 100.0, Lang::En).contains(r#"dir="ltr""#));
    }

    #[test]
    fn boxes_text_and_regions() {
        let commands = vec![
            RenderCommand::BeginGroup {
                id: "people".into(),
                label: Some("People".into()),
            },
            RenderCommand::DrawRect {
                rect: Rect::new(100.0, 250.0, 80.0, 32.0),
                color: ThemeToken::PersonMale,
                border_color: None,
                label: Some("Moses (משה)".into()),
            },
            RenderCommand::DrawText {
                position: Point::new(106.0, 264.0),
                text: "Moses".into(),
                color: ThemeToken::TextPrimary,
                font_size: 12.0,
                align: TextAlign::Left,
            },
            RenderCommand::ClickRegion {
                rect: Rect::new(100.0, 250.0, 80.0, 32.0),
                target: ItemRef::new(ItemKind::Person, "moses"),
            },
            RenderCommand::EndGroup,
        ];
        let html = render_html(&commands, 500.0, 400.0, Lang::En);
        assert!(html.contains(r#"<div class="layer-people" aria-label="People">"#));
        assert!(html.contains(r#"title="Moses (משה)""#));
        assert!(html.contains(">Moses</span>"));
        assert!(html.contains(r#"data-kind="person" data-id="moses""#));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn lines_go_to_the_overlay() {
        let commands = vec![RenderCommand::DrawLine {
            from: Point::new(0.0, 10.0),
            to: Point::new(40.0, 50.0),
            color: ThemeToken::FamilyConnector,
            width: 3.0,
            dashed: true,
        }];
        let html = render_html(&commands, 100.0, 100.0, Lang::En);
        let overlay = html.find("<svg").expect("overlay present");
        assert!(html[overlay..].contains(r#"stroke-dasharray="6,4""#));
    }
}
