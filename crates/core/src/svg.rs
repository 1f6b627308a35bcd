//! SVG renderer: replays `RenderCommand` lists into a standalone SVG string.

use bible_timeline_protocol::{ItemRef, Point, Rect, RenderCommand, TextAlign, ThemeToken};

use crate::surface::{Surface, replay};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
/// `dark` selects the color palette.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut surface = SvgSurface::new(width, height, dark);
    replay(commands, &mut surface);
    surface.finish()
}

/// Accumulates SVG markup. Groups become `<g>` elements and click regions
/// become transparent rects carrying `data-kind`/`data-id`.
pub struct SvgSurface {
    out: String,
    dark: bool,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64, dark: bool) -> Self {
        let mut out = String::with_capacity(16 * 1024);
        out.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif">"#,
        ));
        out.push_str(&format!(
            r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
            resolve_color(ThemeToken::Background, dark),
        ));
        Self { out, dark }
    }

    pub fn finish(mut self) -> String {
        self.out.push_str("</svg>");
        self.out
    }
}

impl Surface for SvgSurface {
    fn draw_rect(
        &mut self,
        rect: Rect,
        color: ThemeToken,
        border: Option<ThemeToken>,
        label: Option<&str>,
    ) {
        let fill = resolve_color(color, self.dark);
        self.out.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}" rx="4""#,
            rect.x, rect.y, rect.w, rect.h,
        ));
        if let Some(border) = border {
            self.out.push_str(&format!(
                r#" stroke="{}" stroke-width="1""#,
                resolve_color(border, self.dark)
            ));
        }
        self.out.push('>');
        if let Some(label) = label {
            self.out.push_str(&format!("<title>{}</title>", escape_xml(label)));
        }
        self.out.push_str("</rect>");
    }

    fn draw_line(&mut self, from: Point, to: Point, color: ThemeToken, width: f64, dashed: bool) {
        let stroke = resolve_color(color, self.dark);
        self.out.push_str(&format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{width}""#,
            from.x, from.y, to.x, to.y,
        ));
        if dashed {
            self.out.push_str(r#" stroke-dasharray="6,4""#);
        }
        self.out.push_str("/>");
    }

    fn draw_text(
        &mut self,
        position: Point,
        text: &str,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    ) {
        let fill = resolve_color(color, self.dark);
        let anchor = match align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        self.out.push_str(&format!(
            r#"<text x="{}" y="{}" fill="{fill}" font-size="{font_size}" text-anchor="{anchor}" style="pointer-events:none">{}</text>"#,
            position.x,
            position.y,
            escape_xml(text),
        ));
    }

    fn register_click_region(&mut self, rect: Rect, target: &ItemRef) {
        self.out.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="transparent" data-kind="{}" data-id="{}"/>"#,
            rect.x,
            rect.y,
            rect.w,
            rect.h,
            target.kind.as_str(),
            escape_xml(&target.id),
        ));
    }

    fn begin_group(&mut self, id: &str, _label: Option<&str>) {
        self.out.push_str(&format!(r#"<g id="{}">"#, escape_xml(id)));
    }

    fn end_group(&mut self) {
        self.out.push_str("</g>");
    }
}

pub(crate) fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    if dark {
        match token {
            ThemeToken::Background => "#0f1020",
            ThemeToken::Border | ThemeToken::AxisTick => "#303048",
            ThemeToken::PersonMale => "#3d6fb6",
            ThemeToken::PersonFemale => "#b65a8c",
            ThemeToken::PersonSpecial => "#d4af37",
            ThemeToken::PersonBorder => "#e0e0e0",
            ThemeToken::FamilyConnector => "#d4af37",
            ThemeToken::PeriodBand => "#1c1c34",
            ThemeToken::PeriodBorder => "#34345a",
            ThemeToken::PeriodLabel => "#b8b8d8",
            ThemeToken::EventMarker => "#e67e22",
            ThemeToken::EventLabel => "#ffb74d",
            ThemeToken::AxisLine => "#9e9e9e",
            ThemeToken::AxisLabel | ThemeToken::TextSecondary => "#b0b0b0",
            ThemeToken::TextPrimary => "#ececec",
            ThemeToken::SearchHighlight => "#ffeb3b",
        }
    } else {
        match token {
            ThemeToken::Background => "#fdfaf3",
            ThemeToken::Border | ThemeToken::AxisTick => "#dcd6c8",
            ThemeToken::PersonMale => "#5b8fd9",
            ThemeToken::PersonFemale => "#d97bab",
            ThemeToken::PersonSpecial => "#d4af37",
            ThemeToken::PersonBorder => "#ffffff",
            ThemeToken::FamilyConnector => "#b8942a",
            ThemeToken::PeriodBand => "#f3ecdc",
            ThemeToken::PeriodBorder => "#e2d6b8",
            ThemeToken::PeriodLabel => "#6b5a3a",
            ThemeToken::EventMarker => "#c0392b",
            ThemeToken::EventLabel => "#922b21",
            ThemeToken::AxisLine => "#5a5a6e",
            ThemeToken::AxisLabel | ThemeToken::TextSecondary => "#555566",
            ThemeToken::TextPrimary => "#1a1a2e",
            ThemeToken::SearchHighlight => "#00b87a",
        }
    }
}

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
