use std::io::stdout;

use anyhow::Result;
use bible_timeline_core::filter::TagFilter;
use bible_timeline_core::model::{Chronology, Lang};
use bible_timeline_core::surface::{Surface, replay};
use bible_timeline_core::views::format_year;
use bible_timeline_core::TimelineController;
use bible_timeline_protocol::{ItemKind, ItemRef, Point, Rect, TextAlign, ThemeToken};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect as CellRect,
    style::{Color, Style},
    widgets::Paragraph,
};

/// Content pixels per terminal column.
const PX_PER_COL: f64 = 8.0;
/// Content pixels per terminal row; half a person lane.
const PX_PER_ROW: f64 = 20.0;

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Background => Color::Black,
        ThemeToken::Border | ThemeToken::AxisTick => Color::DarkGray,
        ThemeToken::PersonMale => Color::Rgb(61, 111, 182),
        ThemeToken::PersonFemale => Color::Rgb(182, 90, 140),
        ThemeToken::PersonSpecial => Color::Rgb(212, 175, 55),
        ThemeToken::PersonBorder => Color::White,
        ThemeToken::FamilyConnector => Color::Yellow,
        ThemeToken::PeriodBand => Color::Rgb(24, 24, 40),
        ThemeToken::PeriodBorder => Color::Rgb(52, 52, 90),
        ThemeToken::PeriodLabel => Color::Rgb(184, 184, 216),
        ThemeToken::EventMarker => Color::Rgb(230, 126, 34),
        ThemeToken::EventLabel => Color::LightRed,
        ThemeToken::AxisLine | ThemeToken::AxisLabel | ThemeToken::TextSecondary => Color::Gray,
        ThemeToken::TextPrimary => Color::White,
        ThemeToken::SearchHighlight => Color::LightYellow,
    }
}

/// Paints render commands into a ratatui buffer.
///
/// Content coordinates are shifted by the scroll origin and divided down
/// to cells. Text never overwrites earlier text, so a person's name wins
/// over the lifespan caption that lands on the same row.
pub struct TerminalSurface<'a> {
    buf: &'a mut Buffer,
    area: CellRect,
    origin: Point,
    text_mask: Vec<bool>,
}

impl<'a> TerminalSurface<'a> {
    pub fn new(buf: &'a mut Buffer, area: CellRect, origin: Point) -> Self {
        let cells = usize::from(area.width) * usize::from(area.height);
        Self {
            buf,
            area,
            origin,
            text_mask: vec![false; cells],
        }
    }

    fn col(&self, x: f64) -> i64 {
        ((x - self.origin.x) / PX_PER_COL).floor() as i64
    }

    fn row(&self, y: f64) -> i64 {
        ((y - self.origin.y) / PX_PER_ROW).round() as i64
    }

    /// Buffer position of a cell, if it falls inside the area.
    fn cell(&self, col: i64, row: i64) -> Option<(u16, u16)> {
        if col < 0 || row < 0 || col >= i64::from(self.area.width) || row >= i64::from(self.area.height)
        {
            return None;
        }
        Some((self.area.x + col as u16, self.area.y + row as u16))
    }

    fn mask_index(&self, pos: (u16, u16)) -> usize {
        usize::from(pos.1 - self.area.y) * usize::from(self.area.width)
            + usize::from(pos.0 - self.area.x)
    }
}

impl Surface for TerminalSurface<'_> {
    fn draw_rect(&mut self, rect: Rect, color: ThemeToken, border: Option<ThemeToken>, _: Option<&str>) {
        // Cells have no outline, so a search hit takes the highlight as fill.
        let fill = match border {
            Some(ThemeToken::SearchHighlight) => ThemeToken::SearchHighlight,
            _ => color,
        };
        let bg = theme_to_color(fill);
        let (c0, c1) = (self.col(rect.x), self.col(rect.right()).max(self.col(rect.x) + 1));
        let (r0, r1) = (self.row(rect.y), self.row(rect.bottom()).max(self.row(rect.y) + 1));
        for row in r0..r1 {
            for col in c0..c1 {
                if let Some(pos) = self.cell(col, row) {
                    self.buf[pos].set_char(' ').set_bg(bg);
                }
            }
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, color: ThemeToken, width: f64, dashed: bool) {
        // Hairlines are gridlines; too noisy at cell resolution.
        if width < 1.0 {
            return;
        }
        let fg = theme_to_color(color);
        let (c0, r0) = (self.col(from.x), self.row(from.y));
        let (c1, r1) = (self.col(to.x), self.row(to.y));
        let steps = (c1 - c0).abs().max((r1 - r0).abs()).max(1);
        let glyph = if dashed {
            '·'
        } else if c0 == c1 {
            '│'
        } else if r0 == r1 {
            '─'
        } else {
            '·'
        };
        for i in 0..=steps {
            if dashed && i % 2 == 1 {
                continue;
            }
            let col = c0 + (c1 - c0) * i / steps;
            let row = r0 + (r1 - r0) * i / steps;
            if let Some(pos) = self.cell(col, row) {
                if self.text_mask[self.mask_index(pos)] {
                    continue;
                }
                self.buf[pos].set_char(glyph).set_fg(fg);
            }
        }
    }

    fn draw_text(&mut self, position: Point, text: &str, color: ThemeToken, _: f64, align: TextAlign) {
        let fg = theme_to_color(color);
        let len = text.chars().count() as i64;
        let anchor = self.col(position.x);
        let start = match align {
            TextAlign::Left => anchor,
            TextAlign::Center => anchor - len / 2,
            TextAlign::Right => anchor - len,
        };
        // Baselines sit near the bottom of a row.
        let row = ((position.y - self.origin.y) / PX_PER_ROW).floor() as i64;

        let cells: Vec<Option<(u16, u16)>> =
            (0..len).map(|i| self.cell(start + i, row)).collect();
        if cells.iter().flatten().any(|&pos| self.text_mask[self.mask_index(pos)]) {
            return;
        }
        for (ch, pos) in text.chars().zip(cells) {
            if let Some(pos) = pos {
                let index = self.mask_index(pos);
                self.text_mask[index] = true;
                self.buf[pos].set_char(ch).set_fg(fg);
            }
        }
    }

    fn register_click_region(&mut self, _: Rect, _: &ItemRef) {}
}

/// Map a clicked cell back to content coordinates.
fn cell_to_content(col: u16, row: u16, area: CellRect, origin: Point) -> Point {
    Point::new(
        origin.x + (f64::from(col.saturating_sub(area.x)) + 0.5) * PX_PER_COL,
        origin.y + (f64::from(row.saturating_sub(area.y)) + 0.5) * PX_PER_ROW,
    )
}

/// "all" followed by every tag carried by a person, sorted.
fn filter_cycle(chronology: &Chronology) -> Vec<TagFilter> {
    let mut tags: Vec<&str> = chronology
        .people
        .iter()
        .flat_map(|p| p.tags.iter().map(String::as_str))
        .collect();
    tags.sort_unstable();
    tags.dedup();
    std::iter::once(TagFilter::All)
        .chain(tags.into_iter().map(|t| TagFilter::Tag(t.to_string())))
        .collect()
}

/// One-line description of a clicked record for the status bar.
fn describe(controller: &TimelineController, item: &ItemRef) -> String {
    let lang = controller.context().lang;
    let chronology = controller.chronology();
    match item.kind {
        ItemKind::Person => match chronology.person_details(&item.id) {
            Some(details) => {
                let mut line = details.person.display_name(lang).to_string();
                let born = format_year(details.person.interval.start(), lang);
                match details.years_lived {
                    Some(years) => line.push_str(&format!(" | {born} | {years} {}", years_word(lang))),
                    None => line.push_str(&format!(" | {born}+")),
                }
                if let Some(parent) = details.parent {
                    line.push_str(&format!(" | parent: {}", parent.display_name(lang)));
                }
                if !details.children.is_empty() {
                    line.push_str(&format!(" | children: {}", details.children.len()));
                }
                if !details.contemporaries.is_empty() {
                    line.push_str(&format!(" | contemporaries: {}", details.contemporaries.len()));
                }
                if let Some(period) = details.period {
                    line.push_str(&format!(" | {}", period.display_name(lang)));
                }
                line
            }
            None => item.id.to_string(),
        },
        ItemKind::Event | ItemKind::Period => match chronology.resolve(item) {
            Some(record) => {
                let mut line = format!(
                    "{} | {}",
                    record.display_name(lang),
                    format_year(record.interval.start(), lang)
                );
                if let Some(reference) = &record.reference {
                    line.push_str(&format!(" | {reference}"));
                }
                line
            }
            None => item.id.to_string(),
        },
    }
}

fn years_word(lang: Lang) -> &'static str {
    match lang {
        Lang::En => "years",
        Lang::He => "שנים",
    }
}

enum Mode {
    Browse,
    Search,
}

/// Run the interactive viewer until the user quits.
pub fn run(controller: &mut TimelineController) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, controller);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    controller: &mut TimelineController,
) -> Result<()> {
    let filters = filter_cycle(controller.chronology());
    let mut filter_index = 0;
    let mut mode = Mode::Browse;
    let mut status = String::new();

    loop {
        let size = terminal.size()?;
        let content_area = CellRect::new(0, 1, size.width, size.height.saturating_sub(2));
        controller.resize(
            f64::from(content_area.width) * PX_PER_COL,
            f64::from(content_area.height) * PX_PER_ROW,
        );
        let frame = controller.render();
        let viewport = controller.context().viewport;
        let origin = Point::new(viewport.x, viewport.y);

        let header = format!(
            " Bible Timeline | {} people | avg {} yrs | zoom {}% | filter: {} | lang: {} ",
            frame.stats.total,
            frame.stats.average_lifespan,
            controller.zoom_percent(),
            controller.context().filter.tag,
            controller.context().lang,
        );
        let footer = match mode {
            Mode::Search => format!(" search: {}_ ", controller.context().filter.query),
            Mode::Browse if !status.is_empty() => format!(" {status} "),
            Mode::Browse => {
                " ←→↑↓ scroll | +/- zoom | 0 reset | f filter | / search | l language | click details | q quit "
                    .to_string()
            }
        };

        terminal.draw(|f| {
            let area = f.area();
            f.render_widget(
                Paragraph::new(header.as_str()).style(Style::default().fg(Color::White).bg(Color::DarkGray)),
                CellRect::new(0, 0, area.width, 1),
            );
            f.render_widget(
                Paragraph::new(footer.as_str()).style(Style::default().fg(Color::White).bg(Color::DarkGray)),
                CellRect::new(0, area.height.saturating_sub(1), area.width, 1),
            );
            let mut surface = TerminalSurface::new(f.buffer_mut(), content_area, origin);
            replay(&frame.commands, &mut surface);
        })?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        let step_x = viewport.width / 4.0;
        let max_x = (frame.content_width - viewport.width).max(0.0);
        let max_y = (frame.content_height - viewport.height).max(0.0);

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match mode {
                Mode::Search => match key.code {
                    KeyCode::Enter | KeyCode::Esc => mode = Mode::Browse,
                    KeyCode::Backspace => {
                        let mut query = controller.context().filter.query.clone();
                        query.pop();
                        controller.set_query(query);
                    }
                    KeyCode::Char(c) => {
                        let mut query = controller.context().filter.query.clone();
                        query.push(c);
                        controller.set_query(query);
                    }
                    _ => {}
                },
                Mode::Browse => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Left => controller.scroll_to((viewport.x - step_x).max(0.0), viewport.y),
                    KeyCode::Right => controller.scroll_to((viewport.x + step_x).min(max_x), viewport.y),
                    KeyCode::Up => controller.scroll_to(viewport.x, viewport.y - PX_PER_ROW * 2.0),
                    KeyCode::Down => {
                        controller.scroll_to(viewport.x, (viewport.y + PX_PER_ROW * 2.0).min(max_y));
                    }
                    KeyCode::Home => controller.scroll_to(0.0, viewport.y),
                    KeyCode::Char('+') | KeyCode::Char('=') => zoom_around_centre(controller, true),
                    KeyCode::Char('-') => zoom_around_centre(controller, false),
                    KeyCode::Char('0') => {
                        let year = controller.centre_year().round() as i32;
                        controller.reset_zoom();
                        let x = controller.scroll_offset_for_year(year);
                        controller.scroll_to(x, viewport.y);
                    }
                    KeyCode::Char('f') => {
                        filter_index = (filter_index + 1) % filters.len().max(1);
                        if let Some(tag) = filters.get(filter_index) {
                            controller.set_tag_filter(tag.clone());
                        }
                    }
                    KeyCode::Char('/') => {
                        status.clear();
                        mode = Mode::Search;
                    }
                    KeyCode::Char('l') => {
                        controller.toggle_language();
                    }
                    _ => {}
                },
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    let point = cell_to_content(mouse.column, mouse.row, content_area, origin);
                    status = match controller.hit_test(point.x, point.y) {
                        Some(item) => describe(controller, &item),
                        None => String::new(),
                    };
                }
                MouseEventKind::ScrollDown => {
                    controller.scroll_to(viewport.x, (viewport.y + PX_PER_ROW).min(max_y));
                }
                MouseEventKind::ScrollUp => controller.scroll_to(viewport.x, viewport.y - PX_PER_ROW),
                MouseEventKind::ScrollLeft => controller.scroll_to(viewport.x - step_x / 4.0, viewport.y),
                MouseEventKind::ScrollRight => {
                    controller.scroll_to((viewport.x + step_x / 4.0).min(max_x), viewport.y);
                }
                _ => {}
            },
            _ => {}
        }
    }

    tracing::debug!(zoom = controller.zoom_percent(), "viewer closed");
    Ok(())
}

/// Zoom while keeping the year at the centre of the viewport in place.
fn zoom_around_centre(controller: &mut TimelineController, zoom_in: bool) {
    let year = controller.centre_year().round() as i32;
    let zoom = if zoom_in {
        controller.zoom_in()
    } else {
        controller.zoom_out()
    };
    let x = controller.scroll_offset_for_year(year);
    let y = controller.context().viewport.y;
    controller.scroll_to(x, y);
    tracing::debug!(zoom = zoom.get(), year, "zoomed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use bible_timeline_core::content::builtin;
    use bible_timeline_core::TimelineConfig;

    fn row_text(buf: &Buffer, row: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, row)].symbol().to_string())
            .collect()
    }

    #[test]
    fn person_bar_and_name_land_on_one_row() {
        let area = CellRect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        {
            let mut surface = TerminalSurface::new(&mut buf, area, Point::new(0.0, 0.0));
            surface.draw_rect(
                Rect::new(16.0, 250.0, 160.0, 32.0),
                ThemeToken::PersonMale,
                None,
                None,
            );
            surface.draw_text(
                Point::new(22.0, 264.0),
                "David",
                ThemeToken::TextPrimary,
                12.0,
                TextAlign::Left,
            );
            surface.draw_text(
                Point::new(22.0, 278.0),
                "70 yrs",
                ThemeToken::TextSecondary,
                10.0,
                TextAlign::Left,
            );
        }
        // 250 / 20 rounds to row 13; 264 / 20 floors to row 13.
        let text = row_text(&buf, 13);
        assert!(text.contains("David"), "{text:?}");
        assert!(!text.contains("yrs"));
        assert_eq!(buf[(2, 13)].bg, theme_to_color(ThemeToken::PersonMale));
    }

    #[test]
    fn search_hits_fill_with_highlight() {
        let area = CellRect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        {
            let mut surface = TerminalSurface::new(&mut buf, area, Point::new(0.0, 0.0));
            surface.draw_rect(
                Rect::new(0.0, 20.0, 40.0, 20.0),
                ThemeToken::PersonMale,
                Some(ThemeToken::SearchHighlight),
                None,
            );
        }
        assert_eq!(buf[(0, 1)].bg, theme_to_color(ThemeToken::SearchHighlight));
    }

    #[test]
    fn scrolled_content_is_clipped() {
        let area = CellRect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        {
            let mut surface = TerminalSurface::new(&mut buf, area, Point::new(800.0, 0.0));
            surface.draw_text(
                Point::new(100.0, 20.0),
                "Flood",
                ThemeToken::EventLabel,
                11.0,
                TextAlign::Left,
            );
        }
        assert!(!row_text(&buf, 1).contains("Flood"));
    }

    #[test]
    fn click_maps_back_to_content() {
        let area = CellRect::new(0, 1, 80, 20);
        let p = cell_to_content(10, 14, area, Point::new(400.0, 0.0));
        assert_eq!(p.x, 400.0 + 10.5 * PX_PER_COL);
        assert_eq!(p.y, 13.5 * PX_PER_ROW);
    }

    #[test]
    fn filter_cycle_starts_with_all() {
        let chronology = builtin().expect("builtin content");
        let cycle = filter_cycle(&chronology);
        assert_eq!(cycle.first(), Some(&TagFilter::All));
        assert!(cycle.contains(&TagFilter::Tag("female".into())));
        assert!(cycle.contains(&TagFilter::Tag("king".into())));
    }

    #[test]
    fn describes_the_clicked_collection() {
        use bible_timeline_core::model::{Interval, LocalizedText, RecordKind, TimeRecord};

        let chronology = Chronology {
            periods: vec![TimeRecord::new(
                "exodus",
                RecordKind::Period,
                LocalizedText::plain("Wilderness Years"),
                Interval::new(-1491, Some(-1451)).unwrap_or(Interval::open(-1491)),
            )],
            events: vec![TimeRecord::new(
                "exodus",
                RecordKind::Event,
                LocalizedText::plain("The Exodus"),
                Interval::instant(-1491),
            )],
            people: vec![],
        };
        let controller = TimelineController::new(chronology, TimelineConfig::default())
            .expect("default config");
        assert_eq!(
            describe(&controller, &ItemRef::new(ItemKind::Event, "exodus")),
            "The Exodus | 1491 BCE"
        );
        assert_eq!(
            describe(&controller, &ItemRef::new(ItemKind::Period, "exodus")),
            "Wilderness Years | 1491 BCE"
        );
    }

    #[test]
    fn describes_people_with_family() {
        let controller = TimelineController::new(
            builtin().expect("builtin content"),
            TimelineConfig::default(),
        )
        .expect("default config");
        let line = describe(&controller, &ItemRef::new(ItemKind::Person, "isaac"));
        assert!(line.starts_with("Isaac | 2066 BCE | 180 years"), "{line}");
        assert!(line.contains("parent: Abraham"));
        assert!(line.contains("children: 1"));
    }
}
