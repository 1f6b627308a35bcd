mod renderer;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use bible_timeline_core::content::{builtin, parse_chronology};
use bible_timeline_core::html::render_html;
use bible_timeline_core::layout::Zoom;
use bible_timeline_core::model::Lang;
use bible_timeline_core::svg::render_svg;
use bible_timeline_core::{TagFilter, TimelineConfig, TimelineController};
use clap::{Parser, ValueHint};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bilingual biblical timeline viewer", long_about = None)]
struct Cli {
    /// Layout config (TOML); defaults are used for missing keys
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Chronology content (JSON); the built-in chronology when omitted
    #[arg(long, value_hint = ValueHint::FilePath)]
    content: Option<PathBuf>,

    /// Display language: en or he
    #[arg(long, default_value = "en")]
    lang: Lang,

    /// Classification tag to show, or "all"
    #[arg(long, default_value = "all")]
    filter: TagFilter,

    /// Text filter over names and descriptions
    #[arg(long, default_value = "")]
    query: String,

    /// Initial zoom factor
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,

    /// Write the timeline as SVG and exit
    #[arg(long, value_hint = ValueHint::FilePath)]
    export_svg: Option<PathBuf>,

    /// Write the timeline as HTML and exit
    #[arg(long, value_hint = ValueHint::FilePath)]
    export_html: Option<PathBuf>,

    /// Use the dark palette for SVG export
    #[arg(long)]
    dark: bool,

    /// Log file for the interactive viewer (the terminal is busy drawing)
    #[arg(long, value_hint = ValueHint::FilePath)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn exporting(&self) -> bool {
        self.export_svg.is_some() || self.export_html.is_some()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut controller = build_controller(&cli)?;

    if cli.exporting() {
        return export(&cli, &mut controller);
    }
    renderer::run(&mut controller)
}

/// `RUST_LOG` overrides the default `warn` level. Export mode logs to
/// stderr; the interactive viewer logs only when given `--log-file`.
fn init_logging(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if cli.exporting() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    } else if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file: {}", path.display()))?;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    }
    Ok(())
}

fn build_controller(cli: &Cli) -> Result<TimelineController> {
    let config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file: {}", path.display()))?;
            TimelineConfig::from_toml_str(&text)
                .with_context(|| format!("failed to parse config file: {}", path.display()))?
        }
        None => TimelineConfig::default(),
    };

    let chronology = match &cli.content {
        Some(path) => {
            let data = std::fs::read(path)
                .with_context(|| format!("failed to read content file: {}", path.display()))?;
            parse_chronology(&data)
                .with_context(|| format!("failed to load content file: {}", path.display()))?
        }
        None => builtin().context("built-in content is invalid")?,
    };
    tracing::info!(
        periods = chronology.periods.len(),
        events = chronology.events.len(),
        people = chronology.people.len(),
        "content loaded"
    );

    let mut controller = TimelineController::new(chronology, config)?;
    controller.set_language(cli.lang);
    controller.set_tag_filter(cli.filter.clone());
    controller.set_query(cli.query.clone());
    let zoom = Zoom::new(cli.zoom).context("invalid --zoom")?;
    controller.set_zoom(zoom);
    Ok(controller)
}

fn export(cli: &Cli, controller: &mut TimelineController) -> Result<()> {
    let frame = controller.render();
    tracing::info!(
        people = frame.placements.len(),
        width = frame.content_width,
        height = frame.content_height,
        "rendered frame for export"
    );

    if let Some(path) = &cli.export_svg {
        let svg = render_svg(&frame.commands, frame.content_width, frame.content_height, cli.dark);
        write_output(path, &svg)?;
    }
    if let Some(path) = &cli.export_html {
        let html = render_html(
            &frame.commands,
            frame.content_width,
            frame.content_height,
            controller.context().lang,
        );
        write_output(path, &html)?;
    }
    Ok(())
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
