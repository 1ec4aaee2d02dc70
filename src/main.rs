//! Line View - Entry Point

use clap::{Parser, ValueEnum};
use lineview::model::{AppError, StyleKey, StyledSegment};
use lineview::render::monospace::{layout_lines, MonoFactory, MonoMeasurer};
use lineview::report::ViewportReport;
use lineview::view_state::LineDisplay;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Header plus one row per visible line
    Text,
    /// JSON document
    Json,
}

/// Line View - inspect the visible window of a text file in a virtual pane
#[derive(Parser, Debug)]
#[command(name = "lineview")]
#[command(version)]
#[command(about = "Show which lines of a file a virtualized editor pane would render")]
pub struct Args {
    /// Path to the text file
    pub file: PathBuf,

    /// Pane width in pixels
    #[arg(long, default_value_t = 640.0)]
    pub width: f64,

    /// Pane height in pixels
    #[arg(long, default_value_t = 400.0)]
    pub height: f64,

    /// Wrap long lines
    #[arg(long)]
    pub wrap: bool,

    /// Style description, e.g. "font-size: 12px"
    #[arg(long)]
    pub style: Option<String>,

    /// Put this line at the top of the pane
    #[arg(long)]
    pub scroll_to: Option<usize>,

    /// Scroll by a pixel delta; negative moves down. Repeatable.
    #[arg(long, allow_negative_numbers = true)]
    pub scroll_by: Vec<f64>,

    /// Scroll minimally so this line is fully shown
    #[arg(long)]
    pub ensure_line: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String, AppError> {
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = lineview::config::load_config_with_precedence(args.config.clone())?;
        let merged = lineview::config::merge_config(config_file);
        let with_env = lineview::config::apply_env_overrides(merged);
        let wrap_override = if args.wrap { Some(true) } else { None };
        lineview::config::apply_cli_overrides(with_env, args.style.clone(), wrap_override)
    };

    lineview::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let contents = std::fs::read_to_string(&args.file).map_err(|source| AppError::Input {
        path: args.file.clone(),
        source,
    })?;
    let document: Vec<Vec<StyledSegment>> = contents
        .lines()
        .map(|line| vec![StyledSegment::plain(line)])
        .collect();
    let line_count = document.len();

    let options = config.display_options();
    let mut display = LineDisplay::new(MonoFactory::new(options.margin_width), MonoMeasurer::snapping(), options)
        .with_style(StyleKey::new(config.style.clone()));
    let wrap = config.line_wrap;
    let (width, height) = (args.width, args.height);

    display.recalculate(&document, 0.0, width, height, wrap);

    if let Some(line) = args.scroll_to {
        display.scroll_to(line, 0.0);
    }
    for &delta in &args.scroll_by {
        display.scroll_by(delta, line_count, height);
    }
    if let Some(line) = args.ensure_line {
        display.recalculate(&document, 0.0, width, height, wrap);
        display.ensure_line_visible(line, height, line_count);
    }

    display.recalculate(&document, 0.0, width, height, wrap);
    let top = display.first_visible_line_offset();
    layout_lines(display.visible_lines_mut(), top, width);

    if let Some(line) = args.ensure_line {
        display.get_visible_line(line)?;
    }

    let report = ViewportReport::capture(&display, line_count);
    info!(first = ?report.first, last = ?report.last, "Report captured");
    match args.format {
        OutputFormat::Text => Ok(report.to_text()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&report)?),
    }
}
