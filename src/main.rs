use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use env_logger::Env;
use log::warn;

use codecanvas::export::ExportOutcome;
use codecanvas::panel::{self, ControlEvent, PanelKind};
use codecanvas::{App, Background, ExportPipeline, Language, Settings, WindowTheme, DEFAULT_CODE};

/// Render source code as a styled PNG snapshot
#[derive(Parser, Debug)]
#[command(name = "codecanvas", version, about)]
struct Cli {
    /// Source file to render; `-` reads stdin. Without it a welcome snippet is used.
    input: Option<PathBuf>,

    /// javascript, typescript, html, css, python or json
    #[arg(long)]
    language: Option<String>,

    /// mesh-1, mesh-2, mesh-3, mesh-4, solid-dark or solid-slate
    #[arg(long)]
    background: Option<String>,

    /// dark, light or glass
    #[arg(long)]
    theme: Option<String>,

    /// Padding around the window in pixels (16..=96, step 8)
    #[arg(long, allow_negative_numbers = true)]
    padding: Option<i64>,

    /// Shadow intensity in percent (0..=100, step 10)
    #[arg(long, allow_negative_numbers = true)]
    shadow: Option<i64>,

    #[arg(long, overrides_with = "no_line_numbers")]
    line_numbers: bool,

    #[arg(long, overrides_with = "line_numbers")]
    no_line_numbers: bool,

    /// Label shown in the window header; also names the exported file
    #[arg(long)]
    file_name: Option<String>,

    /// JSON settings file to start from
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Directory the PNG is written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Print the composed SVG instead of exporting
    #[arg(long)]
    svg: bool,

    /// Print the settings controls after applying the flags instead of exporting
    #[arg(long, conflicts_with = "svg")]
    controls: bool,

    /// Viewport width, picks the side panel or the bottom sheet
    #[arg(long, default_value_t = 1280)]
    width: u32,
}

/// What to do once the flags are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Svg,
    Controls,
    Png,
}

impl Cli {
    fn output(&self) -> Output {
        if self.svg {
            Output::Svg
        } else if self.controls {
            Output::Controls
        } else {
            Output::Png
        }
    }
}

fn read_code(input: Option<&PathBuf>) -> anyhow::Result<String> {
    match input {
        None => Ok(DEFAULT_CODE.to_string()),
        Some(p) if p.as_os_str() == "-" => {
            let mut code = String::new();
            std::io::stdin().read_to_string(&mut code).context("reading stdin")?;
            Ok(code)
        }
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display())),
    }
}

fn control_events(cli: &Cli) -> Vec<ControlEvent> {
    let mut events = Vec::new();
    if let Some(id) = &cli.language {
        match id.parse::<Language>() {
            Ok(lang) => events.push(ControlEvent::Language(lang)),
            Err(e) => warn!("{}; keeping the current language", e),
        }
    }
    if let Some(id) = &cli.background {
        events.push(ControlEvent::Background(Background::from_id(id)));
    }
    if let Some(id) = &cli.theme {
        events.push(ControlEvent::WindowTheme(WindowTheme::from_id(id)));
    }
    if let Some(p) = cli.padding {
        events.push(ControlEvent::Padding(p));
    }
    if let Some(s) = cli.shadow {
        events.push(ControlEvent::ShadowIntensity(s));
    }
    if cli.line_numbers {
        events.push(ControlEvent::LineNumbers(true));
    } else if cli.no_line_numbers {
        events.push(ControlEvent::LineNumbers(false));
    }

    let input_name = cli
        .input
        .as_ref()
        .filter(|p| p.as_os_str() != "-")
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned());
    if let Some(name) = cli.file_name.clone().or(input_name) {
        events.push(ControlEvent::FileName(name));
    }
    events
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let code = read_code(cli.input.as_ref())?;
    let settings = match &cli.settings {
        Some(path) => Settings::from_json_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let mut app = App::with_state(code, settings, ExportPipeline::to_directory(&cli.out_dir));
    let kind = panel::surface_for_width(cli.width);
    if kind == PanelKind::Sheet {
        app.sheet_mut().open();
    }

    for event in control_events(&cli) {
        app.dispatch(kind, event);
    }

    match cli.output() {
        Output::Svg => {
            if let Some(preview) = app.preview() {
                println!("{}", preview.to_svg());
            }
            return Ok(());
        }
        Output::Controls => {
            for control in app.panel_controls(kind) {
                println!("{}", control);
            }
            return Ok(());
        }
        Output::Png => {}
    }

    let Some(job) = app.dispatch(kind, ControlEvent::ExportClicked) else {
        bail!("nothing to export");
    };
    match job.await {
        ExportOutcome::Saved { location, .. } => {
            println!("{}", location.display());
            Ok(())
        }
        ExportOutcome::Failed(e) => Err(e).context("export failed"),
    }
}
