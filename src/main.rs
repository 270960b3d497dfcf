//! sectionspy: follow a document's sections as you scroll.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use sectionspy::formats::{self, Format};
use sectionspy::{app_state, config, document, logging, ui};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "sectionspy")]
#[command(about = "Scroll spy navigation for document sections", long_about = None)]
struct Args {
    /// Document to read
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Configuration file (defaults to ./sectionspy.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Tree-sitter query selecting the observed sections
    #[arg(long, short = 's', value_name = "QUERY")]
    selector: Option<String>,

    /// List sections without following the scroll position
    #[arg(long)]
    no_spy: bool,

    /// Highlight the first section until something is centred
    #[arg(long)]
    activate_first: bool,

    /// Navigation panel headline
    #[arg(long)]
    headline: Option<String>,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    logging::init_logging(args.log.as_deref(), args.verbose)?;

    let loaded = match &args.config {
        Some(path) => config::Config::load_from(path),
        None => config::Config::load(),
    };
    let mut cfg = loaded.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    // Override config with command line args
    let format = formats::markdown::MarkdownFormat;
    if let Some(selector) = args.selector {
        cfg.nav.section_selector = selector;
    }
    if args.no_spy {
        cfg.nav.section_selector.clear();
    } else if cfg.nav.section_selector.is_empty() {
        cfg.nav.section_selector = format.section_query().to_string();
    }
    if args.activate_first {
        cfg.nav.activate_first_as_default = true;
    }
    if let Some(headline) = args.headline {
        cfg.nav.headline = headline;
    }

    let doc = document::Document::load(&args.path, &format, "", &cfg.nav)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if doc.headings.is_empty() {
        eprintln!("No sections found in {}", args.path.display());
        return Ok(());
    }
    info!(path = %args.path.display(), sections = doc.headings.len(), "document loaded");

    let state = app_state::AppState::new(doc, &cfg);
    run_tui(state)
}

fn run_tui(mut app: app_state::AppState) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = app.shutdown() {
        error!(error = %e, "failed to dispose tracking service");
    }

    if let Err(e) = result {
        eprintln!("Error: {e}");
    } else {
        let snapshot = app.snapshot();
        let json = serde_json::to_string_pretty(&snapshot).map_err(io::Error::other)?;
        println!("{json}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut app_state::AppState,
) -> io::Result<()> {
    loop {
        if app.dirty.replace(false) {
            terminal.draw(|f| ui::draw(f, app))?;
        }

        // The pane height is only known once the first frame is laid out
        if app.needs_attach() {
            if let Err(e) = app.attach(app.viewport_height()) {
                app.message = Some(format!("Scroll spy unavailable: {e}"));
            }
            app.follow_active();
            app.dirty.set(true);
            continue;
        }

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
                KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
                KeyCode::PageDown | KeyCode::Char(' ') => {
                    app.scroll_lines(page(app.viewport_height()));
                }
                KeyCode::PageUp => app.scroll_lines(-page(app.viewport_height())),
                KeyCode::Home | KeyCode::Char('g') => app.scroll_lines(isize::MIN),
                KeyCode::End | KeyCode::Char('G') => app.scroll_lines(isize::MAX),
                KeyCode::Tab => {
                    app.next_entry();
                    app.dirty.set(true);
                }
                KeyCode::BackTab => {
                    app.prev_entry();
                    app.dirty.set(true);
                }
                KeyCode::Enter => {
                    app.click_entry();
                    app.dirty.set(true);
                }
                _ => {}
            },
            Event::Resize(_, _) => app.dirty.set(true),
            _ => {}
        }
    }
}

fn page(height: usize) -> isize {
    isize::try_from(height.saturating_sub(1).max(1)).unwrap_or(isize::MAX)
}
