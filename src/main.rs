//! libris - a terminal front end for a library book catalog
//!
//! This is the main entry point for the libris application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod error;
mod logging;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::{Config, Overrides};
use crate::model::Catalog;
use crate::tui::Tui;
use anyhow::Result;
use clap::Parser;
use crossterm::event::Event;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "libris")]
#[command(version)]
#[command(about = "Search and browse a library book catalog from the terminal")]
struct Args {
    /// Catalog JSON file (defaults to the bundled sample catalog)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Config file (defaults to <config_dir>/libris/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Quiet period after the last keystroke before searching
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// List the catalog as soon as the empty search box is focused
    #[arg(long)]
    show_all_on_empty: bool,

    /// Log file (defaults to <data_dir>/libris/libris.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = args.log_file.clone().or_else(logging::default_log_path) {
        if let Err(e) = logging::init(&path) {
            eprintln!("Logging disabled: {:#}", e);
        }
    }

    let config = Config::load(args.config.as_deref()).with_overrides(Overrides {
        catalog_path: args.catalog,
        debounce_ms: args.debounce_ms,
        show_all_on_empty: args.show_all_on_empty,
    });
    tracing::info!(?config, "starting libris");

    let catalog = match config.catalog_path.as_deref() {
        Some(path) => match Catalog::load(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!("{}", e);
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => Catalog::sample(),
    };

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(50));
    tui.enter()?;

    let mut app = App::new(config, catalog);

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    if let Err(err) = result {
        tracing::error!("{:?}", err);
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    tracing::info!("exiting");
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    let mut last_tick = Instant::now();

    while !app.should_quit {
        let mut draw_result = Ok(());
        tui.draw(|frame| draw_result = app.draw(frame, frame.area()))?;
        draw_result?;

        // Convert event to action
        let action = match tui.next_event()? {
            Some(Event::Key(key)) => app.handle_key_event(key)?,
            Some(Event::Mouse(mouse)) => app.handle_mouse_event(mouse)?,
            Some(Event::Resize(w, h)) => Some(Action::Resize(w, h)),
            _ => None,
        };
        dispatch(app, action)?;

        // Tick on schedule even while events keep arriving, so a debounce
        // deadline is never starved by mouse motion
        if last_tick.elapsed() >= tui.tick_rate {
            last_tick = Instant::now();
            dispatch(app, Some(Action::Tick))?;
        }
    }

    Ok(())
}

/// Process an action and every follow-up action it produces
fn dispatch(app: &mut App, action: Option<Action>) -> Result<()> {
    let mut current_action = action;
    while let Some(a) = current_action {
        current_action = app.update(a)?;
    }
    Ok(())
}
