mod app;
mod config;
mod error;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{io, sync::Arc};

use app::App;
use app::systemd::Systemctl;
use config::Config;

fn main() -> Result<()> {
    let config = Config::parse();
    logging::init_logging(&config)?;
    tracing::info!(?config, "starting");

    let manager = Arc::new(Systemctl::new(config.user, config.all_types));
    let mut app = App::new(manager, usize::from(config.page_size), config.filter_mode);

    // Without a first listing there is nothing to show.
    app.refresh().context("failed to list units")?;

    let mut terminal = setup_terminal()?;
    let result = app.run(&mut terminal, config.tick_rate());
    restore_terminal(&mut terminal)?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "event loop failed");
    }
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
