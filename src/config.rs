// Startup options. Nothing here can change once the UI is running.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::filter::FilterMode;

#[derive(Debug, Clone, Parser)]
#[command(name = "systemd-unit-browser", version, about = "Browse, filter and control systemd units")]
pub struct Config {
    /// Rows shown per page.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(1..))]
    pub page_size: u16,

    /// Seconds between automatic refreshes (0 disables them).
    #[arg(long, default_value_t = 5)]
    pub refresh_secs: u64,

    /// Talk to the per-user service manager instead of the system one.
    #[arg(long)]
    pub user: bool,

    /// List every unit type, not only services.
    #[arg(long)]
    pub all_types: bool,

    /// Whether filter edits apply on every keystroke or only on Enter.
    #[arg(long, value_enum, default_value_t = FilterMode::Live)]
    pub filter_mode: FilterMode,

    /// Write logs to this file. Without it logs are discarded.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn tick_rate(&self) -> Option<Duration> {
        (self.refresh_secs > 0).then(|| Duration::from_secs(self.refresh_secs))
    }
}
