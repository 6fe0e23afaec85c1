// Handles all interactions with the `systemctl` command.

use std::process::{Command, Output};

use tracing::debug;

use super::model::{ActionKind, Unit};
use crate::error::ManagerError;

/// The service manager as seen by the rest of the application.
///
/// Every call is all-or-nothing and may fail. Implementations must be usable
/// from the dispatcher's worker thread.
pub trait ServiceManager: Send + Sync {
    fn list_units(&self) -> Result<Vec<Unit>, ManagerError>;
    fn start_unit(&self, name: &str) -> Result<(), ManagerError>;
    fn stop_unit(&self, name: &str) -> Result<(), ManagerError>;
    fn restart_unit(&self, name: &str) -> Result<(), ManagerError>;
    fn enable_unit(&self, name: &str) -> Result<(), ManagerError>;
    fn disable_unit(&self, name: &str) -> Result<(), ManagerError>;

    fn perform(&self, name: &str, action: ActionKind) -> Result<(), ManagerError> {
        match action {
            ActionKind::Start => self.start_unit(name),
            ActionKind::Stop => self.stop_unit(name),
            ActionKind::Restart => self.restart_unit(name),
            ActionKind::Enable => self.enable_unit(name),
            ActionKind::Disable => self.disable_unit(name),
        }
    }
}

/// Talks to systemd by running one `systemctl` process per call, so no
/// connection outlives the call that opened it.
#[derive(Debug, Clone, Default)]
pub struct Systemctl {
    /// Target the per-user manager (`--user`) instead of the system one.
    pub user: bool,
    /// List every unit type, not just services.
    pub all_types: bool,
}

impl Systemctl {
    pub fn new(user: bool, all_types: bool) -> Self {
        Self { user, all_types }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("systemctl");
        if self.user {
            cmd.arg("--user");
        }
        cmd.arg("--no-pager");
        cmd
    }

    fn run(&self, operation: &str, mut cmd: Command) -> Result<Output, ManagerError> {
        debug!(operation, ?cmd, "running systemctl");
        let output = cmd
            .output()
            .map_err(|e| ManagerError::Connection(format!("failed to execute systemctl: {e}")))?;

        if output.status.success() {
            return Ok(output);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if is_bus_failure(&stderr) {
            return Err(ManagerError::Connection(stderr));
        }
        let message = if stderr.is_empty() {
            format!("systemctl exited with {}", output.status)
        } else {
            stderr
        };
        Err(ManagerError::Call {
            operation: operation.to_string(),
            message,
        })
    }

    fn control(&self, name: &str, action: ActionKind) -> Result<(), ManagerError> {
        let mut cmd = self.command();
        cmd.arg(action.as_str()).arg(name);
        self.run(action.as_str(), cmd).map(|_| ())
    }
}

impl ServiceManager for Systemctl {
    /// We use --all to see inactive units, and no-legend/plain for parsing safety.
    fn list_units(&self) -> Result<Vec<Unit>, ManagerError> {
        let mut cmd = self.command();
        cmd.arg("list-units");
        if !self.all_types {
            cmd.arg("--type=service");
        }
        cmd.arg("--all").arg("--no-legend").arg("--plain");

        let output = self.run("list-units", cmd)?;
        Ok(parse_units(&String::from_utf8_lossy(&output.stdout)))
    }

    fn start_unit(&self, name: &str) -> Result<(), ManagerError> {
        self.control(name, ActionKind::Start)
    }

    fn stop_unit(&self, name: &str) -> Result<(), ManagerError> {
        self.control(name, ActionKind::Stop)
    }

    fn restart_unit(&self, name: &str) -> Result<(), ManagerError> {
        self.control(name, ActionKind::Restart)
    }

    fn enable_unit(&self, name: &str) -> Result<(), ManagerError> {
        self.control(name, ActionKind::Enable)
    }

    fn disable_unit(&self, name: &str) -> Result<(), ManagerError> {
        self.control(name, ActionKind::Disable)
    }
}

fn is_bus_failure(stderr: &str) -> bool {
    stderr.contains("Failed to connect to bus") || stderr.contains("System has not been booted with systemd")
}

/// Parses `systemctl list-units --no-legend` output.
/// Expected format approx: [●] unit_name load active sub description...
pub fn parse_units(stdout: &str) -> Vec<Unit> {
    let mut units = Vec::new();

    for line in stdout.lines() {
        let mut parts = line
            .split_whitespace()
            .skip_while(|part| *part == "●" || *part == "*");

        let (Some(name), Some(load), Some(active), Some(sub)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            continue;
        };

        units.push(Unit {
            name: name.to_string(),
            load_state: load.to_string(),
            active_state: active.to_string(),
            sub_state: sub.to_string(),
            description: parts.collect::<Vec<_>>().join(" "),
        });
    }

    units
}
