// Defines the core data structures for the application.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::error::ValidationError;

/// Snapshot of one unit as reported by the service manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub name: String,
    pub load_state: String,   // e.g., "loaded", "not-found"
    pub active_state: String, // e.g., "active", "inactive", "failed"
    pub sub_state: String,    // e.g., "running", "dead", "exited"
    pub description: String,
}

impl Unit {
    pub fn is_running(&self) -> bool {
        self.active_state == "active" && self.sub_state == "running"
    }

    pub fn is_failed(&self) -> bool {
        self.active_state == "failed"
    }
}

/// Lifecycle operations that can be requested against a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Start,
    Stop,
    Restart,
    Enable,
    Disable,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::Start,
        ActionKind::Stop,
        ActionKind::Restart,
        ActionKind::Enable,
        ActionKind::Disable,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Start => "start",
            ActionKind::Stop => "stop",
            ActionKind::Restart => "restart",
            ActionKind::Enable => "enable",
            ActionKind::Disable => "disable",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let wanted = input.trim().to_lowercase();
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownAction(input.trim().to_string()))
    }
}

/// The single in-flight action, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub unit: String,
    pub action: ActionKind,
    pub started_at: Instant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action_kinds() {
        assert_eq!("start".parse::<ActionKind>(), Ok(ActionKind::Start));
        assert_eq!(" Restart ".parse::<ActionKind>(), Ok(ActionKind::Restart));
        assert_eq!("DISABLE".parse::<ActionKind>(), Ok(ActionKind::Disable));
    }

    #[test]
    fn test_parse_rejects_unknown_action() {
        assert_eq!(
            "reload".parse::<ActionKind>(),
            Err(ValidationError::UnknownAction("reload".to_string()))
        );
        assert!("".parse::<ActionKind>().is_err());
    }

    #[test]
    fn test_running_and_failed() {
        let mut unit = Unit {
            name: "nginx.service".to_string(),
            load_state: "loaded".to_string(),
            active_state: "active".to_string(),
            sub_state: "running".to_string(),
            description: "A high performance web server".to_string(),
        };
        assert!(unit.is_running());
        unit.active_state = "failed".to_string();
        unit.sub_state = "failed".to_string();
        assert!(!unit.is_running());
        assert!(unit.is_failed());
    }
}
