// Error types shared by the manager collaborator and the action dispatcher.

use thiserror::Error;

use crate::app::model::ActionKind;

/// Failure talking to the service manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    /// The manager could not be reached at all (missing binary, bus down).
    #[error("cannot reach the service manager: {0}")]
    Connection(String),

    /// A specific call reached the manager and was refused or failed.
    #[error("{operation} failed: {message}")]
    Call { operation: String, message: String },
}

/// Request rejected before it ever reached the manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown action '{0}' (expected start, stop, restart, enable or disable)")]
    UnknownAction(String),

    #[error("no unit selected")]
    NoSelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Another action is still in flight.
    #[error("busy: {action} on {unit} is still running")]
    Busy { unit: String, action: ActionKind },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{action} {unit}: {source}")]
    Manager {
        unit: String,
        action: ActionKind,
        #[source]
        source: ManagerError,
    },
}
