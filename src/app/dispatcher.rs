// Runs lifecycle actions off the UI thread, one at a time.
//
// The worker thread only computes a result and posts it back over the
// channel; the pending slot is cleared when the main loop picks it up.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::model::{ActionKind, PendingAction};
use super::systemd::ServiceManager;
use crate::error::{ActionError, ManagerError};

/// Raw result posted by the worker thread.
#[derive(Debug)]
struct ActionOutcome {
    unit: String,
    action: ActionKind,
    result: Result<(), ManagerError>,
}

/// A resolved action, as observed by the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub unit: String,
    pub action: ActionKind,
    pub elapsed: Duration,
    pub result: Result<(), ActionError>,
}

pub struct ActionDispatcher {
    manager: Arc<dyn ServiceManager>,
    pending: Option<PendingAction>,
    tx: Sender<ActionOutcome>,
    rx: Receiver<ActionOutcome>,
}

impl ActionDispatcher {
    pub fn new(manager: Arc<dyn ServiceManager>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            manager,
            pending: None,
            tx,
            rx,
        }
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts `action` on `unit` in the background. Rejected while another
    /// action is still pending.
    pub fn invoke(&mut self, unit: &str, action: ActionKind) -> Result<(), ActionError> {
        if let Some(pending) = &self.pending {
            warn!(
                unit,
                %action,
                pending_unit = %pending.unit,
                pending_action = %pending.action,
                "action rejected, another one is in flight"
            );
            return Err(ActionError::Busy {
                unit: pending.unit.clone(),
                action: pending.action,
            });
        }

        let manager = Arc::clone(&self.manager);
        let tx = self.tx.clone();
        let name = unit.to_string();
        let spawned = thread::Builder::new()
            .name(format!("{action}-{unit}"))
            .spawn(move || {
                let result = manager.perform(&name, action);
                // The receiver lives as long as the dispatcher; a send error
                // only means the app is shutting down.
                let _ = tx.send(ActionOutcome {
                    unit: name,
                    action,
                    result,
                });
            });

        if let Err(e) = spawned {
            return Err(ActionError::Manager {
                unit: unit.to_string(),
                action,
                source: ManagerError::Connection(format!("failed to spawn worker: {e}")),
            });
        }

        info!(unit, %action, "action dispatched");
        self.pending = Some(PendingAction {
            unit: unit.to_string(),
            action,
            started_at: Instant::now(),
        });
        Ok(())
    }

    /// Picks up a finished action without blocking.
    pub fn poll(&mut self) -> Option<Completion> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(self.resolve(outcome)),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Blocks up to `timeout` for the pending action to finish.
    #[cfg(test)]
    pub fn wait(&mut self, timeout: Duration) -> Option<Completion> {
        use std::sync::mpsc::RecvTimeoutError;

        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => Some(self.resolve(outcome)),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    fn resolve(&mut self, outcome: ActionOutcome) -> Completion {
        let elapsed = self
            .pending
            .take()
            .map(|p| p.started_at.elapsed())
            .unwrap_or_default();

        let result = outcome.result.map_err(|source| ActionError::Manager {
            unit: outcome.unit.clone(),
            action: outcome.action,
            source,
        });

        match &result {
            Ok(()) => info!(unit = %outcome.unit, action = %outcome.action, ?elapsed, "action succeeded"),
            Err(e) => warn!(error = %e, ?elapsed, "action failed"),
        }
        debug!("pending action cleared");

        Completion {
            unit: outcome.unit,
            action: outcome.action,
            elapsed,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{FakeManager, unit};

    const WAIT: Duration = Duration::from_secs(5);

    fn dispatcher() -> (Arc<FakeManager>, ActionDispatcher) {
        let manager = Arc::new(FakeManager::with_units(vec![unit("foo.service")]));
        let dispatcher = ActionDispatcher::new(manager.clone());
        (manager, dispatcher)
    }

    #[test]
    fn test_invoke_runs_action_and_clears_pending() {
        let (manager, mut dispatcher) = dispatcher();
        dispatcher.invoke("foo.service", ActionKind::Start).unwrap();
        assert!(dispatcher.is_busy());

        let done = dispatcher.wait(WAIT).unwrap();
        assert_eq!(done.unit, "foo.service");
        assert_eq!(done.action, ActionKind::Start);
        assert_eq!(done.result, Ok(()));
        assert!(dispatcher.pending().is_none());
        assert_eq!(manager.calls(), vec![("foo.service".to_string(), ActionKind::Start)]);
    }

    #[test]
    fn test_second_invoke_is_busy_and_leaves_pending_alone() {
        let (manager, mut dispatcher) = dispatcher();
        dispatcher.invoke("foo.service", ActionKind::Stop).unwrap();
        let before = dispatcher.pending().cloned();

        let err = dispatcher.invoke("foo.service", ActionKind::Restart).unwrap_err();
        assert_eq!(
            err,
            ActionError::Busy {
                unit: "foo.service".to_string(),
                action: ActionKind::Stop,
            }
        );
        assert_eq!(dispatcher.pending().cloned(), before);

        dispatcher.wait(WAIT).unwrap();
        assert_eq!(manager.calls().len(), 1);
        assert!(dispatcher.invoke("foo.service", ActionKind::Restart).is_ok());
    }

    #[test]
    fn test_manager_failure_is_reported_with_unit_and_action() {
        let (manager, mut dispatcher) = dispatcher();
        manager.fail_action(
            "bad.service",
            ManagerError::Call {
                operation: "start".to_string(),
                message: "Unit bad.service not found.".to_string(),
            },
        );
        dispatcher.invoke("bad.service", ActionKind::Start).unwrap();

        let done = dispatcher.wait(WAIT).unwrap();
        let err = done.result.unwrap_err();
        assert!(matches!(err, ActionError::Manager { .. }));
        let text = err.to_string();
        assert!(text.contains("bad.service") && text.contains("start"));
        assert!(!dispatcher.is_busy());
    }

    #[test]
    fn test_poll_without_pending_action_returns_none() {
        let (_, mut dispatcher) = dispatcher();
        assert!(dispatcher.poll().is_none());
    }
}
