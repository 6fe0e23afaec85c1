// Test doubles shared by the app module tests.

use std::collections::HashMap;
use std::sync::Mutex;

use super::model::{ActionKind, Unit};
use super::systemd::ServiceManager;
use crate::error::ManagerError;

pub fn unit(name: &str) -> Unit {
    Unit {
        name: name.to_string(),
        load_state: "loaded".to_string(),
        active_state: "inactive".to_string(),
        sub_state: "dead".to_string(),
        description: format!("{name} description"),
    }
}

pub fn units(count: usize) -> Vec<Unit> {
    (0..count).map(|i| unit(&format!("unit{i:02}.service"))).collect()
}

/// In-memory manager. Successful start/restart mark the unit running and
/// stop marks it dead, the way the real manager would report it afterwards.
#[derive(Default)]
pub struct FakeManager {
    units: Mutex<Vec<Unit>>,
    list_error: Mutex<Option<ManagerError>>,
    action_errors: Mutex<HashMap<String, ManagerError>>,
    calls: Mutex<Vec<(String, ActionKind)>>,
    list_calls: Mutex<usize>,
}

impl FakeManager {
    pub fn with_units(units: Vec<Unit>) -> Self {
        Self {
            units: Mutex::new(units),
            ..Self::default()
        }
    }

    pub fn set_units(&self, units: Vec<Unit>) {
        *self.units.lock().unwrap() = units;
    }

    pub fn fail_listing(&self, err: ManagerError) {
        *self.list_error.lock().unwrap() = Some(err);
    }

    pub fn fail_action(&self, name: &str, err: ManagerError) {
        self.action_errors.lock().unwrap().insert(name.to_string(), err);
    }

    pub fn calls(&self) -> Vec<(String, ActionKind)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    fn act(&self, name: &str, action: ActionKind) -> Result<(), ManagerError> {
        self.calls.lock().unwrap().push((name.to_string(), action));
        if let Some(err) = self.action_errors.lock().unwrap().get(name) {
            return Err(err.clone());
        }
        let mut units = self.units.lock().unwrap();
        if let Some(unit) = units.iter_mut().find(|u| u.name == name) {
            match action {
                ActionKind::Start | ActionKind::Restart => {
                    unit.active_state = "active".to_string();
                    unit.sub_state = "running".to_string();
                }
                ActionKind::Stop => {
                    unit.active_state = "inactive".to_string();
                    unit.sub_state = "dead".to_string();
                }
                ActionKind::Enable | ActionKind::Disable => {}
            }
        }
        Ok(())
    }
}

impl ServiceManager for FakeManager {
    fn list_units(&self) -> Result<Vec<Unit>, ManagerError> {
        *self.list_calls.lock().unwrap() += 1;
        if let Some(err) = self.list_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.units.lock().unwrap().clone())
    }

    fn start_unit(&self, name: &str) -> Result<(), ManagerError> {
        self.act(name, ActionKind::Start)
    }

    fn stop_unit(&self, name: &str) -> Result<(), ManagerError> {
        self.act(name, ActionKind::Stop)
    }

    fn restart_unit(&self, name: &str) -> Result<(), ManagerError> {
        self.act(name, ActionKind::Restart)
    }

    fn enable_unit(&self, name: &str) -> Result<(), ManagerError> {
        self.act(name, ActionKind::Enable)
    }

    fn disable_unit(&self, name: &str) -> Result<(), ManagerError> {
        self.act(name, ActionKind::Disable)
    }
}
