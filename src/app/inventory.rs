// Holds the unit list exactly as the service manager last reported it.

use tracing::{debug, warn};

use super::model::Unit;
use super::systemd::ServiceManager;
use crate::error::ManagerError;

#[derive(Debug, Default)]
pub struct InventoryStore {
    units: Vec<Unit>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Replaces the inventory wholesale. On failure the previous list is kept.
    pub fn refresh(&mut self, manager: &dyn ServiceManager) -> Result<&[Unit], ManagerError> {
        match manager.list_units() {
            Ok(units) => {
                debug!(count = units.len(), "inventory refreshed");
                self.units = units;
                Ok(&self.units)
            }
            Err(e) => {
                warn!(error = %e, kept = self.units.len(), "inventory refresh failed");
                Err(e)
            }
        }
    }
}
