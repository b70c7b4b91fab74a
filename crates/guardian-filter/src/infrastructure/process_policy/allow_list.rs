//! In-memory allow-list seeded from configuration.
//!
//! Lookups take a read lock, so concurrent open attempts never serialize
//! behind each other.  A poisoned lock is reported as a lookup failure, which
//! the gate treats as "not exempt".

use std::collections::HashSet;
use std::sync::RwLock;

use guardian_core::{HideGamepadRequest, ProcessId, UnitIndex, MAX_UNITS};
use tracing::info;

use super::{PolicyError, ProcessPolicy};
use crate::infrastructure::storage::config::PolicyConfig;

/// Allow-list of exempt process ids plus the set of hidden units.
#[derive(Debug, Default)]
pub struct AllowList {
    exempt: RwLock<HashSet<ProcessId>>,
    hidden: RwLock<[bool; MAX_UNITS]>,
}

impl AllowList {
    /// Creates an empty allow-list: every process is intercepted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allow-list holding the configured exempt processes.
    pub fn from_config(config: &PolicyConfig) -> Self {
        let exempt = config
            .exempt_processes
            .iter()
            .copied()
            .map(ProcessId)
            .collect();
        Self {
            exempt: RwLock::new(exempt),
            hidden: RwLock::new([false; MAX_UNITS]),
        }
    }

    /// Adds `pid` to the allow-list.
    pub fn exempt(&self, pid: ProcessId) -> Result<(), PolicyError> {
        let mut exempt = self
            .exempt
            .write()
            .map_err(|e| PolicyError::Update(e.to_string()))?;
        if exempt.insert(pid) {
            info!("process {pid} added to allow-list");
        }
        Ok(())
    }

    /// Removes `pid` from the allow-list.
    pub fn revoke(&self, pid: ProcessId) -> Result<(), PolicyError> {
        let mut exempt = self
            .exempt
            .write()
            .map_err(|e| PolicyError::Update(e.to_string()))?;
        if exempt.remove(&pid) {
            info!("process {pid} removed from allow-list");
        }
        Ok(())
    }

    /// Returns `true` once a hide request has been accepted for `unit`.
    pub fn is_hidden(&self, unit: UnitIndex) -> Result<bool, PolicyError> {
        let hidden = self
            .hidden
            .read()
            .map_err(|e| PolicyError::Lookup(e.to_string()))?;
        Ok(hidden[unit.get()])
    }
}

impl ProcessPolicy for AllowList {
    fn is_whitelisted(&self, pid: ProcessId) -> Result<bool, PolicyError> {
        let exempt = self
            .exempt
            .read()
            .map_err(|e| PolicyError::Lookup(e.to_string()))?;
        Ok(exempt.contains(&pid))
    }

    fn hide(&self, request: &HideGamepadRequest) -> Result<(), PolicyError> {
        let mut hidden = self
            .hidden
            .write()
            .map_err(|e| PolicyError::Update(e.to_string()))?;
        hidden[request.unit.get()] = true;
        info!("unit {} hidden from non-exempt processes", request.unit);
        Ok(())
    }
}
