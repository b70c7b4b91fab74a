//! Per-unit override records and the merge applied on every state read.
//!
//! Each unit has its own reader/writer lock around a `Copy` record.  A write
//! replaces the whole record under the write lock and a read copies it out
//! under the read lock, so a reader sees either the old or the new record in
//! full.  State reads for one unit never wait on writes to another, and never
//! touch the registry lock.

use guardian_core::{GamepadState, OverrideGamepadRequest, OverrideRecord, UnitIndex, MAX_UNITS};
use parking_lot::RwLock;
use tracing::debug;

/// Table of the active override record of every unit.
pub struct OverrideEngine {
    units: [RwLock<OverrideRecord>; MAX_UNITS],
}

impl OverrideEngine {
    /// Creates a table with every unit cleared.
    pub fn new() -> Self {
        Self {
            units: std::array::from_fn(|_| RwLock::new(OverrideRecord::CLEARED)),
        }
    }

    /// Replaces the record of `unit`.  An empty mask clears the override.
    pub fn set_override(&self, unit: UnitIndex, record: OverrideRecord) {
        *self.units[unit.get()].write() = record;
        debug!(
            "unit {unit} override {} (fields 0x{:05X})",
            if record.is_active() { "installed" } else { "cleared" },
            record.fields.0
        );
    }

    /// Installs a decoded override request.
    pub fn install(&self, request: &OverrideGamepadRequest) {
        self.set_override(request.unit, request.record);
    }

    /// Clears the record of `unit`.
    pub fn clear(&self, unit: UnitIndex) {
        self.set_override(unit, OverrideRecord::CLEARED);
    }

    /// Snapshot of the record of `unit`.
    pub fn record(&self, unit: UnitIndex) -> OverrideRecord {
        *self.units[unit.get()].read()
    }

    /// Returns the state to report for `unit` given the device's `real` state.
    pub fn apply_override(&self, unit: UnitIndex, real: GamepadState) -> GamepadState {
        let record = self.record(unit);
        record.apply(real)
    }
}

impl Default for OverrideEngine {
    fn default() -> Self {
        Self::new()
    }
}
