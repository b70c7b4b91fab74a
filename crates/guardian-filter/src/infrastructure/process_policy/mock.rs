//! Scriptable process policy for integration tests.
//!
//! Answers lookups from a fixed set of exempt processes, can be told to fail
//! every lookup, and records every lookup and hide request it receives.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use guardian_core::{HideGamepadRequest, ProcessId};

use super::{PolicyError, ProcessPolicy};

/// A [`ProcessPolicy`] whose answers are set by the test.
#[derive(Default)]
pub struct StubPolicy {
    exempt: Mutex<HashSet<ProcessId>>,
    fail_lookups: AtomicBool,
    lookups: Mutex<Vec<ProcessId>>,
    hidden: Mutex<Vec<HideGamepadRequest>>,
}

impl StubPolicy {
    /// Creates a policy that exempts nobody.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a policy that exempts exactly `pids`.
    pub fn exempting(pids: &[u32]) -> Self {
        let policy = Self::new();
        for &pid in pids {
            policy.set_exempt(ProcessId(pid), true);
        }
        policy
    }

    /// Adds or removes `pid` from the exempt set.
    pub fn set_exempt(&self, pid: ProcessId, exempt: bool) {
        let mut set = self.exempt.lock().expect("lock poisoned");
        if exempt {
            set.insert(pid);
        } else {
            set.remove(&pid);
        }
    }

    /// Makes every subsequent lookup fail until reset.
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    /// Processes looked up so far, in call order.
    pub fn lookups(&self) -> Vec<ProcessId> {
        self.lookups.lock().expect("lock poisoned").clone()
    }

    /// Hide requests received so far, in call order.
    pub fn hide_requests(&self) -> Vec<HideGamepadRequest> {
        self.hidden.lock().expect("lock poisoned").clone()
    }
}

impl ProcessPolicy for StubPolicy {
    fn is_whitelisted(&self, pid: ProcessId) -> Result<bool, PolicyError> {
        self.lookups.lock().expect("lock poisoned").push(pid);
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(PolicyError::Lookup("scripted failure".to_string()));
        }
        Ok(self.exempt.lock().expect("lock poisoned").contains(&pid))
    }

    fn hide(&self, request: &HideGamepadRequest) -> Result<(), PolicyError> {
        self.hidden.lock().expect("lock poisoned").push(*request);
        Ok(())
    }
}
