//! Counting control-device factory for tests.
//!
//! Tracks how many endpoints were created, deleted and are still alive so
//! lifecycle tests can assert "exactly one, never leaked, never deleted twice".

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use guardian_core::protocol::control::CONTROL_DEVICE_PATH;

use super::{ControlChannelError, ControlDevice, ControlDeviceFactory};

#[derive(Default)]
struct Counters {
    created: AtomicUsize,
    deleted: AtomicUsize,
    live: AtomicUsize,
}

/// A [`ControlDeviceFactory`] that counts endpoint lifecycles.
#[derive(Default)]
pub struct CountingControlFactory {
    counters: Arc<Counters>,
    fail_creates: AtomicBool,
}

impl CountingControlFactory {
    /// Creates a factory whose creates succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent creates fail until reset.
    pub fn fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    /// Endpoints successfully created so far.
    pub fn created(&self) -> usize {
        self.counters.created.load(Ordering::SeqCst)
    }

    /// Endpoints deleted so far.
    pub fn deleted(&self) -> usize {
        self.counters.deleted.load(Ordering::SeqCst)
    }

    /// Endpoints currently alive.
    pub fn live(&self) -> usize {
        self.counters.live.load(Ordering::SeqCst)
    }
}

impl ControlDeviceFactory for CountingControlFactory {
    fn create(&self) -> Result<Box<dyn ControlDevice>, ControlChannelError> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(ControlChannelError::CreateFailed {
                path: CONTROL_DEVICE_PATH.to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        self.counters.created.fetch_add(1, Ordering::SeqCst);
        self.counters.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountedDevice {
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct CountedDevice {
    counters: Arc<Counters>,
}

impl ControlDevice for CountedDevice {
    fn path(&self) -> &str {
        CONTROL_DEVICE_PATH
    }

    fn delete(self: Box<Self>) {
        self.counters.deleted.fetch_add(1, Ordering::SeqCst);
        self.counters.live.fetch_sub(1, Ordering::SeqCst);
    }
}
