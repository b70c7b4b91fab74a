//! Registry of attached filtered instances and the shared control channel.
//!
//! # Lock discipline
//!
//! One mutex guards both the instance set and the control-channel handle.
//! Every add, remove, count and enumeration happens under it, and the
//! existence of the control channel is decided under it:
//!
//! - `add` inserts the instance and, if no channel exists, creates one before
//!   releasing the lock.  Creation failure is logged and does not fail the add;
//!   the next add retries.
//! - `remove` deletes the channel while the count is still 1, then removes the
//!   last instance, all before releasing the lock.
//!
//! So after any sequence of adds and removes the channel is absent whenever the
//! registry is empty, and a concurrent add can never observe a half-deleted
//! channel.
//!
//! Two callbacks also run under the lock: the unit release of
//! [`FilteredInstanceRegistry::remove_releasing_unit`] and the control request
//! handler of [`FilteredInstanceRegistry::with_control_channel`].  Neither may
//! call back into the registry.  The lock is never held across forwarded I/O.

use std::sync::Arc;

use guardian_core::{InstanceId, RequestStatus, UnitIndex};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::filtered_instance::FilteredInstance;
use crate::infrastructure::control_device::{ControlDevice, ControlDeviceFactory};

/// Error type for attaching an instance.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttachError {
    /// An instance with the same identity is already registered.
    #[error("instance {0} is already registered")]
    AlreadyRegistered(InstanceId),
    /// Memory for the registry entry could not be allocated.
    #[error("out of memory registering instance {0}")]
    ResourceExhausted(InstanceId),
    /// The device's hardware ids are not on the affected list.
    #[error("instance {0} is not an affected device")]
    NotAffected(InstanceId),
}

impl AttachError {
    /// The status the attach completes with.
    pub fn status(&self) -> RequestStatus {
        match self {
            AttachError::AlreadyRegistered(_) => RequestStatus::InvalidParameter,
            AttachError::ResourceExhausted(_) => RequestStatus::InsufficientResources,
            AttachError::NotAffected(_) => RequestStatus::NotSupported,
        }
    }
}

struct RegistryState {
    instances: Vec<Arc<FilteredInstance>>,
    control_device: Option<Box<dyn ControlDevice>>,
}

/// Lock-protected set of attached instances.
pub struct FilteredInstanceRegistry {
    state: Mutex<RegistryState>,
    control_factory: Arc<dyn ControlDeviceFactory>,
}

impl FilteredInstanceRegistry {
    pub fn new(control_factory: Arc<dyn ControlDeviceFactory>) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                instances: Vec::new(),
                control_device: None,
            }),
            control_factory,
        }
    }

    /// Registers `instance` and makes sure the control channel exists.
    ///
    /// # Errors
    ///
    /// [`AttachError::AlreadyRegistered`] if the identity is present, or
    /// [`AttachError::ResourceExhausted`] if the entry cannot be allocated.
    /// The registry is unchanged on error.
    pub fn add(&self, instance: Arc<FilteredInstance>) -> Result<(), AttachError> {
        let id = instance.id();
        let mut state = self.state.lock();

        if state.instances.iter().any(|existing| existing.id() == id) {
            return Err(AttachError::AlreadyRegistered(id));
        }
        state
            .instances
            .try_reserve(1)
            .map_err(|_| AttachError::ResourceExhausted(id))?;
        state.instances.push(instance);

        if state.control_device.is_none() {
            match self.control_factory.create() {
                Ok(device) => {
                    info!("control channel {} created", device.path());
                    state.control_device = Some(device);
                }
                Err(e) => {
                    warn!("continuing without control channel: {e}");
                }
            }
        }

        info!("instance {id} registered ({} attached)", state.instances.len());
        Ok(())
    }

    /// Unregisters the instance with identity `id`.
    ///
    /// Removing the last instance deletes the control channel first.  Removing
    /// an unknown identity does nothing and returns `None`.
    pub fn remove(&self, id: InstanceId) -> Option<Arc<FilteredInstance>> {
        self.remove_releasing_unit(id, |_| {})
    }

    /// Like [`remove`](Self::remove), and calls `release` with the unit of the
    /// removed instance once no remaining instance is bound to it.
    ///
    /// `release` runs under the registry lock, so no attach or detach can
    /// interleave between the binding check and the release.
    pub fn remove_releasing_unit(
        &self,
        id: InstanceId,
        release: impl FnOnce(UnitIndex),
    ) -> Option<Arc<FilteredInstance>> {
        let mut state = self.state.lock();

        let position = state.instances.iter().position(|i| i.id() == id)?;

        if state.instances.len() == 1 {
            if let Some(device) = state.control_device.take() {
                info!("last instance detaching, deleting control channel {}", device.path());
                device.delete();
            }
        }

        let removed = state.instances.swap_remove(position);
        info!("instance {id} unregistered ({} attached)", state.instances.len());

        if let Some(unit) = removed.unit() {
            if state.instances.iter().any(|i| i.unit() == Some(unit)) {
                debug!("unit {unit} still bound to another instance");
            } else {
                release(unit);
            }
        }
        Some(removed)
    }

    /// Runs `handler` while the control channel exists.
    ///
    /// Returns `None` without calling `handler` when there is no channel.  The
    /// handler runs under the registry lock, so the channel cannot be deleted
    /// while a request is being handled.
    pub fn with_control_channel<R>(&self, handler: impl FnOnce() -> R) -> Option<R> {
        let state = self.state.lock();
        state.control_device.as_ref().map(|_| handler())
    }

    /// Number of registered instances.
    pub fn count(&self) -> usize {
        self.state.lock().instances.len()
    }

    /// Snapshot of the registered instances.
    pub fn snapshot(&self) -> Vec<Arc<FilteredInstance>> {
        self.state.lock().instances.clone()
    }

    /// Looks up a registered instance.
    pub fn get(&self, id: InstanceId) -> Option<Arc<FilteredInstance>> {
        self.state
            .lock()
            .instances
            .iter()
            .find(|i| i.id() == id)
            .cloned()
    }

    /// Returns `true` while the shared control channel exists.
    pub fn control_channel_exists(&self) -> bool {
        self.state.lock().control_device.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::control_device::mock::CountingControlFactory;
    use std::thread;

    fn instance() -> Arc<FilteredInstance> {
        Arc::new(FilteredInstance::with_hardware_ids(
            InstanceId::new(),
            vec![r"HID\VID_045E&PID_028E".to_string()],
        ))
    }

    fn registry() -> (FilteredInstanceRegistry, Arc<CountingControlFactory>) {
        let factory = Arc::new(CountingControlFactory::new());
        (FilteredInstanceRegistry::new(factory.clone()), factory)
    }

    #[test]
    fn test_registry_starts_empty_without_channel() {
        let (registry, factory) = registry();
        assert_eq!(registry.count(), 0);
        assert!(!registry.control_channel_exists());
        assert_eq!(factory.created(), 0);
    }

    #[test]
    fn test_first_add_creates_control_channel() {
        // Arrange
        let (registry, factory) = registry();

        // Act
        registry.add(instance()).expect("add should succeed");

        // Assert
        assert_eq!(registry.count(), 1);
        assert!(registry.control_channel_exists());
        assert_eq!(factory.created(), 1);
    }

    #[test]
    fn test_second_add_reuses_control_channel() {
        let (registry, factory) = registry();
        registry.add(instance()).unwrap();
        registry.add(instance()).unwrap();
        assert_eq!(registry.count(), 2);
        assert_eq!(factory.created(), 1);
    }

    #[test]
    fn test_duplicate_add_is_rejected_without_side_effects() {
        // Arrange
        let (registry, _factory) = registry();
        let first = instance();
        registry.add(first.clone()).unwrap();

        // Act
        let result = registry.add(first.clone());

        // Assert
        assert_eq!(result, Err(AttachError::AlreadyRegistered(first.id())));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_add_then_remove_restores_count() {
        let (registry, _factory) = registry();
        registry.add(instance()).unwrap();
        let before = registry.count();

        let extra = instance();
        registry.add(extra.clone()).unwrap();
        registry.remove(extra.id());

        assert_eq!(registry.count(), before);
    }

    #[test]
    fn test_removing_last_instance_deletes_channel() {
        // Arrange
        let (registry, factory) = registry();
        let a = instance();
        let b = instance();
        registry.add(a.clone()).unwrap();
        registry.add(b.clone()).unwrap();

        // Act / Assert – channel survives while any instance remains
        registry.remove(a.id());
        assert!(registry.control_channel_exists());
        assert_eq!(factory.deleted(), 0);

        registry.remove(b.id());
        assert!(!registry.control_channel_exists());
        assert_eq!(factory.deleted(), 1);
        assert_eq!(factory.live(), 0);
    }

    #[test]
    fn test_remove_unknown_instance_is_noop() {
        let (registry, factory) = registry();
        registry.add(instance()).unwrap();

        assert!(registry.remove(InstanceId::new()).is_none());
        assert_eq!(registry.count(), 1);
        assert!(registry.control_channel_exists());
        assert_eq!(factory.deleted(), 0);
    }

    #[test]
    fn test_double_remove_deletes_channel_once() {
        let (registry, factory) = registry();
        let a = instance();
        registry.add(a.clone()).unwrap();

        assert!(registry.remove(a.id()).is_some());
        assert!(registry.remove(a.id()).is_none());
        assert_eq!(factory.deleted(), 1);
    }

    #[test]
    fn test_channel_creation_failure_does_not_fail_add() {
        // Arrange
        let (registry, factory) = registry();
        factory.fail_creates(true);

        // Act
        let result = registry.add(instance());

        // Assert
        assert!(result.is_ok());
        assert_eq!(registry.count(), 1);
        assert!(!registry.control_channel_exists());
    }

    #[test]
    fn test_later_add_retries_channel_creation() {
        let (registry, factory) = registry();
        factory.fail_creates(true);
        registry.add(instance()).unwrap();

        factory.fail_creates(false);
        registry.add(instance()).unwrap();

        assert!(registry.control_channel_exists());
        assert_eq!(factory.created(), 1);
    }

    #[test]
    fn test_removing_last_instance_without_channel_is_safe() {
        let (registry, factory) = registry();
        factory.fail_creates(true);
        let a = instance();
        registry.add(a.clone()).unwrap();

        registry.remove(a.id());

        assert_eq!(registry.count(), 0);
        assert_eq!(factory.deleted(), 0);
    }

    #[test]
    fn test_snapshot_and_get_reflect_members() {
        let (registry, _factory) = registry();
        let a = instance();
        registry.add(a.clone()).unwrap();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id(), a.id());
        assert!(registry.get(a.id()).is_some());
        assert!(registry.get(InstanceId::new()).is_none());
    }

    #[test]
    fn test_concurrent_attach_detach_leaves_no_channel() {
        // Arrange
        let (registry, factory) = registry();
        let registry = Arc::new(registry);

        // Act – many threads each attach and detach their own instances
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..50 {
                        let inst = instance();
                        registry.add(inst.clone()).expect("add must succeed");
                        registry.remove(inst.id());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread panicked");
        }

        // Assert
        assert_eq!(registry.count(), 0);
        assert!(!registry.control_channel_exists());
        assert_eq!(factory.live(), 0);
        assert_eq!(factory.created(), factory.deleted());
    }

    #[test]
    fn test_attach_errors_map_to_completion_status() {
        let id = InstanceId::new();
        assert_eq!(
            AttachError::AlreadyRegistered(id).status(),
            RequestStatus::InvalidParameter
        );
        assert_eq!(
            AttachError::ResourceExhausted(id).status(),
            RequestStatus::InsufficientResources
        );
        assert_eq!(AttachError::NotAffected(id).status(), RequestStatus::NotSupported);
    }

    #[test]
    fn test_unit_released_only_when_last_binding_leaves() {
        // Arrange – two instances bound to unit 0, one to unit 1
        let (registry, _factory) = registry();
        let unit0 = UnitIndex::new(0).unwrap();
        let unit1 = UnitIndex::new(1).unwrap();
        let bound = |unit| {
            Arc::new(FilteredInstance::with_hardware_ids(InstanceId::new(), vec![]).bound_to(unit))
        };
        let (a, b, c) = (bound(unit0), bound(unit0), bound(unit1));
        for instance in [&a, &b, &c] {
            registry.add(Arc::clone(instance)).unwrap();
        }
        let mut released = Vec::new();

        // Act
        registry.remove_releasing_unit(a.id(), |u| released.push(u));
        let after_first = released.clone();
        registry.remove_releasing_unit(b.id(), |u| released.push(u));
        registry.remove_releasing_unit(c.id(), |u| released.push(u));

        // Assert
        assert!(after_first.is_empty());
        assert_eq!(released, vec![unit0, unit1]);
    }

    #[test]
    fn test_unbound_instance_releases_nothing() {
        let (registry, _factory) = registry();
        let a = instance();
        registry.add(a.clone()).unwrap();

        let mut called = false;
        registry.remove_releasing_unit(a.id(), |_| called = true);

        assert!(!called);
    }

    #[test]
    fn test_with_control_channel_runs_only_while_channel_exists() {
        // Arrange
        let (registry, _factory) = registry();
        assert_eq!(registry.with_control_channel(|| 1), None);
        let a = instance();
        registry.add(a.clone()).unwrap();

        // Act / Assert
        assert_eq!(registry.with_control_channel(|| 2), Some(2));
        registry.remove(a.id());
        assert_eq!(registry.with_control_channel(|| 3), None);
    }
}
