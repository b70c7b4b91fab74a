//! The facade a hosting framework drives.
//!
//! The host translates its own callbacks into these methods:
//!
//! | Host event                          | Method                               |
//! |-------------------------------------|--------------------------------------|
//! | device attached                     | [`GuardianFilter::on_attach`]        |
//! | device instance cleaned up          | [`GuardianFilter::on_detach`]        |
//! | open attempt on a filtered instance | [`GuardianFilter::on_open`]          |
//! | request on the control channel      | [`GuardianFilter::on_control_request`] |
//! | state read for a unit               | [`GuardianFilter::apply_override`]   |
//!
//! All methods take `&self` and may be called from any thread.

use std::sync::Arc;

use guardian_core::{GamepadState, InstanceId, ProcessId, RequestStatus, UnitIndex};
use tracing::{info, warn};

use super::control_dispatch::ControlDispatcher;
use super::filtered_instance::{AffectedDevices, FilteredInstance};
use super::instance_registry::{AttachError, FilteredInstanceRegistry};
use super::open_gate::{OpenOutcome, OpenRequestGate};
use super::override_engine::OverrideEngine;
use super::process_identity::ProcessIdentityPolicy;
use crate::infrastructure::control_device::ControlDeviceFactory;
use crate::infrastructure::device_stack::DeviceStack;
use crate::infrastructure::process_policy::ProcessPolicy;
use crate::infrastructure::storage::config::DevicesConfig;

/// Process-wide filter state shared by every attached instance.
pub struct GuardianFilter {
    affected: AffectedDevices,
    registry: FilteredInstanceRegistry,
    gate: OpenRequestGate,
    dispatcher: ControlDispatcher,
    overrides: Arc<OverrideEngine>,
}

impl GuardianFilter {
    pub fn new(
        devices: &DevicesConfig,
        policy: Arc<dyn ProcessPolicy>,
        stack: Arc<dyn DeviceStack>,
        control_factory: Arc<dyn ControlDeviceFactory>,
    ) -> Self {
        let overrides = Arc::new(OverrideEngine::new());
        Self {
            affected: AffectedDevices::from_config(devices),
            registry: FilteredInstanceRegistry::new(control_factory),
            gate: OpenRequestGate::new(ProcessIdentityPolicy::new(Arc::clone(&policy)), stack),
            dispatcher: ControlDispatcher::new(policy, Arc::clone(&overrides)),
            overrides,
        }
    }

    /// Attaches a device.
    ///
    /// # Errors
    ///
    /// [`AttachError::NotAffected`] when the device is not one the filter
    /// intercepts; nothing is registered and no control channel is created.
    /// Registry errors are passed through unchanged.
    pub fn on_attach(
        &self,
        instance: FilteredInstance,
    ) -> Result<Arc<FilteredInstance>, AttachError> {
        if !self.affected.matches(&instance) {
            info!(
                "device {} ({}) is not affected, not attaching",
                instance.id(),
                instance.hardware_ids().join(", ")
            );
            return Err(AttachError::NotAffected(instance.id()));
        }

        let instance = Arc::new(instance);
        self.registry.add(Arc::clone(&instance))?;
        Ok(instance)
    }

    /// Detaches the instance with identity `id`.
    ///
    /// The override of the instance's unit is cleared once no other attached
    /// instance is bound to that unit.  Detaching an unknown identity does
    /// nothing.
    pub fn on_detach(&self, id: InstanceId) {
        let removed = self
            .registry
            .remove_releasing_unit(id, |unit| self.overrides.clear(unit));
        if removed.is_none() {
            warn!("detach of unknown instance {id} ignored");
        }
    }

    /// Decides an open attempt by `requestor` on `instance`.
    pub fn on_open(&self, instance: &FilteredInstance, requestor: ProcessId) -> OpenOutcome {
        self.gate.on_open(instance, requestor)
    }

    /// Handles a request that arrived on the control channel.
    ///
    /// Completes with [`RequestStatus::DeviceNotReady`] while no control
    /// channel exists.  The request is handled while the registry lock is
    /// held, so it cannot race the deletion of the channel.
    pub fn on_control_request(&self, code: u32, input: &[u8]) -> RequestStatus {
        self.registry
            .with_control_channel(|| self.dispatcher.dispatch(code, input))
            .unwrap_or_else(|| {
                warn!("control request 0x{code:08X} arrived with no control channel");
                RequestStatus::DeviceNotReady
            })
    }

    /// The state reported for `unit` given the device's `real` state.
    pub fn apply_override(&self, unit: UnitIndex, real: GamepadState) -> GamepadState {
        self.overrides.apply_override(unit, real)
    }

    pub fn instance_count(&self) -> usize {
        self.registry.count()
    }

    /// Snapshot of the attached instances.
    pub fn instances(&self) -> Vec<Arc<FilteredInstance>> {
        self.registry.snapshot()
    }

    pub fn control_channel_exists(&self) -> bool {
        self.registry.control_channel_exists()
    }

    /// The override table, for hosts that serve state reads directly.
    pub fn overrides(&self) -> &Arc<OverrideEngine> {
        &self.overrides
    }
}
