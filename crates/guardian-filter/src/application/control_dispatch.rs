//! Routes decoded control requests.
//!
//! Hide requests go to the process policy; override requests go to the
//! override engine.  A request that fails to decode changes nothing and is
//! completed with the status its [`ProtocolError`] maps to.
//!
//! [`ProtocolError`]: guardian_core::ProtocolError

use std::sync::Arc;

use guardian_core::{decode_control_request, ControlRequest, RequestStatus};
use tracing::{debug, warn};

use super::override_engine::OverrideEngine;
use crate::infrastructure::process_policy::ProcessPolicy;

/// Handles requests arriving on the control channel.
pub struct ControlDispatcher {
    policy: Arc<dyn ProcessPolicy>,
    overrides: Arc<OverrideEngine>,
}

impl ControlDispatcher {
    pub fn new(policy: Arc<dyn ProcessPolicy>, overrides: Arc<OverrideEngine>) -> Self {
        Self { policy, overrides }
    }

    /// Decodes `input` as a request with control code `code` and executes it.
    pub fn dispatch(&self, code: u32, input: &[u8]) -> RequestStatus {
        let request = match decode_control_request(code, input) {
            Ok(request) => request,
            Err(e) => {
                warn!("rejecting control request 0x{code:08X}: {e}");
                return e.status();
            }
        };

        debug!("control request {:?} for unit {}", request.code(), request.unit());
        match request {
            ControlRequest::Hide(hide) => match self.policy.hide(&hide) {
                Ok(()) => RequestStatus::Success,
                Err(e) => {
                    warn!("hide of unit {} failed: {e}", hide.unit);
                    RequestStatus::Unsuccessful
                }
            },
            ControlRequest::Override(request) => {
                self.overrides.install(&request);
                RequestStatus::Success
            }
        }
    }
}
