//! Per-open-attempt access decision.
//!
//! Every open attempt on a filtered instance is checked against the process
//! allow-list at the moment it arrives.  Exempt processes have the attempt
//! forwarded unchanged to the lower stack; everyone else gets it completed
//! with [`RequestStatus::AccessDenied`].  Nothing is cached between attempts,
//! so a process that is exempted or revoked is treated accordingly on its very
//! next open.

use std::sync::Arc;

use guardian_core::{ProcessId, RequestStatus};
use tracing::debug;

use super::filtered_instance::FilteredInstance;
use super::process_identity::ProcessIdentityPolicy;
use crate::infrastructure::device_stack::{DeviceStack, OpenRequest};

/// What happened to an open attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The attempt went to the lower stack.  Carries
    /// [`RequestStatus::Pending`] when the stack took it, or the status the
    /// attempt was completed with when the stack refused the send.
    Forwarded(RequestStatus),
    /// The requestor is not exempt; the attempt completed with access denied.
    Denied,
}

impl OpenOutcome {
    /// The status the open attempt completes with, as seen by the requestor.
    pub fn status(self) -> RequestStatus {
        match self {
            OpenOutcome::Forwarded(status) => status,
            OpenOutcome::Denied => RequestStatus::AccessDenied,
        }
    }
}

/// Forwards or denies open attempts.
pub struct OpenRequestGate {
    identity: ProcessIdentityPolicy,
    stack: Arc<dyn DeviceStack>,
}

impl OpenRequestGate {
    pub fn new(identity: ProcessIdentityPolicy, stack: Arc<dyn DeviceStack>) -> Self {
        Self { identity, stack }
    }

    /// Decides the open attempt of `requestor` on `instance`.
    pub fn on_open(&self, instance: &FilteredInstance, requestor: ProcessId) -> OpenOutcome {
        if !self.identity.is_exempt(requestor) {
            instance.record_denied();
            debug!("open of {} by process {requestor} denied", instance.id());
            return OpenOutcome::Denied;
        }

        instance.record_forwarded();
        let request = OpenRequest {
            instance: instance.id(),
            requestor,
        };
        match self.stack.send_open(&request) {
            Ok(()) => {
                debug!("open of {} by process {requestor} forwarded", instance.id());
                OpenOutcome::Forwarded(RequestStatus::Pending)
            }
            Err(e) => {
                debug!("open of {} by process {requestor}: {e}", instance.id());
                OpenOutcome::Forwarded(e.status)
            }
        }
    }
}
