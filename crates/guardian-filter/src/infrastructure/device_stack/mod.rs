//! Lower device stack that receives forwarded open attempts.
//!
//! Forwarding is send-and-forget: once the lower stack accepts the request it
//! owns its completion.  Only a refused send is reported back, together with
//! the status the request must be completed with.

use guardian_core::{InstanceId, ProcessId, RequestStatus};
use thiserror::Error;

pub mod mock;

/// An attempt by a process to open a filtered device instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenRequest {
    /// Instance the attempt targets.
    pub instance: InstanceId,
    /// Process issuing the attempt, read when the attempt arrived.
    pub requestor: ProcessId,
}

/// The lower stack refused to take the request.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("lower device stack refused the request: {status}")]
pub struct SendError {
    /// Status the open attempt must be completed with.
    pub status: RequestStatus,
}

/// Hands open attempts to the device below the filter.
#[cfg_attr(test, mockall::automock)]
pub trait DeviceStack: Send + Sync {
    /// Sends `request` down the stack unmodified.
    fn send_open(&self, request: &OpenRequest) -> Result<(), SendError>;
}
