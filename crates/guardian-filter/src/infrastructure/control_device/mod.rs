//! Control endpoint the privileged controller opens.
//!
//! One control device serves every filtered instance.  The registry creates it
//! through a [`ControlDeviceFactory`] when the first instance attaches and
//! deletes it when the last instance detaches, so the hosting framework can
//! unload the filter once no device needs it.

use thiserror::Error;

pub mod mock;

/// Error type for control endpoint operations.
#[derive(Debug, Error)]
pub enum ControlChannelError {
    /// The endpoint could not be created.
    #[error("failed to create control device {path}: {reason}")]
    CreateFailed { path: String, reason: String },
}

/// A live control endpoint.
pub trait ControlDevice: Send {
    /// Path controllers open to reach the endpoint.
    fn path(&self) -> &str;

    /// Tears the endpoint down.  Consumes the handle so it cannot be deleted twice.
    fn delete(self: Box<Self>);
}

/// Creates control endpoints on behalf of the registry.
pub trait ControlDeviceFactory: Send + Sync {
    /// Creates the shared control endpoint.
    fn create(&self) -> Result<Box<dyn ControlDevice>, ControlChannelError>;
}
