//! Process allow-list collaborator.
//!
//! The filter never decides on its own which processes are exempt.  It asks a
//! [`ProcessPolicy`] on every open attempt and forwards hide requests to it.
//! How the list is stored and kept fresh belongs to the implementation.
//!
//! # Testability
//!
//! [`allow_list::AllowList`] is the configuration-backed implementation;
//! tests use [`mock::StubPolicy`] to script answers and failures.

use guardian_core::{HideGamepadRequest, ProcessId};
use thiserror::Error;

pub mod allow_list;
pub mod mock;

/// Error type for allow-list operations.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The allow-list could not be consulted.
    #[error("allow-list lookup failed: {0}")]
    Lookup(String),
    /// The allow-list refused or failed to record a change.
    #[error("allow-list update failed: {0}")]
    Update(String),
}

/// Answers whether a process bypasses interception.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessPolicy: Send + Sync {
    /// Returns `Ok(true)` when `pid` is on the allow-list.
    fn is_whitelisted(&self, pid: ProcessId) -> Result<bool, PolicyError>;

    /// Records a hide request submitted over the control channel.
    fn hide(&self, request: &HideGamepadRequest) -> Result<(), PolicyError>;
}
