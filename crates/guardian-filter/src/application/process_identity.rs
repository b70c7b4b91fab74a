//! Fail-closed exemption check.
//!
//! Wraps a [`ProcessPolicy`] and collapses its answer to a plain boolean.  A
//! lookup error never lets a process through: it is logged and the process is
//! treated as not exempt.

use std::sync::Arc;

use guardian_core::ProcessId;
use tracing::warn;

use crate::infrastructure::process_policy::ProcessPolicy;

/// Answers "is this process exempt from interception".
#[derive(Clone)]
pub struct ProcessIdentityPolicy {
    policy: Arc<dyn ProcessPolicy>,
}

impl ProcessIdentityPolicy {
    pub fn new(policy: Arc<dyn ProcessPolicy>) -> Self {
        Self { policy }
    }

    /// Returns `true` only when the allow-list positively lists `pid`.
    pub fn is_exempt(&self, pid: ProcessId) -> bool {
        match self.policy.is_whitelisted(pid) {
            Ok(exempt) => exempt,
            Err(e) => {
                warn!("exemption lookup for process {pid} failed, treating as not exempt: {e}");
                false
            }
        }
    }
}
