//! Infrastructure layer for the filter.
//!
//! Contains the seams to the hosting device framework: the process allow-list,
//! the lower device stack that receives forwarded opens, the factory for the
//! control endpoint, TOML configuration storage and logging setup.
//!
//! **Dependency rule**: this layer may depend on `guardian_core`, but MUST NOT
//! import from `application`.

pub mod control_device;
pub mod device_stack;
pub mod logging;
pub mod process_policy;
pub mod storage;
