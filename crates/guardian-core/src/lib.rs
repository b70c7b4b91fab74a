//! # guardian-core
//!
//! Shared library for Gamepad Guardian containing the gamepad state model,
//! the override patch that rewrites reported state, and the binary format of
//! the requests a privileged controller submits over the control channel.
//!
//! This crate is used by the filter and by any controller tooling that builds
//! control requests.  It has zero dependencies on OS APIs or device stacks.
//!
//! # Architecture overview
//!
//! Gamepad Guardian sits between client processes and a shared gamepad.  It
//! denies device opens from processes that are not exempt, and it lets one
//! controller replace parts of the state that other processes read.
//!
//! - **`domain`** – Pure types with no OS dependencies: identifiers
//!   (`UnitIndex`, `ProcessId`, `InstanceId`), the `GamepadState` snapshot,
//!   the `OverrideFields` bitmask and the `OverrideRecord` patch with its merge
//!   function, and the `RequestStatus` a request completes with.
//!
//! - **`protocol`** – I/O control codes and the byte layout of the hide and
//!   override requests, plus the decoder that validates them.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `guardian_core::OverrideRecord` instead of the full module path.
pub use domain::gamepad::{buttons, GamepadState, OverrideFields, OverrideRecord};
pub use domain::ids::{InstanceId, ProcessId, UnitIndex, MAX_UNITS};
pub use domain::status::RequestStatus;
pub use protocol::codec::{
    decode_control_request, encode_hide_request, encode_override_request, ProtocolError,
};
pub use protocol::control::{
    ControlCode, ControlRequest, HideGamepadRequest, OverrideGamepadRequest,
};
