//! Domain types for Gamepad Guardian.
//!
//! This module contains pure data and merge logic with no infrastructure
//! dependencies.  It compiles and tests on any platform without a device
//! stack, which is what keeps the override semantics easy to pin down in
//! unit tests.

/// Gamepad state snapshot and the override patch applied to it.
///
/// See [`gamepad::OverrideRecord::apply`] for the merge rule.
pub mod gamepad;

/// Identifiers for logical units, processes and filtered instances.
pub mod ids;

/// Completion status of a device or control request.
pub mod status;
