//! Application layer of the filter.
//!
//! Use cases in this layer orchestrate domain types from `guardian_core` and
//! depend only on the traits of the infrastructure seams, so every decision
//! can be unit-tested without a device stack.
//!
//! # Sub-modules
//!
//! - **`filtered_instance`** – One attached device: identity, hardware ids,
//!   optional unit binding and interception counters; plus the affected-device
//!   matcher that decides whether an instance is filtered at all.
//!
//! - **`process_identity`** – Fail-closed exemption check on top of the
//!   process allow-list.
//!
//! - **`instance_registry`** – The lock-protected set of attached instances,
//!   which also owns the lifecycle of the shared control channel.
//!
//! - **`open_gate`** – Forwards or denies each open attempt.
//!
//! - **`override_engine`** – Per-unit override records and the merge applied
//!   on every state read.
//!
//! - **`control_dispatch`** – Decodes control requests and routes them to the
//!   policy or the override engine.
//!
//! - **`filter`** – The facade a hosting framework drives through plain
//!   lifecycle and request methods.

pub mod control_dispatch;
pub mod filter;
pub mod filtered_instance;
pub mod instance_registry;
pub mod open_gate;
pub mod override_engine;
pub mod process_identity;
