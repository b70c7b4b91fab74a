//! guardian-filter library entry point.
//!
//! Exposes the application layer (gate, registry, override engine, control
//! dispatch) and the infrastructure seams a hosting device framework plugs
//! into.  Integration tests in `tests/` use the same module tree.

pub mod application;
pub mod infrastructure;

pub use application::filter::GuardianFilter;
