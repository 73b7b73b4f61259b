//! The execution context passed from step to step.
//!
//! The action runner treats an [`EnvContext`] as an opaque baton. Step
//! authors use it to hand data (cluster handles, namespaces, credentials)
//! to later steps and later lifecycle phases.

mod env;
mod key;

pub use env::EnvContext;
pub use key::ContextKey;
