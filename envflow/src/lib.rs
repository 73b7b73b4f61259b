//! # Envflow
//!
//! Role-labelled, sequential step execution for end-to-end test lifecycle
//! hooks.
//!
//! An orchestrator builds one [`Action`](action::Action) per lifecycle phase
//! (setup, before/after each feature or test, finish) and runs them in the
//! order it chooses, passing the context returned by one phase into the next:
//!
//! - **Sequential steps**: each step receives the context produced by the
//!   step before it
//! - **Fail-fast**: the first failing step halts the action; its error is
//!   returned untouched
//! - **Opaque context**: an immutable, key-addressable carrier the runner never
//!   inspects
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use envflow::prelude::*;
//!
//! let setup = Action::builder(Role::Setup)
//!     .step_fn("create-namespace", |ctx| Ok(ctx.with_value("namespace", "e2e".to_string())))
//!     .step_async("wait-ready", |ctx| async move { Ok(ctx) })
//!     .build();
//!
//! let ctx = setup.run(EnvContext::background()).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod action;
pub mod cancellation;
pub mod context;
pub mod core;
pub mod errors;
pub mod observability;
pub mod steps;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionBuilder};
    pub use crate::cancellation::CancellationToken;
    pub use crate::context::{ContextKey, EnvContext};
    pub use crate::core::Role;
    pub use crate::errors::{ActionError, ConfigError, ContextError, StepError, StepResult};
    pub use crate::observability::{init_tracing, LogConfig, LogFormat};
    pub use crate::steps::{async_env_func, env_func, AsyncFnStep, EnvFunc, FnStep, SharedEnvFunc};
}
