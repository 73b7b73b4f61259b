//! Role-labelled sequential step execution.
//!
//! An [`Action`] owns a [`Role`] and a fixed, ordered list of steps. Running
//! it threads one [`EnvContext`] through the steps and stops at the first
//! failure.

mod builder;

pub use builder::ActionBuilder;

use crate::context::EnvContext;
use crate::core::Role;
use crate::errors::ActionError;
use crate::steps::SharedEnvFunc;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

/// A lifecycle phase: a role and the steps run for it.
///
/// The step list is fixed at construction. Cloning shares it.
#[derive(Clone)]
pub struct Action {
    role: Role,
    funcs: Arc<[SharedEnvFunc]>,
}

impl Action {
    /// Creates an action running `funcs` in order.
    #[must_use]
    pub fn new(role: Role, funcs: Vec<SharedEnvFunc>) -> Self {
        Self {
            role,
            funcs: funcs.into(),
        }
    }

    /// Starts a fluent builder for an action with `role`.
    #[must_use]
    pub fn builder(role: Role) -> ActionBuilder {
        ActionBuilder::new(role)
    }

    /// Returns the role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    /// Returns true if the action has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    /// Returns the step names in execution order.
    #[must_use]
    pub fn step_names(&self) -> Vec<&str> {
        self.funcs.iter().map(|f| f.name()).collect()
    }

    /// Runs every step in order, feeding each the previous step's context.
    ///
    /// With no steps, `ctx` is returned unchanged.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step; later steps are not invoked. The
    /// returned [`ActionError`] holds the step's error untouched and the
    /// context that step was given.
    pub async fn run(&self, ctx: EnvContext) -> Result<EnvContext, ActionError> {
        let span = info_span!(
            "action.run",
            role = %self.role,
            steps = self.funcs.len(),
            run_id = %Uuid::new_v4()
        );
        self.run_steps(ctx).instrument(span).await
    }

    async fn run_steps(&self, mut ctx: EnvContext) -> Result<EnvContext, ActionError> {
        let start = Instant::now();

        for (index, func) in self.funcs.iter().enumerate() {
            let step_start = Instant::now();
            debug!(step = index, name = func.name(), "Running step");

            match func.call(ctx.clone()).await {
                Ok(next) => {
                    debug!(
                        step = index,
                        name = func.name(),
                        duration_ms = step_start.elapsed().as_secs_f64() * 1000.0,
                        "Step completed"
                    );
                    ctx = next;
                }
                Err(source) => {
                    warn!(
                        step = index,
                        name = func.name(),
                        error = %source,
                        "Step failed, halting action"
                    );
                    return Err(ActionError::new(self.role, index, func.name(), ctx, source));
                }
            }
        }

        debug!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Action completed"
        );
        Ok(ctx)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("role", &self.role)
            .field("steps", &self.step_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::env_func;
    use anyhow::anyhow;

    fn add(name: &'static str, amount: i64) -> SharedEnvFunc {
        env_func(name, move |ctx| {
            let current = ctx.value::<i64>("total").copied().unwrap_or_default();
            Ok(ctx.with_value("total", current + amount))
        })
    }

    #[test]
    fn test_action_accessors() {
        let action = Action::new(Role::BeforeEachTest, vec![add("one", 1), add("two", 2)]);

        assert_eq!(action.role(), Role::BeforeEachTest);
        assert_eq!(action.len(), 2);
        assert!(!action.is_empty());
        assert_eq!(action.step_names(), vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_empty_action_returns_input() {
        let action = Action::new(Role::Finish, Vec::new());
        let ctx = EnvContext::background().with_value("kept", 1_u8);

        let out = action.run(ctx.clone()).await.unwrap();
        assert!(out.ptr_eq(&ctx));
    }

    #[tokio::test]
    async fn test_failure_returns_last_good_context() {
        let action = Action::new(
            Role::Setup,
            vec![
                add("one", 1),
                env_func("explode", |ctx| {
                    let _partial = ctx.with_value("total", 1000_i64);
                    Err(anyhow!("quota exceeded"))
                }),
                add("never", 5),
            ],
        );

        let err = action.run(EnvContext::background()).await.unwrap_err();

        assert_eq!(err.step_index(), 1);
        assert_eq!(err.step_name(), "explode");
        assert_eq!(err.role(), Role::Setup);
        assert_eq!(err.to_string(), "quota exceeded");
        assert_eq!(err.context().value::<i64>("total"), Some(&1));
    }

    #[test]
    fn test_clone_shares_steps() {
        let action = Action::new(Role::Setup, vec![add("one", 1)]);
        let clone = action.clone();
        assert!(Arc::ptr_eq(&action.funcs, &clone.funcs));
    }

    #[test]
    fn test_debug_lists_steps() {
        let action = Action::new(Role::AfterEachFeature, vec![add("collect", 1)]);
        let debug = format!("{action:?}");
        assert!(debug.contains("AfterEachFeature"));
        assert!(debug.contains("collect"));
    }

    #[test]
    fn test_action_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Action>();
    }
}
