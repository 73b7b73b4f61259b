//! Fluent construction of actions.

use super::Action;
use crate::context::EnvContext;
use crate::core::Role;
use crate::errors::StepResult;
use crate::steps::{AsyncFnStep, EnvFunc, FnStep, SharedEnvFunc};
use std::future::Future;
use std::sync::Arc;

/// Collects steps for an [`Action`].
///
/// The action built from it is frozen; the builder is the only place steps
/// can be added.
#[derive(Clone)]
pub struct ActionBuilder {
    role: Role,
    funcs: Vec<SharedEnvFunc>,
}

impl ActionBuilder {
    /// Creates a builder for an action with `role`.
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self {
            role,
            funcs: Vec::new(),
        }
    }

    /// Appends a step.
    #[must_use]
    pub fn step(self, func: impl EnvFunc + 'static) -> Self {
        self.shared_step(Arc::new(func))
    }

    /// Appends an already shared step.
    #[must_use]
    pub fn shared_step(mut self, func: SharedEnvFunc) -> Self {
        self.funcs.push(func);
        self
    }

    /// Appends every step from `funcs`, keeping their order.
    #[must_use]
    pub fn steps(mut self, funcs: impl IntoIterator<Item = SharedEnvFunc>) -> Self {
        self.funcs.extend(funcs);
        self
    }

    /// Appends a synchronous closure step.
    #[must_use]
    pub fn step_fn<F>(self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(EnvContext) -> StepResult + Send + Sync + 'static,
    {
        self.step(FnStep::new(name, func))
    }

    /// Appends an async closure step.
    #[must_use]
    pub fn step_async<F, Fut>(self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(EnvContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StepResult> + Send + 'static,
    {
        self.step(AsyncFnStep::new(name, func))
    }

    /// Returns the number of steps added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    /// Returns true if no steps were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    /// Freezes the collected steps into an action.
    #[must_use]
    pub fn build(self) -> Action {
        Action::new(self.role, self.funcs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::env_func;

    #[test]
    fn test_builder_preserves_order() {
        let action = Action::builder(Role::Setup)
            .step_fn("create-cluster", Ok)
            .step_async("install-crds", |ctx: EnvContext| async move { Ok(ctx) })
            .steps(vec![env_func("create-namespace", Ok)])
            .build();

        assert_eq!(action.role(), Role::Setup);
        assert_eq!(
            action.step_names(),
            vec!["create-cluster", "install-crds", "create-namespace"]
        );
    }

    #[test]
    fn test_builder_len() {
        let builder = ActionBuilder::new(Role::Finish);
        assert!(builder.is_empty());

        let builder = builder.step_fn("delete-cluster", Ok);
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_built_action_unaffected_by_builder_clone() {
        let builder = Action::builder(Role::AfterEachTest).step_fn("a", Ok);
        let action = builder.clone().build();
        let longer = builder.step_fn("b", Ok).build();

        assert_eq!(action.len(), 1);
        assert_eq!(longer.len(), 2);
    }
}
