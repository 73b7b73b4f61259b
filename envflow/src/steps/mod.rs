//! The step contract and closure adapters.
//!
//! A step ("environment function") receives the current [`EnvContext`] and
//! returns the context the next step should see, or a failure.

use crate::context::EnvContext;
use crate::errors::StepResult;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use std::fmt::{self, Debug};
use std::future::Future;
use std::sync::Arc;

/// A single unit of work in an action.
#[async_trait]
pub trait EnvFunc: Send + Sync {
    /// Returns a name used in logs and errors.
    fn name(&self) -> &str {
        "env_func"
    }

    /// Runs the step against `ctx`.
    ///
    /// # Returns
    ///
    /// The context handed to the next step, or the step's failure.
    async fn call(&self, ctx: EnvContext) -> StepResult;
}

/// A shared, type-erased step.
pub type SharedEnvFunc = Arc<dyn EnvFunc>;

/// A step backed by a synchronous closure.
pub struct FnStep<F>
where
    F: Fn(EnvContext) -> StepResult + Send + Sync,
{
    name: String,
    func: F,
}

impl<F> FnStep<F>
where
    F: Fn(EnvContext) -> StepResult + Send + Sync,
{
    /// Creates a new closure-backed step.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Debug for FnStep<F>
where
    F: Fn(EnvContext) -> StepResult + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStep").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<F> EnvFunc for FnStep<F>
where
    F: Fn(EnvContext) -> StepResult + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, ctx: EnvContext) -> StepResult {
        (self.func)(ctx)
    }
}

type BoxedAsyncFn = Box<dyn Fn(EnvContext) -> BoxFuture<'static, StepResult> + Send + Sync>;

/// A step backed by a closure returning a future.
pub struct AsyncFnStep {
    name: String,
    func: BoxedAsyncFn,
}

impl AsyncFnStep {
    /// Creates a new async closure-backed step.
    pub fn new<F, Fut>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(EnvContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StepResult> + Send + 'static,
    {
        Self {
            name: name.into(),
            func: Box::new(move |ctx| func(ctx).boxed()),
        }
    }
}

impl Debug for AsyncFnStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncFnStep").field("name", &self.name).finish()
    }
}

#[async_trait]
impl EnvFunc for AsyncFnStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, ctx: EnvContext) -> StepResult {
        (self.func)(ctx).await
    }
}

/// Wraps a synchronous closure as a shared step.
pub fn env_func<F>(name: impl Into<String>, func: F) -> SharedEnvFunc
where
    F: Fn(EnvContext) -> StepResult + Send + Sync + 'static,
{
    Arc::new(FnStep::new(name, func))
}

/// Wraps an async closure as a shared step.
pub fn async_env_func<F, Fut>(name: impl Into<String>, func: F) -> SharedEnvFunc
where
    F: Fn(EnvContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = StepResult> + Send + 'static,
{
    Arc::new(AsyncFnStep::new(name, func))
}
