//! Mock steps for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::context::{ContextKey, EnvContext};
use crate::errors::StepResult;
use crate::steps::EnvFunc;

/// A shared, ordered record of step invocations.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn record(&self, name: impl Into<String>) {
        self.calls.lock().push(name.into());
    }

    /// Returns the entries in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }
}

/// A step that returns its input unchanged.
#[derive(Debug, Clone)]
pub struct NoOpStep {
    name: String,
}

impl NoOpStep {
    /// Creates a new no-op step.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl EnvFunc for NoOpStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, ctx: EnvContext) -> StepResult {
        Ok(ctx)
    }
}

/// A step that counts its calls and records its name in a [`CallLog`].
#[derive(Debug)]
pub struct RecordingStep {
    name: String,
    log: CallLog,
    calls: AtomicUsize,
}

impl RecordingStep {
    /// Creates a recording step writing to `log`.
    #[must_use]
    pub fn new(name: impl Into<String>, log: CallLog) -> Self {
        Self {
            name: name.into(),
            log,
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns how many times the step ran.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EnvFunc for RecordingStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, ctx: EnvContext) -> StepResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.record(&self.name);
        Ok(ctx)
    }
}

/// A step that always fails.
#[derive(Debug)]
pub struct FailingStep {
    name: String,
    message: String,
    calls: AtomicUsize,
}

impl FailingStep {
    /// Creates a step failing with `message`.
    #[must_use]
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns how many times the step ran.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EnvFunc for FailingStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, _ctx: EnvContext) -> StepResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!(self.message.clone()))
    }
}

/// A step that attaches a fixed value to the context.
pub struct SetValueStep {
    name: String,
    key: ContextKey,
    value: Arc<dyn Any + Send + Sync>,
}

impl SetValueStep {
    /// Creates a step storing `value` under `key` on every call.
    pub fn new<T>(name: impl Into<String>, key: impl Into<ContextKey>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            name: name.into(),
            key: key.into(),
            value: Arc::new(value),
        }
    }
}

impl std::fmt::Debug for SetValueStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetValueStep")
            .field("name", &self.name)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl EnvFunc for SetValueStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, ctx: EnvContext) -> StepResult {
        Ok(ctx.with_shared_value(self.key.clone(), Arc::clone(&self.value)))
    }
}

/// A step that sleeps before returning its input.
#[derive(Debug, Clone)]
pub struct SlowStep {
    name: String,
    delay: Duration,
}

impl SlowStep {
    /// Creates a step sleeping for `delay`.
    #[must_use]
    pub fn new(name: impl Into<String>, delay: Duration) -> Self {
        Self {
            name: name.into(),
            delay,
        }
    }
}

#[async_trait]
impl EnvFunc for SlowStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, ctx: EnvContext) -> StepResult {
        tokio::time::sleep(self.delay).await;
        Ok(ctx)
    }
}
