//! Error types for envflow.
//!
//! A step fails with an opaque [`StepError`]. The action runner never
//! classifies or rewrites it: [`ActionError`] only carries it back to the
//! caller together with the context at the halt point.

use crate::context::{ContextKey, EnvContext};
use crate::core::Role;
use std::fmt;
use thiserror::Error;

/// The opaque failure a step may return.
pub type StepError = anyhow::Error;

/// Result type returned by steps.
pub type StepResult = Result<EnvContext, StepError>;

/// The failure returned by [`Action::run`](crate::action::Action::run).
///
/// `Display` is that of the step's own error, and
/// [`std::error::Error::source`] yields the step's error itself, so the typed
/// failure stays reachable through an error chain after `?`. The role and step
/// position are available as separate accessors for diagnostics.
pub struct ActionError {
    role: Role,
    step_index: usize,
    step_name: String,
    context: EnvContext,
    source: StepError,
}

impl ActionError {
    pub(crate) fn new(
        role: Role,
        step_index: usize,
        step_name: impl Into<String>,
        context: EnvContext,
        source: StepError,
    ) -> Self {
        Self {
            role,
            step_index,
            step_name: step_name.into(),
            context,
            source,
        }
    }

    /// Returns the role of the action that failed.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the zero-based position of the failing step.
    #[must_use]
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Returns the diagnostic name of the failing step.
    #[must_use]
    pub fn step_name(&self) -> &str {
        &self.step_name
    }

    /// Returns the context that was handed to the failing step.
    #[must_use]
    pub fn context(&self) -> &EnvContext {
        &self.context
    }

    /// Returns the step's error.
    #[must_use]
    pub fn step_error(&self) -> &StepError {
        &self.source
    }

    /// Consumes the error, returning the step's error unchanged.
    #[must_use]
    pub fn into_source(self) -> StepError {
        self.source
    }

    /// Consumes the error, returning the halt-point context.
    #[must_use]
    pub fn into_context(self) -> EnvContext {
        self.context
    }

    /// Consumes the error, returning the halt-point context and the step's error.
    #[must_use]
    pub fn into_parts(self) -> (EnvContext, StepError) {
        (self.context, self.source)
    }

    /// Converts to a JSON representation for reporting.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "role": self.role,
            "step_index": self.step_index,
            "step_name": self.step_name,
            "message": self.source.to_string(),
        })
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl fmt::Debug for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionError")
            .field("role", &self.role)
            .field("step_index", &self.step_index)
            .field("step_name", &self.step_name)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl std::error::Error for ActionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let step: &(dyn std::error::Error + Send + Sync + 'static) = self.source.as_ref();
        Some(step)
    }
}

/// Errors raised by the [`EnvContext`] lookup helpers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContextError {
    /// No value is stored under the key.
    #[error("no value in context for key {key}")]
    Missing {
        /// The key that was looked up.
        key: ContextKey,
    },

    /// A value exists but has a different type.
    #[error("context value for key {key} is not a {expected}")]
    TypeMismatch {
        /// The key that was looked up.
        key: ContextKey,
        /// The requested type name.
        expected: &'static str,
    },

    /// The context's cancellation token has fired.
    #[error("context cancelled: {reason}")]
    Cancelled {
        /// The cancellation reason.
        reason: String,
    },
}

/// Errors raised while applying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The log filter directive could not be parsed.
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter {
        /// The offending directive.
        directive: String,
        /// The parser message.
        message: String,
    },

    /// A configuration value was not recognised.
    #[error("invalid value '{value}' for {field}")]
    InvalidValue {
        /// The configuration field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A global subscriber was already installed.
    #[error("tracing subscriber already initialised: {0}")]
    AlreadyInitialised(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::error::Error as _;

    #[derive(Debug, Error)]
    #[error("connection refused")]
    struct Refused;

    #[test]
    fn test_action_error_display_is_transparent() {
        let err = ActionError::new(
            Role::Setup,
            2,
            "create-cluster",
            EnvContext::background(),
            anyhow!("kind cluster failed to start"),
        );

        assert_eq!(err.to_string(), "kind cluster failed to start");
        assert_eq!(err.role(), Role::Setup);
        assert_eq!(err.step_index(), 2);
        assert_eq!(err.step_name(), "create-cluster");
    }

    #[test]
    fn test_action_error_preserves_step_error() {
        let step_err = anyhow::Error::new(Refused).context("dialing api server");
        let err = ActionError::new(Role::Finish, 0, "teardown", EnvContext::background(), step_err);

        assert_eq!(err.to_string(), "dialing api server");
        assert!(err.source().is_some_and(|s| s.to_string() == "dialing api server"));
        assert!(err
            .source()
            .and_then(std::error::Error::source)
            .is_some_and(|s| s.is::<Refused>()));

        let original = err.into_source();
        assert!(original.downcast_ref::<Refused>().is_some());
    }

    #[test]
    fn test_action_error_into_parts() {
        let ctx = EnvContext::background().with_value("namespace", "e2e".to_string());
        let err = ActionError::new(Role::AfterEachTest, 1, "dump-logs", ctx.clone(), anyhow!("boom"));

        let (returned, source) = err.into_parts();
        assert!(returned.ptr_eq(&ctx));
        assert_eq!(source.to_string(), "boom");
    }

    #[test]
    fn test_action_error_to_json() {
        let err = ActionError::new(Role::BeforeEachTest, 3, "seed", EnvContext::background(), anyhow!("nope"));
        let json = err.to_json();

        assert_eq!(json["role"], "before_each_test");
        assert_eq!(json["step_index"], 3);
        assert_eq!(json["step_name"], "seed");
        assert_eq!(json["message"], "nope");
    }

    #[test]
    fn test_context_error_messages() {
        let err = ContextError::Missing { key: ContextKey::from("kubeconfig") };
        assert_eq!(err.to_string(), "no value in context for key \"kubeconfig\"");

        let err = ContextError::TypeMismatch { key: ContextKey::from(0_i64), expected: "i32" };
        assert_eq!(err.to_string(), "context value for key #0 is not a i32");
    }
}
