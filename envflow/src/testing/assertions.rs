//! Test assertions for action results.

use std::any::Any;
use std::fmt::Debug;

use crate::context::{ContextKey, EnvContext};
use crate::errors::ActionError;

/// Asserts that a run failed at step `index` and returns the error.
pub fn assert_failed_at(result: Result<EnvContext, ActionError>, index: usize) -> ActionError {
    match result {
        Ok(ctx) => panic!("Expected failure at step {index}, but the action succeeded with {ctx:?}"),
        Err(err) => {
            assert_eq!(
                err.step_index(),
                index,
                "Expected failure at step {}, got step {} ({}): {}",
                index,
                err.step_index(),
                err.step_name(),
                err
            );
            err
        }
    }
}

/// Asserts that `ctx` holds `expected` under `key`.
pub fn assert_context_value<T>(ctx: &EnvContext, key: impl Into<ContextKey>, expected: &T)
where
    T: Any + PartialEq + Debug,
{
    let key = key.into();
    let actual = ctx.value::<T>(key.clone());
    assert_eq!(
        actual,
        Some(expected),
        "Expected {:?} for key {}, got {:?}",
        expected,
        key,
        actual
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Role;

    #[test]
    fn test_assert_context_value() {
        let ctx = EnvContext::background().with_value("replicas", 3_u32);
        assert_context_value(&ctx, "replicas", &3_u32);
    }

    #[test]
    #[should_panic(expected = "Expected")]
    fn test_assert_context_value_missing() {
        assert_context_value(&EnvContext::background(), "replicas", &3_u32);
    }

    #[test]
    #[should_panic(expected = "but the action succeeded")]
    fn test_assert_failed_at_on_success() {
        assert_failed_at(Ok(EnvContext::background()), 0);
    }

    #[test]
    fn test_assert_failed_at() {
        let err = ActionError::new(
            Role::Setup,
            1,
            "second",
            EnvContext::background(),
            anyhow::anyhow!("failed"),
        );
        let err = assert_failed_at(Err(err), 1);
        assert_eq!(err.step_name(), "second");
    }
}
