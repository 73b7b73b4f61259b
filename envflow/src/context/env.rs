//! The execution context threaded through an action's steps.

use super::ContextKey;
use crate::cancellation::CancellationToken;
use crate::errors::ContextError;
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

struct Entry {
    key: ContextKey,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Entry>>,
}

/// An immutable, key-addressable carrier of ancillary data.
///
/// Contexts are derived, never edited: [`with_value`](Self::with_value)
/// returns a new context that shares every existing entry with its parent.
/// A later value shadows an earlier one stored under the same key. Cloning is
/// a pair of reference-count bumps.
#[derive(Clone, Default)]
pub struct EnvContext {
    head: Option<Arc<Entry>>,
    cancellation: Option<Arc<CancellationToken>>,
}

impl EnvContext {
    /// Returns an empty context with no values and no cancellation token.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Derives a context holding `value` under `key`.
    #[must_use]
    pub fn with_value<T>(&self, key: impl Into<ContextKey>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.with_shared_value(key, Arc::new(value))
    }

    /// Derives a context holding an already shared value under `key`.
    #[must_use]
    pub fn with_shared_value(
        &self,
        key: impl Into<ContextKey>,
        value: Arc<dyn Any + Send + Sync>,
    ) -> Self {
        Self {
            head: Some(Arc::new(Entry {
                key: key.into(),
                value,
                parent: self.head.clone(),
            })),
            cancellation: self.cancellation.clone(),
        }
    }

    /// Derives a context carrying `token`.
    ///
    /// Replaces any token inherited from `self`.
    #[must_use]
    pub fn with_cancellation(&self, token: Arc<CancellationToken>) -> Self {
        Self {
            head: self.head.clone(),
            cancellation: Some(token),
        }
    }

    /// Returns the value stored under `key` if it has type `T`.
    #[must_use]
    pub fn value<T: Any>(&self, key: impl Into<ContextKey>) -> Option<&T> {
        self.lookup(&key.into())?.downcast_ref::<T>()
    }

    /// Returns the value stored under `key`, or why it is unavailable.
    pub fn require<T: Any>(&self, key: impl Into<ContextKey>) -> Result<&T, ContextError> {
        let key = key.into();
        match self.lookup(&key) {
            None => Err(ContextError::Missing { key }),
            Some(value) => value.downcast_ref::<T>().ok_or(ContextError::TypeMismatch {
                key,
                expected: std::any::type_name::<T>(),
            }),
        }
    }

    /// Returns true if any value is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: impl Into<ContextKey>) -> bool {
        self.lookup(&key.into()).is_some()
    }

    /// Returns the distinct keys in the order they were first inserted.
    #[must_use]
    pub fn keys(&self) -> Vec<ContextKey> {
        let mut newest_first = Vec::new();
        let mut cursor = self.head.as_deref();
        while let Some(entry) = cursor {
            newest_first.push(&entry.key);
            cursor = entry.parent.as_deref();
        }

        let mut seen = HashSet::with_capacity(newest_first.len());
        newest_first
            .into_iter()
            .rev()
            .filter(|key| seen.insert(*key))
            .cloned()
            .collect()
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    /// Returns true if the context holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the cancellation token, if one is attached.
    #[must_use]
    pub fn cancellation(&self) -> Option<&Arc<CancellationToken>> {
        self.cancellation.as_ref()
    }

    /// Returns true if an attached token has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.as_ref().is_some_and(|t| t.is_cancelled())
    }

    /// Fails with [`ContextError::Cancelled`] once the attached token fires.
    pub fn check_cancelled(&self) -> Result<(), ContextError> {
        match &self.cancellation {
            Some(token) if token.is_cancelled() => Err(ContextError::Cancelled {
                reason: token.reason().unwrap_or_default(),
            }),
            _ => Ok(()),
        }
    }

    /// Returns true if both contexts share the same entries and token.
    ///
    /// Two independently created empty contexts compare equal.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        let same_head = match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        let same_token = match (&self.cancellation, &other.cancellation) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_head && same_token
    }

    fn lookup(&self, key: &ContextKey) -> Option<&(dyn Any + Send + Sync)> {
        let mut cursor = self.head.as_deref();
        while let Some(entry) = cursor {
            if entry.key == *key {
                return Some(entry.value.as_ref());
            }
            cursor = entry.parent.as_deref();
        }
        None
    }
}

impl fmt::Debug for EnvContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvContext")
            .field("keys", &self.keys())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
