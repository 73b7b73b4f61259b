//! Keys addressing values in an [`EnvContext`](super::EnvContext).

use std::fmt;

/// A key under which a context value is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextKey {
    /// A named key.
    Name(String),
    /// A numeric key.
    Index(i64),
}

impl From<&str> for ContextKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ContextKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<i64> for ContextKey {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name:?}"),
            Self::Index(index) => write!(f, "#{index}"),
        }
    }
}
