//! Lifecycle role labels.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The lifecycle phase an action belongs to.
///
/// Purely descriptive: the role shows up in logs and errors but never changes
/// how an action runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Runs once before any feature or test.
    Setup,
    /// Runs before each test.
    BeforeEachTest,
    /// Runs before each feature of a test.
    BeforeEachFeature,
    /// Runs after each feature of a test.
    AfterEachFeature,
    /// Runs after each test.
    AfterEachTest,
    /// Runs once after everything else.
    Finish,
}

impl Role {
    /// All roles, in the order a typical test run visits them.
    pub const ALL: [Self; 6] = [
        Self::Setup,
        Self::BeforeEachTest,
        Self::BeforeEachFeature,
        Self::AfterEachFeature,
        Self::AfterEachTest,
        Self::Finish,
    ];

    /// Returns the snake_case name of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::BeforeEachTest => "before_each_test",
            Self::BeforeEachFeature => "before_each_feature",
            Self::AfterEachFeature => "after_each_feature",
            Self::AfterEachTest => "after_each_test",
            Self::Finish => "finish",
        }
    }

    /// Returns true for roles that tear state down rather than build it up.
    #[must_use]
    pub fn is_teardown(&self) -> bool {
        matches!(self, Self::AfterEachFeature | Self::AfterEachTest | Self::Finish)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "role",
                value: s.to_string(),
            })
    }
}
