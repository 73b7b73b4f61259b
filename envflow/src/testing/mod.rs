//! Testing utilities for actions and steps.
//!
//! This module provides:
//! - Mock steps that count and record their calls
//! - Assertions over run results and contexts

mod assertions;
mod mocks;

pub use assertions::{assert_context_value, assert_failed_at};
pub use mocks::{CallLog, FailingStep, NoOpStep, RecordingStep, SetValueStep, SlowStep};
