//! Cooperative cancellation for step authors.

mod token;

pub use token::{CancelCallback, CancellationToken};
