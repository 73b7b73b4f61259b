//! Core domain types for envflow.

mod role;

pub use role::Role;
