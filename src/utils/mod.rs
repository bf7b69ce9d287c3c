//! Shared utilities.

pub mod num;
