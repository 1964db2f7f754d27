//! Integration test utilities for starbot
//!
//! This crate provides an in-memory chat platform and a harness that runs
//! the real services and event dispatcher against it, backed by a store in
//! a temporary directory.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
