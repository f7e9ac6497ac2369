//! Test utilities for fsload.
//!
//! This crate provides utilities to facilitate testing of fsload. See the modules for all
//! available utilities.

pub mod tracing;
pub mod tree;
