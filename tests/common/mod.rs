//! Shared test utilities
//!
//! Fakes for the external-tool traits and helpers that build real Git
//! repositories with git2 inside temporary directories.

#![allow(dead_code)]

pub mod fakes;
pub mod fixtures;
