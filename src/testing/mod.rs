//! Smoke scenario runner
//!
//! Reads YAML smoke scenarios and runs them step by step against a
//! [`SmokeCase`](crate::case::SmokeCase), so build expectations can be written
//! down without a Rust test per target.

mod config;
mod runner;

pub use config::*;
pub use runner::{load_scenario, run_scenario, TestResult};
