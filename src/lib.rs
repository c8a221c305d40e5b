//! Smoke-test harness for Bazel workspaces
//!
//! Shells out to the build tool to build, run and query targets, then checks
//! what came out: archive entries, worker arguments, query results.

pub mod archive;
pub mod case;
pub mod cli;
pub mod commands;
pub mod common;
pub mod exec;
pub mod label;
pub mod query;
pub mod testing;
pub mod worker_args;

// Re-export commonly used types for tests
pub use case::{BuildOptions, SmokeCase};
pub use common::{Config, Error, Result};
pub use exec::Expect;
pub use label::Label;
pub use worker_args::WorkerArgs;
