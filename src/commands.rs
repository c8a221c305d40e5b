//! CLI command definitions
//!
//! Defines the clap commands for the smoke CLI.

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Workspace root (default: asked from the build tool)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Package bare target names resolve into (default: root package)
    #[arg(long, short, global = true, default_value = "")]
    pub package: String,

    /// Configuration file (default: smoke.toml in the workspace, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a target
    Build {
        /// Target label or bare name
        target: String,

        /// Assert that the build fails
        #[arg(long, conflicts_with = "ignore_error")]
        expect_failure: bool,

        /// Tolerate a failing build
        #[arg(long)]
        ignore_error: bool,

        /// Show build tool output
        #[arg(long, short)]
        verbose: bool,
    },

    /// Build a target, then launch it
    Run {
        /// Target label or bare name
        target: String,

        /// Launch subcommand (default: configured run command)
        #[arg(long)]
        command: Option<String>,

        /// Tolerate a failing build or launch
        #[arg(long)]
        ignore_error: bool,

        /// Show build tool output
        #[arg(long, short)]
        verbose: bool,
    },

    /// Evaluate a query expression
    Query {
        /// Query expression, passed to the tool as-is
        expression: String,

        /// Include implicit and tool dependencies
        #[arg(long)]
        implicit_deps: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List library-like dependencies of a label
    #[command(alias = "libs")]
    Libraries {
        /// Target label or bare name
        label: String,

        /// Include implicit and tool dependencies
        #[arg(long)]
        implicit_deps: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build an archive output and check or list its entries
    #[command(alias = "jar")]
    Archive {
        /// Target label or bare name (the extension is appended)
        target: String,

        /// Archive extension (default: configured archive extension)
        #[arg(long, short)]
        extension: Option<String>,

        /// Entry that must be present (repeatable)
        #[arg(long)]
        contains: Vec<String>,

        /// Entry that must be absent (repeatable)
        #[arg(long)]
        excludes: Vec<String>,

        /// Show build tool output
        #[arg(long, short)]
        verbose: bool,
    },

    /// Build a target and print its worker arguments
    WorkerArgs {
        /// Target label or bare name
        target: String,

        /// Output results as JSON
        #[arg(long)]
        json: bool,

        /// Show build tool output
        #[arg(long, short)]
        verbose: bool,
    },

    /// Execute a smoke scenario defined in a YAML file
    Test {
        /// Path to the YAML smoke scenario file
        path: PathBuf,

        /// Verbose output
        #[arg(long, short)]
        verbose: bool,
    },
}

impl Commands {
    /// Whether the command asked for verbose output
    pub fn verbose(&self) -> bool {
        match self {
            Commands::Build { verbose, .. }
            | Commands::Run { verbose, .. }
            | Commands::Archive { verbose, .. }
            | Commands::WorkerArgs { verbose, .. }
            | Commands::Test { verbose, .. } => *verbose,
            Commands::Query { .. } | Commands::Libraries { .. } => false,
        }
    }
}
