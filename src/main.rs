//! Smoke CLI - build, run, query and inspect Bazel targets from the shell

use clap::Parser;
use smoke::commands::{Commands, GlobalArgs};
use smoke::{cli, common::logging};

#[derive(Parser)]
#[command(name = "smoke", about = "Smoke-test harness for Bazel workspaces")]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.command.verbose());

    if let Err(e) = cli::dispatch(cli.global, cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
