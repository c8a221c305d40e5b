//! CLI command handling
//!
//! Dispatches CLI commands to a smoke case and formats output.

use colored::Colorize;

use crate::archive;
use crate::case::{BuildOptions, SmokeCase};
use crate::commands::{Commands, GlobalArgs};
use crate::common::{Config, Error, Result};
use crate::exec::BuildTool;
use crate::query::Query;
use crate::testing;

/// Dispatch a CLI command
pub fn dispatch(global: GlobalArgs, command: Commands) -> Result<()> {
    if let Commands::Test { path, verbose } = &command {
        let result = testing::run_scenario(path, global.config.as_deref(), *verbose)?;
        if result.passed {
            return Ok(());
        }
        return Err(Error::TestAssertion(format!(
            "scenario '{}' failed at step {}/{}",
            result.name, result.steps_run, result.steps_total
        )));
    }

    let mut case = open_case(&global)?;

    match command {
        Commands::Test { .. } => unreachable!("Test command is handled above"),

        Commands::Build {
            target,
            expect_failure,
            ignore_error,
            verbose,
        } => {
            let label = case.target(&target)?;
            if expect_failure {
                case.build_expecting_failure(&target, !verbose)?;
                println!("{} {} failed to build, as expected", "✓".green(), label);
            } else {
                case.build(
                    &target,
                    BuildOptions {
                        ignore_error,
                        silent: !verbose,
                    },
                )?;
                println!("{} Built {}", "✓".green(), label);
            }
            Ok(())
        }

        Commands::Run {
            target,
            command,
            ignore_error,
            verbose,
        } => {
            let label = case.target(&target)?;
            case.build_then_run(
                &target,
                command.as_deref(),
                BuildOptions {
                    ignore_error,
                    silent: !verbose,
                },
            )?;
            println!("{} Ran {}", "✓".green(), label);
            Ok(())
        }

        Commands::Query {
            expression,
            implicit_deps,
            json,
        } => {
            let query = Query::raw(expression)?;
            let results = case.query(&query, implicit_deps)?;
            print_lines(&results, json)
        }

        Commands::Libraries {
            label,
            implicit_deps,
            json,
        } => {
            let results = case.library_query(&label, implicit_deps)?;
            print_lines(&results, json)
        }

        Commands::Archive {
            target,
            extension,
            contains,
            excludes,
            verbose,
        } => {
            let extension =
                extension.unwrap_or_else(|| case.config().defaults.archive_extension.clone());
            let jar = case.build_and_open_archive(&target, &extension, !verbose)?;

            if contains.is_empty() && excludes.is_empty() {
                for name in archive::entry_names(&jar) {
                    println!("{}", name);
                }
                return Ok(());
            }

            archive::assert_contains(&jar, &contains)?;
            archive::assert_does_not_contain(&jar, &excludes)?;
            println!(
                "{} {}.{}: {} present, {} absent",
                "✓".green(),
                target,
                extension,
                contains.len(),
                excludes.len()
            );
            Ok(())
        }

        Commands::WorkerArgs {
            target,
            json,
            verbose,
        } => {
            case.build_and_record(
                &target,
                BuildOptions {
                    ignore_error: false,
                    silent: !verbose,
                },
            )?;
            let args = case.worker_args()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&args)?);
            } else if args.is_empty() {
                println!("No worker arguments");
            } else {
                for (key, value) in args.iter() {
                    println!("{} {}", key.cyan(), value);
                }
            }
            Ok(())
        }
    }
}

/// Smoke case for the global options, discovering the workspace when needed
fn open_case(global: &GlobalArgs) -> Result<SmokeCase> {
    let workspace = match &global.workspace {
        Some(dir) => dir.clone(),
        None => {
            let config = Config::load_for(global.config.as_deref(), None)?;
            BuildTool::from_config(&config).workspace_root()?
        }
    };
    let config = Config::load_for(global.config.as_deref(), Some(workspace.as_path()))?;
    Ok(SmokeCase::new(config, workspace, global.package.clone()))
}

fn print_lines(lines: &[String], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(lines)?);
    } else {
        for line in lines {
            println!("{}", line);
        }
    }
    Ok(())
}
