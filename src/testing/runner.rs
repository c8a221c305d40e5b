//! Smoke scenario runner
//!
//! Executes scenario steps against a [`SmokeCase`], stopping at the first
//! failing step.

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::archive;
use crate::case::{BuildOptions, SmokeCase};
use crate::common::paths::package_of;
use crate::common::{Config, Error, Result};
use crate::exec::BuildTool;
use crate::query::Query;

use super::config::{SmokeScenario, SmokeStep};

/// Result of a scenario run
#[derive(Debug)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub steps_run: usize,
    pub steps_total: usize,
    pub error: Option<String>,
}

/// Load a scenario from a YAML file
pub fn load_scenario(path: &Path) -> Result<SmokeScenario> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read smoke scenario '{}': {}",
            path.display(),
            e
        ))
    })?;

    serde_yaml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse smoke scenario: {}", e)))
}

/// Run a smoke scenario from a YAML file
///
/// Step failures are reported in the returned [`TestResult`]; `Err` means
/// the scenario could not be set up at all.
pub fn run_scenario(path: &Path, config_file: Option<&Path>, verbose: bool) -> Result<TestResult> {
    let scenario = load_scenario(path)?;
    let steps_total = scenario.steps.len();

    println!(
        "\n{} {}",
        "Running Smoke Test:".blue().bold(),
        scenario.name.white().bold()
    );

    if let Some(desc) = &scenario.description {
        println!("  {}", desc.dimmed());
    }

    let mut case = open_case(&scenario, path, config_file)?;

    if verbose {
        println!(
            "  Workspace: {}",
            case.workspace().display().to_string().dimmed()
        );
        println!("  Package: {}", case.package().dimmed());
    }

    println!("\n{}", "Steps:".cyan());

    let defaults = case.config().defaults.clone();

    for (i, step) in scenario.steps.iter().enumerate() {
        let step_num = i + 1;

        match execute_step(&mut case, step, verbose) {
            Ok(()) => {
                println!("  {} Step {}: {}", "✓".green(), step_num, step.describe(&defaults));
            }
            Err(e) => {
                println!("  {} Step {}: {}", "✗".red(), step_num, step.describe(&defaults));
                println!("    {}", e.to_string().red());

                return Ok(TestResult {
                    name: scenario.name,
                    passed: false,
                    steps_run: step_num,
                    steps_total,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    println!(
        "\n{} {}\n",
        "✓".green().bold(),
        "Smoke Test Passed".green().bold()
    );

    Ok(TestResult {
        name: scenario.name,
        passed: true,
        steps_run: steps_total,
        steps_total,
        error: None,
    })
}

/// Build the smoke case a scenario runs in
fn open_case(scenario: &SmokeScenario, path: &Path, config_file: Option<&Path>) -> Result<SmokeCase> {
    let scenario_dir = path.parent().unwrap_or(Path::new("."));

    let workspace = match &scenario.workspace {
        Some(dir) if dir.is_relative() => scenario_dir.join(dir),
        Some(dir) => dir.clone(),
        None => {
            let config = Config::load_for(config_file, None)?;
            BuildTool::from_config(&config).workspace_root()?
        }
    };
    let workspace = canonical(&workspace);

    let config = Config::load_for(config_file, Some(workspace.as_path()))?;
    let package = match &scenario.package {
        Some(package) => package.clone(),
        None => package_of(&workspace, &canonical(path)),
    };

    Ok(SmokeCase::new(config, workspace, package))
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Execute a single step
fn execute_step(case: &mut SmokeCase, step: &SmokeStep, verbose: bool) -> Result<()> {
    let silent = !verbose;

    match step {
        SmokeStep::Build {
            target,
            expect_failure,
            ignore_error,
        } => {
            if *expect_failure {
                case.build_expecting_failure(target, silent)
            } else {
                case.build(
                    target,
                    BuildOptions {
                        ignore_error: *ignore_error,
                        silent,
                    },
                )
            }
        }

        SmokeStep::Run {
            target,
            command,
            ignore_error,
        } => case.build_then_run(
            target,
            command.as_deref(),
            BuildOptions {
                ignore_error: *ignore_error,
                silent,
            },
        ),

        SmokeStep::Archive {
            target,
            extension,
            contains,
            excludes,
        } => {
            let extension = extension
                .clone()
                .unwrap_or_else(|| case.config().defaults.archive_extension.clone());
            let jar = case.build_and_open_archive(target, &extension, silent)?;
            if verbose {
                println!("    {} entries", jar.len().to_string().dimmed());
            }
            archive::assert_contains(&jar, contains)?;
            archive::assert_does_not_contain(&jar, excludes)
        }

        SmokeStep::WorkerArgs { target, expect } => {
            if let Some(target) = target {
                case.build_and_record(
                    target,
                    BuildOptions {
                        ignore_error: false,
                        silent,
                    },
                )?;
            }
            let args = case.worker_args()?;
            for (key, expected) in expect {
                match args.get(key) {
                    Some(actual) if actual == expected => {}
                    Some(actual) => {
                        return Err(Error::TestAssertion(format!(
                            "worker arg '{}': expected '{}', got '{}'",
                            key, expected, actual
                        )));
                    }
                    None => {
                        return Err(Error::TestAssertion(format!(
                            "worker arg '{}' not found",
                            key
                        )));
                    }
                }
            }
            Ok(())
        }

        SmokeStep::Query {
            expression,
            implicit_deps,
            contains,
            equals,
        } => {
            let query = Query::raw(expression.clone())?;
            let results = case.query(&query, *implicit_deps)?;
            if verbose {
                for line in &results {
                    println!("    {}", line.dimmed());
                }
            }
            check_contains("query result", &results, contains)?;
            if let Some(expected) = equals {
                if &results != expected {
                    return Err(Error::TestAssertion(format!(
                        "query result {:?} != expected {:?}",
                        results, expected
                    )));
                }
            }
            Ok(())
        }

        SmokeStep::Libraries {
            label,
            implicit_deps,
            contains,
            excludes,
        } => {
            let results = case.library_query(label, *implicit_deps)?;
            check_contains("libraries", &results, contains)?;
            if let Some(present) = excludes.iter().find(|e| results.contains(e)) {
                return Err(Error::TestAssertion(format!(
                    "libraries should not include '{}'",
                    present
                )));
            }
            Ok(())
        }
    }
}

fn check_contains(what: &str, results: &[String], expected: &[String]) -> Result<()> {
    match expected.iter().find(|e| !results.contains(e)) {
        Some(missing) => Err(Error::TestAssertion(format!(
            "{} does not include '{}'",
            what, missing
        ))),
        None => Ok(()),
    }
}
