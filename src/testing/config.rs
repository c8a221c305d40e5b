//! Smoke scenario configuration types
//!
//! Defines the data structures for deserializing YAML smoke scenarios.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::common::config::Defaults;

/// A complete smoke scenario loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct SmokeScenario {
    /// Name of the scenario
    pub name: String,
    /// Optional description of what the scenario verifies
    pub description: Option<String>,
    /// Package bare target names resolve into (default: the scenario file's
    /// directory relative to the workspace)
    pub package: Option<String>,
    /// Workspace root (default: asked from the build tool)
    pub workspace: Option<PathBuf>,
    /// The sequence of steps to execute
    pub steps: Vec<SmokeStep>,
}

/// A single step in the scenario
#[derive(Deserialize, Debug)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SmokeStep {
    /// Build a target
    Build {
        target: String,
        /// Assert that the build fails instead
        #[serde(default)]
        expect_failure: bool,
        #[serde(default)]
        ignore_error: bool,
    },
    /// Build a target, then launch it
    Run {
        target: String,
        /// Launch subcommand (default: configured run command)
        command: Option<String>,
        #[serde(default)]
        ignore_error: bool,
    },
    /// Build an archive output and check its entries
    Archive {
        target: String,
        /// Archive extension (default: configured archive extension)
        extension: Option<String>,
        /// Entries that must be present
        #[serde(default)]
        contains: Vec<String>,
        /// Entries that must be absent
        #[serde(default)]
        excludes: Vec<String>,
    },
    /// Check the worker arguments of a target
    WorkerArgs {
        /// Target to build first (default: the last built target)
        target: Option<String>,
        /// Expected flag values
        expect: BTreeMap<String, String>,
    },
    /// Evaluate a query expression
    Query {
        expression: String,
        #[serde(default)]
        implicit_deps: bool,
        /// Lines that must appear in the result
        #[serde(default)]
        contains: Vec<String>,
        /// Exact expected result, in order
        equals: Option<Vec<String>>,
    },
    /// Query the library-like dependencies of a label
    Libraries {
        label: String,
        #[serde(default)]
        implicit_deps: bool,
        /// Labels that must appear in the result
        #[serde(default)]
        contains: Vec<String>,
        /// Labels that must not appear in the result
        #[serde(default)]
        excludes: Vec<String>,
    },
}

impl SmokeStep {
    /// Short description used in progress output
    ///
    /// Steps that leave out the run command or archive extension are
    /// described with the configured `defaults`.
    pub fn describe(&self, defaults: &Defaults) -> String {
        match self {
            SmokeStep::Build {
                target,
                expect_failure,
                ..
            } => {
                if *expect_failure {
                    format!("build {} (expect failure)", target)
                } else {
                    format!("build {}", target)
                }
            }
            SmokeStep::Run {
                target, command, ..
            } => format!(
                "{} {}",
                command.as_deref().unwrap_or(&defaults.run_command),
                target
            ),
            SmokeStep::Archive {
                target, extension, ..
            } => format!(
                "archive {}.{}",
                target,
                extension.as_deref().unwrap_or(&defaults.archive_extension)
            ),
            SmokeStep::WorkerArgs { target, .. } => match target {
                Some(target) => format!("worker args of {}", target),
                None => "worker args of last build".to_string(),
            },
            SmokeStep::Query { expression, .. } => format!("query {}", expression),
            SmokeStep::Libraries { label, .. } => format!("libraries of {}", label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scenario() {
        let yaml = r#"
name: kotlin jars
package: tests/smoke
steps:
  - action: build
    target: helloworld
  - action: build
    target: broken
    expect_failure: true
  - action: archive
    target: test_embed_resources
    extension: jar
    contains: [META-INF/MANIFEST.MF]
    excludes: [src/AClass.class]
  - action: worker_args
    expect:
      "--kotlin_module_name": foo
  - action: run
    target: helloworld
  - action: query
    expression: deps(//tests/smoke:helloworld)
    contains: ["//tests/smoke:helloworld"]
  - action: libraries
    label: helloworld
"#;
        let scenario: SmokeScenario = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.name, "kotlin jars");
        assert_eq!(scenario.package.as_deref(), Some("tests/smoke"));
        assert!(scenario.workspace.is_none());
        assert_eq!(scenario.steps.len(), 7);

        match &scenario.steps[1] {
            SmokeStep::Build {
                expect_failure,
                ignore_error,
                ..
            } => {
                assert!(*expect_failure);
                assert!(!*ignore_error);
            }
            other => panic!("unexpected step {:?}", other),
        }
        match &scenario.steps[3] {
            SmokeStep::WorkerArgs { target, expect } => {
                assert!(target.is_none());
                assert_eq!(expect.get("--kotlin_module_name").map(String::as_str), Some("foo"));
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let yaml = "name: x\nsteps:\n  - action: deploy\n    target: y\n";
        assert!(serde_yaml::from_str::<SmokeScenario>(yaml).is_err());
    }

    #[test]
    fn test_describe_steps() {
        let step = SmokeStep::Build {
            target: "broken".to_string(),
            expect_failure: true,
            ignore_error: false,
        };
        let defaults = Defaults::default();
        assert_eq!(step.describe(&defaults), "build broken (expect failure)");
        let step = SmokeStep::Run {
            target: "app".to_string(),
            command: Some("test".to_string()),
            ignore_error: false,
        };
        assert_eq!(step.describe(&defaults), "test app");
    }

    #[test]
    fn test_describe_uses_configured_defaults() {
        let defaults = Defaults {
            run_command: "test".to_string(),
            archive_extension: "war".to_string(),
        };
        let step = SmokeStep::Run {
            target: "app".to_string(),
            command: None,
            ignore_error: false,
        };
        assert_eq!(step.describe(&defaults), "test app");
        let step = SmokeStep::Archive {
            target: "web".to_string(),
            extension: None,
            contains: Vec::new(),
            excludes: Vec::new(),
        };
        assert_eq!(step.describe(&defaults), "archive web.war");
    }
}
