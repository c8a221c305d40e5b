//! Child process execution
//!
//! Runs external commands to completion and classifies the exit status
//! against what the smoke test expected. Everything here blocks; there is no
//! timeout, so a command that never exits stalls the calling test.

use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use crate::common::error::join_argv;
use crate::common::{output_lines, Config, Error, Result};

/// What the caller expects from a command's exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// Zero exit status; a non-zero status is tolerated when `ignore_error`
    Success { ignore_error: bool },
    /// Non-zero exit status
    Failure,
}

impl Expect {
    /// Expect success and fail on any error
    pub const SUCCESS: Expect = Expect::Success {
        ignore_error: false,
    };

    /// Check an exit status against this expectation
    ///
    /// `code` is `None` when the process was terminated by a signal, which
    /// counts as a non-zero status.
    pub fn check<S: AsRef<str>>(self, argv: &[S], code: Option<i32>) -> Result<()> {
        let succeeded = code == Some(0);
        match self {
            Expect::Success { ignore_error } => {
                if succeeded {
                    Ok(())
                } else if ignore_error {
                    tracing::warn!(
                        command = %join_argv(argv),
                        code = ?code,
                        "Ignoring command failure"
                    );
                    Ok(())
                } else {
                    Err(Error::command_failed(argv))
                }
            }
            Expect::Failure => {
                if succeeded {
                    Err(Error::command_succeeded(argv))
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Runs commands from a fixed working directory
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    workdir: Option<PathBuf>,
}

impl CommandRunner {
    /// Runner that inherits the current working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner whose commands start in `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(dir.into()),
        }
    }

    fn command<S: AsRef<str>>(&self, argv: &[S]) -> Result<Command> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| Error::Config("Cannot run an empty command".to_string()))?;

        let mut cmd = Command::new(AsRef::<str>::as_ref(program));
        cmd.args(args.iter().map(AsRef::<str>::as_ref))
            .stdin(Stdio::null());
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        Ok(cmd)
    }

    /// Run `argv` to completion and check its exit status
    ///
    /// With `capture_output` the child's stdout/stderr stay attached to the
    /// caller's console; otherwise they are discarded.
    pub fn run<S: AsRef<str>>(&self, argv: &[S], expect: Expect, capture_output: bool) -> Result<()> {
        let mut cmd = self.command(argv)?;
        if capture_output {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        } else {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }

        tracing::debug!(command = %join_argv(argv), ?expect, "Running command");

        let status = cmd.status().map_err(|e| spawn_error(argv, e))?;
        expect.check(argv, status.code())
    }

    /// Run `argv` to completion, collecting stdout and stderr
    ///
    /// The exit status is returned to the caller unchecked.
    pub fn output<S: AsRef<str>>(&self, argv: &[S]) -> Result<Output> {
        let mut cmd = self.command(argv)?;
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        tracing::debug!(command = %join_argv(argv), "Running command (captured)");

        let output = cmd.output().map_err(|e| spawn_error(argv, e))?;
        if !output.stderr.is_empty() {
            tracing::debug!(
                stderr = %String::from_utf8_lossy(&output.stderr).trim_end(),
                "Command stderr"
            );
        }
        Ok(output)
    }
}

fn spawn_error<S: AsRef<str>>(argv: &[S], source: std::io::Error) -> Error {
    Error::Spawn {
        program: argv.first().map(|p| p.as_ref().to_string()).unwrap_or_default(),
        source,
    }
}

/// The external build tool and the options every invocation carries
#[derive(Debug, Clone)]
pub struct BuildTool {
    program: String,
    startup_args: Vec<String>,
    runner: CommandRunner,
}

impl BuildTool {
    /// Build tool at `program`, run from the current directory
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            startup_args: Vec::new(),
            runner: CommandRunner::new(),
        }
    }

    /// Build tool described by a configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            program: config.tool_program().to_string_lossy().into_owned(),
            startup_args: config.tool.startup_args.clone(),
            runner: CommandRunner::new(),
        }
    }

    /// Same tool, running every command from `workspace`
    pub fn in_workspace(mut self, workspace: impl Into<PathBuf>) -> Self {
        self.runner = CommandRunner::in_dir(workspace);
        self
    }

    /// Full argv for `<tool> [startup args] <subcommand> <args>`
    pub fn argv<S: AsRef<str>>(&self, subcommand: &str, args: &[S]) -> Vec<String> {
        let mut argv = Vec::with_capacity(2 + self.startup_args.len() + args.len());
        argv.push(self.program.clone());
        argv.extend(self.startup_args.iter().cloned());
        argv.push(subcommand.to_string());
        argv.extend(args.iter().map(|a| a.as_ref().to_string()));
        argv
    }

    /// Run a subcommand and check its status
    pub fn run<S: AsRef<str>>(
        &self,
        subcommand: &str,
        args: &[S],
        expect: Expect,
        capture_output: bool,
    ) -> Result<()> {
        self.runner
            .run(&self.argv(subcommand, args), expect, capture_output)
    }

    /// Run a subcommand and collect its output
    pub fn output<S: AsRef<str>>(&self, subcommand: &str, args: &[S]) -> Result<Output> {
        self.runner.output(&self.argv(subcommand, args))
    }

    /// Ask the tool for the workspace root (`<tool> info workspace`)
    pub fn workspace_root(&self) -> Result<PathBuf> {
        let argv = self.argv("info", &["workspace"]);
        let output = self.runner.output(&argv)?;
        if !output.status.success() {
            return Err(Error::WorkspaceInfo(format!(
                "{} exited with {:?}",
                join_argv(&argv),
                output.status.code()
            )));
        }

        let root = output_lines(&output.stdout)
            .into_iter()
            .map(|line| line.trim().to_string())
            .find(|line| !line.is_empty())
            .ok_or_else(|| {
                Error::WorkspaceInfo(format!("{} printed nothing", join_argv(&argv)))
            })?;

        tracing::debug!(workspace = %root, "Discovered workspace root");
        Ok(PathBuf::from(root))
    }
}
