//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::paths::{config_path, WORKSPACE_CONFIG_FILE};
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Build tool settings
    #[serde(default)]
    pub tool: ToolConfig,

    /// Output tree layout
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Default settings
    #[serde(default)]
    pub defaults: Defaults,

    /// Query settings
    #[serde(default)]
    pub query: QueryConfig,
}

/// Build tool invocation settings
#[derive(Debug, Deserialize, Clone)]
pub struct ToolConfig {
    /// Build tool executable (name looked up on PATH, or a path)
    #[serde(default = "default_program")]
    pub program: String,

    /// Startup options placed before the subcommand
    #[serde(default)]
    pub startup_args: Vec<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            startup_args: Vec::new(),
        }
    }
}

fn default_program() -> String {
    "bazel".to_string()
}

/// Where the build tool leaves its outputs
#[derive(Debug, Deserialize, Clone)]
pub struct LayoutConfig {
    /// Output root relative to the workspace
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Suffix appended to a target name to find its worker-args file
    #[serde(default = "default_worker_args_suffix")]
    pub worker_args_suffix: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            output_root: default_output_root(),
            worker_args_suffix: default_worker_args_suffix(),
        }
    }
}

fn default_output_root() -> PathBuf {
    PathBuf::from("bazel-bin")
}

fn default_worker_args_suffix() -> String {
    "-worker.args".to_string()
}

/// Default settings
#[derive(Debug, Deserialize, Clone)]
pub struct Defaults {
    /// Subcommand used to launch a built target
    #[serde(default = "default_run_command")]
    pub run_command: String,

    /// Extension of the archive produced for a target
    #[serde(default = "default_archive_extension")]
    pub archive_extension: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            run_command: default_run_command(),
            archive_extension: default_archive_extension(),
        }
    }
}

fn default_run_command() -> String {
    "run".to_string()
}

fn default_archive_extension() -> String {
    "jar".to_string()
}

/// Query settings
#[derive(Debug, Deserialize, Clone)]
pub struct QueryConfig {
    /// Rule-kind pattern matched by the library query
    #[serde(default = "default_library_kind")]
    pub library_kind: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            library_kind: default_library_kind(),
        }
    }
}

fn default_library_kind() -> String {
    "java_import|.*_library".to_string()
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }

    /// Load the configuration that applies to a workspace
    ///
    /// Precedence: explicit file, then `smoke.toml` at the workspace root,
    /// then the user config file.
    pub fn load_for(explicit: Option<&Path>, workspace: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        if let Some(workspace) = workspace {
            let local = workspace.join(WORKSPACE_CONFIG_FILE);
            if local.exists() {
                return Self::load_from(&local);
            }
        }
        Self::load()
    }

    /// Resolve the build tool executable
    ///
    /// Falls back to the configured name when it is not on PATH, so the
    /// spawn error names what was attempted.
    pub fn tool_program(&self) -> PathBuf {
        let program = Path::new(&self.tool.program);
        if program.is_absolute() {
            return program.to_path_buf();
        }
        which::which(&self.tool.program).unwrap_or_else(|_| program.to_path_buf())
    }
}
