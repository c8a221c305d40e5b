//! Configuration and output-tree paths

use std::path::{Path, PathBuf};

/// Name used for the user configuration directory
const APP_NAME: &str = "smoke-harness";

/// Per-workspace configuration file, looked up at the workspace root
pub const WORKSPACE_CONFIG_FILE: &str = "smoke.toml";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/smoke-harness/`
/// - macOS: `~/Library/Application Support/smoke-harness/`
/// - Windows: `%APPDATA%\smoke-harness\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Location of a build output: `<workspace>/<output_root>/<package>/<file>`
pub fn output_path(workspace: &Path, output_root: &Path, package: &str, file: &str) -> PathBuf {
    let mut path = workspace.join(output_root);
    if !package.is_empty() {
        path.push(package);
    }
    path.join(file)
}

/// Package of a source file: its parent directory relative to the workspace
///
/// Paths already relative (as produced by `file!()`) are taken as-is.
pub fn package_of(workspace: &Path, source_file: &Path) -> String {
    let relative = source_file.strip_prefix(workspace).unwrap_or(source_file);
    let dir = relative.parent().unwrap_or(Path::new(""));
    dir.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
