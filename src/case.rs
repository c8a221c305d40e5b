//! Smoke test context
//!
//! A [`SmokeCase`] belongs to one test. It knows the workspace, the package
//! the test lives in and the last target it built, so later calls can find
//! that target's outputs without naming it again.
//!
//! ```no_run
//! use smoke::{BuildOptions, SmokeCase};
//!
//! # fn main() -> smoke::Result<()> {
//! let mut case = SmokeCase::from_source_file(file!())?;
//! let jar = case.build_and_open_archive("test_embed_resources", "jar", true)?;
//! smoke::archive::assert_contains(&jar, &["META-INF/MANIFEST.MF"])?;
//! case.build_then_run("helloworld", None, BuildOptions::default())?;
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::archive;
use crate::common::paths::{output_path, package_of};
use crate::common::{Config, Error, Result};
use crate::exec::{BuildTool, Expect};
use crate::label::Label;
use crate::query::{run_query, Query};
use crate::worker_args::{self, WorkerArgs};

/// Per-call options for build helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Tolerate a non-zero exit status
    pub ignore_error: bool,
    /// Discard the tool's stdout/stderr
    pub silent: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            ignore_error: false,
            silent: true,
        }
    }
}

impl BuildOptions {
    /// Show the tool's output instead of discarding it
    pub fn verbose() -> Self {
        Self {
            silent: false,
            ..Self::default()
        }
    }
}

/// Context for one smoke test
#[derive(Debug)]
pub struct SmokeCase {
    config: Config,
    tool: BuildTool,
    workspace: PathBuf,
    package: String,
    last_built: Option<Label>,
}

impl SmokeCase {
    /// Case for a test source file, asking the build tool for the workspace
    ///
    /// Pass `file!()` from the test; the package is the file's directory.
    pub fn from_source_file(source_file: impl AsRef<Path>) -> Result<Self> {
        let tool = BuildTool::from_config(&Config::load()?);
        let workspace = tool.workspace_root()?;
        let config = Config::load_for(None, Some(workspace.as_path()))?;
        let package = package_of(&workspace, source_file.as_ref());
        Ok(Self::new(config, workspace, package))
    }

    /// Case with an explicit configuration, workspace and package
    pub fn new(config: Config, workspace: impl Into<PathBuf>, package: impl Into<String>) -> Self {
        let workspace = workspace.into();
        let tool = BuildTool::from_config(&config).in_workspace(&workspace);
        Self {
            config,
            tool,
            workspace,
            package: package.into().trim_matches('/').to_string(),
            last_built: None,
        }
    }

    /// Workspace root
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Package bare target names resolve into
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Configuration in effect
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Most recently recorded build target
    pub fn last_built(&self) -> Option<&Label> {
        self.last_built.as_ref()
    }

    /// Resolve a target name against this case's package
    pub fn target(&self, name: &str) -> Result<Label> {
        Label::resolve(&self.package, name)
    }

    /// Path of `file` in the output tree of `label`'s package
    ///
    /// Outputs of external repositories live under `external/<repo>/`.
    pub fn bin_path(&self, label: &Label, file: &str) -> PathBuf {
        let package = if label.repo().is_empty() {
            label.package().to_string()
        } else {
            format!("external/{}/{}", label.repo(), label.package())
        };
        output_path(
            &self.workspace,
            &self.config.layout.output_root,
            package.trim_end_matches('/'),
            file,
        )
    }

    /// Open `file` in the output tree of `label`'s package
    pub fn open_bin(&self, label: &Label, file: &str) -> Result<File> {
        let path = self.bin_path(label, file);
        File::open(&path).map_err(|e| Error::file_read(&path, e))
    }

    /// Evaluate a query expression
    pub fn query(&self, query: &Query, include_implicit_deps: bool) -> Result<Vec<String>> {
        run_query(&self.tool, query, include_implicit_deps)
    }

    /// Library-like dependencies of `label`
    pub fn library_query(&self, label: &str, include_implicit_deps: bool) -> Result<Vec<String>> {
        let label = self.target(label)?;
        let query = Query::deps_of_kind(&label, &self.config.query.library_kind)?;
        self.query(&query, include_implicit_deps)
    }

    fn build_label(&self, label: &Label, expect: Expect, silent: bool) -> Result<()> {
        tracing::debug!(target_label = %label, ?expect, "Building");
        self.tool
            .run("build", &[label.to_string()], expect, !silent)
    }

    /// Build `target`, expecting success
    pub fn build(&self, target: &str, opts: BuildOptions) -> Result<()> {
        let label = self.target(target)?;
        self.build_label(
            &label,
            Expect::Success {
                ignore_error: opts.ignore_error,
            },
            opts.silent,
        )
    }

    /// Build `target` and record it as the last built target
    pub fn build_and_record(&mut self, target: &str, opts: BuildOptions) -> Result<()> {
        let label = self.target(target)?;
        self.last_built = Some(label.clone());
        self.build_label(
            &label,
            Expect::Success {
                ignore_error: opts.ignore_error,
            },
            opts.silent,
        )
    }

    /// Build `target`, expecting the build to fail
    pub fn build_expecting_failure(&mut self, target: &str, silent: bool) -> Result<()> {
        let label = self.target(target)?;
        self.last_built = Some(label.clone());
        self.build_label(&label, Expect::Failure, silent)
    }

    /// Build the `<target>.<extension>` output and open it as an archive
    pub fn build_and_open_archive(
        &mut self,
        target: &str,
        extension: &str,
        silent: bool,
    ) -> Result<ZipArchive<File>> {
        let label = self.target(target)?;
        let artifact = label.with_suffix(&format!(".{}", extension));
        self.last_built = Some(label);

        self.build_label(&artifact, Expect::SUCCESS, silent)?;
        archive::open_archive(&self.bin_path(&artifact, artifact.name()))
    }

    /// Build `target`, then launch it with `command` (default: the configured
    /// run command), expecting success
    pub fn build_then_run(
        &mut self,
        target: &str,
        command: Option<&str>,
        opts: BuildOptions,
    ) -> Result<()> {
        let label = self.target(target)?;
        self.last_built = Some(label.clone());

        let expect = Expect::Success {
            ignore_error: opts.ignore_error,
        };
        self.build_label(&label, expect, opts.silent)?;

        let command = command.unwrap_or(&self.config.defaults.run_command);
        tracing::debug!(target_label = %label, command, "Launching");
        self.tool
            .run(command, &[label.to_string()], expect, !opts.silent)
    }

    /// Worker arguments written for the last built target
    pub fn worker_args(&self) -> Result<WorkerArgs> {
        let label = self.last_built.as_ref().ok_or(Error::NothingBuilt)?;
        let file = format!("{}{}", label.name(), self.config.layout.worker_args_suffix);
        worker_args::read_file(&self.bin_path(label, &file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case() -> SmokeCase {
        SmokeCase::new(Config::default(), "/ws", "tests/smoke/")
    }

    #[test]
    fn test_target_resolution() {
        let case = SmokeCase::new(Config::default(), "/ws", "a/b");
        assert_eq!(case.target("foo").unwrap().to_string(), "//a/b:foo");
        assert_eq!(case.target("//x:foo").unwrap().to_string(), "//x:foo");
    }

    #[test]
    fn test_package_is_normalized() {
        assert_eq!(case().package(), "tests/smoke");
    }

    #[test]
    fn test_bin_path_uses_label_package() {
        let case = case();
        let local = case.target("app").unwrap();
        assert_eq!(
            case.bin_path(&local, "app.jar"),
            PathBuf::from("/ws/bazel-bin/tests/smoke/app.jar")
        );
        let other = case.target("//lib/util:core").unwrap();
        assert_eq!(
            case.bin_path(&other, "core.jar"),
            PathBuf::from("/ws/bazel-bin/lib/util/core.jar")
        );
    }

    #[test]
    fn test_bin_path_of_external_label() {
        let case = case();
        let label = case.target("@repo//pkg:lib").unwrap();
        assert_eq!(
            case.bin_path(&label, "lib.jar"),
            PathBuf::from("/ws/bazel-bin/external/repo/pkg/lib.jar")
        );
        let root = case.target("@repo//:lib").unwrap();
        assert_eq!(
            case.bin_path(&root, "lib.jar"),
            PathBuf::from("/ws/bazel-bin/external/repo/lib.jar")
        );
    }

    #[test]
    fn test_worker_args_requires_a_build() {
        let err = case().worker_args().unwrap_err();
        assert!(matches!(err, Error::NothingBuilt));
    }

    #[test]
    fn test_build_options_default_is_silent() {
        let opts = BuildOptions::default();
        assert!(opts.silent);
        assert!(!opts.ignore_error);
        assert!(!BuildOptions::verbose().silent);
    }
}
