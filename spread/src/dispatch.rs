// Copyright (c) The spread Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::{ExpectedError, Result, SpreadExitCode},
    output::{OutputContext, OutputOpts, clap_styles},
};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use spread_filtering::{Filter, FilterMode};
use spread_runner::{
    config::{Project, ProjectLoader},
    job::JobList,
};
use std::io::Write;
use tracing::{debug, info};

/// Select and list spread jobs.
///
/// Jobs are named `backend:system:suite/path:variant`. Selector patterns match whole
/// `:`-separated fields; `...` matches anything, and a leading or trailing `:` or `/` relaxes
/// the field boundary on that side.
#[derive(Debug, Parser)]
#[command(name = "spread", version, styles = clap_styles::style())]
pub struct SpreadApp {
    #[command(flatten)]
    output: OutputOpts,

    #[command(flatten)]
    project_opts: ProjectOpts,

    #[command(subcommand)]
    command: Command,
}

impl SpreadApp {
    /// Initializes logging and returns the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, writing command output to `writer`.
    pub fn exec(self, writer: &mut dyn Write) -> Result<i32> {
        let verbose = self.output.verbose;
        let project = self.project_opts.load()?;
        match self.command {
            Command::List(opts) => opts.exec(&project, writer),
            Command::ShowConfig => show_config(&project, verbose, writer),
        }
    }
}

#[derive(Debug, Args)]
struct ProjectOpts {
    /// Project root [default: current directory]
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<Utf8PathBuf>,

    /// Project file, absolute or relative to the project root. Overrides SPREAD_PROJECT_FILE
    /// [default: spread.yaml or .spread.yaml]
    #[arg(long, global = true, value_name = "PATH")]
    project_file: Option<Utf8PathBuf>,
}

impl ProjectOpts {
    fn load(&self) -> Result<Project> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => current_dir()?,
        };
        let mut loader = ProjectLoader::from_env(root)?;
        if let Some(project_file) = &self.project_file {
            loader = loader.with_project_file(project_file);
        }
        Ok(loader.load()?)
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let dir = std::env::current_dir().map_err(|err| ExpectedError::CurrentDirFailed { err })?;
    Utf8PathBuf::try_from(dir).map_err(|err| ExpectedError::CurrentDirInvalidUtf8 { err })
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the jobs selected by the given patterns
    List(ListOpts),

    /// Show backends and systems with inherited settings applied
    ShowConfig,
}

#[derive(Debug, Args)]
struct ListOpts {
    /// Select jobs matching any pattern, rather than all of them
    #[arg(long)]
    any: bool,

    /// Selector patterns, for example `google:`, `tests/main/` or `ubuntu-...`
    #[arg(value_name = "PATTERN")]
    patterns: Vec<String>,
}

impl ListOpts {
    fn exec(self, project: &Project, writer: &mut dyn Write) -> Result<i32> {
        let mode = if self.any {
            FilterMode::Any
        } else {
            FilterMode::All
        };
        let filter = Filter::with_mode(self.patterns, mode)?;
        debug!(
            "filtering with patterns [{}] ({mode:?})",
            filter.patterns().iter().join(", ")
        );

        let jobs = JobList::new(project);
        let mut selected = 0;
        for job in jobs.filtered(&filter) {
            writeln!(writer, "{job}").map_err(ExpectedError::write_error)?;
            selected += 1;
        }
        writer.flush().map_err(ExpectedError::write_error)?;

        if selected == 0 {
            info!("no jobs selected ({} candidates)", jobs.len());
            return Ok(SpreadExitCode::NO_JOBS_SELECTED);
        }
        Ok(SpreadExitCode::OK)
    }
}

fn show_config(project: &Project, verbose: bool, writer: &mut dyn Write) -> Result<i32> {
    write_config(project, verbose, writer).map_err(ExpectedError::write_error)?;
    Ok(SpreadExitCode::OK)
}

fn write_config(project: &Project, verbose: bool, writer: &mut dyn Write) -> std::io::Result<()> {
    writeln!(writer, "project: {}", project.name())?;
    if verbose {
        writeln!(writer, "file: {}", project.project_file())?;
        writeln!(writer, "remote path: {}", project.remote_path())?;
    }

    for backend in project.backends() {
        writeln!(
            writer,
            "backend {} (type: {}, plan: {}, priority: {})",
            backend.name(),
            backend.backend_type(),
            backend.plan(),
            backend.priority(),
        )?;
        if verbose && !backend.location().is_empty() {
            writeln!(writer, "  location: {}", backend.location())?;
        }
        for system in backend.systems() {
            let source = if system.is_plan_explicit() {
                ""
            } else {
                " (inherited)"
            };
            writeln!(
                writer,
                "  system {}: image {}, plan {}{source}, priority {}",
                system.name(),
                system.image(),
                system.plan(),
                system.priority(),
            )?;
        }
    }

    for suite in project.suites() {
        writeln!(writer, "suite {}: {}", suite.path(), suite.summary())?;
    }

    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::{Utf8TempDir, tempdir};
    use camino_tempfile_ext::prelude::*;
    use clap::CommandFactory;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use spread_runner::errors::ProjectLoadError;

    const PROJECT: &str = indoc! {"
        project: mock-prj
        path: /some/path
        backends:
          google:
            key: some-key
            plan: global-plan
            systems:
              - system-1:
              - system-2:
                  plan: plan-for-2
        suites:
          tests/main/:
            summary: main tests
          tests/other/:
            summary: other tests
    "};

    fn project_dir() -> Utf8TempDir {
        let temp_dir = tempdir().unwrap();
        temp_dir.child("spread.yaml").write_str(PROJECT).unwrap();
        temp_dir
    }

    fn run(root: &Utf8TempDir, args: &[&str]) -> (Result<i32>, String) {
        let root = root.path().as_str();
        let prefix = ["spread", "--root", root];
        let args = prefix.iter().chain(args);
        let app = SpreadApp::try_parse_from(args).expect("arguments parse");
        let mut output = Vec::new();
        let result = app.exec(&mut output);
        (result, String::from_utf8(output).expect("output is UTF-8"))
    }

    #[test]
    fn verify_app() {
        SpreadApp::command().debug_assert();
    }

    #[test]
    fn env_fallbacks() {
        let command = SpreadApp::command();
        let env_of = |id: &str| {
            command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .map(|env| env.to_string_lossy().into_owned())
        };
        assert_eq!(env_of("color").as_deref(), Some("SPREAD_COLOR"));
        assert_eq!(env_of("verbose").as_deref(), Some("SPREAD_VERBOSE"));
        // SPREAD_PROJECT_FILE is read by the loader, so that `--project-file` wins over it.
        assert_eq!(env_of("project_file"), None);
    }

    #[test]
    fn list_all() {
        let root = project_dir();
        let (result, output) = run(&root, &["list"]);
        assert_eq!(result.unwrap(), SpreadExitCode::OK);
        assert_eq!(
            output,
            indoc! {"
                google:system-1:tests/main/:
                google:system-1:tests/other/:
                google:system-2:tests/main/:
                google:system-2:tests/other/:
            "}
        );
    }

    #[test]
    fn list_filtered() {
        let root = project_dir();
        let (result, output) = run(&root, &["list", "system-2", "tests/main/"]);
        assert_eq!(result.unwrap(), SpreadExitCode::OK);
        assert_eq!(output, "google:system-2:tests/main/:\n");

        let (result, output) = run(&root, &["list", "--any", "system-2", "tests/main/"]);
        assert_eq!(result.unwrap(), SpreadExitCode::OK);
        assert_eq!(
            output,
            indoc! {"
                google:system-1:tests/main/:
                google:system-2:tests/main/:
                google:system-2:tests/other/:
            "}
        );
    }

    #[test]
    fn list_nothing_selected() {
        let root = project_dir();
        let (result, output) = run(&root, &["list", "qemu"]);
        assert_eq!(result.unwrap(), SpreadExitCode::NO_JOBS_SELECTED);
        assert_eq!(output, "");
    }

    #[test]
    fn show_config_output() {
        let root = project_dir();
        let (result, output) = run(&root, &["show-config"]);
        assert_eq!(result.unwrap(), SpreadExitCode::OK);
        assert_eq!(
            output,
            indoc! {"
                project: mock-prj
                backend google (type: google, plan: global-plan, priority: 0)
                  system system-1: image system-1, plan global-plan (inherited), priority 0
                  system system-2: image system-2, plan plan-for-2, priority 0
                suite tests/main/: main tests
                suite tests/other/: other tests
            "}
        );
    }

    #[test]
    fn missing_project_is_setup_error() {
        let root = tempdir().unwrap();
        let (result, _) = run(&root, &["list"]);
        let error = result.unwrap_err();
        assert!(
            matches!(
                &error,
                ExpectedError::ProjectLoadError {
                    err: ProjectLoadError::NotFound { .. }
                }
            ),
            "unexpected error: {error:?}"
        );
        assert_eq!(error.process_exit_code(), SpreadExitCode::SETUP_ERROR);
    }

    #[test]
    fn project_file_option() {
        let root = tempdir().unwrap();
        root.child("ci/custom.yaml").write_str(PROJECT).unwrap();
        let (result, output) = run(
            &root,
            &["--project-file", "ci/./custom.yaml", "list", ":tests/other/..."],
        );
        assert_eq!(result.unwrap(), SpreadExitCode::OK);
        assert_eq!(
            output,
            indoc! {"
                google:system-1:tests/other/:
                google:system-2:tests/other/:
            "}
        );
    }
}
