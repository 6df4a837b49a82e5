// Copyright (c) The spread Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Project, document::ProjectDeserialize};
use crate::{errors::ProjectLoadError, helpers::normalize_path};
use camino::{Utf8Path, Utf8PathBuf};
use std::{collections::BTreeSet, io::Read};
use tracing::{debug, warn};

/// Trait for handling warnings produced while loading the project file.
///
/// This allows for different warning handling strategies, such as logging warnings (the default
/// behavior) or collecting them for testing purposes.
pub trait ConfigWarnings {
    /// Handle keys in the project file that spread doesn't know about.
    fn unknown_config_keys(
        &mut self,
        project_file: &Utf8Path,
        root: &Utf8Path,
        unknown: &BTreeSet<String>,
    );
}

/// Default implementation of [`ConfigWarnings`] that logs warnings using the tracing crate.
pub struct DefaultConfigWarnings;

impl ConfigWarnings for DefaultConfigWarnings {
    fn unknown_config_keys(
        &mut self,
        project_file: &Utf8Path,
        root: &Utf8Path,
        unknown: &BTreeSet<String>,
    ) {
        let mut unknown_str = String::new();
        if unknown.len() == 1 {
            // Print this on the same line.
            unknown_str.push_str("key: ");
            unknown_str.extend(unknown.iter().map(String::as_str));
        } else {
            unknown_str.push_str("keys:\n");
            for ignored_key in unknown {
                unknown_str.push('\n');
                unknown_str.push_str("  - ");
                unknown_str.push_str(ignored_key);
            }
        }

        warn!(
            "in project file {}, ignoring unknown configuration {unknown_str}",
            project_file.strip_prefix(root).unwrap_or(project_file),
        );
    }
}

/// Finds, reads and resolves the project file.
#[derive(Clone, Debug)]
pub struct ProjectLoader {
    root: Utf8PathBuf,
    project_file: Option<Utf8PathBuf>,
}

impl ProjectLoader {
    /// The environment variable that overrides the project file path.
    pub const PROJECT_FILE_ENV: &'static str = "SPREAD_PROJECT_FILE";

    /// The file names looked up under the project root, in order.
    pub const DEFAULT_FILE_NAMES: [&'static str; 2] = ["spread.yaml", ".spread.yaml"];

    /// Creates a loader for the project rooted at `root`, looking for the default file names.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            project_file: None,
        }
    }

    /// Creates a loader for the project rooted at `root`, honoring
    /// [`PROJECT_FILE_ENV`](Self::PROJECT_FILE_ENV) if it is set and non-empty.
    pub fn from_env(root: impl Into<Utf8PathBuf>) -> Result<Self, ProjectLoadError> {
        let loader = Self::new(root);
        match std::env::var_os(Self::PROJECT_FILE_ENV) {
            Some(value) if !value.is_empty() => {
                let value = value
                    .into_string()
                    .map_err(|value| ProjectLoadError::InvalidProjectFileEnv { value })?;
                Ok(loader.with_project_file(value))
            }
            _ => Ok(loader),
        }
    }

    /// Loads `path` instead of looking for the default file names.
    ///
    /// A relative path is resolved against the project root.
    pub fn with_project_file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.project_file = Some(path.into());
        self
    }

    /// Returns the project root.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns the path of the project file that [`load`](Self::load) will read.
    ///
    /// An explicit project file is returned without checking that it exists; opening it reports
    /// any error.
    pub fn project_file_path(&self) -> Result<Utf8PathBuf, ProjectLoadError> {
        if let Some(project_file) = &self.project_file {
            let path = if project_file.is_absolute() {
                project_file.clone()
            } else {
                normalize_path(&self.root.join(project_file))
            };
            debug!("using project file {path} (from {})", Self::PROJECT_FILE_ENV);
            return Ok(path);
        }

        for file_name in Self::DEFAULT_FILE_NAMES {
            let candidate = self.root.join(file_name);
            if candidate.is_file() {
                debug!("found project file {candidate}");
                return Ok(candidate);
            }
        }

        Err(ProjectLoadError::NotFound {
            root: self.root.clone(),
        })
    }

    /// Loads the project, logging warnings with [`DefaultConfigWarnings`].
    pub fn load(&self) -> Result<Project, ProjectLoadError> {
        self.load_with_warnings(&mut DefaultConfigWarnings)
    }

    /// Loads the project, reporting warnings to `warnings`.
    pub fn load_with_warnings(
        &self,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Project, ProjectLoadError> {
        let project_file = self.project_file_path()?;
        let contents = read_project_file(&project_file)?;

        let (document, unknown) = deserialize_project(&contents).map_err(|error| {
            ProjectLoadError::Decode {
                path: project_file.clone(),
                error: Box::new(error),
            }
        })?;
        if !unknown.is_empty() {
            warnings.unknown_config_keys(&project_file, &self.root, &unknown);
        }

        let mut project = Project::from_deserialized(self.root.clone(), project_file, document);
        project.resolve();

        debug!(
            "loaded project `{}` with {} backends and {} suites",
            project.name(),
            project.backends().len(),
            project.suites().len(),
        );
        Ok(project)
    }
}

fn read_project_file(path: &Utf8Path) -> Result<String, ProjectLoadError> {
    let mut file = std::fs::File::open(path).map_err(|error| ProjectLoadError::Open {
        path: path.to_owned(),
        error,
    })?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|error| ProjectLoadError::Read {
            path: path.to_owned(),
            error,
        })?;
    Ok(contents)
}

/// This returns a tuple of (document, ignored paths).
fn deserialize_project(
    contents: &str,
) -> Result<(ProjectDeserialize, BTreeSet<String>), serde_path_to_error::Error<serde_yaml::Error>>
{
    let mut ignored = BTreeSet::new();
    let mut cb = |path: serde_ignored::Path| {
        ignored.insert(path.to_string());
    };
    let yaml_de = serde_yaml::Deserializer::from_str(contents);
    let ignored_de = serde_ignored::Deserializer::new(yaml_de, &mut cb);
    let document: ProjectDeserialize = serde_path_to_error::deserialize(ignored_de)?;

    Ok((document, ignored))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_helpers::{CollectWarnings, MOCK_PROJECT};
    use camino_tempfile::tempdir;
    use camino_tempfile_ext::prelude::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(".spread.yaml", None ; "hidden default name")]
    #[test_case("spread.yaml", None ; "default name")]
    #[test_case("custom.yaml", Some("custom.yaml") ; "relative override")]
    #[test_case("subdir/custom.yaml", Some("subdir/custom.yaml") ; "override in subdir")]
    #[test_case(
        "subdir/custom.yaml",
        Some("subdir/.././subdir/custom.yaml")
        ; "override with parent and current components"
    )]
    fn load_ok(file_name: &str, project_file: Option<&str>) {
        let temp_dir = tempdir().unwrap();
        temp_dir.child(file_name).write_str(MOCK_PROJECT).unwrap();

        let mut loader = ProjectLoader::new(temp_dir.path());
        if let Some(project_file) = project_file {
            loader = loader.with_project_file(project_file);
        }

        let project = loader.load().expect("project loads");
        assert_eq!(project.project_file(), temp_dir.path().join(file_name));
        assert_eq!(project.root(), temp_dir.path());

        let backend = project.backend("google").unwrap();
        assert_eq!(backend.name(), "google");
        assert_eq!(backend.system("system-1").unwrap().plan(), "global-plan");
        assert_eq!(backend.system("system-2").unwrap().plan(), "plan-for-2");
        assert_eq!(backend.system("system-3").unwrap().plan(), "global-plan");
    }

    #[test]
    fn spread_yaml_preferred_over_hidden() {
        let temp_dir = tempdir().unwrap();
        temp_dir.child("spread.yaml").write_str("project: visible").unwrap();
        temp_dir.child(".spread.yaml").write_str("project: hidden").unwrap();

        let project = ProjectLoader::new(temp_dir.path()).load().unwrap();
        assert_eq!(project.name(), "visible");
    }

    #[test]
    fn not_found() {
        let temp_dir = tempdir().unwrap();
        temp_dir.child("other.yaml").write_str(MOCK_PROJECT).unwrap();

        let error = ProjectLoader::new(temp_dir.path()).load().unwrap_err();
        assert!(
            matches!(&error, ProjectLoadError::NotFound { root } if root == temp_dir.path()),
            "unexpected error: {error:?}"
        );
        assert_eq!(
            error.to_string(),
            format!(
                "cannot load project from {}: cannot find spread.yaml or .spread.yaml",
                temp_dir.path()
            )
        );
    }

    #[test]
    fn absolute_override_not_found() {
        let temp_dir = tempdir().unwrap();
        temp_dir.child("spread.yaml").write_str(MOCK_PROJECT).unwrap();
        let missing = temp_dir.path().join("missing").join("custom.yaml");

        let error = ProjectLoader::new(temp_dir.path())
            .with_project_file(&missing)
            .load()
            .unwrap_err();
        match &error {
            ProjectLoadError::Open { path, error } => {
                assert_eq!(path, &missing);
                assert_eq!(error.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(
            error
                .to_string()
                .starts_with(&format!("cannot load project: open {missing}: ")),
            "unexpected message: {error}"
        );
    }

    #[test]
    fn relative_override_not_found() {
        let temp_dir = tempdir().unwrap();
        temp_dir.child("spread.yaml").write_str(MOCK_PROJECT).unwrap();

        let error = ProjectLoader::new(temp_dir.path())
            .with_project_file("custom.yaml")
            .load()
            .unwrap_err();
        let expected_path = temp_dir.path().join("custom.yaml");
        assert!(
            matches!(&error, ProjectLoadError::Open { path, .. } if *path == expected_path),
            "unexpected error: {error:?}"
        );
        assert!(
            error
                .to_string()
                .starts_with(&format!("cannot load project: open {expected_path}: ")),
            "unexpected message: {error}"
        );
    }

    #[test]
    fn relative_override_is_normalized() {
        let temp_dir = tempdir().unwrap();
        let loader =
            ProjectLoader::new(temp_dir.path()).with_project_file("subdir/.././subdir/custom.yaml");
        assert_eq!(
            loader.project_file_path().unwrap(),
            temp_dir.path().join("subdir/custom.yaml")
        );
    }

    #[test]
    fn decode_error_has_path() {
        let temp_dir = tempdir().unwrap();
        temp_dir
            .child("spread.yaml")
            .write_str(indoc! {"
                backends:
                  google:
                    priority: high
            "})
            .unwrap();

        let error = ProjectLoader::new(temp_dir.path()).load().unwrap_err();
        match &error {
            ProjectLoadError::Decode { path, error } => {
                assert_eq!(path, &temp_dir.path().join("spread.yaml"));
                assert_eq!(error.path().to_string(), "backends.google.priority");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_keys_are_reported() {
        let temp_dir = tempdir().unwrap();
        temp_dir
            .child("spread.yaml")
            .write_str(indoc! {"
                project: mock-prj
                environment:
                  FOO: bar
                backends:
                  google:
                    halt-timeout: 2h
                    systems:
                      - system-1:
                          username: root
            "})
            .unwrap();

        let mut warnings = CollectWarnings::default();
        let project = ProjectLoader::new(temp_dir.path())
            .load_with_warnings(&mut warnings)
            .unwrap();
        assert_eq!(project.name(), "mock-prj");

        let (project_file, unknown) = warnings.unknown.pop().expect("one warning");
        assert_eq!(project_file, temp_dir.path().join("spread.yaml"));
        assert_eq!(unknown.len(), 3, "unknown keys: {unknown:?}");
        assert!(unknown.contains("environment"), "unknown keys: {unknown:?}");
        assert!(
            unknown
                .iter()
                .any(|key| key.starts_with("backends.google") && key.ends_with("halt-timeout")),
            "unknown keys: {unknown:?}"
        );
        assert!(
            unknown
                .iter()
                .any(|key| key.contains("system-1") && key.ends_with("username")),
            "unknown keys: {unknown:?}"
        );
        assert!(warnings.unknown.is_empty());
    }
}
