// Copyright (c) The spread Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    Inheritable, OptionalInt, ProjectLoader,
    document::{BackendDeserialize, ProjectDeserialize, SuiteDeserialize, SystemDeserialize},
};
use crate::errors::ProjectLoadError;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;

/// A spread project, as described by `spread.yaml`.
///
/// A project is loaded once per run and is read-only afterwards, so it can be shared freely
/// across threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Project {
    root: Utf8PathBuf,
    project_file: Utf8PathBuf,
    name: String,
    remote_path: String,
    backends: IndexMap<String, Backend>,
    suites: IndexMap<String, Suite>,
}

impl Project {
    /// Loads the project rooted at `root`.
    ///
    /// If the `SPREAD_PROJECT_FILE` environment variable is set, the file it names is loaded
    /// (relative paths are resolved against `root`). Otherwise `spread.yaml` and then
    /// `.spread.yaml` are looked up directly under `root`.
    ///
    /// Use [`ProjectLoader`] for more control over discovery.
    pub fn load(root: impl AsRef<Utf8Path>) -> Result<Self, ProjectLoadError> {
        ProjectLoader::from_env(root.as_ref())?.load()
    }

    /// Builds a project from the decoded document. Names come from map keys; no inheritance is
    /// applied yet.
    pub(super) fn from_deserialized(
        root: Utf8PathBuf,
        project_file: Utf8PathBuf,
        de: ProjectDeserialize,
    ) -> Self {
        let backends = de
            .backends
            .into_iter()
            .map(|(name, backend)| {
                let backend = Backend::from_deserialized(&name, backend.unwrap_or_default());
                (name, backend)
            })
            .collect();
        let suites = de
            .suites
            .into_iter()
            .map(|(path, suite)| {
                let suite = Suite::from_deserialized(&path, suite.unwrap_or_default());
                (path, suite)
            })
            .collect();

        Self {
            root,
            project_file,
            name: de.name,
            remote_path: de.path,
            backends,
            suites,
        }
    }

    /// Fills in settings that systems inherit from their backend.
    ///
    /// Settings given explicitly in the project file are never replaced, even if they happen to
    /// equal the backend's. Running this more than once has no further effect.
    pub(crate) fn resolve(&mut self) {
        for backend in self.backends.values_mut() {
            for system in backend.systems.values_mut() {
                system.plan.inherit_from(&backend.plan);
                system.priority.inherit(backend.priority);
            }
        }
    }

    /// Returns the directory the project was loaded from.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns the path of the project file that was loaded.
    pub fn project_file(&self) -> &Utf8Path {
        &self.project_file
    }

    /// Returns the project name (the `project` key).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the path the project is copied to on remote systems (the `path` key).
    pub fn remote_path(&self) -> &str {
        &self.remote_path
    }

    /// Returns the backend with the given name.
    pub fn backend(&self, name: &str) -> Option<&Backend> {
        self.backends.get(name)
    }

    /// Iterates over backends, in the order they appear in the project file.
    pub fn backends(&self) -> impl ExactSizeIterator<Item = &Backend> {
        self.backends.values()
    }

    /// Returns the suite with the given path.
    pub fn suite(&self, path: &str) -> Option<&Suite> {
        self.suites.get(path)
    }

    /// Iterates over suites, in the order they appear in the project file.
    pub fn suites(&self) -> impl ExactSizeIterator<Item = &Suite> {
        self.suites.values()
    }
}

/// A named execution environment, such as a cloud provider or a container host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Backend {
    name: String,
    backend_type: String,
    key: String,
    location: String,
    plan: String,
    priority: OptionalInt,
    systems: IndexMap<String, System>,
}

impl Backend {
    fn from_deserialized(name: &str, de: BackendDeserialize) -> Self {
        let systems = de
            .systems
            .0
            .into_iter()
            .map(|(system_name, system)| {
                let system = System::from_deserialized(&system_name, system);
                (system_name, system)
            })
            .collect();

        // The backend type defaults to the backend's name, so that `google:` alone selects the
        // google provider.
        let backend_type = if de.backend_type.is_empty() {
            name.to_owned()
        } else {
            de.backend_type
        };

        Self {
            name: name.to_owned(),
            backend_type,
            key: de.key,
            location: de.location,
            plan: de.plan,
            priority: de.priority,
            systems,
        }
    }

    /// Returns the backend name. This is always the key the backend is listed under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the provider type of this backend.
    pub fn backend_type(&self) -> &str {
        &self.backend_type
    }

    /// Returns the credentials used to access the backend.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the backend location (for example a cloud project or zone).
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the default plan for systems of this backend.
    pub fn plan(&self) -> &str {
        &self.plan
    }

    /// Returns the default priority for systems of this backend.
    pub fn priority(&self) -> OptionalInt {
        self.priority
    }

    /// Returns the system with the given name.
    pub fn system(&self, name: &str) -> Option<&System> {
        self.systems.get(name)
    }

    /// Iterates over systems, in the order they appear in the project file.
    pub fn systems(&self) -> impl ExactSizeIterator<Item = &System> {
        self.systems.values()
    }
}

/// A target image under a backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct System {
    name: String,
    image: String,
    workers: OptionalInt,
    plan: Inheritable<String>,
    priority: OptionalInt,
}

impl System {
    fn from_deserialized(name: &str, de: SystemDeserialize) -> Self {
        Self {
            name: name.to_owned(),
            image: de.image,
            workers: de.workers,
            plan: de.plan.into(),
            priority: de.priority,
        }
    }

    /// Returns the system name. This is always the key the system is listed under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the image to provision, or the system name if no image was given.
    pub fn image(&self) -> &str {
        if self.image.is_empty() {
            &self.name
        } else {
            &self.image
        }
    }

    /// Returns the number of workers to allocate for this system, if given.
    pub fn workers(&self) -> OptionalInt {
        self.workers
    }

    /// Returns the plan for this system: either given explicitly, or the backend's plan.
    pub fn plan(&self) -> &str {
        self.plan.value()
    }

    /// Returns true if the plan was given explicitly for this system.
    pub fn is_plan_explicit(&self) -> bool {
        self.plan.is_explicit()
    }

    /// Returns the priority for this system: either given explicitly, or the backend's priority.
    pub fn priority(&self) -> OptionalInt {
        self.priority
    }
}

/// A suite of tasks, keyed by its slash-delimited path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suite {
    path: String,
    summary: String,
    priority: OptionalInt,
}

impl Suite {
    fn from_deserialized(path: &str, de: SuiteDeserialize) -> Self {
        Self {
            path: path.to_owned(),
            summary: de.summary,
            priority: de.priority,
        }
    }

    /// Returns the suite path, for example `tests/main/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the one-line description of the suite.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Returns the suite priority, if given.
    pub fn priority(&self) -> OptionalInt {
        self.priority
    }
}
