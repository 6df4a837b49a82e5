// Copyright (c) The spread Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Jobs: one backend, system, suite and variant combination.
//!
//! A job is identified by a name of the form `backend:system:suite/path:variant`. Expanding
//! suites into their individual tasks and variants happens outside this crate; [`JobList`] lists
//! the suite-level candidates that a project describes.

use crate::config::Project;
use spread_filtering::{Filter, JobQuery};
use std::fmt;

/// A single (backend, system, suite, variant) combination.
///
/// Jobs are immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Job {
    name: String,
    // Byte offsets of the three separators in `name`.
    separators: [usize; 3],
}

impl Job {
    /// Creates a new job. `variant` may be empty.
    pub fn new(backend: &str, system: &str, suite: &str, variant: &str) -> Self {
        let first = backend.len();
        let second = first + 1 + system.len();
        let third = second + 1 + suite.len();
        let name = format!("{backend}:{system}:{suite}:{variant}");
        Self {
            name,
            separators: [first, second, third],
        }
    }

    /// Returns the full name of the job.
    ///
    /// The name always has four `:`-separated fields, even if the variant is empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the backend name.
    pub fn backend(&self) -> &str {
        &self.name[..self.separators[0]]
    }

    /// Returns the system name.
    pub fn system(&self) -> &str {
        &self.name[self.separators[0] + 1..self.separators[1]]
    }

    /// Returns the suite or task path.
    pub fn suite(&self) -> &str {
        &self.name[self.separators[1] + 1..self.separators[2]]
    }

    /// Returns the variant, which may be empty.
    pub fn variant(&self) -> &str {
        &self.name[self.separators[2] + 1..]
    }

    /// Returns the query used to match this job against a [`Filter`].
    pub fn to_query(&self) -> JobQuery<'_> {
        JobQuery { name: &self.name }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The suite-level jobs described by a project.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JobList {
    jobs: Vec<Job>,
}

impl JobList {
    /// Lists every backend, system and suite combination in `project`, in the order they appear
    /// in the project file. Variants are left empty.
    pub fn new(project: &Project) -> Self {
        let jobs = project
            .backends()
            .flat_map(|backend| {
                backend.systems().flat_map(move |system| {
                    project
                        .suites()
                        .map(move |suite| Job::new(backend.name(), system.name(), suite.path(), ""))
                })
            })
            .collect();
        Self { jobs }
    }

    /// Returns the number of jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns true if there are no jobs.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Iterates over all jobs.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Job> {
        self.jobs.iter()
    }

    /// Iterates over the jobs that pass `filter`.
    pub fn filtered<'a>(&'a self, filter: &'a Filter) -> impl Iterator<Item = &'a Job> + 'a {
        self.jobs.iter().filter(|job| filter.pass(&job.to_query()))
    }
}

impl Project {
    /// Returns the suite-level jobs this project describes.
    pub fn jobs(&self) -> JobList {
        JobList::new(self)
    }

    /// Returns the suite-level jobs that pass `filter`, in document order.
    pub fn filtered_jobs(&self, filter: &Filter) -> Vec<Job> {
        self.jobs().filtered(filter).cloned().collect()
    }
}

impl<'a> IntoIterator for &'a JobList {
    type Item = &'a Job;
    type IntoIter = std::slice::Iter<'a, Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.iter()
    }
}
