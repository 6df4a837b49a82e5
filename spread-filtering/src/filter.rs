// Copyright (c) The spread Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{CompiledPattern, errors::FilterBuildError};

/// How the results of several patterns are combined.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum FilterMode {
    /// A job passes if it matches every pattern.
    ///
    /// This is the default.
    #[default]
    All,

    /// A job passes if it matches at least one pattern.
    Any,
}

/// A query passed into [`Filter::pass`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct JobQuery<'a> {
    /// The full name of the job, in the form `backend:system:suite/path:variant`.
    pub name: &'a str,
}

/// A set of compiled selector patterns.
///
/// A `Filter` is built once from the full list of selectors and is read-only afterwards, so it can
/// be shared freely across threads.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Filter {
    patterns: Vec<CompiledPattern>,
    mode: FilterMode,
}

impl Filter {
    /// Compiles `patterns` into a filter that requires every pattern to match.
    ///
    /// An empty list of patterns passes every job.
    pub fn new<I, S>(patterns: I) -> Result<Self, FilterBuildError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_mode(patterns, FilterMode::default())
    }

    /// Compiles `patterns` into a filter that combines them according to `mode`.
    ///
    /// An empty list of patterns passes every job, regardless of `mode`.
    pub fn with_mode<I, S>(patterns: I, mode: FilterMode) -> Result<Self, FilterBuildError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = patterns
            .into_iter()
            .map(CompiledPattern::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns, mode })
    }

    /// Returns the compiled patterns, in the order they were supplied.
    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Returns the way patterns are combined.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Returns true if this filter has no patterns, and therefore passes every job.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns true if the given job is selected by this filter.
    pub fn pass(&self, query: &JobQuery<'_>) -> bool {
        self.matches_name(query.name)
    }

    /// Returns true if a job with the given name is selected by this filter.
    pub fn matches_name(&self, name: &str) -> bool {
        if self.patterns.is_empty() {
            return true;
        }
        match self.mode {
            FilterMode::All => self.patterns.iter().all(|p| p.is_match(name)),
            FilterMode::Any => self.patterns.iter().any(|p| p.is_match(name)),
        }
    }
}
