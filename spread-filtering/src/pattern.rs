// Copyright (c) The spread Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compilation of a single selector pattern.

use crate::errors::FilterBuildError;
use regex::Regex;
use std::fmt;

/// The wildcard marker: matches zero or more arbitrary characters.
pub(crate) const WILDCARD: &str = "...";

/// The separator between fields of a job name.
const FIELD_SEPARATOR: char = ':';

/// A selector pattern compiled into a matcher.
///
/// The pattern is split on the wildcard marker into literal fragments, which must occur in order
/// within the job name. Each end of the match must line up with a field boundary unless the
/// pattern itself waives that check.
#[derive(Clone, Debug)]
pub struct CompiledPattern {
    /// The pattern as supplied by the user.
    pattern: String,

    /// Literal text between wildcard markers. Fragments may be empty.
    fragments: Vec<String>,

    /// Whether the start of the match must line up with a field boundary.
    anchored_start: bool,

    /// Whether the end of the match must line up with a field boundary.
    anchored_end: bool,

    /// The matcher built from the fragments and anchors.
    regex: Regex,
}

impl CompiledPattern {
    /// Compiles a selector pattern.
    pub fn new(pattern: impl Into<String>) -> Result<Self, FilterBuildError> {
        let pattern = pattern.into();
        let fragments: Vec<String> = pattern.split(WILDCARD).map(str::to_owned).collect();

        // A wildcard edge is an empty outer fragment. Dots left over after splitting, as in
        // `a....`, are literal and keep the boundary check.
        let has_wildcard = fragments.len() > 1;
        let anchored_start = !((has_wildcard && fragments[0].is_empty())
            || pattern.starts_with(FIELD_SEPARATOR)
            || pattern.starts_with('/'));
        let anchored_end = !((has_wildcard && fragments.last().is_some_and(String::is_empty))
            || pattern.ends_with(FIELD_SEPARATOR)
            || pattern.ends_with('/'));

        let regex = Regex::new(&build_regex(&fragments, anchored_start, anchored_end)).map_err(
            |error| FilterBuildError::InvalidPattern {
                pattern: pattern.clone(),
                error,
            },
        )?;

        Ok(Self {
            pattern,
            fragments,
            anchored_start,
            anchored_end,
            regex,
        })
    }

    /// Returns the pattern as supplied by the user.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns the literal fragments between wildcard markers, in order.
    pub fn fragments(&self) -> impl ExactSizeIterator<Item = &str> {
        self.fragments.iter().map(String::as_str)
    }

    /// Returns true if the start of a match must line up with a field boundary.
    pub fn is_anchored_start(&self) -> bool {
        self.anchored_start
    }

    /// Returns true if the end of a match must line up with a field boundary.
    pub fn is_anchored_end(&self) -> bool {
        self.anchored_end
    }

    /// Returns true if this pattern matches the given job name.
    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl PartialEq for CompiledPattern {
    fn eq(&self, other: &Self) -> bool {
        // Everything else is derived from the pattern text.
        self.pattern == other.pattern
    }
}

impl Eq for CompiledPattern {}

fn build_regex(fragments: &[String], anchored_start: bool, anchored_end: bool) -> String {
    // (?s) so that the wildcard also spans newlines, however unlikely those are in job names.
    let mut regex = String::from("(?s)");
    if anchored_start {
        regex.push_str("(?:^|:)");
    }
    for (i, fragment) in fragments.iter().enumerate() {
        if i > 0 {
            regex.push_str(".*");
        }
        regex.push_str(&regex::escape(fragment));
    }
    if anchored_end {
        regex.push_str("(?:$|:)");
    }
    regex
}
