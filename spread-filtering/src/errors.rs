// Copyright (c) The spread Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced while building a [`Filter`](crate::Filter).

use thiserror::Error;

/// An error that occurred while compiling selector patterns into a filter.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum FilterBuildError {
    /// A pattern could not be compiled.
    ///
    /// Every string is a syntactically valid pattern, so in practice this only happens if the
    /// compiled matcher exceeds the regex engine's size limits.
    #[error("invalid selector pattern `{pattern}`")]
    InvalidPattern {
        /// The pattern as supplied by the user.
        pattern: String,

        /// The error returned by the regex engine.
        #[source]
        error: regex::Error,
    },
}
