// Copyright (c) The spread Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by spread.

use crate::config::ProjectLoader;
use camino::Utf8PathBuf;
use std::ffi::OsString;
use thiserror::Error;

/// An error that occurred while loading the project description.
///
/// All of these indicate a broken setup rather than a transient condition, so callers are expected
/// to report them and exit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProjectLoadError {
    /// No override was given and neither default file name exists under the project root.
    #[error(
        "cannot load project from {root}: cannot find {} or {}",
        ProjectLoader::DEFAULT_FILE_NAMES[0],
        ProjectLoader::DEFAULT_FILE_NAMES[1]
    )]
    NotFound {
        /// The project root that was searched.
        root: Utf8PathBuf,
    },

    /// The project file could not be opened.
    #[error("cannot load project: open {path}: {error}")]
    Open {
        /// The path that was opened.
        path: Utf8PathBuf,

        /// The error returned by the filesystem.
        error: std::io::Error,
    },

    /// The project file was opened but could not be read.
    #[error("cannot load project: read {path}: {error}")]
    Read {
        /// The path that was read.
        path: Utf8PathBuf,

        /// The error returned by the filesystem.
        error: std::io::Error,
    },

    /// The project file is not a valid project description.
    #[error("cannot load project: {path}: {error}")]
    Decode {
        /// The path of the project file.
        path: Utf8PathBuf,

        /// The decoding error, along with the location of the offending key.
        error: Box<serde_path_to_error::Error<serde_yaml::Error>>,
    },

    /// The override environment variable is not valid UTF-8.
    #[error(
        "cannot load project: {} is not valid UTF-8: {value:?}",
        ProjectLoader::PROJECT_FILE_ENV
    )]
    InvalidProjectFileEnv {
        /// The raw value of the variable.
        value: OsString,
    },
}
