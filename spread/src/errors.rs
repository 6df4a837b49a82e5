// Copyright (c) The spread Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::StderrStyles;
use camino::FromPathBufError;
use owo_colors::OwoColorize;
use spread_filtering::errors::FilterBuildError;
use spread_runner::errors::ProjectLoadError;
use std::error::Error;
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

/// Documented exit codes for `spread` failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum SpreadExitCode {}

impl SpreadExitCode {
    /// No errors occurred and spread exited normally.
    pub const OK: i32 = 0;

    /// No jobs were selected, but no other errors occurred.
    pub const NO_JOBS_SELECTED: i32 = 4;

    /// A user issue happened while setting up a spread invocation.
    pub const SETUP_ERROR: i32 = 96;

    /// Writing data to stdout or stderr produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An error that spread reports to the user and exits with.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("current directory is invalid UTF-8")]
    CurrentDirInvalidUtf8 {
        #[source]
        err: FromPathBufError,
    },
    #[error("could not determine the current directory")]
    CurrentDirFailed {
        #[source]
        err: std::io::Error,
    },
    #[error("project load error")]
    ProjectLoadError {
        #[from]
        err: ProjectLoadError,
    },
    #[error("filter build error")]
    FilterBuildError {
        #[from]
        err: FilterBuildError,
    },
    #[error("error writing output")]
    WriteError {
        #[source]
        err: std::io::Error,
    },
}

impl ExpectedError {
    pub(crate) fn write_error(err: std::io::Error) -> Self {
        Self::WriteError { err }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::CurrentDirInvalidUtf8 { .. }
            | Self::CurrentDirFailed { .. }
            | Self::ProjectLoadError { .. }
            | Self::FilterBuildError { .. } => SpreadExitCode::SETUP_ERROR,
            Self::WriteError { .. } => SpreadExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match &self {
            Self::CurrentDirInvalidUtf8 { err } => {
                error!("current directory is invalid UTF-8");
                Some(err as &dyn Error)
            }
            Self::CurrentDirFailed { err } => {
                error!("could not determine the current directory");
                Some(err as &dyn Error)
            }
            Self::ProjectLoadError { err } => {
                // The message already names the file and the underlying error.
                error!("{err}");
                err.source()
            }
            Self::FilterBuildError { err } => {
                match err {
                    FilterBuildError::InvalidPattern { pattern, .. } => {
                        error!(
                            "invalid selector pattern `{}`",
                            pattern.style(styles.bold)
                        );
                    }
                    other => error!("{other}"),
                }
                err.source()
            }
            Self::WriteError { err } => {
                error!("error writing output");
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            error!("  caused by: {err}");
            next_error = err.source();
        }
    }
}
