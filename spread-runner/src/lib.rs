// Copyright (c) The spread Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for spread: loading the project description and selecting the jobs to run.
//!
//! The basic flow is:
//!
//! 1. [`Project::load`](config::Project::load) finds `spread.yaml` (or `.spread.yaml`, or the file
//!    named by `SPREAD_PROJECT_FILE`), decodes it, and fills in values that systems inherit from
//!    their backends.
//! 2. The project is expanded into [`Job`](job::Job)s.
//! 3. A [`Filter`](spread_filtering::Filter) built from the user's selectors decides which of
//!    those jobs run.

pub mod config;
pub mod errors;
mod helpers;
pub mod job;
