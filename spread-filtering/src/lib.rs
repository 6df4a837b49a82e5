// Copyright (c) The spread Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Job selector patterns used by spread.
//!
//! A job is identified by a name of the form `backend:system:suite/path:variant`. Users pick the
//! jobs to run by passing selector patterns on the command line; this crate compiles those
//! patterns into a [`Filter`] that can then be queried for every job.
//!
//! # Pattern syntax
//!
//! A pattern is literal text, except for the three-character wildcard marker `...`, which matches
//! any run of characters (separators included).
//!
//! Unless relaxed, both ends of a match must line up with a `:`-delimited field of the job name.
//! An end is relaxed if the pattern starts (or ends) with `...`, `:` or `/`. The pattern is split
//! into wildcards from the left, so in `a....` the final `.` is literal and the end is not
//! relaxed.
//!
//! | Pattern      | `backend:image:suite/test:variant` |
//! |--------------|------------------------------------|
//! | `image`      | matches                            |
//! | `:image:`    | matches                            |
//! | `suite/`     | matches                            |
//! | `suit...est` | matches                            |
//! | `suite`      | does not match                     |
//! | `:backend`   | does not match                     |

pub mod errors;
mod filter;
mod pattern;

pub use filter::{Filter, FilterMode, JobQuery};
pub use pattern::CompiledPattern;
