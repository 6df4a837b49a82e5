// Copyright (c) The spread Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `spread` command-line tool.
//!
//! This crate is not meant to be used as a library: its API is unstable and exists so that the
//! binary can be tested.

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::SpreadApp;
#[doc(hidden)]
pub use errors::{ExpectedError, SpreadExitCode};
#[doc(hidden)]
pub use output::OutputContext;
