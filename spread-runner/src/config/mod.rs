// Copyright (c) The spread Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loading the project description.
//!
//! The project file is decoded in two steps. First the YAML document is decoded as-is, with names
//! taken from map keys. Then a separate pass fills in settings that systems inherit from their
//! backend, such as the plan and priority.

mod document;
mod loader;
mod optional;
mod project;
#[cfg(test)]
mod test_helpers;

pub use loader::*;
pub use optional::*;
pub use project::*;
