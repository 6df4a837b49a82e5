// Copyright (c) The spread Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0
//! Test helpers for configuration.

use super::{ConfigWarnings, Project, document::ProjectDeserialize};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeSet;

/// A project with one backend whose systems partly override its plan.
pub(in crate::config) const MOCK_PROJECT: &str = "\
project: mock-prj
path: /some/path
backends:
 google:
  key: some-key
  plan: global-plan
  systems:
   - system-1:
   - system-2:
      plan: plan-for-2
   - system-3:
suites:
 tests/:
  summary: mock tests
";

/// Decodes a project document without applying inheritance.
#[track_caller]
pub(in crate::config) fn decode(contents: &str) -> Project {
    let de: ProjectDeserialize = serde_yaml::from_str(contents).expect("valid project document");
    Project::from_deserialized(
        Utf8PathBuf::from("/project"),
        Utf8PathBuf::from("/project/spread.yaml"),
        de,
    )
}

#[derive(Default)]
pub(in crate::config) struct CollectWarnings {
    pub(in crate::config) unknown: Vec<(Utf8PathBuf, BTreeSet<String>)>,
}

impl ConfigWarnings for CollectWarnings {
    fn unknown_config_keys(
        &mut self,
        project_file: &Utf8Path,
        _root: &Utf8Path,
        unknown: &BTreeSet<String>,
    ) {
        self.unknown.push((project_file.to_owned(), unknown.clone()));
    }
}
