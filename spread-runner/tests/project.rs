// Copyright (c) The spread Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino_tempfile::tempdir;
use camino_tempfile_ext::prelude::*;
use color_eyre::{Result, eyre::eyre};
use indoc::indoc;
use pretty_assertions::assert_eq;
use spread_filtering::{Filter, FilterMode};
use spread_runner::{config::ProjectLoader, job::JobList};

const PROJECT: &str = indoc! {"
    project: selection
    path: /home/test/selection
    backends:
      google:
        key: some-key
        plan: n1-standard-1
        priority: 10
        systems:
          - ubuntu-22.04-64:
              workers: 2
          - fedora-39-64:
              image: fedora-cloud-39
              plan: n1-standard-4
      qemu:
        systems: [ubuntu-22.04-64]
    suites:
      tests/main/:
        summary: main suite
      tests/nested/:
        summary: nested suite
        priority: 3
"};

#[test]
fn load_and_select() -> Result<()> {
    let temp_dir = tempdir()?;
    temp_dir.child(".spread.yaml").write_str(PROJECT)?;

    let project = ProjectLoader::new(temp_dir.path()).load()?;
    assert_eq!(project.name(), "selection");
    assert_eq!(project.remote_path(), "/home/test/selection");
    assert_eq!(
        project.project_file().as_str(),
        temp_dir.path().join(".spread.yaml").as_str()
    );

    let google = project.backend("google").ok_or_else(|| eyre!("google missing"))?;
    let fedora = google
        .system("fedora-39-64")
        .ok_or_else(|| eyre!("fedora missing"))?;
    assert_eq!(fedora.image(), "fedora-cloud-39");
    assert_eq!(fedora.plan(), "n1-standard-4");
    assert_eq!(fedora.priority().get(), Some(10));

    let ubuntu = google
        .system("ubuntu-22.04-64")
        .ok_or_else(|| eyre!("ubuntu missing"))?;
    assert_eq!(ubuntu.plan(), "n1-standard-1");
    assert!(!ubuntu.is_plan_explicit());
    assert_eq!(ubuntu.workers().get(), Some(2));

    let qemu = project.backend("qemu").ok_or_else(|| eyre!("qemu missing"))?;
    assert_eq!(qemu.backend_type(), "qemu");
    assert_eq!(qemu.priority().get(), None);

    let jobs = JobList::new(&project);
    assert_eq!(jobs.len(), 6);

    let filter = Filter::new(["ubuntu-22.04-64", "nested"])?;
    let selected: Vec<_> = jobs.filtered(&filter).map(|job| job.name()).collect();
    assert_eq!(selected, Vec::<&str>::new(), "`nested` is a whole-field match");

    let filter = Filter::new(["ubuntu-22.04-64", "/nested/"])?;
    let selected: Vec<_> = jobs.filtered(&filter).map(|job| job.name()).collect();
    assert_eq!(
        selected,
        [
            "google:ubuntu-22.04-64:tests/nested/:",
            "qemu:ubuntu-22.04-64:tests/nested/:",
        ]
    );

    let filter = Filter::with_mode(["qemu", "fedora-..."], FilterMode::Any)?;
    let selected: Vec<_> = jobs.filtered(&filter).map(|job| job.name()).collect();
    assert_eq!(
        selected,
        [
            "google:fedora-39-64:tests/main/:",
            "google:fedora-39-64:tests/nested/:",
            "qemu:ubuntu-22.04-64:tests/main/:",
            "qemu:ubuntu-22.04-64:tests/nested/:",
        ]
    );

    Ok(())
}
