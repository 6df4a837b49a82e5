// Copyright (c) The spread Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Lexically normalizes a path: drops `.` components and resolves `..` against the preceding
/// component. The filesystem is not consulted, so symlinks are not followed.
///
/// `..` directly under the root stays at the root. Leading `..` components of a relative path are
/// kept. An empty result is returned as `.`.
pub(crate) fn normalize_path(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                let last = out.components().next_back().map(|c| match c {
                    Utf8Component::Normal(_) => Last::Normal,
                    Utf8Component::RootDir | Utf8Component::Prefix(_) => Last::Root,
                    Utf8Component::ParentDir | Utf8Component::CurDir => Last::Parent,
                });
                match last {
                    Some(Last::Normal) => {
                        out.pop();
                    }
                    Some(Last::Root) => {}
                    Some(Last::Parent) | None => out.push(".."),
                }
            }
            other => out.push(other.as_str()),
        }
    }

    if out.as_str().is_empty() {
        out.push(".");
    }
    out
}

enum Last {
    Normal,
    Root,
    Parent,
}
