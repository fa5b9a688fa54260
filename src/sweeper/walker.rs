use std::io::ErrorKind;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::common::errors::SweepError;

/// Expand a leading `~` and glob patterns. Patterns without glob
/// metacharacters pass through whether or not they exist; glob patterns
/// yield only existing matches, in sorted order.
pub fn expand_paths(patterns: &[String], home: &Path) -> Vec<PathBuf> {
    let mut expanded = Vec::new();

    for pattern in patterns {
        let resolved = expand_home(pattern, home);

        if is_glob(&resolved) {
            match glob::glob(&resolved.to_string_lossy()) {
                Ok(entries) => expanded.extend(entries.filter_map(|e| e.ok())),
                Err(e) => tracing::warn!("bad path pattern '{}': {}", pattern, e),
            }
        } else {
            expanded.push(resolved);
        }
    }

    expanded
}

fn expand_home(pattern: &str, home: &Path) -> PathBuf {
    if pattern == "~" {
        home.to_path_buf()
    } else if let Some(rest) = pattern.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(pattern)
    }
}

fn is_glob(path: &Path) -> bool {
    path.to_string_lossy().contains(['*', '?', '['])
}

/// Physical disk usage of a file or directory tree, in bytes.
/// `None` when the path itself cannot be inspected (absent or unreadable);
/// unreadable entries further down are silently left out.
pub fn path_size(path: &Path) -> Option<u64> {
    let meta = std::fs::symlink_metadata(path).ok()?;
    if !meta.is_dir() {
        return Some(meta.blocks() * 512);
    }

    let size = WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.metadata().map(|m| m.blocks() * 512).unwrap_or(0))
        .sum();
    Some(size)
}

/// Remove everything inside a directory, keeping the directory itself, or
/// remove the path outright if it is a file or symlink. A path that does not
/// exist is already clean. Failures are collected per entry.
pub fn remove_contents(path: &Path) -> Vec<SweepError> {
    let mut errors = Vec::new();

    let meta = match std::fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return errors,
        Err(e) => {
            errors.push(SweepError::io(path, e));
            return errors;
        }
    };

    if !meta.is_dir() {
        if let Err(e) = std::fs::remove_file(path) {
            if e.kind() != ErrorKind::NotFound {
                errors.push(SweepError::io(path, e));
            }
        }
        return errors;
    }

    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            errors.push(SweepError::io(path, e));
            return errors;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                errors.push(SweepError::io(path, e));
                continue;
            }
        };
        let child = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        let removed = if is_dir {
            std::fs::remove_dir_all(&child)
        } else {
            std::fs::remove_file(&child)
        };
        match removed {
            Ok(()) => tracing::debug!("removed {}", child.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => errors.push(SweepError::io(child, e)),
        }
    }

    errors
}

/// Arguments for an elevated `find` that removes a directory's contents
pub fn elevated_contents_args(dir: &Path) -> Vec<String> {
    vec![
        dir.to_string_lossy().into_owned(),
        "-mindepth".into(),
        "1".into(),
        "-maxdepth".into(),
        "1".into(),
        "-exec".into(),
        "rm".into(),
        "-rf".into(),
        "{}".into(),
        "+".into(),
    ]
}

/// Arguments for an elevated `rm` of a single file
pub fn elevated_file_args(file: &Path) -> Vec<String> {
    vec!["-f".into(), "--".into(), file.to_string_lossy().into_owned()]
}
