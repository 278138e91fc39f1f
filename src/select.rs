use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::identity::{is_legacy_readme, slash_path};

static ANY_README: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(^|/)README\.md$").unwrap());

const SKIP_DIRS: &[&str] = &[".git", ".zk"];

pub fn is_readme(path: &Path) -> bool {
    ANY_README.is_match(&slash_path(path))
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIP_DIRS.contains(&name))
}

/// Candidate notes under `root`, sorted by path.
///
/// Legacy `<timestamp>/README.md` notes are always included. With
/// `readme_any` every `README.md` is included; unless `only_readme` is set,
/// Markdown files sitting directly in `root` are included too.
pub fn collect_notes(root: &Path, only_readme: bool, readme_any: bool) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(DirEntry::into_path)
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("md"))
        .filter(|p| {
            is_legacy_readme(p)
                || (readme_any && is_readme(p))
                || (!only_readme && p.parent() == Some(root))
        })
        .collect();
    out.sort();
    out
}
