use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::note::{TIMESTAMP_ID, frontmatter_block, trim_quotes};

pub const ID_FMT: &str = "%Y%m%d%H%M%S";
pub const ID_LEN: usize = 14;

/// Old folder-per-note layout: `.../20210504185947/README.md`.
static LEGACY_README: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|/)(\d{14})/README\.md$").unwrap());

static FM_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*id:[ \t]*(.+?)[ \t]*\r?$").unwrap());

/// Where a resolved identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSource {
    LegacyDir,
    Frontmatter,
    FileName,
    ModTime,
}

pub fn is_timestamp_id(value: &str) -> bool {
    TIMESTAMP_ID.is_match(value)
}

/// Resolve the note's 14-digit identity, or `None` when nothing trustworthy
/// is available.
pub fn resolve(path: &Path, text: &str) -> Option<String> {
    resolve_with_source(path, text).map(|(id, _)| id)
}

pub fn resolve_with_source(path: &Path, text: &str) -> Option<(String, IdSource)> {
    if let Some(id) = from_legacy_dir(path) {
        return Some((id, IdSource::LegacyDir));
    }
    if let Some(id) = from_frontmatter(text) {
        return Some((id, IdSource::Frontmatter));
    }
    if let Some(id) = from_file_name(path) {
        return Some((id, IdSource::FileName));
    }
    from_mod_time(path).map(|id| (id, IdSource::ModTime))
}

pub fn is_legacy_readme(path: &Path) -> bool {
    LEGACY_README.is_match(&slash_path(path))
}

fn from_legacy_dir(path: &Path) -> Option<String> {
    LEGACY_README
        .captures(&slash_path(path))
        .and_then(|c| c.get(2))
        .map(|m| m.as_str().to_string())
}

fn from_frontmatter(text: &str) -> Option<String> {
    let block = frontmatter_block(text)?;
    let raw = FM_ID.captures(block)?.get(1)?.as_str();
    let id = trim_quotes(raw);
    is_timestamp_id(id).then(|| id.to_string())
}

fn from_file_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let prefix = stem.get(..ID_LEN)?;
    is_timestamp_id(prefix).then(|| prefix.to_string())
}

fn from_mod_time(path: &Path) -> Option<String> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    let local: DateTime<Local> = modified.into();
    Some(local.format(ID_FMT).to_string())
}

pub(crate) fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_legacy_dir_wins_over_everything() {
        let path = PathBuf::from("/home/u/zet/20210504185947/README.md");
        let text = "---\nid: 20240102123456\ntitle: \"Anything\"\n---\n";
        assert_eq!(
            resolve_with_source(&path, text),
            Some(("20210504185947".to_string(), IdSource::LegacyDir))
        );
    }

    #[test]
    fn test_legacy_dir_requires_readme_name() {
        let path = PathBuf::from("/home/u/zet/20210504185947/notes.md");
        assert!(!is_legacy_readme(&path));
        let path = PathBuf::from("/home/u/zet/2021050418594/README.md");
        assert!(!is_legacy_readme(&path));
    }

    #[test]
    fn test_frontmatter_id_wins_over_filename() {
        let path = PathBuf::from("/home/u/zet/20200101000000-other.md");
        let text = "---\nid: \"20240102123456\"\ntitle: \"T\"\n---\n\n# T\n";
        assert_eq!(
            resolve_with_source(&path, text),
            Some(("20240102123456".to_string(), IdSource::Frontmatter))
        );
    }

    #[test]
    fn test_invalid_frontmatter_id_is_ignored() {
        let path = PathBuf::from("/home/u/zet/20200101000000-other.md");
        let text = "---\nid: abc-123\n---\n\nbody\n";
        assert_eq!(
            resolve_with_source(&path, text),
            Some(("20200101000000".to_string(), IdSource::FileName))
        );
    }

    #[test]
    fn test_filename_prefix_wins_over_mod_time() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("20220303101010-something.md");
        std::fs::write(&path, "body").unwrap();
        assert_eq!(
            resolve_with_source(&path, "body"),
            Some(("20220303101010".to_string(), IdSource::FileName))
        );
    }

    #[test]
    fn test_mod_time_fallback() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("plain.md");
        std::fs::write(&path, "body").unwrap();
        let (id, source) = resolve_with_source(&path, "body").unwrap();
        assert_eq!(source, IdSource::ModTime);
        assert!(is_timestamp_id(&id));
    }

    #[test]
    fn test_unstatable_file_has_no_identity() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("missing.md");
        assert_eq!(resolve(&path, "body"), None);
    }

    #[test]
    fn test_short_or_multibyte_stem_is_not_a_prefix() {
        assert_eq!(from_file_name(Path::new("/z/2021.md")), None);
        assert_eq!(from_file_name(Path::new("/z/2021050418594é-x.md")), None);
    }
}
