use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Leading `---` block; group 1 is the block body without delimiters.
pub(crate) static FRONTMATTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|\z)").unwrap());

static FM_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*title:[ \t]*(.+?)[ \t]*\r?$").unwrap());

static H1: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#[ \t]+(.+?)[ \t]*\r?$").unwrap());

/// A 14-digit `YYYYMMDDHHMMSS` identity.
pub(crate) static TIMESTAMP_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{14}$").unwrap());

/// One note on disk, loaded for a single pass of the renamer.
#[derive(Debug, Clone)]
pub struct NoteFile {
    pub path: PathBuf,
    pub raw: String,
    pub title: String,
    pub body: String,
}

impl NoteFile {
    /// Read a note and pull out its title and body. The identity is left
    /// unresolved; see [`crate::identity::resolve`].
    pub fn load(path: &Path) -> io::Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(Self::from_raw(path.to_path_buf(), raw))
    }

    pub fn from_raw(path: PathBuf, raw: String) -> Self {
        let title = extract_title(&raw);
        let body = strip_frontmatter(&raw).trim().to_string();
        Self { path, raw, title, body }
    }

    /// Notes with neither body nor title give the oracle nothing to work with.
    pub fn is_blank(&self) -> bool {
        self.body.is_empty() && self.title.is_empty()
    }
}

/// Strip spaces and either kind of quote from both ends of a scalar.
pub(crate) fn trim_quotes(value: &str) -> &str {
    value.trim_matches(|c| c == ' ' || c == '"' || c == '\'')
}

/// Raw text of the frontmatter block, if the note starts with one.
pub(crate) fn frontmatter_block(text: &str) -> Option<&str> {
    FRONTMATTER
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Title from frontmatter, else the first `# heading`, else empty.
pub fn extract_title(text: &str) -> String {
    if let Some(block) = frontmatter_block(text) {
        if let Some(t) = FM_TITLE.captures(block).and_then(|c| c.get(1)) {
            return trim_quotes(t.as_str()).to_string();
        }
    }
    extract_h1(text)
}

pub fn extract_h1(body: &str) -> String {
    H1.captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Everything after a leading frontmatter block, or the input unchanged.
pub fn strip_frontmatter(text: &str) -> &str {
    match FRONTMATTER.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}
