use std::collections::BTreeMap;

use crate::identity::is_timestamp_id;
use crate::note::{extract_h1, frontmatter_block, strip_frontmatter, trim_quotes};
use crate::tags::{inline_list, normalize_tags, quote};

/// Keys written first, in this order, ahead of everything else.
pub const LEADING_KEYS: [&str; 5] = ["id", "title", "date", "tags", "type"];

/// Flat `key: value` metadata. Values are kept as raw text (scalars or
/// bracketed list literals); nothing nested is understood.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    entries: BTreeMap<String, String>,
}

impl Frontmatter {
    /// Parse the lines of a block. Lines without a colon are ignored and a
    /// repeated key keeps its last value.
    pub fn parse(block: &str) -> Self {
        let mut entries = BTreeMap::new();
        for line in block.lines() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            entries.insert(key.trim().to_string(), value.trim().to_string());
        }
        Self { entries }
    }

    /// Frontmatter of a whole note, empty when there is no block.
    pub fn from_note(text: &str) -> Self {
        frontmatter_block(text).map(Self::parse).unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_string(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep an existing id when it is a (possibly quoted) timestamp, storing
    /// it unquoted; add `id` when missing. Any other existing value is left
    /// alone.
    pub fn merge_id(&mut self, id: &str) {
        let existing = self.get("id").map(|v| trim_quotes(v).to_string());
        match existing {
            None => self.set("id", id),
            Some(existing) if is_timestamp_id(&existing) => self.set("id", existing),
            Some(_) => {}
        }
    }

    pub fn merge_title(&mut self, suggested: &str, body: &str) {
        if !suggested.trim().is_empty() {
            self.set("title", quote(suggested));
        } else if !self.contains("title") {
            let h1 = extract_h1(body);
            if !h1.is_empty() {
                self.set("title", quote(&h1));
            }
        }
    }

    /// Replace tags wholesale when the suggestion yields at least one usable
    /// tag; otherwise the existing value stays as written.
    pub fn merge_tags<S: AsRef<str>>(&mut self, suggested: &[S]) {
        let tags = normalize_tags(suggested);
        if !tags.is_empty() {
            self.set("tags", inline_list(&tags));
        }
    }

    /// The existing `id` when it is not a timestamp and differs from the
    /// identity the filename will carry.
    pub fn id_conflict(&self, id: &str) -> Option<&str> {
        let existing = self.get("id")?;
        let trimmed = trim_quotes(existing);
        (!is_timestamp_id(trimmed) && trimmed != id).then_some(existing)
    }

    /// Block lines in canonical order, without delimiters.
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.entries.len());
        for key in LEADING_KEYS {
            if let Some(v) = self.entries.get(key) {
                lines.push(format!("{key}: {v}"));
            }
        }
        for (key, v) in &self.entries {
            if !LEADING_KEYS.contains(&key.as_str()) {
                lines.push(format!("{key}: {v}"));
            }
        }
        lines.join("\n")
    }
}

/// Merge identity, title and tags into the note's frontmatter and return the
/// complete new note text.
pub fn upsert<S: AsRef<str>>(
    text: &str,
    id: &str,
    title: &str,
    tags: &[S],
) -> String {
    let mut fm = Frontmatter::from_note(text);
    let body = strip_frontmatter(text);

    fm.merge_id(id);
    fm.merge_title(title, body);
    fm.merge_tags(tags);

    let body = body.trim_start_matches(['\n', '\r']);
    format!("---\n{}\n---\n\n{}", fm.render(), body)
}
