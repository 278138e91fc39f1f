use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const FALLBACK_SLUG: &str = "note";
/// Shortest slug kept when the whole basename has to be shortened.
pub const MIN_SLUG_LEN: usize = 8;

static SLUG_CLEAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9-]+").unwrap());
static MULTI_DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// Turn free text into a slug, dropping anything that is not ASCII
/// alphanumeric or a separator.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        match c {
            'a'..='z' | '0'..='9' => out.push(c),
            '_' | '-' => out.push('-'),
            c if c.is_whitespace() => out.push('-'),
            _ => {}
        }
    }
    normalize_slug(&out)
}

/// Lowercase, replace runs of disallowed characters with one hyphen and trim
/// hyphens from both ends.
pub fn normalize_slug(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let cleaned = SLUG_CLEAN.replace_all(&lowered, "-");
    let collapsed = MULTI_DASH.replace_all(&cleaned, "-");
    collapsed.trim_matches('-').to_string()
}

/// Cut to at most `max` characters, then drop hyphens left dangling.
pub fn truncate(slug: &str, max: usize) -> String {
    let cut = match slug.char_indices().nth(max) {
        Some((idx, _)) => &slug[..idx],
        None => slug,
    };
    cut.trim_end_matches('-').to_string()
}

fn or_fallback(slug: String) -> String {
    if slug.is_empty() { FALLBACK_SLUG.to_string() } else { slug }
}

/// Build `<id>-<slug>` within both the slug and the basename limits.
pub fn compose_basename(
    id: &str,
    raw_slug: &str,
    max_slug: usize,
    max_basename: usize,
) -> String {
    let mut slug = or_fallback(truncate(&normalize_slug(raw_slug), max_slug));
    let mut base = format!("{id}-{slug}");
    if base.len() > max_basename {
        let room = max_basename.saturating_sub(id.len() + 1).max(MIN_SLUG_LEN);
        slug = or_fallback(truncate(&slug, room));
        base = format!("{id}-{slug}");
    }
    base
}

/// Tracks destinations handed out during one run, and sources earlier moves
/// leave behind, so a dry run reports the same suffixes an applied run would
/// produce.
#[derive(Debug, Default)]
pub struct Claims {
    paths: HashSet<PathBuf>,
    vacated: HashSet<PathBuf>,
}

impl Claims {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, path: PathBuf) {
        self.paths.insert(path);
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    /// Record that the note at `path` moves away.
    pub fn vacate(&mut self, path: PathBuf) {
        self.vacated.insert(path);
    }

    /// Left by an earlier move and not handed out again.
    pub fn is_vacated(&self, path: &Path) -> bool {
        self.vacated.contains(path) && !self.paths.contains(path)
    }
}

/// First free variant of `candidate` on disk: the path itself, then
/// `stem-2.ext`, `stem-3.ext`, ... A path equal to `current` (the note's own
/// location) or vacated by an earlier move counts as free.
pub fn dedupe_destination(
    candidate: &Path,
    current: Option<&Path>,
    claims: &Claims,
) -> PathBuf {
    let taken = |p: &Path| {
        if claims.contains(p) {
            return true;
        }
        if current.is_some_and(|c| c == p) || claims.is_vacated(p) {
            return false;
        }
        p.exists()
    };

    if !taken(candidate) {
        return candidate.to_path_buf();
    }
    let dir = candidate.parent().unwrap_or_else(|| Path::new(""));
    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = candidate
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let mut n = 2usize;
    loop {
        let next = dir.join(format!("{stem}-{n}{ext}"));
        if !taken(&next) {
            return next;
        }
        n += 1;
    }
}
