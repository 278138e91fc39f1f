use crate::slug::normalize_slug;

/// Normalize a tag to `#kebab-case`; empty when nothing usable is left.
pub fn normalize_tag(t: &str) -> String {
    let trimmed = t.trim();
    let bare = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let slug = normalize_slug(bare);
    if slug.is_empty() { String::new() } else { format!("#{slug}") }
}

/// Normalize, deduplicate and sort a list of tags
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut normalized: Vec<String> = tags
        .iter()
        .map(|t| normalize_tag(t.as_ref()))
        .filter(|t| !t.is_empty())
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

/// Double-quoted scalar with JSON escaping, which frontmatter readers also
/// accept as a quoted YAML string.
pub fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

/// Inline list of quoted items, so `#tag` is never read as a comment.
pub fn inline_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|t| quote(t)).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("todo"), "#todo");
        assert_eq!(normalize_tag("#todo"), "#todo");
        assert_eq!(normalize_tag("  Work Items  "), "#work-items");
        assert_eq!(normalize_tag("#"), "");
        assert_eq!(normalize_tag(""), "");
    }

    #[test]
    fn test_normalize_tags() {
        let tags = ["#Zettelkasten", "zetTelKasten", "  tmux  ", "#tmux"];
        assert_eq!(normalize_tags(&tags), vec!["#tmux", "#zettelkasten"]);
    }

    #[test]
    fn test_normalize_tags_drops_empties() {
        let tags = ["", "   ", "#", "!!!", "ok"];
        assert_eq!(normalize_tags(&tags), vec!["#ok"]);
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("My Title"), "\"My Title\"");
        assert_eq!(quote("say \"hi\"\\now"), r#""say \"hi\"\\now""#);
        assert_eq!(quote("tab\there"), r#""tab\there""#);
    }

    #[test]
    fn test_inline_list() {
        let items = vec!["#tmux".to_string(), "#zettelkasten".to_string()];
        assert_eq!(inline_list(&items), r##"["#tmux", "#zettelkasten"]"##);
        assert_eq!(inline_list(&[]), "[]");
    }
}
