use std::error::Error;
use std::io::{self, Write};

mod content;

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    All,
    Guides,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Section {
    Command,
    Environment,
    Guide,
}

impl Section {
    fn label(self) -> &'static str {
        match self {
            Section::Command => "Commands",
            Section::Environment => "Environment",
            Section::Guide => "Guides",
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct HelpFlag<'a> {
    pub name: &'a str,
    pub desc: &'a str,
}

#[derive(Clone, Copy)]
pub(crate) struct HelpTopic<'a> {
    pub name: &'a str,
    pub summary: &'a str,
    pub usage: &'a str,
    pub details: &'a [&'a str],
    pub flags: &'a [HelpFlag<'a>],
    pub aliases: &'a [&'a str],
    pub section: Section,
    pub examples: &'a [&'a str],
}

#[derive(Clone, Copy)]
pub(crate) struct HelpBook<'a> {
    pub title: &'a str,
    pub usage: &'a str,
    pub topics: &'a [HelpTopic<'a>],
    pub footer: &'a [&'a str],
}

impl<'a> HelpBook<'a> {
    fn find(&self, name: &str) -> Option<&HelpTopic<'a>> {
        let needle = name.trim_start_matches('-');
        self.topics.iter().find(|topic| {
            topic.name.eq_ignore_ascii_case(needle)
                || topic.aliases.iter().any(|a| a.eq_ignore_ascii_case(needle))
        })
    }

    fn in_section(
        &self,
        section: Section,
    ) -> impl Iterator<Item = &HelpTopic<'a>> {
        self.topics.iter().filter(move |t| t.section == section)
    }
}

/// Terminal width in columns, when stdout is a terminal.
pub(crate) fn terminal_columns() -> Option<usize> {
    terminal_size::terminal_size().map(|(terminal_size::Width(w), _)| w as usize)
}

pub(crate) fn run(args: Vec<String>) -> Result<(), Box<dyn Error>> {
    run_with_mode(args, Mode::All)
}

pub(crate) fn run_guides(args: Vec<String>) -> Result<(), Box<dyn Error>> {
    run_with_mode(args, Mode::Guides)
}

fn run_with_mode(args: Vec<String>, mode: Mode) -> Result<(), Box<dyn Error>> {
    let width = terminal_columns().unwrap_or(96).clamp(64, 120);
    let lines = render(args.first().map(String::as_str), mode, width);
    let mut out = io::stdout().lock();
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn render(topic: Option<&str>, mode: Mode, width: usize) -> Vec<String> {
    let book = content::book();
    let printer = HelpPrinter::new(width);
    let fallback = |printer: &HelpPrinter| match mode {
        Mode::All => printer.render_overview(&book),
        Mode::Guides => printer.render_guides(&book),
    };

    let Some(topic) = topic else {
        return fallback(&printer);
    };
    match book.find(topic) {
        Some(entry) if mode == Mode::Guides && entry.section != Section::Guide => {
            eprintln!("Unknown guide: {topic}");
            printer.render_guides(&book)
        }
        Some(entry) => printer.render_topic(&book, entry),
        None => {
            eprintln!("Unknown help topic: {topic}");
            fallback(&printer)
        }
    }
}

struct HelpPrinter {
    width: usize,
}

impl HelpPrinter {
    fn new(width: usize) -> Self {
        Self { width }
    }

    fn rows(book: &HelpBook<'_>, section: Section) -> Vec<(String, String)> {
        book.in_section(section)
            .map(|t| {
                let label = if section == Section::Guide { t.name } else { t.usage };
                (label.to_string(), t.summary.to_string())
            })
            .collect()
    }

    fn push_footer(&self, book: &HelpBook<'_>, out: &mut Vec<String>) {
        for line in book.footer {
            out.extend(self.wrap(line, self.width));
        }
    }

    fn render_overview(&self, book: &HelpBook<'_>) -> Vec<String> {
        let mut out = vec![
            book.title.to_string(),
            format!("usage: {}", book.usage),
            String::new(),
        ];
        for section in [Section::Command, Section::Environment, Section::Guide] {
            out.extend(self.render_block(section.label(), &Self::rows(book, section)));
        }
        self.push_footer(book, &mut out);
        out
    }

    fn render_guides(&self, book: &HelpBook<'_>) -> Vec<String> {
        let mut out = vec![
            format!("{} (guides)", book.title),
            "usage: zr guide [topic]".to_string(),
            String::new(),
        ];
        out.extend(self.render_block(
            Section::Guide.label(),
            &Self::rows(book, Section::Guide),
        ));
        self.push_footer(book, &mut out);
        out
    }

    fn render_topic(
        &self,
        book: &HelpBook<'_>,
        topic: &HelpTopic<'_>,
    ) -> Vec<String> {
        let mut out = Vec::new();
        out.push(format!("{}: {}", topic.name, topic.summary));
        out.push(format!("usage: {}", topic.usage));
        if !topic.aliases.is_empty() {
            out.push(format!("aliases: {}", topic.aliases.join(", ")));
        }
        out.push(String::new());

        for line in topic.details {
            out.extend(self.wrap(line, self.width));
        }
        if !topic.details.is_empty() {
            out.push(String::new());
        }

        if !topic.flags.is_empty() {
            let flags: Vec<(String, String)> = topic
                .flags
                .iter()
                .map(|f| (f.name.to_string(), f.desc.to_string()))
                .collect();
            out.extend(self.render_block("Options", &flags));
        }

        if !topic.examples.is_empty() {
            out.push("Examples:".to_string());
            for ex in topic.examples {
                for l in self.wrap(ex, self.width.saturating_sub(2)) {
                    out.push(format!("  {l}"));
                }
            }
            out.push(String::new());
        }

        self.push_footer(book, &mut out);
        out
    }

    fn render_block(
        &self,
        title: &str,
        rows: &[(String, String)],
    ) -> Vec<String> {
        if rows.is_empty() {
            return Vec::new();
        }
        let mut out = Vec::new();
        let min_desc = self.width / 2;
        let mut label_width =
            rows.iter().map(|r| r.0.len()).max().unwrap_or(0).min(38);
        if label_width + 4 + min_desc > self.width {
            label_width = self.width.saturating_sub(min_desc + 4);
        }
        let desc_width =
            self.width.saturating_sub(2 + label_width + 2).max(min_desc);

        out.push(format!("{title}:"));
        for (label, desc) in rows {
            let label_lines = self.wrap(label, label_width);
            let desc_lines = self.wrap(desc, desc_width);
            let height = label_lines.len().max(desc_lines.len());
            for idx in 0..height {
                let l = label_lines.get(idx).map(String::as_str).unwrap_or("");
                let d = desc_lines.get(idx).map(String::as_str).unwrap_or("");
                out.push(format!("  {l:label_width$}  {d}").trim_end().to_string());
            }
        }
        out.push(String::new());
        out
    }

    fn wrap(&self, text: &str, width: usize) -> Vec<String> {
        let mut out = Vec::new();
        let mut line = String::new();
        for word in text.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
                continue;
            }
            if line.len() + 1 + word.len() <= width {
                line.push(' ');
                line.push_str(word);
            } else {
                out.push(line);
                line = word.to_string();
            }
        }
        if !line.is_empty() {
            out.push(line);
        }
        if out.is_empty() {
            out.push(String::new());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_lists_every_section() {
        let lines = render(None, Mode::All, 96);
        let text = lines.join("\n");
        assert!(lines[0].starts_with("zet_rename"));
        assert!(text.contains("Commands:"));
        assert!(text.contains("Environment:"));
        assert!(text.contains("Guides:"));
        assert!(text.contains("OLLAMA_HOST"));
    }

    #[test]
    fn test_topic_lookup_by_name_alias_and_flag() {
        let book = content::book();
        assert_eq!(book.find("run").map(|t| t.name), Some("run"));
        assert_eq!(book.find("RUN").map(|t| t.name), Some("run"));
        assert_eq!(book.find("collection").map(|t| t.name), Some("reviews"));
        assert!(book.find("nope").is_none());
    }

    #[test]
    fn test_run_topic_documents_all_flags() {
        let text = render(Some("run"), Mode::All, 120).join("\n");
        for flag in [
            "--root", "--base-dir", "--model", "--host", "--max-slug",
            "--max-file", "--excerpt", "--timeout", "--apply", "--only-readme",
            "--readme-any", "--collection", "--offline", "--no-git", "--plain",
        ] {
            assert!(text.contains(flag), "missing {flag}");
        }
    }

    #[test]
    fn test_guides_mode_rejects_commands() {
        let lines = render(Some("run"), Mode::Guides, 80);
        assert!(lines[0].ends_with("(guides)"));
    }

    #[test]
    fn test_wrap_respects_width() {
        let printer = HelpPrinter::new(64);
        for line in printer.wrap("one two three four five six seven eight nine ten", 12) {
            assert!(line.len() <= 12, "{line}");
        }
        assert_eq!(printer.wrap("", 10), vec![String::new()]);
    }
}
