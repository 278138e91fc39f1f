use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::{Config, ConfigError};
use crate::formatting::FormatContext;
use crate::frontmatter::{Frontmatter, upsert};
use crate::identity::{resolve_with_source, slash_path};
use crate::note::NoteFile;
use crate::select::{collect_notes, is_readme};
use crate::slug::{Claims, compose_basename, dedupe_destination};
use crate::suggest::{SuggestRequest, Suggester, Suggestion, excerpt};
use crate::vcs::{MoveError, Mover};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{} is not a directory", .0.display())]
    MissingRoot(PathBuf),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Why a note was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    Unreadable,
    NoIdentity,
    Blank,
}

/// Everything decided about one note before anything touches the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRename {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub text: String,
    pub soft_failure: bool,
    pub id_conflict: bool,
}

impl PlannedRename {
    pub fn is_move(&self) -> bool {
        self.source != self.destination
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub planned: usize,
    pub applied: usize,
    pub skipped: usize,
    pub soft_failures: usize,
    pub id_conflicts: usize,
}

/// Work out the new name and text for the note at `path`.
pub fn plan_note(
    config: &Config,
    suggester: &dyn Suggester,
    work_root: &Path,
    path: &Path,
    claims: &Claims,
) -> Result<PlannedRename, Skip> {
    let shown = path.display();
    let note = match NoteFile::load(path) {
        Ok(note) => note,
        Err(e) => {
            log::error!("cannot read {shown}: {e}");
            return Err(Skip::Unreadable);
        }
    };

    let Some((id, id_source)) = resolve_with_source(path, &note.raw) else {
        log::debug!("{shown}: no identity, skipping");
        return Err(Skip::NoIdentity);
    };
    log::debug!("{shown}: id {id} from {id_source:?}");

    if note.is_blank() {
        log::debug!("{shown}: empty note, skipping");
        return Err(Skip::Blank);
    }

    let request = SuggestRequest {
        existing_title: &note.title,
        excerpt: excerpt(&note.body, config.excerpt_chars),
        max_slug: config.max_slug,
        timeout: config.timeout,
    };
    let (mut suggestion, soft_failure) = match suggester.suggest(&request) {
        Ok(s) => {
            if s.is_empty() {
                log::debug!("{shown}: {} had no suggestion", suggester.name());
            }
            (s, false)
        }
        Err(e) => {
            log::warn!("{shown}: no suggestion from {}: {e}", suggester.name());
            (Suggestion::default(), true)
        }
    };

    if config.in_review_collection() && is_readme(path) {
        if let Some(dir) = path.parent().and_then(Path::file_name).and_then(|n| n.to_str()) {
            suggestion.pin_to_collection(&note.title, dir);
        }
    }
    let suggestion = suggestion.with_fallbacks(&note.title, &note.body);

    let base = compose_basename(&id, &suggestion.slug, config.max_slug, config.max_basename);
    let candidate = work_root.join(format!("{base}.md"));
    let destination = dedupe_destination(&candidate, Some(path), claims);

    let id_conflict = match Frontmatter::from_note(&note.raw).id_conflict(&id) {
        Some(existing) => {
            log::warn!("{shown}: keeping id {existing} although the file name uses {id}");
            true
        }
        None => false,
    };

    let text = upsert(&note.raw, &id, &suggestion.title, &suggestion.tags);
    Ok(PlannedRename {
        source: path.to_path_buf(),
        destination,
        text,
        soft_failure,
        id_conflict,
    })
}

/// Move (when the name changes) and rewrite one planned note.
pub fn apply_plan(plan: &PlannedRename, repo_root: &Path, mover: &dyn Mover) -> Result<(), RunError> {
    if plan.is_move() {
        mover.move_note(repo_root, &plan.source, &plan.destination)?;
    }
    fs::write(&plan.destination, &plan.text).map_err(|source| RunError::Write {
        path: plan.destination.clone(),
        source,
    })
}

fn relative(path: &Path, root: &Path) -> String {
    slash_path(path.strip_prefix(root).unwrap_or(path))
}

/// Plan every selected note, report each mapping to `out`, and move and
/// rewrite them when the config says to apply.
pub fn run(
    config: &Config,
    suggester: &dyn Suggester,
    mover: &dyn Mover,
    ctx: &FormatContext,
    out: &mut dyn Write,
) -> Result<RunSummary, RunError> {
    config.validate()?;
    let root = std::path::absolute(&config.root)?;
    let work_root = std::path::absolute(config.work_root())?;
    if !work_root.is_dir() {
        return Err(RunError::MissingRoot(work_root));
    }

    let notes = collect_notes(&work_root, config.only_readme, config.readme_any);
    log::debug!("{} candidate note(s) under {}", notes.len(), work_root.display());

    let mut summary = RunSummary::default();
    let mut claims = Claims::new();
    for path in &notes {
        let plan = match plan_note(config, suggester, &work_root, path, &claims) {
            Ok(plan) => plan,
            Err(_) => {
                summary.skipped += 1;
                continue;
            }
        };
        summary.planned += 1;
        summary.soft_failures += usize::from(plan.soft_failure);
        summary.id_conflicts += usize::from(plan.id_conflict);

        writeln!(
            out,
            "{}",
            ctx.format_mapping(&relative(&plan.source, &root), &relative(&plan.destination, &root))
        )?;

        if config.apply {
            apply_plan(&plan, &root, mover)?;
            summary.applied += 1;
        }
        if plan.is_move() {
            claims.vacate(plan.source.clone());
        }
        claims.claim(plan.destination);
    }

    if config.apply {
        writeln!(out, "\n{}", ctx.format_header(&format!("Updated {} note(s).", summary.applied)))?;
    } else {
        writeln!(out, "\n{}", ctx.format_header("Dry run. Re-run with --apply to execute."))?;
    }
    if summary.id_conflicts > 0 {
        writeln!(
            out,
            "{} note(s) keep an id that differs from their file name.",
            summary.id_conflicts
        )?;
    }
    Ok(summary)
}
