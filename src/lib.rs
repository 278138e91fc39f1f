//! Rename timestamped Markdown notes to `<id>-<slug>.md` and normalize their
//! frontmatter, with titles, slugs and tags suggested by a local model.

use std::env;
use std::error::Error;
use std::io;

pub mod args;
pub mod config;
pub mod formatting;
pub mod frontmatter;
mod help;
pub mod identity;
pub mod note;
pub mod run;
pub mod select;
pub mod slug;
pub mod suggest;
pub mod tags;
pub mod vcs;

use args::{Command, parse_command};
use config::Config;
use formatting::FormatContext;
use suggest::{Offline, OllamaClient, Suggester};
use vcs::{FsMover, GitMover, Mover};

pub fn entry() -> Result<(), Box<dyn Error>> {
    init_logging();
    let args: Vec<String> = env::args().skip(1).collect();
    match parse_command(args, Config::from_env())? {
        Command::Help(topic) => help::run(topic),
        Command::Guide(topic) => help::run_guides(topic),
        Command::Run(config) => rename_notes(&config),
    }
}

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn");
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

fn rename_notes(config: &Config) -> Result<(), Box<dyn Error>> {
    let suggester: Box<dyn Suggester> = if config.offline {
        Box::new(Offline)
    } else {
        Box::new(OllamaClient::new(&config.host, &config.model)?)
    };
    let mover: Box<dyn Mover> = if config.use_git {
        Box::new(GitMover)
    } else {
        Box::new(FsMover)
    };
    log::debug!(
        "suggestions from {}, moves via {}",
        suggester.name(),
        if config.use_git { "git mv" } else { "rename" }
    );

    let ctx = FormatContext::new(!config.plain);
    let mut out = io::stdout().lock();
    let summary =
        run::run(config, suggester.as_ref(), mover.as_ref(), &ctx, &mut out)?;
    log::info!(
        "{} planned, {} applied, {} skipped, {} without suggestion",
        summary.planned,
        summary.applied,
        summary.skipped,
        summary.soft_failures
    );
    Ok(())
}
