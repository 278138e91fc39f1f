use std::error::Error;
use std::path::PathBuf;

use crate::config::{Config, normalize_host, parse_duration};

pub struct ArgParser {
    iter: std::vec::IntoIter<String>,
    command_name: String,
}

impl ArgParser {
    pub fn new(args: Vec<String>, command_name: &str) -> Self {
        Self { iter: args.into_iter(), command_name: command_name.to_string() }
    }

    /// Extract a string value for a flag
    pub fn extract_value(
        &mut self,
        flag: &str,
    ) -> Result<String, Box<dyn Error>> {
        self.iter.next().ok_or_else(|| {
            format!("Provide a value after {} for {}", flag, self.command_name)
                .into()
        })
    }

    /// Extract a non-negative integer for a flag
    pub fn extract_number(
        &mut self,
        flag: &str,
    ) -> Result<usize, Box<dyn Error>> {
        let raw = self.extract_value(flag)?;
        raw.trim().parse().map_err(|_| {
            format!("Invalid number for {flag}: {raw}").into()
        })
    }

    /// Get next positional argument
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<String> {
        self.iter.next()
    }

    /// Collect remaining args
    pub fn collect_remaining(self) -> Vec<String> {
        self.iter.collect()
    }
}

/// What the command line asked for.
#[derive(Debug, PartialEq)]
pub enum Command {
    Run(Config),
    Help(Vec<String>),
    Guide(Vec<String>),
}

/// Pick the subcommand (`run` is the default) and overlay run flags onto
/// `base`.
pub fn parse_command(
    args: Vec<String>,
    base: Config,
) -> Result<Command, Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "run");
    let mut rest = Vec::new();
    match parser.next() {
        Some(cmd) if cmd == "help" => {
            return Ok(Command::Help(parser.collect_remaining()));
        }
        Some(cmd) if cmd == "guide" || cmd == "guides" => {
            return Ok(Command::Guide(parser.collect_remaining()));
        }
        Some(cmd) if cmd == "run" => {}
        Some(other) => rest.push(other),
        None => {}
    }
    rest.extend(parser.collect_remaining());
    parse_run_flags(rest, base)
}

pub fn parse_run_flags(
    args: Vec<String>,
    mut config: Config,
) -> Result<Command, Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "run");
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "--root" => config.root = PathBuf::from(parser.extract_value(&arg)?),
            "--base-dir" => {
                let dir = parser.extract_value(&arg)?;
                config.base_dir = Some(dir.trim_matches('/').to_string())
                    .filter(|d| !d.is_empty());
            }
            "--model" => config.model = parser.extract_value(&arg)?,
            "--host" => config.host = normalize_host(&parser.extract_value(&arg)?),
            "--max-slug" => config.max_slug = parser.extract_number(&arg)?,
            "--max-file" => config.max_basename = parser.extract_number(&arg)?,
            "--excerpt" => config.excerpt_chars = parser.extract_number(&arg)?,
            "--timeout" => config.timeout = parse_duration(&parser.extract_value(&arg)?)?,
            "--collection" => config.collection = parser.extract_value(&arg)?,
            "--apply" => config.apply = true,
            "--only-readme" => config.only_readme = true,
            "--readme-any" => config.readme_any = true,
            "--offline" => config.offline = true,
            "--no-git" => config.use_git = false,
            "--plain" => config.plain = true,
            "-h" | "--help" => return Ok(Command::Help(vec!["run".to_string()])),
            other => return Err(format!("Unknown option for run: {other}").into()),
        }
    }
    config.validate()?;
    Ok(Command::Run(config))
}
