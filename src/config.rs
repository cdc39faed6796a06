use std::fmt::Write as _;
use std::path;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

use crate::cli::Cli;
use crate::dates::{self, DateRange};
use crate::error::{DayDirsError, Result};
use crate::template::NameTemplate;

/// Validated settings for one run, built once from the command line.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub destination: Utf8PathBuf,
    pub range: DateRange,
    pub template: NameTemplate,
    pub dry_run: bool,
}

impl RunConfig {
    /// Resolve and validate every CLI input. Nothing touches the filesystem here,
    /// so any error leaves the destination untouched.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let destination = resolve_destination(&cli.dest)?;
        let start = dates::parse_date(&cli.start)?;
        let end = dates::parse_date(&cli.end)?;
        let range = DateRange::new(start, end)?;
        let template = NameTemplate::parse(&cli.format)?;

        Ok(Self {
            destination,
            range,
            template,
            dry_run: cli.dry_run,
        })
    }
}

/// Make `dest` absolute and drop `.`/`..` segments without requiring it to exist.
pub fn resolve_destination(dest: &path::Path) -> Result<Utf8PathBuf> {
    let absolute = path::absolute(dest).map_err(|err| DayDirsError::Destination {
        path: dest.to_path_buf(),
        reason: err.to_string(),
    })?;
    let absolute = Utf8PathBuf::from_path_buf(absolute).map_err(|path| DayDirsError::Destination {
        path,
        reason: "path must be valid UTF-8".to_owned(),
    })?;
    Ok(normalize(&absolute))
}

// Lexical only: symlinks are not followed, so `link/..` drops `link`.
fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_str()),
        }
    }
    out
}

pub fn format_summary(config: &RunConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Destination: {}", config.destination);
    let _ = writeln!(
        out,
        "Range: {} → {} ({} days)",
        config.range.start(),
        config.range.end(),
        config.range.day_count()
    );
    let _ = writeln!(out, "Name format: {}", config.template);
    let _ = writeln!(out, "Dry-run: {}", config.dry_run);
    out
}
