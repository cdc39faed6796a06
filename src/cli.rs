use std::path::PathBuf;

use clap::Parser;

use crate::template::DEFAULT_TEMPLATE;

pub const DEFAULT_START: &str = "2025-09-08";
pub const DEFAULT_END: &str = "2026-01-03";

/// Create one folder per day between two dates inside a destination folder.
#[derive(Parser, Debug)]
#[command(name = "daydirs", version, about = "Create one folder per calendar day")]
pub struct Cli {
    /// Destination folder (defaults to the current directory).
    #[arg(short = 'd', long = "dest", default_value = ".")]
    pub dest: PathBuf,
    /// Start date, inclusive, as YYYY-MM-DD.
    #[arg(long = "start", default_value = DEFAULT_START)]
    pub start: String,
    /// End date, inclusive, as YYYY-MM-DD.
    #[arg(long = "end", default_value = DEFAULT_END)]
    pub end: String,
    /// Folder name format using {iso}, {dd}, {mm}, {yyyy}, {weekday}.
    #[arg(short = 'f', long = "format", default_value = DEFAULT_TEMPLATE)]
    pub format: String,
    /// Report what would be created without touching the filesystem.
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cli = Cli::try_parse_from(["daydirs"]).unwrap();
        assert_eq!(cli.dest, PathBuf::from("."));
        assert_eq!(cli.start, "2025-09-08");
        assert_eq!(cli.end, "2026-01-03");
        assert_eq!(cli.format, "{iso}_{weekday}");
        assert!(!cli.dry_run);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn short_and_long_flags() {
        let cli = Cli::try_parse_from([
            "daydirs",
            "-d",
            "/tmp/out",
            "--start",
            "2025-01-01",
            "--end",
            "2025-01-31",
            "-f",
            "{dd}-{mm}-{yyyy}",
            "--dry-run",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.dest, PathBuf::from("/tmp/out"));
        assert_eq!(cli.start, "2025-01-01");
        assert_eq!(cli.end, "2025-01-31");
        assert_eq!(cli.format, "{dd}-{mm}-{yyyy}");
        assert!(cli.dry_run);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["daydirs", "--force"]).is_err());
    }
}
