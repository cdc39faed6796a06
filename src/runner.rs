use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use camino::Utf8Path;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::config::{self, RunConfig};
use crate::error::DayDirsError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FolderStatus {
    Created,
    AlreadyExists,
    WouldCreate,
}

impl FolderStatus {
    fn as_str(&self) -> &'static str {
        match self {
            FolderStatus::Created => "created",
            FolderStatus::AlreadyExists => "already exists",
            FolderStatus::WouldCreate => "[dry-run] would create",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DestinationStatus {
    Existing,
    Created,
    WouldCreate,
}

/// Tally of what a run did (or would do). Per-folder lines are streamed to the
/// output as they happen, so the report stays the same size for any range.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RunReport {
    pub dry_run: bool,
    pub destination: DestinationStatus,
    created: usize,
    already_existing: usize,
    would_create: usize,
}

impl RunReport {
    fn new(dry_run: bool, destination: DestinationStatus) -> Self {
        Self {
            dry_run,
            destination,
            created: 0,
            already_existing: 0,
            would_create: 0,
        }
    }

    fn record(&mut self, status: FolderStatus) {
        match status {
            FolderStatus::Created => self.created += 1,
            FolderStatus::AlreadyExists => self.already_existing += 1,
            FolderStatus::WouldCreate => self.would_create += 1,
        }
    }

    pub fn count(&self, status: FolderStatus) -> usize {
        match status {
            FolderStatus::Created => self.created,
            FolderStatus::AlreadyExists => self.already_existing,
            FolderStatus::WouldCreate => self.would_create,
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.already_existing + self.would_create
    }

    fn tally(&self) -> String {
        if self.dry_run {
            return format!(
                "Dry-run: {} folders would be created.",
                self.count(FolderStatus::WouldCreate)
            );
        }
        format!(
            "Done: {} created, {} already existed.",
            self.count(FolderStatus::Created),
            self.count(FolderStatus::AlreadyExists)
        )
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = RunConfig::from_cli(&cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    create_folders(&config, &mut out)?;
    Ok(())
}

/// Walk the configured range in order and create one folder per day. The
/// summary is written before any filesystem change. A filesystem failure stops
/// the run; folders created before it are left in place.
pub fn create_folders<W: Write>(config: &RunConfig, out: &mut W) -> Result<RunReport> {
    info!(
        destination = %config.destination,
        start = %config.range.start(),
        end = %config.range.end(),
        dry_run = config.dry_run,
        "starting run"
    );

    write!(out, "{}", config::format_summary(config)).context("writing summary")?;
    writeln!(out).context("writing summary")?;

    let destination = ensure_destination(config, out)?;

    let mut report = RunReport::new(config.dry_run, destination);
    for date in config.range.days() {
        let path = config.destination.join(config.template.render(date));
        let status = create_folder(&path, config.dry_run)?;
        debug!(%date, %path, ?status, "processed folder");
        writeln!(out, "  {} {}", status.as_str(), path)
            .with_context(|| format!("reporting {}", path))?;
        report.record(status);
    }

    writeln!(out).context("writing tally")?;
    writeln!(out, "{}", report.tally()).context("writing tally")?;

    info!(
        created = report.count(FolderStatus::Created),
        existing = report.count(FolderStatus::AlreadyExists),
        planned = report.count(FolderStatus::WouldCreate),
        "run finished"
    );
    Ok(report)
}

fn ensure_destination<W: Write>(config: &RunConfig, out: &mut W) -> Result<DestinationStatus> {
    if config.destination.exists() {
        return Ok(DestinationStatus::Existing);
    }

    writeln!(
        out,
        "Destination does not exist and will be created: {}",
        config.destination
    )
    .context("writing destination notice")?;

    if config.dry_run {
        return Ok(DestinationStatus::WouldCreate);
    }

    make_dir(&config.destination)?;
    info!(destination = %config.destination, "created destination");
    Ok(DestinationStatus::Created)
}

fn create_folder(path: &Utf8Path, dry_run: bool) -> Result<FolderStatus, DayDirsError> {
    if dry_run {
        return Ok(FolderStatus::WouldCreate);
    }
    if path.exists() {
        return Ok(FolderStatus::AlreadyExists);
    }
    make_dir(path)?;
    Ok(FolderStatus::Created)
}

fn make_dir(path: &Utf8Path) -> Result<(), DayDirsError> {
    fs::create_dir_all(path).map_err(|source| DayDirsError::Filesystem {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::{DateRange, parse_date};
    use crate::template::NameTemplate;
    use camino::Utf8PathBuf;
    use clap::Parser;
    use tempfile::TempDir;

    fn temp_root() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    fn run_config(destination: &Utf8Path, start: &str, end: &str, template: &str, dry_run: bool) -> RunConfig {
        RunConfig {
            destination: destination.to_path_buf(),
            range: DateRange::new(parse_date(start).unwrap(), parse_date(end).unwrap()).unwrap(),
            template: NameTemplate::parse(template).unwrap(),
            dry_run,
        }
    }

    fn run_to_string(config: &RunConfig) -> (RunReport, String) {
        let mut out = Vec::new();
        let report = create_folders(config, &mut out).unwrap();
        (report, String::from_utf8(out).unwrap())
    }

    fn entry_count(path: &Utf8Path) -> usize {
        fs::read_dir(path).unwrap().count()
    }

    #[test]
    fn creates_one_folder_per_day() {
        let (_guard, root) = temp_root();
        let cfg = run_config(&root, "2025-09-08", "2025-09-14", "{iso}_{weekday}", false);

        let (report, output) = run_to_string(&cfg);

        assert_eq!(report.destination, DestinationStatus::Existing);
        assert_eq!(report.count(FolderStatus::Created), 7);
        assert_eq!(entry_count(&root), 7);
        assert!(root.join("2025-09-08_Lunes").is_dir());
        assert!(root.join("2025-09-14_Domingo").is_dir());
        assert!(output.contains(&format!("  created {}", root.join("2025-09-10_Miércoles"))));
        assert!(output.contains("Done: 7 created, 0 already existed."));
    }

    #[test]
    fn folder_lines_follow_date_order() {
        let (_guard, root) = temp_root();
        let cfg = run_config(&root, "2025-12-30", "2026-01-02", "{iso}", false);

        let (report, output) = run_to_string(&cfg);

        let reported: Vec<_> = output
            .lines()
            .filter_map(|line| line.strip_prefix("  created "))
            .collect();
        let expected: Vec<_> = cfg
            .range
            .days()
            .map(|date| root.join(date.to_string()).into_string())
            .collect();
        assert_eq!(reported, expected);
        assert_eq!(report.total(), 4);
    }

    #[test]
    fn report_counts_without_keeping_paths() {
        let (_guard, root) = temp_root();
        let dest = root.join("calendar");
        let cfg = run_config(&dest, "1900-01-01", "2099-12-31", "{iso}_{weekday}", true);

        let report = create_folders(&cfg, &mut io::sink()).unwrap();

        assert_eq!(report.count(FolderStatus::WouldCreate), cfg.range.day_count());
        assert_eq!(report.total(), 73_049);
        assert!(!dest.exists());
    }

    #[test]
    fn summary_is_printed_before_folders() {
        let (_guard, root) = temp_root();
        let cfg = run_config(&root, "2025-09-08", "2025-09-08", "{iso}", false);

        let (_, output) = run_to_string(&cfg);

        let summary = output.find("Destination: ").unwrap();
        let folder = output.find("  created ").unwrap();
        assert!(summary < folder);
        assert!(output.contains("Dry-run: false"));
    }

    #[test]
    fn second_run_reports_existing_folders() {
        let (_guard, root) = temp_root();
        let cfg = run_config(&root, "2025-09-08", "2025-09-20", "{dd}-{mm}-{yyyy}", false);

        let (first, _) = run_to_string(&cfg);
        let (second, output) = run_to_string(&cfg);

        assert_eq!(first.count(FolderStatus::Created), 13);
        assert_eq!(second.count(FolderStatus::Created), 0);
        assert_eq!(second.count(FolderStatus::AlreadyExists), 13);
        assert_eq!(entry_count(&root), 13);
        assert!(output.contains(&format!("  already exists {}", root.join("08-09-2025"))));
        assert!(output.contains("Done: 0 created, 13 already existed."));
    }

    #[test]
    fn dry_run_leaves_missing_destination_absent() {
        let (_guard, root) = temp_root();
        let dest = root.join("planner");
        let cfg = run_config(&dest, "2025-09-08", "2026-01-03", "{iso}_{weekday}", true);

        let (report, output) = run_to_string(&cfg);

        assert!(!dest.exists());
        assert_eq!(report.destination, DestinationStatus::WouldCreate);
        assert_eq!(report.count(FolderStatus::WouldCreate), 118);
        assert!(output.contains(&format!("will be created: {}", dest)));
        assert!(output.contains(&format!("  [dry-run] would create {}", dest.join("2025-09-08_Lunes"))));
        assert!(output.contains("Dry-run: 118 folders would be created."));
    }

    #[test]
    fn dry_run_creates_nothing_in_existing_destination() {
        let (_guard, root) = temp_root();
        let cfg = run_config(&root, "2025-09-08", "2025-10-08", "{iso}", true);

        let (report, _) = run_to_string(&cfg);

        assert_eq!(report.destination, DestinationStatus::Existing);
        assert_eq!(report.count(FolderStatus::WouldCreate), 31);
        assert_eq!(entry_count(&root), 0);
    }

    #[test]
    fn missing_destination_is_created_with_parents() {
        let (_guard, root) = temp_root();
        let dest = root.join("a").join("b");
        let cfg = run_config(&dest, "2025-09-08", "2025-09-09", "{iso}", false);

        let (report, _) = run_to_string(&cfg);

        assert_eq!(report.destination, DestinationStatus::Created);
        assert!(dest.join("2025-09-09").is_dir());
    }

    #[test]
    fn slash_in_template_nests_folders() {
        let (_guard, root) = temp_root();
        let cfg = run_config(&root, "2025-12-31", "2026-01-01", "{yyyy}/{mm}/{dd}", false);

        let (report, _) = run_to_string(&cfg);

        assert_eq!(report.count(FolderStatus::Created), 2);
        assert!(root.join("2025/12/31").is_dir());
        assert!(root.join("2026/01/01").is_dir());
    }

    #[test]
    fn filesystem_failure_stops_the_run() {
        let (_guard, root) = temp_root();
        let blocker = root.join("not-a-dir");
        fs::write(&blocker, "x").unwrap();
        let cfg = run_config(&blocker, "2025-09-08", "2025-09-10", "{iso}", false);

        let mut out = Vec::new();
        let err = create_folders(&cfg, &mut out).unwrap_err();

        let Some(DayDirsError::Filesystem { path, .. }) = err.downcast_ref::<DayDirsError>() else {
            panic!("expected filesystem error, got {err:?}");
        };
        assert_eq!(path, &blocker.join("2025-09-08"));
        assert!(!String::from_utf8(out).unwrap().contains("  created "));
    }

    #[test]
    fn reversed_range_aborts_without_creating_anything() {
        let (_guard, root) = temp_root();
        let dest = root.join("out");
        let cli = Cli::try_parse_from([
            "daydirs",
            "--dest",
            dest.as_str(),
            "--start",
            "2025-09-10",
            "--end",
            "2025-09-08",
        ])
        .unwrap();

        let err = run(cli).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DayDirsError>(),
            Some(DayDirsError::RangeOrder { .. })
        ));
        assert!(!dest.exists());
        assert_eq!(entry_count(&root), 0);
    }

    #[test]
    fn invalid_date_aborts_without_creating_anything() {
        let (_guard, root) = temp_root();
        let dest = root.join("out");
        let cli = Cli::try_parse_from(["daydirs", "-d", dest.as_str(), "--start", "2025-02-30"]).unwrap();

        let err = run(cli).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DayDirsError>(),
            Some(DayDirsError::DateParse { .. })
        ));
        assert!(!dest.exists());
    }
}
