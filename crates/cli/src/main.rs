//! Curriculum CLI - import catalogs, record completions, show progress.

use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use curriculum_core::{
    CompletionRecord, CompletionStatus, LearnerId, Lesson, Mission, UnitAvailability,
    UnitId, UnitKind, WeekNumber, WeekStatus,
};
use curriculum_storage::{JsonStorage, Storage, StorageError};
use curriculum_progress::{
    detect_gaps, BasicProgressTracker, CompletionEstimator, ProgressConfig, ProgressMode,
    ProgressTracker, WeekProgressReport,
};

#[derive(Parser)]
#[command(name = "curriculum")]
#[command(about = "Twelve-week curriculum progress tracker", long_about = None)]
struct Cli {
    /// Data directory
    #[arg(long, default_value = ".curriculum")]
    data_dir: PathBuf,

    /// JSON progress configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a JSON catalog of missions and lessons
    Import {
        /// Catalog file
        file: PathBuf,
    },
    /// Mark a unit as started
    Start {
        /// Learner ID
        learner: String,
        /// Unit ID
        unit: String,
        /// Unit kind, needed when a mission and a lesson share the ID
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Mark a unit as completed
    Complete {
        /// Learner ID
        learner: String,
        /// Unit ID
        unit: String,
        /// Unit kind, needed when a mission and a lesson share the ID
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Show week progress
    Progress {
        /// Learner ID
        learner: String,
        /// Track
        #[arg(long)]
        track: String,
        /// Ignore lessons
        #[arg(long)]
        missions_only: bool,
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show weeks skipped over by later progress
    Gaps {
        /// Learner ID
        learner: String,
        /// Track
        #[arg(long)]
        track: String,
    },
    /// List week themes
    Themes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Mission,
    Lesson,
}

impl From<KindArg> for UnitKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Mission => UnitKind::Mission,
            KindArg::Lesson => UnitKind::Lesson,
        }
    }
}

/// Catalog import file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogFile {
    missions: Vec<Mission>,
    lessons: Vec<Lesson>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => ProgressConfig::load(path)
            .await
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ProgressConfig::default(),
    };

    let mut storage = JsonStorage::new(&cli.data_dir)
        .await
        .with_context(|| format!("opening {}", cli.data_dir.display()))?;

    match cli.command {
        Commands::Import { file } => {
            let (missions, lessons) = import_catalog(&mut storage, &file).await?;
            println!("Imported {} missions and {} lessons", missions, lessons);
        }
        Commands::Start { learner, unit, kind } => {
            let kind = kind.map(UnitKind::from);
            let record = record_status(&mut storage, learner.into(), unit.into(), kind, CompletionStatus::InProgress).await?;
            println!("Started {} {} for {}", record.kind.as_str(), record.unit_id, record.learner_id);
        }
        Commands::Complete { learner, unit, kind } => {
            let kind = kind.map(UnitKind::from);
            let record = record_status(&mut storage, learner.into(), unit.into(), kind, CompletionStatus::Completed).await?;
            println!("Completed {} {} for {}", record.kind.as_str(), record.unit_id, record.learner_id);
        }
        Commands::Progress { learner, track, missions_only, json } => {
            let mode = if missions_only { ProgressMode::MissionsOnly } else { config.default_mode };
            let estimator = CompletionEstimator::new(config.study_minutes_per_day);
            let tracker = BasicProgressTracker::with_config(storage, config);
            let snapshot = tracker.snapshot(&learner.into(), &track.into(), mode).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_report(&snapshot.report, &estimator, snapshot.timestamp);
            }
        }
        Commands::Gaps { learner, track } => {
            let mode = config.default_mode;
            let tracker = BasicProgressTracker::with_config(storage, config);
            let report = tracker.week_progress(&learner.into(), &track.into(), mode).await?;
            let gaps = detect_gaps(&report);

            if gaps.is_sequential() {
                println!("No skipped weeks");
            } else {
                println!("Skipped weeks ({})", gaps.stats.gap_weeks);
                for gap in &gaps.gaps {
                    println!(
                        "  Week {:>2} | {} | {} units pending, progress resumes in week {}",
                        gap.week,
                        format_week_status(gap.status),
                        gap.pending_units,
                        gap.skipped_to,
                    );
                }
            }
        }
        Commands::Themes => {
            for week in WeekNumber::all() {
                let theme = week.theme();
                println!("  Week {:>2} | {} - {}", week, theme.name, theme.tagline);
            }
        }
    }

    Ok(())
}

async fn import_catalog(storage: &mut impl Storage, file: &Path) -> Result<(usize, usize)> {
    let json = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    let catalog: CatalogFile = serde_json::from_str(&json)
        .with_context(|| format!("parsing {}", file.display()))?;

    for mission in &catalog.missions {
        storage.save_mission(mission).await?;
    }
    for lesson in &catalog.lessons {
        storage.save_lesson(lesson).await?;
    }

    info!(
        "Imported {} missions and {} lessons from {}",
        catalog.missions.len(),
        catalog.lessons.len(),
        file.display()
    );
    Ok((catalog.missions.len(), catalog.lessons.len()))
}

/// Resolve the unit kind from the catalog and store a new record.
async fn record_status(
    storage: &mut impl Storage,
    learner: LearnerId,
    unit: UnitId,
    requested: Option<UnitKind>,
    status: CompletionStatus,
) -> Result<CompletionRecord> {
    let kind = unit_kind(&*storage, &unit, requested).await?;
    let record = match kind {
        UnitKind::Mission => CompletionRecord::mission(learner, unit, status),
        UnitKind::Lesson if status == CompletionStatus::Completed => {
            CompletionRecord::lesson(learner, unit, Some(chrono::Utc::now()))
        }
        UnitKind::Lesson => anyhow::bail!("lessons can only be marked completed"),
    };

    storage.save_completion(&record).await?;
    info!("Recorded {} for {} on {}", status.as_str(), record.learner_id, record.unit_id);
    Ok(record)
}

/// Find which catalog holds `unit`, honoring an explicit kind.
async fn unit_kind(storage: &impl Storage, unit: &UnitId, requested: Option<UnitKind>) -> Result<UnitKind> {
    let is_mission = storage.load_mission(unit).await?.is_some();
    let is_lesson = storage.load_lesson(unit).await?.is_some();

    match (requested, is_mission, is_lesson) {
        (Some(UnitKind::Mission), true, _) | (None, true, false) => Ok(UnitKind::Mission),
        (Some(UnitKind::Lesson), _, true) | (None, false, true) => Ok(UnitKind::Lesson),
        (None, true, true) => {
            anyhow::bail!("{} is both a mission and a lesson, pass --kind", unit)
        }
        (Some(kind), _, _) => {
            Err(StorageError::NotFound(format!("unknown {} {}", kind.as_str(), unit)).into())
        }
        (None, false, false) => Err(StorageError::NotFound(format!("unknown unit {}", unit)).into()),
    }
}

fn print_report(report: &WeekProgressReport, estimator: &CompletionEstimator, now: chrono::DateTime<chrono::Utc>) {
    let summary = &report.summary;
    println!(
        "Progress: {}% ({}/{} units), current week {}",
        summary.overall_progress_percent, summary.total_completed, summary.total_units, summary.current_week
    );

    for (week, estimate) in report.weeks.iter().zip(estimator.estimate(report)) {
        let theme = week.week.theme();
        println!(
            "  Week {:>2} | {:<11} | {}/{} | {} | {} min left",
            week.week,
            format_week_status(week.status),
            week.completed_units,
            week.total_units,
            theme.name,
            estimate.remaining_minutes,
        );
        for unit in &week.units {
            println!(
                "      {} {} [{}]",
                unit.kind.as_str(),
                unit.id,
                format_availability(unit.availability)
            );
        }
    }

    if report.dropped_units > 0 {
        println!("  ({} units without a week were skipped)", report.dropped_units);
    }
    if let Some(finish) = estimator.projected_finish(report, now) {
        println!("Projected finish: {}", finish.format("%Y-%m-%d"));
    }
}

fn format_week_status(status: WeekStatus) -> &'static str {
    match status {
        WeekStatus::Completed => "COMPLETED",
        WeekStatus::InProgress => "IN PROGRESS",
        WeekStatus::Current => "CURRENT",
        WeekStatus::Locked => "LOCKED",
    }
}

fn format_availability(availability: UnitAvailability) -> &'static str {
    match availability {
        UnitAvailability::Completed => "done",
        UnitAvailability::InProgress => "started",
        UnitAvailability::Available => "open",
        UnitAvailability::Locked => "locked",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn imported_storage(dir: &Path) -> JsonStorage {
        let catalog = dir.join("catalog.json");
        tokio::fs::write(
            &catalog,
            r#"{
                "missions": [
                    {"id": "m1", "track": "builder", "week": 1, "day": 1, "title": "Kickoff"},
                    {"id": "x", "track": "builder", "week": 1, "day": 2, "title": "Shared"}
                ],
                "lessons": [
                    {"id": "l1", "module_id": "intro", "title": "Welcome", "order": 1},
                    {"id": "x", "module_id": "intro", "title": "Shared", "order": 4}
                ]
            }"#,
        )
        .await
        .unwrap();

        let mut storage = JsonStorage::new(dir.join("data")).await.unwrap();
        assert_eq!(import_catalog(&mut storage, &catalog).await.unwrap(), (2, 2));
        storage
    }

    #[tokio::test]
    async fn test_import_and_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = imported_storage(dir.path()).await;

        let record = record_status(&mut storage, "ana".into(), "l1".into(), None, CompletionStatus::Completed)
            .await
            .unwrap();
        assert_eq!(record.kind, UnitKind::Lesson);
        assert!(record.completed_at.is_some());

        let started = record_status(&mut storage, "ana".into(), "l1".into(), None, CompletionStatus::InProgress).await;
        assert!(started.is_err());

        let record = record_status(&mut storage, "ana".into(), "m1".into(), None, CompletionStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(record.kind, UnitKind::Mission);
    }

    #[tokio::test]
    async fn test_unknown_unit_rejected_without_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = imported_storage(dir.path()).await;
        let learner = LearnerId::new("ana");

        let result = record_status(&mut storage, learner.clone(), "no-such-unit".into(), None, CompletionStatus::Completed).await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("unknown unit no-such-unit"));

        let wrong_kind = record_status(&mut storage, learner.clone(), "m1".into(), Some(UnitKind::Lesson), CompletionStatus::Completed).await;
        assert!(wrong_kind.is_err());

        assert!(storage.list_completions(&learner).await.unwrap().is_empty());
        assert_eq!(storage.completions_version(&learner).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_shared_id_needs_kind() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = imported_storage(dir.path()).await;
        let learner = LearnerId::new("ana");

        let ambiguous = record_status(&mut storage, learner.clone(), "x".into(), None, CompletionStatus::Completed).await;
        assert!(ambiguous.is_err());

        let record = record_status(&mut storage, learner.clone(), "x".into(), Some(UnitKind::Mission), CompletionStatus::Completed)
            .await
            .unwrap();
        assert_eq!(record.kind, UnitKind::Mission);

        let tracker = BasicProgressTracker::new(storage);
        let report = tracker.hybrid_progress(&learner, &"builder".into()).await.unwrap();
        assert_eq!(report.summary.total_completed, 1);
        assert_eq!(report.weeks[0].completed_units, 1);
        assert_eq!(report.weeks[1].completed_units, 0);
        assert_eq!(report.weeks[1].status, WeekStatus::Locked);
    }

    #[test]
    fn test_cli_parses_progress() {
        let cli = Cli::try_parse_from(["curriculum", "progress", "ana", "--track", "builder", "--missions-only"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Progress { missions_only: true, json: false, .. }
        ));
    }

    #[test]
    fn test_cli_parses_kind() {
        let cli = Cli::try_parse_from(["curriculum", "complete", "ana", "x", "--kind", "lesson"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Complete { kind: Some(KindArg::Lesson), .. }
        ));
    }
}
