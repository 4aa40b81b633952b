//! Sync orchestrator.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::classify::MediaKind;
use crate::config::{ConfigError, SyncConfig};
use crate::converter::{ConversionJob, Converter};
use crate::copier::VerbatimCopier;
use crate::exclude::{to_slash_path, ExclusionMatcher};
use crate::mapper::PathMapper;
use crate::pool::{ConversionPool, JobOutcome, PoolConfig};

use super::config::SyncSettings;
use super::error::SyncError;
use super::types::{
    ActionLogEntry, ConversionFailure, FileDisposition, SkipReason, SyncOptions, SyncProgress,
    SyncReport,
};
use super::walk::{collect_entries, FileEntry};

/// How a synced file gets to the mirror.
#[derive(Debug, Clone, Copy)]
enum Dispatch {
    Convert,
    Copy,
}

/// Mirrors a source tree into a destination tree.
///
/// The orchestrator owns no per-run state, so `run` can be called again
/// against the same trees. Files whose mirror already exists are left alone.
pub struct SyncOrchestrator<C: Converter + ?Sized> {
    config: SyncConfig,
    settings: SyncSettings,
    pool_config: PoolConfig,
    converter: Arc<C>,
    mapper: PathMapper,
    exclusions: ExclusionMatcher,
    copier: VerbatimCopier,
    progress_tx: Option<mpsc::Sender<SyncProgress>>,
}

impl<C: Converter + ?Sized + 'static> SyncOrchestrator<C> {
    /// Creates an orchestrator. Fails if an exclusion pattern does not compile.
    pub fn new(config: SyncConfig, converter: Arc<C>) -> Result<Self, SyncError> {
        let exclusions = ExclusionMatcher::new(config.excludes.as_slice()).map_err(|e| {
            SyncError::Config(ConfigError::ValidationError(format!(
                "invalid exclusion pattern: {}",
                e
            )))
        })?;
        let mapper = PathMapper::new(&config.source, &config.destination);

        Ok(Self {
            config,
            settings: SyncSettings::default(),
            pool_config: PoolConfig::default(),
            converter,
            mapper,
            exclusions,
            copier: VerbatimCopier::default(),
            progress_tx: None,
        })
    }

    pub fn with_settings(mut self, settings: SyncSettings) -> Self {
        self.copier = VerbatimCopier::new(settings.verify_copies);
        self.settings = settings;
        self
    }

    pub fn with_pool_config(mut self, pool_config: PoolConfig) -> Self {
        self.pool_config = pool_config;
        self
    }

    /// Sends [`SyncProgress`] events to `tx` during each run.
    pub fn with_progress(mut self, tx: mpsc::Sender<SyncProgress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Runs one sync.
    ///
    /// Conversions still in flight when the walk stops, for whatever reason,
    /// are always waited for before this returns.
    pub async fn run(&self, options: &SyncOptions) -> Result<SyncReport, SyncError> {
        let started = Instant::now();

        if let Some(event) = &options.include_event {
            warn!(
                "Event filter '{}' is not supported yet, syncing everything",
                event
            );
        }

        info!(
            source = %self.config.source.display(),
            destination = %self.config.destination.display(),
            include = %options.include,
            dry_run = options.dry_run,
            "Starting sync"
        );

        let entries = self.walk(&options.include).await?;
        self.emit(SyncProgress::Started {
            total: entries.len(),
        })
        .await;

        let mut pool = ConversionPool::new(Arc::clone(&self.converter), self.pool_config.clone());
        info!(
            "Found {} candidate files, converting with up to {} workers",
            entries.len(),
            pool.max_concurrency()
        );

        let mut report = SyncReport::new(options.dry_run);
        let mut fatal: Option<SyncError> = None;
        // Destinations claimed by this run, so two sources never share an output.
        let mut claimed: HashSet<PathBuf> = HashSet::new();

        for entry in &entries {
            match self
                .process_entry(entry, &mut pool, &mut report, &mut claimed, options.dry_run)
                .await
            {
                Ok(disposition) => report.record(disposition),
                Err(e) => {
                    error!("Stopping sync at {}: {}", entry.relative_path.display(), e);
                    fatal = Some(e);
                    break;
                }
            }

            let finished = pool.try_reap();
            if let Err(e) = self.collect_outcomes(finished, &mut report).await {
                error!("Stopping sync after failed conversion: {}", e);
                fatal = Some(e);
                break;
            }
        }

        let outstanding = pool.outstanding();
        if outstanding > 0 {
            info!("Waiting for {} conversions to finish", outstanding);
            self.emit(SyncProgress::Draining { outstanding }).await;
        }
        let finished = pool.drain().await;
        if let Err(e) = self.collect_outcomes(finished, &mut report).await {
            fatal.get_or_insert(e);
        }

        report.pool = pool.status();
        report.elapsed_ms = started.elapsed().as_millis() as u64;
        self.emit(SyncProgress::Finished).await;

        if let Some(e) = fatal {
            return Err(e);
        }

        info!(
            submitted = report.submitted,
            converted = report.converted,
            copied = report.copied,
            planned = report.planned,
            already_exists = report.already_exists,
            excluded = report.excluded,
            ignored = report.ignored,
            failed = report.failures.len(),
            elapsed_ms = report.elapsed_ms,
            "Sync finished"
        );

        Ok(report)
    }

    async fn walk(&self, include: &str) -> Result<Vec<FileEntry>, SyncError> {
        let source = self.config.source.clone();
        let include = include.to_string();

        tokio::task::spawn_blocking(move || collect_entries(&source, &include))
            .await
            .map_err(|e| SyncError::WalkInterrupted(e.to_string()))?
    }

    /// Decides what happens to one file and carries it out.
    async fn process_entry(
        &self,
        entry: &FileEntry,
        pool: &mut ConversionPool<C>,
        report: &mut SyncReport,
        claimed: &mut HashSet<PathBuf>,
        dry_run: bool,
    ) -> Result<FileDisposition, SyncError> {
        let relative = &entry.relative_path;

        if self.exclusions.is_excluded(relative) {
            debug!("Excluded: {}", relative.display());
            self.skipped(relative, SkipReason::Excluded).await;
            return Ok(FileDisposition::Excluded);
        }

        let kind = entry.kind();
        let dispatch = match kind {
            MediaKind::ConvertibleImage => Dispatch::Convert,
            MediaKind::VerbatimMedia => Dispatch::Copy,
            MediaKind::Ignorable => {
                debug!("Ignored: {}", relative.display());
                self.skipped(relative, SkipReason::Ignorable).await;
                return Ok(FileDisposition::Ignored);
            }
            MediaKind::Unrecognized => {
                return Err(SyncError::UnrecognizedFormat {
                    path: entry.absolute_path.clone(),
                })
            }
        };

        let destination = self.mapper.destination_for(relative, kind).ok_or_else(|| {
            SyncError::UnrecognizedFormat {
                path: entry.absolute_path.clone(),
            }
        })?;

        if claimed.contains(&destination) {
            debug!(
                "Destination of {} already claimed in this run",
                relative.display()
            );
            self.skipped(relative, SkipReason::AlreadyExists).await;
            return Ok(FileDisposition::AlreadyExists);
        }

        if !dry_run {
            if let Some(dir) = destination.parent() {
                tokio::fs::create_dir_all(dir)
                    .await
                    .map_err(|e| SyncError::filesystem(dir, e))?;
            }
        }

        let exists = tokio::fs::try_exists(&destination)
            .await
            .map_err(|e| SyncError::filesystem(&destination, e))?;
        if exists {
            debug!("Already mirrored: {}", relative.display());
            self.skipped(relative, SkipReason::AlreadyExists).await;
            return Ok(FileDisposition::AlreadyExists);
        }

        let action = ActionLogEntry {
            source: relative.clone(),
            destination: self
                .mapper
                .relative_to_destination(&destination)
                .unwrap_or(&destination)
                .to_path_buf(),
            kind,
        };

        claimed.insert(destination.clone());

        let disposition = if dry_run {
            FileDisposition::Planned
        } else {
            match dispatch {
                Dispatch::Convert => {
                    let job = ConversionJob::new(
                        to_slash_path(relative),
                        entry.absolute_path.clone(),
                        destination,
                    );
                    pool.submit(job).await.map_err(|_| SyncError::PoolClosed)?;
                    FileDisposition::Submitted
                }
                Dispatch::Copy => {
                    let copied = self
                        .copier
                        .copy(&entry.absolute_path, &destination)
                        .await
                        .map_err(|e| SyncError::Copy {
                            path: relative.clone(),
                            source: e,
                        })?;
                    debug!(
                        "Copied {} ({} bytes)",
                        relative.display(),
                        copied.bytes_copied
                    );
                    FileDisposition::Copied
                }
            }
        };

        info!("{}", action);
        report.actions.push(action.clone());
        self.emit(SyncProgress::Action(action)).await;

        Ok(disposition)
    }

    /// Records finished conversions. Under the abort policy, returns the
    /// first failure as an error after recording all of them.
    async fn collect_outcomes(
        &self,
        outcomes: Vec<JobOutcome>,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        let mut first_error = None;

        for outcome in outcomes {
            let JobOutcome { job, result } = outcome;
            let error = match result {
                Ok(_) => {
                    report.converted += 1;
                    continue;
                }
                Err(e) => e,
            };

            let source = self.relative_source(&job.input_path);
            let failure = ConversionFailure {
                source: source.clone(),
                destination: self
                    .mapper
                    .relative_to_destination(&job.output_path)
                    .unwrap_or(&job.output_path)
                    .to_path_buf(),
                error: error.to_string(),
                stderr: error.stderr().map(str::to_string),
            };

            warn!("Conversion of {} failed: {}", source.display(), error);
            report.failures.push(failure.clone());
            self.emit(SyncProgress::ConversionFailed(failure)).await;

            if self.settings.aborts_on_failure() && first_error.is_none() {
                first_error = Some(SyncError::ConversionFailed {
                    path: source,
                    source: error,
                });
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn relative_source(&self, path: &Path) -> PathBuf {
        self.mapper
            .relative_to_source(path)
            .unwrap_or(path)
            .to_path_buf()
    }

    async fn skipped(&self, path: &Path, reason: SkipReason) {
        self.emit(SyncProgress::Skipped {
            path: path.to_path_buf(),
            reason,
        })
        .await;
    }

    async fn emit(&self, event: SyncProgress) {
        if let Some(tx) = &self.progress_tx {
            // A closed receiver only means nobody is watching.
            let _ = tx.send(event).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::FailurePolicy;
    use crate::testing::fixtures::{list_files, write_file};
    use crate::testing::MockConverter;
    use tempfile::TempDir;

    struct Trees {
        _dir: TempDir,
        source: PathBuf,
        destination: PathBuf,
    }

    fn trees() -> Trees {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        let destination = dir.path().join("mirror");
        std::fs::create_dir_all(&source).unwrap();
        Trees {
            _dir: dir,
            source,
            destination,
        }
    }

    fn orchestrator(trees: &Trees, converter: &MockConverter) -> SyncOrchestrator<MockConverter> {
        SyncOrchestrator::new(
            SyncConfig::new(&trees.source, &trees.destination),
            Arc::new(converter.clone()),
        )
        .unwrap()
        .with_pool_config(PoolConfig::default().with_max_concurrency(2))
    }

    #[tokio::test]
    async fn test_converts_and_copies() {
        let t = trees();
        write_file(&t.source, "2023/photo.JPG", b"jpeg");
        write_file(&t.source, "2023/clip.MOV", b"video");
        write_file(&t.source, "2023/raw.CR3", b"raw");

        let converter = MockConverter::new();
        let report = orchestrator(&t, &converter)
            .run(&SyncOptions::default())
            .await
            .unwrap();

        assert_eq!(list_files(&t.destination), vec!["2023/clip.MOV", "2023/photo.HEIC"]);
        assert_eq!(report.submitted, 1);
        assert_eq!(report.converted, 1);
        assert_eq!(report.copied, 1);
        assert_eq!(report.ignored, 1);
        assert_eq!(
            std::fs::read(t.destination.join("2023/clip.MOV")).unwrap(),
            b"video"
        );
    }

    #[tokio::test]
    async fn test_unrecognized_format_is_fatal() {
        let t = trees();
        write_file(&t.source, "a.jpg", b"x");
        write_file(&t.source, "b.txt", b"x");
        write_file(&t.source, "c.jpg", b"x");

        let converter = MockConverter::new();
        let err = orchestrator(&t, &converter)
            .run(&SyncOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::UnrecognizedFormat { ref path } if path.ends_with("b.txt")));
        // a.jpg was drained, c.jpg never dispatched
        assert_eq!(list_files(&t.destination), vec!["a.HEIC"]);
        assert_eq!(converter.conversion_count().await, 1);
    }

    #[tokio::test]
    async fn test_excluded_unrecognized_file_is_not_fatal() {
        let t = trees();
        write_file(&t.source, "notes/todo.txt", b"x");
        write_file(&t.source, "a.jpg", b"x");

        let converter = MockConverter::new();
        let report = SyncOrchestrator::new(
            SyncConfig::new(&t.source, &t.destination).with_excludes(["notes/*"]),
            Arc::new(converter.clone()),
        )
        .unwrap()
        .run(&SyncOptions::default())
        .await
        .unwrap();

        assert_eq!(report.excluded, 1);
        assert_eq!(report.submitted, 1);
    }

    #[tokio::test]
    async fn test_report_policy_keeps_going() {
        let t = trees();
        write_file(&t.source, "bad.jpg", b"x");
        write_file(&t.source, "good.jpg", b"x");

        let converter = MockConverter::new();
        converter.fail_on("bad.jpg").await;

        let report = orchestrator(&t, &converter)
            .run(&SyncOptions::default())
            .await
            .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source, PathBuf::from("bad.jpg"));
        assert_eq!(report.failures[0].destination, PathBuf::from("bad.HEIC"));
        assert!(report.failures[0].stderr.is_some());
        assert_eq!(report.converted, 1);
        assert!(report.has_failures());
    }

    #[tokio::test]
    async fn test_abort_policy_fails_run() {
        let t = trees();
        write_file(&t.source, "bad.jpg", b"x");

        let converter = MockConverter::new();
        converter.fail_on("bad.jpg").await;

        let err = orchestrator(&t, &converter)
            .with_settings(SyncSettings::default().with_failure_policy(FailurePolicy::Abort))
            .run(&SyncOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::ConversionFailed { .. }));
    }

    #[tokio::test]
    async fn test_progress_events() {
        let t = trees();
        write_file(&t.source, "a.jpg", b"x");
        write_file(&t.source, "b.dng", b"x");

        let (tx, mut rx) = mpsc::channel(16);
        let converter = MockConverter::new();
        orchestrator(&t, &converter)
            .with_progress(tx)
            .run(&SyncOptions::default())
            .await
            .unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }

        assert_eq!(events.first(), Some(&SyncProgress::Started { total: 2 }));
        assert_eq!(events.last(), Some(&SyncProgress::Finished));
        assert!(events.iter().any(|e| matches!(e, SyncProgress::Action(a) if a.source == PathBuf::from("a.jpg"))));
        assert!(events.contains(&SyncProgress::Skipped {
            path: PathBuf::from("b.dng"),
            reason: SkipReason::Ignorable,
        }));
    }

    #[tokio::test]
    async fn test_include_event_is_accepted() {
        let t = trees();
        write_file(&t.source, "a.jpg", b"x");

        let converter = MockConverter::new();
        let report = orchestrator(&t, &converter)
            .run(&SyncOptions::default().with_include_event("2024-06-01"))
            .await
            .unwrap();
        assert_eq!(report.submitted, 1);
    }
}
