//! Batch orchestration: one worker pool, one bounded channel, one writer.
//!
//! Every piece of state lives in the orchestrator for one `run`, so several
//! batches can run side by side in one process.

use crate::progress::BatchProgress;
use crate::writer::{FailedResult, FileOutcome, Message, ProcessedResult, ResultWriter, WriterReport};
use crossbeam_channel::bounded;
use gast_core::config::{BatchConfig, GenerateConfig};
use gast_core::storage::OutputPaths;
use gast_parser::{Language, Normalized, ParseFailure, generate_source};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Why a single file ended up in the failure stream.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("cannot read file: {0}")]
    Read(#[from] std::io::Error),
    #[error("file is not valid UTF-8")]
    Encoding,
    #[error("unsupported file extension")]
    Unsupported,
    #[error(transparent)]
    Parse(#[from] ParseFailure),
    #[error("panic while normalizing: {0}")]
    Panic(String),
}

/// Errors that abort a whole run.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("setup error: {0}")]
    Setup(String),
    #[error("cannot create output streams for {}: {source}", stem.display())]
    Output {
        stem: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("result writer failed: {0}")]
    Writer(std::io::Error),
    #[error("result writer thread panicked")]
    WriterPanicked,
}

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub success_count: usize,
    pub failure_count: usize,
    pub gap_count: usize,
    pub write_errors: usize,
    pub elapsed: Duration,
}

impl Summary {
    fn from_report(report: WriterReport, elapsed: Duration) -> Self {
        Self {
            success_count: report.success,
            failure_count: report.failure,
            gap_count: report.gap_count,
            write_errors: report.write_errors,
            elapsed,
        }
    }
}

pub struct BatchOrchestrator {
    batch: BatchConfig,
    generate: GenerateConfig,
    language: Option<Language>,
}

impl BatchOrchestrator {
    pub fn new(batch: BatchConfig, generate: GenerateConfig) -> Self {
        Self {
            batch,
            generate,
            language: None,
        }
    }

    /// Treat every file as `language` instead of detecting it by extension.
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Normalize `files` and write the three streams derived from `output`.
    pub fn run(&self, files: &[PathBuf], output: &Path) -> Result<Summary, BatchError> {
        let started = Instant::now();
        let paths = OutputPaths::from_stem(output);
        paths
            .ensure_parent()
            .map_err(|e| BatchError::Setup(format!("{e:#}")))?;

        let mut writer = ResultWriter::create(&paths, files.len(), self.batch.progress_every)
            .map_err(|source| BatchError::Output {
                stem: output.to_path_buf(),
                source,
            })?;
        if self.batch.progress_bar {
            writer = writer.with_progress(BatchProgress::new(files.len() as u64));
        }

        let workers = self.batch.effective_workers();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .stack_size(self.batch.stack_size_mb << 20)
            .thread_name(|i| format!("gast-worker-{i}"))
            .build()?;
        info!(
            files = files.len(),
            workers,
            granularity = %self.generate.granularity,
            "starting batch"
        );

        let (tx, rx) = bounded::<Message>(self.batch.channel_capacity);
        let report = std::thread::scope(|scope| {
            let consumer = scope.spawn(move || writer.drain(&rx));

            pool.install(|| {
                files.par_iter().for_each_with(tx.clone(), |tx, path| {
                    // A closed channel means the writer is gone; its error
                    // surfaces from join below.
                    let _ = tx.send(Message::Outcome(self.process_file(path)));
                });
            });
            let _ = tx.send(Message::Finished);
            drop(tx);

            consumer.join()
        });

        let report = match report {
            Ok(Ok(report)) => report,
            Ok(Err(e)) => return Err(BatchError::Writer(e)),
            Err(_) => return Err(BatchError::WriterPanicked),
        };

        let summary = Summary::from_report(report, started.elapsed());
        info!(
            success = summary.success_count,
            failure = summary.failure_count,
            gaps = summary.gap_count,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "batch finished"
        );
        Ok(summary)
    }

    /// Parse and normalize one file. Never panics and never returns an error:
    /// every problem becomes a [`FailedResult`].
    pub fn process_file(&self, path: &Path) -> FileOutcome {
        let filename = path.display().to_string();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.normalize_file(path)))
            .unwrap_or_else(|payload| Err(FileError::Panic(panic_message(payload.as_ref()))));

        match result {
            Ok(normalized) => {
                let len = normalized.table.len();
                if !self.generate.within_bounds(len) {
                    debug!(file = %filename, nodes = len, "node count outside configured bounds");
                }
                FileOutcome::Processed(ProcessedResult {
                    gaps: normalized.gap_count(),
                    table: normalized.table,
                    filename,
                })
            }
            Err(e) => {
                debug!(file = %filename, error = %e, "file failed");
                FileOutcome::Failed(FailedResult {
                    filename,
                    reason: e.to_string(),
                })
            }
        }
    }

    fn normalize_file(&self, path: &Path) -> Result<Normalized, FileError> {
        let language = self
            .language
            .or_else(|| Language::from_path(path))
            .ok_or(FileError::Unsupported)?;
        let bytes = std::fs::read(path)?;
        let source = String::from_utf8(bytes).map_err(|_| FileError::Encoding)?;
        Ok(generate_source(language, &source, &self.generate)?)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_process_file_classifies_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("ok.py");
        let bad = dir.path().join("bad.py");
        let binary = dir.path().join("blob.c");
        let other = dir.path().join("notes.md");
        fs::write(&good, "x = 1\n").unwrap();
        fs::write(&bad, "def f(:\n").unwrap();
        fs::write(&binary, [0xff, 0xfe, 0x00]).unwrap();
        fs::write(&other, "# hi\n").unwrap();

        let orchestrator = BatchOrchestrator::new(BatchConfig::default(), GenerateConfig::default());
        assert!(matches!(orchestrator.process_file(&good), FileOutcome::Processed(_)));

        let reason = |path: &Path| match orchestrator.process_file(path) {
            FileOutcome::Failed(f) => f.reason,
            FileOutcome::Processed(_) => panic!("{} should fail", path.display()),
        };
        assert!(reason(&bad).starts_with("syntax error"));
        assert_eq!(reason(&binary), "file is not valid UTF-8");
        assert_eq!(reason(&other), "unsupported file extension");
        assert!(reason(&dir.path().join("missing.py")).starts_with("cannot read file"));
    }

    #[test]
    fn test_forced_language_ignores_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.txt");
        fs::write(&path, "print(1)\n").unwrap();

        let orchestrator = BatchOrchestrator::new(BatchConfig::default(), GenerateConfig::default())
            .with_language(Language::Python);
        assert!(matches!(orchestrator.process_file(&path), FileOutcome::Processed(_)));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
