//! The single consumer of a batch run.
//!
//! `ResultWriter` exclusively owns the three output streams. Line `i` of the
//! tables stream and line `i` of the names stream always describe the same
//! file; failures go to their own stream as `filename<TAB>reason`.
//!
//! A name whose table line already landed is queued until the names stream
//! accepts it, so a failed name write delays the pairing instead of shifting
//! every later pair.

use crate::progress::BatchProgress;
use crossbeam_channel::Receiver;
use gast_core::node::NodeTable;
use gast_core::storage::OutputPaths;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing::{error, info};

/// A file that parsed and normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedResult {
    pub filename: String,
    pub table: NodeTable,
    /// Nodes that hit a normalization gap.
    pub gaps: usize,
}

/// A file that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedResult {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Processed(ProcessedResult),
    Failed(FailedResult),
}

/// What travels over the result channel.
#[derive(Debug)]
pub enum Message {
    Outcome(FileOutcome),
    /// Sent once after every file has been dispatched.
    Finished,
}

/// Final counts from a writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterReport {
    pub success: usize,
    pub failure: usize,
    pub gap_count: usize,
    /// Results lost to I/O errors. Their files are counted nowhere.
    pub write_errors: usize,
}

impl WriterReport {
    pub fn processed(&self) -> usize {
        self.success + self.failure + self.write_errors
    }
}

pub struct ResultWriter<W: Write> {
    tables: W,
    names: W,
    failures: W,
    total: usize,
    progress_every: usize,
    progress: BatchProgress,
    report: WriterReport,
    /// Names (with their gap counts) whose table line is written but whose
    /// name line is not yet.
    pending_names: VecDeque<(String, usize)>,
}

impl ResultWriter<BufWriter<File>> {
    /// Create (truncating) the three streams under `paths`.
    pub fn create(paths: &OutputPaths, total: usize, progress_every: usize) -> io::Result<Self> {
        let open = |path| File::create(path).map(BufWriter::new);
        Ok(Self::new(
            open(&paths.tables)?,
            open(&paths.names)?,
            open(&paths.failures)?,
            total,
            progress_every,
        ))
    }
}

impl<W: Write> ResultWriter<W> {
    pub fn new(tables: W, names: W, failures: W, total: usize, progress_every: usize) -> Self {
        Self {
            tables,
            names,
            failures,
            total,
            progress_every: progress_every.max(1),
            progress: BatchProgress::hidden(),
            report: WriterReport::default(),
            pending_names: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: BatchProgress) -> Self {
        self.progress = progress;
        self
    }

    pub fn report(&self) -> WriterReport {
        self.report
    }

    /// Write one outcome. An I/O error is logged and the item is left out of
    /// both counts until (if ever) its lines are complete.
    pub fn record(&mut self, outcome: FileOutcome) {
        let failed = matches!(outcome, FileOutcome::Failed(_));
        let (filename, written) = match outcome {
            FileOutcome::Processed(result) => {
                let written = self.write_processed(&result);
                (result.filename, written)
            }
            FileOutcome::Failed(result) => {
                let written = self.write_failed(&result);
                if written.is_ok() {
                    self.report.failure += 1;
                }
                (result.filename, written)
            }
        };

        if let Err(e) = written {
            self.report.write_errors += 1;
            error!(file = %filename, error = %e, "failed to write result");
        }

        self.progress.tick(failed);
        let processed = self.report.processed() + self.pending_names.len();
        if processed % self.progress_every == 0 {
            info!("progress: {}/{}", processed, self.total);
        }
    }

    fn write_processed(&mut self, result: &ProcessedResult) -> io::Result<()> {
        let line = result.table.to_json_line()?;
        writeln!(self.tables, "{line}")?;
        self.pending_names
            .push_back((single_line(&result.filename), result.gaps));
        if let Err(e) = self.write_pending_names() {
            error!(
                file = %result.filename,
                pending = self.pending_names.len(),
                error = %e,
                "failed to write name, pairing delayed"
            );
        }
        Ok(())
    }

    /// Write queued names in order. Each one that lands completes a pair.
    fn write_pending_names(&mut self) -> io::Result<()> {
        while let Some((name, gaps)) = self.pending_names.front() {
            writeln!(self.names, "{name}")?;
            self.report.success += 1;
            self.report.gap_count += gaps;
            self.pending_names.pop_front();
        }
        Ok(())
    }

    fn write_failed(&mut self, result: &FailedResult) -> io::Result<()> {
        writeln!(
            self.failures,
            "{}\t{}",
            single_line(&result.filename),
            single_line(&result.reason)
        )
    }

    /// Consume messages until `Finished` (or until every sender is gone),
    /// then flush.
    pub fn drain(mut self, rx: &Receiver<Message>) -> io::Result<WriterReport> {
        for message in rx {
            match message {
                Message::Outcome(outcome) => self.record(outcome),
                Message::Finished => break,
            }
        }
        self.finish()
    }

    /// Flush all streams and return the final counts.
    pub fn finish(mut self) -> io::Result<WriterReport> {
        if let Err(e) = self.write_pending_names() {
            error!(
                lost = self.pending_names.len(),
                error = %e,
                "names stream is behind the tables stream"
            );
            self.report.write_errors += self.pending_names.len();
            self.pending_names.clear();
        }
        self.progress.finish();
        self.tables.flush()?;
        self.names.flush()?;
        self.failures.flush()?;
        Ok(self.report)
    }
}

/// Tabs and line breaks would corrupt the line-oriented streams.
fn single_line(text: &str) -> String {
    text.replace(['\t', '\r', '\n'], " ")
}
