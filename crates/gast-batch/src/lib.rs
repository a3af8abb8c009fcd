//! Batch normalization of many source files into JSON Lines.
//!
//! # Architecture
//!
//! - **orchestrator**: a per-run rayon pool parses and normalizes files
//!   independently and sends one outcome per file into a bounded channel
//! - **writer**: the single consumer that owns the three output streams
//! - **progress**: optional terminal progress bar via `indicatif`

pub mod orchestrator;
pub mod progress;
pub mod writer;

pub use orchestrator::{BatchError, BatchOrchestrator, FileError, Summary};
pub use writer::{FailedResult, FileOutcome, Message, ProcessedResult, ResultWriter, WriterReport};
