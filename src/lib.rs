//! `rawi` — a batch transcription toolkit built on top of Whisper.
//!
//! This crate provides:
//! - File discovery over glob patterns
//! - A bounded worker-pool dispatcher that collects per-file outcomes
//! - Whisper-backed transcription with language auto-detection
//! - Arabic-specific transcript normalization
//! - Artifact writers (plain text, JSON segments, SRT subtitles)
//!
//! The library is designed to be used by both CLI tools and embedding callers,
//! with an emphasis on clarity, predictable failure handling, and minimal surprises.

// Work model: what gets dispatched and what comes back.
pub mod outcome;
pub mod work;

// Batch scheduling over a set of work items.
pub mod discovery;
pub mod dispatcher;

// Audio decoding into Whisper's expected input format.
pub mod audio;

// Whisper-backed transcription.
pub mod whisper;

// Transcript post-processing for Arabic output.
pub mod arabic;

// Segment data structures and artifact emission.
pub mod artifacts;
pub mod segments;

// Output encoder interfaces and implementations.
pub mod json_array_encoder;
pub mod segment_encoder;
pub mod srt_encoder;

// Logging configuration and control.
pub mod logging;

mod error;

pub use error::{Error, Result};

pub use dispatcher::{Transcriber, run};
pub use outcome::{Outcome, RunSummary};
pub use whisper::WhisperTranscriber;
pub use work::{Device, Task, WorkItem};

#[cfg(feature = "logging")]
pub use logging::init as init_logging;
