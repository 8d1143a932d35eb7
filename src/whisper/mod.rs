//! Whisper-backed implementation of the per-file transcription operation.
//!
//! The model is loaded once per [`WhisperTranscriber`] and shared across pool
//! workers; `WhisperContext` is `Send + Sync`, and every transcription creates
//! its own short-lived `WhisperState` for inference.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::arabic::normalize_transcript;
use crate::artifacts::write_artifacts;
use crate::audio::decode_media_file;
use crate::dispatcher::Transcriber;
use crate::segments::Transcript;
use crate::work::{Device, Task, WorkItem};
use crate::{Error, Result};

mod ctx;
mod logging;
mod segments;

use whisper_rs::WhisperContext;

pub use logging::init_whisper_logging;

/// Language code whose transcripts get Arabic post-processing.
const ARABIC: &str = "ar";

/// The built-in per-file transcription operation, powered by whisper.cpp.
pub struct WhisperTranscriber {
    ctx: WhisperContext,
    model_path: String,
}

/// The model is loaded once at construction; a work item naming a different
/// model is a caller bug we only check in debug builds.
fn debug_check_model(loaded: &str, requested: &str) {
    debug_assert_eq!(
        loaded, requested,
        "work item model '{requested}' does not match loaded model '{loaded}'"
    );
}

impl WhisperTranscriber {
    /// Load a ggml Whisper model from disk.
    ///
    /// A missing or unreadable model is a configuration error: it is fatal to
    /// the whole run, unlike per-file errors, which the dispatcher records as
    /// failed outcomes.
    pub fn new(model_path: &str, device: Device) -> Result<Self> {
        if model_path.trim().is_empty() {
            return Err(Error::config("model path must be provided"));
        }

        let path = Path::new(model_path);
        if !path.is_file() {
            return Err(Error::config(format!(
                "model not found at '{model_path}'"
            )));
        }

        let started = Instant::now();
        let ctx = ctx::get_context(model_path, device)?;
        info!(
            model = model_path,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "model loaded"
        );

        Ok(Self {
            ctx,
            model_path: model_path.to_owned(),
        })
    }

    /// Path of the ggml model this operation was loaded with.
    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    /// Transcribe one file and return the finished transcript.
    ///
    /// Steps: decode to mono 16 kHz, run a full Whisper pass (auto-detecting
    /// the language when the item carries no hint), convert timestamps, and
    /// apply Arabic normalization when the transcript came out in Arabic.
    ///
    /// Translation resolves the language to `"en"`: the output text is
    /// English, and artifact names should say so.
    pub fn transcribe_file(&self, item: &WorkItem) -> anyhow::Result<Transcript> {
        let started = Instant::now();
        let samples = decode_media_file(&item.file_path)?;
        debug!(
            file = %item.file_path.display(),
            samples = samples.len(),
            decode_ms = started.elapsed().as_millis() as u64,
            "decoded audio"
        );

        let started = Instant::now();
        let state = segments::run_whisper_full(
            &self.ctx,
            item.language.as_deref(),
            item.task,
            &samples,
        )?;

        let language = match item.task {
            Task::Translate => "en".to_owned(),
            Task::Transcribe => match &item.language {
                Some(hint) => hint.clone(),
                None => segments::resolved_language(&state),
            },
        };

        let collected = segments::collect_segments(&state)?;
        if item.verbose {
            info!(
                file = %item.file_path.display(),
                language,
                segments = collected.len(),
                transcribe_ms = started.elapsed().as_millis() as u64,
                "transcription finished"
            );
        }

        let mut transcript = Transcript {
            language,
            text: String::new(),
            segments: collected,
        };
        transcript.rebuild_text();

        if transcript.language == ARABIC && item.task == Task::Transcribe {
            normalize_transcript(&mut transcript);
        }

        Ok(transcript)
    }
}

impl Transcriber for WhisperTranscriber {
    /// Transcribe the item and write its artifacts under the item's output
    /// directory. Artifact writing is the operation's side effect; the
    /// dispatcher only sees the returned result.
    fn transcribe(&self, item: &WorkItem) -> Result<()> {
        debug_check_model(&self.model_path, &item.model_path);

        let transcript = self.transcribe_file(item)?;
        let paths = write_artifacts(&item.output_dir, &item.file_path, &transcript)?;

        debug!(
            text = %paths.text.display(),
            segments = %paths.segments.display(),
            srt = %paths.srt.display(),
            "artifacts written"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_model_paths_pass_the_debug_check() {
        debug_check_model("models/ggml-medium.bin", "models/ggml-medium.bin");
    }

    #[test]
    #[should_panic(expected = "does not match loaded model")]
    fn mismatched_model_paths_trip_the_debug_check() {
        debug_check_model("models/ggml-medium.bin", "models/ggml-small.bin");
    }
}
