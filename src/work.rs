use std::path::PathBuf;

#[cfg(feature = "cli")]
use clap::ValueEnum;

/// What Whisper should do with the recognized speech.
///
/// Why this exists:
/// - We want a single, strongly-typed representation of the task across the
///   CLI and library code, instead of stringly-typed conditionals.
///
/// Integration notes:
/// - `ValueEnum` allows this enum to be used directly as a CLI flag with `clap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(ValueEnum))]
pub enum Task {
    /// Keep the spoken language in the transcript.
    #[default]
    Transcribe,

    /// Translate the speech to English while transcribing.
    Translate,
}

/// Which compute device Whisper inference should run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(ValueEnum))]
pub enum Device {
    /// Use the GPU when the build supports one, otherwise fall back to CPU.
    #[default]
    Auto,

    /// Force CPU inference.
    Cpu,

    /// Force GPU inference.
    Gpu,
}

impl Device {
    /// Whether Whisper should be asked to use the GPU.
    ///
    /// `Auto` says yes and lets whisper.cpp fall back to CPU when no usable
    /// GPU backend was compiled in.
    pub fn wants_gpu(self) -> bool {
        !matches!(self, Device::Cpu)
    }
}

/// One unit of batch work: a single audio file plus everything needed to process it.
///
/// Work items are created once per discovered file, before dispatch, and never mutated.
/// Workers receive them read-only; all mutable state lives inside the per-item
/// transcription call.
#[derive(Debug, Clone)]
pub struct WorkItem {
    /// Absolute path to the input audio file.
    pub file_path: PathBuf,

    /// Path to the ggml Whisper model file.
    ///
    /// The built-in `WhisperTranscriber` loads its model once at construction
    /// and does not reload per item; this field records which model the item
    /// was dispatched against (debug builds assert the two agree) and feeds
    /// custom `Transcriber` implementations that do load per item.
    pub model_path: String,

    /// Optional language hint (e.g. `"ar"`, `"en"`).
    ///
    /// When `None`, we let Whisper auto-detect the spoken language.
    pub language: Option<String>,

    /// Directory that output artifacts are written under.
    pub output_dir: PathBuf,

    /// Whether to transcribe verbatim or translate to English.
    pub task: Task,

    /// Compute device selection for inference.
    pub device: Device,

    /// Whether the per-item call should log progress details.
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_gpu_preference() {
        assert!(Device::Auto.wants_gpu());
        assert!(Device::Gpu.wants_gpu());
        assert!(!Device::Cpu.wants_gpu());
    }
}
