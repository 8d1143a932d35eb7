use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use rawi::{Device, Task, Transcriber, WhisperTranscriber, WorkItem, discovery};

/// Wraps the transcription operation so each file's start and finish land on
/// stdout, where the user can see them without turning up `RAWI_LOG`. Workers
/// call this concurrently; each `println!` takes the stdout lock on its own,
/// so lines never interleave mid-line.
struct Progress<T> {
    inner: T,
}

impl<T: Transcriber> Transcriber for Progress<T> {
    fn transcribe(&self, item: &WorkItem) -> rawi::Result<()> {
        println!("Processing {}...", item.file_path.display());
        let result = self.inner.transcribe(item);
        match &result {
            Ok(()) => println!("Completed {}", item.file_path.display()),
            Err(err) => println!("Error processing {}: {err}", item.file_path.display()),
        }
        result
    }
}

#[derive(Parser, Debug)]
#[command(name = "rawi-batch")]
#[command(about = "Batch-transcribe a directory of audio files with Whisper")]
struct Params {
    /// Directory containing audio files to transcribe.
    input_dir: PathBuf,

    /// Comma-separated glob patterns for audio files to process.
    #[arg(long = "pattern", default_value = "*.mp3,*.wav,*.m4a,*.ogg,*.flac")]
    pattern: String,

    /// Path to a ggml Whisper model file (e.g. `ggml-medium.bin`).
    #[arg(short = 'm', long = "model")]
    model_path: String,

    /// Language code (e.g. `ar`, `en`). Auto-detected per file when omitted.
    #[arg(short = 'l', long = "language")]
    language: Option<String>,

    /// Directory to save transcription artifacts under.
    #[arg(short = 'o', long = "output-dir", default_value = "transcriptions")]
    output_dir: PathBuf,

    /// Keep the original language, or translate to English.
    #[arg(long = "task", value_enum, default_value_t = Task::Transcribe)]
    task: Task,

    /// Compute device for inference.
    #[arg(long = "device", value_enum, default_value_t = Device::Auto)]
    device: Device,

    /// Number of parallel workers.
    #[arg(short = 'w', long = "workers", default_value_t = 1)]
    workers: usize,

    /// Log per-file transcription details.
    #[arg(long = "verbose", default_value_t = false)]
    verbose: bool,
}

fn main() -> ExitCode {
    rawi::init_logging();

    let params = Params::parse();
    match run(params) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(params: Params) -> Result<ExitCode> {
    let input_dir = std::path::absolute(&params.input_dir)?;
    let output_dir = std::path::absolute(&params.output_dir)?;

    println!(
        "Searching for audio files in {} with pattern {}",
        input_dir.display(),
        params.pattern
    );

    let files = discovery::find_media_files(&input_dir, &params.pattern)?;
    if files.is_empty() {
        eprintln!(
            "No audio files found in {} matching the pattern {}",
            input_dir.display(),
            params.pattern
        );
        return Ok(ExitCode::FAILURE);
    }

    println!("Found {} audio files to process", files.len());

    let work_items: Vec<WorkItem> = files
        .into_iter()
        .map(|file_path| WorkItem {
            file_path,
            model_path: params.model_path.clone(),
            language: params.language.clone(),
            output_dir: output_dir.clone(),
            task: params.task,
            device: params.device,
            verbose: params.verbose,
        })
        .collect();

    // Loading the model is the expensive part; do it once and share the
    // context across workers.
    let op = WhisperTranscriber::new(&params.model_path, params.device)?;

    if params.workers == 1 {
        println!("Processing files sequentially...");
    } else {
        println!(
            "Processing files in parallel with {} workers...",
            params.workers
        );
    }

    let summary = rawi::run(&Progress { inner: op }, work_items, params.workers)?;

    println!();
    println!("{summary}");
    println!();
    println!("Results saved in: {}", output_dir.display());

    // Per-file failures are reported above but do not affect the exit code;
    // only "no files found" and configuration errors are fatal.
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct RecordingOp {
        seen: Mutex<Vec<PathBuf>>,
        fail: bool,
    }

    impl Transcriber for RecordingOp {
        fn transcribe(&self, item: &WorkItem) -> rawi::Result<()> {
            self.seen.lock().unwrap().push(item.file_path.clone());
            if self.fail {
                return Err(rawi::Error::Message("decode failed".to_owned()));
            }
            Ok(())
        }
    }

    fn item(name: &str) -> WorkItem {
        WorkItem {
            file_path: PathBuf::from(name),
            model_path: "model.bin".to_owned(),
            language: None,
            output_dir: PathBuf::from("out"),
            task: Task::Transcribe,
            device: Device::Cpu,
            verbose: false,
        }
    }

    #[test]
    fn progress_delegates_and_passes_success_through() {
        let op = Progress {
            inner: RecordingOp {
                seen: Mutex::new(Vec::new()),
                fail: false,
            },
        };

        assert!(op.transcribe(&item("a.mp3")).is_ok());
        assert_eq!(*op.inner.seen.lock().unwrap(), vec![PathBuf::from("a.mp3")]);
    }

    #[test]
    fn progress_passes_the_inner_error_through_unchanged() {
        let op = Progress {
            inner: RecordingOp {
                seen: Mutex::new(Vec::new()),
                fail: true,
            },
        };

        let err = op.transcribe(&item("a.mp3")).unwrap_err();
        assert_eq!(err.to_string(), "decode failed");
    }
}
