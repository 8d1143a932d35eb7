use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use rawi::artifacts::write_artifacts;
use rawi::segments::Transcript;
use rawi::{Device, Task, WhisperTranscriber, WorkItem};

/// How many segments to show in the post-run sample.
const MAX_SAMPLE_SEGMENTS: usize = 10;

/// How many characters of the transcript to preview.
const MAX_PREVIEW_CHARS: usize = 300;

#[derive(Parser, Debug)]
#[command(name = "rawi-cli")]
#[command(about = "Transcribe a single audio file with Whisper")]
struct Params {
    /// Path to the audio file to transcribe.
    audio_path: PathBuf,

    /// Path to a ggml Whisper model file (e.g. `ggml-medium.bin`).
    #[arg(short = 'm', long = "model")]
    model_path: String,

    /// Language code (e.g. `ar`, `en`). Auto-detected when omitted.
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

    /// Log transcription details.
    #[arg(long = "verbose", default_value_t = false)]
    verbose: bool,
}

fn main() -> ExitCode {
    rawi::init_logging();

    let params = Params::parse();
    match run(params) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(params: Params) -> Result<()> {
    let audio_path = std::path::absolute(&params.audio_path)?;
    let output_dir = std::path::absolute(&params.output_dir)?;

    let op = WhisperTranscriber::new(&params.model_path, params.device)?;

    let item = WorkItem {
        file_path: audio_path.clone(),
        model_path: params.model_path.clone(),
        language: params.language.clone(),
        output_dir: output_dir.clone(),
        task: params.task,
        device: params.device,
        verbose: params.verbose,
    };

    println!("Transcribing audio: {}", audio_path.display());
    let transcript = op.transcribe_file(&item)?;
    let paths = write_artifacts(&output_dir, &audio_path, &transcript)?;

    println!("\nTranscription files saved:");
    println!("- text: {}", paths.text.display());
    println!("- segments: {}", paths.segments.display());
    println!("- srt: {}", paths.srt.display());

    display_segments(&transcript);
    display_preview(&transcript);

    Ok(())
}

/// Print a sample of timed segments so users can sanity-check the output.
fn display_segments(transcript: &Transcript) {
    println!("\nSample segments with timestamps:");

    for (i, segment) in transcript
        .segments
        .iter()
        .take(MAX_SAMPLE_SEGMENTS)
        .enumerate()
    {
        println!(
            "{}. [{} --> {}] {}",
            i + 1,
            format_timestamp(segment.start_seconds),
            format_timestamp(segment.end_seconds),
            segment.text.trim()
        );
    }

    if transcript.segments.len() > MAX_SAMPLE_SEGMENTS {
        println!(
            "... and {} more segments",
            transcript.segments.len() - MAX_SAMPLE_SEGMENTS
        );
    }
}

fn display_preview(transcript: &Transcript) {
    // Truncate on character boundaries; transcripts are rarely ASCII here.
    let preview: String = transcript.text.chars().take(MAX_PREVIEW_CHARS).collect();
    println!("\nTranscription Preview:");
    println!("{preview}...");
}

/// `HH:MM:SS,mmm`, matching the SRT artifact so samples read the same way.
fn format_timestamp(seconds: f32) -> String {
    let total_ms = (seconds * 1000.0).round() as u64;

    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;

    format!(
        "{:02}:{:02}:{:02},{ms:03}",
        total_s / 3600,
        (total_s % 3600) / 60,
        total_s % 60
    )
}
