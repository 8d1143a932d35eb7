//! End-to-end batch flow without a model: discovery feeds the dispatcher,
//! and a stand-in operation writes real artifacts.

use std::path::PathBuf;

use rawi::artifacts::write_artifacts;
use rawi::segments::{Segment, Transcript};
use rawi::{Device, Task, Transcriber, WorkItem};

/// A stand-in for the Whisper operation: produces a canned transcript and
/// writes the same artifacts the real operation would.
struct CannedOp;

impl Transcriber for CannedOp {
    fn transcribe(&self, item: &WorkItem) -> rawi::Result<()> {
        let name = item.file_path.file_name().unwrap().to_string_lossy();
        if name.starts_with("broken") {
            return Err(rawi::Error::Message(format!("cannot decode {name}")));
        }

        let transcript = Transcript {
            language: "ar".to_owned(),
            text: "canned transcript".to_owned(),
            segments: vec![Segment {
                start_seconds: 0.0,
                end_seconds: 1.0,
                text: "canned transcript".to_owned(),
            }],
        };

        write_artifacts(&item.output_dir, &item.file_path, &transcript)?;
        Ok(())
    }
}

fn work_items(files: Vec<PathBuf>, output_dir: &std::path::Path) -> Vec<WorkItem> {
    files
        .into_iter()
        .map(|file_path| WorkItem {
            file_path,
            model_path: "unused.bin".to_owned(),
            language: None,
            output_dir: output_dir.to_path_buf(),
            task: Task::Transcribe,
            device: Device::Cpu,
            verbose: false,
        })
        .collect()
}

#[test]
fn discovery_feeds_dispatcher_and_artifacts_land() -> anyhow::Result<()> {
    let input = tempfile::tempdir()?;
    let output = tempfile::tempdir()?;

    for name in ["b.wav", "a.mp3", "notes.txt"] {
        std::fs::write(input.path().join(name), b"")?;
    }

    let files = rawi::discovery::find_media_files(input.path(), "*.mp3,*.wav")?;
    assert_eq!(files.len(), 2);

    let summary = rawi::run(&CannedOp, work_items(files, output.path()), 2)?;
    assert_eq!(summary.total, 2);
    assert!(summary.all_succeeded());

    assert!(output.path().join("a_ar.txt").is_file());
    assert!(output.path().join("a_ar_segments.json").is_file());
    assert!(output.path().join("a_ar.srt").is_file());
    assert!(output.path().join("b_ar.txt").is_file());
    Ok(())
}

#[test]
fn broken_files_fail_without_stopping_the_batch() -> anyhow::Result<()> {
    let input = tempfile::tempdir()?;
    let output = tempfile::tempdir()?;

    for name in ["good.mp3", "broken.mp3", "fine.mp3"] {
        std::fs::write(input.path().join(name), b"")?;
    }

    let files = rawi::discovery::find_media_files(input.path(), "*.mp3")?;
    let summary = rawi::run(&CannedOp, work_items(files, output.path()), 4)?;

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert!(summary.failures[0].1.contains("cannot decode broken.mp3"));

    // The failed file wrote nothing; its siblings did.
    assert!(output.path().join("good_ar.txt").is_file());
    assert!(output.path().join("fine_ar.txt").is_file());
    assert!(!output.path().join("broken_ar.txt").exists());
    Ok(())
}

#[test]
fn zero_matches_is_the_callers_decision() -> anyhow::Result<()> {
    let input = tempfile::tempdir()?;

    let files = rawi::discovery::find_media_files(input.path(), "*.mp3")?;
    assert!(files.is_empty());

    // The dispatcher itself accepts an empty batch; refusing it is CLI policy.
    let summary = rawi::run(&CannedOp, Vec::new(), 1)?;
    assert_eq!(summary.total, 0);
    Ok(())
}
