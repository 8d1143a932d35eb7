//! Artifact emission for finished transcripts.
//!
//! Every successful transcription writes three files under the work item's
//! output directory, named from the input file's stem plus the resolved
//! language code:
//!
//! - `{base}_{lang}.txt` — the full transcript text
//! - `{base}_{lang}_segments.json` — the ordered segment array
//! - `{base}_{lang}.srt` — subtitles
//!
//! Partially written artifacts are not cleaned up on failure; a failed item is
//! reported and its files, if any, are left for inspection.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::json_array_encoder::JsonArrayEncoder;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::Transcript;
use crate::srt_encoder::SrtEncoder;
use crate::{Error, Result};

/// Where one transcript's artifacts ended up.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub text: PathBuf,
    pub segments: PathBuf,
    pub srt: PathBuf,
}

/// Write all artifacts for one transcript.
///
/// Creates `output_dir` if it does not exist yet. Safe to call concurrently
/// for different inputs; names collide only when two inputs share a stem and
/// resolve to the same language.
pub fn write_artifacts(
    output_dir: &Path,
    input_path: &Path,
    transcript: &Transcript,
) -> Result<ArtifactPaths> {
    std::fs::create_dir_all(output_dir)?;

    let base = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            Error::msg(format!(
                "cannot derive a base name from '{}'",
                input_path.display()
            ))
        })?;

    let paths = ArtifactPaths {
        text: output_dir.join(format!("{base}_{}.txt", transcript.language)),
        segments: output_dir.join(format!("{base}_{}_segments.json", transcript.language)),
        srt: output_dir.join(format!("{base}_{}.srt", transcript.language)),
    };

    write_text(&paths.text, transcript)?;
    write_segments_json(&paths.segments, transcript)?;
    write_srt(&paths.srt, transcript)?;

    Ok(paths)
}

fn write_text(path: &Path, transcript: &Transcript) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(transcript.text.as_bytes())?;
    w.flush()?;
    Ok(())
}

fn write_segments_json(path: &Path, transcript: &Transcript) -> Result<()> {
    let w = BufWriter::new(File::create(path)?);
    let mut encoder = JsonArrayEncoder::new(w);
    for segment in &transcript.segments {
        encoder.write_segment(segment)?;
    }
    encoder.close()
}

fn write_srt(path: &Path, transcript: &Transcript) -> Result<()> {
    let w = BufWriter::new(File::create(path)?);
    let mut encoder = SrtEncoder::new(w);
    for segment in &transcript.segments {
        encoder.write_segment(segment)?;
    }
    encoder.close()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::Segment;

    fn transcript() -> Transcript {
        Transcript {
            language: "ar".to_owned(),
            text: "full text".to_owned(),
            segments: vec![
                Segment {
                    start_seconds: 0.0,
                    end_seconds: 1.5,
                    text: "first".to_owned(),
                },
                Segment {
                    start_seconds: 1.5,
                    end_seconds: 3.0,
                    text: "second".to_owned(),
                },
            ],
        }
    }

    #[test]
    fn writes_all_three_artifacts_with_language_suffix() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("transcriptions");

        let paths = write_artifacts(&out, Path::new("/audio/lecture.mp3"), &transcript())?;

        assert!(paths.text.ends_with("lecture_ar.txt"));
        assert!(paths.segments.ends_with("lecture_ar_segments.json"));
        assert!(paths.srt.ends_with("lecture_ar.srt"));

        assert_eq!(std::fs::read_to_string(&paths.text)?, "full text");

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&paths.segments)?)?;
        let arr = json.as_array().expect("expected JSON array");
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["text"], "first");
        assert_eq!(arr[1]["end"], 3.0);

        let srt = std::fs::read_to_string(&paths.srt)?;
        assert!(srt.starts_with("1\n00:00:00,000 --> 00:00:01,500\nfirst\n\n"));
        assert!(srt.contains("2\n00:00:01,500 --> 00:00:03,000\nsecond\n\n"));
        Ok(())
    }

    #[test]
    fn creates_missing_output_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("a").join("b");

        write_artifacts(&out, Path::new("x.wav"), &transcript())?;
        assert!(out.is_dir());
        Ok(())
    }

    #[test]
    fn empty_transcript_still_writes_valid_artifacts() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let empty = Transcript {
            language: "en".to_owned(),
            text: String::new(),
            segments: Vec::new(),
        };

        let paths = write_artifacts(dir.path(), Path::new("silence.wav"), &empty)?;
        assert_eq!(std::fs::read_to_string(&paths.segments)?, "[]");
        assert_eq!(std::fs::read_to_string(&paths.srt)?, "");
        Ok(())
    }
}
