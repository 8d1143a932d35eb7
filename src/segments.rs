use serde::Serialize;

/// One timed span of recognized speech.
///
/// Serialized shape (consumed by the `_segments.json` artifact):
/// `{"start": 1.0, "end": 2.5, "text": "..."}` with timestamps in seconds.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Segment {
    #[serde(rename = "start")]
    pub start_seconds: f32,

    #[serde(rename = "end")]
    pub end_seconds: f32,

    pub text: String,
}

/// A complete transcription of one input file.
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Resolved language code: the caller's hint, Whisper's detection, or
    /// `"en"` after translation.
    pub language: String,

    /// The full transcript text.
    pub text: String,

    /// Ordered timed segments covering the transcript.
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Rebuild the full text by joining segment texts with single spaces.
    ///
    /// Used after per-segment post-processing so the full text and the
    /// segments can't drift apart.
    pub fn rebuild_text(&mut self) {
        let joined: Vec<&str> = self.segments.iter().map(|s| s.text.trim()).collect();
        self.text = joined.join(" ");
    }
}
