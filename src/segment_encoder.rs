use crate::Result;
use crate::segments::Segment;

/// Streaming sink for transcription segments.
///
/// Encoders receive segments one at a time, in order, and are closed exactly
/// once by the caller when the transcript is complete.
pub trait SegmentEncoder {
    fn write_segment(&mut self, seg: &Segment) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}
