use std::io::Write;

use crate::Result;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::Segment;

/// A `SegmentEncoder` that emits one JSON array of segments.
///
/// The artifact writer feeds this from a complete in-memory transcript, so the
/// element-at-a-time interface exists for the [`SegmentEncoder`] seam rather
/// than for memory pressure. The encoder owns the array brackets: nothing hits
/// the writer until the first segment arrives, and `close` always leaves valid
/// JSON behind — `[]` when no segment was ever written.
///
/// Output shape (consumed by the `_segments.json` artifact):
/// ```json
/// [{"start":0.0,"end":1.2,"text":"hello"},{"start":1.2,"end":2.5,"text":"world"}]
/// ```
pub struct JsonArrayEncoder<W: Write> {
    w: W,

    /// How many segments have been written so far. Zero means the opening
    /// bracket is still pending; anything later needs a comma first.
    written: usize,

    /// Set by `close`; writing past it is an error.
    closed: bool,
}

impl<W: Write> JsonArrayEncoder<W> {
    /// Create an encoder over `w`. Nothing is written until the first segment
    /// or `close`, whichever comes first.
    pub fn new(w: W) -> Self {
        Self {
            w,
            written: 0,
            closed: false,
        }
    }
}

impl<W: Write> SegmentEncoder for JsonArrayEncoder<W> {
    /// Append one segment to the array.
    fn write_segment(&mut self, seg: &Segment) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write segment: encoder is already closed",
            ));
        }

        let lead: &[u8] = if self.written == 0 { b"[" } else { b"," };
        self.w.write_all(lead)?;

        serde_json::to_writer(&mut self.w, seg)?;
        self.written += 1;

        self.w.flush()?;
        Ok(())
    }

    /// Terminate the array and flush. Idempotent; further writes error.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        let tail: &[u8] = if self.written == 0 { b"[]" } else { b"]" };
        self.w.write_all(tail)?;
        self.w.flush()?;

        self.closed = true;
        Ok(())
    }
}
