use anyhow::{Context, Result};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperSegment, WhisperState};

use crate::segments::Segment;
use crate::work::Task;

/// Fallback code when Whisper reports a language id we can't map to a string.
///
/// `"und"` ("undetermined") follows the common convention in language tagging
/// systems, which keeps artifact names meaningful.
const UNDETERMINED_LANGUAGE_CODE: &str = "und";

/// Run a full Whisper pass and return the finished inference state.
///
/// Each call creates its own `WhisperState`; the shared `WhisperContext` stays
/// immutable, which is what lets pool workers share one loaded model.
pub(super) fn run_whisper_full(
    ctx: &WhisperContext,
    language: Option<&str>,
    task: Task,
    samples: &[f32],
) -> Result<WhisperState> {
    let params = build_full_params(language, task);

    let mut state = ctx
        .create_state()
        .context("failed to create whisper state")?;

    state
        .full(params, samples)
        .context("failed to run whisper full()")?;

    Ok(state)
}

/// Collect the segments produced by a finished Whisper pass.
pub(super) fn collect_segments(state: &WhisperState) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    for whisper_segment in state.as_iter() {
        segments.push(to_segment(whisper_segment)?);
    }
    Ok(segments)
}

/// The language Whisper settled on during the pass.
///
/// When the caller provided no hint, Whisper auto-detects; this reads the
/// detection result back so artifacts can carry the resolved language code.
pub(super) fn resolved_language(state: &WhisperState) -> String {
    let id = state.full_lang_id_from_state();

    whisper_rs::get_lang_str(id)
        .unwrap_or(UNDETERMINED_LANGUAGE_CODE)
        .to_owned()
}

fn to_segment(segment: WhisperSegment) -> Result<Segment> {
    let text = segment
        .to_str()
        .context("failed to get segment text")?
        .to_owned();

    Ok(Segment {
        start_seconds: centiseconds_to_seconds(segment.start_timestamp()),
        end_seconds: centiseconds_to_seconds(segment.end_timestamp()),
        text,
    })
}

/// Whisper segment timestamps are centiseconds.
fn centiseconds_to_seconds(cs: i64) -> f32 {
    cs as f32 / 100.0
}

fn build_full_params<'a>(language: Option<&'a str>, task: Task) -> FullParams<'a, 'static> {
    let mut params = FullParams::new(SamplingStrategy::BeamSearch {
        beam_size: 5,
        patience: 1.0,
    });

    params.set_n_threads(num_cpus::get() as i32);
    params.set_translate(matches!(task, Task::Translate));
    params.set_language(language);
    params.set_no_context(true);
    params.set_single_segment(false);

    params.set_print_progress(false);
    params.set_print_special(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centiseconds_convert_to_seconds() {
        assert_eq!(centiseconds_to_seconds(0), 0.0);
        assert_eq!(centiseconds_to_seconds(150), 1.5);
        assert_eq!(centiseconds_to_seconds(360_000), 3600.0);
    }
}
