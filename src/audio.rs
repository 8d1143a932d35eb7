//! Decode media files into the input format whisper.cpp expects.
//!
//! Responsibilities:
//! - Probe the container and pick a decodable audio track
//! - Decode packets into PCM
//! - Downmix to mono and resample to 16 kHz
//!
//! Batch transcription works on whole files, so this module collects the full
//! sample buffer instead of streaming chunks. Symphonia's error model is
//! handled the same way as in any decode loop: bad frames are skipped, IO
//! errors end the stream.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use rubato::{Resampler, SincFixedIn, WindowFunction};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, Track};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// whisper.cpp's expected mono sample rate (Hz).
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Decode an audio file into mono `f32` samples at [`WHISPER_SAMPLE_RATE`].
///
/// The file extension, when present, is passed to Symphonia as a probe hint;
/// ambiguous containers probe more reliably with one.
pub fn decode_media_file(path: impl AsRef<Path>) -> Result<Vec<f32>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("failed to open '{}'", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let format_opts: FormatOptions = Default::default();
    let metadata_opts: MetadataOptions = Default::default();

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &format_opts, &metadata_opts)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("failed to probe '{}'", path.display()))?;

    let mut format = probed.format;
    let track = pick_default_track(format.as_ref())?;
    let track_id = track.id;

    let src_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| anyhow!("audio track has no sample rate"))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| anyhow!(e))
        .context("failed to create decoder for audio track")?;

    let mono = decode_all_to_mono(format.as_mut(), decoder.as_mut(), track_id)?;

    if src_rate == WHISPER_SAMPLE_RATE {
        return Ok(mono);
    }

    resample_to_whisper_rate(&mono, src_rate)
}

/// Pick a default audio track.
///
/// Track selection policy:
/// - choose the first track that looks decodable (codec != NULL)
/// - and has a known sample rate (required for resampling decisions downstream)
fn pick_default_track(format: &dyn FormatReader) -> Result<Track> {
    format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL && t.codec_params.sample_rate.is_some())
        .cloned()
        .ok_or_else(|| anyhow!("no audio track found"))
}

/// Run the packet loop, decoding and downmixing everything into one buffer.
///
/// Error handling policy:
/// - `DecodeError` → skip bad frame (common with some codecs)
/// - `IoError`     → treat as end-of-stream
/// - other errors  → bubble up with context
fn decode_all_to_mono(
    format: &mut dyn FormatReader,
    decoder: &mut dyn Decoder,
    track_id: u32,
) -> Result<Vec<f32>> {
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut mono = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(_)) => break,
            Err(e) => return Err(anyhow!(e)).context("failed reading packet"),
        };

        // Ignore packets from non-audio tracks.
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(buf) => buf,
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(SymphoniaError::IoError(_)) => break,
            Err(e) => return Err(anyhow!(e)).context("decoder failure"),
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count();
        if channels == 0 {
            bail!("decoded audio had zero channels");
        }

        // Lazily size the interleaved scratch buffer from the first decoded frame.
        let buf = sample_buf
            .get_or_insert_with(|| SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
        buf.copy_interleaved_ref(decoded);

        downmix_into_mono(buf.samples(), channels, &mut mono);
    }

    Ok(mono)
}

/// Downmix interleaved samples into mono by averaging channels.
///
/// Policy: equal-weight average across channels (simple, predictable).
fn downmix_into_mono(interleaved: &[f32], channels: usize, mono: &mut Vec<f32>) {
    if channels == 1 {
        mono.extend_from_slice(interleaved);
        return;
    }

    let frames = interleaved.len() / channels;
    mono.reserve(frames);

    for f in 0..frames {
        let base = f * channels;
        let mut acc = 0.0;
        for c in 0..channels {
            acc += interleaved[base + c];
        }
        mono.push(acc / channels as f32);
    }
}

/// Resample a complete mono buffer from `src_rate` to [`WHISPER_SAMPLE_RATE`].
///
/// rubato expects exact block sizes; the final partial block is padded with
/// zeros, which adds at most a few milliseconds of trailing silence.
fn resample_to_whisper_rate(mono_src: &[f32], src_rate: u32) -> Result<Vec<f32>> {
    // How many source frames we feed rubato per `process()` call.
    let in_block_frames = 2048;

    let mut resampler = SincFixedIn::<f32>::new(
        WHISPER_SAMPLE_RATE as f64 / src_rate as f64,
        2.0,
        rubato::SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: rubato::SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        },
        in_block_frames,
        1, // mono
    )
    .map_err(|e| anyhow!(e))
    .context("failed to init resampler")?;

    let mut padded = mono_src.to_vec();
    let rem = padded.len() % in_block_frames;
    if rem != 0 {
        padded.resize(padded.len() + (in_block_frames - rem), 0.0);
    }

    let mut out = Vec::with_capacity(
        (padded.len() as f64 * WHISPER_SAMPLE_RATE as f64 / src_rate as f64) as usize,
    );

    for block in padded.chunks(in_block_frames) {
        let input = vec![block.to_vec()];
        let resampled = resampler
            .process(&input, None)
            .map_err(|e| anyhow!(e))
            .context("resampler process failed")?;

        if resampled.len() != 1 {
            bail!("expected mono output from resampler");
        }

        out.extend_from_slice(&resampled[0]);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_single_channel_is_identity() {
        let mut mono = Vec::new();
        downmix_into_mono(&[0.0, 1.0, -1.0], 1, &mut mono);
        assert_eq!(mono, vec![0.0, 1.0, -1.0]);
    }

    #[test]
    fn downmix_averages_channels() {
        // Two frames of stereo: (L=1, R=3), (L=-1, R=1) => mono: 2, 0
        let mut mono = Vec::new();
        downmix_into_mono(&[1.0, 3.0, -1.0, 1.0], 2, &mut mono);
        assert_eq!(mono, vec![2.0, 0.0]);
    }

    #[test]
    fn resample_doubles_sample_count_from_8k() -> anyhow::Result<()> {
        let src = vec![0.25_f32; 4096];
        let out = resample_to_whisper_rate(&src, 8_000)?;

        let expected = src.len() * 2;
        let ratio = out.len() as f64 / expected as f64;
        assert!((ratio - 1.0).abs() < 0.1, "unexpected output length: {}", out.len());
        Ok(())
    }

    #[test]
    fn decodes_wav_file_at_target_rate() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("tone.wav");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: WHISPER_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(&path, spec)?;
        for n in 0..8000u32 {
            let t = n as f32 / WHISPER_SAMPLE_RATE as f32;
            let sample = (t * 440.0 * 2.0 * std::f32::consts::PI).sin();
            writer.write_sample((sample * i16::MAX as f32 * 0.5) as i16)?;
        }
        writer.finalize()?;

        let samples = decode_media_file(&path)?;
        assert_eq!(samples.len(), 8000);
        assert!(samples.iter().any(|s| s.abs() > 0.1));
        Ok(())
    }

    #[test]
    fn missing_file_errors_with_path() {
        let err = decode_media_file("does-not-exist.mp3").unwrap_err();
        assert!(err.to_string().contains("does-not-exist.mp3"));
    }
}
