use anyhow::{Context, Result};
use whisper_rs::{WhisperContext, WhisperContextParameters};

use crate::work::Device;

use super::logging::init_whisper_logging;

/// Load a Whisper model and return an initialized `WhisperContext`.
///
/// We silence whisper.cpp's own logging first; our binaries control their
/// output through `tracing` instead.
pub fn get_context(model_path: &str, device: Device) -> Result<WhisperContext> {
    init_whisper_logging();

    let mut ctx_params = WhisperContextParameters::default();
    ctx_params.use_gpu(device.wants_gpu());

    let ctx = WhisperContext::new_with_params(model_path, ctx_params)
        .with_context(|| format!("failed to load model from path: {model_path}"))?;

    Ok(ctx)
}
