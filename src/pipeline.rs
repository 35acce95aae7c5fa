//! End-to-end generation pipeline.
//!
//! One run is strictly sequential: resolve a prompt, derive the artifact
//! identifier, synthesize the raw raster, publish the artifact set. Every
//! stage failure is fatal — there is no retry policy and no partial-success
//! mode, because the display consumer reads the stable alias blindly and
//! must never see a half-written run.
//!
//! The synthesizer is a trait parameter so tests (and dry runs) can swap the
//! real OnnxStream process for a double that writes a known raster.

use std::path::PathBuf;

use rand::Rng;
use thiserror::Error;

use crate::config::ConfigError;
use crate::naming::derive_identifier;
use crate::prompt::{self, PromptError, PromptSpec};
use crate::publish::{self, ArtifactError, ArtifactSet};
use crate::synth::{GenerationParams, SynthesisError, Synthesizer};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Prompt resolution failed: {0}")]
    Prompt(#[from] PromptError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),
    #[error("Artifact publishing failed: {0}")]
    Artifact(#[from] ArtifactError),
}

/// Validated parameters for one generation run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub output_dir: PathBuf,
    pub prompts_file: PathBuf,
    pub styles_file: PathBuf,
    /// Non-empty to bypass prompt/style files entirely.
    pub explicit_prompt: String,
    pub seed: u64,
    pub steps: u32,
    pub width: u32,
    pub height: u32,
    pub synthesizer_path: String,
    pub model_path: String,
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Validation(
                "width and height must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub prompt: PromptSpec,
    pub identifier: String,
    pub artifacts: ArtifactSet,
}

/// Execute one generation run.
///
/// An explicit prompt is used verbatim; otherwise a random prompt gets a
/// random style fragment appended. A synthesis failure leaves no artifacts
/// at all — the raw raster path is only ever created by the synthesizer
/// itself, and publishing happens strictly afterwards.
pub fn run(
    cfg: &RunConfig,
    synthesizer: &impl Synthesizer,
    rng: &mut impl Rng,
) -> Result<RunResult, PipelineError> {
    cfg.validate()?;

    let spec = prompt::resolve(&cfg.prompts_file, &cfg.explicit_prompt, rng)?;
    let spec = if cfg.explicit_prompt.is_empty() {
        let style = prompt::choose_style(&cfg.styles_file, rng)?;
        PromptSpec {
            text: prompt::combine(&spec.text, &style),
            provenance_url: spec.provenance_url,
        }
    } else {
        spec
    };

    let identifier = derive_identifier(&spec.text, cfg.seed, cfg.steps, cfg.width, cfg.height);

    std::fs::create_dir_all(&cfg.output_dir).map_err(|source| ArtifactError::Io {
        path: cfg.output_dir.display().to_string(),
        source,
    })?;
    let raw_path = cfg.output_dir.join(format!("{identifier}.png"));

    let params = GenerationParams {
        prompt: spec.text.clone(),
        seed: cfg.seed,
        steps: cfg.steps,
        width: cfg.width,
        height: cfg.height,
        model_path: cfg.model_path.clone(),
        synthesizer_path: cfg.synthesizer_path.clone(),
    };
    synthesizer.synthesize(&params, &raw_path)?;

    let artifacts = publish::publish(
        &raw_path,
        &spec.text,
        spec.provenance_url.as_deref(),
        &identifier,
        &cfg.output_dir,
    )?;

    Ok(RunResult {
        prompt: spec,
        identifier,
        artifacts,
    })
}
