//! External image synthesis.
//!
//! Synthesis is an opaque capability behind the [`Synthesizer`] trait. The
//! production implementation, [`SdProcess`], shells out to OnnxStream's `sd`
//! binary with a fixed flag set:
//!
//! ```text
//! sd --xl --turbo --models-path <model> --rpi-lowmem \
//!    --prompt <text> --seed <n> --output <path> --steps <n> --res <W>x<H>
//! ```
//!
//! The process is synchronous and blocking, with no timeout — on a Raspberry
//! Pi a run takes minutes, and the single-shot cron usage means a hung
//! process hangs nothing else. Exit code 0 is the whole success contract;
//! the pipeline never inspects the process's output stream.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("Model path not found: {0}")]
    ModelMissing(String),
    #[error("Failed to start synthesizer '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("Synthesizer exited with {status}")]
    Failed { status: std::process::ExitStatus },
}

/// Everything that determines one synthesis invocation.
///
/// Immutable by convention: the artifact identifier is derived from these
/// same values, so mutating them mid-run would desynchronize filenames from
/// content.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub prompt: String,
    pub seed: u64,
    pub steps: u32,
    pub width: u32,
    pub height: u32,
    /// Directory holding the ONNX model weights.
    pub model_path: String,
    /// Path to the `sd` executable.
    pub synthesizer_path: String,
}

/// The image-synthesis capability.
///
/// On `Ok(())` a decodable raster must exist at `output` — downstream stages
/// verify and fail with an artifact error if it does not. Tests implement
/// this with doubles that write a blank raster or fail on command.
pub trait Synthesizer {
    fn synthesize(&self, params: &GenerationParams, output: &Path) -> Result<(), SynthesisError>;
}

/// Build the full argument vector for one invocation without executing it.
///
/// Useful for testing parameter construction.
pub fn plan_invocation(params: &GenerationParams, output: &Path) -> Vec<OsString> {
    vec![
        "--xl".into(),
        "--turbo".into(),
        "--models-path".into(),
        params.model_path.clone().into(),
        "--rpi-lowmem".into(),
        "--prompt".into(),
        params.prompt.clone().into(),
        "--seed".into(),
        params.seed.to_string().into(),
        "--output".into(),
        output.as_os_str().to_os_string(),
        "--steps".into(),
        params.steps.to_string().into(),
        "--res".into(),
        format!("{}x{}", params.width, params.height).into(),
    ]
}

/// Production synthesizer: the OnnxStream `sd` process.
pub struct SdProcess;

impl SdProcess {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SdProcess {
    fn default() -> Self {
        Self::new()
    }
}

impl Synthesizer for SdProcess {
    fn synthesize(&self, params: &GenerationParams, output: &Path) -> Result<(), SynthesisError> {
        if !Path::new(&params.model_path).exists() {
            return Err(SynthesisError::ModelMissing(params.model_path.clone()));
        }
        let status = Command::new(&params.synthesizer_path)
            .args(plan_invocation(params, output))
            .status()
            .map_err(|source| SynthesisError::Spawn {
                program: params.synthesizer_path.clone(),
                source,
            })?;
        if !status.success() {
            return Err(SynthesisError::Failed { status });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn params(sd: &str, model: &str) -> GenerationParams {
        GenerationParams {
            prompt: "a rose".to_string(),
            seed: 42,
            steps: 5,
            width: 800,
            height: 480,
            model_path: model.to_string(),
            synthesizer_path: sd.to_string(),
        }
    }

    #[test]
    fn invocation_uses_the_fixed_flag_vocabulary() {
        let args = plan_invocation(&params("sd", "models/sdxl"), Path::new("/out/img.png"));
        let args: Vec<String> = args
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "--xl",
                "--turbo",
                "--models-path",
                "models/sdxl",
                "--rpi-lowmem",
                "--prompt",
                "a rose",
                "--seed",
                "42",
                "--output",
                "/out/img.png",
                "--steps",
                "5",
                "--res",
                "800x480",
            ]
        );
    }

    #[test]
    fn missing_model_path_fails_before_spawn() {
        let err = SdProcess::new()
            .synthesize(
                &params("true", "/no/such/model"),
                Path::new("/tmp/never.png"),
            )
            .unwrap_err();
        assert!(matches!(err, SynthesisError::ModelMissing(_)));
    }

    #[test]
    fn missing_executable_is_a_spawn_error() {
        let tmp = TempDir::new().unwrap();
        let model = tmp.path().to_string_lossy().into_owned();
        let err = SdProcess::new()
            .synthesize(
                &params("/no/such/binary", &model),
                Path::new("/tmp/never.png"),
            )
            .unwrap_err();
        assert!(matches!(err, SynthesisError::Spawn { .. }));
    }

    #[test]
    fn nonzero_exit_is_a_failure() {
        let tmp = TempDir::new().unwrap();
        let model = tmp.path().to_string_lossy().into_owned();
        let err = SdProcess::new()
            .synthesize(&params("false", &model), Path::new("/tmp/never.png"))
            .unwrap_err();
        assert!(matches!(err, SynthesisError::Failed { .. }));
    }

    #[test]
    fn zero_exit_is_success() {
        let tmp = TempDir::new().unwrap();
        let model = tmp.path().to_string_lossy().into_owned();
        SdProcess::new()
            .synthesize(&params("true", &model), Path::new("/tmp/never.png"))
            .unwrap();
    }
}
