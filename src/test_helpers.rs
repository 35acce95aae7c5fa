//! Shared test utilities for the dreamframe test suite.
//!
//! Fixture writers for prompt/style files and blank rasters, plus the two
//! [`Synthesizer`] doubles the pipeline tests run against.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

use crate::synth::{GenerationParams, SynthesisError, Synthesizer};

/// Write a JSON string-list file and return its path.
pub fn write_list_file(dir: &Path, name: &str, entries: &[&str]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(entries).unwrap()).unwrap();
    path
}

/// Write a white PNG raster and return its path.
pub fn write_blank_raster(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]))
        .save(&path)
        .unwrap();
    path
}

/// Synthesizer double that always succeeds by writing a blank raster of the
/// requested resolution to the requested path.
pub struct BlankSynthesizer;

impl Synthesizer for BlankSynthesizer {
    fn synthesize(&self, params: &GenerationParams, output: &Path) -> Result<(), SynthesisError> {
        RgbaImage::from_pixel(params.width, params.height, Rgba([255, 255, 255, 255]))
            .save(output)
            .expect("blank raster write");
        Ok(())
    }
}

/// Synthesizer double that always fails, writing nothing.
pub struct FailingSynthesizer;

impl Synthesizer for FailingSynthesizer {
    fn synthesize(&self, _params: &GenerationParams, _output: &Path) -> Result<(), SynthesisError> {
        Err(SynthesisError::ModelMissing(
            "/no/such/model (test double)".into(),
        ))
    }
}
