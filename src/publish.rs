//! Artifact publishing.
//!
//! One successful run persists four files under the output directory, all
//! sharing the identifier stem:
//!
//! ```text
//! <id>.png              raw raster, exactly as the synthesizer wrote it
//! <id>_with_prompt.png  annotated copy — the raw artifact stays pristine
//! <id>.txt              sidecar: prompt line + optional provenance line
//! output.png            stable alias, always the most recent raw raster
//! ```
//!
//! The alias is what the display consumer reads on a timer, so it is written
//! last: any earlier failure aborts the run with the alias still pointing at
//! the previous successful image, never at a partial one.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::overlay;

/// Fixed name of the stable alias inside the output directory.
pub const LATEST_ALIAS: &str = "output.png";

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Image error for {path}: {source}")]
    Image {
        path: String,
        source: image::ImageError,
    },
    #[error("Synthesizer reported success but wrote no raster at {0}")]
    MissingRaster(String),
}

/// The four files belonging to one published run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    pub raw_image_path: PathBuf,
    pub overlaid_image_path: PathBuf,
    pub sidecar_text_path: PathBuf,
    pub latest_alias_path: PathBuf,
}

/// Publish one run's artifacts.
///
/// `raw_path` must already exist (the synthesizer's output). The raw raster
/// is duplicated and only the duplicate is annotated; the sidecar records
/// the prompt and provenance as text; the alias copy happens last.
pub fn publish(
    raw_path: &Path,
    prompt_text: &str,
    provenance: Option<&str>,
    identifier: &str,
    output_dir: &Path,
) -> Result<ArtifactSet, ArtifactError> {
    if !raw_path.exists() {
        return Err(ArtifactError::MissingRaster(raw_path.display().to_string()));
    }

    let overlaid_path = output_dir.join(format!("{identifier}_with_prompt.png"));
    copy(raw_path, &overlaid_path)?;
    overlay::annotate(&overlaid_path, prompt_text, provenance)?;

    let sidecar_path = output_dir.join(format!("{identifier}.txt"));
    let mut sidecar = format!("Prompt: {prompt_text}\n");
    if let Some(url) = provenance {
        sidecar.push_str(&format!("Source: {url}\n"));
    }
    fs::write(&sidecar_path, sidecar).map_err(|source| ArtifactError::Io {
        path: sidecar_path.display().to_string(),
        source,
    })?;

    // Alias last: a failure anywhere above leaves it untouched
    let alias_path = output_dir.join(LATEST_ALIAS);
    copy(raw_path, &alias_path)?;

    Ok(ArtifactSet {
        raw_image_path: raw_path.to_path_buf(),
        overlaid_image_path: overlaid_path,
        sidecar_text_path: sidecar_path,
        latest_alias_path: alias_path,
    })
}

fn copy(from: &Path, to: &Path) -> Result<(), ArtifactError> {
    fs::copy(from, to).map_err(|source| ArtifactError::Io {
        path: to.display().to_string(),
        source,
    })?;
    Ok(())
}
