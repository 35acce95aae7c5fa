//! Pre-display adaptation.
//!
//! The e-ink panel driver is an external collaborator: it accepts a raster
//! at its native resolution plus a saturation scalar, and that is the whole
//! boundary. This module owns everything up to that handoff:
//!
//! - rotate 90° when the source and panel disagree on portrait vs landscape,
//! - resize to exactly the panel resolution,
//! - validate the saturation scalar into `[0, 1]`.
//!
//! The shipped [`DisplaySink`] writes a PNG preview — the simulation mode of
//! the real frame, where the Python driver owns the panel hardware.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use image::imageops::FilterType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Image error for {path}: {source}")]
    Image {
        path: String,
        source: image::ImageError,
    },
    #[error("Display validation error: {0}")]
    Validation(String),
}

/// A panel's native resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSpec {
    pub width: u32,
    pub height: u32,
}

impl PanelSpec {
    /// Pimoroni Inky Impression 7.3", the frame this tool was built around.
    pub const INKY_IMPRESSION_7: PanelSpec = PanelSpec {
        width: 800,
        height: 480,
    };

    fn is_portrait(&self) -> bool {
        self.height > self.width
    }
}

/// Validate a saturation scalar into the panel driver's accepted `[0, 1]`.
pub fn validate_saturation(saturation: f32) -> Result<f32, DisplayError> {
    if !(0.0..=1.0).contains(&saturation) {
        return Err(DisplayError::Validation(format!(
            "saturation must be in [0, 1], got {saturation}"
        )));
    }
    Ok(saturation)
}

/// Adapt a raster for a panel: orientation-matching rotation, then an exact
/// resize to the panel resolution.
pub fn adapt(image: DynamicImage, panel: PanelSpec) -> DynamicImage {
    let source_portrait = image.height() > image.width();
    let rotated = if source_portrait != panel.is_portrait() {
        image.rotate90()
    } else {
        image
    };
    rotated.resize_exact(panel.width, panel.height, FilterType::Lanczos3)
}

/// Load the raster at `path` and adapt it for `panel`.
pub fn adapt_file(path: &Path, panel: PanelSpec) -> Result<DynamicImage, DisplayError> {
    let image = image::open(path).map_err(|source| DisplayError::Image {
        path: path.display().to_string(),
        source,
    })?;
    Ok(adapt(image, panel))
}

/// The display boundary: a sink accepting an adapted raster and a validated
/// saturation scalar.
pub trait DisplaySink {
    fn show(&self, frame: &DynamicImage, saturation: f32) -> Result<(), DisplayError>;
}

/// Simulation sink — writes the adapted frame as a PNG instead of driving a
/// panel. Saturation is accepted and ignored; it only means something to
/// e-ink palette mapping.
pub struct PngPreviewSink {
    pub path: PathBuf,
}

impl DisplaySink for PngPreviewSink {
    fn show(&self, frame: &DynamicImage, _saturation: f32) -> Result<(), DisplayError> {
        frame.save(&self.path).map_err(|source| DisplayError::Image {
            path: self.path.display().to_string(),
            source,
        })
    }
}
