//! Prompt text overlay.
//!
//! Stamps the word-wrapped prompt (and optionally a `Source:` provenance
//! line) onto the bottom-left of a generated raster, in place. The glyphs
//! get a readability outline: each line is stamped at every 1-pixel offset
//! in a 3×3 neighborhood in the outline color, then once more in the fill
//! color on top. Bordered text without true stroke rendering — the e-ink
//! palette is too coarse for anti-aliased subtlety anyway.
//!
//! Layout rules:
//!
//! - Font size scales with image width: `max(16, width / 40)`.
//! - Wrapping is fixed-width at 60 characters, by character count. Glyph
//!   measurement would be more precise, but the prompt is a caption, not
//!   typography.
//! - The text block anchors 10px from the bottom-left. A block taller than
//!   the image clamps to the 10px top margin and is allowed to run off the
//!   bottom.

pub mod font;

use std::path::Path;

use image::Rgba;

use crate::publish::ArtifactError;
use font::Typeface;

/// Characters per wrapped line.
const WRAP_WIDTH: usize = 60;
/// Distance from the image edges to the text block, in pixels.
const MARGIN: i32 = 10;

const FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
const OUTLINE: Rgba<u8> = Rgba([0, 0, 0, 255]);
/// Dimmer fill for the provenance line.
const SOURCE_FILL: Rgba<u8> = Rgba([190, 190, 190, 255]);

/// Font size for a given image width.
pub fn font_size_for_width(width: u32) -> u32 {
    (width / 40).max(16)
}

/// Split `text` into fixed-width chunks of `width` characters.
///
/// Character-count wrapping, not word-boundary-aware: it bounds the line
/// width without measuring glyphs.
pub fn wrap_fixed(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Top edge of the text block: bottom-anchored with a margin, clamped to
/// the top margin when the block is taller than the image.
pub fn block_top(image_height: u32, block_height: i32) -> i32 {
    (image_height as i32 - MARGIN - block_height).max(MARGIN)
}

/// Annotate the image at `path` in place with the system typeface.
pub fn annotate(path: &Path, prompt: &str, provenance: Option<&str>) -> Result<(), ArtifactError> {
    annotate_with_face(path, prompt, provenance, &Typeface::load_default())
}

/// Annotate with a caller-chosen face. Tests use [`Typeface::builtin`] for
/// machine-independent output.
pub fn annotate_with_face(
    path: &Path,
    prompt: &str,
    provenance: Option<&str>,
    face: &Typeface,
) -> Result<(), ArtifactError> {
    let mut img = image::open(path)
        .map_err(|source| ArtifactError::Image {
            path: path.display().to_string(),
            source,
        })?
        .to_rgba8();

    let font_size = font_size_for_width(img.width());
    let line_height = (font_size + 6) as i32;
    let lines = wrap_fixed(prompt, WRAP_WIDTH);
    let line_count = lines.len() + usize::from(provenance.is_some());
    let y0 = block_top(img.height(), line_count as i32 * line_height);

    for (i, line) in lines.iter().enumerate() {
        let y = y0 + i as i32 * line_height;
        stamp_outlined(&mut img, face, line, MARGIN, y, font_size, FILL);
    }
    if let Some(url) = provenance {
        let y = y0 + lines.len() as i32 * line_height;
        let line = format!("Source: {url}");
        stamp_outlined(&mut img, face, &line, MARGIN, y, font_size, SOURCE_FILL);
    }

    img.save(path).map_err(|source| ArtifactError::Image {
        path: path.display().to_string(),
        source,
    })?;
    Ok(())
}

/// Outline-stamp one line: outline color at all nine 3×3 offsets, then the
/// fill color once on top.
fn stamp_outlined(
    img: &mut image::RgbaImage,
    face: &Typeface,
    line: &str,
    x: i32,
    y: i32,
    size: u32,
    fill: Rgba<u8>,
) {
    for dx in -1..=1 {
        for dy in -1..=1 {
            face.draw_line(img, line, x + dx, y + dy, size, OUTLINE);
        }
    }
    face.draw_line(img, line, x, y, size, fill);
}
