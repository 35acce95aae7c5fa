//! Typeface loading and single-line rasterization.
//!
//! Two faces, one contract:
//!
//! - **Vector** — a TrueType face loaded from well-known system paths,
//!   rasterized with `ab_glyph` coverage blending.
//! - **Bitmap** — a built-in 5×7 ASCII face scaled by integer replication.
//!
//! The bitmap face is the degrade-not-fail path: on a bare Raspberry Pi OS
//! Lite image with no fonts installed, the overlay still renders. Loading a
//! typeface therefore has no error type at all — [`Typeface::load_default`]
//! always returns something that can draw.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};

/// System TrueType faces tried in order, Raspberry Pi OS / Debian first.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
];

/// A face that can stamp one line of text onto a raster.
pub enum Typeface {
    Vector(FontVec),
    Bitmap,
}

impl Typeface {
    /// Load the first available system face, falling back to the built-in
    /// bitmap face. Never fails.
    pub fn load_default() -> Self {
        for candidate in SYSTEM_FONT_CANDIDATES {
            if let Ok(bytes) = std::fs::read(candidate)
                && let Ok(font) = FontVec::try_from_vec(bytes)
            {
                return Typeface::Vector(font);
            }
        }
        Typeface::Bitmap
    }

    /// The built-in bitmap face. Deterministic across machines, which is
    /// what tests want.
    pub fn builtin() -> Self {
        Typeface::Bitmap
    }

    /// Stamp one line of text with its top-left corner at `(x, y)`.
    ///
    /// `size` is the nominal glyph height in pixels. Pixels falling outside
    /// the image are discarded.
    pub fn draw_line(
        &self,
        img: &mut RgbaImage,
        text: &str,
        x: i32,
        y: i32,
        size: u32,
        color: Rgba<u8>,
    ) {
        match self {
            Typeface::Vector(font) => draw_line_vector(img, font, text, x, y, size, color),
            Typeface::Bitmap => draw_line_bitmap(img, text, x, y, size, color),
        }
    }
}

/// Blend `color` into the pixel at `(x, y)` with coverage `c` in 0..=1.
fn blend(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, c: f32) {
    if c <= 0.0 || x < 0 || y < 0 || x >= img.width() as i32 || y >= img.height() as i32 {
        return;
    }
    let c = c.min(1.0);
    let px = img.get_pixel_mut(x as u32, y as u32);
    for i in 0..3 {
        px.0[i] = (px.0[i] as f32 * (1.0 - c) + color.0[i] as f32 * c).round() as u8;
    }
    px.0[3] = 255;
}

fn draw_line_vector(
    img: &mut RgbaImage,
    font: &FontVec,
    text: &str,
    x: i32,
    y: i32,
    size: u32,
    color: Rgba<u8>,
) {
    let scale = PxScale::from(size as f32);
    let scaled = font.as_scaled(scale);
    let ascent = scaled.ascent();
    let mut caret = x as f32;

    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        let glyph = id.with_scale_and_position(scale, point(caret, y as f32 + ascent));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                blend(
                    img,
                    bounds.min.x as i32 + gx as i32,
                    bounds.min.y as i32 + gy as i32,
                    color,
                    coverage,
                );
            });
        }
        caret += scaled.h_advance(id);
    }
}

fn draw_line_bitmap(
    img: &mut RgbaImage,
    text: &str,
    x: i32,
    y: i32,
    size: u32,
    color: Rgba<u8>,
) {
    // Integer replication: a nominal 16px line renders glyphs 14px tall,
    // close enough to the vector face for layout purposes.
    let scale = (size / 8).max(1) as i32;
    let mut caret = x;

    for ch in text.chars() {
        let columns = glyph_columns(ch);
        for (col, bits) in columns.iter().enumerate() {
            for row in 0..7 {
                if bits & (1 << row) != 0 {
                    for dx in 0..scale {
                        for dy in 0..scale {
                            blend(
                                img,
                                caret + col as i32 * scale + dx,
                                y + row * scale + dy,
                                color,
                                1.0,
                            );
                        }
                    }
                }
            }
        }
        // 5 glyph columns + 1 column of spacing
        caret += 6 * scale;
    }
}

/// Column bitmap for one ASCII glyph, bit 0 = top row.
///
/// Characters outside printable ASCII render as `?` — prompts are
/// synthesizer input and overwhelmingly ASCII, and a visible placeholder
/// beats a silent gap.
fn glyph_columns(ch: char) -> [u8; 5] {
    let idx = (ch as usize).wrapping_sub(0x20);
    if idx < FONT_5X7.len() {
        FONT_5X7[idx]
    } else {
        FONT_5X7[('?' as usize) - 0x20]
    }
}

/// Classic 5×7 ASCII font, one entry per character from `' '` to `'~'`.
/// Each entry is five column bytes, least-significant bit at the top.
const FONT_5X7: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // '!'
    [0x00, 0x07, 0x00, 0x07, 0x00], // '"'
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // '#'
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // '$'
    [0x23, 0x13, 0x08, 0x64, 0x62], // '%'
    [0x36, 0x49, 0x55, 0x22, 0x50], // '&'
    [0x00, 0x05, 0x03, 0x00, 0x00], // '\''
    [0x00, 0x1C, 0x22, 0x41, 0x00], // '('
    [0x00, 0x41, 0x22, 0x1C, 0x00], // ')'
    [0x14, 0x08, 0x3E, 0x08, 0x14], // '*'
    [0x08, 0x08, 0x3E, 0x08, 0x08], // '+'
    [0x00, 0x50, 0x30, 0x00, 0x00], // ','
    [0x08, 0x08, 0x08, 0x08, 0x08], // '-'
    [0x00, 0x60, 0x60, 0x00, 0x00], // '.'
    [0x20, 0x10, 0x08, 0x04, 0x02], // '/'
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // '0'
    [0x00, 0x42, 0x7F, 0x40, 0x00], // '1'
    [0x42, 0x61, 0x51, 0x49, 0x46], // '2'
    [0x21, 0x41, 0x45, 0x4B, 0x31], // '3'
    [0x18, 0x14, 0x12, 0x7F, 0x10], // '4'
    [0x27, 0x45, 0x45, 0x45, 0x39], // '5'
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // '6'
    [0x01, 0x71, 0x09, 0x05, 0x03], // '7'
    [0x36, 0x49, 0x49, 0x49, 0x36], // '8'
    [0x06, 0x49, 0x49, 0x29, 0x1E], // '9'
    [0x00, 0x36, 0x36, 0x00, 0x00], // ':'
    [0x00, 0x56, 0x36, 0x00, 0x00], // ';'
    [0x08, 0x14, 0x22, 0x41, 0x00], // '<'
    [0x14, 0x14, 0x14, 0x14, 0x14], // '='
    [0x00, 0x41, 0x22, 0x14, 0x08], // '>'
    [0x02, 0x01, 0x51, 0x09, 0x06], // '?'
    [0x32, 0x49, 0x79, 0x41, 0x3E], // '@'
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // 'A'
    [0x7F, 0x49, 0x49, 0x49, 0x36], // 'B'
    [0x3E, 0x41, 0x41, 0x41, 0x22], // 'C'
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // 'D'
    [0x7F, 0x49, 0x49, 0x49, 0x41], // 'E'
    [0x7F, 0x09, 0x09, 0x09, 0x01], // 'F'
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // 'G'
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // 'H'
    [0x00, 0x41, 0x7F, 0x41, 0x00], // 'I'
    [0x20, 0x40, 0x41, 0x3F, 0x01], // 'J'
    [0x7F, 0x08, 0x14, 0x22, 0x41], // 'K'
    [0x7F, 0x40, 0x40, 0x40, 0x40], // 'L'
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // 'M'
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // 'N'
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // 'O'
    [0x7F, 0x09, 0x09, 0x09, 0x06], // 'P'
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // 'Q'
    [0x7F, 0x09, 0x19, 0x29, 0x46], // 'R'
    [0x46, 0x49, 0x49, 0x49, 0x31], // 'S'
    [0x01, 0x01, 0x7F, 0x01, 0x01], // 'T'
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // 'U'
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // 'V'
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // 'W'
    [0x63, 0x14, 0x08, 0x14, 0x63], // 'X'
    [0x07, 0x08, 0x70, 0x08, 0x07], // 'Y'
    [0x61, 0x51, 0x49, 0x45, 0x43], // 'Z'
    [0x00, 0x7F, 0x41, 0x41, 0x00], // '['
    [0x02, 0x04, 0x08, 0x10, 0x20], // '\\'
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ']'
    [0x04, 0x02, 0x01, 0x02, 0x04], // '^'
    [0x40, 0x40, 0x40, 0x40, 0x40], // '_'
    [0x00, 0x01, 0x02, 0x04, 0x00], // '`'
    [0x20, 0x54, 0x54, 0x54, 0x78], // 'a'
    [0x7F, 0x48, 0x44, 0x44, 0x38], // 'b'
    [0x38, 0x44, 0x44, 0x44, 0x20], // 'c'
    [0x38, 0x44, 0x44, 0x48, 0x7F], // 'd'
    [0x38, 0x54, 0x54, 0x54, 0x18], // 'e'
    [0x08, 0x7E, 0x09, 0x01, 0x02], // 'f'
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // 'g'
    [0x7F, 0x08, 0x04, 0x04, 0x78], // 'h'
    [0x00, 0x44, 0x7D, 0x40, 0x00], // 'i'
    [0x20, 0x40, 0x44, 0x3D, 0x00], // 'j'
    [0x7F, 0x10, 0x28, 0x44, 0x00], // 'k'
    [0x00, 0x41, 0x7F, 0x40, 0x00], // 'l'
    [0x7C, 0x04, 0x18, 0x04, 0x78], // 'm'
    [0x7C, 0x08, 0x04, 0x04, 0x78], // 'n'
    [0x38, 0x44, 0x44, 0x44, 0x38], // 'o'
    [0x7C, 0x14, 0x14, 0x14, 0x08], // 'p'
    [0x08, 0x14, 0x14, 0x18, 0x7C], // 'q'
    [0x7C, 0x08, 0x04, 0x04, 0x08], // 'r'
    [0x48, 0x54, 0x54, 0x54, 0x20], // 's'
    [0x04, 0x3F, 0x44, 0x40, 0x20], // 't'
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // 'u'
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // 'v'
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // 'w'
    [0x44, 0x28, 0x10, 0x28, 0x44], // 'x'
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // 'y'
    [0x44, 0x64, 0x54, 0x4C, 0x44], // 'z'
    [0x00, 0x08, 0x36, 0x41, 0x00], // '{'
    [0x00, 0x00, 0x7F, 0x00, 0x00], // '|'
    [0x00, 0x41, 0x36, 0x08, 0x00], // '}'
    [0x10, 0x08, 0x08, 0x10, 0x08], // '~'
];

#[cfg(test)]
mod tests {
    use super::*;

    fn white(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]))
    }

    fn darkened_pixels(img: &RgbaImage) -> usize {
        img.pixels().filter(|p| p.0[0] < 255).count()
    }

    #[test]
    fn bitmap_face_stamps_pixels() {
        let mut img = white(100, 30);
        Typeface::builtin().draw_line(&mut img, "Hi", 2, 2, 16, Rgba([0, 0, 0, 255]));
        assert!(darkened_pixels(&img) > 0);
    }

    #[test]
    fn space_stamps_nothing() {
        let mut img = white(100, 30);
        Typeface::builtin().draw_line(&mut img, "   ", 2, 2, 16, Rgba([0, 0, 0, 255]));
        assert_eq!(darkened_pixels(&img), 0);
    }

    #[test]
    fn out_of_bounds_drawing_is_clipped_not_panicking() {
        let mut img = white(10, 10);
        let face = Typeface::builtin();
        face.draw_line(&mut img, "overflow well past the edge", -50, -50, 16, Rgba([0, 0, 0, 255]));
        face.draw_line(&mut img, "overflow", 8, 8, 64, Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn larger_size_covers_more_pixels() {
        let mut small = white(400, 100);
        let mut large = white(400, 100);
        let face = Typeface::builtin();
        face.draw_line(&mut small, "A", 2, 2, 16, Rgba([0, 0, 0, 255]));
        face.draw_line(&mut large, "A", 2, 2, 32, Rgba([0, 0, 0, 255]));
        assert!(darkened_pixels(&large) > darkened_pixels(&small));
    }

    #[test]
    fn non_ascii_renders_placeholder_instead_of_gap() {
        let mut img = white(100, 30);
        Typeface::builtin().draw_line(&mut img, "☕", 2, 2, 16, Rgba([0, 0, 0, 255]));
        assert!(darkened_pixels(&img) > 0);
    }

    #[test]
    fn load_default_always_produces_a_usable_face() {
        let mut img = white(200, 40);
        Typeface::load_default().draw_line(&mut img, "ok", 2, 2, 16, Rgba([0, 0, 0, 255]));
        assert!(darkened_pixels(&img) > 0);
    }
}
