//! Text drawing with the 8x8 font

use glam::Vec2;

use super::bitmap::Bitmap;
use super::font::{GLYPH_HEIGHT, GLYPH_WIDTH, Glyph, glyph_or_replacement, glyph_pixel};
use crate::argb;
use crate::consts::SHADOW_COLOR;

pub const LINE_HEIGHT: usize = GLYPH_HEIGHT * 5 / 4;
const SHADOW_OFFSET: i32 = 2;

/// Draw `text` with its top-left corner at `position` (pixels)
///
/// `\n` starts a new line. Glyph pixels are opaque: a drop shadow two pixels
/// below, then the glyph shaded from white at the top to light gray at the
/// bottom. Characters without a glyph draw as U+FFFD.
pub fn draw_text(bitmap: &mut Bitmap, position: Vec2, text: &str) {
    let origin_x = position.x.floor() as i32;
    let mut x = origin_x;
    let mut y = position.y.floor() as i32;

    for c in text.chars() {
        if c == '\n' {
            x = origin_x;
            y = y.saturating_add(LINE_HEIGHT as i32);
            continue;
        }

        let glyph = glyph_or_replacement(c);
        draw_glyph(bitmap, glyph, x, y.saturating_add(SHADOW_OFFSET), |_| SHADOW_COLOR);
        draw_glyph(bitmap, glyph, x, y, |row| {
            let shade = glyph_shade(row);
            argb(0xff, shade, shade, shade)
        });

        x = x.saturating_add(GLYPH_WIDTH as i32);
    }
}

/// Opaque glyph pixels with the top-left corner at (`x`, `y`)
fn draw_glyph(bitmap: &mut Bitmap, glyph: &Glyph, x: i32, y: i32, color: impl Fn(usize) -> u32) {
    let (x, y) = (i64::from(x), i64::from(y));
    if x + GLYPH_WIDTH as i64 <= 0
        || y + GLYPH_HEIGHT as i64 <= 0
        || x >= bitmap.width() as i64
        || y >= bitmap.height() as i64
    {
        return;
    }

    for gy in 0..GLYPH_HEIGHT {
        let color = color(gy);
        for gx in 0..GLYPH_WIDTH {
            if glyph_pixel(glyph, gx, gy) {
                bitmap.blend_pixel((x + gx as i64) as i32, (y + gy as i64) as i32, color);
            }
        }
    }
}

/// Gray level of glyph row `row`: 255 at the top, fading toward 192
fn glyph_shade(row: usize) -> u8 {
    let remaining = GLYPH_HEIGHT - row;
    (192 + 64 * remaining / GLYPH_HEIGHT).min(0xff) as u8
}

/// Pixel size of the box `draw_text` covers, shadow excluded
pub fn text_size(text: &str) -> Vec2 {
    let lines = text.split('\n');
    let mut width = 0;
    let mut height = 0;
    for line in lines {
        width = width.max(line.chars().count() * GLYPH_WIDTH);
        height += LINE_HEIGHT;
    }
    // The last line is only as tall as a glyph
    height = height - LINE_HEIGHT + GLYPH_HEIGHT;
    Vec2::new(width as f32, height as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BACKGROUND_COLOR;

    fn lit(pixels: &[u32]) -> usize {
        pixels.iter().filter(|&&p| p != BACKGROUND_COLOR).count()
    }

    #[test]
    fn test_shade_gradient() {
        assert_eq!(glyph_shade(0), 255);
        assert_eq!(glyph_shade(4), 224);
        assert_eq!(glyph_shade(7), 200);
    }

    #[test]
    fn test_glyph_and_shadow() {
        let mut pixels = vec![BACKGROUND_COLOR; 16 * 16];
        draw_text(&mut Bitmap::new(&mut pixels, 16, 16, 16), Vec2::ZERO, "_");

        // Underscore on row 7, its shadow on row 9
        assert!(pixels[7 * 16..7 * 16 + 8].iter().all(|&p| p == 0xffc8c8c8));
        assert!(pixels[9 * 16..9 * 16 + 8].iter().all(|&p| p == SHADOW_COLOR));
        assert_eq!(lit(&pixels), 16);
    }

    #[test]
    fn test_newline_and_advance() {
        let mut pixels = vec![BACKGROUND_COLOR; 32 * 32];
        draw_text(&mut Bitmap::new(&mut pixels, 32, 32, 32), Vec2::ZERO, "__\n_");
        let row = |y: usize| &pixels[y * 32..y * 32 + 32];

        assert_eq!(row(7).iter().filter(|&&p| p == 0xffc8c8c8).count(), 16);
        assert_eq!(row(7 + LINE_HEIGHT).iter().filter(|&&p| p == 0xffc8c8c8).count(), 8);
    }

    #[test]
    fn test_unknown_character_uses_replacement() {
        let mut expected = vec![BACKGROUND_COLOR; 16 * 16];
        let mut actual = vec![BACKGROUND_COLOR; 16 * 16];
        draw_text(&mut Bitmap::new(&mut expected, 16, 16, 16), Vec2::ZERO, "\u{fffd}");
        draw_text(&mut Bitmap::new(&mut actual, 16, 16, 16), Vec2::ZERO, "\u{3042}");
        assert_eq!(expected, actual);
        assert!(lit(&actual) > 0);
    }

    #[test]
    fn test_clips_at_edges() {
        let mut pixels = vec![BACKGROUND_COLOR; 8 * 8];
        draw_text(&mut Bitmap::new(&mut pixels, 8, 8, 8), Vec2::new(-4.0, 4.0), "#####");
        assert!(lit(&pixels) > 0);
    }

    #[test]
    fn test_far_off_text_draws_nothing() {
        let mut pixels = vec![BACKGROUND_COLOR; 8 * 8];
        let mut bitmap = Bitmap::new(&mut pixels, 8, 8, 8);
        let long = "#".repeat(64);
        draw_text(&mut bitmap, Vec2::new(3.0e9, 0.0), &long);
        draw_text(&mut bitmap, Vec2::new(0.0, 3.0e9), "#\n#\n#");
        draw_text(&mut bitmap, Vec2::new(-3.0e9, -3.0e9), &long);
        assert_eq!(lit(&pixels), 0);
    }

    #[test]
    fn test_text_size() {
        assert_eq!(text_size("abc"), Vec2::new(24.0, 8.0));
        assert_eq!(text_size("a\nbcde"), Vec2::new(32.0, 18.0));
    }
}
