//! Software rasterizer over a borrowed 0xAARRGGBB pixel buffer
//!
//! Every primitive clips to the bitmap and silently does nothing for
//! geometry that is off-screen or degenerate. All writes except `clear`
//! composite with alpha-over.

use glam::Vec2;

use crate::sim::Box2;

/// A non-owning view into a window layer's pixel buffer
///
/// Row `y` starts at `y * stride`; only the first `width` pixels of a row
/// belong to the view.
pub struct Bitmap<'a> {
    pixels: &'a mut [u32],
    width: usize,
    height: usize,
    stride: usize,
}

/// Alpha-over of `fg` onto `bg`, both 0xAARRGGBB
///
/// Channels are `fg * a + bg * (1 - a)` with `a` the alpha of `fg`
/// normalized to [0, 1]. The result alpha is `a + bg_a * (1 - a)`.
#[inline]
pub fn blend(fg: u32, bg: u32) -> u32 {
    let alpha = fg >> 24;
    if alpha == 0xff {
        return fg;
    }
    if alpha == 0 {
        return bg;
    }

    let a = alpha as f32 / 255.0;
    let channel = |shift: u32| {
        let f = ((fg >> shift) & 0xff) as f32 / 255.0;
        let b = ((bg >> shift) & 0xff) as f32 / 255.0;
        let out = f * a + b * (1.0 - a);
        ((out * 255.0).round() as u32).min(0xff) << shift
    };
    let bg_a = (bg >> 24) as f32 / 255.0;
    let out_a = (((a + bg_a * (1.0 - a)) * 255.0).round() as u32).min(0xff);

    (out_a << 24) | channel(16) | channel(8) | channel(0)
}

impl<'a> Bitmap<'a> {
    /// Wrap a buffer of at least `(height - 1) * stride + width` pixels
    ///
    /// # Panics
    /// If `stride < width` or the buffer is too short. Both are window layer
    /// bugs.
    pub fn new(pixels: &'a mut [u32], width: usize, height: usize, stride: usize) -> Self {
        assert!(stride >= width, "bitmap stride {stride} below width {width}");
        let required = if height == 0 || width == 0 {
            0
        } else {
            (height - 1) * stride + width
        };
        assert!(
            pixels.len() >= required,
            "bitmap buffer holds {} pixels, {width}x{height} stride {stride} needs {required}",
            pixels.len()
        );

        Self {
            pixels,
            width,
            height,
            stride,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `[0, width) x [0, height)` in pixels
    pub fn bounds(&self) -> Box2 {
        Box2::new(Vec2::ZERO, Vec2::new(self.width as f32, self.height as f32))
    }

    /// A view of the pixels covered by `area`, clipped to this bitmap
    ///
    /// Edges are rounded to the nearest pixel boundary. An area entirely
    /// outside yields an empty bitmap.
    pub fn sub_bitmap(&mut self, area: Box2) -> Bitmap<'_> {
        let (x0, x1) = Self::clip_span(area.min.x, area.max.x, self.width);
        let (y0, y1) = Self::clip_span(area.min.y, area.max.y, self.height);
        let (width, height) = (x1 - x0, y1 - y0);

        let start = if width == 0 || height == 0 {
            self.pixels.len()
        } else {
            y0 * self.stride + x0
        };

        Bitmap {
            pixels: &mut self.pixels[start..],
            width: if height == 0 { 0 } else { width },
            height: if width == 0 { 0 } else { height },
            stride: self.stride,
        }
    }

    /// Pixel range `[round(from), round(to))` clamped to `[0, limit]`
    fn clip_span(from: f32, to: f32, limit: usize) -> (usize, usize) {
        let clamp = |v: f32| (v.round().max(0.0) as usize).min(limit);
        let (a, b) = (clamp(from), clamp(to));
        (a, b.max(a))
    }

    /// Overwrite every pixel, no blending
    pub fn clear(&mut self, color: u32) {
        for y in 0..self.height {
            let row = y * self.stride;
            self.pixels[row..row + self.width].fill(color);
        }
    }

    /// Read one pixel; `None` outside the bitmap
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| y * self.stride + x)
    }

    /// Blend `color` over one pixel; ignored outside the bitmap
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = blend(color, self.pixels[i]);
        }
    }

    /// Blend a horizontal run `[x0, x1)` on row `y`
    fn write_row(&mut self, y: i32, x0: i32, x1: i32, color: u32) {
        if y < 0 || y as usize >= self.height {
            return;
        }
        let x0 = x0.max(0) as usize;
        let x1 = (x1.max(0) as usize).min(self.width);
        if x0 >= x1 {
            return;
        }
        let row = y as usize * self.stride;
        for pixel in &mut self.pixels[row + x0..row + x1] {
            *pixel = blend(color, *pixel);
        }
    }

    /// Blend a vertical run `[y0, y1)` on column `x`
    fn write_column(&mut self, x: i32, y0: i32, y1: i32, color: u32) {
        if x < 0 || x as usize >= self.width {
            return;
        }
        let y0 = y0.max(0) as usize;
        let y1 = (y1.max(0) as usize).min(self.height);
        for y in y0..y1 {
            let i = y * self.stride + x as usize;
            self.pixels[i] = blend(color, self.pixels[i]);
        }
    }

    /// Pixels whose centers fall inside `rect`, as `(x0, y0, x1, y1)` half-open
    fn pixel_rect(rect: Box2) -> (i32, i32, i32, i32) {
        (
            rect.min.x.round() as i32,
            rect.min.y.round() as i32,
            rect.max.x.round() as i32,
            rect.max.y.round() as i32,
        )
    }

    pub fn fill_rectangle(&mut self, rect: Box2, color: u32) {
        let (x0, y0, x1, y1) = Self::pixel_rect(rect);
        for y in y0.max(0)..y1.min(self.height as i32) {
            self.write_row(y, x0, x1, color);
        }
    }

    /// One-pixel outline of the pixels `fill_rectangle` would cover
    ///
    /// Edges that fall outside the bitmap are skipped rather than moved
    /// inside. Corners are blended once.
    pub fn draw_rectangle(&mut self, rect: Box2, color: u32) {
        let (x0, y0, x1, y1) = Self::pixel_rect(rect);
        if x1 <= x0 || y1 <= y0 {
            return;
        }

        self.write_row(y0, x0, x1, color);
        if y1 - 1 > y0 {
            self.write_row(y1 - 1, x0, x1, color);
        }
        self.write_column(x0, y0 + 1, y1 - 1, color);
        if x1 - 1 > x0 {
            self.write_column(x1 - 1, y0 + 1, y1 - 1, color);
        }
    }

    /// Line between two points using the implicit line equation
    ///
    /// Endpoints snap to the pixel containing them. The loop runs along the
    /// major axis and solves `A*x + B*y + C = 0` for the minor coordinate,
    /// rounded to the nearest pixel.
    pub fn draw_line(&mut self, from: Vec2, to: Vec2, color: u32) {
        let from = from.floor();
        let to = to.floor();

        let a = to.y - from.y;
        let b = from.x - to.x;
        let c = -a * from.x - b * from.y;

        if a == 0.0 && b == 0.0 {
            self.blend_pixel(from.x as i32, from.y as i32, color);
            return;
        }

        let lo = from.min(to);
        let hi = from.max(to);

        // Only the part of the major axis inside the bitmap can plot anything
        if hi.x - lo.x > hi.y - lo.y {
            let last = self.width as f32 - 1.0;
            for x in lo.x.max(0.0) as i32..=hi.x.min(last) as i32 {
                let y = (-a * x as f32 - c) / b;
                self.blend_pixel(x, (y + 0.5).floor() as i32, color);
            }
        } else {
            let last = self.height as f32 - 1.0;
            for y in lo.y.max(0.0) as i32..=hi.y.min(last) as i32 {
                let x = (-b * y as f32 - c) / a;
                self.blend_pixel((x + 0.5).floor() as i32, y, color);
            }
        }
    }

    /// Visit one octant of a circle of pixel radius `floor(radius)`
    ///
    /// Each step moves one pixel along x and picks whichever of `y` and
    /// `y - 1` lands closer to `(floor(radius) + 0.5)²`.
    fn circle_octant(radius: f32, mut visit: impl FnMut(i32, i32)) {
        if radius.is_nan() || radius < 0.0 {
            return;
        }
        let target = radius.floor() + 0.5;
        let target = target * target;

        let mut x = 0i32;
        let mut y = radius.floor() as i32;
        while x <= y {
            visit(x, y);
            x += 1;
            let (fx, fy) = (x as f32, y as f32);
            let stay = (fx * fx + fy * fy - target).abs();
            let step = (fx * fx + (fy - 1.0) * (fy - 1.0) - target).abs();
            if step < stay {
                y -= 1;
            }
        }
    }

    /// Whether anything within `reach` pixels of `center` (per axis) lies on
    /// the bitmap
    fn reaches(&self, center: Vec2, reach: f32) -> bool {
        center.x + reach >= 0.0
            && center.y + reach >= 0.0
            && center.x - reach < self.width as f32
            && center.y - reach < self.height as f32
    }

    /// Distance from `center` to the farthest bitmap corner
    fn farthest_corner(&self, center: Vec2) -> f32 {
        let bounds = self.bounds();
        ((center - bounds.center()).abs() + bounds.size() * 0.5).length()
    }

    /// Circle outline, each pixel blended exactly once
    pub fn draw_circle(&mut self, center: Vec2, radius: f32, color: u32) {
        if radius.is_nan() || radius < 0.0 || !self.reaches(center, radius.floor() + 1.0) {
            return;
        }
        // Passes outside every pixel
        if radius > self.farthest_corner(center) + 1.0 {
            return;
        }
        let cx = center.x.floor() as i32;
        let cy = center.y.floor() as i32;

        let mut octant = Vec::new();
        Self::circle_octant(radius, |x, y| octant.push((x, y)));

        for (x, y) in octant {
            let points = [
                (x, y),
                (-x, y),
                (x, -y),
                (-x, -y),
                (y, x),
                (-y, x),
                (y, -x),
                (-y, -x),
            ];
            for (i, &(px, py)) in points.iter().enumerate() {
                if points[..i].contains(&(px, py)) {
                    continue;
                }
                self.blend_pixel(cx.saturating_add(px), cy.saturating_add(py), color);
            }
        }
    }

    /// Filled disc, one blended span per row
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: u32) {
        if radius.is_nan() || radius < 0.0 || !self.reaches(center, radius.floor() + 1.0) {
            return;
        }
        if radius > self.farthest_corner(center) + 1.0 {
            for y in 0..self.height as i32 {
                self.write_row(y, 0, self.width as i32, color);
            }
            return;
        }
        let cx = center.x.floor() as i32;
        let cy = center.y.floor() as i32;

        // Half-width of the span at each row offset
        let rows = radius.floor() as usize + 1;
        let mut half_width = vec![0i32; rows];
        Self::circle_octant(radius, |x, y| {
            half_width[y as usize] = half_width[y as usize].max(x);
            half_width[x as usize] = half_width[x as usize].max(y);
        });

        for (dy, &half) in half_width.iter().enumerate() {
            let dy = dy as i32;
            let x0 = cx.saturating_sub(half);
            let x1 = cx.saturating_add(half).saturating_add(1);
            self.write_row(cy.saturating_add(dy), x0, x1, color);
            if dy != 0 {
                self.write_row(cy.saturating_sub(dy), x0, x1, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: u32 = 0xffff0000;
    const BLACK: u32 = 0xff000000;

    fn count(bitmap: &Bitmap, color: u32) -> usize {
        let mut n = 0;
        for y in 0..bitmap.height() as i32 {
            for x in 0..bitmap.width() as i32 {
                if bitmap.pixel(x, y) == Some(color) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_blend() {
        assert_eq!(blend(RED, BLACK), RED);
        assert_eq!(blend(0x00ff0000, BLACK), BLACK);
        // Half red over opaque blue
        assert_eq!(blend(0x80ff0000, 0xff0000ff), 0xff80007f);
    }

    #[test]
    fn test_fill_rectangle_clips() {
        let mut pixels = vec![BLACK; 16 * 8];
        let mut bitmap = Bitmap::new(&mut pixels, 16, 8, 16);
        bitmap.fill_rectangle(Box2::new(Vec2::new(-4.0, -4.0), Vec2::new(4.0, 2.0)), RED);
        assert_eq!(count(&bitmap, RED), 8);
        bitmap.fill_rectangle(Box2::new(Vec2::new(20.0, 0.0), Vec2::new(30.0, 8.0)), RED);
        bitmap.fill_rectangle(Box2::new(Vec2::new(5.0, 5.0), Vec2::new(5.0, 7.0)), RED);
        assert_eq!(count(&bitmap, RED), 8);
    }

    #[test]
    fn test_stride_padding_untouched() {
        let mut pixels = vec![0u32; 6 * 4];
        {
            let mut bitmap = Bitmap::new(&mut pixels, 4, 4, 6);
            bitmap.clear(BLACK);
            bitmap.fill_rectangle(Box2::new(Vec2::ZERO, Vec2::splat(100.0)), RED);
        }
        for row in pixels.chunks(6) {
            assert_eq!(&row[..4], &[RED; 4]);
            assert_eq!(&row[4..], &[0, 0]);
        }
    }

    #[test]
    fn test_draw_rectangle_outline() {
        let mut pixels = vec![BLACK; 10 * 10];
        let mut bitmap = Bitmap::new(&mut pixels, 10, 10, 10);
        bitmap.draw_rectangle(Box2::new(Vec2::new(2.0, 2.0), Vec2::new(7.0, 6.0)), RED);
        // 5x4 box: perimeter of 14 pixels
        assert_eq!(count(&bitmap, RED), 14);
        assert_eq!(bitmap.pixel(4, 4), Some(BLACK));
    }

    #[test]
    fn test_draw_rectangle_blends_corners_once() {
        let mut pixels = vec![BLACK; 8 * 8];
        let mut bitmap = Bitmap::new(&mut pixels, 8, 8, 8);
        bitmap.draw_rectangle(Box2::new(Vec2::new(1.0, 1.0), Vec2::new(6.0, 6.0)), 0x80ff0000);
        let edge = bitmap.pixel(3, 1);
        assert_eq!(bitmap.pixel(1, 1), edge);
        assert_eq!(bitmap.pixel(5, 5), edge);
    }

    #[test]
    fn test_draw_rectangle_skips_offscreen_edges() {
        let mut pixels = vec![BLACK; 8 * 8];
        let mut bitmap = Bitmap::new(&mut pixels, 8, 8, 8);
        bitmap.draw_rectangle(Box2::new(Vec2::new(-2.0, 2.0), Vec2::new(4.0, 20.0)), RED);
        // Top edge from x=0..4 and the right edge from y=3 down; no left or bottom edge
        assert_eq!(bitmap.pixel(0, 2), Some(RED));
        assert_eq!(bitmap.pixel(0, 3), Some(BLACK));
        assert_eq!(bitmap.pixel(3, 7), Some(RED));
        assert_eq!(count(&bitmap, RED), 4 + 5);
    }

    #[test]
    fn test_draw_line() {
        let mut pixels = vec![BLACK; 10 * 10];
        let mut bitmap = Bitmap::new(&mut pixels, 10, 10, 10);
        bitmap.draw_line(Vec2::new(1.0, 1.0), Vec2::new(8.0, 1.0), RED);
        assert_eq!(count(&bitmap, RED), 8);

        bitmap.clear(BLACK);
        bitmap.draw_line(Vec2::new(0.5, 0.5), Vec2::new(9.5, 9.5), RED);
        for i in 0..10 {
            assert_eq!(bitmap.pixel(i, i), Some(RED));
        }
        assert_eq!(count(&bitmap, RED), 10);

        bitmap.clear(BLACK);
        bitmap.draw_line(Vec2::new(3.2, 4.7), Vec2::new(3.9, 4.1), RED);
        assert_eq!(count(&bitmap, RED), 1);
        assert_eq!(bitmap.pixel(3, 4), Some(RED));
    }

    #[test]
    fn test_draw_line_steep_and_clipped() {
        let mut pixels = vec![BLACK; 10 * 10];
        let mut bitmap = Bitmap::new(&mut pixels, 10, 10, 10);
        bitmap.draw_line(Vec2::new(5.0, -20.0), Vec2::new(5.0, 30.0), RED);
        assert_eq!(count(&bitmap, RED), 10);
    }

    #[test]
    fn test_draw_circle_is_symmetric() {
        let mut pixels = vec![BLACK; 32 * 32];
        let mut bitmap = Bitmap::new(&mut pixels, 32, 32, 32);
        bitmap.draw_circle(Vec2::splat(16.0), 6.0, RED);

        assert_eq!(bitmap.pixel(16, 10), Some(RED));
        assert_eq!(bitmap.pixel(16, 22), Some(RED));
        assert_eq!(bitmap.pixel(10, 16), Some(RED));
        assert_eq!(bitmap.pixel(22, 16), Some(RED));
        assert_eq!(bitmap.pixel(16, 16), Some(BLACK));
        for y in 0..32 {
            for x in 0..32 {
                let here = bitmap.pixel(x, y);
                assert_eq!(here, bitmap.pixel(32 - x, y).or(here));
                assert_eq!(here, bitmap.pixel(y, x));
            }
        }
    }

    #[test]
    fn test_draw_circle_blends_each_pixel_once() {
        let mut pixels = vec![BLACK; 16 * 16];
        let mut bitmap = Bitmap::new(&mut pixels, 16, 16, 16);
        bitmap.draw_circle(Vec2::splat(8.0), 4.0, 0x80ff0000);
        let once = blend(0x80ff0000, BLACK);
        for y in 0..16 {
            for x in 0..16 {
                let p = bitmap.pixel(x, y).unwrap_or(BLACK);
                assert!(p == BLACK || p == once, "pixel ({x},{y}) blended twice");
            }
        }
    }

    #[test]
    fn test_fill_circle_covers_outline() {
        let mut outline = vec![BLACK; 32 * 32];
        let mut filled = vec![BLACK; 32 * 32];
        Bitmap::new(&mut outline, 32, 32, 32).draw_circle(Vec2::splat(16.0), 7.0, RED);
        Bitmap::new(&mut filled, 32, 32, 32).fill_circle(Vec2::splat(16.0), 7.0, RED);

        for (o, f) in outline.iter().zip(&filled) {
            if *o == RED {
                assert_eq!(*f, RED);
            }
        }
        assert_eq!(filled[16 * 32 + 16], RED);
        let red = |pixels: &[u32]| pixels.iter().filter(|&&p| p == RED).count();
        assert!(red(&filled) > red(&outline));
    }

    #[test]
    fn test_zero_radius_circle_is_one_pixel() {
        let mut pixels = vec![BLACK; 4 * 4];
        let mut bitmap = Bitmap::new(&mut pixels, 4, 4, 4);
        bitmap.fill_circle(Vec2::new(1.5, 2.5), 0.0, RED);
        assert_eq!(count(&bitmap, RED), 1);
        assert_eq!(bitmap.pixel(1, 2), Some(RED));
        bitmap.draw_circle(Vec2::ZERO, -3.0, RED);
        assert_eq!(count(&bitmap, RED), 1);
    }

    #[test]
    fn test_far_off_shapes_draw_nothing() {
        let mut pixels = vec![BLACK; 4 * 4];
        let mut bitmap = Bitmap::new(&mut pixels, 4, 4, 4);
        for center in [Vec2::new(3.0e9, 0.0), Vec2::new(-3.0e9, 2.0), Vec2::new(1.0, 3.0e9)] {
            bitmap.draw_circle(center, 6.0, RED);
            bitmap.fill_circle(center, 6.0, RED);
        }
        bitmap.draw_circle(Vec2::new(f32::NAN, 1.0), 2.0, RED);
        bitmap.fill_circle(Vec2::new(1.0, f32::INFINITY), 2.0, RED);
        // Encloses the whole bitmap without touching it
        bitmap.draw_circle(Vec2::splat(2.0), 1.0e9, RED);
        assert_eq!(count(&bitmap, RED), 0);

        bitmap.fill_circle(Vec2::splat(2.0), 1.0e9, RED);
        assert_eq!(count(&bitmap, RED), 16);
    }

    #[test]
    fn test_sub_bitmap_offsets_and_clips() {
        let mut pixels = vec![BLACK; 10 * 10];
        {
            let mut bitmap = Bitmap::new(&mut pixels, 10, 10, 10);
            let mut sub = bitmap.sub_bitmap(Box2::new(Vec2::new(2.0, 3.0), Vec2::new(20.0, 5.0)));
            assert_eq!((sub.width(), sub.height()), (8, 2));
            sub.fill_rectangle(Box2::new(Vec2::ZERO, Vec2::splat(100.0)), RED);

            let empty = bitmap.sub_bitmap(Box2::new(Vec2::splat(12.0), Vec2::splat(15.0)));
            assert_eq!((empty.width(), empty.height()), (0, 0));
        }
        assert_eq!(pixels.iter().filter(|&&p| p == RED).count(), 16);
        assert_eq!(pixels[3 * 10 + 2], RED);
        assert_eq!(pixels[3 * 10 + 1], BLACK);
        assert_eq!(pixels[5 * 10 + 2], BLACK);
    }
}
