use crate::renderer::Surface;
use crate::scene::Color;
use crate::vector::Vector2D;

/// Owned 0RGB pixel buffer at the internal render resolution
pub struct FrameBuffer {
    pixels: Vec<u32>,
    width: usize,
    height: usize,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel index range whose centres fall in `[start, end)`, clipped to `len`
    fn span(start: f64, end: f64, len: usize) -> (usize, usize) {
        let lo = start.round().clamp(0.0, len as f64) as usize;
        let hi = end.round().clamp(0.0, len as f64) as usize;
        (lo, hi)
    }

    /// Fill every pixel whose centre passes `inside`, scanning only the box
    fn fill_where(
        &mut self,
        min: Vector2D,
        max: Vector2D,
        color: Color,
        inside: impl Fn(Vector2D) -> bool,
    ) {
        if !min.is_finite() || !max.is_finite() {
            return;
        }
        let (x0, x1) = Self::span(min.x.floor(), max.x.ceil(), self.width);
        let (y0, y1) = Self::span(min.y.floor(), max.y.ceil(), self.height);
        for y in y0..y1 {
            let row = y * self.width;
            for x in x0..x1 {
                if inside(Vector2D::new(x as f64 + 0.5, y as f64 + 0.5)) {
                    self.pixels[row + x] = color.0;
                }
            }
        }
    }
}

impl Surface for FrameBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn fill_circle(&mut self, center: Vector2D, radius: f64, color: Color) {
        let r = radius.max(0.5);
        let extent = Vector2D::new(r, r);
        self.fill_where(center - extent, center + extent, color, |p| {
            p.distance_to(center) <= r
        });
    }

    fn draw_line(&mut self, start: Vector2D, end: Vector2D, width: f64, color: Color) {
        // Thinner than a pixel still shows up
        let half = (width * 0.5).max(0.5);
        let min = Vector2D::new(start.x.min(end.x) - half, start.y.min(end.y) - half);
        let max = Vector2D::new(start.x.max(end.x) + half, start.y.max(end.y) + half);

        let seg = end - start;
        let len_sq = seg.dot(seg);
        self.fill_where(min, max, color, |p| {
            // Distance from the pixel centre to the closest point on the segment
            let t = if len_sq > 0.0 {
                ((p - start).dot(seg) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            p.distance_to(start.lerp(end, t)) <= half
        });
    }

    fn fill_rect(&mut self, origin: Vector2D, width: f64, height: f64, color: Color) {
        if !origin.is_finite() || !width.is_finite() || !height.is_finite() {
            return;
        }
        let (x0, x1) = Self::span(origin.x, origin.x + width, self.width);
        let (y0, y1) = Self::span(origin.y, origin.y + height, self.height);
        for y in y0..y1 {
            let row = y * self.width;
            self.pixels[row + x0..row + x1].fill(color.0);
        }
    }
}
