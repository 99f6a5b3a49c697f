//! Conversion between normalized label coordinates and canvas pixels.

/// How a pixel coordinate is divided into the `[0, 1]` range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Normalization {
    /// Divide by `dimension - 1`: the last pixel maps to exactly 1.0.
    EdgeInclusive,
    /// Divide by `dimension`: 0.5 maps to exactly `dimension / 2`.
    EdgeExclusive,
}

impl Normalization {
    fn span(self, dimension: u32) -> f64 {
        match self {
            Normalization::EdgeInclusive => dimension.saturating_sub(1).max(1) as f64,
            Normalization::EdgeExclusive => dimension.max(1) as f64,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoordinateMapper {
    pub width: u32,
    pub height: u32,
    pub normalization: Normalization,
}

impl CoordinateMapper {
    pub fn new(width: u32, height: u32, normalization: Normalization) -> Self {
        Self {
            width,
            height,
            normalization,
        }
    }

    pub fn to_normalized(&self, p: PixelPoint) -> NormalizedPoint {
        let (x, y) = self.normalize_f64(p.x as f64, p.y as f64);
        NormalizedPoint { x, y }
    }

    pub fn to_pixel(&self, n: NormalizedPoint) -> PixelPoint {
        let (x, y) = self.to_pixel_f64(n.x, n.y);
        PixelPoint {
            x: x.round() as i32,
            y: y.round() as i32,
        }
    }

    pub fn normalize_f64(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x / self.normalization.span(self.width),
            y / self.normalization.span(self.height),
        )
    }

    pub fn to_pixel_f64(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.normalization.span(self.width),
            y * self.normalization.span(self.height),
        )
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as i64) < self.width as i64 && (y as i64) < self.height as i64
    }

    /// Clamp a pixel position into the canvas.
    pub fn clamp(&self, x: i32, y: i32) -> (i32, i32) {
        let max_x = self.width.saturating_sub(1) as i32;
        let max_y = self.height.saturating_sub(1) as i32;
        (x.clamp(0, max_x), y.clamp(0, max_y))
    }
}
