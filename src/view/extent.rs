use serde::Serialize;

/// Rectangle in map coordinates, ordered `[min_x, min_y, max_x, max_y]`.
///
/// Images are placed with their top-left corner at the origin and Y growing
/// upwards, so a `width x height` image covers `[0, -height, width, 0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Extent of a full-resolution image: `[0, -height, width, 0]`.
    pub fn for_image(width: u32, height: u32) -> Self {
        Self::new(0.0, -(height as f64), width as f64, 0.0)
    }

    /// Extent centered on `center` covering `width x height` map units.
    pub fn around(center: (f64, f64), width: f64, height: f64) -> Self {
        let (cx, cy) = center;
        Self::new(
            cx - width / 2.0,
            cy - height / 2.0,
            cx + width / 2.0,
            cy + height / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Top-left corner, the tile grid origin.
    pub fn top_left(&self) -> (f64, f64) {
        (self.min_x, self.max_y)
    }

    pub fn contains(&self, (x, y): (f64, f64)) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Clamp a point into the extent.
    pub fn clamp(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            x.clamp(self.min_x, self.max_x),
            y.clamp(self.min_y, self.max_y),
        )
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }
}
