pub use kurbo::{BezPath, Point, Vec2};

/// Fixed drawing surface every visualization is authored against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub const FIXED: Canvas = Canvas {
        width: 640,
        height: 400,
    };

    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }
}

/// Closed interval used for every numeric clamp in the sanitizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64, // inclusive
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp `v` into the interval. An inverted interval collapses to `min`.
    pub fn clamp(self, v: f64) -> f64 {
        if self.max < self.min {
            return self.min;
        }
        v.clamp(self.min, self.max)
    }

    pub fn contains(self, v: f64) -> bool {
        v.is_finite() && self.min <= v && v <= self.max
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
