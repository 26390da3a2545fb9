use kurbo::Shape;

use crate::foundation::core::{BezPath, Point, Vec2};

pub const ARROW_STROKE_WIDTH: f64 = 2.0;
pub const ARROWHEAD_LENGTH: f64 = 10.0;
pub const ARROWHEAD_HALF_ANGLE_DEG: f64 = 30.0;

const CIRCLE_TOLERANCE: f64 = 0.1;

/// Shaft and head of a directed segment, ready to fill.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrowGeometry {
    pub tail: Point,
    pub tip: Point,
    /// Stroked segment as a closed quad `ARROW_STROKE_WIDTH` wide.
    pub shaft: BezPath,
    /// Triangle `tip, left, right`.
    pub head: BezPath,
    pub left: Point,
    pub right: Point,
}

/// `None` for zero-length or non-finite arrows.
pub fn arrow_geometry(x: f64, y: f64, dx: f64, dy: f64) -> Option<ArrowGeometry> {
    let delta = Vec2::new(dx, dy);
    let len = delta.hypot();
    if !len.is_finite() || len <= f64::EPSILON || !x.is_finite() || !y.is_finite() {
        return None;
    }

    let dir = delta / len;
    let tail = Point::new(x, y);
    let tip = tail + delta;

    let half = ARROW_STROKE_WIDTH / 2.0;
    let normal = Vec2::new(-dir.y, dir.x) * half;
    let mut shaft = BezPath::new();
    shaft.move_to(tail + normal);
    shaft.line_to(tip + normal);
    shaft.line_to(tip - normal);
    shaft.line_to(tail - normal);
    shaft.close_path();

    let (sin, cos) = ARROWHEAD_HALF_ANGLE_DEG.to_radians().sin_cos();
    let back = -dir * ARROWHEAD_LENGTH;
    let left = tip + Vec2::new(back.x * cos - back.y * sin, back.x * sin + back.y * cos);
    let right = tip + Vec2::new(back.x * cos + back.y * sin, -back.x * sin + back.y * cos);
    let mut head = BezPath::new();
    head.move_to(tip);
    head.line_to(left);
    head.line_to(right);
    head.close_path();

    Some(ArrowGeometry {
        tail,
        tip,
        shaft,
        head,
        left,
        right,
    })
}

pub fn circle_path(x: f64, y: f64, r: f64) -> BezPath {
    kurbo::Circle::new(Point::new(x, y), r.max(0.0)).to_path(CIRCLE_TOLERANCE)
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
