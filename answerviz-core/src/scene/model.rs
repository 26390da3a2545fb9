use serde::ser::{SerializeMap, Serializer};

use crate::foundation::core::{Bounds, Canvas};
use crate::foundation::error::AnswerVizResult;

/// Every visualization is authored against this surface.
pub const CANVAS: Canvas = Canvas::FIXED;

pub const X_BOUNDS: Bounds = Bounds::new(0.0, 640.0);
pub const Y_BOUNDS: Bounds = Bounds::new(0.0, 400.0);
pub const CIRCLE_RADIUS_BOUNDS: Bounds = Bounds::new(1.0, 120.0);
pub const ARROW_DX_BOUNDS: Bounds = Bounds::new(-640.0, 640.0);
pub const ARROW_DY_BOUNDS: Bounds = Bounds::new(-400.0, 400.0);
pub const LOTTIE_WIDTH_BOUNDS: Bounds = Bounds::new(40.0, 640.0);
pub const LOTTIE_HEIGHT_BOUNDS: Bounds = Bounds::new(40.0, 400.0);
pub const ORBIT_RADIUS_BOUNDS: Bounds = Bounds::new(10.0, 250.0);
pub const ORBIT_PERIOD_BOUNDS_MS: Bounds = Bounds::new(500.0, 10_000.0);

pub const MIN_DURATION_MS: u32 = 1_000;
pub const MAX_DURATION_MS: u32 = 10_000;
pub const DEFAULT_DURATION_MS: u32 = 5_000;
pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 60;
pub const DEFAULT_FPS: u32 = 30;

/// Shortest window a linear animation may occupy.
pub const MIN_ANIMATION_SPAN_MS: f64 = 100.0;

pub const DEFAULT_SPEC_ID: &str = "vis_safe";
pub const DEFAULT_CIRCLE_FILL: &str = "#3498db";
pub const DEFAULT_ARROW_COLOR: &str = "#e74c3c";
pub const DEFAULT_LOTTIE_URL: &str = "assets/lottie/placeholder.json";

/// Canonical, safety-bounded animation description.
///
/// Produced only by [`crate::sanitize`]; every numeric field is inside its documented bounds
/// (see [`VisualizationSpec::validate`]). Serializes to the same wire shape the sanitizer
/// accepts, so a sanitized spec fed back through the sanitizer is a fixed point.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VisualizationSpec {
    /// Opaque, non-empty identifier.
    pub id: String,
    /// Total length in milliseconds, within `[1000, 10000]`.
    #[serde(rename = "duration")]
    pub duration_ms: u32,
    /// Advisory sampling rate for playback, within `[1, 60]`.
    pub fps: u32,
    /// Layers in paint order. Never empty.
    pub layers: Vec<Layer>,
}

impl VisualizationSpec {
    /// Check every bound and structural invariant, reporting all violations at once.
    pub fn validate(&self) -> AnswerVizResult<()> {
        super::validate::validate_spec(self).map_err(|e| {
            crate::foundation::error::AnswerVizError::validation(e.to_string())
        })
    }

    pub fn duration_ms_f64(&self) -> f64 {
        f64::from(self.duration_ms)
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Circle,
    Arrow,
    Lottie,
}

impl LayerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Arrow => "arrow",
            Self::Lottie => "lottie",
        }
    }

    /// Maps a raw `type` tag onto a variant; trimmed and ASCII case-insensitive.
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        [Self::Circle, Self::Arrow, Self::Lottie]
            .into_iter()
            .find(|k| tag.eq_ignore_ascii_case(k.as_str()))
    }
}

/// One drawable shape.
#[derive(Clone, Debug, PartialEq)]
pub enum Layer {
    Circle(CircleLayer),
    Arrow(ArrowLayer),
    Lottie(LottieLayer),
}

impl Layer {
    pub fn id(&self) -> &str {
        match self {
            Self::Circle(l) => &l.id,
            Self::Arrow(l) => &l.id,
            Self::Lottie(l) => &l.id,
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            Self::Circle(_) => LayerKind::Circle,
            Self::Arrow(_) => LayerKind::Arrow,
            Self::Lottie(_) => LayerKind::Lottie,
        }
    }

    /// Only circles animate; other variants always report an empty list.
    pub fn animations(&self) -> &[Animation] {
        match self {
            Self::Circle(l) => &l.animations,
            Self::Arrow(_) | Self::Lottie(_) => &[],
        }
    }
}

impl serde::Serialize for Layer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("id", self.id())?;
        map.serialize_entry("type", self.kind().as_str())?;
        match self {
            Self::Circle(l) => map.serialize_entry("props", &l.props)?,
            Self::Arrow(l) => map.serialize_entry("props", &l.props)?,
            Self::Lottie(l) => map.serialize_entry("props", &l.props)?,
        }
        map.serialize_entry("animations", self.animations())?;
        map.end()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CircleLayer {
    pub id: String,
    pub props: CircleProps,
    /// Applied in order; later entries win for the same property.
    pub animations: Vec<Animation>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CircleProps {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub fill: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrowLayer {
    pub id: String,
    pub props: ArrowProps,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ArrowProps {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LottieLayer {
    pub id: String,
    pub props: LottieProps,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LottieProps {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub url: String,
    #[serde(rename = "loop")]
    pub looping: bool,
}

/// Scalar circle property a linear animation can drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Property {
    X,
    Y,
    R,
}

impl Property {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::R => "r",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "r" => Some(Self::R),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Animation {
    Linear(LinearAnimation),
    Orbit(OrbitAnimation),
}

/// Interpolates one property across `[start, end)`, holding the edge values outside it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearAnimation {
    pub property: Property,
    pub from: f64,
    pub to: f64,
    pub start: f64,
    pub end: f64,
}

/// Circular motion that overrides `x` and `y` together.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitAnimation {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub period_ms: f64,
}

impl serde::Serialize for Animation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        match self {
            Self::Linear(a) => {
                map.serialize_entry("property", a.property.as_str())?;
                map.serialize_entry("from", &a.from)?;
                map.serialize_entry("to", &a.to)?;
                map.serialize_entry("start", &a.start)?;
                map.serialize_entry("end", &a.end)?;
            }
            Self::Orbit(a) => {
                map.serialize_entry("property", "orbit")?;
                map.serialize_entry("centerX", &a.center_x)?;
                map.serialize_entry("centerY", &a.center_y)?;
                map.serialize_entry("radius", &a.radius)?;
                map.serialize_entry("duration", &a.period_ms)?;
            }
        }
        map.end()
    }
}

/// Scene installed when nothing usable survives sanitization: a circle crossing the canvas
/// left to right over the whole duration, above a static arrow pointing the same way.
pub fn default_layers(duration_ms: u32) -> Vec<Layer> {
    vec![
        Layer::Circle(CircleLayer {
            id: "default_circle".to_string(),
            props: CircleProps {
                x: 80.0,
                y: 200.0,
                r: 24.0,
                fill: DEFAULT_CIRCLE_FILL.to_string(),
            },
            animations: vec![Animation::Linear(LinearAnimation {
                property: Property::X,
                from: 80.0,
                to: 560.0,
                start: 0.0,
                end: f64::from(duration_ms),
            })],
        }),
        Layer::Arrow(ArrowLayer {
            id: "default_arrow".to_string(),
            props: ArrowProps {
                x: 80.0,
                y: 320.0,
                dx: 480.0,
                dy: 0.0,
                color: DEFAULT_ARROW_COLOR.to_string(),
            },
        }),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
