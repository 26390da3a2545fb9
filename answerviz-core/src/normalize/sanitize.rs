use std::collections::HashSet;

use serde_json::Value;

use crate::foundation::core::Bounds;
use crate::foundation::error::AnswerVizResult;
use crate::normalize::coerce::{coerce_id, coerce_number, tag_is};
use crate::normalize::report::{Repair, RepairKind, SanitizeReport};
use crate::scene::model::{
    ARROW_DX_BOUNDS, ARROW_DY_BOUNDS, Animation, ArrowLayer, ArrowProps, CIRCLE_RADIUS_BOUNDS,
    CircleLayer, CircleProps, DEFAULT_ARROW_COLOR, DEFAULT_CIRCLE_FILL, DEFAULT_DURATION_MS,
    DEFAULT_FPS, DEFAULT_LOTTIE_URL, DEFAULT_SPEC_ID, LOTTIE_HEIGHT_BOUNDS, LOTTIE_WIDTH_BOUNDS,
    Layer, LayerKind, LinearAnimation, LottieLayer, LottieProps, MAX_DURATION_MS, MAX_FPS,
    MIN_ANIMATION_SPAN_MS, MIN_DURATION_MS, MIN_FPS, ORBIT_PERIOD_BOUNDS_MS, ORBIT_RADIUS_BOUNDS,
    OrbitAnimation, Property, VisualizationSpec, X_BOUNDS, Y_BOUNDS, default_layers,
};
use crate::scene::validate::{PathElem, format_path};

/// Answer text used whenever the candidate has none.
pub const FALLBACK_TEXT: &str =
    "Here is a simple illustration; a detailed answer was not available this time.";

/// Sanitized text plus visualization, serializing to the upstream wire shape.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SanitizedAnswer {
    pub text: String,
    pub visualization: VisualizationSpec,
}

impl SanitizedAnswer {
    /// The `{ "text", "visualization" }` object, suitable for feeding back into [`sanitize`].
    pub fn to_wire(&self) -> AnswerVizResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Turn any value into a valid [`VisualizationSpec`]. Never fails.
pub fn sanitize(candidate: &Value) -> VisualizationSpec {
    sanitize_with_report(candidate).0
}

/// Trimmed `candidate.text` when it is a non-empty string, else [`FALLBACK_TEXT`].
pub fn sanitize_text(candidate: &Value) -> String {
    sanitize_text_or(candidate, FALLBACK_TEXT)
}

/// [`sanitize_text`] with a caller-chosen fallback.
pub fn sanitize_text_or(candidate: &Value, fallback: &str) -> String {
    candidate
        .get("text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

pub fn sanitize_answer(candidate: &Value) -> SanitizedAnswer {
    SanitizedAnswer {
        text: sanitize_text(candidate),
        visualization: sanitize(candidate),
    }
}

/// Same result as [`sanitize`], plus a record of every repair applied to the input.
pub fn sanitize_with_report(candidate: &Value) -> (VisualizationSpec, SanitizeReport) {
    let mut cx = Cx::default();
    let vis = candidate.get("visualization");
    cx.path.push(PathElem::Field("visualization"));

    let duration_ms = cx.integer(
        vis,
        "duration",
        DEFAULT_DURATION_MS,
        MIN_DURATION_MS,
        MAX_DURATION_MS,
    );
    let fps = cx.integer(vis, "fps", DEFAULT_FPS, MIN_FPS, MAX_FPS);

    let id = match coerce_id(vis.and_then(|v| v.get("id"))) {
        Some(id) => id,
        None => {
            cx.note(Some("id"), RepairKind::Defaulted);
            DEFAULT_SPEC_ID.to_string()
        }
    };

    let raw_layers: &[Value] = match vis.and_then(|v| v.get("layers")) {
        Some(Value::Array(entries)) => entries.as_slice(),
        other => {
            if other.is_some() {
                cx.note(Some("layers"), RepairKind::Defaulted);
            }
            &[]
        }
    };

    cx.path.push(PathElem::Field("layers"));
    let mut used_ids = HashSet::<String>::new();
    let mut layers = Vec::with_capacity(raw_layers.len());
    for (i, entry) in raw_layers.iter().enumerate() {
        cx.path.push(PathElem::Index(i));
        if let Some(layer) = cx.layer(entry, i, duration_ms, &mut used_ids) {
            layers.push(layer);
        }
        cx.path.pop();
    }

    if layers.is_empty() {
        cx.note(None, RepairKind::FallbackScene);
        layers = default_layers(duration_ms);
    }

    let report = SanitizeReport {
        repairs: cx.repairs,
    };
    tracing::debug!(
        repairs = report.len(),
        layers = layers.len(),
        duration_ms,
        "sanitized visualization"
    );

    (
        VisualizationSpec {
            id,
            duration_ms,
            fps,
            layers,
        },
        report,
    )
}

#[derive(Default)]
struct Cx {
    path: Vec<PathElem>,
    repairs: Vec<Repair>,
}

impl Cx {
    fn note(&mut self, field: Option<&'static str>, kind: RepairKind) {
        let mut path = self.path.clone();
        if let Some(field) = field {
            path.push(PathElem::Field(field));
        }
        self.repairs.push(Repair {
            path: format_path(&path),
            kind,
        });
    }

    fn drop_entry(&mut self, reason: &str) {
        tracing::debug!(path = %format_path(&self.path), reason, "dropped entry");
        self.note(
            None,
            RepairKind::Dropped {
                reason: reason.to_string(),
            },
        );
    }

    fn number_from(
        &mut self,
        raw: Option<&Value>,
        field: &'static str,
        default: f64,
        bounds: Bounds,
    ) -> f64 {
        let v = coerce_number(raw).unwrap_or_else(|| {
            self.note(Some(field), RepairKind::Defaulted);
            default
        });
        let clamped = bounds.clamp(v);
        if clamped != v {
            self.note(
                Some(field),
                RepairKind::Clamped {
                    original: v,
                    value: clamped,
                },
            );
        }
        clamped
    }

    fn number(
        &mut self,
        obj: Option<&Value>,
        field: &'static str,
        default: f64,
        bounds: Bounds,
    ) -> f64 {
        self.number_from(obj.and_then(|o| o.get(field)), field, default, bounds)
    }

    fn integer(
        &mut self,
        obj: Option<&Value>,
        field: &'static str,
        default: u32,
        min: u32,
        max: u32,
    ) -> u32 {
        let v = match coerce_number(obj.and_then(|o| o.get(field))) {
            Some(v) => v,
            None => {
                self.note(Some(field), RepairKind::Defaulted);
                return default;
            }
        };
        let clamped = v.round().clamp(f64::from(min), f64::from(max));
        if clamped != v {
            self.note(
                Some(field),
                RepairKind::Clamped {
                    original: v,
                    value: clamped,
                },
            );
        }
        // In range by construction.
        clamped as u32
    }

    fn string(&mut self, obj: Option<&Value>, field: &'static str, default: &str) -> String {
        match obj.and_then(|o| o.get(field)).and_then(Value::as_str) {
            Some(s) => s.to_string(),
            None => {
                self.note(Some(field), RepairKind::Defaulted);
                default.to_string()
            }
        }
    }

    fn boolean(&mut self, obj: Option<&Value>, field: &'static str, default: bool) -> bool {
        match obj.and_then(|o| o.get(field)).and_then(Value::as_bool) {
            Some(b) => b,
            None => {
                self.note(Some(field), RepairKind::Defaulted);
                default
            }
        }
    }

    fn layer(
        &mut self,
        entry: &Value,
        index: usize,
        duration_ms: u32,
        used_ids: &mut HashSet<String>,
    ) -> Option<Layer> {
        if !entry.is_object() {
            self.drop_entry("layer is not an object");
            return None;
        }
        let Some(kind) = entry
            .get("type")
            .and_then(Value::as_str)
            .and_then(LayerKind::parse)
        else {
            self.drop_entry("unrecognized layer type");
            return None;
        };

        let props = match entry.get("props") {
            Some(p) if p.is_object() => Some(p),
            _ => {
                self.note(Some("props"), RepairKind::Defaulted);
                None
            }
        };

        self.path.push(PathElem::Field("props"));
        let layer = match kind {
            LayerKind::Circle => {
                let props = self.circle_props(props);
                self.path.pop();
                let animations =
                    self.circle_animations(entry.get("animations"), &props, duration_ms);
                Layer::Circle(CircleLayer {
                    id: String::new(),
                    props,
                    animations,
                })
            }
            LayerKind::Arrow => {
                let props = self.arrow_props(props);
                self.path.pop();
                self.reject_animations(entry.get("animations"));
                Layer::Arrow(ArrowLayer {
                    id: String::new(),
                    props,
                })
            }
            LayerKind::Lottie => {
                let props = self.lottie_props(props);
                self.path.pop();
                self.reject_animations(entry.get("animations"));
                Layer::Lottie(LottieLayer {
                    id: String::new(),
                    props,
                })
            }
        };

        let id = self.layer_id(entry.get("id"), index, used_ids);
        Some(with_id(layer, id))
    }

    fn layer_id(
        &mut self,
        raw: Option<&Value>,
        index: usize,
        used_ids: &mut HashSet<String>,
    ) -> String {
        let base = coerce_id(raw).unwrap_or_else(|| {
            self.note(Some("id"), RepairKind::Defaulted);
            format!("layer_{index}")
        });

        let mut id = base.clone();
        let mut n = 1usize;
        while used_ids.contains(&id) {
            id = format!("{base}_{n}");
            n += 1;
        }
        if id != base {
            self.note(
                Some("id"),
                RepairKind::Renamed {
                    original: base,
                    value: id.clone(),
                },
            );
        }
        used_ids.insert(id.clone());
        id
    }

    fn circle_props(&mut self, p: Option<&Value>) -> CircleProps {
        CircleProps {
            x: self.number(p, "x", 320.0, X_BOUNDS),
            y: self.number(p, "y", 200.0, Y_BOUNDS),
            r: self.number(p, "r", 20.0, CIRCLE_RADIUS_BOUNDS),
            fill: self.string(p, "fill", DEFAULT_CIRCLE_FILL),
        }
    }

    fn arrow_props(&mut self, p: Option<&Value>) -> ArrowProps {
        ArrowProps {
            x: self.number(p, "x", 100.0, X_BOUNDS),
            y: self.number(p, "y", 200.0, Y_BOUNDS),
            dx: self.number(p, "dx", 120.0, ARROW_DX_BOUNDS),
            dy: self.number(p, "dy", 0.0, ARROW_DY_BOUNDS),
            color: self.string(p, "color", DEFAULT_ARROW_COLOR),
        }
    }

    fn lottie_props(&mut self, p: Option<&Value>) -> LottieProps {
        LottieProps {
            x: self.number(p, "x", 0.0, X_BOUNDS),
            y: self.number(p, "y", 0.0, Y_BOUNDS),
            width: self.number(p, "width", 200.0, LOTTIE_WIDTH_BOUNDS),
            height: self.number(p, "height", 200.0, LOTTIE_HEIGHT_BOUNDS),
            url: self.string(p, "url", DEFAULT_LOTTIE_URL),
            looping: self.boolean(p, "loop", true),
        }
    }

    fn reject_animations(&mut self, raw: Option<&Value>) {
        if raw
            .and_then(Value::as_array)
            .is_some_and(|a| !a.is_empty())
        {
            self.path.push(PathElem::Field("animations"));
            self.drop_entry("only circle layers animate");
            self.path.pop();
        }
    }

    fn circle_animations(
        &mut self,
        raw: Option<&Value>,
        base: &CircleProps,
        duration_ms: u32,
    ) -> Vec<Animation> {
        let entries: &[Value] = match raw {
            Some(Value::Array(a)) => a.as_slice(),
            None => &[],
            Some(_) => {
                self.note(Some("animations"), RepairKind::Defaulted);
                &[]
            }
        };

        self.path.push(PathElem::Field("animations"));
        let mut out = Vec::with_capacity(entries.len());
        for (j, a) in entries.iter().enumerate() {
            self.path.push(PathElem::Index(j));
            if !a.is_object() {
                self.drop_entry("animation is not an object");
            } else if tag_is(a.get("property"), "orbit") || tag_is(a.get("type"), "orbit") {
                out.push(Animation::Orbit(self.orbit(a, duration_ms)));
            } else {
                out.push(Animation::Linear(self.linear(a, base, duration_ms)));
            }
            self.path.pop();
        }
        self.path.pop();
        out
    }

    fn orbit(&mut self, a: &Value, duration_ms: u32) -> OrbitAnimation {
        let a = Some(a);
        let period_raw = a
            .and_then(|o| o.get("duration"))
            .or_else(|| a.and_then(|o| o.get("periodMs")));
        OrbitAnimation {
            center_x: self.number(a, "centerX", 320.0, X_BOUNDS),
            center_y: self.number(a, "centerY", 200.0, Y_BOUNDS),
            radius: self.number(a, "radius", 100.0, ORBIT_RADIUS_BOUNDS),
            period_ms: self.number_from(
                period_raw,
                "duration",
                f64::from(duration_ms),
                ORBIT_PERIOD_BOUNDS_MS,
            ),
        }
    }

    fn linear(&mut self, a: &Value, base: &CircleProps, duration_ms: u32) -> LinearAnimation {
        let property = match a
            .get("property")
            .and_then(Value::as_str)
            .and_then(Property::parse)
        {
            Some(p) => p,
            None => {
                self.note(Some("property"), RepairKind::Defaulted);
                Property::X
            }
        };
        let base_value = match property {
            Property::X => base.x,
            Property::Y => base.y,
            Property::R => base.r,
        };

        let duration = f64::from(duration_ms);
        let a = Some(a);
        let start = self.number(
            a,
            "start",
            0.0,
            Bounds::new(0.0, duration - MIN_ANIMATION_SPAN_MS),
        );
        let end = self.number(
            a,
            "end",
            duration,
            Bounds::new(start + MIN_ANIMATION_SPAN_MS, duration),
        );
        let from = self.number(a, "from", base_value, Bounds::new(f64::MIN, f64::MAX));
        let to = self.number(a, "to", base_value, Bounds::new(f64::MIN, f64::MAX));

        LinearAnimation {
            property,
            from,
            to,
            start,
            end,
        }
    }
}

fn with_id(layer: Layer, id: String) -> Layer {
    match layer {
        Layer::Circle(l) => Layer::Circle(CircleLayer { id, ..l }),
        Layer::Arrow(l) => Layer::Arrow(ArrowLayer { id, ..l }),
        Layer::Lottie(l) => Layer::Lottie(LottieLayer { id, ..l }),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/sanitize.rs"]
mod tests;
