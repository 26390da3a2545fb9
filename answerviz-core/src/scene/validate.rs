use std::collections::HashSet;
use std::fmt;

use crate::foundation::core::Bounds;
use crate::scene::model::{
    ARROW_DX_BOUNDS, ARROW_DY_BOUNDS, Animation, CIRCLE_RADIUS_BOUNDS, LOTTIE_HEIGHT_BOUNDS,
    LOTTIE_WIDTH_BOUNDS, Layer, MAX_DURATION_MS, MAX_FPS, MIN_ANIMATION_SPAN_MS, MIN_DURATION_MS,
    MIN_FPS, ORBIT_PERIOD_BOUNDS_MS, ORBIT_RADIUS_BOUNDS, VisualizationSpec, X_BOUNDS, Y_BOUNDS,
};

/// One step of a JSON-path-like location (`$.layers[0].props.x`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathElem {
    Field(&'static str),
    Index(usize),
}

pub(crate) fn format_path(path: &[PathElem]) -> String {
    let mut s = String::from("$");
    for p in path {
        match *p {
            PathElem::Field(name) => {
                s.push('.');
                s.push_str(name);
            }
            PathElem::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
        }
    }
    s
}

#[derive(Debug, Clone)]
pub(crate) struct SchemaError {
    pub(crate) path: Vec<PathElem>,
    pub(crate) message: String,
}

impl SchemaError {
    fn at(path: &[PathElem], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", format_path(&self.path), self.message)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SchemaErrors {
    pub(crate) errors: Vec<SchemaError>,
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

pub(crate) fn validate_spec(spec: &VisualizationSpec) -> Result<(), SchemaErrors> {
    let mut errors = Vec::new();

    if spec.id.trim().is_empty() {
        errors.push(SchemaError::at(
            &[PathElem::Field("id")],
            "id must be non-empty",
        ));
    }
    if !(MIN_DURATION_MS..=MAX_DURATION_MS).contains(&spec.duration_ms) {
        errors.push(SchemaError::at(
            &[PathElem::Field("duration")],
            format!("duration must be within [{MIN_DURATION_MS}, {MAX_DURATION_MS}] ms"),
        ));
    }
    if !(MIN_FPS..=MAX_FPS).contains(&spec.fps) {
        errors.push(SchemaError::at(
            &[PathElem::Field("fps")],
            format!("fps must be within [{MIN_FPS}, {MAX_FPS}]"),
        ));
    }
    if spec.layers.is_empty() {
        errors.push(SchemaError::at(
            &[PathElem::Field("layers")],
            "layers must be non-empty",
        ));
    }

    let mut ids = HashSet::<&str>::new();
    for (i, layer) in spec.layers.iter().enumerate() {
        let path = [PathElem::Field("layers"), PathElem::Index(i)];
        if layer.id().is_empty() {
            errors.push(SchemaError::at(&path, "layer id must be non-empty"));
        } else if !ids.insert(layer.id()) {
            errors.push(SchemaError::at(
                &path,
                format!("duplicate layer id '{}'", layer.id()),
            ));
        }
        validate_layer(layer, spec.duration_ms_f64(), &path, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaErrors { errors })
    }
}

fn validate_layer(
    layer: &Layer,
    duration_ms: f64,
    path: &[PathElem],
    errors: &mut Vec<SchemaError>,
) {
    let mut props_path = path.to_vec();
    props_path.push(PathElem::Field("props"));

    match layer {
        Layer::Circle(c) => {
            check(errors, &props_path, "x", c.props.x, X_BOUNDS);
            check(errors, &props_path, "y", c.props.y, Y_BOUNDS);
            check(errors, &props_path, "r", c.props.r, CIRCLE_RADIUS_BOUNDS);
        }
        Layer::Arrow(a) => {
            check(errors, &props_path, "x", a.props.x, X_BOUNDS);
            check(errors, &props_path, "y", a.props.y, Y_BOUNDS);
            check(errors, &props_path, "dx", a.props.dx, ARROW_DX_BOUNDS);
            check(errors, &props_path, "dy", a.props.dy, ARROW_DY_BOUNDS);
        }
        Layer::Lottie(l) => {
            check(errors, &props_path, "x", l.props.x, X_BOUNDS);
            check(errors, &props_path, "y", l.props.y, Y_BOUNDS);
            check(errors, &props_path, "width", l.props.width, LOTTIE_WIDTH_BOUNDS);
            check(errors, &props_path, "height", l.props.height, LOTTIE_HEIGHT_BOUNDS);
        }
    }

    for (j, anim) in layer.animations().iter().enumerate() {
        let mut anim_path = path.to_vec();
        anim_path.push(PathElem::Field("animations"));
        anim_path.push(PathElem::Index(j));

        match anim {
            Animation::Linear(a) => {
                if !a.from.is_finite() || !a.to.is_finite() {
                    errors.push(SchemaError::at(&anim_path, "from/to must be finite"));
                }
                let start_max = duration_ms - MIN_ANIMATION_SPAN_MS;
                check(errors, &anim_path, "start", a.start, Bounds::new(0.0, start_max));
                check(
                    errors,
                    &anim_path,
                    "end",
                    a.end,
                    Bounds::new(a.start + MIN_ANIMATION_SPAN_MS, duration_ms),
                );
            }
            Animation::Orbit(o) => {
                check(errors, &anim_path, "centerX", o.center_x, X_BOUNDS);
                check(errors, &anim_path, "centerY", o.center_y, Y_BOUNDS);
                check(errors, &anim_path, "radius", o.radius, ORBIT_RADIUS_BOUNDS);
                check(errors, &anim_path, "duration", o.period_ms, ORBIT_PERIOD_BOUNDS_MS);
            }
        }
    }
}

fn check(
    errors: &mut Vec<SchemaError>,
    path: &[PathElem],
    field: &'static str,
    value: f64,
    bounds: Bounds,
) {
    if !bounds.contains(value) {
        let mut p = path.to_vec();
        p.push(PathElem::Field(field));
        errors.push(SchemaError::at(
            &p,
            format!(
                "{field} must be within [{}, {}], got {value}",
                bounds.min, bounds.max
            ),
        ));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/validate.rs"]
mod tests;
