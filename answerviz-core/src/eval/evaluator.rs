use std::f64::consts::TAU;

use crate::{
    foundation::math::wrap_positive,
    scene::model::{
        Animation, ArrowProps, CircleLayer, CircleProps, Layer, LayerKind, LinearAnimation,
        LottieProps, ORBIT_PERIOD_BOUNDS_MS, OrbitAnimation, Property, VisualizationSpec,
    },
};

/// Draw-ready state of one layer at one instant.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderState {
    /// Layer identifier, copied from the visualization.
    pub id: String,
    /// Variant tag plus fully resolved props.
    #[serde(flatten)]
    pub props: ResolvedProps,
}

impl RenderState {
    pub fn kind(&self) -> LayerKind {
        match self.props {
            ResolvedProps::Circle(_) => LayerKind::Circle,
            ResolvedProps::Arrow(_) => LayerKind::Arrow,
            ResolvedProps::Lottie(_) => LayerKind::Lottie,
        }
    }
}

/// Concrete props handed to the drawing backend.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "variant", content = "props", rename_all = "lowercase")]
pub enum ResolvedProps {
    Circle(CircleProps),
    Arrow(ArrowProps),
    Lottie(LottieProps),
}

/// Stateless evaluator from a sanitized spec and elapsed time to render states.
///
/// Output depends only on `(spec, t)`: there is no integrated state, so samples may be taken in
/// any order and repeated calls are bit-identical.
pub struct Evaluator;

impl Evaluator {
    /// Evaluate every layer at `t_ms`, in paint order.
    ///
    /// `t_ms` is clamped to `[0, duration_ms]`; a non-finite time evaluates as `0`.
    #[tracing::instrument(level = "trace", skip(spec), fields(spec_id = %spec.id))]
    pub fn eval(spec: &VisualizationSpec, t_ms: f64) -> Vec<RenderState> {
        let t = clamp_time(spec, t_ms);
        spec.layers.iter().map(|layer| eval_layer(layer, t)).collect()
    }
}

/// Shorthand for [`Evaluator::eval`].
pub fn evaluate(spec: &VisualizationSpec, t_ms: f64) -> Vec<RenderState> {
    Evaluator::eval(spec, t_ms)
}

pub(crate) fn clamp_time(spec: &VisualizationSpec, t_ms: f64) -> f64 {
    if !t_ms.is_finite() {
        return 0.0;
    }
    t_ms.clamp(0.0, spec.duration_ms_f64())
}

fn eval_layer(layer: &Layer, t: f64) -> RenderState {
    let props = match layer {
        Layer::Circle(c) => ResolvedProps::Circle(eval_circle(c, t)),
        Layer::Arrow(a) => ResolvedProps::Arrow(a.props.clone()),
        Layer::Lottie(l) => ResolvedProps::Lottie(l.props.clone()),
    };
    RenderState {
        id: layer.id().to_string(),
        props,
    }
}

fn eval_circle(layer: &CircleLayer, t: f64) -> CircleProps {
    let base = &layer.props;
    let mut out = base.clone();

    // Last write wins; no blending between overlapping animations.
    for anim in &layer.animations {
        match anim {
            Animation::Orbit(o) => {
                let (x, y) = sample_orbit(o, t);
                out.x = finite_or(x, base.x);
                out.y = finite_or(y, base.y);
            }
            Animation::Linear(a) => {
                let v = sample_linear(a, t);
                match a.property {
                    Property::X => out.x = finite_or(v, base.x),
                    Property::Y => out.y = finite_or(v, base.y),
                    Property::R => out.r = finite_or(v, base.r),
                }
            }
        }
    }
    out
}

/// Position on the orbit at `t`; one full turn per period, starting at angle 0.
pub(crate) fn sample_orbit(o: &OrbitAnimation, t: f64) -> (f64, f64) {
    let min_period = ORBIT_PERIOD_BOUNDS_MS.min;
    let period = if o.period_ms.is_finite() && o.period_ms >= min_period {
        o.period_ms
    } else {
        min_period
    };
    let phase = wrap_positive(t, period) / period;
    let angle = phase * TAU;
    (
        o.center_x + o.radius * angle.cos(),
        o.center_y + o.radius * angle.sin(),
    )
}

/// Holds `from` before `start` and `to` after `end`.
pub(crate) fn sample_linear(a: &LinearAnimation, t: f64) -> f64 {
    let span = (a.end - a.start).max(1.0);
    let progress = ((t - a.start) / span).clamp(0.0, 1.0);
    a.from + (a.to - a.from) * progress
}

fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
