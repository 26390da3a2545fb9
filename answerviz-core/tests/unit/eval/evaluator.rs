use super::*;
use crate::scene::model::{ArrowLayer, default_layers};

fn circle_spec(animations: Vec<Animation>) -> VisualizationSpec {
    VisualizationSpec {
        id: "v".to_string(),
        duration_ms: 5000,
        fps: 30,
        layers: vec![
            Layer::Circle(CircleLayer {
                id: "c".to_string(),
                props: CircleProps {
                    x: 10.0,
                    y: 20.0,
                    r: 5.0,
                    fill: "#000".to_string(),
                },
                animations,
            }),
            Layer::Arrow(ArrowLayer {
                id: "a".to_string(),
                props: ArrowProps {
                    x: 1.0,
                    y: 2.0,
                    dx: 3.0,
                    dy: 4.0,
                    color: "#111".to_string(),
                },
            }),
        ],
    }
}

fn circle_at(spec: &VisualizationSpec, t: f64) -> CircleProps {
    match &Evaluator::eval(spec, t)[0].props {
        ResolvedProps::Circle(c) => c.clone(),
        other => panic!("expected circle, got {other:?}"),
    }
}

fn linear(property: Property, from: f64, to: f64, start: f64, end: f64) -> Animation {
    Animation::Linear(LinearAnimation {
        property,
        from,
        to,
        start,
        end,
    })
}

#[test]
fn linear_interpolation_boundaries() {
    let spec = circle_spec(vec![linear(Property::X, 100.0, 500.0, 0.0, 1000.0)]);
    assert_eq!(circle_at(&spec, 0.0).x, 100.0);
    assert_eq!(circle_at(&spec, 500.0).x, 300.0);
    assert_eq!(circle_at(&spec, 1000.0).x, 500.0);
    assert_eq!(circle_at(&spec, 4000.0).x, 500.0);
    assert_eq!(circle_at(&spec, 500.0).y, 20.0);
}

#[test]
fn linear_holds_from_before_start() {
    let spec = circle_spec(vec![linear(Property::R, 5.0, 50.0, 1000.0, 2000.0)]);
    assert_eq!(circle_at(&spec, 0.0).r, 5.0);
    assert_eq!(circle_at(&spec, 999.0).r, 5.0);
    assert_eq!(circle_at(&spec, 1500.0).r, 27.5);
}

#[test]
fn orbit_is_periodic() {
    let spec = circle_spec(vec![Animation::Orbit(OrbitAnimation {
        center_x: 320.0,
        center_y: 200.0,
        radius: 100.0,
        period_ms: 4000.0,
    })]);
    let a = circle_at(&spec, 0.0);
    let b = circle_at(&spec, 4000.0);
    assert_eq!((a.x, a.y), (b.x, b.y));
    assert_eq!((a.x, a.y), (420.0, 200.0));

    let quarter = circle_at(&spec, 1000.0);
    assert!((quarter.x - 320.0).abs() < 1e-9);
    assert!((quarter.y - 300.0).abs() < 1e-9);
}

#[test]
fn later_animations_win() {
    let spec = circle_spec(vec![
        Animation::Orbit(OrbitAnimation {
            center_x: 320.0,
            center_y: 200.0,
            radius: 100.0,
            period_ms: 4000.0,
        }),
        linear(Property::X, 7.0, 7.0, 0.0, 1000.0),
    ]);
    let c = circle_at(&spec, 0.0);
    assert_eq!(c.x, 7.0);
    assert_eq!(c.y, 200.0);
}

#[test]
fn degenerate_period_is_floored() {
    let spec = circle_spec(vec![Animation::Orbit(OrbitAnimation {
        center_x: 0.0,
        center_y: 0.0,
        radius: 10.0,
        period_ms: -3.0,
    })]);
    let c = circle_at(&spec, 250.0);
    assert!(c.x.is_finite() && c.y.is_finite());
    assert!((c.x + 10.0).abs() < 1e-9);
}

#[test]
fn non_finite_results_fall_back_to_base() {
    let spec = circle_spec(vec![linear(Property::X, f64::MAX, -f64::MAX, 0.0, 1000.0)]);
    assert_eq!(circle_at(&spec, 500.0).x, 10.0);
}

#[test]
fn time_is_clamped_and_nan_safe() {
    let spec = circle_spec(vec![linear(Property::X, 0.0, 100.0, 0.0, 5000.0)]);
    assert_eq!(circle_at(&spec, -50.0).x, 0.0);
    assert_eq!(circle_at(&spec, f64::NAN).x, 0.0);
    assert_eq!(circle_at(&spec, f64::INFINITY).x, 0.0);
    assert_eq!(circle_at(&spec, 99_999.0).x, 100.0);
}

#[test]
fn static_layers_pass_through_in_order() {
    let spec = circle_spec(vec![]);
    let states = evaluate(&spec, 1234.0);
    assert_eq!(states.len(), 2);
    assert_eq!(states[0].id, "c");
    assert_eq!(states[1].kind(), LayerKind::Arrow);
    let Layer::Arrow(a) = &spec.layers[1] else {
        unreachable!()
    };
    assert_eq!(states[1].props, ResolvedProps::Arrow(a.props.clone()));
}

#[test]
fn evaluation_is_deterministic_in_any_order() {
    let spec = VisualizationSpec {
        id: "d".to_string(),
        duration_ms: 3000,
        fps: 30,
        layers: default_layers(3000),
    };
    let forward: Vec<_> = [0.0, 700.0, 1234.0, 3000.0]
        .iter()
        .map(|&t| Evaluator::eval(&spec, t))
        .collect();
    let backward: Vec<_> = [3000.0, 1234.0, 700.0, 0.0]
        .iter()
        .map(|&t| Evaluator::eval(&spec, t))
        .rev()
        .collect();
    assert_eq!(forward, backward);
    assert_eq!(Evaluator::eval(&spec, 1234.0), Evaluator::eval(&spec, 1234.0));
}

#[test]
fn render_state_serializes_variant_tag() {
    let spec = circle_spec(vec![]);
    let v = serde_json::to_value(&Evaluator::eval(&spec, 0.0)).unwrap();
    assert_eq!(v[0]["variant"], "circle");
    assert_eq!(v[0]["id"], "c");
    assert_eq!(v[0]["props"]["r"], 5.0);
    assert_eq!(v[1]["variant"], "arrow");
    assert_eq!(v[1]["props"]["dx"], 3.0);
}
