use super::*;
use crate::scene::model::{CircleLayer, CircleProps, LinearAnimation, Property, default_layers};

fn spec() -> VisualizationSpec {
    VisualizationSpec {
        id: "v".to_string(),
        duration_ms: 3000,
        fps: 30,
        layers: default_layers(3000),
    }
}

#[test]
fn default_spec_is_valid() {
    validate_spec(&spec()).unwrap();
}

#[test]
fn reports_every_violation_with_paths() {
    let mut s = spec();
    s.id = " ".to_string();
    s.duration_ms = 20_000;
    s.fps = 0;
    s.layers.push(Layer::Circle(CircleLayer {
        id: "default_circle".to_string(),
        props: CircleProps {
            x: 700.0,
            y: 0.0,
            r: 0.0,
            fill: String::new(),
        },
        animations: vec![Animation::Linear(LinearAnimation {
            property: Property::X,
            from: f64::NAN,
            to: 0.0,
            start: 0.0,
            end: 50.0,
        })],
    }));

    let err = validate_spec(&s).unwrap_err();
    let text = err.to_string();
    assert!(text.contains("$.id: id must be non-empty"));
    assert!(text.contains("$.duration"));
    assert!(text.contains("$.fps"));
    assert!(text.contains("$.layers[2]: duplicate layer id 'default_circle'"));
    assert!(text.contains("$.layers[2].props.x"));
    assert!(text.contains("$.layers[2].props.r"));
    assert!(text.contains("$.layers[2].animations[0]: from/to must be finite"));
    assert!(text.contains("$.layers[2].animations[0].end"));
}

#[test]
fn empty_layers_rejected() {
    let mut s = spec();
    s.layers.clear();
    let err = validate_spec(&s).unwrap_err();
    assert_eq!(err.errors.len(), 1);
    assert_eq!(err.errors[0].path, vec![PathElem::Field("layers")]);
}

#[test]
fn format_path_renders_indices() {
    let p = [
        PathElem::Field("layers"),
        PathElem::Index(3),
        PathElem::Field("props"),
    ];
    assert_eq!(format_path(&p), "$.layers[3].props");
    assert_eq!(format_path(&[]), "$");
}
