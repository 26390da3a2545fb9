use super::*;
use crate::eval::evaluator::Evaluator;
use crate::scene::model::{
    ArrowProps, CircleProps, LottieProps, VisualizationSpec, default_layers,
};

fn near(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 2)
}

fn state(id: &str, props: ResolvedProps) -> RenderState {
    RenderState {
        id: id.to_string(),
        props,
    }
}

#[test]
fn empty_frame_is_the_clear_color() {
    let mut backend = CpuBackend::new(RenderSettings {
        clear_rgba: [10, 20, 30, 255],
    });
    let frame = backend.draw_states(&[]).unwrap();
    assert_eq!((frame.width, frame.height), (640, 400));
    assert_eq!(frame.data.len(), 640 * 400 * 4);
    assert!(frame.premultiplied);
    assert_eq!(frame.pixel(0, 0), Some([10, 20, 30, 255]));
    assert_eq!(frame.pixel(639, 399), Some([10, 20, 30, 255]));
}

#[test]
fn default_scene_draws_circle_and_arrow() {
    let spec = VisualizationSpec {
        id: "s".to_string(),
        duration_ms: 1000,
        fps: 10,
        layers: default_layers(1000),
    };
    let frame = CpuBackend::default()
        .draw_states(&Evaluator::eval(&spec, 0.0))
        .unwrap();

    assert!(near(frame.pixel(80, 200).unwrap(), [0x34, 0x98, 0xdb, 255]));
    assert!(near(frame.pixel(300, 319).unwrap(), [0xe7, 0x4c, 0x3c, 255]));
    assert_eq!(frame.pixel(5, 5), Some([255, 255, 255, 255]));
}

#[test]
fn bad_fill_uses_default_color() {
    let frame = CpuBackend::default()
        .draw_states(&[state(
            "c",
            ResolvedProps::Circle(CircleProps {
                x: 320.0,
                y: 200.0,
                r: 30.0,
                fill: "not a color".to_string(),
            }),
        )])
        .unwrap();
    assert!(near(frame.pixel(320, 200).unwrap(), [0x34, 0x98, 0xdb, 255]));
}

#[test]
fn zero_length_arrow_draws_nothing() {
    let frame = CpuBackend::default()
        .draw_states(&[state(
            "a",
            ResolvedProps::Arrow(ArrowProps {
                x: 100.0,
                y: 100.0,
                dx: 0.0,
                dy: 0.0,
                color: "#000000".to_string(),
            }),
        )])
        .unwrap();
    assert!(frame.data.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
}

#[test]
fn lottie_placeholder_tints_its_footprint() {
    let frame = CpuBackend::default()
        .draw_states(&[state(
            "l",
            ResolvedProps::Lottie(LottieProps {
                x: 10.0,
                y: 10.0,
                width: 100.0,
                height: 50.0,
                url: "assets/lottie/placeholder.json".to_string(),
                looping: true,
            }),
        )])
        .unwrap();
    let inside = frame.pixel(50, 30).unwrap();
    assert_ne!(inside, [255, 255, 255, 255]);
    assert_eq!(inside[3], 255);
    assert_eq!(frame.pixel(200, 200), Some([255, 255, 255, 255]));
}

#[test]
fn transparent_clear_unpremultiplies_cleanly() {
    let mut backend = CpuBackend::new(RenderSettings {
        clear_rgba: [0, 0, 0, 0],
    });
    let frame = backend.draw_states(&[]).unwrap();
    assert!(frame.data.iter().all(|&b| b == 0));
    assert_eq!(frame.to_straight_rgba8(), frame.data);
}
