use super::*;

#[test]
fn bounds_clamp_boundaries() {
    let b = Bounds::new(0.0, 640.0);
    assert_eq!(b.clamp(-10.0), 0.0);
    assert_eq!(b.clamp(9999.0), 640.0);
    assert_eq!(b.clamp(320.5), 320.5);
    assert!(b.contains(0.0));
    assert!(b.contains(640.0));
    assert!(!b.contains(640.1));
    assert!(!b.contains(f64::NAN));
}

#[test]
fn inverted_bounds_collapse_to_min() {
    let b = Bounds::new(5.0, 1.0);
    assert_eq!(b.clamp(3.0), 5.0);
}

#[test]
fn fixed_canvas_dimensions() {
    assert_eq!(Canvas::FIXED.width_f64(), 640.0);
    assert_eq!(Canvas::FIXED.height_f64(), 400.0);
}
