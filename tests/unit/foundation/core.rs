use super::*;

#[test]
fn logical_size_drawable() {
    assert!(LogicalSize::new(10.0, 10.0).is_drawable());
    assert!(!LogicalSize::new(0.0, 10.0).is_drawable());
    assert!(!LogicalSize::new(f64::NAN, 10.0).is_drawable());
    assert_eq!(LogicalSize::new(520.0, 420.0).min_side(), 420.0);
}

#[test]
fn rgba8_alpha_helpers() {
    let c = Rgba8::opaque(120, 220, 255);
    assert_eq!(c.with_alpha(0.0).a, 0);
    assert_eq!(c.with_alpha(2.0).a, 255);
    assert_eq!(c.fade(0.5).a, 128);
    assert_eq!(Rgba8::new(255, 0, 0, 128).premultiplied(), [128, 0, 0, 128]);
    assert_eq!(Rgba8::transparent().premultiplied(), [0, 0, 0, 0]);
}

#[test]
fn surface_id_display_roundtrips_string() {
    let id = SurfaceId::from("radar");
    assert_eq!(id.to_string(), "radar");
    assert_eq!(id.as_str(), "radar");
}
