use super::*;

#[test]
fn opaque_formats_as_hex() {
    assert_eq!(Rgba::rgb(255, 0, 16).to_svg(), "#ff0010");
}

#[test]
fn translucent_formats_as_rgba() {
    assert_eq!(Rgba::white(0.22).to_svg(), "rgba(255,255,255,0.22)");
}

#[test]
fn hsl_primaries() {
    assert_eq!(Rgba::from_hsl(0.0, 100.0, 50.0), Rgba::rgb(255, 0, 0));
    assert_eq!(Rgba::from_hsl(120.0, 100.0, 50.0), Rgba::rgb(0, 255, 0));
    assert_eq!(Rgba::from_hsl(240.0, 100.0, 50.0), Rgba::rgb(0, 0, 255));
}

#[test]
fn hsl_wraps_hue() {
    assert_eq!(Rgba::from_hsl(360.0, 100.0, 50.0), Rgba::from_hsl(0.0, 100.0, 50.0));
}
