use super::*;

#[test]
fn palette_is_stable() {
    assert_eq!(gate_color(7), gate_color(7));
}

#[test]
fn adjacent_gates_get_distinct_hues() {
    assert_ne!(gate_color(1), gate_color(2));
    assert_ne!(gate_color(2), gate_color(3));
}

#[test]
fn out_of_domain_gates_fall_back_to_white() {
    assert_eq!(gate_color(0), Rgba::rgb(255, 255, 255));
    assert_eq!(gate_color(65), Rgba::rgb(255, 255, 255));
}
