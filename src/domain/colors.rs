use crate::domain::Gate;
use crate::foundation::color::Rgba;

// Golden-angle hue spread so adjacent gate numbers don't cluster in color.
const GOLDEN_ANGLE: f64 = 137.508;

/// Fill color for a gate's arcs.
///
/// Purely aesthetic: hues spread by the golden angle with a slight lightness
/// wobble so the palette feels alive. Gates outside `1..=64` fall back to
/// white.
pub fn gate_color(gate: Gate) -> Rgba {
    if !(1..=64).contains(&gate) {
        return Rgba::rgb(255, 255, 255);
    }
    let hue = (f64::from(gate) * GOLDEN_ANGLE).rem_euclid(360.0);
    let light = 52.0 + (f64::from(gate % 4) - 1.5) * 4.0;
    Rgba::from_hsl(hue, 72.0, light)
}

#[cfg(test)]
#[path = "../../tests/unit/domain/colors.rs"]
mod tests;
