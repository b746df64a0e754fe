use crate::layout::knobs::RingLayoutKnobs;
use crate::layout::rings::RingGeometry;

// Fraction of a lane cell the stroke may occupy; the rest is breathing room.
const TRACK_FILL: f64 = 0.78;

/// Allocate one lane for a derived ring inside the shared band.
///
/// The band `[center_r, center_r + band]` is divided into `count` equal
/// cells; ring `idx` gets a stroke centered in its cell, sized to most of
/// the cell but never outside the knobs' stroke clamp. Structurally
/// analogous to [`crate::pack_rings`] but index-ordered from
/// the band's inner edge.
pub fn track_for_index(knobs: &RingLayoutKnobs, count: usize, idx: usize) -> RingGeometry {
    let n = count.max(1);
    let cell = knobs.band / n as f64;

    let stroke = (cell * TRACK_FILL).clamp(knobs.stroke_min, knobs.stroke_max);
    let r_mid = knobs.center_r + cell * idx as f64 + cell / 2.0;

    RingGeometry {
        mid_radius: r_mid,
        stroke_width: stroke,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/tracks.rs"]
mod tests;
