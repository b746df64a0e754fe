use crate::foundation::core::{TimeRange, TimeView};

// Fractions stay strictly below 1 so a range-end timestamp never lands
// exactly on the seam.
const FRAC_EPS: f64 = 1e-6;

/// Position of `t_ms` inside the window as a fraction clamped to `[0, 1)`.
///
/// The fraction is anchored at `start_ms` in both views; tracker anchoring is
/// applied only at angle conversion. Pure: callers mapping the same timestamp
/// during one render get bit-identical results.
pub fn to_fraction(t_ms: i64, range: &TimeRange) -> f64 {
    let total = range.total_ms();
    if total <= 0 {
        return 0.0;
    }
    clamp_frac((t_ms - range.start_ms) as f64 / total as f64)
}

/// Convert a window fraction to a dial angle in degrees.
///
/// Calendar (and anchor-less tracker): fraction 0 sits at 12 o'clock (−90°)
/// and the sweep is clockwise. Tracker with an anchor: the anchor timestamp
/// maps to 90° and content shifts under it.
pub fn angle_of_fraction(frac: f64, range: &TimeRange) -> f64 {
    match (range.view, range.anchor_ms) {
        (TimeView::Tracker, Some(anchor_ms)) => {
            let total = range.total_ms() as f64;
            let t = range.start_ms as f64 + frac * total;
            90.0 - ((t - anchor_ms as f64) / total) * 360.0
        }
        _ => frac * 360.0 - 90.0,
    }
}

/// Dial angle of an absolute timestamp for the active view.
pub fn to_angle(t_ms: i64, range: &TimeRange) -> f64 {
    let total = range.total_ms();
    if total <= 0 {
        return -90.0;
    }
    match (range.view, range.anchor_ms) {
        (TimeView::Tracker, Some(anchor_ms)) => {
            // Unclamped: the marker may sit outside the window while content
            // scrolls under it.
            90.0 - ((t_ms - anchor_ms) as f64 / total as f64) * 360.0
        }
        _ => clamp_frac((t_ms - range.start_ms) as f64 / total as f64) * 360.0 - 90.0,
    }
}

/// Normalize an angle into `[0, 360)`.
pub fn wrap_deg(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// Normalize an angle into the dial convention `[-90, 270)`, with the seam
/// at 12 o'clock.
pub fn normalize_dial_deg(deg: f64) -> f64 {
    wrap_deg(deg + 90.0) - 90.0
}

/// Clockwise span from `start_deg` to `end_deg` in `[0, 360)`.
pub fn sweep_deg(start_deg: f64, end_deg: f64) -> f64 {
    wrap_deg(end_deg - start_deg)
}

fn clamp_frac(v: f64) -> f64 {
    v.clamp(0.0, 1.0 - FRAC_EPS)
}

#[cfg(test)]
#[path = "../../tests/unit/timemap/mapper.rs"]
mod tests;
