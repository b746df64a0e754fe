use kurbo::BezPath;

use crate::foundation::color::Rgba;
use crate::foundation::core::{SceneCanvas, TimeRange, Vec2, polar_to_xy};
use crate::scene::layers::MandalaLayers;
use crate::scene::node::{ArcCap, Dot, Line, Node, NodeKind, PathShape, Scene, Stroke};
use crate::timemap::mapper::to_angle;

/// Refresh policy for the "now" marker.
///
/// The marker is the one part of the engine with autonomous redraw: the host
/// calls [`MarkerRefresh::due`] on its own timer, independent of ring
/// rebuilds, and redraws only the marker layer when it fires.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MarkerRefresh {
    /// Minimum interval between redraws, ms.
    pub interval_ms: i64,
    last_ms: Option<i64>,
}

impl Default for MarkerRefresh {
    fn default() -> Self {
        Self {
            interval_ms: 15_000,
            last_ms: None,
        }
    }
}

impl MarkerRefresh {
    /// Whether a redraw is due at `now_ms`; records the time when it is.
    pub fn due(&mut self, now_ms: i64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    /// Force the next [`MarkerRefresh::due`] call to fire.
    pub fn invalidate(&mut self) {
        self.last_ms = None;
    }

    /// Record an out-of-band redraw (e.g. during a full rebuild) so the
    /// interval restarts from `now_ms`.
    pub fn mark(&mut self, now_ms: i64) {
        self.last_ms = Some(now_ms);
    }
}

/// Draw the marker needle, arrowhead and dot at `angle_deg` across
/// `[inner_r, outer_r]`, replacing any previous marker.
///
/// Mutates only its own group in the overlay layer.
pub fn render_now_marker(
    scene: &mut Scene,
    layers: &MandalaLayers,
    canvas: &SceneCanvas,
    angle_deg: f64,
    inner_r: f64,
    outer_r: f64,
) {
    let group = scene.ensure_group(layers.overlay, "TodayMarker");
    scene.clear_children(group);

    let p0 = polar_to_xy(canvas.cx, canvas.cy, inner_r, angle_deg);
    let p1 = polar_to_xy(canvas.cx, canvas.cy, outer_r, angle_deg);

    scene.append(
        group,
        Node::new(NodeKind::Line(Line {
            from: p0,
            to: p1,
            stroke: Stroke::new(Rgba::white(0.75), 3.5).with_cap(ArcCap::Round),
        })),
    );

    // Arrowhead: a small triangle continuing past the needle tip.
    let tip_len = 12.0;
    let tip_wide = 10.0;

    let a = angle_deg.to_radians();
    let u = Vec2::new(a.cos(), a.sin());
    let perp = Vec2::new(-u.y, u.x);

    let tip = p1 + u * tip_len;
    let left = p1 + perp * (tip_wide / 2.0);
    let right = p1 - perp * (tip_wide / 2.0);

    let mut tri = BezPath::new();
    tri.move_to(left);
    tri.line_to(tip);
    tri.line_to(right);
    tri.close_path();

    scene.append(
        group,
        Node::new(NodeKind::Path(PathShape {
            path: tri,
            fill: Rgba::white(0.85),
        })),
    );

    scene.append(
        group,
        Node::new(NodeKind::Dot(Dot {
            center: p1,
            r: 3.0,
            fill: Rgba::white(0.9),
        })),
    );
}

/// Compute the marker angle from the live clock and redraw it.
///
/// The radius band hugs the outermost active ring; with no active ring
/// (`outer_edge == 0`) this is a no-op.
pub fn update_now_marker(
    scene: &mut Scene,
    layers: &MandalaLayers,
    canvas: &SceneCanvas,
    range: &TimeRange,
    now_ms: i64,
    outer_edge: f64,
) {
    if outer_edge <= 0.0 {
        return;
    }
    let deg = to_angle(now_ms, range);
    let inner = (outer_edge - 140.0).max(0.0);
    let outer = outer_edge + 20.0;
    render_now_marker(scene, layers, canvas, deg, inner, outer);
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/marker.rs"]
mod tests;
