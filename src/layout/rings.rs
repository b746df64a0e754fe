use crate::foundation::color::Rgba;
use crate::foundation::core::SceneCanvas;
use crate::layout::knobs::RingLayoutKnobs;
use crate::scene::layers::MandalaLayers;
use crate::scene::node::{Circle, Node, NodeId, NodeKind, Scene, Stroke};

/// Geometry assigned to one active ring by a layout pass.
///
/// Recomputed every pass, never persisted.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RingGeometry {
    /// Stroke centerline radius.
    pub mid_radius: f64,
    /// Stroke thickness.
    pub stroke_width: f64,
}

/// Result of packing `n` rings into the band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingPack {
    /// Clamped stroke thickness shared by all rings.
    pub stroke: f64,
    /// Gap between adjacent rings.
    pub gap: f64,
    /// Band actually consumed by strokes and gaps.
    pub used_band: f64,
    /// Outer edge of the packed stack.
    pub outer_edge: f64,
}

impl RingPack {
    /// Mid-radius of ring `i` (0-indexed, outermost first).
    pub fn mid_radius(&self, i: usize) -> f64 {
        self.outer_edge - self.stroke / 2.0 - i as f64 * (self.stroke + self.gap)
    }

    /// Geometry of ring `i`.
    pub fn geometry(&self, i: usize) -> RingGeometry {
        RingGeometry {
            mid_radius: self.mid_radius(i),
            stroke_width: self.stroke,
        }
    }
}

/// Pack `n` rings into the knobs' band, centered on `center_r`.
///
/// Fewer rings render thicker and recentered rather than shrinking toward
/// one edge. `n` is clamped to at least 1.
pub fn pack_rings(n: usize, knobs: &RingLayoutKnobs) -> RingPack {
    let n = n.max(1) as f64;

    let thickness_raw = knobs.band / (n + (n - 1.0) * knobs.gap_ratio);
    let gap = thickness_raw * knobs.gap_ratio;
    let stroke = thickness_raw.clamp(knobs.stroke_min, knobs.stroke_max);

    let used_band = n * stroke + (n - 1.0) * gap;
    let outer_edge = knobs.center_r + used_band / 2.0;

    RingPack {
        stroke,
        gap,
        used_band,
        outer_edge,
    }
}

/// Assign geometry to each active ring's guide circle.
///
/// Updates only the geometry-guide primitive per id (creating it on first
/// sight); ring content is rebuilt separately from the new guides. Returns
/// the geometry per id in the same order.
pub fn apply_ring_layout(
    scene: &mut Scene,
    layers: &MandalaLayers,
    canvas: &SceneCanvas,
    active_ids: &[String],
    knobs: &RingLayoutKnobs,
) -> Vec<RingGeometry> {
    let pack = pack_rings(active_ids.len(), knobs);

    let mut out = Vec::with_capacity(active_ids.len());
    for (i, id) in active_ids.iter().enumerate() {
        let geom = pack.geometry(i);
        let guide = ensure_guide_circle(scene, layers, canvas, id);

        if let Some(node) = scene.node_mut(guide) {
            if let NodeKind::Circle(circle) = &mut node.kind {
                circle.r = geom.mid_radius;
                circle.stroke = Some(Stroke::new(Rgba::rgba(0, 0, 0, 0.0), geom.stroke_width));
            }
            node.display = true;
        }

        out.push(geom);
    }
    out
}

/// Find or create the hidden guide circle for a ring id in the rings layer.
pub fn ensure_guide_circle(
    scene: &mut Scene,
    layers: &MandalaLayers,
    canvas: &SceneCanvas,
    ring_id: &str,
) -> NodeId {
    if let Some(id) = scene.child_by_name(layers.rings, ring_id) {
        return id;
    }
    scene.append(
        layers.rings,
        Node::new(NodeKind::Circle(Circle {
            cx: canvas.cx,
            cy: canvas.cy,
            r: 0.0,
            stroke: None,
        }))
        .named(ring_id),
    )
}

/// Read back the geometry recorded on a ring's guide circle.
///
/// `None` when the guide is missing or has no stroke yet — callers no-op in
/// that case rather than erroring.
pub fn guide_geometry(scene: &Scene, layers: &MandalaLayers, ring_id: &str) -> Option<RingGeometry> {
    let guide = scene.child_by_name(layers.rings, ring_id)?;
    let node = scene.node(guide)?;
    let NodeKind::Circle(circle) = &node.kind else {
        return None;
    };
    let stroke = circle.stroke.as_ref()?;
    Some(RingGeometry {
        mid_radius: circle.r,
        stroke_width: stroke.width,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/rings.rs"]
mod tests;
