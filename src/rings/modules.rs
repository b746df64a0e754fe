use smallvec::SmallVec;

use crate::domain::Gate;
use crate::domain::centers::Center;
use crate::foundation::color::Rgba;
use crate::foundation::core::{Point, SceneCanvas, TimeRange, TimeView};
use crate::layout::knobs::RingLayoutKnobs;
use crate::layout::tracks::track_for_index;
use crate::rings::derive::GateSpanIndex;
use crate::rings::instances::{RingInstance, RingStack, RingVisual};
use crate::rings::intervals::{Interval, intersect_intervals, merge_intervals};
use crate::scene::layers::MandalaLayers;
use crate::scene::node::{
    ArcClass, ArcSeg, Circle, GroupRole, Node, NodeId, NodeKind, Scene, Stroke, Text,
};
use crate::timemap::mapper::{angle_of_fraction, normalize_dial_deg, to_fraction};

/// Builder variant of a derived ring, carrying the data each variant needs.
///
/// Dispatch is by `match`; the id string exists only for stable instance
/// addressing (`center:sacral`, `channel:37-40`, `gate:37`, `custom:<key>`).
#[derive(Clone, Debug, PartialEq)]
pub enum RingModuleKind {
    /// Merged occupancy of every gate in a center.
    Center(Center),
    /// Co-occurrence (intersection) of two specific gates.
    Channel(Gate, Gate),
    /// Merged occupancy of a single gate.
    Gate(Gate),
    /// Caller-provided merged intervals under a stable key.
    Custom {
        /// Addressing key.
        key: String,
        /// Pre-merged intervals to draw.
        intervals: Vec<Interval>,
    },
}

impl RingModuleKind {
    /// Stable module id string.
    pub fn id(&self) -> String {
        match self {
            Self::Center(c) => format!("center:{}", c.slug()),
            Self::Channel(a, b) => {
                let (lo, hi) = (a.min(b), a.max(b));
                format!("channel:{lo}-{hi}")
            }
            Self::Gate(g) => format!("gate:{g}"),
            Self::Custom { key, .. } => format!("custom:{key}"),
        }
    }

    /// Parse an id string back into a module kind.
    ///
    /// `custom:` ids parse with empty intervals; the caller owns the data.
    pub fn parse(id: &str) -> Option<Self> {
        if let Some(slug) = id.strip_prefix("center:") {
            return Center::from_slug(slug).map(Self::Center);
        }
        if let Some(rest) = id.strip_prefix("channel:") {
            let (a, b) = rest.split_once('-')?;
            return Some(Self::Channel(a.parse().ok()?, b.parse().ok()?));
        }
        if let Some(rest) = id.strip_prefix("gate:") {
            return Some(Self::Gate(rest.parse().ok()?));
        }
        if let Some(key) = id.strip_prefix("custom:") {
            return Some(Self::Custom {
                key: key.to_string(),
                intervals: Vec::new(),
            });
        }
        None
    }

    /// Display label.
    pub fn label(&self) -> String {
        match self {
            Self::Center(c) => format!("{} Activations", c.label()),
            Self::Channel(a, b) => {
                let (lo, hi) = (a.min(b), a.max(b));
                format!("Channel {lo}-{hi}")
            }
            Self::Gate(g) => format!("Gate {g}"),
            Self::Custom { key, .. } => key.clone(),
        }
    }

    /// Merged occupancy intervals for this module over the span index.
    pub fn occupancy(&self, spans: &GateSpanIndex) -> Vec<Interval> {
        match self {
            Self::Center(center) => {
                let mut all = Vec::new();
                for gate in center.gates() {
                    if let Some(list) = spans.get(&gate) {
                        all.extend_from_slice(list);
                    }
                }
                merge_intervals(all, 0)
            }
            Self::Channel(a, b) => {
                let ma = merge_intervals(spans.get(a).cloned().unwrap_or_default(), 0);
                let mb = merge_intervals(spans.get(b).cloned().unwrap_or_default(), 0);
                intersect_intervals(&ma, &mb)
            }
            Self::Gate(g) => merge_intervals(spans.get(g).cloned().unwrap_or_default(), 0),
            Self::Custom { intervals, .. } => intervals.clone(),
        }
    }
}

/// Everything a module build needs, passed by reference.
///
/// Modules capture no ambient state; a build is idempotent and mutates only
/// the subtree rooted at its own instance's group.
#[derive(Clone, Copy, Debug)]
pub struct RingBuildContext<'a> {
    /// Canvas the dial is drawn on.
    pub canvas: &'a SceneCanvas,
    /// Layout knobs for the shared derived band.
    pub knobs: &'a RingLayoutKnobs,
    /// Active time window.
    pub range: &'a TimeRange,
    /// Precomputed gate → raw interval index.
    pub spans: &'a GateSpanIndex,
    /// Current ring stack, for lane assignment and ordering.
    pub stack: &'a RingStack,
}

/// Scene root group name for an instance id.
pub fn instance_root_name(instance_id: &str) -> String {
    format!(
        "RingInst__{}",
        instance_id.replace([':', '.'], "_")
    )
}

/// Build (or rebuild) one derived ring instance into the rings layer.
///
/// Draws merged-occupancy arcs on the instance's lane; an instance with no
/// occupancy renders a calm placeholder circle instead. Safe to call
/// repeatedly with the same instance.
pub fn build_ring_module(
    scene: &mut Scene,
    layers: &MandalaLayers,
    ctx: &RingBuildContext<'_>,
    inst: &RingInstance,
    visual: &RingVisual,
) -> NodeId {
    let lane_idx = ctx.stack.index_of(&inst.instance_id).unwrap_or(0);
    let root_name = instance_root_name(&inst.instance_id);
    let root = scene.ensure_group(layers.rings, &root_name);
    scene.clear_children(root);

    if let Some(node) = scene.node_mut(root) {
        node.opacity = visual.opacity;
        if let NodeKind::Group(group) = &mut node.kind {
            group.role = GroupRole::RingInstance {
                instance_id: inst.instance_id.clone(),
                module_id: inst.kind.id(),
            };
        }
    }

    let track = track_for_index(ctx.knobs, ctx.stack.len(), lane_idx);
    let r = track.mid_radius;
    let stroke = track.stroke_width * visual.stroke_mul;

    let merged = inst.kind.occupancy(ctx.spans);

    if merged.is_empty() {
        scene.append(
            root,
            Node::new(NodeKind::Circle(Circle {
                cx: ctx.canvas.cx,
                cy: ctx.canvas.cy,
                r,
                stroke: Some(Stroke::new(Rgba::white(0.18), stroke)),
            })),
        );
        append_lane_label(scene, root, ctx.canvas, r, stroke, &format!("{} (0)", inst.label));
        return root;
    }

    for iv in &merged {
        let Some((lo, hi)) = ctx.range.clip(iv.start_ms, iv.end_ms) else {
            continue;
        };
        let start_frac = to_fraction(lo, ctx.range);
        let end_frac = to_fraction(hi, ctx.range);
        if end_frac <= start_frac {
            continue;
        }

        for (a0, a1) in dial_pieces(ctx.range, start_frac, end_frac) {
            scene.append(
                root,
                Node::new(NodeKind::Arc(ArcSeg {
                    cx: ctx.canvas.cx,
                    cy: ctx.canvas.cy,
                    r,
                    start_deg: a0,
                    end_deg: a1,
                    stroke: Stroke::new(Rgba::white(0.65), stroke),
                    class: ArcClass::Plain,
                    hit: None,
                })),
            );
        }
    }

    append_lane_label(
        scene,
        root,
        ctx.canvas,
        r,
        stroke,
        &format!("{} ({} spans)", inst.label, merged.len()),
    );

    root
}

// Fraction window -> clockwise arc pieces, split at the seam when needed.
fn dial_pieces(range: &TimeRange, start_frac: f64, end_frac: f64) -> SmallVec<[(f64, f64); 2]> {
    let anchored = range.view == TimeView::Tracker && range.anchor_ms.is_some();
    let (raw_start, raw_end) = if anchored {
        (
            angle_of_fraction(end_frac, range),
            angle_of_fraction(start_frac, range),
        )
    } else {
        (
            angle_of_fraction(start_frac, range),
            angle_of_fraction(end_frac, range),
        )
    };

    let start_deg = normalize_dial_deg(raw_start);
    let end_deg = start_deg + (raw_end - raw_start);

    if end_deg > 270.0 {
        SmallVec::from_buf([(start_deg, 270.0), (-90.0, end_deg - 360.0)])
    } else {
        let mut one = SmallVec::new();
        one.push((start_deg, end_deg));
        one
    }
}

fn append_lane_label(
    scene: &mut Scene,
    root: NodeId,
    canvas: &SceneCanvas,
    r: f64,
    stroke: f64,
    content: &str,
) {
    scene.append(
        root,
        Node::new(NodeKind::Text(Text {
            pos: Point::new(canvas.cx, canvas.cy - r - stroke),
            content: content.to_string(),
            size: 16.0,
            fill: Rgba::white(0.7),
            bold: false,
            label_key: None,
        })),
    );
}

#[cfg(test)]
#[path = "../../tests/unit/rings/modules.rs"]
mod tests;
