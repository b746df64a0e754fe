use std::collections::BTreeSet;

use smallvec::SmallVec;

use crate::domain::Gate;
use crate::domain::channels::{channel_key, partners_for_gate};
use crate::domain::colors::gate_color;
use crate::foundation::color::Rgba;
use crate::foundation::core::{SceneCanvas, TimeRange, TimeView, polar_to_xy};
use crate::layout::rings::{RingGeometry, guide_geometry};
use crate::payload::model::Segment;
use crate::scene::layers::MandalaLayers;
use crate::scene::node::{
    ArcCap, ArcClass, ArcSeg, Group, GroupRole, Node, NodeId, NodeKind, Scene, SegmentRef, Stroke,
    Text,
};
use crate::timemap::mapper::{angle_of_fraction, normalize_dial_deg, to_fraction};

const FRAC_EPS: f64 = 1e-6;
const MS_PER_DAY: f64 = 86_400_000.0;

/// Visual tuning knobs for segment arcs.
///
/// Every constant here is presentation tuning, not a semantic constraint.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ArcStyle {
    /// Arc end-cap style.
    pub cap: ArcCap,
    /// Angular pad subtracted from each segment end, degrees. Angular (not
    /// pixel) so gaps stay consistent when ring radii change.
    pub pad_deg: f64,
    /// Cap on padding as a fraction of the segment's own span, so the pad
    /// alone never collapses fast movers.
    pub pad_span_cap: f64,
    /// Extra width of the outline stroke over the base.
    pub outline_extra: f64,
    /// Inset of the base/fill strokes inside the guide stroke.
    pub base_inset: f64,
    /// Extra width of the invisible hit stroke, keeping thin segments easy
    /// to hover and click.
    pub hit_extra: f64,
    /// Visual multiplier applied to the guide stroke width.
    pub stroke_scale: f64,
    /// Minimum clipped duration, in days, for a segment to get a label.
    pub min_label_days: f64,
}

impl Default for ArcStyle {
    fn default() -> Self {
        Self {
            cap: ArcCap::Butt,
            pad_deg: 0.22,
            pad_span_cap: 0.18,
            outline_extra: 2.0,
            base_inset: 4.0,
            hit_extra: 12.0,
            stroke_scale: 0.512,
            min_label_days: 7.0,
        }
    }
}

/// Externally supplied reference sets driving the match tint.
#[derive(Clone, Debug, Default)]
pub struct OverlayInputs {
    /// Gates active in the reference chart.
    pub reference_gates: BTreeSet<Gate>,
    /// Channel keys (`"37-40"`) already defined in the reference chart.
    pub reference_channel_keys: BTreeSet<String>,
}

impl OverlayInputs {
    /// Whether arcs for `gate` get the match tint.
    ///
    /// A transit gate matches when it is itself a reference gate, or when it
    /// completes a channel together with one (partner gate present in the
    /// reference set, or the pair's key listed as defined).
    pub fn is_match(&self, gate: Gate) -> bool {
        if self.reference_gates.contains(&gate) {
            return true;
        }
        partners_for_gate(gate).any(|p| {
            self.reference_gates.contains(&p)
                || self.reference_channel_keys.contains(&channel_key(gate, p))
        })
    }
}

/// Result of building one body's ring.
#[derive(Clone, Copy, Debug)]
pub struct BuiltRing {
    /// The `{body}-segments` group in the rings layer.
    pub group: NodeId,
    /// Number of colored arc pieces emitted (seam splits count twice).
    pub arc_count: usize,
    /// Geometry the ring was built against.
    pub geometry: RingGeometry,
}

/// Build one body's segmented ring into the rings layer.
///
/// Consumes the body's segments plus the active time range and emits, per
/// surviving segment, a same-geometry stack of arcs (hit, outline, base,
/// optional match, fill) inside a wrapper group carrying the segment's
/// identity, plus a centered label for long segments.
///
/// Segments are trusted to be pre-merged and gapless; invariant checking
/// lives in the payload validation pass, never here. A segment that is empty
/// after clipping or padding is silently dropped. Missing guide geometry or
/// an empty segment list skips the ring with a warning and leaves every
/// other ring alone.
pub fn build_segmented_ring(
    scene: &mut Scene,
    layers: &MandalaLayers,
    canvas: &SceneCanvas,
    body_id: &str,
    segments: &[Segment],
    range: &TimeRange,
    style: &ArcStyle,
    overlay: &OverlayInputs,
) -> Option<BuiltRing> {
    let Some(geometry) = guide_geometry(scene, layers, body_id) else {
        tracing::warn!(target: "mandala::rings", "missing guide circle for {body_id}");
        return None;
    };

    if segments.is_empty() {
        tracing::warn!(target: "mandala::rings", "no segments for {body_id}");
        return None;
    }

    let r = geometry.mid_radius;
    let sw = geometry.stroke_width * style.stroke_scale;
    let sw_base = (sw - style.base_inset).max(1.0);

    // Round caps visually extend past the arc endpoints by about half the
    // stroke width; trim the arc ends by that amount (in degrees) so
    // adjacent rounded caps never overlap across the seam.
    let max_layer_stroke = sw_base.max(sw + style.outline_extra);
    let cap_trim_deg = if style.cap == ArcCap::Round {
        ((max_layer_stroke / 2.0) / r).to_degrees()
    } else {
        0.0
    };

    // The guide circle is geometry only; arcs replace it visually.
    if let Some(guide) = scene.child_by_name(layers.rings, body_id) {
        scene.set_display(guide, false);
    }

    let group_name = format!("{body_id}-segments");
    let group = scene.ensure_group(layers.rings, &group_name);
    scene.clear_children(group);

    let pad_frac_base = style.pad_deg / 360.0;
    let mut arc_count = 0usize;

    for seg in segments {
        let Some((clip_lo, clip_hi)) = range.clip(seg.start_ms(), seg.end_ms()) else {
            continue;
        };
        let key = seg.key(body_id);

        let mut start_frac = to_fraction(clip_lo, range);
        let mut end_frac = to_fraction(clip_hi, range);

        // Pad both ends, but never let the pad eat small segments.
        let span_frac = end_frac - start_frac;
        let pad_frac = pad_frac_base.min(span_frac * style.pad_span_cap);
        start_frac = (start_frac + pad_frac).clamp(0.0, 1.0 - FRAC_EPS);
        end_frac = (end_frac - pad_frac).clamp(0.0, 1.0 - FRAC_EPS);
        if end_frac <= start_frac {
            continue;
        }

        // The dial sweep is always clockwise; under a tracker anchor the
        // fraction-to-angle map runs backwards, so the later fraction is the
        // clockwise start there.
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

        let mut start_deg = normalize_dial_deg(raw_start);
        let mut end_deg = start_deg + (raw_end - raw_start);

        if cap_trim_deg > 0.0 {
            if end_deg - start_deg <= cap_trim_deg * 2.0 + 1e-6 {
                continue;
            }
            start_deg += cap_trim_deg;
            end_deg -= cap_trim_deg;
        }

        // Segments crossing the 0°/360° seam split into two arcs.
        let pieces: SmallVec<[(f64, f64); 2]> = if end_deg > 270.0 {
            SmallVec::from_buf([(start_deg, 270.0), (-90.0, end_deg - 360.0)])
        } else {
            let mut one = SmallVec::new();
            one.push((start_deg, end_deg));
            one
        };

        let wrap = scene.append(
            group,
            Node::new(NodeKind::Group(Group {
                role: GroupRole::SegmentWrap(SegmentRef {
                    body: body_id.to_string(),
                    gate: seg.gate,
                    start: seg.start,
                    end: seg.end,
                    key: key.clone(),
                }),
                ..Group::default()
            })),
        );

        let is_match = overlay.is_match(seg.gate);
        for &(p0, p1) in &pieces {
            append_arc_stack(
                scene, wrap, canvas, r, p0, p1, sw, sw_base, style, seg.gate, is_match,
            );
            arc_count += 1;
        }

        let seg_days = (clip_hi - clip_lo) as f64 / MS_PER_DAY;
        if seg_days >= style.min_label_days && !has_label(scene, layers, &key) {
            let mid_frac = (start_frac + end_frac) / 2.0;
            let mid_deg = normalize_dial_deg(angle_of_fraction(mid_frac, range));
            let pos = polar_to_xy(canvas.cx, canvas.cy, r, mid_deg);

            let mut label = Node::new(NodeKind::Text(Text {
                pos,
                content: seg.gate.to_string(),
                size: 12.0,
                fill: Rgba::rgb(255, 255, 255),
                bold: true,
                label_key: Some(key),
            }));
            label.opacity = 0.7;
            scene.append(layers.labels, label);
        }
    }

    Some(BuiltRing {
        group,
        arc_count,
        geometry,
    })
}

#[allow(clippy::too_many_arguments)]
fn append_arc_stack(
    scene: &mut Scene,
    wrap: NodeId,
    canvas: &SceneCanvas,
    r: f64,
    start_deg: f64,
    end_deg: f64,
    sw: f64,
    sw_base: f64,
    style: &ArcStyle,
    gate: Gate,
    is_match: bool,
) {
    let arc = |paint: Rgba, width: f64, class: ArcClass| {
        Node::new(NodeKind::Arc(ArcSeg {
            cx: canvas.cx,
            cy: canvas.cy,
            r,
            start_deg,
            end_deg,
            stroke: Stroke::new(paint, width).with_cap(style.cap),
            class,
            hit: None,
        }))
    };

    scene.append(wrap, arc(Rgba::hit(), sw + style.hit_extra, ArcClass::Hit));
    scene.append(
        wrap,
        arc(Rgba::white(0.22), sw + style.outline_extra, ArcClass::Outline),
    );
    scene.append(wrap, arc(Rgba::rgb(255, 255, 255), sw_base, ArcClass::Base));
    if is_match {
        scene.append(
            wrap,
            arc(Rgba::rgba(0, 157, 255, 0.85), sw_base, ArcClass::Match),
        );
    }
    scene.append(wrap, arc(gate_color(gate), sw_base, ArcClass::Fill));
}

fn has_label(scene: &Scene, layers: &MandalaLayers, key: &str) -> bool {
    scene.children(layers.labels).iter().any(|&id| {
        matches!(
            scene.node(id).map(|n| &n.kind),
            Some(NodeKind::Text(t)) if t.label_key.as_deref() == Some(key)
        )
    })
}

#[cfg(test)]
#[path = "../../tests/unit/rings/build.rs"]
mod tests;
