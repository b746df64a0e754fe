use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::domain::Gate;
use crate::foundation::core::{Point, SceneCanvas};
use crate::scene::layers::MandalaLayers;
use crate::scene::node::{
    ArcClass, ArcSeg, Circle, DialHit, GroupRole, NodeId, NodeKind, Scene, SegmentRef,
};
use crate::timemap::mapper::wrap_deg;

/// Logical identity reported on hover and selection.
#[derive(Clone, Debug, PartialEq)]
pub struct HoverInfo {
    /// Body id the segment belongs to.
    pub body: String,
    /// Occupied gate.
    pub gate: Gate,
    /// Segment start, UTC.
    pub start: DateTime<Utc>,
    /// Segment end, UTC.
    pub end: DateTime<Utc>,
    /// Composite identity `body:gate:start:end`.
    pub key: String,
}

impl From<&SegmentRef> for HoverInfo {
    fn from(seg: &SegmentRef) -> Self {
        Self {
            body: seg.body.clone(),
            gate: seg.gate,
            start: seg.start,
            end: seg.end,
            key: seg.key.clone(),
        }
    }
}

/// What a click resolved to, in z-order priority.
#[derive(Clone, Debug, PartialEq)]
pub enum ClickTarget {
    /// A segment wrapper; selection moved to it.
    Segment(HoverInfo),
    /// A derived ring instance root.
    Ring {
        /// Clicked instance id.
        instance_id: String,
        /// Module id that built it.
        module_id: String,
    },
    /// A month hit arc on the dial (`0..=11`).
    Month(u32),
    /// Empty space; selection cleared.
    Background,
}

/// Callback fired with the hovered/selected segment, or `None` on leave/clear.
pub type SegmentCallback = Box<dyn FnMut(Option<&HoverInfo>)>;

/// Pointer wiring: hover reporting and single-selection exclusivity.
///
/// Hover has no cross-ring exclusivity — overlapping hit strokes report
/// independently. Selection is exclusive: every selected marker in the rings
/// layer is cleared before the new one is applied.
#[derive(Default)]
pub struct InteractionController {
    hovered: BTreeSet<String>,
    selected: Option<HoverInfo>,
    on_hover: Option<SegmentCallback>,
    on_select: Option<SegmentCallback>,
}

impl std::fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionController")
            .field("hovered", &self.hovered)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl InteractionController {
    /// Controller with no callbacks wired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the hover callback.
    pub fn set_on_hover(&mut self, cb: SegmentCallback) {
        self.on_hover = Some(cb);
    }

    /// Register the selection callback.
    pub fn set_on_select(&mut self, cb: SegmentCallback) {
        self.on_select = Some(cb);
    }

    /// Currently selected segment, if any.
    pub fn selected(&self) -> Option<&HoverInfo> {
        self.selected.as_ref()
    }

    /// Report a pointer position (or its absence) and fire hover callbacks
    /// for every segment entered or left since the last report.
    pub fn pointer_moved(
        &mut self,
        scene: &Scene,
        layers: &MandalaLayers,
        canvas: &SceneCanvas,
        pointer: Option<Point>,
    ) {
        let now: BTreeSet<String> = match pointer {
            Some(p) => segment_hits(scene, layers, canvas, p)
                .into_iter()
                .map(|(_, seg)| seg.key.clone())
                .collect(),
            None => BTreeSet::new(),
        };

        let left: Vec<String> = self.hovered.difference(&now).cloned().collect();
        let entered: Vec<String> = now.difference(&self.hovered).cloned().collect();

        if let Some(cb) = self.on_hover.as_mut() {
            for _ in &left {
                cb(None);
            }
            if !entered.is_empty()
                && let Some(p) = pointer
            {
                for (_, seg) in segment_hits(scene, layers, canvas, p) {
                    if entered.contains(&seg.key) {
                        cb(Some(&HoverInfo::from(&seg)));
                    }
                }
            }
        }

        self.hovered = now;
    }

    /// Resolve a click, update selection state, and fire callbacks.
    ///
    /// Priority order mirrors the z-order: segment stacks, then derived ring
    /// roots, then dial hit arcs; anything else is background and clears the
    /// selection.
    pub fn click(
        &mut self,
        scene: &mut Scene,
        layers: &MandalaLayers,
        canvas: &SceneCanvas,
        pointer: Point,
    ) -> ClickTarget {
        if let Some((wrap, seg)) = segment_hits(scene, layers, canvas, pointer).pop() {
            clear_selected_flags(scene, layers);
            if let Some(node) = scene.node_mut(wrap)
                && let NodeKind::Group(group) = &mut node.kind
            {
                group.selected = true;
            }

            let info = HoverInfo::from(&seg);
            self.selected = Some(info.clone());
            if let Some(cb) = self.on_select.as_mut() {
                cb(Some(&info));
            }
            return ClickTarget::Segment(info);
        }

        if let Some((instance_id, module_id)) = ring_hit(scene, layers, canvas, pointer) {
            return ClickTarget::Ring {
                instance_id,
                module_id,
            };
        }

        if let Some(month) = month_hit(scene, layers, canvas, pointer) {
            return ClickTarget::Month(month);
        }

        self.clear_selection(scene, layers);
        ClickTarget::Background
    }

    /// Clear the selection and every selected marker in the scene.
    pub fn clear_selection(&mut self, scene: &mut Scene, layers: &MandalaLayers) {
        clear_selected_flags(scene, layers);
        if self.selected.take().is_some()
            && let Some(cb) = self.on_select.as_mut()
        {
            cb(None);
        }
    }

    /// Re-apply the current selection's visual marker after a rebuild.
    ///
    /// Rebuilds replace segment wrappers; the composite key re-correlates the
    /// logical selection with the fresh scene nodes.
    pub fn reapply_selection(&self, scene: &mut Scene, layers: &MandalaLayers) {
        clear_selected_flags(scene, layers);
        let Some(key) = self.selected.as_ref().map(|s| s.key.clone()) else {
            return;
        };
        for id in scene.descendants(layers.rings) {
            let Some(node) = scene.node_mut(id) else {
                continue;
            };
            if let NodeKind::Group(group) = &mut node.kind
                && matches!(&group.role, GroupRole::SegmentWrap(seg) if seg.key == key)
            {
                group.selected = true;
            }
        }
    }
}

fn clear_selected_flags(scene: &mut Scene, layers: &MandalaLayers) {
    for id in scene.descendants(layers.rings) {
        if let Some(node) = scene.node_mut(id)
            && let NodeKind::Group(group) = &mut node.kind
        {
            group.selected = false;
        }
    }
}

// Depth-first preorder walk skipping hidden subtrees.
fn visible_descendants(scene: &Scene, root: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let Some(node) = scene.node(id) else {
            continue;
        };
        if !node.display {
            continue;
        }
        out.push(id);
        for &c in scene.children(id).iter().rev() {
            stack.push(c);
        }
    }
    out
}

fn arc_contains(arc: &ArcSeg, canvas: &SceneCanvas, p: Point) -> bool {
    let dx = p.x - canvas.cx;
    let dy = p.y - canvas.cy;
    let dist = (dx * dx + dy * dy).sqrt();
    if (dist - arc.r).abs() > arc.stroke.width / 2.0 {
        return false;
    }

    let theta = dy.atan2(dx).to_degrees();
    let sweep = arc.end_deg - arc.start_deg;
    wrap_deg(theta - arc.start_deg) <= sweep
}

fn circle_contains(circle: &Circle, canvas: &SceneCanvas, p: Point) -> bool {
    let Some(stroke) = &circle.stroke else {
        return false;
    };
    let dx = p.x - canvas.cx;
    let dy = p.y - canvas.cy;
    let dist = (dx * dx + dy * dy).sqrt();
    (dist - circle.r).abs() <= stroke.width / 2.0
}

// Segment wrappers whose hit stroke contains the pointer, in draw order.
fn segment_hits(
    scene: &Scene,
    layers: &MandalaLayers,
    canvas: &SceneCanvas,
    p: Point,
) -> Vec<(NodeId, SegmentRef)> {
    let mut out = Vec::new();
    for id in visible_descendants(scene, layers.rings) {
        let Some(node) = scene.node(id) else {
            continue;
        };
        let NodeKind::Group(group) = &node.kind else {
            continue;
        };
        let GroupRole::SegmentWrap(seg) = &group.role else {
            continue;
        };

        let hit = scene.children(id).iter().any(|&child| {
            matches!(
                scene.node(child).map(|n| &n.kind),
                Some(NodeKind::Arc(arc))
                    if arc.class == ArcClass::Hit && arc_contains(arc, canvas, p)
            )
        });
        if hit {
            out.push((id, seg.clone()));
        }
    }
    out
}

fn ring_hit(
    scene: &Scene,
    layers: &MandalaLayers,
    canvas: &SceneCanvas,
    p: Point,
) -> Option<(String, String)> {
    for id in visible_descendants(scene, layers.rings) {
        let Some(node) = scene.node(id) else {
            continue;
        };
        let NodeKind::Group(group) = &node.kind else {
            continue;
        };
        let GroupRole::RingInstance {
            instance_id,
            module_id,
        } = &group.role
        else {
            continue;
        };

        let hit = scene.children(id).iter().any(|&child| {
            match scene.node(child).map(|n| &n.kind) {
                Some(NodeKind::Arc(arc)) => arc_contains(arc, canvas, p),
                Some(NodeKind::Circle(circle)) => circle_contains(circle, canvas, p),
                _ => false,
            }
        });
        if hit {
            return Some((instance_id.clone(), module_id.clone()));
        }
    }
    None
}

fn month_hit(
    scene: &Scene,
    layers: &MandalaLayers,
    canvas: &SceneCanvas,
    p: Point,
) -> Option<u32> {
    for id in visible_descendants(scene, layers.underlay) {
        if let Some(NodeKind::Arc(arc)) = scene.node(id).map(|n| &n.kind)
            && let Some(DialHit::Month(m)) = arc.hit
            && arc_contains(arc, canvas, p)
        {
            return Some(m);
        }
    }
    None
}

#[cfg(test)]
#[path = "../../tests/unit/interact/controller.rs"]
mod tests;
