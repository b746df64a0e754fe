use crate::foundation::core::{Point, SceneCanvas, TimeRange};
use crate::foundation::error::MandalaResult;
use crate::interact::controller::{ClickTarget, InteractionController};
use crate::layout::knobs::RingLayoutKnobs;
use crate::payload::model::RangePayload;
use crate::rings::derive::{GateSpanIndex, derive_gate_spans};
use crate::rings::expand::expansion_for;
use crate::rings::instances::{RingInstance, RingStack, plan_window};
use crate::rings::modules::{
    RingBuildContext, RingModuleKind, build_ring_module, instance_root_name,
};
use crate::scene::layers::MandalaLayers;
use crate::scene::node::{GroupRole, NodeKind, Scene};
use crate::scene::svg::write_svg;

/// The derived-ring engine for the tracker view.
///
/// Owns a [`RingStack`] of instances (the forest), the focus window knobs,
/// and the gate-span index derived once per data commit. Clicking a ring
/// expands it (center → channels, channel → gates), inserting the children
/// before the clicked instance with parent links set.
pub struct TrackerRuntime {
    scene: Scene,
    layers: MandalaLayers,
    canvas: SceneCanvas,
    knobs: RingLayoutKnobs,
    /// Maximum instances drawn around the focus.
    pub max_visible: usize,
    /// Hard cull distance from the focus.
    pub fade_count: usize,
    stack: RingStack,
    focus: Option<String>,
    spans: GateSpanIndex,
    range: Option<TimeRange>,
    interact: InteractionController,
    next_instance: u64,
}

impl std::fmt::Debug for TrackerRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerRuntime")
            .field("stack_len", &self.stack.len())
            .field("focus", &self.focus)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

impl TrackerRuntime {
    /// Engine with an initialized scene graph.
    pub fn new(knobs: RingLayoutKnobs) -> Self {
        let mut scene = Scene::new();
        let layers = MandalaLayers::init(&mut scene);
        Self {
            scene,
            layers,
            canvas: SceneCanvas::default(),
            knobs: knobs.resolve(),
            max_visible: 12,
            fade_count: 4,
            stack: RingStack::new(),
            focus: None,
            spans: GateSpanIndex::new(),
            range: None,
            interact: InteractionController::new(),
            next_instance: 0,
        }
    }

    /// Derive the gate-span index from a payload and rebuild.
    pub fn set_data(&mut self, payload: &RangePayload) -> MandalaResult<()> {
        self.spans = derive_gate_spans(payload);
        self.range = Some(payload.time_range()?);
        self.rebuild();
        Ok(())
    }

    /// Append a root ring for a module kind; returns its instance id.
    pub fn add_ring(&mut self, kind: RingModuleKind) -> String {
        let id = self.fresh_instance_id();
        self.stack.push(RingInstance::root(id.clone(), kind));
        self.rebuild();
        id
    }

    /// Remove an instance; its scene subtree goes with it.
    pub fn remove_ring(&mut self, instance_id: &str) {
        if self.stack.remove(instance_id).is_some() {
            let name = instance_root_name(instance_id);
            if let Some(root) = self.scene.child_by_name(self.layers.rings, &name) {
                self.scene.remove(root);
            }
            if self.focus.as_deref() == Some(instance_id) {
                self.focus = None;
            }
            self.rebuild();
        }
    }

    /// Move the focus window to an instance (or clear it).
    pub fn set_focus(&mut self, instance_id: Option<&str>) {
        self.focus = instance_id.map(str::to_string);
        self.rebuild();
    }

    /// Expand an instance into its derived children.
    ///
    /// Children are inserted before the clicked instance in lane order with
    /// their parent links set; module kinds already present in the stack are
    /// skipped. Returns the created instance ids.
    pub fn expand(&mut self, instance_id: &str) -> Vec<String> {
        let Some(kind) = self
            .stack
            .index_of(instance_id)
            .and_then(|idx| self.stack.get(idx))
            .map(|r| r.kind.clone())
        else {
            return Vec::new();
        };
        let kinds = expansion_for(&kind);

        let existing: Vec<String> = self.stack.iter().map(|r| r.kind.id()).collect();
        let mut created = Vec::new();

        for kind in kinds {
            if existing.contains(&kind.id()) {
                continue;
            }
            let id = self.fresh_instance_id();
            let inst = RingInstance::root(id.clone(), kind);
            let at = self
                .stack
                .index_of(instance_id)
                .unwrap_or(self.stack.len());
            self.stack.insert_before(at, inst);
            created.push(id);
        }

        // Parent links point at the clicked instance's final position.
        if let Some(parent_idx) = self.stack.index_of(instance_id) {
            for id in &created {
                if let Some(i) = self.stack.index_of(id) {
                    self.stack.set_parent(i, Some(parent_idx));
                }
            }
        }

        if !created.is_empty() {
            self.rebuild();
        }
        created
    }

    /// Resolve a click; a ring hit expands that instance and focuses it.
    pub fn click_at(&mut self, pointer: Point) -> ClickTarget {
        let target = self
            .interact
            .click(&mut self.scene, &self.layers, &self.canvas, pointer);

        if let ClickTarget::Ring { instance_id, .. } = &target {
            let id = instance_id.clone();
            self.expand(&id);
            self.focus = Some(id);
            self.rebuild();
        }

        target
    }

    /// Rebuild every visible instance from the focus window plan.
    ///
    /// Culled instances produce no scene nodes: their roots are removed
    /// outright rather than hidden.
    #[tracing::instrument(skip(self))]
    pub fn rebuild(&mut self) {
        let Some(range) = self.range else {
            return;
        };

        let plan = plan_window(
            &self.stack,
            self.focus.as_deref(),
            self.max_visible,
            self.fade_count,
        );

        // Roots of culled or removed instances go away entirely.
        let stale: Vec<_> = self
            .scene
            .children(self.layers.rings)
            .iter()
            .copied()
            .filter(|&id| {
                match self.scene.node(id).map(|n| &n.kind) {
                    Some(NodeKind::Group(g)) => match &g.role {
                        GroupRole::RingInstance { instance_id, .. } => {
                            !plan.contains_key(instance_id)
                        }
                        _ => false,
                    },
                    _ => false,
                }
            })
            .collect();
        for id in stale {
            self.scene.remove(id);
        }

        let ctx_knobs = self.knobs;
        let ctx_canvas = self.canvas;

        for lane_idx in 0..self.stack.len() {
            let Some(inst) = self.stack.get(lane_idx) else {
                continue;
            };
            let Some(visual) = plan.get(&inst.instance_id) else {
                continue;
            };
            let inst = inst.clone();
            let visual = *visual;

            let ctx = RingBuildContext {
                canvas: &ctx_canvas,
                knobs: &ctx_knobs,
                range: &range,
                spans: &self.spans,
                stack: &self.stack,
            };
            build_ring_module(&mut self.scene, &self.layers, &ctx, &inst, &visual);
        }
    }

    /// Serialize the current scene to SVG markup.
    pub fn svg(&self) -> String {
        write_svg(&self.scene, &self.canvas)
    }

    /// Scene accessor.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Layer handles of the scene.
    pub fn layers(&self) -> &MandalaLayers {
        &self.layers
    }

    /// The instance stack.
    pub fn stack(&self) -> &RingStack {
        &self.stack
    }

    /// Focused instance id, if any.
    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    fn fresh_instance_id(&mut self) -> String {
        self.next_instance += 1;
        format!("ring-{}", self.next_instance)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/tracker.rs"]
mod tests;
