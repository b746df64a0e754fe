use std::collections::BTreeMap;

use crate::animation::continuity::ContinuityManager;
use crate::domain::bodies::body_rank;
use crate::foundation::core::{Point, SceneCanvas, TimeRange, TimeView};
use crate::foundation::error::MandalaResult;
use crate::interact::controller::{ClickTarget, HoverInfo, InteractionController, SegmentCallback};
use crate::layout::knobs::RingLayoutKnobs;
use crate::layout::rings::apply_ring_layout;
use crate::overlay::calendar::{
    DialMode, MonthDialOptions, outer_edge_of, update_day_dial, update_month_dial,
};
use crate::overlay::marker::{MarkerRefresh, update_now_marker};
use crate::payload::model::{RangePayload, Span};
use crate::payload::validate::warn_payload_invariants;
use crate::rings::build::{ArcStyle, BuiltRing, OverlayInputs, build_segmented_ring};
use crate::scene::layers::MandalaLayers;
use crate::scene::node::{NodeKind, Scene};
use crate::scene::svg::write_svg;

/// Generation token for the asynchronous fetch boundary.
///
/// Monotonically increasing; a payload commits only while its token is still
/// current, so a stale, slower response can never overwrite a newer one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Epoch(pub u64);

/// Navigation change requested by a dial click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavPatch {
    /// Requested view.
    pub view: TimeView,
    /// Requested span granularity.
    pub span: Span,
    /// Requested month (`0..=11`) for month-scoped viewing.
    pub month: Option<u32>,
}

/// Callback fired when an overlay click requests navigation.
pub type NavCallback = Box<dyn FnMut(&NavPatch)>;

/// The calendar-view engine: one explicit state struct owned by the render
/// loop, passed by reference into each pure computation.
///
/// Owns the scene graph, the committed payload and its derived
/// [`TimeRange`], ring visibility, the continuity manager, the interaction
/// controller and the marker refresh policy. Everything is single-threaded
/// and event-driven; suspension exists only at the fetch boundary, guarded
/// by [`Epoch`] tokens.
pub struct MandalaRuntime {
    scene: Scene,
    layers: MandalaLayers,
    canvas: SceneCanvas,
    knobs: RingLayoutKnobs,
    style: ArcStyle,
    overlay_inputs: OverlayInputs,
    show_calendar: bool,
    selected_month: Option<u32>,
    payload: Option<RangePayload>,
    range: Option<TimeRange>,
    all_ids: Vec<String>,
    active_ids: Vec<String>,
    visible: BTreeMap<String, bool>,
    continuity: ContinuityManager,
    interact: InteractionController,
    marker: MarkerRefresh,
    epoch: u64,
    on_navigate: Option<NavCallback>,
}

impl std::fmt::Debug for MandalaRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MandalaRuntime")
            .field("epoch", &self.epoch)
            .field("range", &self.range)
            .field("active_ids", &self.active_ids)
            .finish_non_exhaustive()
    }
}

impl MandalaRuntime {
    /// Engine with an initialized scene graph and default styling.
    pub fn new(knobs: RingLayoutKnobs) -> Self {
        let mut scene = Scene::new();
        let layers = MandalaLayers::init(&mut scene);
        Self {
            scene,
            layers,
            canvas: SceneCanvas::default(),
            knobs: knobs.resolve(),
            style: ArcStyle::default(),
            overlay_inputs: OverlayInputs::default(),
            show_calendar: true,
            selected_month: None,
            payload: None,
            range: None,
            all_ids: Vec::new(),
            active_ids: Vec::new(),
            visible: BTreeMap::new(),
            continuity: ContinuityManager::new(),
            interact: InteractionController::new(),
            marker: MarkerRefresh::default(),
            epoch: 0,
            on_navigate: None,
        }
    }

    /// Start a fetch: bumps the generation and returns its token.
    ///
    /// Prior ring content stays visible unchanged while the fetch is
    /// outstanding.
    pub fn begin_fetch(&mut self) -> Epoch {
        self.epoch += 1;
        Epoch(self.epoch)
    }

    /// Commit a fetched payload under a token.
    ///
    /// Returns `Ok(false)` when the token is stale — the result is discarded
    /// and the prior render is left intact. Otherwise the derived state
    /// (`TimeRange`, body tracks, id order) is fully replaced before any
    /// geometry or arc construction begins, then everything rebuilds.
    #[tracing::instrument(skip(self, payload))]
    pub fn commit_payload(
        &mut self,
        epoch: Epoch,
        payload: RangePayload,
        now_ms: i64,
    ) -> MandalaResult<bool> {
        if epoch.0 != self.epoch {
            tracing::debug!(
                target: "mandala::runtime",
                "discarding stale payload (epoch {} < {})",
                epoch.0,
                self.epoch
            );
            return Ok(false);
        }

        warn_payload_invariants(&payload);
        let range = payload.time_range()?;

        let mut all_ids: Vec<(usize, String)> = payload
            .transits
            .keys()
            .filter_map(|body| body_rank(body).map(|rank| (rank, body.clone())))
            .collect();
        all_ids.sort();

        // Previous render's generated content goes away wholesale; guides
        // stay so continuity can diff radii.
        for id in &self.all_ids {
            if let Some(group) = self.scene.child_by_name(self.layers.rings, &format!("{id}-segments")) {
                self.scene.remove(group);
            }
        }
        self.scene.clear_children(self.layers.labels);

        self.payload = Some(payload);
        self.range = Some(range);
        self.all_ids = all_ids.into_iter().map(|(_, body)| body).collect();

        self.rebuild(now_ms);
        Ok(true)
    }

    /// Toggle a body's ring without refetching.
    pub fn set_visibility(&mut self, body: &str, on: bool, now_ms: i64) {
        self.visible.insert(body.to_string(), on);
        self.rebuild(now_ms);
    }

    /// Replace the layout knobs and rebuild.
    pub fn set_knobs(&mut self, knobs: RingLayoutKnobs, now_ms: i64) {
        self.knobs = knobs.resolve();
        self.rebuild(now_ms);
    }

    /// Replace the arc style and rebuild.
    pub fn set_style(&mut self, style: ArcStyle, now_ms: i64) {
        self.style = style;
        self.rebuild(now_ms);
    }

    /// Replace the reference-chart overlay inputs and rebuild.
    pub fn set_overlay_inputs(&mut self, inputs: OverlayInputs, now_ms: i64) {
        self.overlay_inputs = inputs;
        self.rebuild(now_ms);
    }

    /// Toggle the calendar dials and select a month for month-scoped viewing.
    pub fn set_dial(&mut self, show_calendar: bool, selected_month: Option<u32>, now_ms: i64) {
        self.show_calendar = show_calendar;
        self.selected_month = selected_month;
        self.rebuild(now_ms);
    }

    /// Register the hover callback.
    pub fn set_on_hover(&mut self, cb: SegmentCallback) {
        self.interact.set_on_hover(cb);
    }

    /// Register the selection callback.
    pub fn set_on_select(&mut self, cb: SegmentCallback) {
        self.interact.set_on_select(cb);
    }

    /// Register the navigation callback fired by dial clicks.
    pub fn set_on_navigate(&mut self, cb: NavCallback) {
        self.on_navigate = Some(cb);
    }

    /// Report a pointer move.
    pub fn hover_at(&mut self, pointer: Option<Point>) {
        self.interact
            .pointer_moved(&self.scene, &self.layers, &self.canvas, pointer);
    }

    /// Resolve a click; month hits request navigation via the callback.
    pub fn click_at(&mut self, pointer: Point) -> ClickTarget {
        let target = self
            .interact
            .click(&mut self.scene, &self.layers, &self.canvas, pointer);

        if let ClickTarget::Month(month) = target
            && let Some(cb) = self.on_navigate.as_mut()
        {
            cb(&NavPatch {
                view: TimeView::Calendar,
                span: Span::Month,
                month: Some(month),
            });
        }

        target
    }

    /// Periodic tick for the marker's autonomous refresh.
    ///
    /// Runs independently of ring rebuilds and mutates only the marker's own
    /// overlay group.
    pub fn tick(&mut self, now_ms: i64) {
        if !self.marker.due(now_ms) {
            return;
        }
        let Some(range) = self.range else {
            return;
        };
        let outer_edge = outer_edge_of(&self.scene, &self.layers, &self.active_ids);
        update_now_marker(
            &mut self.scene,
            &self.layers,
            &self.canvas,
            &range,
            now_ms,
            outer_edge,
        );
    }

    /// Full rebuild from the committed payload: layout, dials, rings,
    /// visibility, selection, marker — in that order, so nothing partial is
    /// ever drawn.
    #[tracing::instrument(skip(self))]
    pub fn rebuild(&mut self, now_ms: i64) {
        let Some(range) = self.range else {
            return;
        };
        let Some(payload) = self.payload.take() else {
            return;
        };

        self.active_ids = self
            .all_ids
            .iter()
            .filter(|id| self.visible.get(id.as_str()).copied().unwrap_or(true))
            .cloned()
            .collect();

        apply_ring_layout(
            &mut self.scene,
            &self.layers,
            &self.canvas,
            &self.active_ids,
            &self.knobs,
        );

        let outer_edge = outer_edge_of(&self.scene, &self.layers, &self.active_ids);
        let is_calendar = range.view == TimeView::Calendar;
        let month_mode = payload.span == Span::Month && self.selected_month.is_some();

        update_month_dial(
            &mut self.scene,
            &self.layers,
            &self.canvas,
            payload.year,
            outer_edge,
            self.show_calendar && is_calendar,
            &MonthDialOptions {
                mode: if month_mode {
                    DialMode::Month
                } else {
                    DialMode::Year
                },
                selected_month: self.selected_month,
                clickable: true,
            },
        );

        let day_month = self.selected_month.unwrap_or(0);
        update_day_dial(
            &mut self.scene,
            &self.layers,
            &self.canvas,
            payload.year,
            day_month,
            outer_edge,
            self.show_calendar && is_calendar && month_mode,
        );

        // Labels are shared across rings; they rebuild with the arcs.
        self.scene.clear_children(self.layers.labels);

        for id in self.active_ids.clone() {
            let segments = payload
                .transits
                .get(&id)
                .map(|t| t.segments.as_slice())
                .unwrap_or(&[]);

            let built = build_segmented_ring(
                &mut self.scene,
                &self.layers,
                &self.canvas,
                &id,
                segments,
                &range,
                &self.style,
                &self.overlay_inputs,
            );

            if let Some(BuiltRing { group, geometry, .. }) = built {
                // Replacing the transition cancels any in-flight one.
                let transition = self.continuity.transition_for(&id, geometry.mid_radius);
                if let Some(node) = self.scene.node_mut(group)
                    && let NodeKind::Group(g) = &mut node.kind
                {
                    g.transition = transition;
                }
            }
        }

        self.apply_visibility();
        self.interact.reapply_selection(&mut self.scene, &self.layers);

        update_now_marker(
            &mut self.scene,
            &self.layers,
            &self.canvas,
            &range,
            now_ms,
            outer_edge,
        );
        self.marker.mark(now_ms);

        self.payload = Some(payload);
    }

    fn apply_visibility(&mut self) {
        for id in self.all_ids.clone() {
            let on = self.visible.get(id.as_str()).copied().unwrap_or(true)
                || self.knobs.show_inactive;

            if let Some(guide) = self.scene.child_by_name(self.layers.rings, &id) {
                // Guides stay hidden behind built arcs; only force them off.
                if !on {
                    self.scene.set_display(guide, false);
                }
            }
            if let Some(group) = self
                .scene
                .child_by_name(self.layers.rings, &format!("{id}-segments"))
            {
                self.scene.set_display(group, on);
            }
        }
    }

    /// Serialize the current scene to SVG markup.
    pub fn svg(&self) -> String {
        write_svg(&self.scene, &self.canvas)
    }

    /// Scene accessor for hosts that walk the graph directly.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Layer handles of the scene.
    pub fn layers(&self) -> &MandalaLayers {
        &self.layers
    }

    /// Debug surface: the last committed payload.
    pub fn last_payload(&self) -> Option<&RangePayload> {
        self.payload.as_ref()
    }

    /// Debug surface: the derived range boundaries.
    pub fn time_range(&self) -> Option<&TimeRange> {
        self.range.as_ref()
    }

    /// Ring ids active in the last rebuild, outermost first.
    pub fn active_ids(&self) -> &[String] {
        &self.active_ids
    }

    /// Currently selected segment, if any.
    pub fn selected(&self) -> Option<&HoverInfo> {
        self.interact.selected()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/state.rs"]
mod tests;
