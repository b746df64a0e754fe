//! Mandala is a radial timeline composition and rendering engine.
//!
//! Concentric rings depict, as colored arcs around a dial, which categorical
//! state ("gate") each moving body occupies across time. The same engine
//! serves a fixed calendar year and a moving, "now"-anchored tracker window,
//! plus pluggable derived rings (merged occupancy over logical groups of
//! states).
//!
//! # Pipeline overview
//!
//! 1. **Commit**: `RangePayload + Epoch -> MandalaRuntime` (stale fetches are
//!    discarded, derived state fully replaced)
//! 2. **Layout**: active ring ids + knobs -> per-ring geometry guides
//! 3. **Build**: segments -> layered arc primitives in the retained scene
//! 4. **Overlay**: month/day dials and the "now" marker on their own layers
//! 5. **Write** (optional): `Scene -> SVG` markup
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: time mapping and layout are pure and
//!   stable for a given input; equal timestamps map bit-identically.
//! - **No IO in the engine**: payloads and the clock are passed in; the
//!   engine never fetches or reads time itself.
//! - **Single-threaded**: event/callback-driven, with a generation token
//!   guarding the one asynchronous boundary (payload fetch).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod domain;
mod foundation;
mod interact;
mod layout;
mod overlay;
mod payload;
mod rings;
mod runtime;
mod scene;
mod timemap;

pub use animation::continuity::{ContinuityManager, RingTransition, TransitionKind};
pub use animation::ease::Ease;
pub use domain::Gate;
pub use domain::bodies::{BODY_ORDER, body_rank};
pub use domain::centers::{Center, centers_of_gate};
pub use domain::channels::{CHANNELS, channel_key, defined_channels_from_gates, partners_for_gate};
pub use domain::colors::gate_color;
pub use foundation::color::Rgba;
pub use foundation::core::{BezPath, Point, SceneCanvas, TimeRange, TimeView, Vec2, polar_to_xy};
pub use foundation::error::{MandalaError, MandalaResult};
pub use interact::controller::{ClickTarget, HoverInfo, InteractionController, SegmentCallback};
pub use layout::knobs::{LayoutPreset, RingLayoutKnobs};
pub use layout::rings::{
    RingGeometry, RingPack, apply_ring_layout, ensure_guide_circle, guide_geometry, pack_rings,
};
pub use layout::tracks::track_for_index;
pub use overlay::calendar::{
    DialMode, MonthDialOptions, month_start_ms, outer_edge_of, update_day_dial, update_month_dial,
};
pub use overlay::marker::{MarkerRefresh, render_now_marker, update_now_marker};
pub use payload::model::{BodyTrack, RangePayload, Segment, Span};
pub use payload::validate::check_body_segments;
pub use rings::build::{ArcStyle, BuiltRing, OverlayInputs, build_segmented_ring};
pub use rings::derive::{GateSpanIndex, derive_gate_spans};
pub use rings::expand::expansion_for;
pub use rings::instances::{RingInstance, RingStack, RingVisual, plan_window};
pub use rings::intervals::{Interval, intersect_intervals, merge_intervals};
pub use rings::modules::{RingBuildContext, RingModuleKind, build_ring_module};
pub use runtime::state::{Epoch, MandalaRuntime, NavCallback, NavPatch};
pub use runtime::tracker::TrackerRuntime;
pub use scene::layers::MandalaLayers;
pub use scene::node::{
    ArcCap, ArcClass, ArcSeg, ArcText, Circle, DialHit, Dot, Group, GroupRole, Line, Node, NodeId,
    NodeKind, PathShape, Scene, SegmentRef, Stroke, Text, arc_path_d,
};
pub use scene::svg::{arc_style_css, write_svg};
pub use timemap::mapper::{
    angle_of_fraction, normalize_dial_deg, sweep_deg, to_angle, to_fraction, wrap_deg,
};
