use chrono::{DateTime, Utc};

use crate::animation::continuity::RingTransition;
use crate::domain::Gate;
use crate::foundation::color::Rgba;
use crate::foundation::core::{BezPath, Point};

/// Identifier for a node in a [`Scene`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct NodeId(pub u32);

/// Retained scene graph: a node arena rooted at a single group.
///
/// Components receive layer handles ([`crate::MandalaLayers`])
/// and write only into their assigned subtree; nothing in the engine searches
/// the whole tree for attachment points.
#[derive(Clone, Debug)]
pub struct Scene {
    slots: Vec<Option<Node>>,
    free: Vec<u32>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// One scene node: primitive payload plus tree links and display state.
#[derive(Clone, Debug)]
pub struct Node {
    /// Stable name for addressing (`"Moon"`, `"CalendarOverlay"`, ...).
    pub name: Option<String>,
    /// Primitive payload.
    pub kind: NodeKind,
    /// Display flag; hidden nodes are skipped by the writer and hit-testing.
    pub display: bool,
    /// Node opacity in `[0, 1]`.
    pub opacity: f32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Node with default display state around a primitive.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            kind,
            display: true,
            opacity: 1.0,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Set the stable name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Primitive payloads a node can carry.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Container; carries interaction role, selection flag and transitions.
    Group(Group),
    /// Full circle (guides, placeholder rings).
    Circle(Circle),
    /// Stroked arc along the dial.
    Arc(ArcSeg),
    /// Straight line (ticks, marker needle).
    Line(Line),
    /// Filled dot.
    Dot(Dot),
    /// Filled path (marker arrowhead).
    Path(PathShape),
    /// Anchored text.
    Text(Text),
    /// Text following an arc (dial labels).
    ArcText(ArcText),
}

/// Group payload.
#[derive(Clone, Debug, Default)]
pub struct Group {
    /// Interaction role of this container.
    pub role: GroupRole,
    /// Sticky selection marker; at most one group in the rings layer
    /// carries it.
    pub selected: bool,
    /// Current transition; setting a new one replaces (cancels) the old.
    pub transition: Option<RingTransition>,
}

/// Interaction role of a group.
#[derive(Clone, Debug, Default)]
pub enum GroupRole {
    /// No interaction.
    #[default]
    Plain,
    /// Wrapper around one segment's arc stack; the pointer target.
    SegmentWrap(SegmentRef),
    /// Root group of a derived ring instance.
    RingInstance {
        /// Instance id the group belongs to.
        instance_id: String,
        /// Module id that built it.
        module_id: String,
    },
}

/// Logical identity of a rendered segment, carried on its wrapper group.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentRef {
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

/// Stroke style shared by arcs, circles and lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    /// Stroke paint.
    pub paint: Rgba,
    /// Stroke width.
    pub width: f64,
    /// Line cap.
    pub cap: ArcCap,
    /// Optional `(dash, gap)` pattern.
    pub dash: Option<(f64, f64)>,
}

impl Stroke {
    /// Solid butt-capped stroke.
    pub fn new(paint: Rgba, width: f64) -> Self {
        Self {
            paint,
            width,
            cap: ArcCap::Butt,
            dash: None,
        }
    }

    /// Same stroke with the given cap.
    pub fn with_cap(mut self, cap: ArcCap) -> Self {
        self.cap = cap;
        self
    }
}

/// Arc end-cap style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArcCap {
    /// Flat ends.
    #[default]
    Butt,
    /// Rounded ends; extends visually by half the stroke width.
    Round,
}

/// Circle primitive.
#[derive(Clone, Debug)]
pub struct Circle {
    /// Center x.
    pub cx: f64,
    /// Center y.
    pub cy: f64,
    /// Radius.
    pub r: f64,
    /// Optional stroke.
    pub stroke: Option<Stroke>,
}

/// Stroked arc primitive along the dial.
#[derive(Clone, Debug)]
pub struct ArcSeg {
    /// Center x.
    pub cx: f64,
    /// Center y.
    pub cy: f64,
    /// Arc radius.
    pub r: f64,
    /// Start angle, degrees (0° at 3 o'clock, y-down).
    pub start_deg: f64,
    /// End angle, degrees; drawn clockwise from `start_deg`.
    pub end_deg: f64,
    /// Stroke style.
    pub stroke: Stroke,
    /// Layer class within a segment's stack.
    pub class: ArcClass,
    /// Pointer target for dial interactions (month hit arcs).
    pub hit: Option<DialHit>,
}

impl ArcSeg {
    /// SVG path data for this arc, clockwise from start to end.
    pub fn to_svg_d(&self) -> String {
        arc_path_d(self.cx, self.cy, self.r, self.start_deg, self.end_deg)
    }
}

/// Role of an arc inside a segment's same-geometry stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArcClass {
    /// Invisible wide pointer target.
    Hit,
    /// Outline stroke behind the base.
    Outline,
    /// White base stroke.
    Base,
    /// Reference-chart match tint.
    Match,
    /// Gate-colored fill stroke.
    Fill,
    /// Non-interactive dial/decoration arc.
    Plain,
}

/// Pointer target carried by overlay hit arcs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialHit {
    /// Month hit arc, `0..=11`.
    Month(u32),
}

/// Line primitive; never a pointer target.
#[derive(Clone, Debug)]
pub struct Line {
    /// Start point.
    pub from: Point,
    /// End point.
    pub to: Point,
    /// Stroke style.
    pub stroke: Stroke,
}

/// Filled dot primitive.
#[derive(Clone, Debug)]
pub struct Dot {
    /// Center point.
    pub center: Point,
    /// Radius.
    pub r: f64,
    /// Fill paint.
    pub fill: Rgba,
}

/// Filled free-form path primitive.
#[derive(Clone, Debug)]
pub struct PathShape {
    /// Path geometry.
    pub path: BezPath,
    /// Fill paint.
    pub fill: Rgba,
}

/// Anchored text primitive (centered on its position).
#[derive(Clone, Debug)]
pub struct Text {
    /// Anchor position.
    pub pos: Point,
    /// Text content.
    pub content: String,
    /// Font size.
    pub size: f64,
    /// Fill paint.
    pub fill: Rgba,
    /// Bold weight flag (gate labels are bold).
    pub bold: bool,
    /// Dedupe key for label layers; one label per key per rebuild.
    pub label_key: Option<String>,
}

/// Text following an arc path (dial labels).
#[derive(Clone, Debug)]
pub struct ArcText {
    /// Center x.
    pub cx: f64,
    /// Center y.
    pub cy: f64,
    /// Label arc radius.
    pub r: f64,
    /// Angular midpoint of the label, degrees.
    pub center_deg: f64,
    /// Angular span of the label arc, degrees.
    pub span_deg: f64,
    /// Text content.
    pub content: String,
    /// Font size.
    pub size: f64,
    /// Fill paint.
    pub fill: Rgba,
    /// Letter spacing.
    pub letter_spacing: f64,
}

impl Scene {
    /// Empty scene with a root group.
    pub fn new() -> Self {
        let mut scene = Self {
            slots: Vec::new(),
            free: Vec::new(),
        };
        scene.alloc(Node::new(NodeKind::Group(Group::default())).named("root"));
        scene
    }

    /// Root group id.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Borrow a node; `None` for freed or unknown ids.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0 as usize).and_then(|s| s.as_ref())
    }

    /// Mutably borrow a node.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0 as usize).and_then(|s| s.as_mut())
    }

    /// Append a node under `parent` and return its id.
    pub fn append(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.alloc(node);
        if let Some(n) = self.node_mut(id) {
            n.parent = Some(parent);
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        id
    }

    /// Append an anonymous group under `parent`.
    pub fn group(&mut self, parent: NodeId) -> NodeId {
        self.append(parent, Node::new(NodeKind::Group(Group::default())))
    }

    /// Find a direct child of `parent` by name.
    pub fn child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.node(parent)?
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).and_then(|n| n.name.as_deref()) == Some(name))
    }

    /// Find an existing named child group or create it.
    pub fn ensure_group(&mut self, parent: NodeId, name: &str) -> NodeId {
        if let Some(id) = self.child_by_name(parent, name) {
            return id;
        }
        self.append(parent, Node::new(NodeKind::Group(Group::default())).named(name))
    }

    /// Children of a node, in draw order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Remove all children of `id`, freeing their subtrees.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = match self.node_mut(id) {
            Some(n) => std::mem::take(&mut n.children),
            None => return,
        };
        for child in children {
            self.free_subtree(child);
        }
    }

    /// Remove a node and its subtree, detaching it from its parent.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root() {
            return;
        }
        if let Some(parent) = self.node(id).and_then(|n| n.parent)
            && let Some(p) = self.node_mut(parent)
        {
            p.children.retain(|&c| c != id);
        }
        self.free_subtree(id);
    }

    /// Depth-first preorder walk of a subtree (including `id`).
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if self.node(cur).is_none() {
                continue;
            }
            out.push(cur);
            for &c in self.children(cur).iter().rev() {
                stack.push(c);
            }
        }
        out
    }

    /// Set the display flag of a node.
    pub fn set_display(&mut self, id: NodeId, display: bool) {
        if let Some(n) = self.node_mut(id) {
            n.display = display;
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(idx) = self.free.pop() {
            self.slots[idx as usize] = Some(node);
            NodeId(idx)
        } else {
            self.slots.push(Some(node));
            NodeId((self.slots.len() - 1) as u32)
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = match self.node_mut(id) {
            Some(n) => std::mem::take(&mut n.children),
            None => return,
        };
        for child in children {
            self.free_subtree(child);
        }
        self.slots[id.0 as usize] = None;
        self.free.push(id.0);
    }
}

/// SVG path data for a clockwise arc of radius `r` from `start_deg` to
/// `end_deg` around `(cx, cy)`.
pub fn arc_path_d(cx: f64, cy: f64, r: f64, start_deg: f64, end_deg: f64) -> String {
    let delta = (end_deg - start_deg).rem_euclid(360.0);
    let large_arc = if delta > 180.0 { 1 } else { 0 };
    let sweep = 1; // clockwise

    let start = crate::foundation::core::polar_to_xy(cx, cy, r, start_deg);
    let end = crate::foundation::core::polar_to_xy(cx, cy, r, end_deg);

    format!(
        "M {} {} A {} {} 0 {} {} {} {}",
        start.x, start.y, r, r, large_arc, sweep, end.x, end.y
    )
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
