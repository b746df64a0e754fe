use crate::scene::node::{NodeId, Scene};

/// Handles to the four named, order-significant drawing surfaces.
///
/// Composited bottom to top: underlay, rings, overlay, labels. A component
/// may only write into its assigned layer; z-order and selective clearing
/// depend on that discipline.
#[derive(Clone, Copy, Debug)]
pub struct MandalaLayers {
    /// Dials and other content behind the rings.
    pub underlay: NodeId,
    /// Ring guides, segment arcs, derived ring instances.
    pub rings: NodeId,
    /// Now marker and other content above the rings.
    pub overlay: NodeId,
    /// Text labels, always on top.
    pub labels: NodeId,
}

impl MandalaLayers {
    /// Create the four layer groups under the scene root.
    pub fn init(scene: &mut Scene) -> Self {
        let root = scene.root();
        Self {
            underlay: scene.ensure_group(root, "Layer-Underlays"),
            rings: scene.ensure_group(root, "Layer-Rings"),
            overlay: scene.ensure_group(root, "Layer-Overlays"),
            labels: scene.ensure_group(root, "Layer-Labels"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/layers.rs"]
mod tests;
