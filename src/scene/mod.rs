//! Retained scene graph, layer handles and the SVG writer.

pub(crate) mod layers;
pub(crate) mod node;
pub(crate) mod svg;
