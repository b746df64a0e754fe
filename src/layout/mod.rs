//! Radial packing: primary ring band and derived-ring lanes.

pub(crate) mod knobs;
pub(crate) mod rings;
pub(crate) mod tracks;
