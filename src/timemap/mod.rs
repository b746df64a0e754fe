//! Pure time-to-angle mapping for the active view.

pub(crate) mod mapper;
