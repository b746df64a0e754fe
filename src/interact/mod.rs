//! Pointer wiring: hover reporting, selection exclusivity, click routing.

pub(crate) mod controller;
