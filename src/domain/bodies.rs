/// Canonical ring order, outermost first.
///
/// Bodies absent from a payload simply do not get a ring; the order of the
/// ones present is fixed by this table.
pub const BODY_ORDER: [&str; 13] = [
    "Moon",
    "Sun",
    "Earth",
    "Mercury",
    "Venus",
    "Mars",
    "Jupiter",
    "Saturn",
    "Uranus",
    "Neptune",
    "Pluto",
    "NorthNode",
    "SouthNode",
];

/// Position of `body` in [`BODY_ORDER`], `None` for unknown bodies.
pub fn body_rank(body: &str) -> Option<usize> {
    BODY_ORDER.iter().position(|b| *b == body)
}
