use crate::domain::Gate;

/// Canonical channels as gate pairs.
///
/// Used for "transit gate plus reference gate completes a channel" matching
/// and for expanding a center ring into its channels.
pub const CHANNELS: [(Gate, Gate); 35] = [
    (1, 8),
    (2, 14),
    (3, 60),
    (4, 63),
    (5, 15),
    (6, 59),
    (7, 31),
    (9, 52),
    (10, 20),
    (10, 34),
    (10, 57),
    (11, 56),
    (12, 22),
    (13, 33),
    (16, 48),
    (17, 62),
    (18, 58),
    (19, 49),
    (20, 34),
    (20, 57),
    (21, 45),
    (23, 43),
    (24, 61),
    (25, 51),
    (26, 44),
    (27, 50),
    (28, 38),
    (29, 46),
    (30, 41),
    (32, 54),
    (35, 36),
    (37, 40),
    (39, 55),
    (42, 53),
    (47, 64),
];

/// All partner gates of `gate` across the channel table.
pub fn partners_for_gate(gate: Gate) -> impl Iterator<Item = Gate> {
    CHANNELS.iter().filter_map(move |&(a, b)| {
        if a == gate {
            Some(b)
        } else if b == gate {
            Some(a)
        } else {
            None
        }
    })
}

/// Stable key for a channel, low gate first (`"37-40"`).
pub fn channel_key(a: Gate, b: Gate) -> String {
    let lo = a.min(b);
    let hi = a.max(b);
    format!("{lo}-{hi}")
}

/// Channels fully contained in `gates`.
pub fn defined_channels_from_gates<I>(gates: I) -> Vec<(Gate, Gate)>
where
    I: IntoIterator<Item = Gate>,
{
    let set: std::collections::BTreeSet<Gate> = gates.into_iter().collect();
    CHANNELS
        .iter()
        .copied()
        .filter(|&(a, b)| set.contains(&a) && set.contains(&b))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/domain/channels.rs"]
mod tests;
