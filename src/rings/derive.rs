use std::collections::BTreeMap;

use crate::domain::Gate;
use crate::payload::model::RangePayload;
use crate::rings::intervals::Interval;

/// Raw (unmerged) intervals per gate, across every body in a payload.
pub type GateSpanIndex = BTreeMap<Gate, Vec<Interval>>;

/// Index a payload's segments by gate.
///
/// Computed once per data fetch; ring modules merge or intersect the raw
/// lists per their own semantics. Segments with non-positive duration are
/// skipped.
pub fn derive_gate_spans(payload: &RangePayload) -> GateSpanIndex {
    let mut out = GateSpanIndex::new();

    for track in payload.transits.values() {
        for seg in &track.segments {
            let (start_ms, end_ms) = (seg.start_ms(), seg.end_ms());
            if end_ms <= start_ms {
                continue;
            }
            out.entry(seg.gate)
                .or_default()
                .push(Interval::new(start_ms, end_ms));
        }
    }

    out
}

#[cfg(test)]
#[path = "../../tests/unit/rings/derive.rs"]
mod tests;
