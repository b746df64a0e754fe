use crate::payload::model::{RangePayload, Segment};

// Tolerance for parsing/rounding drift at segment seams.
const TOL_MS: i64 = 5;

/// Check one body's segment invariants against the window boundaries.
///
/// Returns human-readable findings; empty when the track is well-formed.
/// Invariants checked: non-empty list, first start and last end match the
/// window within tolerance, positive durations, and gap/overlap-free seams
/// between adjacent segments.
pub fn check_body_segments(
    body: &str,
    segments: &[Segment],
    range_start_ms: i64,
    range_end_ms: i64,
) -> Vec<String> {
    let mut findings = Vec::new();

    if segments.is_empty() {
        findings.push(format!("[{body}] empty segments array"));
        return findings;
    }

    let first_start = segments[0].start_ms();
    let last_end = segments[segments.len() - 1].end_ms();

    if (first_start - range_start_ms).abs() > TOL_MS {
        findings.push(format!(
            "[{body}] first start {first_start} != range start {range_start_ms}"
        ));
    }
    if (last_end - range_end_ms).abs() > TOL_MS {
        findings.push(format!(
            "[{body}] last end {last_end} != range end {range_end_ms}"
        ));
    }

    for (i, seg) in segments.iter().enumerate() {
        if seg.end_ms() <= seg.start_ms() {
            findings.push(format!("[{body}] non-positive duration at index {i}"));
        }

        if let Some(next) = segments.get(i + 1) {
            let seam = seg.end_ms() - next.start_ms();
            if seam.abs() > TOL_MS {
                findings.push(format!(
                    "[{body}] seam gap/overlap of {seam}ms between index {i} and {}",
                    i + 1
                ));
            }
        }
    }

    findings
}

/// Run the invariant checks over every body in a payload and log findings.
///
/// Warnings only; the render proceeds with the data as given. Skipped
/// entirely outside debug builds.
pub fn warn_payload_invariants(payload: &RangePayload) {
    if !cfg!(debug_assertions) {
        return;
    }

    let start_ms = payload.range_start_utc.timestamp_millis();
    let end_ms = payload.range_end_utc.timestamp_millis();

    for (body, track) in &payload.transits {
        for finding in check_body_segments(body, &track.segments, start_ms, end_ms) {
            tracing::warn!(target: "mandala::payload", "{finding}");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/payload/validate.rs"]
mod tests;
