use super::*;
use crate::foundation::core::TimeView;

const YEAR_JSON: &str = r#"{
  "year": 2025,
  "range_start_utc": "2025-01-01T00:00:00Z",
  "range_end_utc": "2026-01-01T00:00:00Z",
  "view": "calendar",
  "span": "year",
  "transits": {
    "Sun": { "segments": [
      { "start": "2025-01-01T00:00:00Z", "end": "2025-07-01T00:00:00Z", "gate": 38 },
      { "start": "2025-07-01T00:00:00Z", "end": "2026-01-01T00:00:00Z", "gate": 54 }
    ] }
  }
}"#;

#[test]
fn wire_json_round_trips() {
    let payload = RangePayload::from_json(YEAR_JSON).unwrap();
    assert_eq!(payload.year, 2025);
    assert_eq!(payload.view, TimeView::Calendar);
    assert_eq!(payload.span, Span::Year);
    assert_eq!(payload.transits["Sun"].segments.len(), 2);

    let back = serde_json::to_string(&payload).unwrap();
    let again = RangePayload::from_json(&back).unwrap();
    assert_eq!(again.transits["Sun"].segments[1].gate, 54);
}

#[test]
fn view_and_span_default_when_absent() {
    let json = r#"{
      "year": 2025,
      "range_start_utc": "2025-01-01T00:00:00Z",
      "range_end_utc": "2026-01-01T00:00:00Z",
      "transits": {}
    }"#;
    let payload = RangePayload::from_json(json).unwrap();
    assert_eq!(payload.view, TimeView::Calendar);
    assert_eq!(payload.span, Span::Year);
    assert!(payload.anchor_utc.is_none());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = RangePayload::from_json("{").unwrap_err();
    assert!(matches!(err, crate::foundation::error::MandalaError::Serde(_)));
}

#[test]
fn time_range_carries_tracker_anchor() {
    let json = r#"{
      "year": 2025,
      "range_start_utc": "2025-03-01T00:00:00Z",
      "range_end_utc": "2025-03-29T00:00:00Z",
      "view": "tracker",
      "span": "week",
      "anchor_utc": "2025-03-15T00:00:00Z",
      "transits": {}
    }"#;
    let payload = RangePayload::from_json(json).unwrap();
    let range = payload.time_range().unwrap();
    assert_eq!(range.view, TimeView::Tracker);
    assert_eq!(
        range.anchor_ms,
        Some(payload.anchor_utc.unwrap().timestamp_millis())
    );
}

#[test]
fn composite_key_round_trips() {
    let payload = RangePayload::from_json(YEAR_JSON).unwrap();
    let seg = payload.transits["Sun"].segments[0];

    let key = seg.key("Sun");
    assert_eq!(key, "Sun:38:2025-01-01T00:00:00Z:2025-07-01T00:00:00Z");
    // Re-deriving from the same segment always matches.
    assert_eq!(seg.key("Sun"), key);
    // And distinct segments never collide.
    assert_ne!(payload.transits["Sun"].segments[1].key("Sun"), key);
}
