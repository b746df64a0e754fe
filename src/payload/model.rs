use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::Gate;
use crate::foundation::core::{TimeRange, TimeView};
use crate::foundation::error::{MandalaError, MandalaResult};

/// Time-range payload consumed from the upstream ephemeris collaborator.
///
/// The payload is a pure data model: deserialized from wire JSON, validated
/// (warnings only, see [`crate::check_body_segments`]) and then read by the
/// rebuild pass. The engine never repairs it.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RangePayload {
    /// Calendar year the payload was computed for.
    pub year: i32,
    /// Window start, UTC.
    pub range_start_utc: DateTime<Utc>,
    /// Window end, UTC.
    pub range_end_utc: DateTime<Utc>,
    /// Temporal framing; defaults to calendar.
    #[serde(default = "default_view")]
    pub view: TimeView,
    /// Window span granularity; defaults to a full year.
    #[serde(default)]
    pub span: Span,
    /// Tracker anchor, UTC; present only in tracker view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_utc: Option<DateTime<Utc>>,
    /// Per-body segment tracks keyed by body id.
    pub transits: BTreeMap<String, BodyTrack>,
}

fn default_view() -> TimeView {
    TimeView::Calendar
}

/// Window span granularity of a payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Span {
    /// Full calendar year.
    #[default]
    Year,
    /// One quarter.
    Quarter,
    /// One month.
    Month,
    /// One week.
    Week,
}

/// One body's ordered segment list for the payload window.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct BodyTrack {
    /// Segments sorted ascending by start; contiguous and gapless across the
    /// body's authoritative range (validated, never repaired).
    pub segments: Vec<Segment>,
}

/// Half-open interval during which a body occupies `gate`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    /// Segment start, UTC.
    pub start: DateTime<Utc>,
    /// Segment end, UTC; greater than `start`.
    pub end: DateTime<Utc>,
    /// Occupied gate.
    pub gate: Gate,
}

impl Segment {
    /// Start in ms since epoch.
    pub fn start_ms(&self) -> i64 {
        self.start.timestamp_millis()
    }

    /// End in ms since epoch.
    pub fn end_ms(&self) -> i64 {
        self.end.timestamp_millis()
    }

    /// Stable composite identity: `body:gate:start:end`.
    ///
    /// Correlates visual state with logical state across rebuilds; re-deriving
    /// the key from the same segment always matches.
    pub fn key(&self, body: &str) -> String {
        format!(
            "{body}:{}:{}:{}",
            self.gate,
            self.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.end.to_rfc3339_opts(SecondsFormat::Secs, true),
        )
    }
}

impl RangePayload {
    /// Deserialize a payload from wire JSON.
    pub fn from_json(json: &str) -> MandalaResult<Self> {
        serde_json::from_str(json).map_err(|e| MandalaError::serde(e.to_string()))
    }

    /// Derive the engine's [`TimeRange`] from the payload boundaries.
    pub fn time_range(&self) -> MandalaResult<TimeRange> {
        let anchor_ms = match self.view {
            TimeView::Tracker => self.anchor_utc.map(|a| a.timestamp_millis()),
            TimeView::Calendar => None,
        };
        TimeRange::new(
            self.range_start_utc.timestamp_millis(),
            self.range_end_utc.timestamp_millis(),
            self.view,
            anchor_ms,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/payload/model.rs"]
mod tests;
