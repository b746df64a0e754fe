use crate::foundation::error::{MandalaError, MandalaResult};

pub use kurbo::{BezPath, Point, Vec2};

/// Temporal framing of the active view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeView {
    /// Fixed window; the reference angle is always the range start.
    Calendar,
    /// Moving window; an optional anchor pins "now" to the top of the dial.
    Tracker,
}

/// Half-open time window `[start_ms, end_ms)` with its view framing.
///
/// All timestamps are milliseconds since the Unix epoch, UTC.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeRange {
    /// Inclusive window start.
    pub start_ms: i64,
    /// Exclusive window end; always greater than `start_ms`.
    pub end_ms: i64,
    /// Temporal framing.
    pub view: TimeView,
    /// Tracker anchor; the timestamp that maps to the top of the dial.
    /// Absent in calendar view.
    pub anchor_ms: Option<i64>,
}

impl TimeRange {
    /// Create a validated range with `end_ms > start_ms`.
    pub fn new(
        start_ms: i64,
        end_ms: i64,
        view: TimeView,
        anchor_ms: Option<i64>,
    ) -> MandalaResult<Self> {
        if end_ms <= start_ms {
            return Err(MandalaError::validation("TimeRange end must be > start"));
        }
        if view == TimeView::Calendar && anchor_ms.is_some() {
            return Err(MandalaError::validation(
                "TimeRange anchor is only meaningful in tracker view",
            ));
        }
        Ok(Self {
            start_ms,
            end_ms,
            view,
            anchor_ms,
        })
    }

    /// Calendar range covering `[start_ms, end_ms)`.
    pub fn calendar(start_ms: i64, end_ms: i64) -> MandalaResult<Self> {
        Self::new(start_ms, end_ms, TimeView::Calendar, None)
    }

    /// Total window length in milliseconds.
    pub fn total_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    /// Return `true` when `t_ms` lies inside `[start_ms, end_ms)`.
    pub fn contains(&self, t_ms: i64) -> bool {
        self.start_ms <= t_ms && t_ms < self.end_ms
    }

    /// Clip `[a, b]` to this window; `None` when nothing remains.
    pub fn clip(&self, a_ms: i64, b_ms: i64) -> Option<(i64, i64)> {
        let lo = a_ms.max(self.start_ms);
        let hi = b_ms.min(self.end_ms);
        if hi <= lo { None } else { Some((lo, hi)) }
    }
}

/// Output canvas for the dial, in abstract user units.
///
/// The engine assumes exactly one polar system centered at `(cx, cy)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneCanvas {
    /// Canvas width.
    pub width: f64,
    /// Canvas height.
    pub height: f64,
    /// Polar center x.
    pub cx: f64,
    /// Polar center y.
    pub cy: f64,
}

impl SceneCanvas {
    /// Polar center as a point.
    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }
}

impl Default for SceneCanvas {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 1200.0,
            cx: 600.0,
            cy: 600.0,
        }
    }
}

/// Point on a circle of radius `r` around `(cx, cy)` at `angle_deg`
/// (0° at 3 o'clock, y-down sweep).
pub fn polar_to_xy(cx: f64, cy: f64, r: f64, angle_deg: f64) -> Point {
    let a = angle_deg.to_radians();
    Point::new(cx + r * a.cos(), cy + r * a.sin())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
