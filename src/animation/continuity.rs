use std::collections::BTreeMap;

use crate::animation::ease::Ease;

/// Transition descriptor attached to a ring group for the host to play.
///
/// Both kinds anchor scaling at the shared dial center so a ring appears to
/// settle into its new band rather than snapping.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RingTransition {
    /// What the transition does.
    pub kind: TransitionKind,
    /// Duration in milliseconds.
    pub duration_ms: u32,
    /// Easing curve.
    pub ease: Ease,
}

/// Kind of ring transition.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TransitionKind {
    /// Entrance for a ring id with no recorded radius: fade in while scaling
    /// up from `from_scale`.
    Enter {
        /// Initial scale.
        from_scale: f64,
        /// Initial opacity.
        from_opacity: f32,
    },
    /// Radius change for a known ring id: scale from `from_scale` to 1.
    Settle {
        /// `old_radius / new_radius`.
        from_scale: f64,
    },
}

impl RingTransition {
    fn enter() -> Self {
        Self {
            kind: TransitionKind::Enter {
                from_scale: 0.985,
                from_opacity: 0.0,
            },
            duration_ms: 420,
            ease: Ease::OutCubic,
        }
    }

    fn settle(from_scale: f64) -> Self {
        Self {
            kind: TransitionKind::Settle { from_scale },
            duration_ms: 520,
            ease: Ease::OutCubic,
        }
    }
}

/// Tracks each ring's previous mid-radius across rebuilds.
#[derive(Clone, Debug, Default)]
pub struct ContinuityManager {
    prev_radius: BTreeMap<String, f64>,
}

impl ContinuityManager {
    /// Empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `new_radius` for `ring_id` and return the transition to play.
    ///
    /// First sighting of an id yields an entrance; a radius change yields a
    /// settle from `old/new` scale. Non-finite or non-positive radii yield
    /// nothing and leave the record untouched.
    pub fn transition_for(&mut self, ring_id: &str, new_radius: f64) -> Option<RingTransition> {
        if !new_radius.is_finite() || new_radius <= 0.0 {
            return None;
        }
        match self.prev_radius.insert(ring_id.to_string(), new_radius) {
            None => Some(RingTransition::enter()),
            Some(old) => Some(RingTransition::settle(old / new_radius)),
        }
    }

    /// Last recorded mid-radius for a ring id.
    pub fn last_radius(&self, ring_id: &str) -> Option<f64> {
        self.prev_radius.get(ring_id).copied()
    }

    /// Drop the record for a ring id (its next sighting re-enters).
    pub fn forget(&mut self, ring_id: &str) {
        self.prev_radius.remove(ring_id);
    }

    /// Drop every record.
    pub fn reset(&mut self) {
        self.prev_radius.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/continuity.rs"]
mod tests;
