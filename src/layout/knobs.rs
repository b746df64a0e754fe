/// Presentation knobs governing how concentric rings pack into the band.
///
/// Purely presentational; carries no identity. Values are clamped by
/// [`RingLayoutKnobs::resolve`] before use.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RingLayoutKnobs {
    /// Midline the packed stack is centered on.
    pub center_r: f64,
    /// Total radial band available to the stack.
    pub band: f64,
    /// Gap between rings as a fraction of ring thickness.
    pub gap_ratio: f64,
    /// Minimum stroke thickness.
    pub stroke_min: f64,
    /// Maximum stroke thickness.
    pub stroke_max: f64,
    /// Keep toggled-off rings visible at their last geometry.
    pub show_inactive: bool,
}

impl Default for RingLayoutKnobs {
    fn default() -> Self {
        Self {
            center_r: 391.25,
            band: 120.0,
            gap_ratio: 0.35,
            stroke_min: 14.0,
            stroke_max: 44.0,
            show_inactive: false,
        }
    }
}

/// Named layout presets for quick tuning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPreset {
    /// Default spacing.
    #[default]
    Balanced,
    /// Tighter stack, thinner strokes.
    Compact,
    /// Wider stack, thicker strokes.
    Spacious,
}

impl RingLayoutKnobs {
    /// Knobs for a named preset.
    pub fn preset(preset: LayoutPreset) -> Self {
        match preset {
            LayoutPreset::Balanced => Self::default(),
            LayoutPreset::Compact => Self {
                center_r: 380.0,
                band: 104.0,
                stroke_min: 12.0,
                stroke_max: 40.0,
                ..Self::default()
            },
            LayoutPreset::Spacious => Self {
                center_r: 402.5,
                band: 136.0,
                stroke_max: 48.0,
                ..Self::default()
            },
        }
    }

    /// Clamp every knob into its safe range.
    ///
    /// Keeps the stack inside the canvas and the packing math well-defined
    /// (`stroke_min <= stroke_max`, non-negative gap ratio).
    pub fn resolve(self) -> Self {
        let stroke_min = self.stroke_min.clamp(1.0, 64.0);
        Self {
            center_r: self.center_r.clamp(260.0, 560.0),
            band: self.band.clamp(40.0, 240.0),
            gap_ratio: self.gap_ratio.clamp(0.0, 1.0),
            stroke_min,
            stroke_max: self.stroke_max.clamp(stroke_min, 64.0),
            show_inactive: self.show_inactive,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/knobs.rs"]
mod tests;
