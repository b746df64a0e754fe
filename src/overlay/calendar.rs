use chrono::NaiveDate;

use crate::foundation::color::Rgba;
use crate::foundation::core::{SceneCanvas, polar_to_xy};
use crate::layout::rings::guide_geometry;
use crate::scene::layers::MandalaLayers;
use crate::scene::node::{
    ArcClass, ArcSeg, ArcText, DialHit, Line, Node, NodeKind, Scene, Stroke,
};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Dial scope: a full year of months, or one month of days.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialMode {
    /// Year-scoped: month dial only.
    Year,
    /// Month-scoped: day dial inside, month dial pushed outward.
    Month,
}

/// Options for the month dial.
#[derive(Clone, Copy, Debug)]
pub struct MonthDialOptions {
    /// Dial scope.
    pub mode: DialMode,
    /// Currently selected month (`0..=11`), highlighted in month mode.
    pub selected_month: Option<u32>,
    /// Emit clickable hit arcs for month navigation.
    pub clickable: bool,
}

impl Default for MonthDialOptions {
    fn default() -> Self {
        Self {
            mode: DialMode::Year,
            selected_month: None,
            clickable: true,
        }
    }
}

/// UTC midnight of the first day of `month0` (0-based) in `year`, in ms.
///
/// `month0 == 12` rolls over to January of the next year.
pub fn month_start_ms(year: i32, month0: u32) -> Option<i64> {
    let (y, m) = if month0 >= 12 {
        (year + 1, month0 - 12)
    } else {
        (year, month0)
    };
    let date = NaiveDate::from_ymd_opt(y, m + 1, 1)?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

/// Outer edge of the outermost active ring, read from its geometry guide.
pub fn outer_edge_of(scene: &Scene, layers: &MandalaLayers, active_ids: &[String]) -> f64 {
    let Some(first) = active_ids.first() else {
        return 0.0;
    };
    match guide_geometry(scene, layers, first) {
        Some(g) => g.mid_radius + g.stroke_width / 2.0,
        None => 0.0,
    }
}

/// Redraw the month dial into the underlay layer.
///
/// For each month: a boundary tick at the month's start angle and a curved
/// label at mid-month. The visual label arc and the clickable hit arc are
/// independent paths of different radius and width, so hit-testing does not
/// depend on glyph metrics. The selected month renders larger, wider-spaced
/// and brighter.
pub fn update_month_dial(
    scene: &mut Scene,
    layers: &MandalaLayers,
    canvas: &SceneCanvas,
    year: i32,
    outer_edge: f64,
    show: bool,
    opts: &MonthDialOptions,
) {
    let group = scene.ensure_group(layers.underlay, "CalendarOverlay");
    scene.set_display(group, show);
    if !show {
        return;
    }
    scene.clear_children(group);

    let mut line_inner = outer_edge - 26.0;
    let mut line_outer = outer_edge + 16.0;
    let mut label_r = outer_edge + 34.0;

    // Month mode pushes the month wheel outward to make room for days.
    if opts.mode == DialMode::Month {
        let bump = 64.0;
        line_inner += bump;
        line_outer += bump;
        label_r += bump;
    }

    let Some(year_start) = month_start_ms(year, 0) else {
        return;
    };
    let Some(year_end) = month_start_ms(year, 12) else {
        return;
    };
    let year_span = (year_end - year_start) as f64;

    for m in 0..12u32 {
        let Some(t0) = month_start_ms(year, m) else {
            continue;
        };
        let Some(t1) = month_start_ms(year, m + 1) else {
            continue;
        };

        let frac = (t0 - year_start) as f64 / year_span;
        let mid_frac = ((t0 + t1) as f64 / 2.0 - year_start as f64) / year_span;
        let ang = frac * 360.0 - 90.0;
        let mid_ang = mid_frac * 360.0 - 90.0;

        scene.append(
            group,
            Node::new(NodeKind::Line(Line {
                from: polar_to_xy(canvas.cx, canvas.cy, line_inner, ang),
                to: polar_to_xy(canvas.cx, canvas.cy, line_outer, ang),
                stroke: Stroke::new(Rgba::white(0.22), 2.0),
            })),
        );

        let is_active = opts.mode == DialMode::Month && opts.selected_month == Some(m);

        let base_font = (label_r / 30.0).round().clamp(22.0, 28.0);
        let font_size = if is_active {
            (base_font * 1.35).round()
        } else {
            base_font
        };
        let arc_span_deg = if is_active { 34.0 } else { 20.0 };

        if opts.clickable {
            // Hit arc rides slightly outside the label radius and scales its
            // width with the font so the target stays centered on the glyphs.
            let hit_r = label_r + font_size * 0.4;
            let hit_w = (font_size * 1.45).round().max(18.0);
            scene.append(
                group,
                Node::new(NodeKind::Arc(ArcSeg {
                    cx: canvas.cx,
                    cy: canvas.cy,
                    r: hit_r,
                    start_deg: mid_ang - arc_span_deg / 2.0,
                    end_deg: mid_ang + arc_span_deg / 2.0,
                    stroke: Stroke::new(Rgba::hit(), hit_w),
                    class: ArcClass::Plain,
                    hit: Some(DialHit::Month(m)),
                })),
            );
        }

        scene.append(
            group,
            Node::new(NodeKind::ArcText(ArcText {
                cx: canvas.cx,
                cy: canvas.cy,
                r: label_r,
                center_deg: mid_ang,
                span_deg: arc_span_deg,
                content: MONTH_NAMES[m as usize].to_string(),
                size: font_size,
                fill: if is_active {
                    Rgba::white(0.92)
                } else {
                    Rgba::white(0.65)
                },
                letter_spacing: if is_active { 4.5 } else { 3.0 },
            })),
        );
    }
}

/// Redraw the day dial into the underlay layer.
///
/// Same technique as the month dial at day granularity, positioned radially
/// between the ring stack and the (bumped) month dial.
pub fn update_day_dial(
    scene: &mut Scene,
    layers: &MandalaLayers,
    canvas: &SceneCanvas,
    year: i32,
    month0: u32,
    outer_edge: f64,
    show: bool,
) {
    let group = scene.ensure_group(layers.underlay, "DayOverlay");
    scene.set_display(group, show);
    if !show {
        return;
    }
    scene.clear_children(group);

    let wheel_r = outer_edge + 34.0;
    let tick_inner = wheel_r - 10.0;
    let tick_outer = wheel_r + 10.0;
    let label_r = wheel_r + 18.0;

    let Some(t_start) = month_start_ms(year, month0) else {
        return;
    };
    let Some(t_end) = month_start_ms(year, month0 + 1) else {
        return;
    };
    let span = (t_end - t_start) as f64;
    let days_in_month = ((t_end - t_start) / 86_400_000) as u32;

    for d in 0..days_in_month {
        let t0 = t_start + i64::from(d) * 86_400_000;
        let t1 = t0 + 86_400_000;

        let frac = (t0 - t_start) as f64 / span;
        let mid_frac = ((t0 + t1) as f64 / 2.0 - t_start as f64) / span;
        let ang = frac * 360.0 - 90.0;
        let mid_ang = mid_frac * 360.0 - 90.0;

        scene.append(
            group,
            Node::new(NodeKind::Line(Line {
                from: polar_to_xy(canvas.cx, canvas.cy, tick_inner, ang),
                to: polar_to_xy(canvas.cx, canvas.cy, tick_outer, ang),
                stroke: Stroke::new(Rgba::white(0.18), 1.0),
            })),
        );

        scene.append(
            group,
            Node::new(NodeKind::ArcText(ArcText {
                cx: canvas.cx,
                cy: canvas.cy,
                r: label_r,
                center_deg: mid_ang,
                span_deg: 10.0,
                content: (d + 1).to_string(),
                size: 14.0,
                fill: Rgba::white(0.55),
                letter_spacing: 1.0,
            })),
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/calendar.rs"]
mod tests;
