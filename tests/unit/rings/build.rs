use super::*;

use chrono::DateTime;

use crate::layout::knobs::RingLayoutKnobs;
use crate::layout::rings::apply_ring_layout;
use crate::scene::node::Scene;

const DAY: i64 = 86_400_000;

fn seg(start_ms: i64, end_ms: i64, gate: Gate) -> Segment {
    Segment {
        start: DateTime::from_timestamp_millis(start_ms).unwrap(),
        end: DateTime::from_timestamp_millis(end_ms).unwrap(),
        gate,
    }
}

struct Fixture {
    scene: Scene,
    layers: MandalaLayers,
    canvas: SceneCanvas,
    range: TimeRange,
}

fn fixture(range: TimeRange, ids: &[&str]) -> Fixture {
    let mut scene = Scene::new();
    let layers = MandalaLayers::init(&mut scene);
    let canvas = SceneCanvas::default();
    let ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
    apply_ring_layout(&mut scene, &layers, &canvas, &ids, &RingLayoutKnobs::default());
    Fixture {
        scene,
        layers,
        canvas,
        range,
    }
}

fn year_range() -> TimeRange {
    TimeRange::calendar(0, 365 * DAY).unwrap()
}

fn fill_arcs(scene: &Scene, group: NodeId) -> Vec<ArcSeg> {
    let mut out = Vec::new();
    for id in scene.descendants(group) {
        if let Some(NodeKind::Arc(arc)) = scene.node(id).map(|n| &n.kind)
            && arc.class == ArcClass::Fill
        {
            out.push(arc.clone());
        }
    }
    out
}

#[test]
fn two_adjacent_segments_render_two_arcs() {
    let mut fx = fixture(year_range(), &["Sun"]);
    let segments = vec![seg(0, 180 * DAY, 38), seg(180 * DAY, 365 * DAY, 54)];

    let built = build_segmented_ring(
        &mut fx.scene,
        &fx.layers,
        &fx.canvas,
        "Sun",
        &segments,
        &fx.range,
        &ArcStyle::default(),
        &OverlayInputs::default(),
    )
    .unwrap();

    assert_eq!(built.arc_count, 2);
    assert_eq!(fill_arcs(&fx.scene, built.group).len(), 2);
}

#[test]
fn empty_segment_list_skips_the_ring() {
    let mut fx = fixture(year_range(), &["Sun"]);
    let built = build_segmented_ring(
        &mut fx.scene,
        &fx.layers,
        &fx.canvas,
        "Sun",
        &[],
        &fx.range,
        &ArcStyle::default(),
        &OverlayInputs::default(),
    );
    assert!(built.is_none());
}

#[test]
fn missing_guide_skips_the_ring() {
    let mut fx = fixture(year_range(), &["Sun"]);
    let built = build_segmented_ring(
        &mut fx.scene,
        &fx.layers,
        &fx.canvas,
        "Pluto",
        &[seg(0, DAY, 1)],
        &fx.range,
        &ArcStyle::default(),
        &OverlayInputs::default(),
    );
    assert!(built.is_none());
}

#[test]
fn segments_outside_the_window_are_dropped_silently() {
    let mut fx = fixture(TimeRange::calendar(100 * DAY, 200 * DAY).unwrap(), &["Sun"]);
    let segments = vec![seg(0, 50 * DAY, 1), seg(120 * DAY, 160 * DAY, 2)];

    let built = build_segmented_ring(
        &mut fx.scene,
        &fx.layers,
        &fx.canvas,
        "Sun",
        &segments,
        &fx.range,
        &ArcStyle::default(),
        &OverlayInputs::default(),
    )
    .unwrap();
    assert_eq!(built.arc_count, 1);
}

#[test]
fn padding_never_inverts_an_interval() {
    // A sliver of a segment: the pad is capped at a fraction of the span, so
    // the arc survives with end > start.
    let mut fx = fixture(year_range(), &["Moon"]);
    let segments = vec![seg(0, DAY / 2, 13), seg(DAY / 2, 365 * DAY, 14)];

    let built = build_segmented_ring(
        &mut fx.scene,
        &fx.layers,
        &fx.canvas,
        "Moon",
        &segments,
        &fx.range,
        &ArcStyle::default(),
        &OverlayInputs::default(),
    )
    .unwrap();

    let arcs = fill_arcs(&fx.scene, built.group);
    assert_eq!(arcs.len(), 2);
    for arc in arcs {
        assert!(arc.end_deg > arc.start_deg);
    }
}

#[test]
fn anchored_segment_crossing_the_seam_splits_in_two() {
    // Anchor near the window start puts the seam inside the window: the
    // [500, 700) segment straddles it and must come out as two arcs.
    let range = TimeRange::new(0, 1000, TimeView::Tracker, Some(100)).unwrap();
    let mut fx = fixture(range, &["Sun"]);

    let built = build_segmented_ring(
        &mut fx.scene,
        &fx.layers,
        &fx.canvas,
        "Sun",
        &[seg(500, 700, 38)],
        &fx.range,
        &ArcStyle::default(),
        &OverlayInputs::default(),
    )
    .unwrap();

    assert_eq!(built.arc_count, 2);
    let arcs = fill_arcs(&fx.scene, built.group);
    // First piece runs out to the seam, the second restarts at -90.
    assert_eq!(arcs[0].end_deg, 270.0);
    assert_eq!(arcs[1].start_deg, -90.0);
    for arc in &arcs {
        assert!(arc.end_deg > arc.start_deg);
    }
}

#[test]
fn round_caps_trim_and_drop_too_small_segments() {
    let style = ArcStyle {
        cap: ArcCap::Round,
        ..ArcStyle::default()
    };

    let mut fx = fixture(year_range(), &["Sun"]);
    // A half-day segment spans ~0.49 degrees, well under the round-cap trim
    // at this radius; the big one survives.
    let segments = vec![seg(0, DAY / 2, 1), seg(DAY / 2, 365 * DAY, 2)];

    let built = build_segmented_ring(
        &mut fx.scene,
        &fx.layers,
        &fx.canvas,
        "Sun",
        &segments,
        &fx.range,
        &style,
        &OverlayInputs::default(),
    )
    .unwrap();
    assert_eq!(built.arc_count, 1);
}

#[test]
fn long_segments_get_one_label_each() {
    let mut fx = fixture(year_range(), &["Sun"]);
    let segments = vec![seg(0, 100 * DAY, 38), seg(100 * DAY, 365 * DAY, 54)];

    build_segmented_ring(
        &mut fx.scene,
        &fx.layers,
        &fx.canvas,
        "Sun",
        &segments,
        &fx.range,
        &ArcStyle::default(),
        &OverlayInputs::default(),
    )
    .unwrap();

    assert_eq!(fx.scene.children(fx.layers.labels).len(), 2);

    // Rebuilding the same ring does not duplicate labels within a pass...
    build_segmented_ring(
        &mut fx.scene,
        &fx.layers,
        &fx.canvas,
        "Sun",
        &segments,
        &fx.range,
        &ArcStyle::default(),
        &OverlayInputs::default(),
    )
    .unwrap();
    assert_eq!(fx.scene.children(fx.layers.labels).len(), 2);
}

#[test]
fn short_segments_get_no_label() {
    let mut fx = fixture(year_range(), &["Moon"]);
    let segments = vec![seg(0, 3 * DAY, 13), seg(3 * DAY, 365 * DAY, 14)];

    build_segmented_ring(
        &mut fx.scene,
        &fx.layers,
        &fx.canvas,
        "Moon",
        &segments,
        &fx.range,
        &ArcStyle::default(),
        &OverlayInputs::default(),
    )
    .unwrap();

    // Only the long second segment is labeled.
    assert_eq!(fx.scene.children(fx.layers.labels).len(), 1);
}

#[test]
fn match_layer_appears_for_reference_gates() {
    let mut fx = fixture(year_range(), &["Sun"]);
    let segments = vec![seg(0, 180 * DAY, 37), seg(180 * DAY, 365 * DAY, 5)];

    let mut overlay = OverlayInputs::default();
    // 40 partners 37 across the channel table.
    overlay.reference_gates.insert(40);

    let built = build_segmented_ring(
        &mut fx.scene,
        &fx.layers,
        &fx.canvas,
        "Sun",
        &segments,
        &fx.range,
        &ArcStyle::default(),
        &overlay,
    )
    .unwrap();

    let mut match_arcs = 0;
    for id in fx.scene.descendants(built.group) {
        if let Some(NodeKind::Arc(arc)) = fx.scene.node(id).map(|n| &n.kind)
            && arc.class == ArcClass::Match
        {
            match_arcs += 1;
        }
    }
    // Gate 37 completes 37-40; gate 5 matches nothing.
    assert_eq!(match_arcs, 1);
}

#[test]
fn every_stack_gets_a_wider_hit_stroke() {
    let mut fx = fixture(year_range(), &["Sun"]);
    let style = ArcStyle::default();
    let built = build_segmented_ring(
        &mut fx.scene,
        &fx.layers,
        &fx.canvas,
        "Sun",
        &[seg(0, 365 * DAY, 38)],
        &fx.range,
        &style,
        &OverlayInputs::default(),
    )
    .unwrap();

    for id in fx.scene.descendants(built.group) {
        if let Some(NodeKind::Arc(arc)) = fx.scene.node(id).map(|n| &n.kind)
            && arc.class == ArcClass::Hit
        {
            let fill = fill_arcs(&fx.scene, built.group);
            assert!(arc.stroke.width > fill[0].stroke.width);
        }
    }
}
