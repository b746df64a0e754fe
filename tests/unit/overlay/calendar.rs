use super::*;
use crate::layout::knobs::RingLayoutKnobs;
use crate::layout::rings::apply_ring_layout;
use crate::scene::node::{NodeId, Scene};

fn fixture() -> (Scene, MandalaLayers, SceneCanvas, f64) {
    let mut scene = Scene::new();
    let layers = MandalaLayers::init(&mut scene);
    let canvas = SceneCanvas::default();
    let ids = vec!["Sun".to_string()];
    apply_ring_layout(&mut scene, &layers, &canvas, &ids, &RingLayoutKnobs::default());
    let edge = outer_edge_of(&scene, &layers, &ids);
    (scene, layers, canvas, edge)
}

fn count_kind(scene: &Scene, root: NodeId, pred: impl Fn(&NodeKind) -> bool) -> usize {
    scene
        .descendants(root)
        .iter()
        .filter(|&&id| scene.node(id).map(|n| pred(&n.kind)).unwrap_or(false))
        .count()
}

#[test]
fn month_boundaries_land_on_exact_year_fractions() {
    // January 1st sits at 12 o'clock; a 365-day year puts Jul 1 just past
    // half the circle.
    let jan = month_start_ms(2025, 0).unwrap();
    let jul = month_start_ms(2025, 6).unwrap();
    let next_jan = month_start_ms(2025, 12).unwrap();
    assert!(jan < jul && jul < next_jan);
    assert_eq!(next_jan, month_start_ms(2026, 0).unwrap());
}

#[test]
fn month_dial_draws_twelve_ticks_and_labels() {
    let (mut scene, layers, canvas, edge) = fixture();
    update_month_dial(
        &mut scene,
        &layers,
        &canvas,
        2025,
        edge,
        true,
        &MonthDialOptions::default(),
    );

    let group = scene.child_by_name(layers.underlay, "CalendarOverlay").unwrap();
    assert_eq!(count_kind(&scene, group, |k| matches!(k, NodeKind::Line(_))), 12);
    assert_eq!(count_kind(&scene, group, |k| matches!(k, NodeKind::ArcText(_))), 12);
    // One independent hit arc per month.
    assert_eq!(count_kind(&scene, group, |k| matches!(k, NodeKind::Arc(_))), 12);
}

#[test]
fn hidden_dial_keeps_its_group_but_draws_nothing_new() {
    let (mut scene, layers, canvas, edge) = fixture();
    update_month_dial(
        &mut scene,
        &layers,
        &canvas,
        2025,
        edge,
        true,
        &MonthDialOptions::default(),
    );
    update_month_dial(
        &mut scene,
        &layers,
        &canvas,
        2025,
        edge,
        false,
        &MonthDialOptions::default(),
    );

    let group = scene.child_by_name(layers.underlay, "CalendarOverlay").unwrap();
    assert!(!scene.node(group).unwrap().display);
}

#[test]
fn hit_arcs_ride_a_different_radius_than_labels() {
    let (mut scene, layers, canvas, edge) = fixture();
    update_month_dial(
        &mut scene,
        &layers,
        &canvas,
        2025,
        edge,
        true,
        &MonthDialOptions::default(),
    );

    let group = scene.child_by_name(layers.underlay, "CalendarOverlay").unwrap();
    for id in scene.descendants(group) {
        let Some(node) = scene.node(id) else { continue };
        if let NodeKind::Arc(arc) = &node.kind {
            assert!(arc.hit.is_some());
            assert!(arc.r > edge + 34.0, "hit arc should sit outside the label radius");
        }
    }
}

#[test]
fn selected_month_renders_bigger_and_brighter() {
    let (mut scene, layers, canvas, edge) = fixture();
    update_month_dial(
        &mut scene,
        &layers,
        &canvas,
        2025,
        edge,
        true,
        &MonthDialOptions {
            mode: DialMode::Month,
            selected_month: Some(3),
            clickable: true,
        },
    );

    let group = scene.child_by_name(layers.underlay, "CalendarOverlay").unwrap();
    let mut sizes = Vec::new();
    for id in scene.descendants(group) {
        if let Some(NodeKind::ArcText(t)) = scene.node(id).map(|n| &n.kind) {
            sizes.push((t.content.clone(), t.size, t.span_deg));
        }
    }
    let apr = sizes.iter().find(|(c, _, _)| c == "Apr").unwrap();
    let may = sizes.iter().find(|(c, _, _)| c == "May").unwrap();
    assert!(apr.1 > may.1);
    assert_eq!(apr.2, 34.0);
    assert_eq!(may.2, 20.0);
}

#[test]
fn day_dial_counts_the_days_of_the_month() {
    let (mut scene, layers, canvas, edge) = fixture();
    update_day_dial(&mut scene, &layers, &canvas, 2025, 1, edge, true);

    let group = scene.child_by_name(layers.underlay, "DayOverlay").unwrap();
    // February 2025: 28 ticks, 28 labels.
    assert_eq!(count_kind(&scene, group, |k| matches!(k, NodeKind::Line(_))), 28);
    assert_eq!(count_kind(&scene, group, |k| matches!(k, NodeKind::ArcText(_))), 28);
}

#[test]
fn leap_february_gets_twenty_nine_days() {
    let (mut scene, layers, canvas, edge) = fixture();
    update_day_dial(&mut scene, &layers, &canvas, 2024, 1, edge, true);
    let group = scene.child_by_name(layers.underlay, "DayOverlay").unwrap();
    assert_eq!(count_kind(&scene, group, |k| matches!(k, NodeKind::Line(_))), 29);
}
