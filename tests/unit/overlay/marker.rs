use super::*;
use crate::foundation::core::TimeView;
use crate::scene::layers::MandalaLayers;
use crate::scene::node::{NodeKind, Scene};

fn fixture() -> (Scene, MandalaLayers, SceneCanvas) {
    let mut scene = Scene::new();
    let layers = MandalaLayers::init(&mut scene);
    (scene, layers, SceneCanvas::default())
}

#[test]
fn refresh_policy_rate_limits() {
    let mut refresh = MarkerRefresh::default();
    assert!(refresh.due(0));
    assert!(!refresh.due(14_999));
    assert!(refresh.due(15_000));

    refresh.invalidate();
    assert!(refresh.due(15_001));
}

#[test]
fn marker_draws_needle_arrow_and_dot() {
    let (mut scene, layers, canvas) = fixture();
    render_now_marker(&mut scene, &layers, &canvas, -90.0, 300.0, 460.0);

    let group = scene.child_by_name(layers.overlay, "TodayMarker").unwrap();
    let kinds: Vec<_> = scene
        .children(group)
        .iter()
        .map(|&id| match scene.node(id).unwrap().kind {
            NodeKind::Line(_) => "line",
            NodeKind::Path(_) => "path",
            NodeKind::Dot(_) => "dot",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["line", "path", "dot"]);
}

#[test]
fn redraw_replaces_the_previous_marker() {
    let (mut scene, layers, canvas) = fixture();
    render_now_marker(&mut scene, &layers, &canvas, -90.0, 300.0, 460.0);
    render_now_marker(&mut scene, &layers, &canvas, 45.0, 300.0, 460.0);

    let group = scene.child_by_name(layers.overlay, "TodayMarker").unwrap();
    assert_eq!(scene.children(group).len(), 3);
}

#[test]
fn update_is_a_noop_without_an_outer_edge() {
    let (mut scene, layers, canvas) = fixture();
    let range = TimeRange::calendar(0, 1000).unwrap();
    update_now_marker(&mut scene, &layers, &canvas, &range, 500, 0.0);
    assert!(scene.child_by_name(layers.overlay, "TodayMarker").is_none());
}

#[test]
fn anchored_marker_stays_pinned_while_time_moves() {
    let (mut scene, layers, canvas) = fixture();
    let range = TimeRange::new(0, 1000, TimeView::Tracker, Some(500)).unwrap();

    // Marker angle for "now" == anchor is always 90.
    update_now_marker(&mut scene, &layers, &canvas, &range, 500, 440.0);
    let group = scene.child_by_name(layers.overlay, "TodayMarker").unwrap();
    let Some(NodeKind::Line(line)) = scene.children(group).first().and_then(|&id| {
        scene.node(id).map(|n| n.kind.clone())
    }) else {
        panic!("needle missing");
    };
    // 90° points straight down in y-down coordinates: x stays at center.
    assert!((line.from.x - canvas.cx).abs() < 1e-9);
    assert!(line.to.y > line.from.y);
}
