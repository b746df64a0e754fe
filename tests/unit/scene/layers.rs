use super::*;

#[test]
fn init_creates_four_layers_bottom_to_top() {
    let mut scene = Scene::new();
    let layers = MandalaLayers::init(&mut scene);

    let order = scene.children(scene.root()).to_vec();
    assert_eq!(
        order,
        vec![layers.underlay, layers.rings, layers.overlay, layers.labels]
    );
}

#[test]
fn init_is_idempotent() {
    let mut scene = Scene::new();
    let a = MandalaLayers::init(&mut scene);
    let b = MandalaLayers::init(&mut scene);
    assert_eq!(a.rings, b.rings);
    assert_eq!(scene.children(scene.root()).len(), 4);
}
