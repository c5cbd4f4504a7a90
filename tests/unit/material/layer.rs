use super::*;

fn close(a: Rgb, b: Rgb) -> bool {
    (a.r - b.r).abs() < 1e-6 && (a.g - b.g).abs() < 1e-6 && (a.b - b.b).abs() < 1e-6
}

#[test]
fn normal_blend_respects_opacity() {
    let (c, a) = blend(Rgb::WHITE, 1.0, Rgb::BLACK, 1.0, BlendMode::Normal, 0.25);
    assert!(close(c, Rgb::splat(0.75)));
    assert_eq!(a, 1.0);
}

#[test]
fn zero_opacity_is_a_noop() {
    let acc = Rgb::new(0.2, 0.4, 0.6);
    for mode in [BlendMode::Normal, BlendMode::Add, BlendMode::Multiply, BlendMode::Screen] {
        let (c, a) = blend(acc, 0.5, Rgb::WHITE, 1.0, mode, 0.0);
        assert!(close(c, acc));
        assert_eq!(a, 0.5);
    }
}

#[test]
fn switch_ignores_opacity() {
    let (c, _) = blend(Rgb::WHITE, 1.0, Rgb::BLACK, 0.5, BlendMode::Switch, 0.1);
    assert!(close(c, Rgb::BLACK));
}

#[test]
fn later_layers_land_on_top() {
    let red = Rgb::new(1.0, 0.0, 0.0);
    let blue = Rgb::new(0.0, 0.0, 1.0);
    let (c1, a1) = blend(Rgb::WHITE, 1.0, red, 1.0, BlendMode::Normal, 1.0);
    let (c1, _) = blend(c1, a1, blue, 1.0, BlendMode::Normal, 1.0);
    let (c2, a2) = blend(Rgb::WHITE, 1.0, blue, 1.0, BlendMode::Normal, 1.0);
    let (c2, _) = blend(c2, a2, red, 1.0, BlendMode::Normal, 1.0);
    assert!(close(c1, blue));
    assert!(close(c2, red));
}

#[test]
fn alpha_composites_over() {
    let (_, a) = blend(Rgb::BLACK, 0.0, Rgb::WHITE, 0.5, BlendMode::Normal, 1.0);
    assert_eq!(a, 0.5);
    let (_, a) = blend(Rgb::BLACK, 0.5, Rgb::WHITE, 0.5, BlendMode::Normal, 1.0);
    assert_eq!(a, 0.75);
}

#[test]
fn mode_functions() {
    let d = Rgb::splat(0.5);
    let s = Rgb::splat(0.25);
    assert!(close(BlendMode::Add.apply(d, s), Rgb::splat(0.75)));
    assert!(close(BlendMode::Multiply.apply(d, s), Rgb::splat(0.125)));
    assert!(close(BlendMode::Lighten.apply(d, s), d));
    assert!(close(BlendMode::Darken.apply(d, s), s));
    assert!(close(BlendMode::Divide.apply(d, Rgb::BLACK), d));
}

#[test]
fn props_builder_resolves_defaults() {
    let core = LayerCore::new("plain", &[], LayerProps::new()).unwrap();
    assert_eq!(core.name, "plain");
    assert_eq!(core.blend, BlendMode::Normal);
    assert_eq!(core.opacity, 1.0);

    let core = LayerCore::new(
        "plain",
        &[],
        LayerProps::new()
            .named("top")
            .blend(BlendMode::Add)
            .opacity(0.3),
    )
    .unwrap();
    assert_eq!(core.name, "top");
    assert_eq!(core.blend, BlendMode::Add);
    assert_eq!(core.opacity, 0.3);
}
