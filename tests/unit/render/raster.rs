use super::*;
use crate::foundation::core::Side;
use crate::material::composite::Lighting;
use crate::session::controls::Camera;

fn quad() -> Mesh {
    let mut m = Mesh {
        positions: vec![
            Vec3::new(-0.5, -0.5, 0.0),
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(-0.5, 0.5, 0.0),
        ],
        normals: Vec::new(),
        indices: vec![[0, 1, 2], [0, 2, 3]],
    };
    m.compute_normals();
    m
}

fn draw(material: &CompositeMaterial, model: Mat4, target: &mut FrameRGBA) -> RasterStats {
    let camera = Camera {
        aspect: 1.0,
        ..Camera::default()
    };
    let mesh = quad();
    let call = DrawCall {
        mesh: &mesh,
        model,
        view_projection: camera.view_projection(),
        eye: camera.position,
        material,
        ambient: Rgb::WHITE,
    };
    Rasterizer::new().draw(target, &call).unwrap()
}

#[test]
fn opaque_quad_covers_the_center_only() {
    let material = CompositeMaterial::new(Rgb::new(1.0, 0.5, 0.0), Lighting::Basic);
    let mut frame = FrameRGBA::filled(32, 32, [0, 0, 0, 255]);
    let stats = draw(&material, Mat4::IDENTITY, &mut frame);
    assert_eq!(stats.triangles, 2);
    assert!(stats.fragments > 0);
    assert_eq!(frame.pixel(16, 16), [255, 128, 0, 255]);
    assert_eq!(frame.pixel(0, 0), [0, 0, 0, 255]);
}

#[test]
fn transparent_material_blends_over_the_clear_color() {
    let mut material = CompositeMaterial::new(Rgb::WHITE, Lighting::Basic);
    material.transparent = true;
    material.alpha = 0.5;
    let mut frame = FrameRGBA::filled(16, 16, [0, 0, 0, 255]);
    draw(&material, Mat4::IDENTITY, &mut frame);
    let [r, g, b, a] = frame.pixel(8, 8);
    assert_eq!(a, 255);
    assert!((127..=128).contains(&r));
    assert_eq!(r, g);
    assert_eq!(g, b);
}

#[test]
fn zero_alpha_leaves_the_frame_untouched() {
    let mut material = CompositeMaterial::new(Rgb::WHITE, Lighting::Basic);
    material.transparent = true;
    material.alpha = 0.0;
    let mut frame = FrameRGBA::filled(16, 16, [10, 20, 30, 255]);
    draw(&material, Mat4::IDENTITY, &mut frame);
    assert_eq!(frame.pixel(8, 8), [10, 20, 30, 255]);
}

#[test]
fn back_faces_follow_the_side_setting() {
    let flipped = Mat4::from_rotation_y(std::f32::consts::PI);

    let mut front_only = CompositeMaterial::new(Rgb::WHITE, Lighting::Basic);
    front_only.side = Side::Front;
    let mut frame = FrameRGBA::new(16, 16);
    let stats = draw(&front_only, flipped, &mut frame);
    assert_eq!(stats.fragments, 0);

    let double = CompositeMaterial::new(Rgb::WHITE, Lighting::Basic);
    let mut frame = FrameRGBA::new(16, 16);
    let stats = draw(&double, flipped, &mut frame);
    assert!(stats.fragments > 0);
}

#[test]
fn geometry_behind_the_camera_is_dropped() {
    let material = CompositeMaterial::new(Rgb::WHITE, Lighting::Basic);
    let mut frame = FrameRGBA::new(8, 8);
    let stats = draw(&material, Mat4::from_translation(Vec3::new(0.0, 0.0, 10.0)), &mut frame);
    assert_eq!(stats.fragments, 0);
    assert!(frame.data.iter().all(|&b| b == 0));
}
