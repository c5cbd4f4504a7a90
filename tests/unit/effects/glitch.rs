use super::*;
use crate::foundation::core::{Rgb, Transform3D};
use crate::material::composite::CompositeMaterial;
use crate::render::mesh::Mesh;
use crate::session::controls::Camera;
use crate::stage::Logo;

fn scene() -> Scene {
    Scene {
        logo: Logo {
            mesh: Mesh::default(),
            transform: Transform3D::default(),
            material: CompositeMaterial::default(),
        },
        camera: Camera::default(),
        ambient: Rgb::WHITE,
        clear: Rgb::BLACK,
    }
}

fn gradient(w: u32, h: u32) -> FrameRGBA {
    let mut f = FrameRGBA::new(w, h);
    for y in 0..h {
        for x in 0..w {
            f.put(x, y, [(x * 255 / w) as u8, (y * 255 / h) as u8, 64, 255]);
        }
    }
    f
}

fn run(pass: &mut GlitchPass, input: &FrameRGBA) -> FrameRGBA {
    let mut out = FrameRGBA::new(input.width, input.height);
    pass.render(input, &mut out, &scene()).unwrap();
    out
}

#[test]
fn dt_size_outside_its_range_is_rejected() {
    assert!(GlitchPass::new(0, 1).is_err());
    let err = GlitchPass::new(70_000, 1).unwrap_err();
    assert!(matches!(err, StrataError::Validation(_)), "{err}");
    assert!(GlitchPass::new(MAX_DT_SIZE + 1, 1).is_err());
    assert!(GlitchPass::new(1, 1).is_ok());
}

#[test]
fn first_frame_is_wild_and_redraws_the_interval() {
    let mut pass = GlitchPass::new(8, 0x5eed).unwrap();
    let input = gradient(16, 16);
    run(&mut pass, &input);
    assert_eq!(pass.last_state(), Some(GlitchState::Wild));
    assert_eq!(pass.frame_counter(), 1);
    assert!((120..=240).contains(&pass.trigger_interval()));
    assert_eq!(pass.uniforms().scalar("byp"), 0.0);
    let amount = pass.uniforms().scalar("amount");
    assert!((0.0..=1.0 / 30.0).contains(&amount));
}

#[test]
fn interval_moves_from_weak_to_bypass() {
    let mut pass = GlitchPass::new(8, 7).unwrap();
    let input = gradient(4, 4);
    run(&mut pass, &input);
    let interval = pass.trigger_interval();
    let weak_frames = interval.div_ceil(5);

    for frame in 1..interval {
        let out = run(&mut pass, &input);
        let expected = if frame < weak_frames {
            GlitchState::Weak
        } else {
            GlitchState::Bypass
        };
        assert_eq!(pass.last_state(), Some(expected), "frame {frame}");
        if expected == GlitchState::Bypass {
            assert_eq!(out, input);
            assert_eq!(pass.uniforms().scalar("byp"), 1.0);
        } else {
            assert!(pass.uniforms().scalar("amount") <= 1.0 / 90.0);
        }
    }

    run(&mut pass, &input);
    assert_eq!(pass.last_state(), Some(GlitchState::Wild));
}

#[test]
fn go_wild_glitches_every_frame() {
    let mut pass = GlitchPass::new(8, 3).unwrap();
    pass.uniforms_mut().set("go_wild", true.into());
    let input = gradient(4, 4);
    for _ in 0..50 {
        run(&mut pass, &input);
        assert_eq!(pass.last_state(), Some(GlitchState::Wild));
        assert_eq!(pass.frame_counter(), 1);
    }
}

#[test]
fn same_seed_renders_the_same_frames() {
    let input = gradient(12, 9);
    let mut a = GlitchPass::new(16, 42).unwrap();
    let mut b = GlitchPass::new(16, 42).unwrap();
    for _ in 0..5 {
        assert_eq!(run(&mut a, &input), run(&mut b, &input));
    }
}

#[test]
fn zero_band_width_still_splits_channels() {
    let mut pass = GlitchPass::new(8, 11).unwrap();
    pass.uniforms_mut().set("col_s", 0.0.into());
    let input = gradient(32, 32);
    let out = run(&mut pass, &input);
    assert_eq!(out.width, 32);
    assert_eq!(out.data.len(), input.data.len());
    assert!(pass.uniforms().get("col_s").is_some_and(|v| v.as_f64() == 0.0));
}
