//! Integration tests for the frame pipeline: resolving the blended LUT
//! and grading pixels through it.

use std::sync::Arc;

use cinegrade_color::{LutImage, SharedLut, Tonemapper};
use cinegrade_core::{BlendSelector, Color, FieldTable};
use cinegrade_effect::{
    apply_grade, BlendConfig, BlendController, CpuCompositor, GradingVolume, RenderOptions,
};

// ── Helpers ────────────────────────────────────────────────────

fn constant_lut(color: Color) -> SharedLut {
    Arc::new(LutImage::from_pixels(64, 8, vec![color; 512]).unwrap())
}

fn controller(world_lut: Option<SharedLut>) -> (BlendController, FieldTable) {
    let table = FieldTable::new();
    let ctl = BlendController::new(
        BlendConfig {
            world_lut,
            world_exposure: 1.0,
            exit_blend_time: 1.0,
            selector: BlendSelector::new(),
        },
        Box::new(CpuCompositor),
        &table,
    )
    .unwrap();
    (ctl, table)
}

// ── Scenarios ──────────────────────────────────────────────────

#[test]
fn explicit_blend_resolves_mixed_lut() {
    crate::init_tracing();

    let warm = constant_lut(Color::rgb(1.0, 0.0, 0.0));
    let cool = constant_lut(Color::rgb(0.0, 0.0, 1.0));
    let (mut ctl, mut table) = controller(Some(warm));

    ctl.blend_to(cool, 1.0, None);
    ctl.update(0.5, &mut table);
    assert!((ctl.lut_blend_ratio() - 0.5).abs() < 1e-6);

    let exposure = ctl.exposure();
    let resolved = ctl.resolve_lut();
    let mut pixels = vec![Color::rgb(0.3, 0.6, 0.9); 16];
    apply_grade(&mut pixels, resolved, &RenderOptions::default(), exposure);

    // Halfway between the all-red and all-blue grades.
    for px in &pixels {
        assert!((px.r - 0.5).abs() < 0.01);
        assert!(px.g.abs() < 0.01);
        assert!((px.b - 0.5).abs() < 0.01);
    }
}

#[test]
fn no_blend_resolves_committed_lut() {
    let warm = constant_lut(Color::rgb(1.0, 0.0, 0.0));
    let (mut ctl, mut table) = controller(Some(warm.clone()));
    ctl.update(0.1, &mut table);

    let resolved = ctl.resolve_lut();
    assert_eq!(resolved.pixels(), warm.pixels());
}

#[test]
fn no_world_lut_resolves_neutral() {
    let (mut ctl, mut table) = controller(None);
    ctl.update(0.1, &mut table);

    let resolved = ctl.resolve_lut();
    let out = resolved.sample([0.25, 0.5, 0.75]);
    assert!((out[0] - 0.25).abs() < 0.01);
    assert!((out[1] - 0.5).abs() < 0.01);
    assert!((out[2] - 0.75).abs() < 0.01);
}

#[test]
fn volume_exposure_feeds_hdr_grade() {
    let (mut ctl, mut table) = controller(None);
    let volume = Arc::new(
        GradingVolume::new("bright")
            .with_exposure(4.0)
            .with_enter_blend_time(1.0),
    );

    ctl.enter_volume(volume);
    ctl.update(0.0, &mut table);
    ctl.update(0.5, &mut table);
    // Halfway between world exposure 1.0 and volume exposure 4.0.
    assert!((ctl.exposure() - 2.5).abs() < 1e-6);

    let options = RenderOptions {
        hdr: true,
        tonemapper: Tonemapper::FilmicHable,
        ..Default::default()
    };
    let exposure = ctl.exposure();
    let resolved = ctl.resolve_lut();

    let mut graded = vec![Color::rgb(0.2, 0.2, 0.2)];
    let mut reference = graded.clone();
    apply_grade(&mut graded, resolved, &options, exposure);
    apply_grade(&mut reference, resolved, &options, 1.0);

    assert!(graded[0].r > reference[0].r, "higher exposure brightens");
    assert!(graded[0].r <= 1.0, "tonemapped output stays bounded");
}

#[test]
fn dual_blend_composites_both_stages() {
    // Volume blend toward green while an explicit blend heads for blue:
    // stage one mixes current->blue, stage two mixes that toward green.
    let warm = constant_lut(Color::rgb(1.0, 0.0, 0.0));
    let cool = constant_lut(Color::rgb(0.0, 0.0, 1.0));
    let green = constant_lut(Color::rgb(0.0, 1.0, 0.0));
    let (mut ctl, mut table) = controller(Some(warm));

    let volume = Arc::new(
        GradingVolume::new("jungle")
            .with_lut(green)
            .with_enter_blend_time(1.0),
    );
    ctl.enter_volume(volume);
    ctl.update(0.0, &mut table);
    ctl.blend_to(cool, 1.0, None);
    ctl.update(0.5, &mut table);

    let resolved = ctl.resolve_lut();
    let out = resolved.sample([0.5, 0.5, 0.5]);
    // Stage one: (0.5, 0, 0.5); stage two at ratio 0.5 toward green.
    assert!((out[0] - 0.25).abs() < 0.01);
    assert!((out[1] - 0.5).abs() < 0.01);
    assert!((out[2] - 0.25).abs() < 0.01);
}
