//! Integration tests for volume-driven blending.
//!
//! Walks a consumer through overlapping, prioritized grading volumes and
//! checks LUT targets, captured parameters and exposure along the way.

use std::sync::Arc;

use cinegrade_color::{LutImage, SharedLut};
use cinegrade_core::{
    BlendSelector, Color, ComponentSnapshot, EffectSnapshot, FieldTable, FieldValue,
};
use cinegrade_effect::{BlendConfig, BlendController, CpuCompositor, GradingVolume};

// ── Helpers ────────────────────────────────────────────────────

fn constant_lut(color: Color) -> SharedLut {
    Arc::new(LutImage::from_pixels(64, 8, vec![color; 512]).unwrap())
}

fn identity_lut() -> SharedLut {
    Arc::new(LutImage::identity(8).unwrap())
}

fn consumer() -> FieldTable {
    let mut table = FieldTable::new();
    table.insert("Grain", "amount", FieldValue::Float(0.1));
    table.insert("Grain", "animated", FieldValue::Bool(false));
    table
}

fn selector() -> BlendSelector {
    let mut sel = BlendSelector::new();
    sel.set_field_blend("Grain", "amount", true);
    sel.set_field_blend("Grain", "animated", true);
    sel
}

fn grain_effects(amount: f32, animated: bool) -> EffectSnapshot {
    let mut comp = ComponentSnapshot::new("Grain");
    comp.set("amount", FieldValue::Float(amount));
    comp.set("animated", FieldValue::Bool(animated));
    let mut snap = EffectSnapshot::new();
    snap.insert(comp);
    snap
}

fn controller(world_lut: Option<SharedLut>, table: &FieldTable) -> BlendController {
    BlendController::new(
        BlendConfig {
            world_lut,
            world_exposure: 1.0,
            exit_blend_time: 1.0,
            selector: selector(),
        },
        Box::new(CpuCompositor),
        table,
    )
    .unwrap()
}

fn amount(table: &FieldTable) -> f32 {
    match table.get_field("Grain", "amount") {
        Some(FieldValue::Float(v)) => v,
        other => panic!("unexpected amount {:?}", other),
    }
}

// ── Scenarios ──────────────────────────────────────────────────

#[test]
fn walkthrough_two_volumes_with_priorities() {
    crate::init_tracing();

    let mut table = consumer();
    let world = identity_lut();
    let mut ctl = controller(Some(world.clone()), &table);

    let sewer_lut = constant_lut(Color::rgb(0.0, 1.0, 0.0));
    let sewer = Arc::new(
        GradingVolume::new("sewer")
            .with_lut(sewer_lut.clone())
            .with_enter_blend_time(1.0)
            .with_exposure(0.5)
            .with_effects(grain_effects(0.9, true)),
    );
    let boss_lut = constant_lut(Color::rgb(1.0, 0.0, 0.0));
    let boss = Arc::new(
        GradingVolume::new("boss")
            .with_lut(boss_lut.clone())
            .with_enter_blend_time(0.5)
            .with_priority(10)
            .with_effects(grain_effects(0.5, false)),
    );

    // Enter the sewer and blend halfway in.
    ctl.enter_volume(sewer.clone());
    ctl.update(0.0, &mut table);
    ctl.update(0.5, &mut table);
    assert!(ctl.is_volume_blending());
    assert!((amount(&table) - 0.5).abs() < 1e-6);
    assert!((ctl.exposure() - 0.75).abs() < 1e-6);

    // The boss arena overlaps at higher priority: the running blend is
    // frozen into the mid-blend cache and a fresh blend heads for red.
    ctl.enter_volume(boss.clone());
    ctl.update(0.0, &mut table);
    assert!(ctl.mid_blend_active());
    assert_eq!(ctl.current_volume(), Some(boss.id()));

    ctl.update(0.5, &mut table);
    assert!(!ctl.is_volume_blending());
    assert!(!ctl.mid_blend_active());
    assert!(Arc::ptr_eq(ctl.current_lut().unwrap(), &boss_lut));
    assert!((amount(&table) - 0.5).abs() < 1e-6);
    assert!((ctl.exposure() - 1.0).abs() < 1e-6);

    // Leaving the boss arena hands dominance back to the sewer.
    ctl.exit_volume(boss.id());
    ctl.update(0.0, &mut table);
    assert!(ctl.is_volume_blending());
    assert_eq!(ctl.current_volume(), Some(sewer.id()));
    ctl.update(1.0, &mut table);
    assert!(Arc::ptr_eq(ctl.current_lut().unwrap(), &sewer_lut));
    assert!((amount(&table) - 0.9).abs() < 1e-6);
    assert!((ctl.exposure() - 0.5).abs() < 1e-6);

    // Leaving the sewer restores the world baseline.
    ctl.exit_volume(sewer.id());
    ctl.update(0.0, &mut table);
    ctl.update(1.0, &mut table);
    assert!(!ctl.is_volume_blending());
    assert!(Arc::ptr_eq(ctl.current_lut().unwrap(), &world));
    assert!((amount(&table) - 0.1).abs() < 1e-6);
    assert!((ctl.exposure() - 1.0).abs() < 1e-6);
    assert_eq!(ctl.current_volume(), None);
}

#[test]
fn equal_priority_goes_to_most_recent_entry() {
    let mut table = consumer();
    let mut ctl = controller(None, &table);

    let first = Arc::new(
        GradingVolume::new("first")
            .with_lut(constant_lut(Color::rgb(1.0, 1.0, 0.0)))
            .with_enter_blend_time(0.1),
    );
    let second = Arc::new(
        GradingVolume::new("second")
            .with_lut(constant_lut(Color::rgb(0.0, 1.0, 1.0)))
            .with_enter_blend_time(0.1),
    );

    ctl.enter_volume(first.clone());
    ctl.update(0.2, &mut table);
    ctl.update(0.2, &mut table);
    assert_eq!(ctl.current_volume(), Some(first.id()));

    ctl.enter_volume(second.clone());
    ctl.update(0.2, &mut table);
    assert_eq!(ctl.current_volume(), Some(second.id()));

    // Exiting the tie-winner restores the earlier volume.
    ctl.exit_volume(second.id());
    ctl.update(0.2, &mut table);
    assert_eq!(ctl.current_volume(), Some(first.id()));
}

#[test]
fn reentering_previous_volume_reverses_without_cache() {
    let mut table = consumer();
    let world = identity_lut();
    let mut ctl = controller(Some(world), &table);

    let volume = Arc::new(
        GradingVolume::new("tunnel")
            .with_lut(constant_lut(Color::rgb(0.2, 0.2, 0.8)))
            .with_enter_blend_time(2.0)
            .with_effects(grain_effects(0.9, true)),
    );

    ctl.enter_volume(volume.clone());
    ctl.update(0.0, &mut table);
    ctl.update(1.0, &mut table);
    let halfway = amount(&table);

    ctl.exit_volume(volume.id());
    ctl.update(0.0, &mut table);
    assert!(!ctl.mid_blend_active(), "reversal must not open a cache");
    assert!((ctl.volume_blend_ratio() - 0.5).abs() < 1e-6);

    // Re-enter before the reversal finishes: reverses again.
    ctl.enter_volume(volume.clone());
    ctl.update(0.0, &mut table);
    assert!(!ctl.mid_blend_active());
    assert!(ctl.is_volume_blending());
    assert!((amount(&table) - halfway).abs() < 1e-3, "no visual jump");

    ctl.update(5.0, &mut table);
    assert!((amount(&table) - 0.9).abs() < 1e-6);
}
