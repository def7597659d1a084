//! The blend controller: LUT blend timers, volume transitions and
//! parameter interpolation.
//!
//! Two independent blends can be in flight at once: an explicit LUT blend
//! started through [`BlendController::blend_to`], and a volume blend
//! driven by occupancy changes. Each owns its own timer; the renderer
//! combines both ratios through [`BlendController::resolve_lut`].
//!
//! A volume transition that interrupts another volume blend freezes the
//! in-flight result into the mid-blend cache and restarts from there, so
//! the image never jumps. Returning to the previous volume mid-blend
//! instead reverses the running blend in place.

use std::sync::Arc;

use cinegrade_color::{LutImage, SharedLut, LUT_SIZE};
use cinegrade_core::{BlendSelector, ComponentAccess, EffectSnapshot};
use tracing::debug;

use crate::compositor::LutCompositor;
use crate::error::EffectError;
use crate::volume::{GradingVolume, VolumeId, VolumeRegistry};

/// Static configuration of a blend controller.
#[derive(Clone)]
pub struct BlendConfig {
    /// Baseline LUT applied outside any volume. `None` grades through the
    /// neutral LUT.
    pub world_lut: Option<SharedLut>,
    /// Baseline exposure outside any volume.
    pub world_exposure: f32,
    /// Blend duration when leaving the last occupied volume.
    pub exit_blend_time: f32,
    /// Which components and fields participate in blending.
    pub selector: BlendSelector,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            world_lut: None,
            world_exposure: 1.0,
            exit_blend_time: 1.0,
            selector: BlendSelector::new(),
        }
    }
}

/// Stable post-update view for the renderer: which LUTs to combine at
/// which ratios, and the resolved exposure.
#[derive(Debug, Clone)]
pub struct BlendOutput {
    pub lut: Option<SharedLut>,
    pub lut_blend_target: Option<SharedLut>,
    pub lut_blend_ratio: f32,
    pub volume_blend_target: Option<SharedLut>,
    pub volume_blend_ratio: f32,
    pub mid_blend_active: bool,
    pub exposure: f32,
}

/// The volume-transition and LUT-blend state machine.
pub struct BlendController {
    selector: BlendSelector,
    registry: VolumeRegistry,
    compositor: Box<dyn LutCompositor>,
    default_lut: SharedLut,

    // World baseline, captured at construction.
    world_lut: Option<SharedLut>,
    world_effects: EffectSnapshot,
    world_exposure: f32,
    exit_blend_time: f32,

    // Committed grading state.
    current_lut: Option<SharedLut>,
    current_effects: EffectSnapshot,
    current_exposure: f32,
    exposure: f32,

    // Explicit LUT blend.
    lut_blending: bool,
    lut_blend_target: Option<SharedLut>,
    lut_blend_duration: f32,
    lut_blend_elapsed: f32,
    lut_blend_ratio: f32,
    on_lut_blend_complete: Option<Box<dyn FnOnce()>>,

    // Volume blend.
    volume_blending: bool,
    volume_blend_target: Option<SharedLut>,
    volume_blend_duration: f32,
    volume_blend_elapsed: f32,
    volume_blend_ratio: f32,
    volume_ratio_adjust: f32,
    blend_effects: EffectSnapshot,
    blend_exposure: f32,

    // Blend caches, owned exclusively by the controller.
    mid_blend_lut: LutImage,
    mid_blend_active: bool,
    blend_cache: LutImage,
    resolve_cache: LutImage,

    current_volume: Option<VolumeId>,
}

impl BlendController {
    /// Build a controller and capture the consumer's current values as the
    /// world baseline snapshot.
    pub fn new(
        config: BlendConfig,
        compositor: Box<dyn LutCompositor>,
        consumer: &dyn ComponentAccess,
    ) -> Result<Self, EffectError> {
        let world_effects = EffectSnapshot::capture(consumer, &config.selector);
        let world_exposure = config.world_exposure.max(0.0);
        Ok(Self {
            selector: config.selector,
            registry: VolumeRegistry::new(),
            compositor,
            default_lut: Arc::new(LutImage::identity(LUT_SIZE)?),

            world_lut: config.world_lut.clone(),
            world_effects: world_effects.clone(),
            world_exposure,
            exit_blend_time: config.exit_blend_time,

            current_lut: config.world_lut,
            current_effects: world_effects.clone(),
            current_exposure: world_exposure,
            exposure: world_exposure,

            lut_blending: false,
            lut_blend_target: None,
            lut_blend_duration: 0.0,
            lut_blend_elapsed: 0.0,
            lut_blend_ratio: 0.0,
            on_lut_blend_complete: None,

            volume_blending: false,
            volume_blend_target: None,
            volume_blend_duration: 0.0,
            volume_blend_elapsed: 0.0,
            volume_blend_ratio: 0.0,
            volume_ratio_adjust: 0.0,
            blend_effects: world_effects,
            blend_exposure: world_exposure,

            mid_blend_lut: LutImage::new(LUT_SIZE)?,
            mid_blend_active: false,
            blend_cache: LutImage::new(LUT_SIZE)?,
            resolve_cache: LutImage::new(LUT_SIZE)?,

            current_volume: None,
        })
    }

    /// Start an explicit blend toward `target` over `seconds`.
    ///
    /// Independent of volume blending. A blend already in flight is
    /// replaced and its completion callback is dropped unfired.
    pub fn blend_to(
        &mut self,
        target: SharedLut,
        seconds: f32,
        on_complete: Option<Box<dyn FnOnce()>>,
    ) {
        self.lut_blend_target = Some(target);
        self.lut_blend_duration = seconds;
        self.lut_blend_elapsed = 0.0;
        self.lut_blend_ratio = 0.0;
        self.on_lut_blend_complete = on_complete;
        self.lut_blending = true;
    }

    /// Forwarded volume-occupancy events from the spatial system.
    pub fn enter_volume(&mut self, volume: Arc<GradingVolume>) {
        self.registry.enter(volume);
    }

    pub fn exit_volume(&mut self, id: VolumeId) {
        self.registry.exit(id);
    }

    /// Advance the state machine by `dt` seconds of wall time.
    ///
    /// Runs the per-tick sequence: advance both blend timers (completing
    /// at most once each), resolve the dominant volume and react to a
    /// change, then write interpolated parameters into the consumer.
    pub fn update(&mut self, dt: f32, consumer: &mut dyn ComponentAccess) {
        let dt = dt.max(0.0);

        // Explicit LUT blend timer.
        if self.lut_blending {
            self.lut_blend_elapsed += dt;
            self.lut_blend_ratio = blend_ratio(self.lut_blend_elapsed, self.lut_blend_duration);
            if self.lut_blend_ratio >= 1.0 {
                self.current_lut = self.lut_blend_target.take();
                self.lut_blend_ratio = 0.0;
                self.lut_blend_elapsed = 0.0;
                self.lut_blending = false;
                debug!("lut blend finished");
                if let Some(callback) = self.on_lut_blend_complete.take() {
                    callback();
                }
            }
        }

        // Volume blend timer.
        if self.volume_blending {
            self.volume_blend_elapsed += dt;
            self.volume_blend_ratio =
                blend_ratio(self.volume_blend_elapsed, self.volume_blend_duration);
            if self.volume_blend_ratio >= 1.0 {
                self.finish_volume_blend(consumer);
            }
        }

        // Dominant volume resolution; a change triggers a transition.
        let dominant = self.registry.dominant().cloned();
        let dominant_id = dominant.as_ref().map(|v| v.id());
        if dominant_id != self.current_volume {
            self.begin_transition(dominant.as_deref());
            self.current_volume = dominant_id;
        }

        // Interpolate captured parameters and exposure.
        if self.volume_blending {
            let t = self.adjusted_ratio();
            self.current_effects
                .blend_apply(consumer, &self.blend_effects, t);
            self.exposure = lerp(self.current_exposure, self.blend_exposure, t);
        }
    }

    /// Commit the volume blend target as the new grading state.
    fn finish_volume_blend(&mut self, consumer: &mut dyn ComponentAccess) {
        self.current_lut = self.volume_blend_target.take();
        self.volume_blend_ratio = 0.0;
        self.volume_blend_elapsed = 0.0;
        self.volume_blending = false;
        self.volume_ratio_adjust = 0.0;

        // Completion is exact: snap to the target, do not interpolate.
        self.current_effects = self.blend_effects.clone();
        self.current_effects.apply_to(consumer);
        self.current_exposure = self.blend_exposure;
        self.exposure = self.blend_exposure;

        self.mid_blend_active = false;
        debug!("volume blend finished");
    }

    /// React to a change of dominant volume.
    fn begin_transition(&mut self, dominant: Option<&GradingVolume>) {
        let new_target = match dominant {
            Some(volume) => volume.lut().cloned(),
            None => self.world_lut.clone(),
        };
        let new_duration = dominant.map_or(self.exit_blend_time, |v| v.enter_blend_time());

        if self.volume_blending
            && !self.mid_blend_active
            && lut_eq(&new_target, &self.current_lut)
        {
            // Returning to where the running blend started: reverse it in
            // place instead of opening a mid-blend cache.
            let t = self.adjusted_ratio();
            self.current_effects = self.current_effects.interpolate(&self.blend_effects, t);
            self.current_exposure = lerp(self.current_exposure, self.blend_exposure, t);

            std::mem::swap(&mut self.current_lut, &mut self.volume_blend_target);
            let remaining = if self.volume_blend_duration > 0.0 {
                (self.volume_blend_duration - self.volume_blend_elapsed)
                    / self.volume_blend_duration
            } else {
                0.0
            };
            self.volume_blend_duration = new_duration;
            self.volume_blend_elapsed = new_duration * remaining;
            self.volume_ratio_adjust = 1.0 - self.volume_blend_ratio;
            self.volume_blend_ratio = 1.0 - self.volume_blend_ratio;
            debug!(
                volume = dominant.map(|v| v.name()).unwrap_or("<world>"),
                ratio = self.volume_blend_ratio,
                "volume blend reversed"
            );
        } else {
            if self.volume_blending {
                // Interrupted mid-flight toward an unrelated target: bake
                // the in-flight result and continue from the cache.
                let bake_target = self
                    .volume_blend_target
                    .clone()
                    .unwrap_or_else(|| Arc::clone(&self.default_lut));
                if self.mid_blend_active {
                    self.blend_cache.copy_from(&self.mid_blend_lut);
                    self.compositor.composite(
                        &self.blend_cache,
                        &bake_target,
                        self.volume_blend_ratio,
                        &mut self.mid_blend_lut,
                    );
                } else {
                    let source = self
                        .current_lut
                        .clone()
                        .unwrap_or_else(|| Arc::clone(&self.default_lut));
                    self.compositor.composite(
                        &source,
                        &bake_target,
                        self.volume_blend_ratio,
                        &mut self.mid_blend_lut,
                    );
                }

                let t = self.adjusted_ratio();
                self.current_effects = self.current_effects.interpolate(&self.blend_effects, t);
                self.current_exposure = lerp(self.current_exposure, self.blend_exposure, t);
                self.volume_ratio_adjust = 0.0;
                self.mid_blend_active = true;
                debug!("mid-blend cache baked");
            }

            self.volume_blend_target = new_target;
            self.volume_blend_duration = new_duration;
            self.volume_blend_elapsed = 0.0;
            self.volume_blend_ratio = 0.0;
            self.volume_blending = true;
            debug!(
                volume = dominant.map(|v| v.name()).unwrap_or("<world>"),
                duration = new_duration,
                "volume transition started"
            );
        }

        self.blend_effects = dominant
            .and_then(|v| v.effects().cloned())
            .unwrap_or_else(|| self.world_effects.clone());
        self.blend_exposure = dominant.map_or(self.world_exposure, |v| v.exposure());
    }

    /// Volume blend ratio renormalized over the portion started after the
    /// last interruption.
    fn adjusted_ratio(&self) -> f32 {
        let t = if self.volume_ratio_adjust < 1.0 {
            (self.volume_blend_ratio - self.volume_ratio_adjust)
                / (1.0 - self.volume_ratio_adjust)
        } else {
            1.0
        };
        t.clamp(0.0, 1.0)
    }

    /// Stable view of the blend state for the renderer. Call after
    /// [`update`](Self::update); the view does not change until the next
    /// tick.
    pub fn output(&self) -> BlendOutput {
        BlendOutput {
            lut: self.current_lut.clone(),
            lut_blend_target: self.lut_blend_target.clone(),
            lut_blend_ratio: self.lut_blend_ratio,
            volume_blend_target: self.volume_blend_target.clone(),
            volume_blend_ratio: self.volume_blend_ratio,
            mid_blend_active: self.mid_blend_active,
            exposure: self.exposure,
        }
    }

    /// Composite the final LUT to sample this frame.
    ///
    /// Stage one folds an active explicit blend into the blend cache;
    /// stage two folds an active volume blend on top, reading from the
    /// mid-blend cache when one is open.
    pub fn resolve_lut(&mut self) -> &LutImage {
        let base = self
            .current_lut
            .clone()
            .unwrap_or_else(|| Arc::clone(&self.default_lut));

        if self.lut_blending {
            let target = self
                .lut_blend_target
                .clone()
                .unwrap_or_else(|| Arc::clone(&self.default_lut));
            self.compositor
                .composite(&base, &target, self.lut_blend_ratio, &mut self.blend_cache);
        }

        if self.volume_blending {
            let target = self
                .volume_blend_target
                .clone()
                .unwrap_or_else(|| Arc::clone(&self.default_lut));
            if self.mid_blend_active {
                self.compositor.composite(
                    &self.mid_blend_lut,
                    &target,
                    self.volume_blend_ratio,
                    &mut self.resolve_cache,
                );
            } else if self.lut_blending {
                self.compositor.composite(
                    &self.blend_cache,
                    &target,
                    self.volume_blend_ratio,
                    &mut self.resolve_cache,
                );
            } else {
                self.compositor.composite(
                    &base,
                    &target,
                    self.volume_blend_ratio,
                    &mut self.resolve_cache,
                );
            }
            return &self.resolve_cache;
        }

        if self.lut_blending {
            return &self.blend_cache;
        }
        self.current_lut.as_deref().unwrap_or(&self.default_lut)
    }

    // Accessors.

    pub fn is_lut_blending(&self) -> bool {
        self.lut_blending
    }

    pub fn is_volume_blending(&self) -> bool {
        self.volume_blending
    }

    pub fn lut_blend_ratio(&self) -> f32 {
        self.lut_blend_ratio
    }

    pub fn volume_blend_ratio(&self) -> f32 {
        self.volume_blend_ratio
    }

    pub fn volume_blend_duration(&self) -> f32 {
        self.volume_blend_duration
    }

    pub fn mid_blend_active(&self) -> bool {
        self.mid_blend_active
    }

    pub fn exposure(&self) -> f32 {
        self.exposure
    }

    pub fn current_lut(&self) -> Option<&SharedLut> {
        self.current_lut.as_ref()
    }

    pub fn current_volume(&self) -> Option<VolumeId> {
        self.current_volume
    }

    pub fn selector(&self) -> &BlendSelector {
        &self.selector
    }

    pub fn registry(&self) -> &VolumeRegistry {
        &self.registry
    }
}

/// Elapsed time over duration, clamped to [0, 1]; non-positive durations
/// complete immediately.
fn blend_ratio(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        1.0
    } else {
        (elapsed / duration).clamp(0.0, 1.0)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Pointer identity over optional shared LUTs; two absent LUTs are equal.
fn lut_eq(a: &Option<SharedLut>, b: &Option<SharedLut>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
