//! # Stereo Display System
//!
//! This module provides the per-frame coordinator for stereo rendering.
//! It decides how a scene camera is rendered for a head-mounted display
//! (one combined pass or several simple passes), owns the frame's pass
//! list, and drives mirror compositing to conventional 2D surfaces.
//!
//! ## Architecture
//!
//! The system is a facade over three seams supplied by the host renderer:
//! - **DisplayProvider**: enumerates connected display devices
//! - **TargetPool**: loans temporary render targets
//! - **BlitRecorder**: receives mirror-composition draws
//!
//! ## Design Goals
//!
//! - **Single frame in flight**: exactly zero or one planned frame exists;
//!   a frame that was never released is reclaimed with a warning, not an
//!   error
//! - **No hidden state**: runtime knobs live in an explicit
//!   [`DisplaySettings`] value owned by the system

use thiserror::Error;

use crate::api::display_device::{DeviceGlobals, DisplayProvider};
use crate::api::handles::{MaterialHandle, TargetHandle};
use crate::api::recorder::BlitRecorder;
use crate::api::target_pool::TargetPool;
use crate::layout::pass::StereoPass;
use crate::layout::{planner, test_mode};
use crate::mirror::MirrorCompositor;
use crate::primitives::camera::Camera;
use crate::primitives::target::TextureDimension;
use crate::settings::DisplaySettings;

/// Errors reported by the stereo display system
///
/// Most abnormal situations recover silently or with a log entry; only
/// conditions the system cannot plan around surface as errors.
#[derive(Error, Debug)]
pub enum DisplayError {
    /// More than one display device is connected
    ///
    /// The layout model assumes a single device. Rendering must not
    /// proceed on a guess about which device to drive.
    #[error("Only one display device is supported, found {count}")]
    MultipleDisplays {
        /// Number of devices the provider reported
        count: usize,
    },
}

/// Result type for display system operations
pub type DisplayResult<T> = Result<T, DisplayError>;

/// Cumulative counters kept by the system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// Frames planned through `setup_frame`
    pub frames_planned: u64,

    /// Frames released (including forced recoveries)
    pub frames_released: u64,

    /// Active (non-placeholder) passes planned in total
    pub passes_planned: u64,

    /// Times `setup_frame` found the previous frame still unreleased
    pub stale_frame_recoveries: u64,
}

/// # Stereo System
///
/// Per-frame stereo layout coordinator. Applications call
/// [`setup_frame`](Self::setup_frame) once per rendered frame, render the
/// returned passes, optionally [`recompute_pass`](Self::recompute_pass)
/// for stacked cameras, composite with
/// [`render_mirror_view`](Self::render_mirror_view), and finish with
/// [`release_frame`](Self::release_frame).
///
/// ## Responsibilities
///
/// - **Device probing**: polls the provider once per entry point and
///   pushes frame-constant state to the device
/// - **Layout selection**: device layout, deterministic test layout, or
///   the disabled placeholder pass, in that order of preference
/// - **Lifecycle**: owns the pass list and the frame's temporary
///   composition target
///
/// ## Design Notes
///
/// The system never talks to a GPU. Devices, pools and recorders are
/// trait objects supplied by the host renderer, which keeps the planning
/// logic testable without one.
pub struct StereoSystem {
    /// Source of connected display devices
    provider: Box<dyn DisplayProvider>,

    /// Loans the test layout's composition target
    pool: Box<dyn TargetPool>,

    /// Mirror-view compositing state
    compositor: MirrorCompositor,

    /// Material used to draw devices' hidden-area meshes
    occlusion_mesh_material: Option<MaterialHandle>,

    /// Runtime settings context
    settings: DisplaySettings,

    /// Passes of the frame currently in flight (empty between frames)
    frame_passes: Vec<StereoPass>,

    /// Template for the disabled placeholder pass
    sentinel: StereoPass,

    /// Temporary composition target of the current test-layout frame
    test_target: Option<TargetHandle>,

    /// Cumulative counters
    stats: LayoutStats,
}

impl StereoSystem {
    /// Create a system with default settings
    pub fn new(provider: Box<dyn DisplayProvider>, pool: Box<dyn TargetPool>) -> Self {
        Self::with_settings(provider, pool, DisplaySettings::default())
    }

    /// Create a system with explicit settings
    ///
    /// Use [`DisplaySettings::from_config`] to seed settings from an
    /// on-disk [`crate::config::DisplayConfig`].
    pub fn with_settings(
        provider: Box<dyn DisplayProvider>,
        pool: Box<dyn TargetPool>,
        settings: DisplaySettings,
    ) -> Self {
        log::info!(
            "Stereo system initialized (test mode: {}, msaa: {}, render scale: {:.2})",
            settings.test_mode,
            settings.msaa_samples,
            settings.render_scale
        );
        Self {
            provider,
            pool,
            compositor: MirrorCompositor::new(),
            occlusion_mesh_material: None,
            settings,
            frame_passes: Vec::new(),
            sentinel: StereoPass::sentinel(),
            test_target: None,
            stats: LayoutStats::default(),
        }
    }

    /// Current runtime settings
    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    /// Mutable runtime settings, for the control loop between frames
    pub fn settings_mut(&mut self) -> &mut DisplaySettings {
        &mut self.settings
    }

    /// Bind or clear the material used for manual mirror blits
    pub fn set_mirror_material(&mut self, material: Option<MaterialHandle>) {
        self.compositor.set_material(material);
    }

    /// Bind or clear the material used for hidden-area meshes
    pub fn set_occlusion_mesh_material(&mut self, material: Option<MaterialHandle>) {
        self.occlusion_mesh_material = material;
    }

    /// Cumulative counters
    pub fn stats(&self) -> LayoutStats {
        self.stats
    }

    /// Passes of the frame currently in flight
    pub fn frame_passes(&self) -> &[StereoPass] {
        &self.frame_passes
    }

    /// Poll the provider and prepare the device for this frame
    ///
    /// Returns whether a device is attached and running. Pushing globals
    /// is idempotent, so it happens unconditionally while a device is
    /// attached, running or not.
    fn refresh_display(&mut self, camera: &Camera) -> DisplayResult<bool> {
        let count = self.provider.display_count();
        if count > 1 {
            return Err(DisplayError::MultipleDisplays { count });
        }
        if count == 0 {
            if self.settings.test_mode {
                self.settings.raise_max_views(2);
            }
            return Ok(false);
        }

        let globals = DeviceGlobals {
            texture_layout: TextureDimension::Tex2dArray,
            z_near: camera.near,
            z_far: camera.far,
            srgb: self.settings.srgb_output,
            disable_legacy_path: true,
        };
        let device = self.provider.display_mut(0);
        device.apply_globals(&globals);
        let running = device.running();

        self.settings.raise_max_views(2);
        Ok(running)
    }

    /// Plan the frame's pass layout for this camera
    ///
    /// Preference order: deterministic test layout (when test mode is on,
    /// an automated test is running, and the camera qualifies), then the
    /// device layout (game camera, no explicit target, device running),
    /// then the disabled placeholder pass.
    ///
    /// If the previous frame was never released it is reclaimed here with
    /// a warning; the passes returned are always freshly planned.
    ///
    /// # Errors
    /// [`DisplayError::MultipleDisplays`] when more than one device is
    /// connected. The frame list is left empty in that case.
    pub fn setup_frame(&mut self, camera: &Camera) -> DisplayResult<&[StereoPass]> {
        let device_ready = self.refresh_display(camera)?;

        if !self.frame_passes.is_empty() {
            log::warn!("Frame layout was not released before the next frame; releasing it now");
            self.stats.stale_frame_recoveries += 1;
            self.release_frame();
        }

        let mut injected = false;
        if self.settings.test_mode && self.settings.automated_test_running && camera.kind.is_game()
        {
            if let Some(target) =
                test_mode::inject_single_pass_layout(camera, &mut *self.pool, &mut self.frame_passes)
            {
                self.test_target = Some(target);
                injected = true;
            }
        }

        if !injected {
            if device_ready && camera.kind.is_game() && camera.target_texture.is_none() {
                // The device paces presentation from here on; engine
                // vertical sync would fight it
                if self.settings.vsync_enabled {
                    log::info!("Vertical sync disabled while a display device paces frames");
                    self.settings.vsync_enabled = false;
                }
                planner::append_device_layout(
                    self.provider.display(0),
                    camera,
                    true,
                    self.occlusion_mesh_material,
                    &mut self.frame_passes,
                );
            } else {
                self.frame_passes.push(self.sentinel.clone());
            }
        }

        self.stats.frames_planned += 1;
        self.stats.passes_planned += self
            .frame_passes
            .iter()
            .filter(|pass| pass.enabled())
            .count() as u64;

        Ok(&self.frame_passes)
    }

    /// Release the frame planned by the last `setup_frame`
    ///
    /// Empties the pass list and returns the frame's temporary
    /// composition target (if any) to the pool. Calling this again, or
    /// without a planned frame, does nothing. The placeholder pass holds
    /// no resources and is simply dropped with the rest.
    pub fn release_frame(&mut self) {
        if self.frame_passes.is_empty() {
            return;
        }

        if let Some(target) = self.test_target.take() {
            self.pool.release(target);
        }

        let active = self
            .frame_passes
            .iter()
            .filter(|pass| pass.enabled())
            .count();
        self.frame_passes.clear();
        self.stats.frames_released += 1;
        log::trace!("Released frame layout ({} active passes)", active);
    }

    /// Rebuild one pass of the current frame for a different camera
    ///
    /// Used when several cameras stack onto one frame layout. Disabled
    /// passes are returned unchanged; with no (or more than one) device
    /// attached the pass keeps its planned state.
    ///
    /// Returns `None` only when `index` is out of range for the current
    /// frame.
    pub fn recompute_pass(&mut self, index: usize, camera: &Camera) -> Option<&StereoPass> {
        if index >= self.frame_passes.len() {
            log::warn!(
                "Cannot recompute pass {}: current frame has {} passes",
                index,
                self.frame_passes.len()
            );
            return None;
        }

        if self.provider.display_count() == 1 {
            let device = self.provider.display(0);
            if device.running() {
                planner::recompute_pass(device, camera, &mut self.frame_passes[index]);
            }
        }

        Some(&self.frame_passes[index])
    }

    /// Record the mirror composite of the current frame
    ///
    /// Does nothing when no device is attached; the compositor applies
    /// its own skip rules beyond that (device stopped, no material).
    pub fn render_mirror_view(&self, recorder: &mut dyn BlitRecorder, camera: &Camera) {
        if self.provider.display_count() == 0 {
            return;
        }
        self.compositor.render(
            self.provider.display(0),
            recorder,
            camera,
            &self.frame_passes,
            self.settings.srgb_output,
        );
    }

    /// Change the MSAA sample count for device-allocated targets
    ///
    /// Forwarded to every attached device on every call, so a device that
    /// attached after the last change still hears the current value.
    pub fn update_msaa_level(&mut self, samples: u32) {
        if self.settings.msaa_samples != samples {
            log::info!(
                "MSAA sample count changed: {} -> {}",
                self.settings.msaa_samples,
                samples
            );
            self.settings.msaa_samples = samples;
        }
        for index in 0..self.provider.display_count() {
            self.provider.display_mut(index).set_msaa_samples(samples);
        }
    }

    /// Change the resolution scale for device-allocated targets
    ///
    /// Forwarded to every attached device on every call, so a device that
    /// attached after the last change still hears the current value.
    pub fn update_render_scale(&mut self, scale: f32) {
        if (self.settings.render_scale - scale).abs() >= f32::EPSILON {
            log::info!(
                "Render scale changed: {:.2} -> {:.2}",
                self.settings.render_scale,
                scale
            );
            self.settings.render_scale = scale;
        }
        for index in 0..self.provider.display_count() {
            self.provider.display_mut(index).set_render_scale(scale);
        }
    }
}
