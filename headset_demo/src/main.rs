//! Headset layout demo
//!
//! Simulates a two-eye head-mounted display runtime and walks the
//! per-frame stereo lifecycle: plan passes, inspect the layout,
//! composite the mirror view and release. No GPU or headset hardware
//! is involved; every draw ends up in the log.

use stereo_display::api::display_device::{
    BlitParameter, DeviceGlobals, DisplayDevice, MirrorBlitDescriptor, MirrorBlitMode,
    PassCapability,
};
use stereo_display::api::handles::{MaterialHandle, TargetHandle};
use stereo_display::api::recorder::{BlitDraw, BlitRecorder, RenderTargetBinding};
use stereo_display::config::DisplayConfig;
use stereo_display::foundation::math::{utils, FrustumPlanes, Mat4, Mat4Ext, Rect, Vec3};
use stereo_display::layout::StereoPass;
use stereo_display::pool::TemporaryTargetPool;
use stereo_display::primitives::camera::Camera;
use stereo_display::primitives::culling::{CullingOptions, CullingParameters};
use stereo_display::primitives::target::{RenderTargetDesc, TextureDimension};
use stereo_display::primitives::view::RenderView;
use stereo_display::settings::DisplaySettings;
use stereo_display::StereoSystem;

/// Texture array the simulated compositor presents from
const EYE_TARGET: TargetHandle = TargetHandle(0x0E7E);

const EYE_WIDTH: u32 = 1832;
const EYE_HEIGHT: u32 = 1920;

/// Simulated two-eye headset runtime
///
/// In single-pass mode it advertises one render pass with both eye views
/// targeting slices 0 and 1 of a shared texture array. In dual-pass mode
/// it advertises one pass per eye, the way runtimes without multiview
/// support do.
struct SimulatedHeadset {
    single_pass: bool,
    ipd: f32,
    render_scale: f32,
}

impl SimulatedHeadset {
    fn new(single_pass: bool) -> Self {
        Self {
            single_pass,
            ipd: 0.064,
            render_scale: 1.0,
        }
    }

    fn scaled_extent(&self) -> (u32, u32) {
        let width = (EYE_WIDTH as f32 * self.render_scale) as u32;
        let height = (EYE_HEIGHT as f32 * self.render_scale) as u32;
        (width.max(1), height.max(1))
    }

    /// Asymmetric eye frustum: wider toward the temple than the nose
    fn eye_projection(&self, eye: usize, z_near: f32, z_far: f32) -> Mat4 {
        let outer = utils::deg_to_rad(52.0).tan() * z_near;
        let inner = utils::deg_to_rad(45.0).tan() * z_near;
        let vertical = utils::deg_to_rad(50.0).tan() * z_near;

        let (left, right) = if eye == 0 {
            (-outer, inner)
        } else {
            (-inner, outer)
        };

        Mat4::frustum(FrustumPlanes {
            left,
            right,
            bottom: -vertical,
            top: vertical,
            z_near,
            z_far,
        })
    }

    fn eye_view(&self, eye: usize, camera: &Camera) -> Mat4 {
        // Eyes sit half the interpupillary distance off the head center
        let half_ipd = 0.5 * self.ipd;
        let offset = if eye == 0 { -half_ipd } else { half_ipd };
        Mat4::new_translation(&Vec3::new(-offset, 0.0, 0.0)) * camera.get_view_matrix()
    }
}

impl DisplayDevice for SimulatedHeadset {
    fn running(&self) -> bool {
        true
    }

    fn pass_count(&self) -> usize {
        if self.single_pass {
            1
        } else {
            2
        }
    }

    fn pass_capability(&self, _pass_index: usize) -> PassCapability {
        let (width, height) = self.scaled_extent();
        PassCapability {
            render_target: EYE_TARGET,
            target_desc: RenderTargetDesc::new_2d_array(width, height, 2),
            culling_pass_index: 0,
            view_count: if self.single_pass { 2 } else { 1 },
        }
    }

    fn view_parameter(&self, camera: &Camera, pass_index: usize, view_index: usize) -> RenderView {
        let eye = pass_index + view_index;
        let (width, height) = self.scaled_extent();
        RenderView::new(
            self.eye_projection(eye, camera.near, camera.far),
            self.eye_view(eye, camera),
            Rect::new(0.0, 0.0, width as f32, height as f32),
            eye as i32,
        )
    }

    fn culling_parameters(&self, camera: &Camera, culling_pass_index: u32) -> CullingParameters {
        // One frustum covering both eyes; the planner strips the legacy bit
        CullingParameters::new(
            camera.get_view_matrix(),
            camera.get_projection_matrix(),
            CullingOptions::OCCLUSION_CULL
                | CullingOptions::SHADOW_CASTERS
                | CullingOptions::NEEDS_LIGHTS
                | CullingOptions::LEGACY_STEREO,
            culling_pass_index,
        )
    }

    fn apply_globals(&mut self, globals: &DeviceGlobals) {
        log::debug!(
            "Headset globals: layout {:?}, depth {:.2}..{:.1}, srgb {}",
            globals.texture_layout,
            globals.z_near,
            globals.z_far,
            globals.srgb
        );
    }

    fn set_msaa_samples(&mut self, samples: u32) {
        log::info!("Headset swapchain MSAA set to {}x", samples);
    }

    fn set_render_scale(&mut self, scale: f32) {
        log::info!("Headset swapchain render scale set to {:.2}", scale);
        self.render_scale = scale;
    }

    fn preferred_blit_mode(&self) -> MirrorBlitMode {
        MirrorBlitMode::SideBySide
    }

    fn mirror_blit_descriptor(&self, mode: MirrorBlitMode) -> Option<MirrorBlitDescriptor> {
        let eye_parameter = |slice: i32, dest_rect: Rect| BlitParameter {
            source: EYE_TARGET,
            source_dimension: TextureDimension::Tex2dArray,
            source_srgb: true,
            array_slice: slice,
            source_rect: Rect::unit(),
            dest_rect,
        };

        let parameters = match mode {
            MirrorBlitMode::SideBySide => vec![
                eye_parameter(0, Rect::new(0.0, 0.0, 0.5, 1.0)),
                eye_parameter(1, Rect::new(0.5, 0.0, 0.5, 1.0)),
            ],
            MirrorBlitMode::Default | MirrorBlitMode::LeftEye => {
                vec![eye_parameter(0, Rect::unit())]
            }
            MirrorBlitMode::RightEye => vec![eye_parameter(1, Rect::unit())],
        };

        Some(MirrorBlitDescriptor {
            native_blit_available: false,
            native_blit_invalid_states: false,
            parameters,
        })
    }

    fn record_native_blit(
        &self,
        _recorder: &mut dyn BlitRecorder,
        _allow_state_invalidate: bool,
        _mode: MirrorBlitMode,
    ) {
        log::warn!("Native blit requested but this runtime does not provide one");
    }
}

/// Recorder that narrates every mirror draw instead of touching a GPU
#[derive(Default)]
struct LoggingRecorder {
    draws: u32,
}

impl BlitRecorder for LoggingRecorder {
    fn begin_marker(&mut self, label: &str) {
        log::info!("[mirror] begin '{}'", label);
    }

    fn end_marker(&mut self) {
        log::info!("[mirror] end ({} draws)", self.draws);
    }

    fn set_render_target(&mut self, target: RenderTargetBinding) {
        log::info!("[mirror] render target: {:?}", target);
    }

    fn set_viewport(&mut self, viewport: Rect) {
        log::info!(
            "[mirror] viewport: {}x{} at ({}, {})",
            viewport.width,
            viewport.height,
            viewport.x,
            viewport.y
        );
    }

    fn clear(&mut self, color: [f32; 4]) {
        log::info!("[mirror] clear {:?}", color);
    }

    fn blit(&mut self, material: MaterialHandle, draw: &BlitDraw) {
        self.draws += 1;
        log::info!(
            "[mirror] blit slice {} with material {:?}: uv ({:.2}, {:.2}, {:.2}, {:.2}), dest ({:.2}, {:.2}, {:.2}, {:.2}), srgb read {}",
            draw.array_slice,
            material,
            draw.scale_bias.x,
            draw.scale_bias.y,
            draw.scale_bias.z,
            draw.scale_bias.w,
            draw.scale_bias_rt.x,
            draw.scale_bias_rt.y,
            draw.scale_bias_rt.z,
            draw.scale_bias_rt.w,
            draw.srgb_read
        );
    }
}

fn demo_camera() -> Camera {
    let mut camera = Camera::perspective(
        Vec3::new(0.0, 1.7, 3.0),
        75.0,
        EYE_WIDTH as f32 / EYE_HEIGHT as f32,
        0.05,
        150.0,
    );
    camera.primary = true;
    camera
}

fn describe_layout(passes: &[StereoPass]) {
    for pass in passes {
        if !pass.enabled() {
            log::info!("  pass {}: disabled placeholder", pass.multipass_id());
            continue;
        }
        let slices: Vec<i32> = pass.views().iter().map(|view| view.array_slice).collect();
        log::info!(
            "  pass {}: {} view(s), combined {}, slices {:?}, culling index {}",
            pass.multipass_id(),
            pass.view_count(),
            pass.is_combined(),
            slices,
            pass.culling_pass_index()
        );
    }
}

struct HeadsetApp {
    system: StereoSystem,
    camera: Camera,
    frame: u32,
}

impl HeadsetApp {
    fn new(single_pass: bool) -> Self {
        let headset = SimulatedHeadset::new(single_pass);
        let mut system = StereoSystem::new(
            Box::new(vec![headset]),
            Box::new(TemporaryTargetPool::new()),
        );
        system.set_mirror_material(Some(MaterialHandle(1)));
        system.set_occlusion_mesh_material(Some(MaterialHandle(2)));

        Self {
            system,
            camera: demo_camera(),
            frame: 0,
        }
    }

    fn run(&mut self, frames: u32) {
        for _ in 0..frames {
            self.render_frame();
            self.frame += 1;
        }
        let stats = self.system.stats();
        log::info!(
            "Planned {} frame(s), {} active pass(es) total",
            stats.frames_planned,
            stats.passes_planned
        );
    }

    fn render_frame(&mut self) {
        // Orbit the head around the scene origin
        let angle = self.frame as f32 * 0.2;
        self.camera
            .set_position(Vec3::new(3.0 * angle.sin(), 1.7, 3.0 * angle.cos()));
        self.camera.set_target(Vec3::new(0.0, 1.0, 0.0));

        log::info!("--- frame {} ---", self.frame);
        match self.system.setup_frame(&self.camera) {
            Ok(passes) => describe_layout(passes),
            Err(err) => {
                log::error!("Frame layout failed: {}", err);
                return;
            }
        }

        // A real renderer would draw the scene here, once per view

        let mut recorder = LoggingRecorder::default();
        self.system.render_mirror_view(&mut recorder, &self.camera);

        self.system.release_frame();
    }
}

/// Plan one frame with no hardware attached, using the deterministic
/// double-wide layout meant for automated rendering tests
fn run_test_layout() {
    let config = DisplayConfig {
        test_mode: true,
        ..DisplayConfig::default()
    };
    let mut settings = DisplaySettings::from_config(&config);
    settings.automated_test_running = true;

    let mut system = StereoSystem::with_settings(
        Box::new(Vec::<SimulatedHeadset>::new()),
        Box::new(TemporaryTargetPool::new()),
        settings,
    );

    let camera = demo_camera();
    match system.setup_frame(&camera) {
        Ok(passes) => {
            describe_layout(passes);
            if let Some(pass) = passes.first() {
                if let Some(view) = pass.views().first() {
                    let planes = view.projection.decompose_projection();
                    log::info!(
                        "  perturbed frustum: left {:.4}, right {:.4}, top {:.4}, bottom {:.4}",
                        planes.left,
                        planes.right,
                        planes.top,
                        planes.bottom
                    );
                }
                log::info!(
                    "  custom mirror attached: {}",
                    pass.custom_mirror().is_some()
                );
            }
        }
        Err(err) => log::error!("Frame layout failed: {}", err),
    }
    system.release_frame();
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting headset layout demo");

    log::info!("=== Combined layout (multiview-capable runtime) ===");
    let mut app = HeadsetApp::new(true);
    app.system.update_msaa_level(4);
    app.system.update_render_scale(0.9);
    app.run(3);

    log::info!("=== Simple layout (one pass per eye) ===");
    let mut app = HeadsetApp::new(false);
    app.run(2);

    log::info!("=== Deterministic layout without hardware ===");
    run_test_layout();

    log::info!("Headset layout demo completed");
}
