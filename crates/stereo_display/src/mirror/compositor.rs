//! Mirror-view composition

use crate::api::display_device::DisplayDevice;
use crate::api::handles::MaterialHandle;
use crate::api::recorder::{BlitRecorder, RenderTargetBinding};
use crate::layout::pass::StereoPass;
use crate::mirror::blit;
use crate::mirror::MirrorViewContext;
use crate::primitives::camera::Camera;

/// Records the copy of composited stereo output to a 2D surface
///
/// Owns nothing but the material used for manual blits. Skips silently
/// when there is nothing sensible to do: no running device, or no
/// material bound yet.
#[derive(Default)]
pub struct MirrorCompositor {
    mirror_material: Option<MaterialHandle>,
}

impl MirrorCompositor {
    /// Create a compositor with no material bound
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind or clear the material used for manual mirror blits
    pub fn set_material(&mut self, material: Option<MaterialHandle>) {
        self.mirror_material = material;
    }

    /// Currently bound mirror material
    pub fn material(&self) -> Option<MaterialHandle> {
        self.mirror_material
    }

    /// Record the mirror composite for this frame
    ///
    /// Resolves the destination (camera target or backbuffer) and the
    /// vertical-flip decision once, then either invokes per-pass custom
    /// callbacks, hands recording to the device's native blit, replays the
    /// device's blit regions as quad draws, or clears the destination to
    /// black when the device reports nothing to mirror.
    pub fn render(
        &self,
        device: &dyn DisplayDevice,
        recorder: &mut dyn BlitRecorder,
        camera: &Camera,
        passes: &[StereoPass],
        display_srgb: bool,
    ) {
        if !device.running() {
            return;
        }
        let material = match self.mirror_material {
            Some(material) => material,
            None => return,
        };

        let destination = camera
            .target_texture
            .map_or(RenderTargetBinding::Backbuffer, RenderTargetBinding::Texture);
        let flip_vertical = blit::wants_vertical_flip(camera);

        recorder.begin_marker("Mirror View");
        recorder.set_render_target(destination);
        recorder.set_viewport(camera.pixel_rect);

        let ctx = MirrorViewContext {
            camera,
            destination,
            flip_vertical,
            display_srgb,
            material,
        };

        let mut used_custom = false;
        for pass in passes.iter().filter(|pass| pass.enabled()) {
            if let Some(custom) = pass.custom_mirror() {
                custom.render(ctx, recorder);
                used_custom = true;
            }
        }

        if !used_custom {
            let mode = device.preferred_blit_mode();
            match device.mirror_blit_descriptor(mode) {
                Some(desc) if desc.native_blit_available => {
                    device.record_native_blit(recorder, desc.native_blit_invalid_states, mode);
                }
                Some(desc) => {
                    for param in &desc.parameters {
                        let draw = blit::draw_for_parameter(param, flip_vertical, display_srgb);
                        recorder.blit(material, &draw);
                    }
                }
                None => {
                    recorder.clear([0.0, 0.0, 0.0, 1.0]);
                }
            }
        }

        recorder.end_marker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::display_device::{
        BlitParameter, DeviceGlobals, MirrorBlitDescriptor, MirrorBlitMode, PassCapability,
    };
    use crate::api::handles::TargetHandle;
    use crate::api::recorder::BlitDraw;
    use crate::foundation::math::{Mat4, Rect, Vec3};
    use crate::layout::pass::PassCreateInfo;
    use crate::mirror::CustomMirrorView;
    use crate::primitives::culling::{CullingOptions, CullingParameters};
    use crate::primitives::target::{RenderTargetDesc, TextureDimension};
    use crate::primitives::view::RenderView;
    use std::cell::Cell;
    use std::sync::Arc;

    #[derive(Debug, PartialEq)]
    enum Op {
        Begin(String),
        End,
        Target(RenderTargetBinding),
        Viewport(Rect),
        Clear,
        Blit {
            slice: i32,
            scale_bias: [f32; 4],
            srgb_read: bool,
        },
    }

    #[derive(Default)]
    struct RecordingRecorder {
        ops: Vec<Op>,
    }

    impl BlitRecorder for RecordingRecorder {
        fn begin_marker(&mut self, label: &str) {
            self.ops.push(Op::Begin(label.to_owned()));
        }

        fn end_marker(&mut self) {
            self.ops.push(Op::End);
        }

        fn set_render_target(&mut self, target: RenderTargetBinding) {
            self.ops.push(Op::Target(target));
        }

        fn set_viewport(&mut self, viewport: Rect) {
            self.ops.push(Op::Viewport(viewport));
        }

        fn clear(&mut self, _color: [f32; 4]) {
            self.ops.push(Op::Clear);
        }

        fn blit(&mut self, _material: MaterialHandle, draw: &BlitDraw) {
            self.ops.push(Op::Blit {
                slice: draw.array_slice,
                scale_bias: [
                    draw.scale_bias.x,
                    draw.scale_bias.y,
                    draw.scale_bias.z,
                    draw.scale_bias.w,
                ],
                srgb_read: draw.srgb_read,
            });
        }
    }

    struct StubDevice {
        running: bool,
        descriptor: Option<MirrorBlitDescriptor>,
        native_blits: Cell<u32>,
    }

    impl StubDevice {
        fn with_descriptor(descriptor: Option<MirrorBlitDescriptor>) -> Self {
            Self {
                running: true,
                descriptor,
                native_blits: Cell::new(0),
            }
        }
    }

    impl DisplayDevice for StubDevice {
        fn running(&self) -> bool {
            self.running
        }

        fn pass_count(&self) -> usize {
            0
        }

        fn pass_capability(&self, _pass_index: usize) -> PassCapability {
            unreachable!("compositor never queries pass capabilities")
        }

        fn view_parameter(
            &self,
            _camera: &Camera,
            _pass_index: usize,
            _view_index: usize,
        ) -> RenderView {
            unreachable!("compositor never queries view parameters")
        }

        fn culling_parameters(
            &self,
            _camera: &Camera,
            _culling_pass_index: u32,
        ) -> CullingParameters {
            unreachable!("compositor never queries culling parameters")
        }

        fn apply_globals(&mut self, _globals: &DeviceGlobals) {}

        fn set_msaa_samples(&mut self, _samples: u32) {}

        fn set_render_scale(&mut self, _scale: f32) {}

        fn preferred_blit_mode(&self) -> MirrorBlitMode {
            MirrorBlitMode::Default
        }

        fn mirror_blit_descriptor(&self, _mode: MirrorBlitMode) -> Option<MirrorBlitDescriptor> {
            self.descriptor.clone()
        }

        fn record_native_blit(
            &self,
            _recorder: &mut dyn BlitRecorder,
            _allow_state_invalidate: bool,
            _mode: MirrorBlitMode,
        ) {
            self.native_blits.set(self.native_blits.get() + 1);
        }
    }

    fn game_camera() -> Camera {
        Camera::perspective(Vec3::zeros(), 60.0, 16.0 / 9.0, 0.1, 100.0)
    }

    fn one_param_descriptor(source_rect: Rect) -> MirrorBlitDescriptor {
        MirrorBlitDescriptor {
            native_blit_available: false,
            native_blit_invalid_states: false,
            parameters: vec![BlitParameter {
                source: TargetHandle(1),
                source_dimension: TextureDimension::Tex2dArray,
                source_srgb: false,
                array_slice: 0,
                source_rect,
                dest_rect: Rect::unit(),
            }],
        }
    }

    #[test]
    fn test_no_material_records_nothing() {
        let device = StubDevice::with_descriptor(Some(one_param_descriptor(Rect::unit())));
        let compositor = MirrorCompositor::new();
        let mut recorder = RecordingRecorder::default();

        compositor.render(&device, &mut recorder, &game_camera(), &[], true);

        assert!(recorder.ops.is_empty());
    }

    #[test]
    fn test_stopped_device_records_nothing() {
        let mut device = StubDevice::with_descriptor(Some(one_param_descriptor(Rect::unit())));
        device.running = false;
        let mut compositor = MirrorCompositor::new();
        compositor.set_material(Some(MaterialHandle(5)));
        let mut recorder = RecordingRecorder::default();

        compositor.render(&device, &mut recorder, &game_camera(), &[], true);

        assert!(recorder.ops.is_empty());
    }

    #[test]
    fn test_manual_blit_applies_flip_to_backbuffer() {
        let device =
            StubDevice::with_descriptor(Some(one_param_descriptor(Rect::new(0.0, 0.0, 100.0, 50.0))));
        let mut compositor = MirrorCompositor::new();
        compositor.set_material(Some(MaterialHandle(5)));
        let mut recorder = RecordingRecorder::default();
        let camera = game_camera();

        compositor.render(&device, &mut recorder, &camera, &[], false);

        assert_eq!(
            recorder.ops,
            vec![
                Op::Begin("Mirror View".to_owned()),
                Op::Target(RenderTargetBinding::Backbuffer),
                Op::Viewport(camera.pixel_rect),
                Op::Blit {
                    slice: 0,
                    scale_bias: [100.0, -50.0, 0.0, 50.0],
                    srgb_read: false,
                },
                Op::End,
            ]
        );
    }

    #[test]
    fn test_explicit_target_skips_flip() {
        let device = StubDevice::with_descriptor(Some(one_param_descriptor(Rect::unit())));
        let mut compositor = MirrorCompositor::new();
        compositor.set_material(Some(MaterialHandle(5)));
        let mut recorder = RecordingRecorder::default();
        let mut camera = game_camera();
        camera.set_output(Some(TargetHandle(77)), RenderTargetDesc::new_2d(640, 480));

        compositor.render(&device, &mut recorder, &camera, &[], false);

        assert!(recorder.ops.contains(&Op::Target(RenderTargetBinding::Texture(TargetHandle(77)))));
        assert!(recorder.ops.contains(&Op::Blit {
            slice: 0,
            scale_bias: [1.0, 1.0, 0.0, 0.0],
            srgb_read: false,
        }));
    }

    #[test]
    fn test_native_blit_takes_priority() {
        let device = StubDevice::with_descriptor(Some(MirrorBlitDescriptor {
            native_blit_available: true,
            native_blit_invalid_states: true,
            parameters: Vec::new(),
        }));
        let mut compositor = MirrorCompositor::new();
        compositor.set_material(Some(MaterialHandle(5)));
        let mut recorder = RecordingRecorder::default();

        compositor.render(&device, &mut recorder, &game_camera(), &[], false);

        assert_eq!(device.native_blits.get(), 1);
        assert!(!recorder.ops.iter().any(|op| matches!(op, Op::Blit { .. })));
    }

    #[test]
    fn test_missing_descriptor_clears_to_black() {
        let device = StubDevice::with_descriptor(None);
        let mut compositor = MirrorCompositor::new();
        compositor.set_material(Some(MaterialHandle(5)));
        let mut recorder = RecordingRecorder::default();

        compositor.render(&device, &mut recorder, &game_camera(), &[], false);

        assert!(recorder.ops.contains(&Op::Clear));
    }

    struct MarkerMirror;

    impl CustomMirrorView for MarkerMirror {
        fn render(&self, ctx: MirrorViewContext<'_>, recorder: &mut dyn BlitRecorder) {
            recorder.blit(
                ctx.material,
                &BlitDraw {
                    source: TargetHandle(42),
                    source_dimension: TextureDimension::Tex2dArray,
                    array_slice: 1,
                    scale_bias: blit::source_scale_bias(Rect::unit(), ctx.flip_vertical),
                    scale_bias_rt: blit::dest_scale_bias(Rect::unit()),
                    srgb_read: false,
                },
            );
        }
    }

    #[test]
    fn test_custom_mirror_replaces_device_compositing() {
        let device = StubDevice::with_descriptor(Some(one_param_descriptor(Rect::unit())));
        let mut compositor = MirrorCompositor::new();
        compositor.set_material(Some(MaterialHandle(5)));
        let mut recorder = RecordingRecorder::default();

        let mut pass = StereoPass::new(PassCreateInfo {
            multipass_id: 0,
            culling: CullingParameters::new(
                Mat4::identity(),
                Mat4::identity(),
                CullingOptions::empty(),
                0,
            ),
            render_target: RenderTargetBinding::Texture(TargetHandle(42)),
            target_desc: RenderTargetDesc::new_2d_array(256, 256, 2),
            occlusion_mesh_material: None,
            custom_mirror: Some(Arc::new(MarkerMirror)),
        });
        pass.add_view(RenderView::new(
            Mat4::identity(),
            Mat4::identity(),
            Rect::unit(),
            0,
        ));

        compositor.render(&device, &mut recorder, &game_camera(), &[pass], false);

        // The custom callback drew slice 1 flipped; the device's own
        // parameter (slice 0) was never consulted
        assert!(recorder.ops.contains(&Op::Blit {
            slice: 1,
            scale_bias: [1.0, -1.0, 0.0, 1.0],
            srgb_read: false,
        }));
        assert!(!recorder.ops.contains(&Op::Blit {
            slice: 0,
            scale_bias: [1.0, 1.0, 0.0, 0.0],
            srgb_read: false,
        }));
    }
}
