//! Frame layout planning
//!
//! Turns a device's capability passes into the frame's render passes.
//! Combining two views into one pass needs the device layout to line up
//! exactly; anything else falls back to one pass per view.

use crate::api::display_device::{DisplayDevice, PassCapability};
use crate::api::handles::MaterialHandle;
use crate::api::recorder::RenderTargetBinding;
use crate::layout::pass::{PassCreateInfo, StereoPass};
use crate::primitives::camera::Camera;
use crate::primitives::culling::{CullingOptions, CullingParameters};
use crate::primitives::target::TextureDimension;

/// Whether one capability pass qualifies for combined rendering
///
/// Requires a two-layer array target with exactly two views landing in
/// slices 0 and 1 (in that order) under identical viewports. Slice order
/// matters: instanced rendering addresses slices by view index.
fn can_combine(
    device: &dyn DisplayDevice,
    camera: &Camera,
    capability: &PassCapability,
    pass_index: usize,
) -> bool {
    if capability.target_desc.dimension != TextureDimension::Tex2dArray {
        return false;
    }
    if capability.target_desc.array_layers != 2 {
        return false;
    }
    if capability.view_count != 2 {
        return false;
    }

    let first = device.view_parameter(camera, pass_index, 0);
    let second = device.view_parameter(camera, pass_index, 1);
    if first.array_slice != 0 || second.array_slice != 1 {
        return false;
    }
    first.viewport == second.viewport
}

/// Derive culling data for a capability pass, with the built-in stereo
/// culling bit cleared
fn culling_for(
    device: &dyn DisplayDevice,
    camera: &Camera,
    capability: &PassCapability,
) -> CullingParameters {
    let mut culling = device.culling_parameters(camera, capability.culling_pass_index);
    culling.options.remove(CullingOptions::LEGACY_STEREO);
    culling.culling_pass_index = capability.culling_pass_index;
    culling
}

fn create_info(
    frame: &[StereoPass],
    capability: &PassCapability,
    culling: CullingParameters,
    occlusion_mesh_material: Option<MaterialHandle>,
) -> PassCreateInfo {
    PassCreateInfo {
        multipass_id: frame.len() as u32,
        culling,
        render_target: RenderTargetBinding::Texture(capability.render_target),
        target_desc: capability.target_desc,
        occlusion_mesh_material,
        custom_mirror: None,
    }
}

/// Append the device's layout for this camera to the frame
///
/// Capability passes are visited in device order and views in view order,
/// so pass ids are dense and stable for a given device state. Total view
/// count always equals the sum of the device's per-pass view counts,
/// whether or not combining succeeds.
pub(crate) fn append_device_layout(
    device: &dyn DisplayDevice,
    camera: &Camera,
    single_pass_allowed: bool,
    occlusion_mesh_material: Option<MaterialHandle>,
    frame: &mut Vec<StereoPass>,
) {
    for pass_index in 0..device.pass_count() {
        let capability = device.pass_capability(pass_index);
        let culling = culling_for(device, camera, &capability);

        if single_pass_allowed && can_combine(device, camera, &capability, pass_index) {
            let mut pass = StereoPass::new(create_info(
                frame,
                &capability,
                culling,
                occlusion_mesh_material,
            ));
            for view_index in 0..capability.view_count as usize {
                pass.add_view(device.view_parameter(camera, pass_index, view_index));
            }
            frame.push(pass);
        } else {
            for view_index in 0..capability.view_count as usize {
                let mut pass = StereoPass::new(create_info(
                    frame,
                    &capability,
                    culling,
                    occlusion_mesh_material,
                ));
                pass.add_view(device.view_parameter(camera, pass_index, view_index));
                frame.push(pass);
            }
        }
    }
}

/// Rebuild one pass in place for a different camera
///
/// Used when several cameras stack onto the same frame layout. The pass's
/// id doubles as the device capability index it was planned from; if the
/// device no longer reports that many passes the pass is left untouched.
/// The pass keeps the arity it was planned with: a combined pass re-adds
/// every device view, a simple pass rebuilds from the first.
pub(crate) fn recompute_pass(device: &dyn DisplayDevice, camera: &Camera, pass: &mut StereoPass) {
    if !pass.enabled() {
        return;
    }

    let pass_index = pass.multipass_id() as usize;
    if pass_index >= device.pass_count() {
        log::warn!(
            "Cannot recompute pass {}: device reports only {} passes",
            pass.multipass_id(),
            device.pass_count()
        );
        return;
    }

    let capability = device.pass_capability(pass_index);
    let culling = culling_for(device, camera, &capability);
    let was_combined = pass.is_combined();
    pass.rebind(
        culling,
        RenderTargetBinding::Texture(capability.render_target),
        capability.target_desc,
    );

    if was_combined {
        for view_index in 0..capability.view_count as usize {
            pass.add_view(device.view_parameter(camera, pass_index, view_index));
        }
    } else {
        pass.add_view(device.view_parameter(camera, pass_index, 0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::display_device::{DeviceGlobals, MirrorBlitDescriptor, MirrorBlitMode};
    use crate::api::handles::TargetHandle;
    use crate::api::recorder::BlitRecorder;
    use crate::foundation::math::{Mat4, Rect, Vec3};
    use crate::primitives::target::RenderTargetDesc;
    use crate::primitives::view::RenderView;

    struct FakePass {
        capability: PassCapability,
        views: Vec<RenderView>,
    }

    struct FakeDevice {
        passes: Vec<FakePass>,
    }

    impl FakeDevice {
        /// One pass that satisfies every combining requirement
        fn combinable() -> Self {
            let desc = RenderTargetDesc::new_2d_array(1440, 1600, 2);
            Self {
                passes: vec![FakePass {
                    capability: PassCapability {
                        render_target: TargetHandle(10),
                        target_desc: desc,
                        culling_pass_index: 0,
                        view_count: 2,
                    },
                    views: vec![eye_view(0), eye_view(1)],
                }],
            }
        }
    }

    fn eye_view(slice: i32) -> RenderView {
        RenderView::new(
            Mat4::identity(),
            Mat4::identity(),
            Rect::new(0.0, 0.0, 1440.0, 1600.0),
            slice,
        )
    }

    impl DisplayDevice for FakeDevice {
        fn running(&self) -> bool {
            true
        }

        fn pass_count(&self) -> usize {
            self.passes.len()
        }

        fn pass_capability(&self, pass_index: usize) -> PassCapability {
            self.passes[pass_index].capability
        }

        fn view_parameter(
            &self,
            _camera: &Camera,
            pass_index: usize,
            view_index: usize,
        ) -> RenderView {
            self.passes[pass_index].views[view_index]
        }

        fn culling_parameters(
            &self,
            _camera: &Camera,
            culling_pass_index: u32,
        ) -> CullingParameters {
            // Devices hand back the stereo bit; the planner must clear it
            CullingParameters::new(
                Mat4::identity(),
                Mat4::identity(),
                CullingOptions::OCCLUSION_CULL | CullingOptions::LEGACY_STEREO,
                culling_pass_index,
            )
        }

        fn apply_globals(&mut self, _globals: &DeviceGlobals) {}

        fn set_msaa_samples(&mut self, _samples: u32) {}

        fn set_render_scale(&mut self, _scale: f32) {}

        fn preferred_blit_mode(&self) -> MirrorBlitMode {
            MirrorBlitMode::Default
        }

        fn mirror_blit_descriptor(&self, _mode: MirrorBlitMode) -> Option<MirrorBlitDescriptor> {
            None
        }

        fn record_native_blit(
            &self,
            _recorder: &mut dyn BlitRecorder,
            _allow_state_invalidate: bool,
            _mode: MirrorBlitMode,
        ) {
        }
    }

    fn camera() -> Camera {
        Camera::perspective(Vec3::zeros(), 75.0, 0.9, 0.1, 100.0)
    }

    #[test]
    fn test_combinable_layout_yields_one_pass_two_views() {
        let device = FakeDevice::combinable();
        let mut frame = Vec::new();

        append_device_layout(&device, &camera(), true, None, &mut frame);

        assert_eq!(frame.len(), 1);
        assert_eq!(frame[0].multipass_id(), 0);
        assert!(frame[0].is_combined());
        assert_eq!(frame[0].views()[0].array_slice, 0);
        assert_eq!(frame[0].views()[1].array_slice, 1);
    }

    #[test]
    fn test_swapped_slices_fall_back_to_two_passes() {
        let mut device = FakeDevice::combinable();
        device.passes[0].views = vec![eye_view(1), eye_view(0)];
        let mut frame = Vec::new();

        append_device_layout(&device, &camera(), true, None, &mut frame);

        assert_eq!(frame.len(), 2);
        assert_eq!(frame[0].multipass_id(), 0);
        assert_eq!(frame[1].multipass_id(), 1);
        assert!(!frame[0].is_combined());
        assert!(!frame[1].is_combined());
        // View order is preserved even though slices are swapped
        assert_eq!(frame[0].views()[0].array_slice, 1);
        assert_eq!(frame[1].views()[0].array_slice, 0);
    }

    #[test]
    fn test_unequal_viewports_fall_back_to_two_passes() {
        let mut device = FakeDevice::combinable();
        device.passes[0].views[1].viewport = Rect::new(1440.0, 0.0, 1440.0, 1600.0);
        let mut frame = Vec::new();

        append_device_layout(&device, &camera(), true, None, &mut frame);

        assert_eq!(frame.len(), 2);
    }

    #[test]
    fn test_plain_2d_target_never_combines() {
        let mut device = FakeDevice::combinable();
        device.passes[0].capability.target_desc = RenderTargetDesc::new_2d(1440, 1600);
        let mut frame = Vec::new();

        append_device_layout(&device, &camera(), true, None, &mut frame);

        assert_eq!(frame.len(), 2);
    }

    #[test]
    fn test_single_layer_array_never_combines() {
        let mut device = FakeDevice::combinable();
        device.passes[0].capability.target_desc.array_layers = 1;
        let mut frame = Vec::new();

        append_device_layout(&device, &camera(), true, None, &mut frame);

        assert_eq!(frame.len(), 2);
    }

    #[test]
    fn test_single_pass_disallowed_forces_multi_pass() {
        let device = FakeDevice::combinable();
        let mut frame = Vec::new();

        append_device_layout(&device, &camera(), false, None, &mut frame);

        assert_eq!(frame.len(), 2);
    }

    #[test]
    fn test_stereo_culling_bit_cleared_on_every_pass() {
        let mut device = FakeDevice::combinable();
        device.passes[0].views = vec![eye_view(1), eye_view(0)];
        let mut frame = Vec::new();

        append_device_layout(&device, &camera(), true, None, &mut frame);

        for pass in &frame {
            assert!(!pass.culling().options.contains(CullingOptions::LEGACY_STEREO));
            assert!(pass.culling().options.contains(CullingOptions::OCCLUSION_CULL));
        }
    }

    #[test]
    fn test_culling_index_carried_from_capability() {
        let mut device = FakeDevice::combinable();
        device.passes[0].capability.culling_pass_index = 3;
        let mut frame = Vec::new();

        append_device_layout(&device, &camera(), true, None, &mut frame);

        assert_eq!(frame[0].culling_pass_index(), 3);
        assert_eq!(frame[0].culling().culling_pass_index, 3);
    }

    #[test]
    fn test_view_count_conserved_across_mixed_capabilities() {
        // A combinable pass plus a standalone single-view pass
        let mut device = FakeDevice::combinable();
        device.passes.push(FakePass {
            capability: PassCapability {
                render_target: TargetHandle(11),
                target_desc: RenderTargetDesc::new_2d(800, 600),
                culling_pass_index: 1,
                view_count: 1,
            },
            views: vec![eye_view(-1)],
        });
        let mut frame = Vec::new();

        append_device_layout(&device, &camera(), true, None, &mut frame);

        let device_views: u32 = device.passes.iter().map(|p| p.capability.view_count).sum();
        let frame_views: usize = frame.iter().map(StereoPass::view_count).sum();
        assert_eq!(frame_views as u32, device_views);

        let ids: Vec<u32> = frame.iter().map(StereoPass::multipass_id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_pass_ids_continue_from_existing_frame() {
        let device = FakeDevice::combinable();
        let mut frame = vec![StereoPass::sentinel()];

        append_device_layout(&device, &camera(), false, None, &mut frame);

        assert_eq!(frame[1].multipass_id(), 1);
        assert_eq!(frame[2].multipass_id(), 2);
    }

    #[test]
    fn test_occlusion_material_attached_to_device_passes() {
        let device = FakeDevice::combinable();
        let material = MaterialHandle(3);
        let mut frame = Vec::new();

        append_device_layout(&device, &camera(), true, Some(material), &mut frame);

        assert_eq!(frame[0].occlusion_mesh_material(), Some(material));
    }

    #[test]
    fn test_recompute_combined_pass_keeps_both_views() {
        let device = FakeDevice::combinable();
        let mut frame = Vec::new();
        append_device_layout(&device, &camera(), true, None, &mut frame);

        let mut other = camera();
        other.set_position(Vec3::new(0.0, 5.0, 0.0));
        recompute_pass(&device, &other, &mut frame[0]);

        assert!(frame[0].is_combined());
        assert_eq!(frame[0].views()[0].array_slice, 0);
        assert_eq!(frame[0].views()[1].array_slice, 1);
        assert!(!frame[0]
            .culling()
            .options
            .contains(CullingOptions::LEGACY_STEREO));
    }

    #[test]
    fn test_recompute_simple_pass_rebuilds_from_first_view() {
        let mut device = FakeDevice::combinable();
        device.passes[0].views = vec![eye_view(1), eye_view(0)];
        let mut frame = Vec::new();
        append_device_layout(&device, &camera(), true, None, &mut frame);

        recompute_pass(&device, &camera(), &mut frame[1]);

        // Pass 1 addresses capability pass 1, which does not exist on this
        // device, so it must be left untouched
        assert_eq!(frame[1].view_count(), 1);
        assert_eq!(frame[1].views()[0].array_slice, 0);

        // Pass 0 does resolve and rebuilds from view index 0
        recompute_pass(&device, &camera(), &mut frame[0]);
        assert_eq!(frame[0].view_count(), 1);
        assert_eq!(frame[0].views()[0].array_slice, 1);
    }

    #[test]
    fn test_recompute_disabled_pass_is_untouched() {
        let device = FakeDevice::combinable();
        let mut sentinel = StereoPass::sentinel();

        recompute_pass(&device, &camera(), &mut sentinel);

        assert!(!sentinel.enabled());
        assert_eq!(sentinel.view_count(), 0);
    }

    #[test]
    fn test_recompute_keeps_combined_arity_when_viewports_diverge() {
        let mut device = FakeDevice::combinable();
        let mut frame = Vec::new();
        append_device_layout(&device, &camera(), true, None, &mut frame);
        assert!(frame[0].is_combined());

        // The device narrows the second view for the stacked camera, so
        // the combine test would now fail; the planned arity must hold
        device.passes[0].views[1].viewport = Rect::new(720.0, 0.0, 720.0, 1600.0);
        let mut stacked = camera();
        stacked.set_position(Vec3::new(0.0, 2.0, 1.0));
        recompute_pass(&device, &stacked, &mut frame[0]);

        assert!(frame[0].is_combined());
        assert_eq!(frame[0].view_count(), 2);
        assert_eq!(
            frame[0].views()[1].viewport,
            Rect::new(720.0, 0.0, 720.0, 1600.0)
        );
    }

    #[test]
    fn test_recompute_keeps_simple_arity_for_combinable_capability() {
        let device = FakeDevice::combinable();
        let mut frame = Vec::new();
        append_device_layout(&device, &camera(), false, None, &mut frame);

        recompute_pass(&device, &camera(), &mut frame[0]);

        assert!(!frame[0].is_combined());
        assert_eq!(frame[0].view_count(), 1);
        assert_eq!(frame[0].views()[0].array_slice, 0);
    }
}
