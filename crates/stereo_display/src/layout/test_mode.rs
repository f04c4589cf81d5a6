//! Deterministic single-pass layout for automated testing
//!
//! Rendering tests need a combined-pass layout without any device
//! attached. The injector builds one from the primary camera: the first
//! view gets a deliberately perturbed frustum and view matrix so slice
//! mixups show up as image differences, the second view is the camera's
//! own. Mirroring copies the unperturbed slice so image comparisons stay
//! stable.

use std::sync::Arc;

use crate::api::handles::TargetHandle;
use crate::api::recorder::{BlitDraw, BlitRecorder, RenderTargetBinding};
use crate::api::target_pool::TargetPool;
use crate::foundation::math::{Mat4, Mat4Ext, Rect, Vec3};
use crate::layout::pass::{PassCreateInfo, StereoPass};
use crate::mirror::blit;
use crate::mirror::{CustomMirrorView, MirrorViewContext};
use crate::primitives::camera::Camera;
use crate::primitives::culling::{CullingOptions, CullingParameters};
use crate::primitives::target::TextureDimension;
use crate::primitives::view::{RenderView, NO_ARRAY_SLICE};

/// Copies one slice of the composition target to the mirror destination
struct SliceCopyMirror {
    source: TargetHandle,
    source_srgb: bool,
    slice: i32,
}

impl CustomMirrorView for SliceCopyMirror {
    fn render(&self, ctx: MirrorViewContext<'_>, recorder: &mut dyn BlitRecorder) {
        let draw = BlitDraw {
            source: self.source,
            source_dimension: TextureDimension::Tex2dArray,
            array_slice: self.slice,
            scale_bias: blit::source_scale_bias(Rect::unit(), ctx.flip_vertical),
            scale_bias_rt: blit::dest_scale_bias(Rect::unit()),
            srgb_read: ctx.display_srgb && !self.source_srgb,
        };
        recorder.blit(ctx.material, &draw);
    }
}

/// Build the deterministic test layout for this camera
///
/// Only the designated primary camera is accepted; for any other camera
/// the frame is left alone and `None` is returned. On success the frame
/// gains exactly one combined pass rendering into a freshly acquired
/// two-layer array target, and the handle of that target is returned so
/// the caller can give it back to the pool at frame release.
pub(crate) fn inject_single_pass_layout(
    camera: &Camera,
    pool: &mut dyn TargetPool,
    frame: &mut Vec<StereoPass>,
) -> Option<TargetHandle> {
    if !camera.primary {
        return None;
    }

    // Composition target: the camera's own surface shape, widened to a
    // two-layer array
    let mut desc = camera.target_desc;
    desc.dimension = TextureDimension::Tex2dArray;
    desc.array_layers = 2;
    let target = pool.acquire(&desc);

    let mut pass = StereoPass::new(PassCreateInfo {
        multipass_id: 0,
        culling: CullingParameters::new(
            camera.get_view_matrix(),
            camera.get_projection_matrix(),
            CullingOptions::empty(),
            0,
        ),
        render_target: RenderTargetBinding::Texture(target),
        target_desc: desc,
        occlusion_mesh_material: None,
        custom_mirror: Some(Arc::new(SliceCopyMirror {
            source: target,
            source_srgb: desc.srgb,
            // Slice 1 holds the unperturbed view
            slice: 1,
        })),
    });

    // First view: perturbed so slice addressing errors change the image
    let mut planes = camera.get_projection_matrix().decompose_projection();
    planes.left *= 0.44;
    planes.right *= 0.88;
    planes.top *= 0.11;
    planes.bottom *= 0.33;
    // Offset in eye space, applied after the world-to-view transform
    let perturbed_view =
        camera.get_view_matrix() * Mat4::new_translation(&Vec3::new(0.34, 0.25, -0.08));
    pass.add_view(RenderView::new(
        Mat4::frustum(planes),
        perturbed_view,
        camera.pixel_rect,
        NO_ARRAY_SLICE,
    ));

    // Second view: the camera as-is
    pass.add_view(RenderView::from_camera(camera));

    frame.push(pass);
    Some(target)
}
