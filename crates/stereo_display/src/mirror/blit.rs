//! Blit transform math
//!
//! The mirror shader samples the source through `scale_bias` (UV space)
//! and places the quad through `scale_bias_rt` (destination space). Both
//! are `(scale_x, scale_y, offset_x, offset_y)` vectors; a negative
//! vertical scale flips the sampled image.

use crate::api::display_device::BlitParameter;
use crate::api::recorder::BlitDraw;
use crate::foundation::math::{Rect, Vec4};
use crate::primitives::camera::{Camera, CameraKind};

/// Source UV transform for a blit from `src_rect`
///
/// With `flip_vertical` set, the vertical scale is negated and the offset
/// moved to the rectangle's top edge so the sampled image reads top-down.
pub fn source_scale_bias(src_rect: Rect, flip_vertical: bool) -> Vec4 {
    if flip_vertical {
        Vec4::new(
            src_rect.width,
            -src_rect.height,
            src_rect.x,
            src_rect.height + src_rect.y,
        )
    } else {
        Vec4::new(src_rect.width, src_rect.height, src_rect.x, src_rect.y)
    }
}

/// Destination placement transform for a blit into `dest_rect`
pub fn dest_scale_bias(dest_rect: Rect) -> Vec4 {
    Vec4::new(dest_rect.width, dest_rect.height, dest_rect.x, dest_rect.y)
}

/// Whether mirror output must be flipped for this camera
///
/// Flipping happens when compositing to the default presentation surface,
/// and for editor scene-view and preview cameras regardless of surface.
pub fn wants_vertical_flip(camera: &Camera) -> bool {
    camera.target_texture.is_none()
        || matches!(camera.kind, CameraKind::SceneView | CameraKind::Preview)
}

/// Build the draw for one device-described blit region
///
/// sRGB conversion is requested only when the display wants encoded
/// output and the source stores linear values.
pub fn draw_for_parameter(param: &BlitParameter, flip_vertical: bool, display_srgb: bool) -> BlitDraw {
    BlitDraw {
        source: param.source,
        source_dimension: param.source_dimension,
        array_slice: param.array_slice,
        scale_bias: source_scale_bias(param.source_rect, flip_vertical),
        scale_bias_rt: dest_scale_bias(param.dest_rect),
        srgb_read: display_srgb && !param.source_srgb,
    }
}
