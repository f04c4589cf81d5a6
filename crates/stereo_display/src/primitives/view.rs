//! Per-view rendering parameters

use crate::foundation::math::{Mat4, Rect};
use crate::primitives::camera::Camera;

/// Array slice value for views that do not render into a texture array
pub const NO_ARRAY_SLICE: i32 = -1;

/// A single eye's worth of rendering parameters
///
/// Views are immutable once constructed. A pass carrying two views renders
/// both in one submission (instanced into separate array slices); a pass
/// carrying one view is a conventional render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Projection matrix for this view
    pub projection: Mat4,

    /// View (world-to-eye) matrix for this view
    pub view: Mat4,

    /// Viewport in target pixels
    pub viewport: Rect,

    /// Target array slice, or [`NO_ARRAY_SLICE`] when the view is not
    /// backed by a texture array
    pub array_slice: i32,
}

impl RenderView {
    /// Create a view from explicit matrices
    pub const fn new(projection: Mat4, view: Mat4, viewport: Rect, array_slice: i32) -> Self {
        Self {
            projection,
            view,
            viewport,
            array_slice,
        }
    }

    /// Create a view from a camera's own matrices and pixel rectangle
    ///
    /// The resulting view is not array-backed; callers that target a
    /// specific slice construct the view with [`RenderView::new`].
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            projection: camera.get_projection_matrix(),
            view: camera.get_view_matrix(),
            viewport: camera.pixel_rect,
            array_slice: NO_ARRAY_SLICE,
        }
    }
}
