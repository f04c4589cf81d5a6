//! Mirror-view compositing
//!
//! Copies the composited stereo output to a conventional 2D surface: the
//! backbuffer in a standalone player, or an explicit camera target in
//! editor-style hosts. Devices either record the copy themselves (native
//! blit) or describe source regions the compositor turns into textured
//! quad draws with the correct scale, offset and vertical orientation.

pub mod blit;
pub mod compositor;

use crate::api::handles::MaterialHandle;
use crate::api::recorder::{BlitRecorder, RenderTargetBinding};
use crate::primitives::camera::Camera;

pub use compositor::MirrorCompositor;

/// Everything a mirror callback needs to know about this composite
///
/// Handed to [`CustomMirrorView::render`] by value; the flip decision and
/// destination are already resolved so callbacks apply the same
/// orientation rule as device compositing.
#[derive(Clone, Copy)]
pub struct MirrorViewContext<'a> {
    /// Camera whose output surface is being composited to
    pub camera: &'a Camera,

    /// Resolved destination of the composite
    pub destination: RenderTargetBinding,

    /// Whether the copied image must be flipped vertically
    pub flip_vertical: bool,

    /// Whether the destination expects sRGB-encoded output
    pub display_srgb: bool,

    /// Material bound for mirror-view draws
    pub material: MaterialHandle,
}

/// Per-pass replacement for device mirror compositing
///
/// When any active pass carries one of these, the compositor invokes the
/// callbacks instead of querying the device's blit descriptor.
pub trait CustomMirrorView {
    /// Record this pass's mirror composite
    fn render(&self, ctx: MirrorViewContext<'_>, recorder: &mut dyn BlitRecorder);
}
