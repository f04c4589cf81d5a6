//! Display device abstraction
//!
//! This module defines the traits a head-mounted display integration must
//! implement for the layout planner and mirror compositor to drive it.
//! Devices describe their per-frame pass layout as capabilities; the
//! planner turns those into render passes without ever owning device
//! resources.

use crate::api::handles::TargetHandle;
use crate::api::recorder::BlitRecorder;
use crate::foundation::math::Rect;
use crate::primitives::camera::Camera;
use crate::primitives::culling::CullingParameters;
use crate::primitives::target::{RenderTargetDesc, TextureDimension};
use crate::primitives::view::RenderView;

/// One pass the device wants rendered, as the device describes it
///
/// A capability pass with `view_count == 2` into a two-layer array target
/// is a candidate for single-pass rendering; the planner decides whether
/// the layout actually qualifies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassCapability {
    /// Target the device expects this pass to render into
    pub render_target: TargetHandle,

    /// Shape of that target
    pub target_desc: RenderTargetDesc,

    /// Which device culling pass supplies culling data for this pass
    pub culling_pass_index: u32,

    /// Number of views the device wants rendered in this pass
    pub view_count: u32,
}

/// Frame-constant state pushed to the device before layout is read
///
/// The push is idempotent; the system re-applies it every frame with the
/// active camera's clip planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceGlobals {
    /// Texture layout the renderer produces for stereo targets
    pub texture_layout: TextureDimension,

    /// Near clip distance of the active camera
    pub z_near: f32,

    /// Far clip distance of the active camera
    pub z_far: f32,

    /// Whether composited output should be sRGB-encoded
    pub srgb: bool,

    /// Disable any device-internal compatibility render path; the layout
    /// produced here is authoritative
    pub disable_legacy_path: bool,
}

/// How the device prefers its mirror view composited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorBlitMode {
    /// Device default (usually both eyes, device-arranged)
    Default,

    /// Left eye only
    LeftEye,

    /// Right eye only
    RightEye,

    /// Both eyes side by side
    SideBySide,
}

impl Default for MirrorBlitMode {
    fn default() -> Self {
        Self::Default
    }
}

/// One source region the mirror compositor should copy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlitParameter {
    /// Texture to sample from
    pub source: TargetHandle,

    /// Dimensionality of the source texture
    pub source_dimension: TextureDimension,

    /// Whether the source stores sRGB-encoded values
    pub source_srgb: bool,

    /// Array slice to sample when the source is a texture array
    pub array_slice: i32,

    /// Source region in normalized texture coordinates
    pub source_rect: Rect,

    /// Destination region in normalized target coordinates
    pub dest_rect: Rect,
}

/// Device's answer to "how do I composite your mirror view?"
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorBlitDescriptor {
    /// The device can perform the blit itself on the graphics thread
    pub native_blit_available: bool,

    /// The native blit may leave graphics state invalidated
    pub native_blit_invalid_states: bool,

    /// Manual blit regions, used when no native blit is available
    pub parameters: Vec<BlitParameter>,
}

/// A connected head-mounted display
///
/// All queries are cheap and answer from the device's current state;
/// none of them block on the device runtime.
pub trait DisplayDevice {
    /// Whether the device session is active and accepting frames
    fn running(&self) -> bool;

    /// Number of passes in the device's current frame layout
    fn pass_count(&self) -> usize;

    /// Describe one pass of the device's frame layout
    fn pass_capability(&self, pass_index: usize) -> PassCapability;

    /// Compute one view's rendering parameters for the given camera
    fn view_parameter(&self, camera: &Camera, pass_index: usize, view_index: usize) -> RenderView;

    /// Compute culling parameters for the given camera and culling pass
    fn culling_parameters(&self, camera: &Camera, culling_pass_index: u32) -> CullingParameters;

    /// Push frame-constant state to the device
    fn apply_globals(&mut self, globals: &DeviceGlobals);

    /// Set the MSAA sample count for device-allocated targets
    fn set_msaa_samples(&mut self, samples: u32);

    /// Set the resolution scale for device-allocated targets
    fn set_render_scale(&mut self, scale: f32);

    /// The mirror composition mode the device prefers
    fn preferred_blit_mode(&self) -> MirrorBlitMode;

    /// Describe how to composite the mirror view for the given mode
    ///
    /// Returns `None` when the device has nothing to mirror this frame.
    fn mirror_blit_descriptor(&self, mode: MirrorBlitMode) -> Option<MirrorBlitDescriptor>;

    /// Record the device's own mirror blit into the recorder
    ///
    /// Only called when the blit descriptor advertised
    /// `native_blit_available`.
    fn record_native_blit(
        &self,
        recorder: &mut dyn BlitRecorder,
        allow_state_invalidate: bool,
        mode: MirrorBlitMode,
    );
}

/// Source of connected display devices
///
/// The system polls this once per entry point. More than one connected
/// device is unsupported and reported as an error by the system.
pub trait DisplayProvider {
    /// Number of currently connected devices
    fn display_count(&self) -> usize;

    /// Borrow a connected device
    fn display(&self, index: usize) -> &dyn DisplayDevice;

    /// Borrow a connected device mutably
    fn display_mut(&mut self, index: usize) -> &mut dyn DisplayDevice;
}

/// Any growable list of devices works as a provider
impl<D: DisplayDevice> DisplayProvider for Vec<D> {
    fn display_count(&self) -> usize {
        self.len()
    }

    fn display(&self, index: usize) -> &dyn DisplayDevice {
        &self[index]
    }

    fn display_mut(&mut self, index: usize) -> &mut dyn DisplayDevice {
        &mut self[index]
    }
}
