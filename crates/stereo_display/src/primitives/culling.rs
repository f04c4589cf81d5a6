//! Culling parameters and option flags

use bitflags::bitflags;

use crate::foundation::math::Mat4;

bitflags! {
    /// Option bits attached to a culling pass
    ///
    /// `LEGACY_STEREO` marks culling output meant for the engine's old
    /// built-in stereo path. The layout planner owns stereo now and clears
    /// the bit on every pass it emits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CullingOptions: u32 {
        /// Run occlusion culling for this pass
        const OCCLUSION_CULL = 1 << 0;

        /// Gather shadow casters outside the view frustum
        const SHADOW_CASTERS = 1 << 1;

        /// Collect per-object light lists
        const NEEDS_LIGHTS = 1 << 2;

        /// Built-in stereo culling (superseded by explicit view lists)
        const LEGACY_STEREO = 1 << 3;
    }
}

/// Matrices and options a culling pass runs with
///
/// For a combined stereo pass these are the device's culling-dedicated
/// matrices (typically centered between the eyes), not either eye's own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CullingParameters {
    /// World-to-view matrix used for culling
    pub view: Mat4,

    /// Projection matrix used for culling
    pub projection: Mat4,

    /// Culling option flags
    pub options: CullingOptions,

    /// Device culling pass these parameters were derived from
    pub culling_pass_index: u32,
}

impl CullingParameters {
    /// Create culling parameters with the given matrices and options
    pub const fn new(
        view: Mat4,
        projection: Mat4,
        options: CullingOptions,
        culling_pass_index: u32,
    ) -> Self {
        Self {
            view,
            projection,
            options,
            culling_pass_index,
        }
    }
}
