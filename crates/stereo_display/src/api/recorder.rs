//! Draw recording abstraction for mirror compositing
//!
//! The compositor does not talk to a GPU. It records an ordered sequence
//! of target binds, clears and textured-quad draws into a [`BlitRecorder`]
//! supplied by the renderer, which replays them with whatever command
//! encoding it uses.

use bytemuck::{Pod, Zeroable};

use crate::api::handles::{MaterialHandle, TargetHandle};
use crate::foundation::math::{Rect, Vec4};
use crate::primitives::target::TextureDimension;

/// Where recorded draws land
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTargetBinding {
    /// The default presentation surface
    Backbuffer,

    /// An explicit render target
    Texture(TargetHandle),
}

/// One textured-quad blit, fully described
///
/// Built fresh for every draw; nothing here persists between draws, so a
/// recorder may capture it by value or upload it immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlitDraw {
    /// Source texture to sample
    pub source: TargetHandle,

    /// Dimensionality of the source (selects the sampler variant)
    pub source_dimension: TextureDimension,

    /// Array slice to sample when the source is a texture array
    pub array_slice: i32,

    /// Source UV transform: xy = scale, zw = offset. A negative y scale
    /// flips the sampled image vertically.
    pub scale_bias: Vec4,

    /// Destination placement transform in the bound target, same layout
    pub scale_bias_rt: Vec4,

    /// Whether the shader should linearize sampled values before writing
    pub srgb_read: bool,
}

impl BlitDraw {
    /// Pack this draw into the GPU-uploadable uniform layout
    pub fn uniforms(&self) -> MirrorBlitUniforms {
        MirrorBlitUniforms {
            scale_bias: [
                self.scale_bias.x,
                self.scale_bias.y,
                self.scale_bias.z,
                self.scale_bias.w,
            ],
            scale_bias_rt: [
                self.scale_bias_rt.x,
                self.scale_bias_rt.y,
                self.scale_bias_rt.z,
                self.scale_bias_rt.w,
            ],
            array_slice: self.array_slice,
            srgb_read: u32::from(self.srgb_read),
            _padding: [0; 2],
        }
    }
}

/// Uniform block layout for the mirror-view shader
///
/// Matches a std140 uniform buffer: two vec4 transforms followed by the
/// slice index and sRGB-read switch.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct MirrorBlitUniforms {
    /// Source UV scale (xy) and offset (zw)
    pub scale_bias: [f32; 4],

    /// Destination scale (xy) and offset (zw)
    pub scale_bias_rt: [f32; 4],

    /// Source array slice (ignored for plain 2D sources)
    pub array_slice: i32,

    /// 1 when the shader should linearize sampled values
    pub srgb_read: u32,

    /// Pads the block to a 16-byte multiple
    pub _padding: [u32; 2],
}

/// Recorder the mirror compositor emits into
///
/// Implementations replay the calls in order on their command encoder.
/// Calls always arrive bracketed by one marker pair per compositor entry.
pub trait BlitRecorder {
    /// Open a named debug region
    fn begin_marker(&mut self, label: &str);

    /// Close the most recent debug region
    fn end_marker(&mut self);

    /// Bind the target subsequent draws and clears write to
    fn set_render_target(&mut self, target: RenderTargetBinding);

    /// Set the output viewport in pixels of the bound target
    fn set_viewport(&mut self, viewport: Rect);

    /// Clear the bound target's color and depth
    fn clear(&mut self, color: [f32; 4]);

    /// Draw one full-screen quad with the given material and parameters
    fn blit(&mut self, material: MaterialHandle, draw: &BlitDraw);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec4;

    #[test]
    fn test_uniforms_preserve_transforms() {
        let draw = BlitDraw {
            source: TargetHandle(3),
            source_dimension: TextureDimension::Tex2dArray,
            array_slice: 1,
            scale_bias: Vec4::new(1.0, -0.5, 0.0, 0.75),
            scale_bias_rt: Vec4::new(0.5, 0.5, 0.25, 0.25),
            srgb_read: true,
        };

        let uniforms = draw.uniforms();

        assert_eq!(uniforms.scale_bias, [1.0, -0.5, 0.0, 0.75]);
        assert_eq!(uniforms.scale_bias_rt, [0.5, 0.5, 0.25, 0.25]);
        assert_eq!(uniforms.array_slice, 1);
        assert_eq!(uniforms.srgb_read, 1);
    }

    #[test]
    fn test_uniform_block_size_is_std140_aligned() {
        assert_eq!(std::mem::size_of::<MirrorBlitUniforms>(), 48);
    }
}
