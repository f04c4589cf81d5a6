//! Render-target descriptions

use serde::{Deserialize, Serialize};

/// Dimensionality of a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureDimension {
    /// A single 2D texture
    Tex2d,

    /// A 2D texture array with one layer per slice
    Tex2dArray,
}

/// Shape of a render target as reported by a display device or carried by
/// a camera
///
/// This is a description, not a resource. Resource ownership stays with
/// whichever side of the API boundary created the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderTargetDesc {
    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Texture dimensionality
    pub dimension: TextureDimension,

    /// Number of array layers (1 for plain 2D targets)
    pub array_layers: u32,

    /// MSAA sample count (1 when multisampling is off)
    pub samples: u32,

    /// Whether the target stores sRGB-encoded values
    pub srgb: bool,
}

impl RenderTargetDesc {
    /// Create a plain 2D target description
    pub const fn new_2d(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            dimension: TextureDimension::Tex2d,
            array_layers: 1,
            samples: 1,
            srgb: false,
        }
    }

    /// Create a 2D array target description
    pub const fn new_2d_array(width: u32, height: u32, array_layers: u32) -> Self {
        Self {
            width,
            height,
            dimension: TextureDimension::Tex2dArray,
            array_layers,
            samples: 1,
            srgb: false,
        }
    }
}

impl Default for RenderTargetDesc {
    fn default() -> Self {
        Self::new_2d(1, 1)
    }
}
