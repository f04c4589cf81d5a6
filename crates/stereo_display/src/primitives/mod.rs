//! Rendering primitives
//!
//! Plain data types shared between the layout planner, the mirror
//! compositor and the display device seam: cameras, views, culling
//! parameters and render-target descriptions.

pub mod camera;
pub mod culling;
pub mod target;
pub mod view;

// Re-export commonly used types
pub use camera::{Camera, CameraKind};
pub use culling::{CullingOptions, CullingParameters};
pub use target::{RenderTargetDesc, TextureDimension};
pub use view::RenderView;
