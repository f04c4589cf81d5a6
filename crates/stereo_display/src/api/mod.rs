//! Public integration API
//!
//! This module contains the seams a renderer implements to host the
//! stereo layout system: the display device and provider traits, the
//! blit recorder, the temporary-target pool and the opaque handle types
//! that cross those boundaries.

pub mod display_device;
pub mod handles;
pub mod recorder;
pub mod target_pool;

// Re-export commonly used types
pub use display_device::{
    BlitParameter, DeviceGlobals, DisplayDevice, DisplayProvider, MirrorBlitDescriptor,
    MirrorBlitMode, PassCapability,
};
pub use handles::{MaterialHandle, TargetHandle};
pub use recorder::{BlitDraw, BlitRecorder, MirrorBlitUniforms, RenderTargetBinding};
pub use target_pool::TargetPool;
