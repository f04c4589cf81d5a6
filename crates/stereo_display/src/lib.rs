//! # Stereo Display
//!
//! Render-pass layout and mirror compositing for head-mounted displays.
//!
//! ## Features
//!
//! - **Pass Planning**: one combined two-view pass when the device
//!   supports it, simple per-view passes otherwise
//! - **Frame Lifecycle**: explicit setup/release with stale-frame
//!   recovery
//! - **Mirror Compositing**: native or material-driven copies of the
//!   stereo output to a conventional 2D surface
//! - **Deterministic Test Layout**: a synthetic two-view frame for
//!   automated tests without hardware
//! - **Backend-Agnostic**: display devices, target pools and draw
//!   recorders are traits the host renderer implements
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stereo_display::prelude::*;
//!
//! fn render_frame(system: &mut StereoSystem, camera: &Camera) {
//!     match system.setup_frame(camera) {
//!         Ok(passes) => {
//!             for pass in passes.iter().filter(|pass| pass.enabled()) {
//!                 for view in pass.views() {
//!                     // Render the scene once per view, instanced when
//!                     // the pass is combined
//!                     let _ = (view.projection, view.view, view.viewport);
//!                 }
//!             }
//!         }
//!         Err(err) => log::error!("Frame layout failed: {}", err),
//!     }
//!     system.release_frame();
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Integration seams implemented by the host renderer
pub mod api;

pub mod config;
pub mod foundation;
pub mod layout;
pub mod mirror;
pub mod pool;
pub mod primitives;
pub mod settings;

mod system;

pub use system::{DisplayError, DisplayResult, LayoutStats, StereoSystem};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        api::{
            BlitRecorder, DisplayDevice, DisplayProvider, MaterialHandle, TargetHandle, TargetPool,
        },
        config::{Config, DisplayConfig},
        foundation::math::{Mat4, Mat4Ext, Rect, Vec3, Vec4},
        layout::{StereoPass, MAX_VIEWS_PER_PASS},
        mirror::{CustomMirrorView, MirrorCompositor, MirrorViewContext},
        pool::TemporaryTargetPool,
        primitives::{Camera, CameraKind, RenderTargetDesc, RenderView, TextureDimension},
        settings::DisplaySettings,
        DisplayError, DisplayResult, LayoutStats, StereoSystem,
    };
}
