//! Runtime settings context
//!
//! Mutable state that used to hide in globals lives here as an explicit
//! value owned by the system. The control loop reads and writes it
//! between frames; per-frame code only reads.

use crate::config::DisplayConfig;

/// Runtime settings of the stereo display system
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    max_views: u32,

    /// MSAA sample count requested for device-allocated targets
    pub msaa_samples: u32,

    /// Resolution scale applied to device-allocated targets
    pub render_scale: f32,

    /// Vertical sync state; forced off while a device paces frame timing
    pub vsync_enabled: bool,

    /// Whether mirror output should be sRGB-encoded
    pub srgb_output: bool,

    /// Deterministic layouts may be injected when no device is attached
    pub test_mode: bool,

    /// An automated rendering test is running right now
    pub automated_test_running: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            max_views: 1,
            msaa_samples: 1,
            render_scale: 1.0,
            vsync_enabled: true,
            srgb_output: true,
            test_mode: false,
            automated_test_running: false,
        }
    }
}

impl DisplaySettings {
    /// Build runtime settings from an on-disk configuration
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self {
            max_views: if config.test_mode { 2 } else { 1 },
            msaa_samples: config.msaa_samples,
            render_scale: config.render_scale,
            vsync_enabled: config.vsync,
            srgb_output: config.srgb_output,
            test_mode: config.test_mode,
            automated_test_running: false,
        }
    }

    /// Most views any single pass may carry, as observed so far
    ///
    /// Renderers size per-view GPU resources from this, so it only ever
    /// grows: once a two-view device (or test mode) has been seen, the
    /// bound stays at two even after the device detaches.
    pub fn max_views(&self) -> u32 {
        self.max_views
    }

    /// Raise the view bound; lower values are ignored
    pub fn raise_max_views(&mut self, views: u32) {
        if views > self.max_views {
            log::info!("Maximum views raised from {} to {}", self.max_views, views);
            self.max_views = views;
        }
    }
}
