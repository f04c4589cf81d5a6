//! Frame layout
//!
//! Per-frame render pass construction: the device-driven planner, the
//! pass type itself and the deterministic layout used by automated
//! rendering tests.

pub mod pass;
pub(crate) mod planner;
pub(crate) mod test_mode;

// Re-export commonly used types
pub use pass::{PassCreateInfo, StereoPass, MAX_VIEWS_PER_PASS};
