//! Temporary render-target pooling

use crate::api::handles::TargetHandle;
use crate::primitives::target::RenderTargetDesc;

/// Source of short-lived render targets
///
/// The layout system acquires at most one temporary target per frame (the
/// deterministic-layout composition target) and returns it when the frame
/// is released. Implementations are free to recycle released targets.
pub trait TargetPool {
    /// Acquire a target matching the description
    fn acquire(&mut self, desc: &RenderTargetDesc) -> TargetHandle;

    /// Return a previously acquired target
    fn release(&mut self, handle: TargetHandle);
}
