//! Descriptor-keyed temporary target pool
//!
//! Reference [`TargetPool`] implementation used by the demo and tests.
//! Real renderers typically adapt their own transient-resource system
//! instead; nothing in the layout code depends on this type.

use crate::api::handles::TargetHandle;
use crate::api::target_pool::TargetPool;
use crate::foundation::collections::{handle_from_raw, handle_to_raw, HandleMap};
use crate::primitives::target::RenderTargetDesc;

struct PooledTarget {
    desc: RenderTargetDesc,
    in_use: bool,
}

/// Pool that recycles released targets by exact descriptor match
#[derive(Default)]
pub struct TemporaryTargetPool {
    targets: HandleMap<PooledTarget>,
}

impl TemporaryTargetPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self {
            targets: HandleMap::with_key(),
        }
    }

    /// Number of targets currently handed out
    pub fn live_count(&self) -> usize {
        self.targets.values().filter(|t| t.in_use).count()
    }

    /// Number of targets sitting in the pool awaiting reuse
    pub fn free_count(&self) -> usize {
        self.targets.values().filter(|t| !t.in_use).count()
    }

    /// Look up the description a handle was acquired with
    pub fn describe(&self, handle: TargetHandle) -> Option<RenderTargetDesc> {
        self.targets.get(handle_from_raw(handle.0)).map(|t| t.desc)
    }
}

impl TargetPool for TemporaryTargetPool {
    fn acquire(&mut self, desc: &RenderTargetDesc) -> TargetHandle {
        // Reuse a released target with the same shape before growing
        let recycled = self
            .targets
            .iter_mut()
            .find(|(_, t)| !t.in_use && t.desc == *desc);
        if let Some((key, slot)) = recycled {
            slot.in_use = true;
            return TargetHandle(handle_to_raw(key));
        }

        let key = self.targets.insert(PooledTarget {
            desc: *desc,
            in_use: true,
        });
        TargetHandle(handle_to_raw(key))
    }

    fn release(&mut self, handle: TargetHandle) {
        match self.targets.get_mut(handle_from_raw(handle.0)) {
            Some(target) => target.in_use = false,
            None => log::warn!("Released unknown temporary target: {:?}", handle),
        }
    }
}
