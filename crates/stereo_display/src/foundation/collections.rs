//! Specialized collection types

use slotmap::{Key, KeyData};

pub use slotmap::{DefaultKey, SlotMap};

/// Handle-based map using slot map for stable references
pub type HandleMap<T> = SlotMap<DefaultKey, T>;

/// Handle type for stable references
pub type Handle = DefaultKey;

/// Convert a handle to its raw integer form
///
/// The raw form round-trips through [`handle_from_raw`] and is what the
/// opaque API-boundary handle newtypes carry.
pub fn handle_to_raw(handle: Handle) -> u64 {
    handle.data().as_ffi()
}

/// Rebuild a handle from its raw integer form
pub fn handle_from_raw(raw: u64) -> Handle {
    Handle::from(KeyData::from_ffi(raw))
}
