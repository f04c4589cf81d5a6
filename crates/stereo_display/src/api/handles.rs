//! Opaque resource handles
//!
//! Resources referenced across the API boundary are identified by opaque
//! integer handles. The crate never dereferences them; it only threads
//! them between the display device, the target pool and the recorder.

/// Handle to a render target owned by the application or device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetHandle(pub u64);

/// Handle to a material (shader plus state) owned by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u64);
