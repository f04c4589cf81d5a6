//! Stereo render passes

use std::fmt;
use std::sync::Arc;

use crate::api::handles::MaterialHandle;
use crate::api::recorder::RenderTargetBinding;
use crate::foundation::math::Mat4;
use crate::mirror::CustomMirrorView;
use crate::primitives::culling::{CullingOptions, CullingParameters};
use crate::primitives::target::RenderTargetDesc;
use crate::primitives::view::RenderView;

/// Upper bound on views a single pass can carry
pub const MAX_VIEWS_PER_PASS: usize = 2;

/// Everything needed to create a pass except its views
///
/// Views are added after creation so combined and simple passes share one
/// construction path.
pub struct PassCreateInfo {
    /// Position of the pass in the frame, also its device capability index
    pub multipass_id: u32,

    /// Culling matrices and options for the pass
    pub culling: CullingParameters,

    /// Target the pass renders into
    pub render_target: RenderTargetBinding,

    /// Shape of that target
    pub target_desc: RenderTargetDesc,

    /// Material for rendering the device's hidden-area mesh, if any
    pub occlusion_mesh_material: Option<MaterialHandle>,

    /// Callback that replaces device mirror compositing for this pass
    pub custom_mirror: Option<Arc<dyn CustomMirrorView>>,
}

/// One render pass of a frame layout
///
/// A pass with two views renders both eyes in a single submission into
/// separate array slices; a pass with one view is a conventional render.
/// Passes are created by the layout system and read by the renderer; the
/// view list never changes size after planning except through
/// [`crate::StereoSystem::recompute_pass`].
#[derive(Clone)]
pub struct StereoPass {
    multipass_id: u32,
    culling: CullingParameters,
    render_target: RenderTargetBinding,
    target_desc: RenderTargetDesc,
    views: Vec<RenderView>,
    occlusion_mesh_material: Option<MaterialHandle>,
    custom_mirror: Option<Arc<dyn CustomMirrorView>>,
    enabled: bool,
}

impl StereoPass {
    /// Create an enabled pass with no views yet
    pub fn new(info: PassCreateInfo) -> Self {
        Self {
            multipass_id: info.multipass_id,
            culling: info.culling,
            render_target: info.render_target,
            target_desc: info.target_desc,
            views: Vec::with_capacity(MAX_VIEWS_PER_PASS),
            occlusion_mesh_material: info.occlusion_mesh_material,
            custom_mirror: info.custom_mirror,
            enabled: true,
        }
    }

    /// The disabled placeholder pass used for non-stereo cameras
    ///
    /// Created once at system construction and reused for the lifetime of
    /// the process; frame release never drops it.
    pub fn sentinel() -> Self {
        Self {
            multipass_id: 0,
            culling: CullingParameters::new(
                Mat4::identity(),
                Mat4::identity(),
                CullingOptions::empty(),
                0,
            ),
            render_target: RenderTargetBinding::Backbuffer,
            target_desc: RenderTargetDesc::default(),
            views: Vec::new(),
            occlusion_mesh_material: None,
            custom_mirror: None,
            enabled: false,
        }
    }

    /// Append a view to the pass
    pub(crate) fn add_view(&mut self, view: RenderView) {
        if self.views.len() >= MAX_VIEWS_PER_PASS {
            log::error!(
                "Trying to add more than {} views to a render pass",
                MAX_VIEWS_PER_PASS
            );
            return;
        }
        self.views.push(view);
    }

    /// Replace culling data and target from a refetched device capability
    pub(crate) fn rebind(
        &mut self,
        culling: CullingParameters,
        render_target: RenderTargetBinding,
        target_desc: RenderTargetDesc,
    ) {
        self.culling = culling;
        self.render_target = render_target;
        self.target_desc = target_desc;
        self.views.clear();
    }

    /// Whether the renderer should process this pass
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Position of the pass in the frame layout
    pub fn multipass_id(&self) -> u32 {
        self.multipass_id
    }

    /// Device culling pass backing this pass
    pub fn culling_pass_index(&self) -> u32 {
        self.culling.culling_pass_index
    }

    /// Culling matrices and options
    pub fn culling(&self) -> &CullingParameters {
        &self.culling
    }

    /// Target the pass renders into
    pub fn render_target(&self) -> RenderTargetBinding {
        self.render_target
    }

    /// Shape of the render target
    pub fn target_desc(&self) -> &RenderTargetDesc {
        &self.target_desc
    }

    /// Views rendered by this pass, in slice order
    pub fn views(&self) -> &[RenderView] {
        &self.views
    }

    /// Number of views in this pass
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Whether both eyes render in one submission
    pub fn is_combined(&self) -> bool {
        self.views.len() == MAX_VIEWS_PER_PASS
    }

    /// Material for the device's hidden-area mesh, if any
    pub fn occlusion_mesh_material(&self) -> Option<MaterialHandle> {
        self.occlusion_mesh_material
    }

    /// Mirror-composition callback, if this pass carries one
    pub fn custom_mirror(&self) -> Option<&Arc<dyn CustomMirrorView>> {
        self.custom_mirror.as_ref()
    }
}

impl fmt::Debug for StereoPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StereoPass")
            .field("multipass_id", &self.multipass_id)
            .field("enabled", &self.enabled)
            .field("view_count", &self.views.len())
            .field("render_target", &self.render_target)
            .field("custom_mirror", &self.custom_mirror.is_some())
            .finish_non_exhaustive()
    }
}
