//! # Scene Camera
//!
//! Camera abstraction consumed by the layout planner and mirror
//! compositor.
//!
//! ## Design Principles
//! - **Library-agnostic**: No direct GPU dependencies in camera math
//! - **Immutable operation**: Matrix getters never modify camera state
//! - **Plain data**: Layout code reads fields, it does not drive the camera

use crate::api::handles::TargetHandle;
use crate::foundation::math::{Mat4, Mat4Ext, Rect, Vec3, utils};
use crate::primitives::target::RenderTargetDesc;

/// What role a camera plays in the scene
///
/// The layout planner only produces device layouts for game-role cameras;
/// editor-style cameras always take the conventional single-view path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraKind {
    /// Regular in-game camera
    Game,

    /// Camera driven directly by a headset
    Vr,

    /// Editor scene navigation camera
    SceneView,

    /// Asset or material preview camera
    Preview,

    /// Reflection probe capture camera
    Reflection,
}

impl CameraKind {
    /// Whether this camera renders gameplay (and may target a display device)
    pub const fn is_game(self) -> bool {
        matches!(self, Self::Game | Self::Vr)
    }
}

/// 3D camera with perspective projection
///
/// Represents a camera in 3D space with position, orientation and
/// projection parameters, plus the output-surface fields the stereo
/// layout cares about: role, render target and pixel rectangle.
///
/// # Coordinate System
/// Standard right-handed Y-up view space. Projection matrices follow the
/// Vulkan [0,1] depth convention used throughout `foundation::math`.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Field of view angle in radians
    pub fov: f32,

    /// Aspect ratio (width / height) for projection calculations
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,

    /// Role this camera plays in the scene
    pub kind: CameraKind,

    /// Whether this is the scene's designated primary camera
    pub primary: bool,

    /// Output rectangle in pixels
    pub pixel_rect: Rect,

    /// Explicit render target, or `None` to render to the backbuffer
    pub target_texture: Option<TargetHandle>,

    /// Description of the camera's output surface
    pub target_desc: RenderTargetDesc,
}

impl Camera {
    /// Create a new perspective game camera with standard Y-up orientation
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Field of view angle in degrees (converted to radians internally)
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// # Returns
    /// New Camera instance configured for perspective projection
    ///
    /// # Example
    /// ```rust
    /// use stereo_display::foundation::math::Vec3;
    /// use stereo_display::primitives::Camera;
    ///
    /// let camera = Camera::perspective(
    ///     Vec3::new(0.0, 1.7, 0.0),  // Eye height
    ///     75.0,                      // 75-degree field of view
    ///     16.0 / 9.0,                // Widescreen aspect ratio
    ///     0.1,                       // Near plane at 10cm
    ///     100.0,                     // Far plane at 100 meters
    /// );
    /// ```
    ///
    /// # Design Notes
    /// The default target is origin [0,0,0] and up vector is +Y [0,1,0].
    /// Role defaults to `Game`, output to the backbuffer, and the pixel
    /// rectangle to the unit rectangle until a real surface is assigned.
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
            kind: CameraKind::Game,
            primary: false,
            pixel_rect: Rect::unit(),
            target_texture: None,
            target_desc: RenderTargetDesc::default(),
        }
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Update camera target (look-at point)
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("Camera target updated to: {:?}", target);
    }

    /// Assign the output surface this camera renders to
    ///
    /// Sets the pixel rectangle to cover the surface and records its
    /// description. Pass a handle for an explicit render texture or `None`
    /// for the backbuffer.
    pub fn set_output(&mut self, target_texture: Option<TargetHandle>, desc: RenderTargetDesc) {
        self.target_texture = target_texture;
        self.target_desc = desc;
        self.pixel_rect = Rect::new(0.0, 0.0, desc.width as f32, desc.height as f32);
        if desc.height > 0 {
            self.aspect = desc.width as f32 / desc.height as f32;
        }
    }

    /// Generate view matrix for world-to-camera space transformation
    ///
    /// # Returns
    /// 4x4 view transformation matrix
    pub fn get_view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Generate perspective projection matrix
    ///
    /// # Returns
    /// 4x4 perspective projection matrix
    ///
    /// # Design Notes
    /// Uses the camera's own symmetric frustum. Device-supplied views carry
    /// their own (generally asymmetric) projections and do not use this.
    pub fn get_projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }
}
