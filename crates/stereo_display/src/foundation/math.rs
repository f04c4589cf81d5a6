//! Math utilities and types
//!
//! Provides fundamental math types for view and projection handling.

use serde::{Deserialize, Serialize};

pub use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Axis-aligned rectangle with origin at the lower-left corner
///
/// Used for viewports and blit source/destination regions. Units are
/// whatever the surrounding context uses (pixels for viewports,
/// normalized texture coordinates for blit rectangles).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Horizontal origin
    pub x: f32,

    /// Vertical origin
    pub y: f32,

    /// Width of the rectangle
    pub width: f32,

    /// Height of the rectangle
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from origin and size
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The full normalized texture rectangle (0,0)..(1,1)
    pub const fn unit() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::unit()
    }
}

/// Near-plane frustum extents of a perspective projection
///
/// `left`, `right`, `bottom` and `top` are signed distances from the view
/// axis measured on the near plane, so an asymmetric (off-center) frustum
/// is representable. Produced by [`Mat4Ext::decompose_projection`] and
/// consumed by [`Mat4Ext::frustum`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumPlanes {
    /// Left extent on the near plane (negative for centered frusta)
    pub left: f32,

    /// Right extent on the near plane
    pub right: f32,

    /// Bottom extent on the near plane (negative for centered frusta)
    pub bottom: f32,

    /// Top extent on the near plane
    pub top: f32,

    /// Near clip distance
    pub z_near: f32,

    /// Far clip distance
    pub z_far: f32,
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a perspective projection matrix
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create an off-center perspective projection matrix from near-plane
    /// frustum extents
    fn frustum(planes: FrustumPlanes) -> Mat4;

    /// Recover the near-plane frustum extents from a perspective
    /// projection matrix built by [`Mat4Ext::perspective`] or
    /// [`Mat4Ext::frustum`]
    fn decompose_projection(&self) -> FrustumPlanes;

    /// Create a look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        // Vulkan-style projection following Johannes Unterguggenberger's guide
        // https://johannesugb.github.io/gpu-programming/setting-up-a-proper-vulkan-projection-matrix/
        // Depth maps to [0,1] and the perspective divide runs on +Z.
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();

        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = far / (far - near);
        result[(2, 3)] = -(near * far) / (far - near);
        result[(3, 2)] = 1.0;

        result
    }

    fn frustum(planes: FrustumPlanes) -> Mat4 {
        // Off-center generalization of `perspective`, same depth range and
        // divide conventions. For a symmetric frustum the two agree.
        let FrustumPlanes {
            left,
            right,
            bottom,
            top,
            z_near,
            z_far,
        } = planes;

        let inv_width = 1.0 / (right - left);
        let inv_height = 1.0 / (top - bottom);

        let mut result = Mat4::zeros();

        result[(0, 0)] = 2.0 * z_near * inv_width;
        result[(0, 2)] = -(right + left) * inv_width;
        result[(1, 1)] = 2.0 * z_near * inv_height;
        result[(1, 2)] = -(top + bottom) * inv_height;
        result[(2, 2)] = z_far / (z_far - z_near);
        result[(2, 3)] = -(z_near * z_far) / (z_far - z_near);
        result[(3, 2)] = 1.0;

        result
    }

    fn decompose_projection(&self) -> FrustumPlanes {
        // Inverts the `frustum` construction above. Only valid for
        // matrices of that shape (finite far plane, [0,1] depth).
        let z_near = -self[(2, 3)] / self[(2, 2)];
        let z_far = self[(2, 2)] * z_near / (self[(2, 2)] - 1.0);

        let width = 2.0 * z_near / self[(0, 0)];
        let height = 2.0 * z_near / self[(1, 1)];
        let center_x = -self[(0, 2)] * width * 0.5;
        let center_y = -self[(1, 2)] * height * 0.5;

        FrustumPlanes {
            left: center_x - width * 0.5,
            right: center_x + width * 0.5,
            bottom: center_y - height * 0.5,
            top: center_y + height * 0.5,
            z_near,
            z_far,
        }
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        // Right-handed look-at matrix
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        let translation = Mat4::new(
            1.0, 0.0, 0.0, -eye.x,
            0.0, 1.0, 0.0, -eye.y,
            0.0, 0.0, 1.0, -eye.z,
            0.0, 0.0, 0.0, 1.0,
        );

        let rotation = Mat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        rotation * translation
    }
}
