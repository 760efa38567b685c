use glam::{Mat4, Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Translation * rotation * scale.
    pub fn matrix(&self) -> Mat4 {
        compose_matrix(self)
    }
}

/// Builds `T * R * S`, so points are scaled, then rotated, then moved.
pub fn compose_matrix(transform: &Transform) -> Mat4 {
    Mat4::from_translation(transform.position)
        * Mat4::from_quat(transform.rotation)
        * Mat4::from_scale(transform.scale)
}

/// Splits an affine matrix back into position, rotation and scale.
/// A matrix with a zero `w` component is degenerate and yields identity.
pub fn decompose_matrix(matrix: &Mat4) -> Transform {
    if matrix.w_axis.w.abs() <= f32::EPSILON {
        return Transform::IDENTITY;
    }
    let (scale, rotation, position) = matrix.to_scale_rotation_translation();
    Transform {
        position,
        rotation,
        scale,
    }
}
