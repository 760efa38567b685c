//! Small angle and interpolation helpers used by the camera and debug shapes.

use glam::{Mat3, Quat, Vec3};

const SMALL_NUMBER: f32 = 1.0e-8;

/// Euler angles in degrees to a quaternion, applied roll(Z) * yaw(Y) * pitch(X).
pub fn to_quat(pitch: f32, yaw: f32, roll: f32) -> Quat {
    Quat::from_rotation_z(roll.to_radians())
        * Quat::from_rotation_y(yaw.to_radians())
        * Quat::from_rotation_x(pitch.to_radians())
}

/// Rotation that maps +X onto `direction`, keeping +Y up where possible.
pub fn rotation_from_x_vector(direction: Vec3) -> Quat {
    let new_x = direction.normalize_or_zero();
    if new_x == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let up = if new_x.y.abs() < 1.0 - SMALL_NUMBER {
        Vec3::Y
    } else {
        Vec3::X
    };
    let new_y = up.cross(new_x).normalize();
    let new_z = new_x.cross(new_y);
    Quat::from_mat3(&Mat3::from_cols(new_x, new_y, new_z))
}

pub fn find_look_at_rotation(start: Vec3, target: Vec3) -> Quat {
    rotation_from_x_vector(target - start)
}

/// Exclusive on both ends.
pub fn in_range(value: f32, min: f32, max: f32) -> bool {
    value > min && value < max
}

/// Moves `current` toward `target` by at most `speed * dt`.
pub fn interp(current: f32, target: f32, speed: f32, dt: f32) -> f32 {
    let dist = target - current;
    if dist.abs() < SMALL_NUMBER {
        return target;
    }
    let step = speed * dt;
    current + dist.clamp(-step, step)
}

pub fn interp_vec3(current: Vec3, target: Vec3, speed: f32, dt: f32) -> Vec3 {
    let delta = target - current;
    let dist = delta.length();
    if dist < SMALL_NUMBER {
        return target;
    }
    let step = speed * dt;
    if dist <= step {
        target
    } else {
        current + delta / dist * step
    }
}
