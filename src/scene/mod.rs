// scene/mod.rs

pub mod camera;
pub mod math;
pub mod transform;

pub use camera::{Camera, CameraParams};
pub use math::{find_look_at_rotation, in_range, interp, interp_vec3, rotation_from_x_vector, to_quat};
pub use transform::{compose_matrix, decompose_matrix, Transform};
