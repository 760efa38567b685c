use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::renderer::{Caps, GraphicsContext, ViewId};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraParams {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub width: f32,
    pub height: f32,
    pub near: f32,
    pub far: f32,
    pub look_at: Vec3,
    pub position: Vec3,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            fov: 45.0,
            width: 1280.0,
            height: 720.0,
            near: 0.001,
            far: 100.0,
            look_at: Vec3::ZERO,
            position: Vec3::new(0.0, 0.0, -5.0),
        }
    }
}

/// Left-handed perspective camera bound to one view id.
///
/// Matrices are only refreshed by `recalculate`; editing `params_mut`
/// alone does not touch them.
#[derive(Clone, Debug)]
pub struct Camera {
    params: CameraParams,
    view: Mat4,
    projection: Mat4,
    view_id: ViewId,
    homogeneous_depth: bool,
}

impl Camera {
    pub fn new(params: CameraParams, view_id: ViewId) -> Self {
        let mut camera = Self {
            params,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            view_id,
            homogeneous_depth: false,
        };
        camera.update_matrices(Caps::default());
        camera
    }

    /// Builds the camera and registers its matrices with the backend right away.
    pub fn with_context(ctx: &mut GraphicsContext, params: CameraParams, view_id: ViewId) -> Self {
        let mut camera = Self::new(params, view_id);
        camera.recalculate(ctx);
        camera
    }

    /// Recomputes view and projection and hands both to the backend.
    pub fn recalculate(&mut self, ctx: &mut GraphicsContext) {
        self.update_matrices(ctx.caps());
        ctx.backend_mut()
            .set_view_transform(self.view_id, &self.view, &self.projection);
    }

    fn update_matrices(&mut self, caps: Caps) {
        self.homogeneous_depth = caps.homogeneous_depth;
        self.view = Mat4::look_at_lh(self.params.position, self.params.look_at, Vec3::Y);
        self.projection = perspective_lh(
            self.params.fov,
            self.params.width / self.params.height,
            self.params.near,
            self.params.far,
            self.homogeneous_depth,
        );
    }

    pub fn params(&self) -> &CameraParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut CameraParams {
        &mut self.params
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    pub fn view_id(&self) -> ViewId {
        self.view_id
    }

    /// Point `depth` units from the camera along the ray through `screen`
    /// (origin at the bottom-left corner of the viewport).
    pub fn screen_to_world(&self, screen: Vec2, depth: f32) -> Vec3 {
        let ndc = Vec4::new(
            2.0 * screen.x / self.params.width - 1.0,
            2.0 * screen.y / self.params.height - 1.0,
            1.0,
            1.0,
        );
        let world = self.view_projection().inverse() * ndc;
        let far_point = world.truncate() / world.w;
        let origin = self.params.position;
        (far_point - origin).normalize_or_zero() * depth + origin
    }
}

/// Left-handed projection with a vertical fov in degrees. `homogeneous_depth`
/// selects a [-1, 1] clip depth range instead of [0, 1].
pub fn perspective_lh(fov: f32, aspect: f32, near: f32, far: f32, homogeneous_depth: bool) -> Mat4 {
    let h = 1.0 / (fov.to_radians() * 0.5).tan();
    let w = h / aspect;
    let diff = far - near;
    let (aa, bb) = if homogeneous_depth {
        ((far + near) / diff, 2.0 * far * near / diff)
    } else {
        let aa = far / diff;
        (aa, near * aa)
    };
    Mat4::from_cols(
        Vec4::new(w, 0.0, 0.0, 0.0),
        Vec4::new(0.0, h, 0.0, 0.0),
        Vec4::new(0.0, 0.0, aa, 1.0),
        Vec4::new(0.0, 0.0, -bb, 0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::recording::{Command, RecordingBackend};

    #[test]
    fn projection_matches_glam_for_zero_to_one_depth() {
        let p = perspective_lh(60.0, 16.0 / 9.0, 0.1, 100.0, false);
        let expected = Mat4::perspective_lh(60f32.to_radians(), 16.0 / 9.0, 0.1, 100.0);
        assert!(p.abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn homogeneous_depth_maps_near_plane_to_minus_one() {
        let p = perspective_lh(45.0, 1.0, 1.0, 10.0, true);
        let near = p * Vec4::new(0.0, 0.0, 1.0, 1.0);
        assert!((near.z / near.w + 1.0).abs() < 1e-5);
        let far = p * Vec4::new(0.0, 0.0, 10.0, 1.0);
        assert!((far.z / far.w - 1.0).abs() < 1e-5);
    }

    #[test]
    fn view_proj_is_reasonable() {
        let params = CameraParams {
            near: 0.1,
            ..CameraParams::default()
        };
        let cam = Camera::new(params, 0);
        let vp = cam.view_projection();
        let id = vp * vp.inverse();
        assert!(id.abs_diff_eq(Mat4::IDENTITY, 1e-3));
    }

    #[test]
    fn recalculate_registers_matrices_for_its_view() {
        let backend = RecordingBackend::with_caps(Caps {
            homogeneous_depth: true,
        });
        let log = backend.log();
        let mut ctx = GraphicsContext::new(Box::new(backend));
        let cam = Camera::with_context(&mut ctx, CameraParams::default(), 2);

        match log.snapshot().last() {
            Some(Command::SetViewTransform {
                view, projection, ..
            }) => {
                assert_eq!(*view, 2);
                assert_eq!(*projection, cam.projection_matrix());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn screen_center_maps_onto_the_look_direction() {
        let params = CameraParams {
            near: 0.1,
            ..CameraParams::default()
        };
        let cam = Camera::new(params, 0);
        let p = cam.screen_to_world(Vec2::new(params.width * 0.5, params.height * 0.5), 2.0);
        // camera at z = -5 looking at the origin
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -3.0), 1e-3));
    }
}
