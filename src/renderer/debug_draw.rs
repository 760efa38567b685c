// renderer/debug_draw.rs
use std::rc::Rc;

use glam::{Quat, Vec2, Vec3, Vec4};

use crate::scene::{find_look_at_rotation, to_quat, Transform};

use super::buffers::VertexArray;
use super::context::GraphicsContext;
use super::primitives::{self, Primitive};
use super::renderer::{Renderer, DEBUG_DRAW_SHADER};
use super::shader::Shader;
use super::state::StateFlags;

const ARROW_HEAD_SCALE: f32 = 0.05;
const GRID_SPACING: f32 = 2.0;

struct Shapes {
    cube: VertexArray,
    sphere: VertexArray,
    pyramid: VertexArray,
    quad: VertexArray,
    line: VertexArray,
    grid: VertexArray,
    circle: VertexArray,
}

impl Shapes {
    fn new(ctx: &mut GraphicsContext) -> Self {
        let mut upload = |p: Primitive| VertexArray::new(ctx, &p.vertices, &p.indices);
        Self {
            cube: upload(primitives::cube()),
            sphere: upload(primitives::sphere()),
            pyramid: upload(primitives::pyramid()),
            quad: upload(primitives::quad()),
            line: upload(primitives::line()),
            grid: upload(primitives::grid()),
            circle: upload(primitives::circle()),
        }
    }
}

/// Wireframe helper shapes drawn through the renderer as line strips.
///
/// Shapes are uploaded once at construction. Without a registered
/// `debugdraw` shader every draw call is a no-op.
pub struct DebugDraw {
    shapes: Shapes,
    shader: Option<Rc<Shader>>,
}

impl DebugDraw {
    pub fn new(renderer: &mut Renderer) -> Self {
        let shader = renderer.shaders().get(DEBUG_DRAW_SHADER);
        if shader.is_none() {
            log::warn!(
                "Shader '{}' is not loaded, debug drawing is disabled",
                DEBUG_DRAW_SHADER
            );
        }
        let shapes = Shapes::new(renderer.context_mut());
        log::info!("Debug draw allocated debug shapes");
        Self { shapes, shader }
    }

    pub fn is_enabled(&self) -> bool {
        self.shader.is_some()
    }

    fn draw_shape(
        &self,
        renderer: &mut Renderer,
        shape: &VertexArray,
        color: Vec4,
        transform: Transform,
    ) {
        let Some(shader) = self.shader.as_deref() else {
            return;
        };
        let color_uniform = renderer.uniforms().color();
        let backend = renderer.context_mut().backend_mut();
        backend.set_uniform(color_uniform, color);
        backend.set_state(StateFlags::DEFAULT | StateFlags::PT_LINESTRIP);
        renderer.submit_vertex_array_transform(shape, shader, &transform);
    }

    /// Pyramid with its base at `start` pointing toward `end`, sized by the distance.
    pub fn draw_pyramid(
        &self,
        renderer: &mut Renderer,
        color: Vec4,
        start: Vec3,
        end: Vec3,
        scale: Vec3,
    ) {
        let rotation = find_look_at_rotation(start, end) * to_quat(90.0, 90.0, 0.0);
        let scale = scale * (end - start).length();
        self.draw_shape(
            renderer,
            &self.shapes.pyramid,
            color,
            Transform::new(start, rotation, scale),
        );
    }

    pub fn draw_cube(
        &self,
        renderer: &mut Renderer,
        color: Vec4,
        position: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) {
        self.draw_shape(
            renderer,
            &self.shapes.cube,
            color,
            Transform::new(position, rotation, scale),
        );
    }

    pub fn draw_sphere(&self, renderer: &mut Renderer, color: Vec4, position: Vec3, radius: f32) {
        self.draw_shape(
            renderer,
            &self.shapes.sphere,
            color,
            Transform::new(position, Quat::IDENTITY, Vec3::splat(radius)),
        );
    }

    pub fn draw_quad(
        &self,
        renderer: &mut Renderer,
        color: Vec4,
        position: Vec3,
        rotation: Quat,
        scale: Vec2,
    ) {
        self.draw_shape(
            renderer,
            &self.shapes.quad,
            color,
            Transform::new(position, rotation, scale.extend(1.0)),
        );
    }

    /// `count` x `count` grid tiles laid flat on the XZ plane.
    pub fn draw_grid(&self, renderer: &mut Renderer, color: Vec4, position: Vec3, count: u32) {
        let flat = to_quat(90.0, 0.0, 0.0);
        for x in 0..count {
            for y in 0..count {
                let offset = Vec3::new(x as f32 * GRID_SPACING, 0.0, y as f32 * GRID_SPACING);
                self.draw_shape(
                    renderer,
                    &self.shapes.grid,
                    color,
                    Transform::new(position + offset, flat, Vec3::ONE),
                );
            }
        }
    }

    pub fn draw_line(&self, renderer: &mut Renderer, color: Vec4, start: Vec3, end: Vec3) {
        let rotation = find_look_at_rotation(start, end);
        let scale = Vec3::splat((end - start).length());
        self.draw_shape(
            renderer,
            &self.shapes.line,
            color,
            Transform::new(start, rotation, scale),
        );
    }

    pub fn draw_arrow(
        &self,
        renderer: &mut Renderer,
        color: Vec4,
        position: Vec3,
        direction: Vec3,
        length: f32,
    ) {
        let line_end = position + direction * length;
        self.draw_line(renderer, color, position, line_end);
        self.draw_pyramid(
            renderer,
            color,
            line_end,
            line_end + direction,
            Vec3::splat(ARROW_HEAD_SCALE),
        );
    }

    /// Red, green and blue lines along the world axes.
    pub fn draw_world_coord(&self, renderer: &mut Renderer, position: Vec3, scale: f32) {
        let axes = [
            (Vec4::new(1.0, 0.0, 0.0, 1.0), Vec3::X),
            (Vec4::new(0.0, 1.0, 0.0, 1.0), Vec3::Y),
            (Vec4::new(0.0, 0.0, 1.0, 1.0), Vec3::Z),
        ];
        for (color, axis) in axes {
            self.draw_line(renderer, color, position, position + axis * scale);
        }
    }

    pub fn draw_circle(
        &self,
        renderer: &mut Renderer,
        color: Vec4,
        position: Vec3,
        rotation: Quat,
        scale: Vec2,
    ) {
        self.draw_shape(
            renderer,
            &self.shapes.circle,
            color,
            Transform::new(position, rotation, scale.extend(0.0)),
        );
    }

    pub fn draw_text(&self, renderer: &mut Renderer, x: u16, y: u16, text: &str) {
        if self.is_enabled() {
            renderer.debug_text(x, y, text);
        }
    }
}
