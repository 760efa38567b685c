//! Pass bookkeeping, draw ordering and resource release through the public
//! renderer API, observed on the recording backend.

use std::rc::Rc;

use glam::{Mat4, Vec3};
use render_core::renderer::vertex::v;
use render_core::renderer::{
    Command, CommandLog, Material, MaterialParams, Mesh, RecordingBackend, Renderer,
    ResourceHandle, Shader, VertexArray, DEFAULT_VIEW,
};
use render_core::scene::{Camera, CameraParams, Transform};
use render_core::settings::RendererSettings;
use render_core::RenderError;

fn renderer() -> (Renderer, CommandLog) {
    let backend = RecordingBackend::new();
    let log = backend.log();
    let settings = RendererSettings {
        shader_dir: "no/shaders/here".into(),
        debug_shaders: false,
        ..RendererSettings::default()
    };
    (Renderer::new(Box::new(backend), &settings), log)
}

fn shader(renderer: &mut Renderer, name: &str) -> Rc<Shader> {
    let (shaders, ctx) = renderer.shaders_mut();
    let shader = Rc::new(Shader::from_memory(ctx, name, b"vs", b"fs").unwrap());
    shaders.add(Rc::clone(&shader));
    shader
}

fn vertex_array(renderer: &mut Renderer) -> VertexArray {
    let n = [0.0, 1.0, 0.0];
    let vertices = [
        v([0.0, 0.0, 0.0], n, [0.0, 0.0]),
        v([1.0, 0.0, 0.0], n, [1.0, 0.0]),
        v([0.0, 0.0, 1.0], n, [0.0, 1.0]),
    ];
    VertexArray::new(renderer.context_mut(), &vertices, &[0, 1, 2])
}

#[test]
fn vertex_arrays_are_drawn_in_submission_order() {
    let (mut renderer, log) = renderer();
    let shader = shader(&mut renderer, "simple");
    let arrays: Vec<VertexArray> = (0..3).map(|_| vertex_array(&mut renderer)).collect();

    let camera = Camera::new(CameraParams::default(), 3);
    renderer.begin(&camera).unwrap();
    for array in &arrays {
        renderer.submit_vertex_array(array, &shader);
    }
    renderer.end();

    let drawn: Vec<_> = log.submits().iter().map(|s| s.draw.vertex_buffer).collect();
    let expected: Vec<_> = arrays.iter().map(VertexArray::vertex_buffer).collect();
    assert_eq!(drawn, expected);
    assert!(log.submits().iter().all(|s| s.view == 3));
}

#[test]
fn submissions_outside_a_pass_use_the_default_view() {
    let (mut renderer, log) = renderer();
    let shader = shader(&mut renderer, "simple");
    let array = vertex_array(&mut renderer);

    renderer.submit_vertex_array(&array, &shader);
    let camera = Camera::new(CameraParams::default(), 5);
    renderer.begin(&camera).unwrap();
    renderer.submit_vertex_array(&array, &shader);
    renderer.end();
    renderer.submit_vertex_array(&array, &shader);

    let views: Vec<_> = log.submits().iter().map(|s| s.view).collect();
    assert_eq!(views, vec![DEFAULT_VIEW, 5, DEFAULT_VIEW]);
}

#[test]
fn passes_do_not_nest() {
    let (mut renderer, _) = renderer();
    let outer = Camera::new(CameraParams::default(), 1);
    let inner = Camera::new(CameraParams::default(), 2);

    renderer.begin(&outer).unwrap();
    match renderer.begin(&inner) {
        Err(RenderError::PassAlreadyActive { view }) => assert_eq!(view, 1),
        other => panic!("expected PassAlreadyActive, got {:?}", other),
    }
    renderer.end();
    renderer.begin(&inner).unwrap();
    assert_eq!(renderer.active_view(), 2);
}

#[test]
fn mesh_translation_reaches_the_backend() {
    let (mut renderer, log) = renderer();
    shader(&mut renderer, "uber");
    let material = Rc::new(Material::new(renderer.shaders(), MaterialParams::default()).unwrap());
    let n = [0.0, 1.0, 0.0];
    let vertices = vec![
        v([0.0, 0.0, 0.0], n, [0.0, 0.0]),
        v([1.0, 0.0, 0.0], n, [1.0, 0.0]),
        v([0.0, 0.0, 1.0], n, [0.0, 1.0]),
    ];
    let mesh = Mesh::new(renderer.context_mut(), vertices, vec![0, 1, 2], Some(material))
        .with_transform(Transform::from_position(Vec3::X));

    renderer.submit_mesh(&mesh, &Transform::IDENTITY);

    let bound = log.submits()[0].draw.transform;
    assert!(bound.abs_diff_eq(Mat4::from_translation(Vec3::X), 1e-6));
}

#[test]
fn mesh_without_material_issues_no_draw() {
    let (mut renderer, log) = renderer();
    let n = [0.0, 1.0, 0.0];
    let vertices = vec![v([0.0; 3], n, [0.0; 2]), v([1.0, 0.0, 0.0], n, [1.0, 0.0])];
    let mesh = Mesh::new(renderer.context_mut(), vertices, vec![0, 1], None);

    renderer.submit_mesh(&mesh, &Transform::IDENTITY);

    assert_eq!(log.count(|c| matches!(c, Command::Submit { .. })), 0);
    assert_eq!(renderer.stats().skipped_meshes, 1);
}

#[test]
fn dropped_buffers_are_destroyed_once_at_frame_end() {
    let (mut renderer, log) = renderer();
    let array = vertex_array(&mut renderer);
    let vertex_buffer = ResourceHandle::from(array.vertex_buffer());
    let index_buffer = ResourceHandle::from(array.index_buffer());

    drop(array);
    assert!(log.destroyed().is_empty());
    assert_eq!(renderer.context().pending_releases(), 2);

    renderer.frame();
    renderer.frame();

    let destroyed = log.destroyed();
    assert_eq!(destroyed.len(), 2);
    assert!(destroyed.contains(&vertex_buffer));
    assert!(destroyed.contains(&index_buffer));
}

#[test]
fn shutdown_releases_shaders_and_uniforms() {
    let (mut renderer, log) = renderer();
    shader(&mut renderer, "simple");
    log.clear();

    renderer.shutdown();

    let destroyed = log.destroyed();
    // program, two shader modules and the three standard uniforms
    assert_eq!(destroyed.len(), 6);
    assert_eq!(
        destroyed
            .iter()
            .filter(|h| matches!(h, ResourceHandle::Uniform(_)))
            .count(),
        3
    );
}

#[test]
fn debug_text_is_forwarded() {
    let (mut renderer, log) = renderer();
    renderer.debug_text(2, 4, "fps: 60");
    assert!(log.snapshot().contains(&Command::DebugText {
        x: 2,
        y: 4,
        text: "fps: 60".to_owned(),
    }));
}
