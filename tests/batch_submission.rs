//! Batching end to end: geometry goes in through `Batch::add`, comes out as
//! index buffers and draw calls on the recording backend.

use std::rc::Rc;

use glam::{Quat, Vec3, Vec4};
use render_core::renderer::vertex::v;
use render_core::renderer::{
    Batch, BatchParams, CommandLog, Material, MaterialParams, Mesh, RecordingBackend, Renderer,
    Shader, Vertex,
};
use render_core::scene::{compose_matrix, Camera, CameraParams, Transform};
use render_core::settings::RendererSettings;

fn renderer() -> (Renderer, CommandLog) {
    let backend = RecordingBackend::new();
    let log = backend.log();
    let settings = RendererSettings {
        shader_dir: "no/shaders/here".into(),
        ..RendererSettings::default()
    };
    let mut renderer = Renderer::new(Box::new(backend), &settings);
    let (shaders, ctx) = renderer.shaders_mut();
    let uber = Shader::from_memory(ctx, "uber", b"uber-vs", b"uber-fs").unwrap();
    shaders.add(Rc::new(uber));
    (renderer, log)
}

fn material(renderer: &Renderer, color: Vec4) -> Rc<Material> {
    let mut material = Material::new(renderer.shaders(), MaterialParams::default()).unwrap();
    material.set_base_color_factor(color);
    Rc::new(material)
}

fn triangle() -> Vec<Vertex> {
    let n = [0.0, 0.0, -1.0];
    vec![
        v([0.0, 0.0, 0.0], n, [0.0, 0.0]),
        v([1.0, 0.0, 0.0], n, [1.0, 0.0]),
        v([0.0, 1.0, 0.0], n, [0.0, 1.0]),
    ]
}

#[test]
fn chunks_are_rebased_into_one_index_buffer() {
    let (mut renderer, log) = renderer();
    let mut batch = Batch::new(BatchParams::default(), Some(material(&renderer, Vec4::ONE)));

    batch
        .add(renderer.context_mut(), &triangle(), &[0, 1, 2])
        .unwrap();
    batch
        .add(renderer.context_mut(), &triangle(), &[2, 1, 0])
        .unwrap();
    batch.flush(renderer.context_mut()).unwrap();

    let buffers = log.index_buffers();
    assert_eq!(buffers.len(), 1);
    assert_eq!(buffers[0].1, vec![0, 1, 2, 5, 4, 3]);
}

fn quad() -> (Vec<Vertex>, Vec<u16>) {
    let n = [0.0, 0.0, -1.0];
    let vertices = vec![
        v([0.0, 0.0, 0.0], n, [0.0, 0.0]),
        v([1.0, 0.0, 0.0], n, [1.0, 0.0]),
        v([1.0, 1.0, 0.0], n, [1.0, 1.0]),
        v([0.0, 1.0, 0.0], n, [0.0, 1.0]),
    ];
    (vertices, vec![0, 1, 2, 3])
}

#[test]
fn overflowing_add_flushes_the_pending_quads_first() {
    let (mut renderer, log) = renderer();
    let params = BatchParams { max_data_count: 16 };
    let mut batch = Batch::new(params, Some(material(&renderer, Vec4::ONE)));
    let (vertices, indices) = quad();

    batch.add(renderer.context_mut(), &vertices, &indices).unwrap();
    batch.add(renderer.context_mut(), &vertices, &indices).unwrap();
    assert!(batch.batched_meshes().is_empty());

    // 16 pending + 8 more is over capacity.
    batch.add(renderer.context_mut(), &vertices, &indices).unwrap();
    assert_eq!(batch.batched_meshes().len(), 1);
    let flushed = &batch.batched_meshes()[0];
    assert_eq!(flushed.vertices().len(), 8);
    assert_eq!(flushed.indices(), &[0, 1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(batch.pending_vertices().len(), 4);
    assert_eq!(batch.pending_indices(), &[0, 1, 2, 3]);

    let camera = Camera::new(CameraParams::default(), 0);
    renderer.begin(&camera).unwrap();
    renderer.submit_batch(&mut batch, &Transform::IDENTITY);
    renderer.end();

    assert_eq!(batch.batched_meshes().len(), 2);
    assert_eq!(log.index_buffers().len(), 2);
    assert_eq!(log.submits().len(), 2);
}

#[test]
fn pending_data_never_exceeds_capacity() {
    let (mut renderer, _) = renderer();
    let params = BatchParams { max_data_count: 10 };
    let mut batch = Batch::new(params, Some(material(&renderer, Vec4::ONE)));
    let (vertices, indices) = quad();

    for _ in 0..3 {
        batch.add(renderer.context_mut(), &vertices, &indices).unwrap();
        assert!(batch.pending_vertices().len() + batch.pending_indices().len() <= 10);
        assert_eq!(batch.pending_indices(), &[0, 1, 2, 3]);
    }
    assert_eq!(batch.batched_meshes().len(), 2);
}

#[test]
fn flushing_an_empty_batch_adds_nothing() {
    let (mut renderer, log) = renderer();
    let mut batch = Batch::new(BatchParams::default(), Some(material(&renderer, Vec4::ONE)));
    let before = log.len();

    assert!(batch.flush(renderer.context_mut()).is_none());
    assert!(batch.batched_meshes().is_empty());
    assert_eq!(log.len(), before);
}

#[test]
fn oversized_chunk_is_rejected_without_side_effects() {
    let (mut renderer, _) = renderer();
    let params = BatchParams { max_data_count: 4 };
    let mut batch = Batch::new(params, Some(material(&renderer, Vec4::ONE)));

    let result = batch.add(renderer.context_mut(), &triangle(), &[0, 1, 2]);
    assert!(result.is_err());
    assert!(!batch.has_pending());
    assert!(batch.batched_meshes().is_empty());
}

#[test]
fn batch_without_material_draws_nothing() {
    let (mut renderer, log) = renderer();
    let mut batch = Batch::new(BatchParams::default(), None);
    batch
        .add(renderer.context_mut(), &triangle(), &[0, 1, 2])
        .unwrap();

    renderer.submit_batch(&mut batch, &Transform::IDENTITY);

    assert_eq!(batch.batched_meshes().len(), 1);
    assert!(log.submits().is_empty());
    assert_eq!(renderer.stats().skipped_meshes, 1);
}

#[test]
fn submitted_mesh_composes_outer_and_local_transforms() {
    let (mut renderer, log) = renderer();
    let local = Transform::new(
        Vec3::new(0.0, 1.0, 0.0),
        Quat::from_rotation_z(0.5),
        Vec3::splat(2.0),
    );
    let outer = Transform::new(
        Vec3::new(3.0, 0.0, -1.0),
        Quat::from_rotation_y(1.0),
        Vec3::ONE,
    );
    let material = material(&renderer, Vec4::ONE);
    let mesh = Mesh::new(renderer.context_mut(), triangle(), vec![0, 1, 2], Some(material))
        .with_transform(local);

    renderer.submit_mesh(&mesh, &outer);

    let submits = log.submits();
    assert_eq!(submits.len(), 1);
    let expected = compose_matrix(&outer) * compose_matrix(&local);
    assert!(submits[0].draw.transform.abs_diff_eq(expected, 1e-5));
}

#[test]
fn submissions_keep_call_order() {
    let (mut renderer, log) = renderer();
    let colors = [
        Vec4::new(1.0, 0.0, 0.0, 1.0),
        Vec4::new(0.0, 1.0, 0.0, 1.0),
        Vec4::new(0.0, 0.0, 1.0, 1.0),
    ];
    let meshes: Vec<Mesh> = colors
        .iter()
        .map(|&color| {
            let material = material(&renderer, color);
            Mesh::new(renderer.context_mut(), triangle(), vec![0, 1, 2], Some(material))
        })
        .collect();

    let camera = Camera::new(CameraParams::default(), 2);
    renderer.begin(&camera).unwrap();
    for mesh in &meshes {
        renderer.submit_mesh(mesh, &Transform::IDENTITY);
    }
    renderer.end();

    let factor = renderer.uniforms().base_color_factor();
    let submitted: Vec<Vec4> = log
        .submits()
        .iter()
        .map(|s| {
            assert_eq!(s.view, 2);
            s.draw
                .uniforms
                .iter()
                .find(|(handle, _)| *handle == factor)
                .map(|(_, value)| *value)
                .unwrap()
        })
        .collect();
    assert_eq!(submitted, colors.to_vec());
}
