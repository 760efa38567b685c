use std::rc::Rc;

use glam::{Quat, Vec3, Vec4};
use render_core::app::{Event, EventKind, Layer};
use render_core::renderer::vertex::v;
use render_core::renderer::{
    Batch, BatchParams, DebugDraw, Material, MaterialParams, RecordingBackend, Renderer, Shader,
};
use render_core::scene::{Camera, CameraParams, Transform};
use render_core::settings::EngineSettings;
use render_core::App;
use winit::keyboard::KeyCode;

const HEADLESS_FRAMES: u32 = 3;
const PLACEHOLDER_SHADERS: [&str; 2] = ["uber", "debugdraw"];

/// A strip of quads batched into one material, with debug overlays on top.
struct DemoLayer {
    batch_params: BatchParams,
    camera: Option<Camera>,
    batch: Option<Batch>,
    debug: Option<DebugDraw>,
    elapsed: f32,
}

impl DemoLayer {
    fn new(settings: &EngineSettings) -> Self {
        Self {
            batch_params: settings.batch,
            camera: None,
            batch: None,
            debug: None,
            elapsed: 0.0,
        }
    }

    fn register_placeholder_shaders(renderer: &mut Renderer) {
        let (shaders, ctx) = renderer.shaders_mut();
        for name in PLACEHOLDER_SHADERS {
            if shaders.contains(name) {
                continue;
            }
            match Shader::from_memory(ctx, name, name.as_bytes(), name.as_bytes()) {
                Ok(shader) => shaders.add(Rc::new(shader)),
                Err(err) => log::warn!("Placeholder shader '{}' rejected: {}", name, err),
            }
        }
    }

    fn build_batch(&self, renderer: &mut Renderer) -> Option<Batch> {
        let material = match Material::new(renderer.shaders(), MaterialParams::default()) {
            Ok(mut material) => {
                material.set_base_color_factor(Vec4::new(0.2, 0.6, 1.0, 1.0));
                Rc::new(material)
            }
            Err(err) => {
                log::error!("Demo material unavailable: {}", err);
                return None;
            }
        };

        let mut batch = Batch::new(self.batch_params, Some(material));
        let normal = [0.0, 0.0, -1.0];
        for i in 0..8 {
            let x = i as f32 * 1.5 - 6.0;
            let quad = [
                v([x, 0.0, 0.0], normal, [0.0, 0.0]),
                v([x + 1.0, 0.0, 0.0], normal, [1.0, 0.0]),
                v([x + 1.0, 1.0, 0.0], normal, [1.0, 1.0]),
                v([x, 1.0, 0.0], normal, [0.0, 1.0]),
            ];
            if let Err(err) = batch.add(renderer.context_mut(), &quad, &[0, 1, 2, 2, 3, 0]) {
                log::error!("Failed to batch quad {}: {}", i, err);
            }
        }
        Some(batch)
    }
}

impl Layer for DemoLayer {
    fn name(&self) -> &str {
        "demo"
    }

    fn on_attach(&mut self, renderer: &mut Renderer) {
        Self::register_placeholder_shaders(renderer);
        self.camera = Some(Camera::with_context(
            renderer.context_mut(),
            CameraParams {
                position: Vec3::new(0.0, 4.0, -12.0),
                ..CameraParams::default()
            },
            0,
        ));
        self.batch = self.build_batch(renderer);
        self.debug = Some(DebugDraw::new(renderer));
    }

    fn on_detach(&mut self, _renderer: &mut Renderer) {
        self.batch = None;
        self.debug = None;
        self.camera = None;
    }

    fn on_update(&mut self, renderer: &mut Renderer, dt: f32) {
        self.elapsed += dt;
        let Some(camera) = &self.camera else {
            return;
        };
        if let Err(err) = renderer.begin(camera) {
            log::error!("{}", err);
            return;
        }

        if let Some(batch) = &mut self.batch {
            let spin = Transform::new(Vec3::ZERO, Quat::from_rotation_y(self.elapsed), Vec3::ONE);
            renderer.submit_batch(batch, &spin);
        }
        if let Some(debug) = &self.debug {
            debug.draw_grid(renderer, Vec4::splat(0.5), Vec3::new(-8.0, 0.0, -8.0), 8);
            debug.draw_world_coord(renderer, Vec3::ZERO, 2.0);
            debug.draw_text(renderer, 1, 1, "render-core demo");
        }

        renderer.end();
    }

    fn on_event(&mut self, event: &mut Event) {
        if let EventKind::KeyPressed {
            key: KeyCode::Space,
            ..
        } = event.kind
        {
            self.elapsed = 0.0;
            event.handled = true;
        }
    }
}

fn main() {
    render_core::init_logging();

    let settings = EngineSettings::load();
    let headless = std::env::args().any(|arg| arg == "--headless");

    let backend = RecordingBackend::new();
    let commands = backend.log();
    let mut app = App::new(settings.clone(), Box::new(backend));
    app.push_layer(Box::new(DemoLayer::new(&settings)));

    if headless {
        for _ in 0..HEADLESS_FRAMES {
            app.update(1.0 / 60.0);
        }
        let stats = *app.renderer().last_frame_stats();
        log::info!(
            "Recorded {} commands, last frame: {} passes, {} draw calls",
            commands.len(),
            stats.passes,
            stats.draw_calls
        );
        app.shutdown();
    } else if let Err(err) = render_core::run(app) {
        eprintln!("Application error: {err}");
    }
}
