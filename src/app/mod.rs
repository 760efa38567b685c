// app/mod.rs
pub mod event;
pub mod layer;
pub mod window;

pub use event::{Event, EventKind, EventType};
pub use layer::{Layer, LayerStack};
pub use window::{translate_window_event, Window};

use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::WindowId,
};

use crate::renderer::{RenderBackend, Renderer};
use crate::settings::EngineSettings;

/// Owns the renderer, the window and the layer stack, and routes window
/// events through them.
pub struct App {
    settings: EngineSettings,
    renderer: Renderer,
    window: Option<Window>,
    layers: LayerStack,
    running: bool,
    minimized: bool,
    last_frame: Option<Instant>,
}

impl App {
    pub fn new(settings: EngineSettings, backend: Box<dyn RenderBackend>) -> Self {
        log::info!("Initializing application...");
        let mut renderer = Renderer::new(backend, &settings.renderer);
        renderer.resize(
            settings.window.width,
            settings.window.height,
            settings.window.reset_flags(),
        );
        Self {
            settings,
            renderer,
            window: None,
            layers: LayerStack::new(),
            running: true,
            minimized: false,
            last_frame: None,
        }
    }

    pub fn push_layer(&mut self, mut layer: Box<dyn Layer>) {
        layer.on_attach(&mut self.renderer);
        self.layers.push_layer(layer);
    }

    pub fn push_overlay(&mut self, mut overlay: Box<dyn Layer>) {
        overlay.on_attach(&mut self.renderer);
        self.layers.push_overlay(overlay);
    }

    pub fn pop_layer(&mut self, name: &str) -> Option<Box<dyn Layer>> {
        let mut layer = self.layers.pop_layer(name)?;
        layer.on_detach(&mut self.renderer);
        Some(layer)
    }

    pub fn pop_overlay(&mut self, name: &str) -> Option<Box<dyn Layer>> {
        let mut overlay = self.layers.pop_overlay(name)?;
        overlay.on_detach(&mut self.renderer);
        Some(overlay)
    }

    /// Handles close and resize itself, then offers the event to the layers
    /// from the top down until one of them marks it handled.
    pub fn on_event(&mut self, event: &mut Event) {
        event.dispatch(EventType::WindowClose, |_| {
            self.running = false;
            true
        });
        event.dispatch(EventType::WindowResize, |kind| {
            if let EventKind::WindowResize { width, height } = *kind {
                self.minimized = width == 0 || height == 0;
                if !self.minimized {
                    self.renderer
                        .resize(width, height, self.settings.window.reset_flags());
                }
            }
            false
        });

        for layer in self.layers.iter_mut().rev() {
            if event.handled {
                break;
            }
            layer.on_event(event);
        }
    }

    /// Updates every layer bottom to top, unless minimized, then ends the frame.
    pub fn update(&mut self, dt: f32) {
        if !self.minimized {
            for layer in self.layers.iter_mut() {
                layer.on_update(&mut self.renderer, dt);
            }
        }
        self.renderer.frame();
    }

    /// Detaches every layer and shuts the renderer down.
    pub fn shutdown(self) {
        let App {
            mut renderer,
            mut layers,
            window,
            ..
        } = self;
        for mut layer in layers.drain() {
            layer.on_detach(&mut renderer);
        }
        drop(window);
        renderer.shutdown();
        log::info!("Application shut down");
    }

    pub fn close(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn tick(&mut self) {
        let now = Instant::now();
        let dt = self
            .last_frame
            .map(|last| (now - last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        self.update(dt);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match Window::create(event_loop, &self.settings.window) {
            Ok(window) => {
                let (width, height) = window.size();
                let mut event = Event::new(EventKind::WindowResize { width, height });
                self.on_event(&mut event);
                window.request_redraw();
                self.window = Some(window);
            }
            Err(err) => {
                log::error!("Failed to create window: {}", err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window.as_ref().map(Window::id) != Some(id) {
            return;
        }

        if let WindowEvent::RedrawRequested = event {
            self.tick();
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        } else {
            for kind in translate_window_event(&event) {
                self.on_event(&mut Event::new(kind));
            }
        }

        if !self.running {
            event_loop.exit();
        }
    }
}
