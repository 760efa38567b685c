// app/window.rs
use winit::error::OsError;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{Window as WinitWindow, WindowId};

use crate::settings::WindowSettings;

use super::event::EventKind;

/// The one native window of an application.
pub struct Window {
    inner: WinitWindow,
    settings: WindowSettings,
}

impl Window {
    pub fn create(event_loop: &ActiveEventLoop, settings: &WindowSettings) -> Result<Self, OsError> {
        log::info!(
            "Creating window with name: {}, (Width: {}, Height: {})",
            settings.title,
            settings.width,
            settings.height
        );
        let attributes = WinitWindow::default_attributes()
            .with_title(settings.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(settings.width, settings.height));
        let inner = event_loop.create_window(attributes)?;
        Ok(Self {
            inner,
            settings: settings.clone(),
        })
    }

    pub fn id(&self) -> WindowId {
        self.inner.id()
    }

    pub fn size(&self) -> (u32, u32) {
        let size = self.inner.inner_size();
        (size.width, size.height)
    }

    pub fn request_redraw(&self) {
        self.inner.request_redraw();
    }

    pub fn settings(&self) -> &WindowSettings {
        &self.settings
    }
}

/// Converts one winit event into zero or more application events.
///
/// A key press that produces text yields the press followed by one
/// `KeyTyped` per character.
pub fn translate_window_event(event: &WindowEvent) -> Vec<EventKind> {
    match event {
        WindowEvent::CloseRequested => vec![EventKind::WindowClose],
        WindowEvent::Resized(size) => vec![EventKind::WindowResize {
            width: size.width,
            height: size.height,
        }],
        WindowEvent::KeyboardInput { event, .. } => {
            let PhysicalKey::Code(key) = event.physical_key else {
                return Vec::new();
            };
            match event.state {
                ElementState::Pressed => {
                    let mut events = vec![EventKind::KeyPressed {
                        key,
                        repeat_count: u32::from(event.repeat),
                    }];
                    if let Some(text) = &event.text {
                        events.extend(text.chars().map(EventKind::KeyTyped));
                    }
                    events
                }
                ElementState::Released => vec![EventKind::KeyReleased { key }],
            }
        }
        WindowEvent::CursorMoved { position, .. } => vec![EventKind::MouseMoved {
            x: position.x as f32,
            y: position.y as f32,
        }],
        WindowEvent::MouseWheel { delta, .. } => {
            let (x_offset, y_offset) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                MouseScrollDelta::PixelDelta(pos) => (pos.x as f32, pos.y as f32),
            };
            vec![EventKind::MouseScrolled { x_offset, y_offset }]
        }
        WindowEvent::MouseInput { state, button, .. } => match state {
            ElementState::Pressed => vec![EventKind::MouseButtonPressed(*button)],
            ElementState::Released => vec![EventKind::MouseButtonReleased(*button)],
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn close_and_resize_are_translated() {
        assert_eq!(
            translate_window_event(&WindowEvent::CloseRequested),
            vec![EventKind::WindowClose]
        );
        assert_eq!(
            translate_window_event(&WindowEvent::Resized(PhysicalSize::new(800, 0))),
            vec![EventKind::WindowResize {
                width: 800,
                height: 0
            }]
        );
    }

    #[test]
    fn unrelated_events_are_dropped() {
        assert!(translate_window_event(&WindowEvent::Focused(true)).is_empty());
        assert!(translate_window_event(&WindowEvent::RedrawRequested).is_empty());
    }
}
