// app/event.rs
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    WindowClose,
    WindowResize,
    KeyPressed,
    KeyReleased,
    KeyTyped,
    MouseMoved,
    MouseScrolled,
    MouseButtonPressed,
    MouseButtonReleased,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    WindowClose,
    WindowResize { width: u32, height: u32 },
    /// `repeat_count` is 0 for the initial press and 1 for auto-repeats.
    KeyPressed { key: KeyCode, repeat_count: u32 },
    KeyReleased { key: KeyCode },
    KeyTyped(char),
    MouseMoved { x: f32, y: f32 },
    MouseScrolled { x_offset: f32, y_offset: f32 },
    MouseButtonPressed(MouseButton),
    MouseButtonReleased(MouseButton),
}

impl EventKind {
    pub fn event_type(&self) -> EventType {
        match self {
            EventKind::WindowClose => EventType::WindowClose,
            EventKind::WindowResize { .. } => EventType::WindowResize,
            EventKind::KeyPressed { .. } => EventType::KeyPressed,
            EventKind::KeyReleased { .. } => EventType::KeyReleased,
            EventKind::KeyTyped(_) => EventType::KeyTyped,
            EventKind::MouseMoved { .. } => EventType::MouseMoved,
            EventKind::MouseScrolled { .. } => EventType::MouseScrolled,
            EventKind::MouseButtonPressed(_) => EventType::MouseButtonPressed,
            EventKind::MouseButtonReleased(_) => EventType::MouseButtonReleased,
        }
    }
}

/// An input or window event travelling down the layer stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    /// Set once something consumed the event; later layers never see it.
    pub handled: bool,
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            handled: false,
        }
    }

    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    /// Runs `handler` if the event is of type `ty`; its return value marks
    /// the event handled. Returns whether the handler ran.
    pub fn dispatch(&mut self, ty: EventType, handler: impl FnOnce(&EventKind) -> bool) -> bool {
        if self.event_type() != ty {
            return false;
        }
        self.handled |= handler(&self.kind);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_only_runs_for_matching_type() {
        let mut event = Event::new(EventKind::WindowResize {
            width: 10,
            height: 20,
        });
        assert!(!event.dispatch(EventType::WindowClose, |_| true));
        assert!(!event.handled);

        let mut seen = None;
        assert!(event.dispatch(EventType::WindowResize, |kind| {
            seen = Some(*kind);
            false
        }));
        assert!(!event.handled);
        assert_eq!(seen, Some(event.kind));
    }

    #[test]
    fn handled_is_sticky() {
        let mut event = Event::new(EventKind::KeyTyped('a'));
        event.dispatch(EventType::KeyTyped, |_| true);
        event.dispatch(EventType::KeyTyped, |_| false);
        assert!(event.handled);
    }
}
