// app/layer.rs
use crate::renderer::Renderer;

use super::event::Event;

/// A slice of application behaviour that receives updates and events.
///
/// Every hook has a no-op default, so a layer only implements what it needs.
pub trait Layer {
    fn name(&self) -> &str;

    fn on_attach(&mut self, _renderer: &mut Renderer) {}

    fn on_detach(&mut self, _renderer: &mut Renderer) {}

    fn on_update(&mut self, _renderer: &mut Renderer, _dt: f32) {}

    fn on_event(&mut self, _event: &mut Event) {}
}

/// Ordered layers followed by overlays. Overlays always stay on top, so
/// they update last and see events first.
#[derive(Default)]
pub struct LayerStack {
    layers: Vec<Box<dyn Layer>>,
    insert_index: usize,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts below every overlay, above the previously pushed layers.
    pub fn push_layer(&mut self, layer: Box<dyn Layer>) {
        self.layers.insert(self.insert_index, layer);
        self.insert_index += 1;
    }

    pub fn push_overlay(&mut self, overlay: Box<dyn Layer>) {
        self.layers.push(overlay);
    }

    pub fn pop_layer(&mut self, name: &str) -> Option<Box<dyn Layer>> {
        let position = self.layers[..self.insert_index]
            .iter()
            .position(|layer| layer.name() == name)?;
        self.insert_index -= 1;
        Some(self.layers.remove(position))
    }

    pub fn pop_overlay(&mut self, name: &str) -> Option<Box<dyn Layer>> {
        let position = self.layers[self.insert_index..]
            .iter()
            .position(|layer| layer.name() == name)?;
        Some(self.layers.remove(self.insert_index + position))
    }

    /// Removes every layer, top first.
    pub fn drain(&mut self) -> impl Iterator<Item = Box<dyn Layer>> + '_ {
        self.insert_index = 0;
        self.layers.drain(..).rev()
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Box<dyn Layer>> {
        self.layers.iter()
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut Box<dyn Layer>> {
        self.layers.iter_mut()
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|layer| layer.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl Layer for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    fn stack() -> LayerStack {
        let mut stack = LayerStack::new();
        stack.push_layer(Box::new(Named("world")));
        stack.push_overlay(Box::new(Named("hud")));
        stack.push_layer(Box::new(Named("debug")));
        stack
    }

    #[test]
    fn layers_stay_below_overlays() {
        assert_eq!(stack().names(), vec!["world", "debug", "hud"]);
    }

    #[test]
    fn pop_respects_layer_and_overlay_ranges() {
        let mut stack = stack();
        assert!(stack.pop_layer("hud").is_none());
        assert!(stack.pop_overlay("world").is_none());

        let popped = stack.pop_layer("world").unwrap();
        assert_eq!(popped.name(), "world");
        stack.push_layer(Box::new(Named("late")));
        assert_eq!(stack.names(), vec!["debug", "late", "hud"]);

        assert!(stack.pop_overlay("hud").is_some());
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn drain_goes_top_down() {
        let mut stack = stack();
        let order: Vec<String> = stack.drain().map(|l| l.name().to_owned()).collect();
        assert_eq!(order, vec!["hud", "debug", "world"]);
        assert!(stack.is_empty());
    }
}
