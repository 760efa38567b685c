// renderer/context.rs
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::backend::{Caps, RenderBackend};
use super::handle::{Handle, ResourceHandle};

type ReleaseQueue = Rc<RefCell<Vec<ResourceHandle>>>;

/// Owns the backend and the queue of handles waiting to be destroyed.
///
/// Every GPU resource wrapper is created against a context and hands its
/// handle back through the release queue when dropped. The queue is drained
/// at frame boundaries by `collect_garbage`.
pub struct GraphicsContext {
    backend: Box<dyn RenderBackend>,
    caps: Caps,
    release_queue: ReleaseQueue,
}

impl GraphicsContext {
    pub fn new(backend: Box<dyn RenderBackend>) -> Self {
        let caps = backend.caps();
        Self {
            backend,
            caps,
            release_queue: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn caps(&self) -> Caps {
        self.caps
    }

    pub fn backend(&self) -> &dyn RenderBackend {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> &mut dyn RenderBackend {
        self.backend.as_mut()
    }

    /// Wraps a freshly created handle so that it is released when the guard drops.
    pub fn track<T>(&self, handle: Handle<T>) -> GpuResource<T>
    where
        Handle<T>: Into<ResourceHandle>,
    {
        GpuResource {
            handle,
            release_queue: Rc::clone(&self.release_queue),
        }
    }

    pub fn pending_releases(&self) -> usize {
        self.release_queue.borrow().len()
    }

    /// Destroys every handle released since the last call. Returns how many.
    pub fn collect_garbage(&mut self) -> usize {
        let released: Vec<ResourceHandle> = self.release_queue.borrow_mut().drain(..).collect();
        for handle in &released {
            self.backend.destroy(*handle);
        }
        if !released.is_empty() {
            log::debug!("Destroyed {} GPU resources", released.len());
        }
        released.len()
    }
}

impl fmt::Debug for GraphicsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphicsContext")
            .field("caps", &self.caps)
            .field("pending_releases", &self.pending_releases())
            .finish()
    }
}

/// Owning guard around a backend handle.
///
/// Not `Clone`: exactly one guard exists per handle, so the handle is
/// enqueued for destruction exactly once. Invalid handles are never enqueued.
pub struct GpuResource<T>
where
    Handle<T>: Into<ResourceHandle>,
{
    handle: Handle<T>,
    release_queue: ReleaseQueue,
}

impl<T> GpuResource<T>
where
    Handle<T>: Into<ResourceHandle>,
{
    pub fn handle(&self) -> Handle<T> {
        self.handle
    }

    pub fn is_valid(&self) -> bool {
        self.handle.is_valid()
    }
}

impl<T> Drop for GpuResource<T>
where
    Handle<T>: Into<ResourceHandle>,
{
    fn drop(&mut self) {
        if self.handle.is_valid() {
            self.release_queue.borrow_mut().push(self.handle.into());
        }
    }
}

impl<T> fmt::Debug for GpuResource<T>
where
    Handle<T>: Into<ResourceHandle>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GpuResource({:?})", self.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::handle::Texture;
    use crate::renderer::recording::RecordingBackend;

    #[test]
    fn dropped_resource_is_destroyed_once() {
        let backend = RecordingBackend::new();
        let log = backend.log();
        let mut ctx = GraphicsContext::new(Box::new(backend));

        let resource = ctx.track(Handle::<Texture>::new(7));
        drop(resource);
        assert_eq!(ctx.pending_releases(), 1);

        assert_eq!(ctx.collect_garbage(), 1);
        assert_eq!(ctx.collect_garbage(), 0);
        assert_eq!(
            log.destroyed(),
            vec![ResourceHandle::Texture(Handle::new(7))]
        );
    }

    #[test]
    fn invalid_handles_are_not_enqueued() {
        let ctx = GraphicsContext::new(Box::new(RecordingBackend::new()));
        drop(ctx.track(Handle::<Texture>::INVALID));
        assert_eq!(ctx.pending_releases(), 0);
    }
}
