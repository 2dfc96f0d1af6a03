//! Bookkeeping for GPU-side resources.
//!
//! Geometry and textures in this workspace are plain CPU data. When the render thread uploads one, the resulting handle
//! is parked in a `GpuSlot` next to the data. Releasing the handle is a separate, explicit step that needs the
//! `GraphicsContext`: dropping CPU data never talks to the GPU.

use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

/// An opaque name for a GPU object, as handed out by a `GraphicsContext`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct GpuHandle(pub NonZeroU64);

/// The graphics API binding. Only the thread that owns the graphics context may call these.
pub trait GraphicsContext {
    fn create_buffer(&mut self, data: &[u8]) -> GpuHandle;

    fn create_texture(&mut self, width: u32, height: u32, pixels: Option<&[u8]>) -> GpuHandle;

    fn delete(&mut self, handle: GpuHandle);
}

/// Holds the GPU handle (if any) for one piece of CPU data.
///
/// All methods take `&self` so that data shared immutably between many chunks can still be uploaded once and released
/// once.
#[derive(Debug, Default)]
pub struct GpuSlot {
    handle: AtomicU64,
}

impl GpuSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> Option<GpuHandle> {
        NonZeroU64::new(self.handle.load(Ordering::Acquire)).map(GpuHandle)
    }

    pub fn is_resident(&self) -> bool {
        self.handle().is_some()
    }

    /// Returns the resident handle, or calls `upload` to create one. Returns `true` in the second element iff `upload`
    /// was called.
    pub fn upload_with<C>(
        &self,
        ctx: &mut C,
        upload: impl FnOnce(&mut C) -> GpuHandle,
    ) -> (GpuHandle, bool)
    where
        C: ?Sized,
    {
        if let Some(handle) = self.handle() {
            return (handle, false);
        }

        let handle = upload(ctx);
        self.handle.store(handle.0.get(), Ordering::Release);

        (handle, true)
    }

    /// Deletes the GPU object through `ctx`. Returns `false` if nothing was resident.
    pub fn release(&self, ctx: &mut (impl GraphicsContext + ?Sized)) -> bool {
        match NonZeroU64::new(self.handle.swap(0, Ordering::AcqRel)) {
            Some(raw) => {
                ctx.delete(GpuHandle(raw));
                true
            }
            None => false,
        }
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
