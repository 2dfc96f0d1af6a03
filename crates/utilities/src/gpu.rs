use terrain_lod_core::{GpuHandle, GraphicsContext};

use std::num::NonZeroU64;

/// A `GraphicsContext` that only records what was asked of it.
#[derive(Debug, Default)]
pub struct RecordingContext {
    next_handle: u64,
    created: Vec<GpuHandle>,
    deleted: Vec<GpuHandle>,
    uploaded_bytes: usize,
    num_textures: usize,
}

impl RecordingContext {
    fn next_handle(&mut self) -> GpuHandle {
        self.next_handle += 1;
        let handle = GpuHandle(NonZeroU64::new(self.next_handle).unwrap());
        self.created.push(handle);

        handle
    }

    pub fn num_created(&self) -> usize {
        self.created.len()
    }

    pub fn num_deleted(&self) -> usize {
        self.deleted.len()
    }

    pub fn num_textures(&self) -> usize {
        self.num_textures
    }

    /// Handles created and not deleted yet.
    pub fn num_live(&self) -> usize {
        self.created.len() - self.deleted.len()
    }

    /// Total bytes passed to `create_buffer` and `create_texture`.
    pub fn uploaded_bytes(&self) -> usize {
        self.uploaded_bytes
    }

    pub fn was_deleted(&self, handle: GpuHandle) -> bool {
        self.deleted.contains(&handle)
    }
}

impl GraphicsContext for RecordingContext {
    fn create_buffer(&mut self, data: &[u8]) -> GpuHandle {
        self.uploaded_bytes += data.len();

        self.next_handle()
    }

    fn create_texture(&mut self, _width: u32, _height: u32, texels: Option<&[u8]>) -> GpuHandle {
        self.uploaded_bytes += texels.map_or(0, |t| t.len());
        self.num_textures += 1;

        self.next_handle()
    }

    fn delete(&mut self, handle: GpuHandle) {
        assert!(
            !self.deleted.contains(&handle),
            "{:?} deleted twice",
            handle
        );
        self.deleted.push(handle);
    }
}
