use terrain_lod_core::{GpuHandle, GpuSlot, GraphicsContext};

use bytemuck::Pod;

/// A per-vertex attribute array owned by exactly one chunk, together with the GPU buffer it is uploaded to.
///
/// Vertex arrays are never shared between chunks. Reusing another chunk's data goes through `deep_copy`, which copies
/// the elements and starts with nothing resident on the GPU, since the GPU buffer binding belongs to the original.
#[derive(Debug, Default)]
pub struct VertexArray<T> {
    data: Vec<T>,
    gpu: GpuSlot,
}

impl<T> VertexArray<T>
where
    T: Pod,
{
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data,
            gpu: GpuSlot::new(),
        }
    }

    /// A new, exclusively owned copy of the elements. GPU residency is not copied.
    pub fn deep_copy(&self) -> Self {
        Self::new(self.data.clone())
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutably borrow the elements. Any resident GPU copy is stale afterwards, so it must be released (and later
    /// re-uploaded) by the owner.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn gpu_slot(&self) -> &GpuSlot {
        &self.gpu
    }

    /// Uploads the elements if they aren't resident yet. Returns `true` iff an upload happened.
    pub fn upload(&self, ctx: &mut (impl GraphicsContext + ?Sized)) -> bool {
        let bytes = self.as_bytes();
        let (_, uploaded) = self.gpu.upload_with(ctx, |c| c.create_buffer(bytes));

        uploaded
    }

    pub fn gpu_handle(&self) -> Option<GpuHandle> {
        self.gpu.handle()
    }

    pub fn release(&self, ctx: &mut (impl GraphicsContext + ?Sized)) -> bool {
        self.gpu.release(ctx)
    }
}

impl<T> From<Vec<T>> for VertexArray<T>
where
    T: Pod,
{
    fn from(data: Vec<T>) -> Self {
        Self::new(data)
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝

#[cfg(test)]
mod tests {
    use super::*;

    use utilities::RecordingContext;

    #[test]
    fn deep_copy_is_independent_storage() {
        let original = VertexArray::new(vec![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let mut copy = original.deep_copy();

        assert_eq!(copy.as_slice(), original.as_slice());
        assert_ne!(copy.as_slice().as_ptr(), original.as_slice().as_ptr());

        copy.as_mut_slice()[0] = [0.0; 3];
        assert_eq!(original.as_slice()[0], [1.0, 2.0, 3.0]);
    }

    #[test]
    fn deep_copy_does_not_inherit_gpu_residency() {
        let mut ctx = RecordingContext::default();
        let original = VertexArray::new(vec![[0u8; 4]; 3]);
        assert!(original.upload(&mut ctx));
        assert!(!original.upload(&mut ctx));

        let copy = original.deep_copy();
        assert!(copy.gpu_handle().is_none());
        assert!(copy.upload(&mut ctx));
        assert_ne!(copy.gpu_handle(), original.gpu_handle());

        assert_eq!(ctx.uploaded_bytes(), 24);
    }
}
