use crate::TerrainDrawable;

use terrain_lod_core::GraphicsContext;

use crossbeam_queue::SegQueue;
use std::sync::Arc;

/// Spreads GPU uploads of freshly built chunks over several frames.
///
/// Chunks can be added from any thread. `compile` must run on the thread that owns the graphics context.
#[derive(Debug, Default)]
pub struct IncrementalCompileQueue {
    queue: SegQueue<Arc<TerrainDrawable>>,
}

impl IncrementalCompileQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, drawable: Arc<TerrainDrawable>) {
        self.queue.push(drawable);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Uploads at most `max_objects` queued chunks. Returns the number of chunks compiled.
    pub fn compile(&self, ctx: &mut (impl GraphicsContext + ?Sized), max_objects: usize) -> usize {
        let mut compiled = 0;
        let mut gpu_objects = 0;
        while compiled < max_objects {
            let drawable = match self.queue.pop() {
                Some(d) => d,
                None => break,
            };
            gpu_objects += drawable.compile(ctx);
            compiled += 1;
        }

        if compiled > 0 {
            tracing::trace!(compiled, gpu_objects, remaining = self.queue.len(), "compiled terrain chunks");
        }

        compiled
    }
}
