use crate::RecordingContext;

use terrain_lod_chunks::{
    CompositeDrawable, CompositeMap, CompositeMapBackend, IncrementalCompileQueue, SceneManager, Texture2D,
    TextureFormat, TextureHandle,
};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A `SceneManager` with fixed rendering modes that hands out a fresh 1x1 texture for every path.
#[derive(Debug)]
pub struct TestScene {
    pub force_shaders: bool,
    pub clamp_lighting: bool,
    compile_queue: Option<IncrementalCompileQueue>,
    textures_acquired: AtomicUsize,
}

impl Default for TestScene {
    fn default() -> Self {
        Self {
            force_shaders: false,
            clamp_lighting: true,
            compile_queue: Some(IncrementalCompileQueue::new()),
            textures_acquired: AtomicUsize::new(0),
        }
    }
}

impl TestScene {
    pub fn without_compile_queue() -> Self {
        Self {
            compile_queue: None,
            ..Default::default()
        }
    }

    pub fn num_textures_acquired(&self) -> usize {
        self.textures_acquired.load(Ordering::SeqCst)
    }
}

impl SceneManager for TestScene {
    fn texture(&self, _path: &str) -> TextureHandle {
        self.textures_acquired.fetch_add(1, Ordering::SeqCst);

        Arc::new(Texture2D::new(1, 1, TextureFormat::Rgba8, vec![255; 4]))
    }

    fn force_shaders(&self) -> bool {
        self.force_shaders
    }

    fn clamp_lighting(&self) -> bool {
        self.clamp_lighting
    }

    fn incremental_compile_queue(&self) -> Option<&IncrementalCompileQueue> {
        self.compile_queue.as_ref()
    }
}

/// A `CompositeMapBackend` that uploads what a bake would need and counts the drawables it was given.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub ctx: RecordingContext,
    pub maps_rendered: usize,
    pub drawables_rendered: usize,
}

impl CompositeMapBackend for RecordingBackend {
    fn render_composite_map(&mut self, map: &CompositeMap) {
        map.texture().upload(&mut self.ctx);
        for drawable in map.drawables() {
            match drawable {
                CompositeDrawable::Layer { pass, .. } => {
                    for texture in pass.textures() {
                        texture.upload(&mut self.ctx);
                    }
                }
                CompositeDrawable::Detail {
                    geometry, colors, ..
                } => {
                    geometry.positions().upload(&mut self.ctx);
                    colors.upload(&mut self.ctx);
                }
            }
            self.drawables_rendered += 1;
        }
        self.maps_rendered += 1;
    }
}
