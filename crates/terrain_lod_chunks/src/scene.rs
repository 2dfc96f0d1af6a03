use crate::{IncrementalCompileQueue, TextureHandle};

use auto_impl::auto_impl;

/// Scene-wide rendering services used while building chunks.
#[auto_impl(&, Box, Arc)]
pub trait SceneManager {
    /// Acquire the texture stored at `path`.
    fn texture(&self, path: &str) -> TextureHandle;

    /// Whether every material must use shaders.
    fn force_shaders(&self) -> bool;

    /// Whether lighting is clamped. Unclamped lighting always uses shaders, so that chunks with and without normal
    /// maps are lit identically.
    fn clamp_lighting(&self) -> bool;

    /// The queue that spreads GPU uploads over frames, if there is one.
    fn incremental_compile_queue(&self) -> Option<&IncrementalCompileQueue>;
}
