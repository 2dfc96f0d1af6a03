use crate::{CompositeMap, CompositeMapRendererConfig, CompositeQueueError, ConfigError};

use crossbeam_queue::{ArrayQueue, SegQueue};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Bakes composite maps. Owned by the thread that owns the graphics context.
pub trait CompositeMapBackend {
    /// Render every drawable of `map`, in order, into `map.texture()`.
    fn render_composite_map(&mut self, map: &CompositeMap);
}

/// Queues composite maps for baking, so that they can be assembled on any thread but are only rendered at a defined
/// point in the frame.
///
/// There are two queues. Immediate maps are all rendered on the next frame, because something is about to draw them.
/// Pending maps are rendered a few per frame, as long as the frame time budget lasts. A map may sit in both queues; it
/// is only rendered once.
#[derive(Debug)]
pub struct CompositeMapRenderer {
    immediate: SegQueue<Arc<CompositeMap>>,
    pending: ArrayQueue<Arc<CompositeMap>>,
    frame_time_budget: Duration,
}

/// What one call to `CompositeMapRenderer::render_frame` did.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CompositeRenderStats {
    pub immediate_rendered: usize,
    pub pending_rendered: usize,
    /// Dequeued maps that had already been rendered.
    pub skipped: usize,
}

impl CompositeMapRenderer {
    pub fn new(config: &CompositeMapRendererConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            immediate: SegQueue::new(),
            pending: ArrayQueue::new(config.pending_capacity),
            frame_time_budget: config.frame_time_budget,
        })
    }

    pub fn frame_time_budget(&self) -> Duration {
        self.frame_time_budget
    }

    pub fn set_frame_time_budget(&mut self, budget: Duration) {
        self.frame_time_budget = budget;
    }

    /// Queue `map` for baking. Immediate maps are never rejected.
    pub fn add_composite_map(&self, map: Arc<CompositeMap>, immediate: bool) -> Result<(), CompositeQueueError> {
        if immediate {
            self.immediate.push(map);
            return Ok(());
        }

        self.pending.push(map).map_err(|_| {
            let capacity = self.pending.capacity();
            tracing::warn!(capacity, "pending composite map queue is full");

            CompositeQueueError::Full { capacity }
        })
    }

    pub fn num_immediate(&self) -> usize {
        self.immediate.len()
    }

    pub fn num_pending(&self) -> usize {
        self.pending.len()
    }

    /// Render all immediate maps, then pending maps until the frame time budget runs out. Call once per frame on the
    /// thread that owns the graphics context.
    pub fn render_frame(&self, backend: &mut (impl CompositeMapBackend + ?Sized)) -> CompositeRenderStats {
        let start = Instant::now();
        let mut stats = CompositeRenderStats::default();

        while let Some(map) = self.immediate.pop() {
            if render(backend, &map) {
                stats.immediate_rendered += 1;
            } else {
                stats.skipped += 1;
            }
        }

        while start.elapsed() < self.frame_time_budget {
            let map = match self.pending.pop() {
                Some(map) => map,
                None => break,
            };
            if render(backend, &map) {
                stats.pending_rendered += 1;
            } else {
                stats.skipped += 1;
            }
        }

        if stats != CompositeRenderStats::default() {
            tracing::trace!(?stats, remaining = self.pending.len(), "rendered composite maps");
        }

        stats
    }
}

fn render(backend: &mut (impl CompositeMapBackend + ?Sized), map: &CompositeMap) -> bool {
    if map.is_rendered() {
        return false;
    }
    backend.render_composite_map(map);
    map.mark_rendered();

    true
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

    use crate::Texture2D;

    #[derive(Default)]
    struct CountingBackend {
        rendered: usize,
    }

    impl CompositeMapBackend for CountingBackend {
        fn render_composite_map(&mut self, _map: &CompositeMap) {
            self.rendered += 1;
        }
    }

    fn empty_map() -> Arc<CompositeMap> {
        Arc::new(CompositeMap::new(
            Arc::new(Texture2D::composite_render_target(4)),
            Vec::new(),
        ))
    }

    fn renderer(pending_capacity: usize, frame_time_budget: Duration) -> CompositeMapRenderer {
        CompositeMapRenderer::new(&CompositeMapRendererConfig {
            pending_capacity,
            frame_time_budget,
        })
        .unwrap()
    }

    #[test]
    fn immediate_maps_ignore_time_budget() {
        let renderer = renderer(4, Duration::from_secs(0));
        let mut backend = CountingBackend::default();

        let immediate = empty_map();
        renderer.add_composite_map(immediate.clone(), true).unwrap();
        renderer.add_composite_map(empty_map(), false).unwrap();

        let stats = renderer.render_frame(&mut backend);

        assert_eq!(stats.immediate_rendered, 1);
        assert_eq!(stats.pending_rendered, 0);
        assert!(immediate.is_rendered());
        assert_eq!(renderer.num_pending(), 1);
    }

    #[test]
    fn pending_maps_drain_within_budget() {
        let renderer = renderer(4, Duration::from_secs(60));
        let mut backend = CountingBackend::default();
        for _ in 0..3 {
            renderer.add_composite_map(empty_map(), false).unwrap();
        }

        let stats = renderer.render_frame(&mut backend);

        assert_eq!(stats.pending_rendered, 3);
        assert_eq!(backend.rendered, 3);
        assert_eq!(renderer.num_pending(), 0);
    }

    #[test]
    fn map_in_both_queues_renders_once() {
        let renderer = renderer(4, Duration::from_secs(60));
        let mut backend = CountingBackend::default();
        let map = empty_map();

        renderer.add_composite_map(map.clone(), false).unwrap();
        renderer.add_composite_map(map, true).unwrap();
        let stats = renderer.render_frame(&mut backend);

        assert_eq!(backend.rendered, 1);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn full_pending_queue_rejects() {
        let renderer = renderer(1, Duration::from_secs(0));

        assert_eq!(renderer.add_composite_map(empty_map(), false), Ok(()));
        assert_eq!(
            renderer.add_composite_map(empty_map(), false),
            Err(CompositeQueueError::Full { capacity: 1 })
        );
        assert_eq!(renderer.add_composite_map(empty_map(), true), Ok(()));
    }
}
