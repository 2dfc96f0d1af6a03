use std::fmt;

/// A configuration value that would make chunk construction misbehave.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Composite geometry is subdivided until it is no larger than this, so it must be positive.
    NonPositiveCompositeGeometrySize(f32),
    NonPositiveCompositeMapLevel(f32),
    ZeroCompositeMapSize,
    ZeroCompositeQueueCapacity,
    /// The data source reported fewer than 2 vertices along a cell edge.
    InvalidCellVertices(u32),
    /// Composite leaves of `size` cells would span less than one vertex interval of the cell grid.
    CompositeGeometryBelowOneInterval { size: f32, cell_vertices: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveCompositeGeometrySize(size) => {
                write!(f, "max composite geometry size must be positive, got {}", size)
            }
            Self::NonPositiveCompositeMapLevel(level) => {
                write!(f, "composite map level must be positive, got {}", level)
            }
            Self::ZeroCompositeMapSize => write!(f, "composite map texture size must be non-zero"),
            Self::ZeroCompositeQueueCapacity => {
                write!(f, "pending composite map queue capacity must be non-zero")
            }
            Self::CompositeGeometryBelowOneInterval { size, cell_vertices } => write!(
                f,
                "max composite geometry size {} is less than one interval of a {}-vertex cell",
                size, cell_vertices
            ),
            Self::InvalidCellVertices(n) => write!(
                f,
                "terrain cells need at least 2 vertices per edge, data source reports {}",
                n
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure to enqueue a composite map for rendering.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompositeQueueError {
    /// The bounded pending queue is at capacity. The map stays unrendered until it is requested again.
    Full { capacity: usize },
}

impl fmt::Display for CompositeQueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full { capacity } => write!(
                f,
                "pending composite map queue is full ({} maps)",
                capacity
            ),
        }
    }
}

impl std::error::Error for CompositeQueueError {}
