use crate::ConfigError;

use terrain_lod_core::WorldspaceId;

use std::time::Duration;

/// Settings for a `ChunkManager`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ChunkManagerConfig {
    /// The worldspace all chunks of this manager are sampled from.
    pub worldspace: WorldspaceId,
    /// Width and height in texels of each composite map.
    pub composite_map_size: u32,
    /// Chunks at least this large (in cells) are drawn with a single baked composite map instead of one pass per layer.
    pub composite_map_level: f32,
    /// Composite map geometry is split into quadrants until each is at most this large (in cells).
    pub max_composite_geometry_size: f32,
    /// How long a cached chunk may go unreferenced before it is evicted.
    pub expiry_delay: Duration,
    /// Stamped on every drawable built by the manager.
    pub node_mask: u32,
}

impl Default for ChunkManagerConfig {
    fn default() -> Self {
        Self {
            worldspace: WorldspaceId::default(),
            composite_map_size: 512,
            composite_map_level: 1.0,
            max_composite_geometry_size: 1.0,
            expiry_delay: Duration::from_secs(5),
            node_mask: 0,
        }
    }
}

impl ChunkManagerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Written so that NaN fails too.
        if !(self.max_composite_geometry_size > 0.0) {
            return Err(ConfigError::NonPositiveCompositeGeometrySize(
                self.max_composite_geometry_size,
            ));
        }
        if !(self.composite_map_level > 0.0) {
            return Err(ConfigError::NonPositiveCompositeMapLevel(
                self.composite_map_level,
            ));
        }
        if self.composite_map_size == 0 {
            return Err(ConfigError::ZeroCompositeMapSize);
        }

        Ok(())
    }
}

/// Settings for a `CompositeMapRenderer`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CompositeMapRendererConfig {
    /// Maximum number of maps waiting for non-immediate rendering.
    pub pending_capacity: usize,
    /// Time per frame that may be spent rendering pending maps. Immediate maps ignore the budget.
    pub frame_time_budget: Duration,
}

impl Default for CompositeMapRendererConfig {
    fn default() -> Self {
        Self {
            pending_capacity: 64,
            frame_time_budget: Duration::from_millis(1),
        }
    }
}

impl CompositeMapRendererConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pending_capacity == 0 {
            return Err(ConfigError::ZeroCompositeQueueCapacity);
        }

        Ok(())
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

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ChunkManagerConfig::default().validate(), Ok(()));
        assert_eq!(CompositeMapRendererConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_non_positive_geometry_size() {
        for &size in [0.0, -1.0, f32::NAN].iter() {
            let config = ChunkManagerConfig {
                max_composite_geometry_size: size,
                ..Default::default()
            };

            assert!(matches!(
                config.validate(),
                Err(ConfigError::NonPositiveCompositeGeometrySize(_))
            ));
        }
    }

    #[test]
    fn rejects_degenerate_composite_settings() {
        let config = ChunkManagerConfig {
            composite_map_level: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveCompositeMapLevel(0.0))
        );

        let config = ChunkManagerConfig {
            composite_map_size: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroCompositeMapSize));

        let config = CompositeMapRendererConfig {
            pending_capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroCompositeQueueCapacity));
    }
}
