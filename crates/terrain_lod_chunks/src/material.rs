use crate::{SceneManager, TerrainDataSource, Texture2D, TextureHandle};

use terrain_lod_core::{Point2f, WorldspaceId};

use std::sync::Arc;

/// One texture layer of a terrain material, with its textures already acquired.
#[derive(Clone, Debug)]
pub struct TextureLayer {
    pub diffuse_map: TextureHandle,
    pub normal_map: Option<TextureHandle>,
    pub parallax: bool,
    pub specular: bool,
}

impl TextureLayer {
    pub fn diffuse_only(diffuse_map: TextureHandle) -> Self {
        Self {
            diffuse_map,
            normal_map: None,
            parallax: false,
            specular: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
}

/// `result = source * src + destination * dst`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BlendFunc {
    pub source: BlendFactor,
    pub destination: BlendFactor,
}

impl BlendFunc {
    pub const ALPHA: Self = BlendFunc {
        source: BlendFactor::SrcAlpha,
        destination: BlendFactor::OneMinusSrcAlpha,
    };

    /// Multiplies the destination by the source color, darkening or tinting what was drawn before.
    pub const MULTIPLY: Self = BlendFunc {
        source: BlendFactor::Zero,
        destination: BlendFactor::SrcColor,
    };
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DepthFunc {
    LessEqual,
    Equal,
}

/// The render state of one pass over a chunk's geometry.
#[derive(Clone, Debug)]
pub struct Pass {
    pub diffuse_map: TextureHandle,
    pub normal_map: Option<TextureHandle>,
    /// Weights this layer over the passes before it. The first pass has none.
    pub blend_map: Option<TextureHandle>,
    pub use_shaders: bool,
    pub parallax: bool,
    pub specular: bool,
    /// Number of layer texture repetitions across the chunk.
    pub layer_tile_size: f32,
    pub blendmap_scale: f32,
    pub depth_func: DepthFunc,
    pub depth_write: bool,
    pub blend: Option<BlendFunc>,
}

impl Pass {
    pub fn textures(&self) -> impl Iterator<Item = &TextureHandle> {
        std::iter::once(&self.diffuse_map)
            .chain(self.normal_map.iter())
            .chain(self.blend_map.iter())
    }
}

/// Builds one pass per layer, bottom to top.
///
/// The first pass lays down depth and is opaque. Every later pass only touches fragments at exactly the depth already
/// written and alpha-blends its layer through `blendmaps[i - 1]`. A missing blend map leaves that layer unweighted.
///
/// Normal maps, parallax and specular need shaders; without them they are dropped.
pub fn create_passes(
    use_shaders: bool,
    layers: &[TextureLayer],
    blendmaps: &[TextureHandle],
    blendmap_scale: f32,
    layer_tile_size: f32,
) -> Vec<Pass> {
    layers
        .iter()
        .enumerate()
        .map(|(i, layer)| {
            let first = i == 0;
            let blend_map = if first {
                None
            } else {
                blendmaps.get(i - 1).cloned()
            };

            Pass {
                diffuse_map: layer.diffuse_map.clone(),
                normal_map: layer.normal_map.clone().filter(|_| use_shaders),
                blend_map,
                use_shaders,
                parallax: use_shaders && layer.parallax,
                specular: use_shaders && layer.specular,
                layer_tile_size,
                blendmap_scale,
                depth_func: if first {
                    DepthFunc::LessEqual
                } else {
                    DepthFunc::Equal
                },
                depth_write: first,
                blend: if first { None } else { Some(BlendFunc::ALPHA) },
            }
        })
        .collect()
}

/// Asks `source` for the layers of a chunk and builds its passes.
///
/// Composite map source passes never use shaders and drop normal maps, since that detail is not visible at the
/// distances composite maps are drawn at.
pub(crate) fn assemble_layer_passes<S, M>(
    source: &S,
    scene: &M,
    chunk_size: f32,
    chunk_center: Point2f,
    worldspace: WorldspaceId,
    for_composite_map: bool,
) -> Vec<Pass>
where
    S: TerrainDataSource,
    M: SceneManager,
{
    let blendmaps = source.blendmaps(chunk_size, chunk_center, worldspace);

    let mut use_shaders = scene.force_shaders() || !scene.clamp_lighting();

    let layers: Vec<_> = blendmaps
        .layers
        .iter()
        .map(|info| {
            use_shaders |= info.requires_shaders();

            TextureLayer {
                diffuse_map: scene.texture(&info.diffuse_map),
                normal_map: match &info.normal_map {
                    Some(path) if !for_composite_map => Some(scene.texture(path)),
                    _ => None,
                },
                parallax: info.parallax,
                specular: info.specular,
            }
        })
        .collect();

    if for_composite_map {
        use_shaders = false;
    }

    let blendmap_textures: Vec<TextureHandle> = blendmaps
        .images
        .into_iter()
        .map(|image| Arc::new(Texture2D::blend_map(image)))
        .collect();

    let blendmap_scale = source.blendmap_scale(chunk_size);

    create_passes(
        use_shaders,
        &layers,
        &blendmap_textures,
        blendmap_scale,
        blendmap_scale,
    )
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

    use crate::TextureFormat;

    fn texture() -> TextureHandle {
        Arc::new(Texture2D::new(1, 1, TextureFormat::Rgba8, vec![255; 4]))
    }

    fn layers(n: usize) -> Vec<TextureLayer> {
        (0..n)
            .map(|_| TextureLayer {
                diffuse_map: texture(),
                normal_map: Some(texture()),
                parallax: true,
                specular: false,
            })
            .collect()
    }

    #[test]
    fn first_pass_is_opaque_and_later_passes_blend() {
        let blendmaps = vec![texture(), texture()];
        let passes = create_passes(true, &layers(3), &blendmaps, 2.0, 2.0);

        assert_eq!(passes.len(), 3);

        assert_eq!(passes[0].depth_func, DepthFunc::LessEqual);
        assert!(passes[0].depth_write);
        assert!(passes[0].blend.is_none());
        assert!(passes[0].blend_map.is_none());

        for (pass, blendmap) in passes[1..].iter().zip(blendmaps.iter()) {
            assert_eq!(pass.depth_func, DepthFunc::Equal);
            assert!(!pass.depth_write);
            assert_eq!(pass.blend, Some(BlendFunc::ALPHA));
            assert!(Arc::ptr_eq(pass.blend_map.as_ref().unwrap(), blendmap));
        }
    }

    #[test]
    fn fixed_function_drops_shader_features() {
        let passes = create_passes(false, &layers(2), &[texture()], 1.0, 1.0);

        for pass in passes.iter() {
            assert!(!pass.use_shaders);
            assert!(pass.normal_map.is_none());
            assert!(!pass.parallax);
        }
    }

    #[test]
    fn missing_blend_maps_leave_layers_unweighted() {
        let passes = create_passes(false, &layers(3), &[], 1.0, 1.0);

        assert_eq!(passes.len(), 3);
        assert!(passes.iter().all(|p| p.blend_map.is_none()));
    }

    #[test]
    fn no_layers_no_passes() {
        assert!(create_passes(true, &[], &[], 1.0, 1.0).is_empty());
    }
}
