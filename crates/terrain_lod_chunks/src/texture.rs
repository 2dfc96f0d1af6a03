use terrain_lod_core::{GpuHandle, GpuSlot, GraphicsContext};

use image::GrayImage;
use std::sync::Arc;

/// Textures are immutable after creation and shared between passes, chunks and composite maps.
pub type TextureHandle = Arc<Texture2D>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextureFormat {
    Luma8,
    Rgb8,
    Rgba8,
}

impl TextureFormat {
    pub fn bytes_per_texel(&self) -> usize {
        match self {
            TextureFormat::Luma8 => 1,
            TextureFormat::Rgb8 => 3,
            TextureFormat::Rgba8 => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextureWrap {
    Repeat,
    ClampToEdge,
}

/// A 2D texture: its sampling state, optionally its texels, and its GPU residency.
///
/// A texture without texels is a render target whose contents are produced on the GPU.
#[derive(Debug)]
pub struct Texture2D {
    width: u32,
    height: u32,
    format: TextureFormat,
    filter: TextureFilter,
    wrap: TextureWrap,
    texels: Option<Vec<u8>>,
    gpu: GpuSlot,
}

impl Texture2D {
    /// A repeating, linearly filtered texture with the given texels, as used for terrain layer maps.
    pub fn new(width: u32, height: u32, format: TextureFormat, texels: Vec<u8>) -> Self {
        debug_assert_eq!(
            texels.len(),
            width as usize * height as usize * format.bytes_per_texel()
        );

        Self {
            width,
            height,
            format,
            filter: TextureFilter::Linear,
            wrap: TextureWrap::Repeat,
            texels: Some(texels),
            gpu: GpuSlot::new(),
        }
    }

    /// Wraps a blend map. Blend maps are clamped so that layers don't bleed across chunk borders.
    pub fn blend_map(image: GrayImage) -> Self {
        let (width, height) = image.dimensions();

        Self {
            width,
            height,
            format: TextureFormat::Luma8,
            filter: TextureFilter::Linear,
            wrap: TextureWrap::ClampToEdge,
            texels: Some(image.into_raw()),
            gpu: GpuSlot::new(),
        }
    }

    /// An empty square RGB target for baking a composite map into.
    pub fn composite_render_target(size: u32) -> Self {
        Self {
            width: size,
            height: size,
            format: TextureFormat::Rgb8,
            filter: TextureFilter::Linear,
            wrap: TextureWrap::ClampToEdge,
            texels: None,
            gpu: GpuSlot::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    pub fn filter(&self) -> TextureFilter {
        self.filter
    }

    pub fn wrap(&self) -> TextureWrap {
        self.wrap
    }

    pub fn texels(&self) -> Option<&[u8]> {
        self.texels.as_deref()
    }

    pub fn is_render_target(&self) -> bool {
        self.texels.is_none()
    }

    pub fn gpu_handle(&self) -> Option<GpuHandle> {
        self.gpu.handle()
    }

    /// Creates the GPU texture if it isn't resident yet. Returns `true` iff one was created.
    pub fn upload(&self, ctx: &mut (impl GraphicsContext + ?Sized)) -> bool {
        let (width, height) = (self.width, self.height);
        let texels = self.texels.as_deref();
        let (_, uploaded) = self
            .gpu
            .upload_with(ctx, |c| c.create_texture(width, height, texels));

        uploaded
    }

    pub fn release(&self, ctx: &mut (impl GraphicsContext + ?Sized)) -> bool {
        self.gpu.release(ctx)
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
