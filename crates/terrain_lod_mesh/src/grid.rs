use terrain_lod_core::{Point2f, PointN};

use itertools::iproduct;

/// Texture coordinates for a square grid of `grid_resolution`² vertices, laid out like `stitched_grid_indices`.
///
/// U grows with X. V runs from 1 at the south edge to 0 at the north edge, so images stored top row first appear
/// upright.
pub fn grid_uvs(grid_resolution: u32) -> Vec<[f32; 2]> {
    let n = grid_resolution as usize;
    let denom = (grid_resolution.max(2) - 1) as f32;

    let mut uvs = vec![[0.0; 2]; n * n];
    for (x, y) in iproduct!(0..n, 0..n) {
        uvs[x * n + y] = [x as f32 / denom, (n - 1 - y) as f32 / denom];
    }

    uvs
}

/// Flat grid positions covering a `width` × `height` rectangle centered on `center`, at Z = 0.
///
/// Used for composite map geometry, which is drawn in normalized device coordinates. `height` may be negative to flip
/// the grid vertically.
pub fn flat_grid_positions(grid_resolution: u32, center: Point2f, width: f32, height: f32) -> Vec<[f32; 3]> {
    let n = grid_resolution as usize;
    let denom = (grid_resolution.max(2) - 1) as f32;

    let mut positions = vec![[0.0; 3]; n * n];
    for (x, y) in iproduct!(0..n, 0..n) {
        positions[x * n + y] = [
            (x as f32 / denom - 0.5) * width + center.x(),
            (y as f32 / denom - 0.5) * height + center.y(),
            0.0,
        ];
    }

    positions
}

/// A single textured quad, split into two triangles.
#[derive(Clone, Debug, PartialEq)]
pub struct TexturedQuad {
    pub positions: [[f32; 3]; 4],
    pub tex_coords: [[f32; 2]; 4],
    pub indices: [u16; 6],
}

impl TexturedQuad {
    /// A quad with one corner at `corner`, spanned by `width` and `height` (both 2D vectors at Z = 0). The texture
    /// origin is at `corner`.
    pub fn new(corner: Point2f, width: Point2f, height: Point2f) -> Self {
        let p = |q: Point2f| [q.x(), q.y(), 0.0];

        Self {
            positions: [
                p(corner + height),
                p(corner),
                p(corner + width),
                p(corner + width + height),
            ],
            tex_coords: [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
            indices: [0, 1, 2, 2, 3, 0],
        }
    }

    /// The axis-aligned quad from `corner` spanning `size`.
    pub fn axis_aligned(corner: Point2f, size: Point2f) -> Self {
        Self::new(corner, PointN([size.x(), 0.0]), PointN([0.0, size.y()]))
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
