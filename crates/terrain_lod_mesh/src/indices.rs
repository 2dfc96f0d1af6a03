use terrain_lod_core::{Direction, LodFlags};

/// Triangle-list indices, stored in the narrowest type that can address every vertex.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Indices {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl Indices {
    /// Narrows `indices` to `u16` when `num_vertices` allows it.
    pub fn with_vertex_count(indices: Vec<u32>, num_vertices: usize) -> Self {
        if num_vertices <= u16::MAX as usize + 1 {
            Indices::U16(indices.into_iter().map(|i| i as u16).collect())
        } else {
            Indices::U32(indices)
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Indices::U16(v) => v.len(),
            Indices::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn num_triangles(&self) -> usize {
        self.len() / 3
    }

    #[inline]
    pub fn get(&self, i: usize) -> u32 {
        match self {
            Indices::U16(v) => v[i] as u32,
            Indices::U32(v) => v[i],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    pub fn max_index(&self) -> Option<u32> {
        self.iter().max()
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Indices::U16(v) => bytemuck::cast_slice(v),
            Indices::U32(v) => bytemuck::cast_slice(v),
        }
    }
}

/// Triangulates a square grid of `grid_resolution`² vertices, stitching each edge to a coarser neighbour as described
/// by `lod_flags`.
///
/// Vertex `(x, y)` of the grid lives at index `x * grid_resolution + y`. Grids with fewer than 2 vertices per edge have
/// no triangles.
///
/// Without any edge deltas, every grid cell becomes two triangles, alternating the split diagonal in a diamond pattern.
/// If any edge has a delta, the outermost ring of cells is instead triangulated separately for all four edges, because
/// stitching one edge changes the corners it shares with its two adjacent edges. On an edge with delta `d`, only every
/// `2^d`-th vertex is used, and the inner row of vertices fans out to it, so the edge matches the coarser neighbour
/// exactly.
pub fn stitched_grid_indices(grid_resolution: u32, lod_flags: LodFlags) -> Indices {
    let n = grid_resolution as usize;
    if n < 2 {
        return Indices::U16(Vec::new());
    }

    let v = |x: usize, y: usize| (x * n + y) as u32;

    let mut indices: Vec<u32> = Vec::with_capacity((n - 1) * (n - 1) * 2 * 3);

    // The 3x3 grid is the smallest where an outer ring and a (single vertex) interior exist.
    let stitch = lod_flags.any_edge_delta() && n >= 3;

    let (start, end) = if stitch { (1, n - 2) } else { (0, n - 1) };
    for y in start..end {
        for x in start..end {
            if (y + x % 2) % 2 == 1 {
                indices.extend_from_slice(&[v(x + 1, y), v(x + 1, y + 1), v(x, y + 1)]);
                indices.extend_from_slice(&[v(x, y), v(x + 1, y), v(x, y + 1)]);
            } else {
                indices.extend_from_slice(&[v(x, y), v(x + 1, y + 1), v(x, y + 1)]);
                indices.extend_from_slice(&[v(x, y), v(x + 1, y), v(x + 1, y + 1)]);
            }
        }
    }

    if stitch {
        let last = n - 1;
        let inner = 1;

        // South
        let y = 0;
        let outer = edge_step(lod_flags.edge_delta(Direction::South), n);
        for x in (0..last).step_by(outer) {
            indices.push(v(x, y));
            indices.push(v(x + outer, y));
            // Don't touch the east edge.
            if x + outer == last {
                indices.push(v(x + outer - inner, y + inner));
            } else {
                indices.push(v(x + outer, y + inner));
            }

            for i in (0..outer).step_by(inner) {
                // Don't touch the west or east edges.
                if x + i == 0 || x + i == last - inner {
                    continue;
                }
                indices.extend_from_slice(&[v(x, y), v(x + i + inner, y + inner), v(x + i, y + inner)]);
            }
        }

        // North
        let y = last;
        let outer = edge_step(lod_flags.edge_delta(Direction::North), n);
        for x in (0..last).step_by(outer) {
            indices.push(v(x + outer, y));
            indices.push(v(x, y));
            // Don't touch the west edge.
            if x == 0 {
                indices.push(v(x + inner, y - inner));
            } else {
                indices.push(v(x, y - inner));
            }

            for i in (0..outer).step_by(inner) {
                if x + i == 0 || x + i == last - inner {
                    continue;
                }
                indices.extend_from_slice(&[v(x + i, y - inner), v(x + i + inner, y - inner), v(x + outer, y)]);
            }
        }

        // West
        let x = 0;
        let outer = edge_step(lod_flags.edge_delta(Direction::West), n);
        for y in (0..last).step_by(outer) {
            indices.push(v(x, y + outer));
            indices.push(v(x, y));
            // Don't touch the north edge.
            if y + outer == last {
                indices.push(v(x + inner, y + outer - inner));
            } else {
                indices.push(v(x + inner, y + outer));
            }

            for i in (0..outer).step_by(inner) {
                // Don't touch the south or north edges.
                if y + i == 0 || y + i == last - inner {
                    continue;
                }
                indices.extend_from_slice(&[v(x, y), v(x + inner, y + i), v(x + inner, y + i + inner)]);
            }
        }

        // East
        let x = last;
        let outer = edge_step(lod_flags.edge_delta(Direction::East), n);
        for y in (0..last).step_by(outer) {
            indices.push(v(x, y));
            indices.push(v(x, y + outer));
            // Don't touch the south edge.
            if y == 0 {
                indices.push(v(x - inner, y + inner));
            } else {
                indices.push(v(x - inner, y));
            }

            for i in (0..outer).step_by(inner) {
                if y + i == 0 || y + i == last - inner {
                    continue;
                }
                indices.extend_from_slice(&[v(x - inner, y + i + inner), v(x, y + outer), v(x - inner, y + i)]);
            }
        }
    }

    Indices::with_vertex_count(indices, n * n)
}

/// The vertex stride along an edge with LOD `delta`. The stride is reduced until it evenly divides the edge, so the
/// last segment always ends exactly on the corner vertex.
fn edge_step(delta: u8, grid_resolution: usize) -> usize {
    let intervals = grid_resolution - 1;
    let mut step = 1usize << delta.min(15);
    while step > 1 && (step > intervals || intervals % step != 0) {
        step >>= 1;
    }

    step
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
