use std::fmt;

/// A cardinal edge of a square chunk.
///
/// Within a chunk's vertex grid, `South` is the row of vertices at minimum Y, `North` the row at maximum Y, `West` the
/// column at minimum X and `East` the column at maximum X.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
}

/// Per-edge LOD stitching flags for one chunk.
///
/// For each `Direction`, 4 bits at `4 * direction` hold how many levels coarser the neighbouring chunk on that edge is.
/// A delta of `d` means only every `2^d`-th vertex of that edge may be referenced, so the shared edge has no T-junctions.
///
/// Bits 16 and up optionally carry a vertex LOD chosen by the LOD selection driver. When non-zero it overrides the
/// nominal LOD a chunk is requested with.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct LodFlags(pub u32);

impl LodFlags {
    pub const NONE: Self = LodFlags(0);

    const BITS_PER_EDGE: u32 = 4;
    const EDGE_MASK: u32 = 0xf;
    const VERTEX_LOD_SHIFT: u32 = 4 * Self::BITS_PER_EDGE;

    #[inline]
    pub fn edge_delta(&self, direction: Direction) -> u8 {
        ((self.0 >> (Self::BITS_PER_EDGE * direction as u32)) & Self::EDGE_MASK) as u8
    }

    /// Returns a copy with the delta for `direction` replaced. Deltas are truncated to 4 bits.
    #[inline]
    pub fn with_edge_delta(self, direction: Direction, delta: u8) -> Self {
        let shift = Self::BITS_PER_EDGE * direction as u32;
        let cleared = self.0 & !(Self::EDGE_MASK << shift);

        LodFlags(cleared | ((delta as u32 & Self::EDGE_MASK) << shift))
    }

    #[inline]
    pub fn any_edge_delta(&self) -> bool {
        self.stitch_bits() != 0
    }

    /// Only the bits that affect triangulation.
    #[inline]
    pub fn stitch_bits(&self) -> u16 {
        (self.0 & 0xffff) as u16
    }

    #[inline]
    pub fn vertex_lod(&self) -> u8 {
        (self.0 >> Self::VERTEX_LOD_SHIFT) as u8
    }

    #[inline]
    pub fn with_vertex_lod(self, lod: u8) -> Self {
        LodFlags(self.0 & 0xffff | (lod as u32) << Self::VERTEX_LOD_SHIFT)
    }
}

impl fmt::Debug for LodFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LodFlags")
            .field("north", &self.edge_delta(Direction::North))
            .field("east", &self.edge_delta(Direction::East))
            .field("south", &self.edge_delta(Direction::South))
            .field("west", &self.edge_delta(Direction::West))
            .field("vertex_lod", &self.vertex_lod())
            .finish()
    }
}

/// The number of vertices along one edge of a chunk's grid.
///
/// `cell_vertices` is the number of vertices along one edge of a full cell at LOD 0. A chunk of `chunk_size` cells at
/// `lod` keeps every `2^lod`-th vertex. A chunk spanning less than one interval has a single vertex.
pub fn grid_resolution(cell_vertices: u32, chunk_size: f32, lod: u8) -> u32 {
    debug_assert!(cell_vertices >= 2);

    let intervals = (cell_vertices - 1) as f32 * chunk_size / 2f32.powi(lod as i32);

    intervals as u32 + 1
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
