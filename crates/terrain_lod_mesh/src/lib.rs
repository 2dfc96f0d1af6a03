#![deny(rust_2018_compatibility, rust_2018_idioms, nonstandard_style)]
#![warn(clippy::doc_markdown)]

//! Geometry generation for terrain chunks.
//!
//! - `stitched_grid_indices`: triangulation of a chunk's vertex grid with crack-free seams against coarser neighbours
//! - `grid_uvs`: texture coordinates for the same grid layout
//! - `flat_grid_positions` and `TexturedQuad`: the flat geometry drawn when baking composite maps
//!
//! All grids share one layout: vertex `(x, y)` lives at index `x * grid_resolution + y`.

mod grid;
mod indices;

pub use grid::*;
pub use indices::*;
