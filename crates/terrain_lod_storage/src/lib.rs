#![deny(rust_2018_compatibility, rust_2018_idioms, nonstandard_style)]
#![warn(clippy::doc_markdown)]

//! Storage for terrain chunk data.
//!
//! There are two sharing rules, and each storage type follows exactly one of them:
//!   - `IndexBuffer` and `UvBuffer` are immutable once built and shared by reference between any number of chunks. The
//!     `BufferCache` memoizes them.
//!   - `VertexArray` is owned exclusively by one chunk. Reuse between chunks always goes through `VertexArray::deep_copy`.
//!
//! Built chunks themselves live in an `ObjectCache`, an ordered map of `Arc`s that expire once they go unreferenced for
//! long enough.

pub mod caching;
pub mod vertex_array;

pub use caching::*;
pub use vertex_array::*;

// Hash types to use for small keys like grid resolutions.
pub type SmallKeyHashMap<K, V> = ahash::AHashMap<K, V>;
pub type SmallKeyBuildHasher = ahash::RandomState;

pub mod prelude {
    pub use super::{BufferCache, IndexBuffer, ObjectCache, SmallKeyHashMap, UvBuffer, VertexArray};
}
