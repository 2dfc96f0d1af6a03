#![deny(
    rust_2018_compatibility,
    rust_2018_idioms,
    nonstandard_style,
    unused,
    future_incompatible
)]
#![warn(clippy::doc_markdown)]

//! Fixtures shared by the tests and benchmarks of the workspace.

pub mod gpu;
pub mod scene;
pub mod terrain;

pub use gpu::RecordingContext;
pub use scene::{RecordingBackend, TestScene};
pub use terrain::FlatTerrain;
