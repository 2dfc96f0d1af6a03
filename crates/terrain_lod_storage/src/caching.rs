mod buffer_cache;
mod object_cache;

pub use buffer_cache::*;
pub use object_cache::*;
