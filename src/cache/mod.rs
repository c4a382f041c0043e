pub mod file_cache;
pub mod memory;

pub use file_cache::FileCache;
pub use memory::MemoryCache;
