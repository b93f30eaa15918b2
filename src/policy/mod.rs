pub mod arc;
pub mod lfu;
pub mod lru;

pub use arc::{ArcCache, ConcurrentArcCache};
pub use lfu::{AgingLfuCache, ConcurrentLfuCache};
pub use lru::{ConcurrentLruCache, LruCore};
