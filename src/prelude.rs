pub use crate::builder::{Cache, CacheBuilder, EvictionPolicy};
pub use crate::ds::{FreqBuckets, GhostList, RecencyList, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::policy::arc::{ArcCache, ConcurrentArcCache};
pub use crate::policy::lfu::{AgingLfuCache, ConcurrentLfuCache};
pub use crate::policy::lru::{ConcurrentLruCache, LruCore};
pub use crate::traits::{CacheEngine, ReadOnlyCache};
