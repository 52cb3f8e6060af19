// ── Query cache ──
//
// Keyed storage of read results with request de-duplication, lazy
// invalidation and typed list patches for mutation results.

mod entry;
mod key;
mod patch;
mod query_cache;

pub use entry::{CacheData, CacheEntry, Cacheable, FetchStatus, QuerySnapshot, QueryStatus};
pub use key::{KeyScope, QueryKey, Resource};
pub use patch::{CachePatch, PatchReport};
pub use query_cache::QueryCache;
