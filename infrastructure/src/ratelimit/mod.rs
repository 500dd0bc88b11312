//! Rate-limit store adapters.

mod memory_store;

pub use memory_store::InMemoryRateLimitStore;
