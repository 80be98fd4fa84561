//! Analysis cache adapters.
//!
//! - `InMemoryAnalysisCache` - TTL + size bounded, process-local

mod in_memory;

pub use in_memory::InMemoryAnalysisCache;
