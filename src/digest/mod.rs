//! Digestion: extraction, version cache, and the cache-gated digester

mod cache;
mod digester;
mod extractor;

pub use cache::*;
pub use digester::*;
pub use extractor::*;
