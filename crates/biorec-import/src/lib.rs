//! The row-by-row import pipeline.
//!
//! A run classifies the mapping profile into an import level once, then
//! drives each staged row through hierarchical resolution (region chain,
//! site, visit, taxon ladder, material, part) inside its own transaction.
//! Failed rows are rolled back and routed to the error sink; the run always
//! completes and reports aggregate counts.

pub mod controller;
pub mod level;
pub mod progress;
pub mod resolver;
pub mod store;

pub use controller::{ImportSummary, Importer};
pub use level::classify_level;
pub use progress::{
    CancelToken, ImportLogger, LogLevel, NullLogger, NullProgress, ProgressSink, TracingLogger,
};
pub use resolver::HierarchicalResolver;
pub use store::{ImportStore, MemoryStore, StoredRegion, StoredTrait};
