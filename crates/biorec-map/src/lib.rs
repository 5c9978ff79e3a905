//! Mapping-profile resolution for import runs.
//!
//! A mapping profile assigns source columns (or fixed values) to dotted
//! target field names like `Site.Locality`. [`MappingIndex`] resolves the
//! profile against the staged columns once per run; [`FieldResolver`] then
//! answers per-row field lookups for the hierarchy resolvers.

pub mod config;
pub mod index;
pub mod resolver;

pub use config::{load_mapping_config, save_mapping_config};
pub use index::{MappingIndex, MappingTarget, TraitTarget};
pub use resolver::FieldResolver;
