//! CLI library components for the biodiversity record importer.

pub mod logging;
pub mod progress;
pub mod run;
