//! Field-level transformation for biodiversity record import.
//!
//! This crate turns raw mapped text into typed domain values:
//!
//! - **validator**: typed field getters with a per-call invalid-value policy
//! - **normalization**: compact dates, degree-minute-second text, unit ranges
//! - **geo**: the reference ellipsoid table and UTM grid conversion
//! - **coordinates**: spatial position classification and resolution
//! - **elevation**: elevation/depth merging and classification

pub mod coordinates;
pub mod elevation;
pub mod geo;
pub mod normalization;
pub mod validator;

pub use coordinates::{ResolvedPosition, resolve_position};
pub use elevation::{ResolvedElevation, resolve_elevation};
pub use validator::{FieldValidator, StandardFieldValidator, ValueReader};
