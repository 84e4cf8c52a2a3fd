//! Content loading for Creamery games.
//!
//! Reads the catalog data files (generators, upgrades, achievements,
//! heroes, formations, prestige) from a directory in RON, TOML, or JSON,
//! validates names and cross-references, and builds the immutable
//! [`creamery_core::catalog::Catalog`] the engine consumes.

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, load_catalog};
