//! Content loaders for reading battle data from files.
//!
//! RON carries content catalogs and scenarios, TOML carries engine
//! configuration. Every loader has a `load` (path) and a `parse` (string)
//! entry point.

pub mod config;
pub mod content;
pub mod factory;
pub mod scenario;

pub use config::ConfigLoader;
pub use content::{ContentCatalog, ContentLoader};
pub use factory::ContentFactory;
pub use scenario::{EnemySpawn, HeroSpawn, ScenarioLoader, ScenarioSpec};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
