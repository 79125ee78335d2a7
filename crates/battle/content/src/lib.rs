//! Data-driven battle content and loaders.
//!
//! This crate turns data files into the read-only inputs of `battle-core`:
//! - ability, status effect and participant template catalogs (RON)
//! - battle scenarios, i.e. arena, context and spawn lists (RON)
//! - engine configuration (TOML)
//!
//! Content never appears in battle state. The engine reaches it through the
//! oracle traits implemented by [`battle_core::ContentTables`].

pub mod validation;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use validation::{ContentIssue, validate};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentCatalog, ContentFactory, ContentLoader, EnemySpawn, HeroSpawn,
    LoadResult, ScenarioLoader, ScenarioSpec,
};
