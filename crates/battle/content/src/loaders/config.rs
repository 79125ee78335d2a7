//! Engine configuration loader.

use std::path::Path;

use battle_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load an [`EngineConfig`] from a TOML file. Missing keys keep their
    /// defaults.
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.tick_ms == 0 {
            anyhow::bail!("tick_ms must be greater than zero");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::MitigationModel;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("tick_ms = 50\nstrict_content = false\n").unwrap();
        assert_eq!(config.tick_ms, 50);
        assert!(!config.strict_content);
        assert_eq!(config.dying_ticks, EngineConfig::DEFAULT_DYING_TICKS);
        assert_eq!(config.mitigation, MitigationModel::Identity);
    }

    #[test]
    fn mitigation_model_is_tagged() {
        let config =
            ConfigLoader::parse("[mitigation]\nmodel = \"flat\"\nmin_damage = 1.0\n").unwrap();
        assert_eq!(config.mitigation, MitigationModel::Flat { min_damage: 1.0 });
    }

    #[test]
    fn zero_tick_is_rejected() {
        assert!(ConfigLoader::parse("tick_ms = 0").is_err());
    }
}
