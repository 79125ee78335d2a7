//! Content catalog loader.

use std::path::Path;

use battle_core::{AbilityDefinition, ContentTables, ParticipantTemplate, StatusDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::validation::validate;

/// Content catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentCatalog {
    pub abilities: Vec<AbilityDefinition>,
    pub statuses: Vec<StatusDefinition>,
    pub templates: Vec<ParticipantTemplate>,
}

impl ContentCatalog {
    /// Builds the in-memory tables. Duplicate ids and dangling references
    /// are load errors.
    pub fn into_tables(self) -> LoadResult<ContentTables> {
        let mut tables = ContentTables::new();
        for ability in self.abilities {
            let id = ability.id.clone();
            if tables.insert_ability(ability).is_some() {
                anyhow::bail!("duplicate ability '{}'", id);
            }
        }
        for status in self.statuses {
            let id = status.id.clone();
            if tables.insert_status(status).is_some() {
                anyhow::bail!("duplicate status effect '{}'", id);
            }
        }
        for template in self.templates {
            let id = template.id.clone();
            if tables.insert_template(template).is_some() {
                anyhow::bail!("duplicate participant template '{}'", id);
            }
        }

        let issues = validate(&tables);
        if !issues.is_empty() {
            let listed: Vec<String> = issues.iter().map(ToString::to_string).collect();
            anyhow::bail!("content has dangling references:\n  {}", listed.join("\n  "));
        }
        Ok(tables)
    }
}

/// Loader for content catalogs from RON files.
pub struct ContentLoader;

impl ContentLoader {
    /// Load and validate a [`ContentCatalog`] from a RON file.
    pub fn load(path: &Path) -> LoadResult<ContentTables> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ContentTables> {
        let catalog: ContentCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse content catalog RON: {}", e))?;
        catalog.into_tables()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{AbilityId, AbilityOracle, ChannelFlags, StatusId, StatusOracle};

    const CATALOG: &str = r#"
        (
            abilities: [
                (
                    id: "shock",
                    name: "Shock",
                    cooldown_ms: 4000,
                    effects: [
                        (
                            trigger: OnChannelComplete,
                            scope: CurrentTarget,
                            effect: ApplyStatus(status: "stun"),
                        ),
                    ],
                ),
            ],
            statuses: [
                (id: "stun", name: "Stunned", duration_ms: 1000, effect: Stun),
            ],
        )
    "#;

    #[test]
    fn parses_catalog_with_defaults() {
        let tables = ContentLoader::parse(CATALOG).unwrap();
        let shock = tables.ability(&AbilityId::new("shock")).unwrap();
        assert!(shock.is_instant());
        assert_eq!(shock.mana_cost, 0.0);
        assert!(tables.status(&StatusId::new("stun")).is_some());
        assert_eq!(tables.templates().count(), 0);
    }

    #[test]
    fn parses_channel_flags_in_text_form() {
        let channeled = CATALOG.replace(
            "cooldown_ms: 4000,",
            r#"cooldown_ms: 4000,
               channel_duration_ms: 1000,
               flags: ("BLOCKS_MOVEMENT | BLOCKS_ACTIONS"),"#,
        );
        let tables = ContentLoader::parse(&channeled).unwrap();
        let shock = tables.ability(&AbilityId::new("shock")).unwrap();
        assert_eq!(
            shock.flags,
            ChannelFlags::BLOCKS_MOVEMENT | ChannelFlags::BLOCKS_ACTIONS
        );

        let actions_only = CATALOG.replace(
            "cooldown_ms: 4000,",
            r#"cooldown_ms: 4000, flags: ("BLOCKS_ACTIONS"),"#,
        );
        let tables = ContentLoader::parse(&actions_only).unwrap();
        let shock = tables.ability(&AbilityId::new("shock")).unwrap();
        assert_eq!(shock.flags, ChannelFlags::BLOCKS_ACTIONS);
    }

    #[test]
    fn dangling_status_is_a_load_error() {
        let broken = CATALOG.replace(
            r#"(id: "stun", name: "Stunned", duration_ms: 1000, effect: Stun),"#,
            "",
        );
        let err = ContentLoader::parse(&broken).unwrap_err();
        assert!(err.to_string().contains("unknown status effect 'stun'"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let duplicated = CATALOG.replace(
            r#"(id: "stun", name: "Stunned", duration_ms: 1000, effect: Stun),"#,
            r#"(id: "stun", name: "Stunned", duration_ms: 1000, effect: Stun),
               (id: "stun", name: "Dazed", duration_ms: 500, effect: Stun),"#,
        );
        let err = ContentLoader::parse(&duplicated).unwrap_err();
        assert!(err.to_string().contains("duplicate status effect 'stun'"));
    }
}
