//! Battle scenario loader.
//!
//! A scenario places template-built participants into an arena. Spawns are
//! resolved against a [`TemplateOracle`], so the same scenario file works
//! with any content set that defines its templates.

use std::path::Path;

use battle_core::{
    Arena, BattleContext, BattleState, EnemyProfile, HeroProfile, ParticipantKind,
    ParticipantTemplate, Position, Progression, StatModifier, TemplateId, TemplateOracle,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroSpawn {
    pub template: TemplateId,
    pub position: Position,
    #[serde(default)]
    pub progression: Progression,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub template: TemplateId,
    pub position: Position,
    #[serde(default = "first_level")]
    pub level: u32,
    #[serde(default)]
    pub level_growth: Vec<StatModifier>,
    #[serde(default)]
    pub is_boss: bool,
}

fn first_level() -> u32 {
    1
}

/// Scenario structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub name: String,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub arena: Arena,
    #[serde(default)]
    pub context: BattleContext,
    #[serde(default)]
    pub heroes: Vec<HeroSpawn>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
}

impl ScenarioSpec {
    /// Builds the initial battle state. Heroes are registered first, so they
    /// get the lowest ids and act first within a tick.
    pub fn build(&self, templates: &dyn TemplateOracle) -> LoadResult<BattleState> {
        if self.heroes.is_empty() || self.enemies.is_empty() {
            anyhow::bail!("scenario '{}' needs at least one hero and one enemy", self.name);
        }

        let mut state = BattleState::new(self.arena.clone(), self.context.clone(), self.seed);

        for spawn in &self.heroes {
            self.check_position(&spawn.template, spawn.position)?;
            let template = self.template(templates, &spawn.template)?;
            let profile = HeroProfile {
                progression: spawn.progression.clone(),
            };
            state.add_participant(template.instantiate_hero(profile, spawn.position));
        }

        for spawn in &self.enemies {
            self.check_position(&spawn.template, spawn.position)?;
            let template = self.template(templates, &spawn.template)?;
            let profile = EnemyProfile {
                level: spawn.level,
                level_growth: spawn.level_growth.clone(),
                is_boss: spawn.is_boss,
            };
            let enemy = template.instantiate(ParticipantKind::Enemy(profile), spawn.position);
            state.add_participant(enemy);
        }

        Ok(state)
    }

    fn template<'t>(
        &self,
        templates: &'t dyn TemplateOracle,
        id: &TemplateId,
    ) -> LoadResult<&'t ParticipantTemplate> {
        templates
            .template(id)
            .ok_or_else(|| anyhow::anyhow!("scenario '{}': unknown template '{}'", self.name, id))
    }

    fn check_position(&self, template: &TemplateId, position: Position) -> LoadResult<()> {
        let inside = (0.0..=self.arena.width).contains(&position.x)
            && (0.0..=self.arena.height).contains(&position.y);
        if !inside {
            anyhow::bail!(
                "scenario '{}': '{}' spawns at {} outside the {}x{} arena",
                self.name,
                template,
                position,
                self.arena.width,
                self.arena.height
            );
        }
        Ok(())
    }
}

/// Loader for battle scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<ScenarioSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ScenarioSpec> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))
    }
}
