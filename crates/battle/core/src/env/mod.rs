//! Read-only collaborators of the engine.
//!
//! Content definitions are reached through oracle traits so the engine never
//! depends on how content is stored. [`BattleEnv`] bundles the oracles with the
//! engine configuration and the defense mitigation model for one tick.
mod abilities;
mod mitigation;
mod rng;
mod statuses;
mod tables;
mod templates;

pub use abilities::{
    AbilityDefinition, AbilityEffect, AbilityOracle, CastCondition, EffectScope, EffectTrigger,
    HealTarget, TriggeredEffect,
};
pub use mitigation::{
    DefenseMitigation, DiminishingReturns, FlatReduction, MitigationModel, NoMitigation,
};
pub use rng::BattleRng;
pub use statuses::{StatusDefinition, StatusOracle, StatusTemplate};
pub use tables::ContentTables;
pub use templates::{ParticipantTemplate, TemplateOracle};

use crate::config::EngineConfig;
use crate::error::ContentError;
use crate::state::{AbilityId, StatusId, TemplateId};

#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    config: &'a EngineConfig,
    mitigation: &'a dyn DefenseMitigation,
    abilities: Option<&'a dyn AbilityOracle>,
    statuses: Option<&'a dyn StatusOracle>,
    templates: Option<&'a dyn TemplateOracle>,
}

impl<'a> BattleEnv<'a> {
    /// Environment without content. Mitigation follows `config.mitigation`.
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            mitigation: &config.mitigation,
            abilities: None,
            statuses: None,
            templates: None,
        }
    }

    /// Environment backed by one table set for every oracle.
    pub fn with_content(config: &'a EngineConfig, tables: &'a ContentTables) -> Self {
        Self::new(config)
            .with_abilities(tables)
            .with_statuses(tables)
            .with_templates(tables)
    }

    pub fn with_abilities(mut self, oracle: &'a dyn AbilityOracle) -> Self {
        self.abilities = Some(oracle);
        self
    }

    pub fn with_statuses(mut self, oracle: &'a dyn StatusOracle) -> Self {
        self.statuses = Some(oracle);
        self
    }

    pub fn with_templates(mut self, oracle: &'a dyn TemplateOracle) -> Self {
        self.templates = Some(oracle);
        self
    }

    pub fn with_mitigation(mut self, mitigation: &'a dyn DefenseMitigation) -> Self {
        self.mitigation = mitigation;
        self
    }

    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }

    pub fn mitigation(&self) -> &'a dyn DefenseMitigation {
        self.mitigation
    }

    pub fn abilities(&self) -> Option<&'a dyn AbilityOracle> {
        self.abilities
    }

    /// # Errors
    ///
    /// `ContentError::UnknownAbility` when the id has no definition,
    /// `ContentError::OracleUnavailable` when no ability oracle was provided.
    pub fn ability(&self, id: &AbilityId) -> Result<&'a AbilityDefinition, ContentError> {
        self.abilities
            .ok_or(ContentError::OracleUnavailable("abilities"))?
            .ability(id)
            .ok_or_else(|| ContentError::UnknownAbility(id.clone()))
    }

    /// # Errors
    ///
    /// `ContentError::UnknownStatus` or `ContentError::OracleUnavailable`.
    pub fn status(&self, id: &StatusId) -> Result<&'a StatusDefinition, ContentError> {
        self.statuses
            .ok_or(ContentError::OracleUnavailable("statuses"))?
            .status(id)
            .ok_or_else(|| ContentError::UnknownStatus(id.clone()))
    }

    /// # Errors
    ///
    /// `ContentError::UnknownTemplate` or `ContentError::OracleUnavailable`.
    pub fn template(&self, id: &TemplateId) -> Result<&'a ParticipantTemplate, ContentError> {
        self.templates
            .ok_or(ContentError::OracleUnavailable("templates"))?
            .template(id)
            .ok_or_else(|| ContentError::UnknownTemplate(id.clone()))
    }
}

impl core::fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BattleEnv")
            .field("config", self.config)
            .field("abilities", &self.abilities.is_some())
            .field("statuses", &self.statuses.is_some())
            .field("templates", &self.templates.is_some())
            .finish()
    }
}
