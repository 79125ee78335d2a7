use std::collections::BTreeMap;

use super::{
    AbilityDefinition, AbilityOracle, ParticipantTemplate, StatusDefinition, StatusOracle,
    TemplateOracle,
};
use crate::state::{AbilityId, StatusId, TemplateId};

/// In-memory content tables implementing every content oracle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContentTables {
    abilities: BTreeMap<AbilityId, AbilityDefinition>,
    statuses: BTreeMap<StatusId, StatusDefinition>,
    templates: BTreeMap<TemplateId, ParticipantTemplate>,
}

impl ContentTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_ability(&mut self, ability: AbilityDefinition) -> Option<AbilityDefinition> {
        self.abilities.insert(ability.id.clone(), ability)
    }

    pub fn insert_status(&mut self, status: StatusDefinition) -> Option<StatusDefinition> {
        self.statuses.insert(status.id.clone(), status)
    }

    pub fn insert_template(
        &mut self,
        template: ParticipantTemplate,
    ) -> Option<ParticipantTemplate> {
        self.templates.insert(template.id.clone(), template)
    }

    pub fn with_ability(mut self, ability: AbilityDefinition) -> Self {
        self.insert_ability(ability);
        self
    }

    pub fn with_status(mut self, status: StatusDefinition) -> Self {
        self.insert_status(status);
        self
    }

    pub fn with_template(mut self, template: ParticipantTemplate) -> Self {
        self.insert_template(template);
        self
    }

    pub fn abilities(&self) -> impl Iterator<Item = &AbilityDefinition> {
        self.abilities.values()
    }

    pub fn statuses(&self) -> impl Iterator<Item = &StatusDefinition> {
        self.statuses.values()
    }

    pub fn templates(&self) -> impl Iterator<Item = &ParticipantTemplate> {
        self.templates.values()
    }
}

impl AbilityOracle for ContentTables {
    fn ability(&self, id: &AbilityId) -> Option<&AbilityDefinition> {
        self.abilities.get(id)
    }
}

impl StatusOracle for ContentTables {
    fn status(&self, id: &StatusId) -> Option<&StatusDefinition> {
        self.statuses.get(id)
    }
}

impl TemplateOracle for ContentTables {
    fn template(&self, id: &TemplateId) -> Option<&ParticipantTemplate> {
        self.templates.get(id)
    }
}
