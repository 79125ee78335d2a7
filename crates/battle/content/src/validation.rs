//! Cross-reference checks over a content table set.
//!
//! The engine resolves ids lazily, so a dangling reference only surfaces when
//! the effect that needs it fires. Running [`validate`] after loading catches
//! them up front.

use std::fmt;

use battle_core::{
    AbilityEffect, AbilityOracle, ContentError, ContentTables, StatusOracle, TemplateOracle,
};

/// A dangling id and the definition that refers to it.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentIssue {
    pub owner: String,
    pub error: ContentError,
}

impl fmt::Display for ContentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.owner, self.error)
    }
}

/// Every reference in `tables` that does not resolve, in table order.
pub fn validate(tables: &ContentTables) -> Vec<ContentIssue> {
    let mut issues = Vec::new();
    let mut report =
        |owner: String, error: ContentError| issues.push(ContentIssue { owner, error });

    for ability in tables.abilities() {
        let owner = format!("ability '{}'", ability.id);
        for triggered in &ability.effects {
            match &triggered.effect {
                AbilityEffect::ApplyStatus { status } if tables.status(status).is_none() => {
                    report(owner.clone(), ContentError::UnknownStatus(status.clone()));
                }
                AbilityEffect::Summon { template, .. }
                | AbilityEffect::TransformIntoEnemy { template }
                    if tables.template(template).is_none() =>
                {
                    report(owner.clone(), ContentError::UnknownTemplate(template.clone()));
                }
                _ => {}
            }
        }
    }

    for template in tables.templates() {
        let owner = format!("template '{}'", template.id);
        for ability in &template.abilities {
            if tables.ability(ability).is_none() {
                report(owner.clone(), ContentError::UnknownAbility(ability.clone()));
            }
        }
        let statuses = template
            .on_attack_procs
            .iter()
            .map(|on_attack| &on_attack.status)
            .chain(template.special_attack.iter().filter_map(|s| s.applies_status.as_ref()));
        for status in statuses {
            if tables.status(status).is_none() {
                report(owner.clone(), ContentError::UnknownStatus(status.clone()));
            }
        }
    }

    issues
}
