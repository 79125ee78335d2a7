//! Status effect definitions and their oracle.
use crate::state::{
    ParticipantId, StatusEffect, StatusEffectKind, StatusId, StatusInstanceId, StatusTag,
};
use crate::stats::StatModifier;

/// Authored form of [`StatusEffectKind`], without runtime countdowns.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusTemplate {
    Buff(StatModifier),
    Debuff(StatModifier),
    Stun,
    Dot {
        damage_per_tick: f32,
        tick_interval_ms: u32,
    },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusDefinition {
    pub id: StatusId,
    pub name: String,
    pub duration_ms: u32,
    pub effect: StatusTemplate,
}

impl StatusDefinition {
    pub fn tag(&self) -> StatusTag {
        match self.effect {
            StatusTemplate::Buff(_) => StatusTag::Buff,
            StatusTemplate::Debuff(_) => StatusTag::Debuff,
            StatusTemplate::Stun => StatusTag::Stun,
            StatusTemplate::Dot { .. } => StatusTag::Dot,
        }
    }

    /// Creates a live instance. A DOT's first tick lands one full interval
    /// after it starts counting.
    pub fn instantiate(
        &self,
        id: StatusInstanceId,
        source: Option<ParticipantId>,
        tick: u64,
    ) -> StatusEffect {
        let kind = match self.effect {
            StatusTemplate::Buff(modifier) => StatusEffectKind::Buff(modifier),
            StatusTemplate::Debuff(modifier) => StatusEffectKind::Debuff(modifier),
            StatusTemplate::Stun => StatusEffectKind::Stun,
            StatusTemplate::Dot {
                damage_per_tick,
                tick_interval_ms,
            } => StatusEffectKind::Dot {
                damage_per_tick,
                tick_interval_ms,
                until_next_tick_ms: tick_interval_ms,
            },
        };
        StatusEffect {
            id,
            status_id: Some(self.id.clone()),
            name: self.name.clone(),
            kind,
            remaining_ms: self.duration_ms,
            source,
            applied_tick: tick,
        }
    }
}

/// Lookup of status effect definitions by id.
pub trait StatusOracle: Send + Sync {
    fn status(&self, id: &StatusId) -> Option<&StatusDefinition>;
}
