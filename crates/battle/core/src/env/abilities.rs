//! Ability definitions and their oracle.
use crate::state::{AbilityId, ChannelFlags, StatusId, TemplateId};

/// Channel phase at which an effect fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectTrigger {
    OnChannelStart,
    OnChannelTick,
    OnChannelComplete,
    OnChannelInterrupt,
}

/// Who an effect lands on. Resolved against the live participant list when
/// the effect fires.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectScope {
    #[cfg_attr(feature = "serde", serde(rename = "Self"))]
    SelfOnly,
    CurrentTarget,
    AllEnemies,
    AllAllies,
    AllEnemiesInRange(f32),
    AllAlliesInRange(f32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealTarget {
    #[default]
    Hp,
    Shield,
    /// Fill HP first and spill the rest into the shield.
    HpThenShield,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityEffect {
    /// Hit through the combat resolver for `multiplier` times the caster's
    /// damage.
    Damage { multiplier: f32 },
    Heal { amount: f32, target: HealTarget },
    ApplyStatus { status: StatusId },
    /// Spawns allies of the caster around the caster.
    Summon { template: TemplateId, count: u32 },
    /// Replaces each affected participant with an enemy built from the
    /// template.
    TransformIntoEnemy { template: TemplateId },
    RestoreMana { amount: f32 },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggeredEffect {
    pub trigger: EffectTrigger,
    pub scope: EffectScope,
    pub effect: AbilityEffect,
}

/// When the AI considers casting an ability.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastCondition {
    /// Current target within [`AbilityDefinition::range`].
    #[default]
    TargetInRange,
    /// Some living ally (the caster included) below the HP ratio.
    AllyWounded { below_hp_ratio: f32 },
    /// Caster below the HP ratio.
    SelfWounded { below_hp_ratio: f32 },
    /// Whenever the ability is ready.
    Always,
}

/// Read-only ability definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDefinition {
    pub id: AbilityId,
    pub name: String,
    pub cooldown_ms: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_cost: f32,
    /// `0` casts instantly: start and complete effects fire in the same tick.
    #[cfg_attr(feature = "serde", serde(default))]
    pub channel_duration_ms: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tick_interval_ms: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: ChannelFlags,
    #[cfg_attr(feature = "serde", serde(default))]
    pub range: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cast_condition: CastCondition,
    pub effects: Vec<TriggeredEffect>,
}

impl AbilityDefinition {
    pub fn effects_for(&self, trigger: EffectTrigger) -> impl Iterator<Item = &TriggeredEffect> {
        self.effects.iter().filter(move |e| e.trigger == trigger)
    }

    pub fn is_instant(&self) -> bool {
        self.channel_duration_ms == 0
    }
}

/// Lookup of ability definitions by id.
pub trait AbilityOracle: Send + Sync {
    fn ability(&self, id: &AbilityId) -> Option<&AbilityDefinition>;
}
