//! Stat Composer.
//!
//! Stages run in a fixed order for every stat:
//!
//! 1. base definition
//! 2. level scaling
//! 3. equipment and shards (flat)
//! 4. skills (flat, then percentage)
//! 5. global building bonuses and permanent buffs (percentage)
//! 6. run buffs (percentage, then flat)
//! 7. active status effects (percentages summed, then flat)
//! 8. clamp to [`StatKind::bounds`]
//!
//! Stages 3 to 6 only exist for heroes. Hero energy-shield stats are zeroed
//! while the shield building is missing.

use strum::IntoEnumIterator;

use super::{Bonus, BonusStack, CombatStats, StackOrder, StatKind, StatModifier};
use crate::state::{BattleContext, Participant, ParticipantKind};

/// Composes effective stats. Pure and idempotent.
pub fn compose(participant: &Participant, context: &BattleContext) -> CombatStats {
    let status_modifiers: Vec<StatModifier> = participant
        .status_effects
        .iter()
        .filter_map(|effect| effect.stat_modifier())
        .collect();

    let mut stats = CombatStats::default();
    for stat in StatKind::iter() {
        let mut value = participant.base.get(stat);

        match &participant.kind {
            ParticipantKind::Hero(profile) => {
                let progression = &profile.progression;
                value = level_scaled(value, stat, progression.level, &progression.level_growth);
                value = stack_for(
                    stat,
                    progression.equipment.iter().chain(&progression.shards),
                )
                .apply(value, StackOrder::FlatFirst);
                value = stack_for(stat, &progression.skills).apply(value, StackOrder::FlatFirst);
                value = stack_for(
                    stat,
                    context.global_bonuses.iter().chain(&progression.permanent_buffs),
                )
                .apply(value, StackOrder::FlatFirst);
                value = stack_for(stat, &context.run_buffs)
                    .apply(value, StackOrder::IncreasedFirst);
            }
            ParticipantKind::Enemy(profile) => {
                value = level_scaled(value, stat, profile.level, &profile.level_growth);
            }
        }

        value = stack_for(stat, &status_modifiers).apply(value, StackOrder::IncreasedFirst);

        let (min, max) = stat.bounds();
        *stats.get_mut(stat) = value.clamp(min, max);
    }

    if participant.is_hero() && !context.shield_building_built {
        for stat in StatKind::iter().filter(|s| s.is_energy_shield()) {
            *stats.get_mut(stat) = 0.0;
        }
    }

    stats
}

fn level_scaled(value: f32, stat: StatKind, level: u32, growth: &[StatModifier]) -> f32 {
    let levels_above_first = level.saturating_sub(1) as f32;
    if levels_above_first == 0.0 {
        return value;
    }
    growth
        .iter()
        .filter(|m| m.stat == stat)
        .map(|m| match m.bonus() {
            Bonus::Flat(per_level) => Bonus::Flat(per_level * levels_above_first),
            Bonus::Increased(per_level) => Bonus::Increased(per_level * levels_above_first),
        })
        .collect::<BonusStack>()
        .apply(value, StackOrder::FlatFirst)
}

fn stack_for<'a>(
    stat: StatKind,
    modifiers: impl IntoIterator<Item = &'a StatModifier>,
) -> BonusStack {
    modifiers
        .into_iter()
        .filter(|m| m.stat == stat)
        .map(StatModifier::bonus)
        .collect()
}
