//! Status effect engine.
//!
//! Effects tick once per engine tick: DOT countdowns first, then durations.
//! An effect attached during the current tick is left alone until the next
//! one, so its first DOT hit lands a full interval after application.

use crate::state::{
    AiState, ChannelingState, Participant, ParticipantId, StatusEffect, StatusEffectKind,
    StatusInstanceId,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotHit {
    pub instance: StatusInstanceId,
    pub source: Option<ParticipantId>,
    pub damage: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusTickReport {
    pub dot_hits: Vec<DotHit>,
    pub expired: Vec<StatusEffect>,
}

impl StatusTickReport {
    pub fn is_empty(&self) -> bool {
        self.dot_hits.is_empty() && self.expired.is_empty()
    }
}

/// Advances every effect by `dt_ms` and removes the ones that ran out.
///
/// DOT damage is reported, not applied, so the caller can route it to HP
/// and emit events.
pub fn tick_effects(
    effects: &mut Vec<StatusEffect>,
    dt_ms: u32,
    current_tick: u64,
) -> StatusTickReport {
    let mut report = StatusTickReport::default();

    for effect in effects.iter_mut() {
        if effect.applied_tick == current_tick {
            continue;
        }

        if let StatusEffectKind::Dot {
            damage_per_tick,
            tick_interval_ms,
            until_next_tick_ms,
        } = &mut effect.kind
        {
            let interval = i64::from((*tick_interval_ms).max(1));
            let mut countdown = i64::from(*until_next_tick_ms) - i64::from(dt_ms);
            while countdown <= 0 {
                report.dot_hits.push(DotHit {
                    instance: effect.id,
                    source: effect.source,
                    damage: *damage_per_tick,
                });
                countdown += interval;
            }
            *until_next_tick_ms = countdown as u32;
        }

        effect.remaining_ms = effect.remaining_ms.saturating_sub(dt_ms);
    }

    let mut index = 0;
    while index < effects.len() {
        if effects[index].remaining_ms == 0 && effects[index].applied_tick != current_tick {
            report.expired.push(effects.remove(index));
        } else {
            index += 1;
        }
    }

    report
}

/// Outcome of attaching a status effect.
#[derive(Clone, Debug, PartialEq)]
pub enum Application {
    Applied {
        /// Channel cut short by a stun. Its interrupt effects are the
        /// caller's to fire.
        interrupted: Option<ChannelingState>,
    },
    TargetDead,
}

/// Attaches an effect. Instances are never merged with existing ones.
pub fn apply_effect(target: &mut Participant, effect: StatusEffect) -> Application {
    if !target.is_alive() {
        return Application::TargetDead;
    }

    let stuns = effect.is_stun();
    target.status_effects.push(effect);

    let interrupted = if stuns {
        target.ai_state = AiState::Idle;
        target.channeling.take()
    } else {
        None
    };
    Application::Applied { interrupted }
}

/// Subtracts HP directly, skipping shield and defense. Returns `true` when
/// this damage killed the participant.
pub fn apply_direct_damage(target: &mut Participant, amount: f32) -> bool {
    let was_alive = target.current_hp > 0.0;
    target.current_hp = (target.current_hp - amount.max(0.0)).max(0.0);
    was_alive && target.current_hp <= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AbilityId, ChannelFlags};
    use crate::stats::{CombatStats, StatKind, StatModifier};

    fn effect(
        id: u32,
        kind: StatusEffectKind,
        remaining_ms: u32,
        applied_tick: u64,
    ) -> StatusEffect {
        StatusEffect {
            id: StatusInstanceId(id),
            status_id: None,
            name: format!("effect-{id}"),
            kind,
            remaining_ms,
            source: Some(ParticipantId(7)),
            applied_tick,
        }
    }

    fn dot(interval: u32) -> StatusEffectKind {
        StatusEffectKind::Dot {
            damage_per_tick: 3.0,
            tick_interval_ms: interval,
            until_next_tick_ms: interval,
        }
    }

    #[test]
    fn durations_never_increase_and_expired_effects_are_removed() {
        let buff = StatusEffectKind::Buff(StatModifier::flat(StatKind::Damage, 1.0));
        let mut effects = vec![effect(1, buff, 250, 0), effect(2, buff, 1000, 0)];

        let mut last = 1000;
        for tick in 1..=3 {
            let report = tick_effects(&mut effects, 100, tick);
            assert!(effects.iter().all(|e| e.remaining_ms > 0));

            let long = effects
                .iter()
                .find(|e| e.id == StatusInstanceId(2))
                .expect("long effect still active");
            assert!(long.remaining_ms < last);
            last = long.remaining_ms;

            if tick == 3 {
                assert_eq!(report.expired.len(), 1);
                assert_eq!(report.expired[0].id, StatusInstanceId(1));
            }
        }
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn fresh_effects_wait_for_next_tick() {
        let mut effects = vec![effect(1, dot(100), 500, 4)];
        let report = tick_effects(&mut effects, 100, 4);
        assert!(report.is_empty());
        assert_eq!(effects[0].remaining_ms, 500);

        let report = tick_effects(&mut effects, 100, 5);
        assert_eq!(report.dot_hits.len(), 1);
        assert_eq!(effects[0].remaining_ms, 400);
    }

    #[test]
    fn dot_fires_once_per_interval_not_per_tick() {
        let applied_at = 10;
        let mut effects = vec![effect(1, dot(2000), 10_000, applied_at)];

        let mut hit_ticks = Vec::new();
        for tick in applied_at..=applied_at + 100 {
            let report = tick_effects(&mut effects, 100, tick);
            for _ in &report.dot_hits {
                hit_ticks.push(tick);
            }
        }

        assert_eq!(hit_ticks, vec![30, 50, 70, 90, 110]);
        assert!(effects.is_empty());
    }

    #[test]
    fn short_interval_fires_multiple_times_per_tick() {
        let mut effects = vec![effect(1, dot(40), 1000, 0)];
        let report = tick_effects(&mut effects, 100, 1);
        assert_eq!(report.dot_hits.len(), 2);
    }

    #[test]
    fn stun_interrupts_channel() {
        let stats = CombatStats {
            max_hp: 10.0,
            ..Default::default()
        };
        let mut caster = Participant::enemy("shaman", stats);
        caster.channeling = Some(ChannelingState {
            ability_id: AbilityId::new("hex"),
            caster_id: caster.id,
            target_id: None,
            duration_ms: 2000,
            elapsed_ms: 0,
            tick_interval_ms: None,
            until_next_tick_ms: 0,
            flags: ChannelFlags::BLOCKS_MOVEMENT,
        });
        caster.ai_state = AiState::Channeling;

        let outcome = apply_effect(&mut caster, effect(1, StatusEffectKind::Stun, 1000, 0));
        match outcome {
            Application::Applied { interrupted } => assert!(interrupted.is_some()),
            Application::TargetDead => panic!("caster is alive"),
        }
        assert!(caster.channeling.is_none());
        assert_eq!(caster.ai_state, AiState::Idle);
        assert!(caster.is_stunned());
    }

    #[test]
    fn effects_do_not_land_on_corpses() {
        let mut corpse = Participant::enemy("corpse", CombatStats::default());
        corpse.current_hp = 0.0;
        assert_eq!(
            apply_effect(&mut corpse, effect(1, StatusEffectKind::Stun, 1000, 0)),
            Application::TargetDead
        );
        assert!(corpse.status_effects.is_empty());
    }

    #[test]
    fn direct_damage_bypasses_shield() {
        let stats = CombatStats {
            max_hp: 10.0,
            ..Default::default()
        };
        let mut target = Participant::enemy("golem", stats);
        target.current_energy_shield = Some(50.0);
        assert!(!apply_direct_damage(&mut target, 4.0));
        assert_eq!(target.current_hp, 6.0);
        assert_eq!(target.current_energy_shield, Some(50.0));
        assert!(apply_direct_damage(&mut target, 40.0));
        assert_eq!(target.current_hp, 0.0);
    }
}
