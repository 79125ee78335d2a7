//! Combat resolver.
//!
//! Resolution is split into a pure planning step ([`plan_attack`]) and a
//! mutation step ([`apply_damage`]) so the plan can be inspected and tested
//! without touching state. Procs and death handling need content and the
//! whole battle, so the scheduler drives them around [`resolve_attack`].

use crate::env::{BattleRng, DefenseMitigation, HealTarget};
use crate::event::{AttackEvent, AttackSource};
use crate::state::{AbilityId, AiState, ChannelingState, Participant, ParticipantId};

#[derive(Clone, Debug, PartialEq)]
pub enum AttackKind {
    Basic,
    Special { multiplier: f32 },
    Ability { ability: AbilityId, multiplier: f32 },
}

impl AttackKind {
    pub fn multiplier(&self) -> f32 {
        match self {
            Self::Basic => 1.0,
            Self::Special { multiplier } | Self::Ability { multiplier, .. } => *multiplier,
        }
    }

    pub fn is_special(&self) -> bool {
        matches!(self, Self::Special { .. })
    }

    pub fn source(&self) -> AttackSource {
        match self {
            Self::Basic => AttackSource::Basic,
            Self::Special { .. } => AttackSource::Special,
            Self::Ability { ability, .. } => AttackSource::Ability(ability.clone()),
        }
    }
}

/// Damage numbers for one attack, before anything is mutated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackPlan {
    pub is_crit: bool,
    pub raw_damage: f32,
    pub mitigated_damage: f32,
    pub shield_damage: f32,
    pub damage: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttackResolution {
    pub event: AttackEvent,
    /// The hit took the target from positive HP to zero.
    pub killed: bool,
}

/// Splits `amount` into the part the shield absorbs and the part that
/// spills into HP.
pub fn split_absorption(shield: f32, amount: f32) -> (f32, f32) {
    let amount = amount.max(0.0);
    let absorbed = shield.max(0.0).min(amount);
    (absorbed, amount - absorbed)
}

/// Plans an attack. `None` when the target is already dead or dying.
///
/// The crit roll is the only draw from `rng`.
pub fn plan_attack(
    attacker: &Participant,
    target: &Participant,
    kind: &AttackKind,
    rng: &mut BattleRng,
    mitigation: &dyn DefenseMitigation,
) -> Option<AttackPlan> {
    if !target.is_alive() {
        return None;
    }

    let is_crit = rng.roll(attacker.stats.crit_chance);
    let crit_multiplier = if is_crit {
        attacker.stats.crit_damage.max(1.0)
    } else {
        1.0
    };
    let raw_damage = attacker.stats.damage * kind.multiplier() * crit_multiplier;
    let mitigated_damage = mitigation.mitigate(raw_damage, target.stats.defense).max(0.0);
    let (shield_damage, damage) = split_absorption(target.shield(), mitigated_damage);

    Some(AttackPlan {
        is_crit,
        raw_damage,
        mitigated_damage,
        shield_damage,
        damage,
    })
}

/// Applies shield then HP damage. Returns `true` if this hit killed the
/// target.
pub fn apply_damage(target: &mut Participant, shield_damage: f32, damage: f32) -> bool {
    let was_alive = target.current_hp > 0.0;

    if let Some(shield) = target.current_energy_shield.as_mut() {
        *shield = (*shield - shield_damage).max(0.0);
    }
    target.current_hp = (target.current_hp - damage).max(0.0);

    if shield_damage > 0.0 || damage > 0.0 {
        target.shield_recharge_wait_ms = target.stats.shield_recharge_delay.max(0.0) as u32;
    }

    debug_assert!(target.current_hp >= 0.0);
    debug_assert!(target.shield() >= 0.0);
    was_alive && target.current_hp <= 0.0
}

/// Plans and applies an attack, producing its event. `None` means the target
/// was already dead and nothing happened.
pub fn resolve_attack(
    attacker: &Participant,
    target: &mut Participant,
    kind: &AttackKind,
    rng: &mut BattleRng,
    mitigation: &dyn DefenseMitigation,
    tick: u64,
    timestamp_ms: u64,
) -> Option<AttackResolution> {
    let plan = plan_attack(attacker, target, kind, rng, mitigation)?;
    let killed = apply_damage(target, plan.shield_damage, plan.damage);

    Some(AttackResolution {
        event: AttackEvent {
            attacker: attacker.id,
            target: target.id,
            damage: plan.damage,
            shield_damage: plan.shield_damage,
            heal: 0.0,
            is_crit: plan.is_crit,
            is_heal: false,
            is_special: kind.is_special(),
            source: kind.source(),
            applied_status: None,
            tick,
            timestamp_ms,
        },
        killed,
    })
}

/// Heals a living target, clamped to its maxima. `None` for corpses.
pub fn resolve_heal(
    healer: ParticipantId,
    target: &mut Participant,
    amount: f32,
    heal_target: HealTarget,
    source: AttackSource,
    tick: u64,
    timestamp_ms: u64,
) -> Option<AttackEvent> {
    if !target.is_alive() {
        return None;
    }

    let mut remaining = amount.max(0.0);
    let mut healed = 0.0;
    if matches!(heal_target, HealTarget::Hp | HealTarget::HpThenShield) {
        let restored = remaining.min((target.stats.max_hp - target.current_hp).max(0.0));
        target.current_hp += restored;
        healed += restored;
        remaining -= restored;
    }
    // Overflow only spills into the shield for HpThenShield.
    if matches!(heal_target, HealTarget::Shield | HealTarget::HpThenShield) {
        let max_shield = target.stats.max_energy_shield;
        if let Some(shield) = target.current_energy_shield.as_mut() {
            let restored = remaining.min((max_shield - *shield).max(0.0));
            *shield += restored;
            healed += restored;
        }
    }

    Some(AttackEvent {
        attacker: healer,
        target: target.id,
        damage: 0.0,
        shield_damage: 0.0,
        heal: healed,
        is_crit: false,
        is_heal: true,
        is_special: false,
        source,
        applied_status: None,
        tick,
        timestamp_ms,
    })
}

/// Moves a participant that reached 0 HP into the dying window. Status
/// effects are dropped and any channel is handed back to the caller, which
/// is responsible for firing its interrupt effects.
pub fn begin_dying(participant: &mut Participant, dying_ticks: u32) -> Option<ChannelingState> {
    participant.current_hp = 0.0;
    participant.dying_ticks_remaining = Some(dying_ticks);
    participant.status_effects.clear();
    participant.ai_state = AiState::Idle;
    participant.ai_repositioning_target = None;
    participant.channeling.take()
}

/// Advances energy shield recharge and mana regeneration by `dt_ms`.
///
/// The shield only recharges once `shield_recharge_wait_ms` has run out; any
/// damage resets that wait.
pub fn regenerate(participant: &mut Participant, dt_ms: u32) {
    let dt_seconds = dt_ms as f32 / 1000.0;
    let stats = participant.stats;

    if let Some(shield) = participant.current_energy_shield.as_mut() {
        if participant.shield_recharge_wait_ms > 0 {
            participant.shield_recharge_wait_ms =
                participant.shield_recharge_wait_ms.saturating_sub(dt_ms);
        } else if *shield < stats.max_energy_shield {
            *shield =
                (*shield + stats.shield_recharge_rate * dt_seconds).min(stats.max_energy_shield);
        }
    }

    if let Some(mana) = participant.current_mana.as_mut() {
        *mana = (*mana + stats.mana_regen * dt_seconds).min(stats.max_mana);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::NoMitigation;
    use crate::stats::CombatStats;

    fn attacker() -> Participant {
        let mut p = Participant::hero(
            "striker",
            CombatStats {
                max_hp: 100.0,
                damage: 10.0,
                crit_chance: 0.0,
                crit_damage: 2.0,
                ..CombatStats::default()
            },
        );
        p.id = ParticipantId(1);
        p
    }

    fn target(shield: f32) -> Participant {
        let mut p = Participant::enemy(
            "dummy",
            CombatStats {
                max_hp: 50.0,
                max_energy_shield: shield,
                ..CombatStats::default()
            },
        );
        p.id = ParticipantId(2);
        p.current_energy_shield = Some(shield);
        p
    }

    fn hit(target: &mut Participant) -> AttackResolution {
        let mut rng = BattleRng::from_seed(1);
        resolve_attack(&attacker(), target, &AttackKind::Basic, &mut rng, &NoMitigation, 1, 100)
            .expect("target alive")
    }

    #[test]
    fn unshielded_target_takes_full_damage() {
        let mut dummy = target(0.0);
        let result = hit(&mut dummy);

        assert_eq!(dummy.current_hp, 40.0);
        assert_eq!(result.event.damage, 10.0);
        assert_eq!(result.event.shield_damage, 0.0);
        assert!(!result.killed);
    }

    #[test]
    fn shield_absorbs_before_hp() {
        let mut dummy = target(5.0);
        let result = hit(&mut dummy);

        assert_eq!(dummy.current_energy_shield, Some(0.0));
        assert_eq!(dummy.current_hp, 45.0);
        assert_eq!(result.event.shield_damage, 5.0);
        assert_eq!(result.event.damage, 5.0);
    }

    #[test]
    fn shield_plus_hp_damage_equals_mitigated_amount() {
        for shield in [0.0, 3.0, 10.0, 25.0] {
            let mut dummy = target(shield);
            let plan = plan_attack(
                &attacker(),
                &dummy,
                &AttackKind::Special { multiplier: 1.7 },
                &mut BattleRng::from_seed(5),
                &NoMitigation,
            )
            .expect("target alive");
            assert_eq!(plan.shield_damage + plan.damage, plan.mitigated_damage);

            apply_damage(&mut dummy, plan.shield_damage, plan.damage);
            if plan.damage > 0.0 {
                assert_eq!(dummy.shield(), 0.0);
            }
        }
    }

    #[test]
    fn certain_crit_multiplies_damage() {
        let mut striker = attacker();
        striker.stats.crit_chance = 1.0;
        let dummy = target(0.0);

        let plan = plan_attack(
            &striker,
            &dummy,
            &AttackKind::Basic,
            &mut BattleRng::from_seed(0),
            &NoMitigation,
        )
        .expect("target alive");
        assert!(plan.is_crit);
        assert_eq!(plan.damage, 20.0);
    }

    #[test]
    fn lethal_hit_clamps_hp_and_reports_kill() {
        let mut dummy = target(0.0);
        dummy.current_hp = 4.0;
        let result = hit(&mut dummy);

        assert_eq!(dummy.current_hp, 0.0);
        assert!(result.killed);
    }

    #[test]
    fn corpses_are_ignored() {
        let mut dummy = target(0.0);
        dummy.current_hp = 0.0;
        let mut rng = BattleRng::from_seed(1);
        let attack = resolve_attack(
            &attacker(),
            &mut dummy,
            &AttackKind::Basic,
            &mut rng,
            &NoMitigation,
            1,
            100,
        );
        assert!(attack.is_none());
        let heal = resolve_heal(
            ParticipantId(1),
            &mut dummy,
            10.0,
            HealTarget::Hp,
            AttackSource::Basic,
            1,
            100,
        );
        assert!(heal.is_none());
        assert_eq!(dummy.current_hp, 0.0);
    }

    #[test]
    fn heal_clamps_to_max_and_spills_into_shield() {
        let mut dummy = target(10.0);
        dummy.current_hp = 45.0;
        dummy.current_energy_shield = Some(2.0);

        let event = resolve_heal(
            ParticipantId(1),
            &mut dummy,
            10.0,
            HealTarget::HpThenShield,
            AttackSource::Basic,
            3,
            300,
        )
        .expect("target alive");

        assert!(event.is_heal);
        assert_eq!(event.heal, 10.0);
        assert_eq!(dummy.current_hp, 50.0);
        assert_eq!(dummy.current_energy_shield, Some(7.0));

        let event = resolve_heal(
            ParticipantId(1),
            &mut dummy,
            10.0,
            HealTarget::Hp,
            AttackSource::Basic,
            3,
            300,
        )
        .expect("target alive");
        assert_eq!(event.heal, 0.0);
        assert_eq!(dummy.current_hp, 50.0);
    }

    #[test]
    fn hp_heal_reports_only_what_was_restored() {
        let mut dummy = target(10.0);
        dummy.current_hp = 46.0;
        dummy.current_energy_shield = Some(0.0);

        let event = resolve_heal(
            ParticipantId(1),
            &mut dummy,
            10.0,
            HealTarget::Hp,
            AttackSource::Basic,
            3,
            300,
        )
        .expect("target alive");

        assert_eq!(event.heal, 4.0);
        assert_eq!(dummy.current_hp, 50.0);
        assert_eq!(dummy.current_energy_shield, Some(0.0));
    }

    #[test]
    fn shield_recharges_only_after_delay() {
        let mut dummy = target(10.0);
        dummy.stats.shield_recharge_rate = 10.0;
        dummy.stats.shield_recharge_delay = 200.0;
        dummy.stats.max_mana = 20.0;
        dummy.stats.mana_regen = 5.0;
        dummy.current_mana = Some(0.0);

        let result = hit(&mut dummy);
        assert_eq!(result.event.shield_damage, 10.0);
        assert_eq!(dummy.shield_recharge_wait_ms, 200);

        regenerate(&mut dummy, 100);
        regenerate(&mut dummy, 100);
        assert_eq!(dummy.current_energy_shield, Some(0.0));

        regenerate(&mut dummy, 100);
        assert_eq!(dummy.current_energy_shield, Some(1.0));
        assert_eq!(dummy.current_mana, Some(1.5));

        for _ in 0..100 {
            regenerate(&mut dummy, 100);
        }
        assert_eq!(dummy.current_energy_shield, Some(10.0));
        assert_eq!(dummy.current_mana, Some(20.0));
    }

    #[test]
    fn dying_clears_statuses_and_returns_channel() {
        let mut dummy = target(0.0);
        dummy.channeling = Some(ChannelingState {
            ability_id: AbilityId::new("meteor"),
            caster_id: dummy.id,
            target_id: None,
            duration_ms: 1000,
            elapsed_ms: 200,
            tick_interval_ms: None,
            until_next_tick_ms: 0,
            flags: Default::default(),
        });
        dummy.ai_state = AiState::Channeling;

        let channel = begin_dying(&mut dummy, 3);
        assert!(channel.is_some());
        assert!(dummy.channeling.is_none());
        assert_eq!(dummy.ai_state, AiState::Idle);
        assert!(dummy.is_dying());
        assert!(!dummy.is_alive());
    }
}
