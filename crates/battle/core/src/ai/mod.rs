//! AI decision module.
//!
//! [`decide`] is a pure function of a participant and a read-only view of the
//! battle. It runs the pre-action gate, repairs the target reference, picks a
//! ready ability if one applies and otherwise dispatches to the role's
//! behavior tree. The scheduler applies the returned [`AiDecision`].

mod context;
mod roles;

pub use context::{AiContext, AiIntent, BattleView, CastRequest};
pub use roles::Role;

use behavior_tree::Behavior;
use tracing::{debug, trace};

use crate::channel;
use crate::env::CastCondition;
use crate::geometry::find_closest_target;
use crate::state::{AiState, Participant, ParticipantId};

/// Output of one AI evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct AiDecision {
    /// Target id the scheduler should store.
    pub target_id: Option<ParticipantId>,
    /// The target differs from the stored one. The intent is then a fresh
    /// IDLE decision and in-progress repositioning must be dropped.
    pub target_changed: bool,
    /// Decision cooldown to store.
    pub decision_cooldown_ticks: u32,
    pub intent: AiIntent,
}

impl AiDecision {
    fn hold(me: &Participant, target_id: Option<ParticipantId>, target_changed: bool) -> Self {
        Self {
            target_id,
            target_changed,
            decision_cooldown_ticks: if target_changed {
                0
            } else {
                me.ai_decision_cooldown_ticks
            },
            intent: AiIntent::idle(),
        }
    }
}

/// Evaluates one participant for the current tick. Never panics.
pub fn decide(me: &Participant, view: BattleView<'_>) -> AiDecision {
    if !me.is_alive() || me.is_stunned() {
        trace!(participant = %me.id, "ai gate: incapacitated");
        return AiDecision::hold(me, me.target_id, false);
    }

    let kept = me
        .target_id
        .and_then(|id| view.find(id))
        .filter(|target| target.is_alive() && target.is_hostile_to(me));
    let target = kept.or_else(|| {
        find_closest_target(
            me,
            view.participants.iter().filter(|p| p.is_hostile_to(me)),
            &[],
        )
    });
    let target_id = target.map(|t| t.id);

    if target_id != me.target_id {
        debug!(
            participant = %me.id,
            from = ?me.target_id,
            to = ?target_id,
            "retarget"
        );
        return AiDecision::hold(me, target_id, true);
    }
    let Some(target) = target else {
        return AiDecision::hold(me, None, false);
    };

    let decision_cooldown = me.ai_decision_cooldown_ticks.saturating_sub(1);
    let mut ctx = AiContext {
        me,
        target,
        view,
        decision_cooldown,
        intent: AiIntent::idle(),
    };

    if !me.is_channeling()
        && let Some(cast) = select_ability(&ctx)
    {
        debug!(participant = %me.id, ability = %cast.ability, "ai cast");
        ctx.intent.ai_state = AiState::Attacking;
        ctx.intent.cast = Some(cast);
    } else {
        let role = Role::of(me);
        role.tree().tick(&mut ctx);
        trace!(
            participant = %me.id,
            %role,
            state = %ctx.intent.ai_state,
            dx = ctx.intent.dx,
            dy = ctx.intent.dy,
            "ai decision"
        );
    }

    AiDecision {
        target_id,
        target_changed: false,
        decision_cooldown_ticks: ctx.intent.decision_cooldown_ticks.unwrap_or(decision_cooldown),
        intent: ctx.intent,
    }
}

/// First ability in the loadout that is ready, affordable and whose cast
/// condition holds. Unknown ids are skipped.
fn select_ability(ctx: &AiContext<'_>) -> Option<CastRequest> {
    let oracle = ctx.view.abilities?;
    let me = ctx.me;

    for ability_id in &me.abilities {
        let Some(ability) = oracle.ability(ability_id) else {
            trace!(participant = %me.id, ability = %ability_id, "ai skips unknown ability");
            continue;
        };
        if channel::check_begin(me, ability).is_err() {
            continue;
        }

        let range = if ability.range > 0.0 {
            ability.range
        } else {
            me.stats.attack_range
        };
        let target = match ability.cast_condition {
            CastCondition::TargetInRange => {
                if ctx.distance_to_target() > range {
                    continue;
                }
                Some(ctx.target.id)
            }
            CastCondition::AllyWounded { below_hp_ratio } => {
                let wounded = ctx
                    .view
                    .participants
                    .iter()
                    .filter(|p| p.faction() == me.faction() && p.is_alive())
                    .filter(|p| p.hp_ratio() < below_hp_ratio)
                    .filter(|p| me.position.distance_to(p.position) <= range)
                    .fold(None::<&Participant>, |best, p| match best {
                        Some(b) if b.hp_ratio() <= p.hp_ratio() => Some(b),
                        _ => Some(p),
                    });
                match wounded {
                    Some(ally) => Some(ally.id),
                    None => continue,
                }
            }
            CastCondition::SelfWounded { below_hp_ratio } => {
                if me.hp_ratio() >= below_hp_ratio {
                    continue;
                }
                Some(me.id)
            }
            CastCondition::Always => Some(ctx.target.id),
        };

        return Some(CastRequest {
            ability: ability_id.clone(),
            target,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::env::{AbilityDefinition, ContentTables};
    use crate::state::{
        AbilityId, Arena, AttackType, ChannelFlags, Obstacle, ParticipantId, StatusEffect,
        StatusEffectKind, StatusInstanceId,
    };
    use crate::stats::CombatStats;

    fn stats(range: f32) -> CombatStats {
        CombatStats {
            max_hp: 100.0,
            damage: 10.0,
            attack_speed: 1.0,
            attack_range: range,
            movement_speed: 50.0,
            ..CombatStats::default()
        }
    }

    fn hero(id: u32, x: f32, y: f32) -> Participant {
        let mut p = Participant::hero("hero", stats(20.0)).at(x, y);
        p.id = ParticipantId(id);
        p
    }

    fn enemy(id: u32, x: f32, y: f32) -> Participant {
        let mut p = Participant::enemy("enemy", stats(20.0)).at(x, y);
        p.id = ParticipantId(id);
        p
    }

    fn view<'a>(
        participants: &'a [Participant],
        arena: &'a Arena,
        config: &'a EngineConfig,
    ) -> BattleView<'a> {
        BattleView {
            participants,
            arena,
            config,
            abilities: None,
        }
    }

    fn stun() -> StatusEffect {
        StatusEffect {
            id: StatusInstanceId(1),
            status_id: None,
            name: "stun".into(),
            kind: StatusEffectKind::Stun,
            remaining_ms: 1000,
            source: None,
            applied_tick: 0,
        }
    }

    #[test]
    fn dead_or_stunned_participants_do_nothing() {
        let arena = Arena::default();
        let config = EngineConfig::new();

        let mut stunned = hero(1, 0.0, 0.0);
        stunned.target_id = Some(ParticipantId(2));
        stunned.ai_state = AiState::Attacking;
        stunned.status_effects.push(stun());
        let mut dead = hero(3, 0.0, 0.0);
        dead.current_hp = 0.0;
        let participants = vec![stunned, enemy(2, 5.0, 0.0), dead];

        for who in [&participants[0], &participants[2]] {
            let decision = decide(who, view(&participants, &arena, &config));
            assert!(decision.intent.is_no_op());
            assert_eq!(decision.intent.attack_target, None);
            assert!(!decision.target_changed);
        }
    }

    #[test]
    fn acquiring_a_target_is_a_fresh_idle_decision() {
        let arena = Arena::default();
        let config = EngineConfig::new();
        let mut me = hero(1, 0.0, 0.0);
        me.ai_state = AiState::Repositioning;
        me.ai_decision_cooldown_ticks = 4;
        let participants = vec![me, enemy(2, 100.0, 0.0), enemy(3, 10.0, 0.0)];

        let decision = decide(&participants[0], view(&participants, &arena, &config));
        assert_eq!(decision.target_id, Some(ParticipantId(3)));
        assert!(decision.target_changed);
        assert_eq!(decision.intent.ai_state, AiState::Idle);
        assert!(decision.intent.is_no_op());
        assert_eq!(decision.decision_cooldown_ticks, 0);
    }

    #[test]
    fn dead_target_triggers_retarget() {
        let arena = Arena::default();
        let config = EngineConfig::new();
        let mut me = hero(1, 0.0, 0.0);
        me.target_id = Some(ParticipantId(2));
        me.ai_state = AiState::Attacking;
        let mut old = enemy(2, 5.0, 0.0);
        old.current_hp = 0.0;
        old.dying_ticks_remaining = Some(3);
        let participants = vec![me, old, enemy(3, 30.0, 0.0)];

        let decision = decide(&participants[0], view(&participants, &arena, &config));
        assert_eq!(decision.target_id, Some(ParticipantId(3)));
        assert!(decision.target_changed);
        assert_eq!(decision.intent.ai_state, AiState::Idle);
    }

    #[test]
    fn no_opponents_means_idle_without_target() {
        let arena = Arena::default();
        let config = EngineConfig::new();
        let mut me = hero(1, 0.0, 0.0);
        me.target_id = Some(ParticipantId(9));
        let participants = vec![me, hero(2, 3.0, 3.0)];

        let decision = decide(&participants[0], view(&participants, &arena, &config));
        assert_eq!(decision.target_id, None);
        assert!(decision.target_changed);
        assert!(decision.intent.is_no_op());

        let mut settled = participants.clone();
        settled[0].target_id = None;
        let decision = decide(&settled[0], view(&settled, &arena, &config));
        assert!(!decision.target_changed);
        assert!(decision.intent.is_no_op());
    }

    #[test]
    fn melee_closes_distance_then_attacks() {
        let arena = Arena::default();
        let config = EngineConfig::new();
        let mut me = hero(1, 0.0, 0.0);
        me.target_id = Some(ParticipantId(2));
        let participants = vec![me, enemy(2, 100.0, 0.0)];

        let decision = decide(&participants[0], view(&participants, &arena, &config));
        assert_eq!(decision.intent.ai_state, AiState::MovingToEngage);
        assert_eq!((decision.intent.dx, decision.intent.dy), (5.0, 0.0));
        assert_eq!(decision.intent.attack_target, None);

        let mut close = participants.clone();
        close[1].position.x = 15.0;
        let decision = decide(&close[0], view(&close, &arena, &config));
        assert_eq!(decision.intent.ai_state, AiState::Attacking);
        assert_eq!(decision.intent.attack_target, Some(ParticipantId(2)));
        assert!(!decision.intent.moves());
    }

    #[test]
    fn attack_waits_for_cooldown() {
        let arena = Arena::default();
        let config = EngineConfig::new();
        let mut me = hero(1, 0.0, 0.0);
        me.target_id = Some(ParticipantId(2));
        me.cooldowns.attack_ticks = 3;
        let participants = vec![me, enemy(2, 10.0, 0.0)];

        let decision = decide(&participants[0], view(&participants, &arena, &config));
        assert_eq!(decision.intent.ai_state, AiState::Attacking);
        assert_eq!(decision.intent.attack_target, None);
    }

    #[test]
    fn ranged_kites_away_from_close_target() {
        let arena = Arena::default();
        let config = EngineConfig::new();
        let mut me = hero(1, 400.0, 300.0).with_attack_type(AttackType::Ranged);
        me.stats.attack_range = 100.0;
        me.target_id = Some(ParticipantId(2));
        let participants = vec![me, enemy(2, 390.0, 300.0)];

        let decision = decide(&participants[0], view(&participants, &arena, &config));
        assert_eq!(decision.intent.ai_state, AiState::Repositioning);
        assert!(decision.intent.dx > 0.0);
        assert_eq!(decision.decision_cooldown_ticks, config.reposition_commit_ticks);
        let point = decision.intent.repositioning_target.expect("reposition point");
        assert!(point.x > 400.0);
    }

    #[test]
    fn ranged_keeps_committed_reposition() {
        let arena = Arena::default();
        let config = EngineConfig::new();
        let mut me = hero(1, 400.0, 300.0).with_attack_type(AttackType::Ranged);
        me.stats.attack_range = 100.0;
        me.target_id = Some(ParticipantId(2));
        me.ai_state = AiState::Repositioning;
        me.ai_repositioning_target = Some(crate::state::Position::new(480.0, 300.0));
        me.ai_decision_cooldown_ticks = 5;
        // Target already far enough that a fresh evaluation would attack.
        let participants = vec![me, enemy(2, 330.0, 300.0)];

        let decision = decide(&participants[0], view(&participants, &arena, &config));
        assert_eq!(decision.intent.ai_state, AiState::Repositioning);
        assert_eq!(decision.decision_cooldown_ticks, 4);
        assert_eq!(decision.intent.attack_target, None);
    }

    #[test]
    fn ranged_advances_when_sight_is_blocked() {
        let arena = Arena::default().with_obstacle(Obstacle::new(140.0, 0.0, 160.0, 600.0));
        let config = EngineConfig::new();
        let mut me = hero(1, 100.0, 300.0).with_attack_type(AttackType::Ranged);
        me.stats.attack_range = 120.0;
        me.target_id = Some(ParticipantId(2));
        let participants = vec![me, enemy(2, 200.0, 300.0)];

        let decision = decide(&participants[0], view(&participants, &arena, &config));
        assert_eq!(decision.intent.ai_state, AiState::MovingToEngage);
        assert_eq!(decision.intent.attack_target, None);
        assert!(decision.intent.dx > 0.0);
    }

    #[test]
    fn healer_keeps_target_but_does_nothing_else() {
        let arena = Arena::default();
        let config = EngineConfig::new();
        let mut me = hero(1, 0.0, 0.0).as_healer();
        me.target_id = Some(ParticipantId(2));
        let participants = vec![me, enemy(2, 10.0, 0.0)];

        let decision = decide(&participants[0], view(&participants, &arena, &config));
        assert_eq!(decision.target_id, Some(ParticipantId(2)));
        assert!(decision.intent.is_no_op());
    }

    #[test]
    fn low_hp_participant_flees() {
        let arena = Arena::default();
        let config = EngineConfig::new();
        let mut me = hero(1, 100.0, 100.0).with_flee_threshold(0.3);
        me.current_hp = 20.0;
        me.target_id = Some(ParticipantId(2));
        let participants = vec![me, enemy(2, 90.0, 100.0)];

        let decision = decide(&participants[0], view(&participants, &arena, &config));
        assert_eq!(decision.intent.ai_state, AiState::Fleeing);
        assert!(decision.intent.dx > 0.0);
        assert_eq!(decision.decision_cooldown_ticks, config.ai_decision_cooldown_ticks);
    }

    #[test]
    fn ready_ability_in_range_is_requested() {
        let arena = Arena::default();
        let config = EngineConfig::new();
        let tables = ContentTables::new().with_ability(AbilityDefinition {
            id: AbilityId::new("cleave"),
            name: "Cleave".into(),
            cooldown_ms: 3000,
            mana_cost: 0.0,
            channel_duration_ms: 500,
            tick_interval_ms: None,
            flags: ChannelFlags::BLOCKS_MOVEMENT,
            range: 30.0,
            cast_condition: CastCondition::TargetInRange,
            effects: Vec::new(),
        });
        let mut me = hero(1, 0.0, 0.0)
            .with_abilities([AbilityId::new("missing"), AbilityId::new("cleave")]);
        me.target_id = Some(ParticipantId(2));
        let participants = vec![me, enemy(2, 25.0, 0.0)];

        let mut battle = view(&participants, &arena, &config);
        battle.abilities = Some(&tables);
        let decision = decide(&participants[0], battle);
        assert_eq!(
            decision.intent.cast,
            Some(CastRequest {
                ability: AbilityId::new("cleave"),
                target: Some(ParticipantId(2)),
            })
        );

        let mut cooling = participants.clone();
        cooling[0].cooldowns.start_ability(&AbilityId::new("cleave"), 2);
        let decision = decide(&cooling[0], battle_with(&cooling, &arena, &config, &tables));
        assert_eq!(decision.intent.cast, None);
    }

    fn battle_with<'a>(
        participants: &'a [Participant],
        arena: &'a Arena,
        config: &'a EngineConfig,
        tables: &'a ContentTables,
    ) -> BattleView<'a> {
        BattleView {
            abilities: Some(tables),
            ..view(participants, arena, config)
        }
    }
}
