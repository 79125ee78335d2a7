//! Effect application shared by attacks, channels and status ticks.
use std::f32::consts::TAU;

use tracing::{debug, trace};

use super::pipeline::{PendingSpawn, TickCtx};
use crate::combat::{self, AttackKind};
use crate::env::{AbilityDefinition, AbilityEffect, EffectScope, EffectTrigger};
use crate::error::EngineError;
use crate::event::{AttackSource, BattleEvent, InterruptCause};
use crate::geometry::clamp_to_arena;
use crate::state::{
    BattleState, ChannelingState, HeroProfile, Participant, ParticipantId, ParticipantKind,
    StatusId, TemplateId,
};
use crate::status::{self, Application};

/// Distance from the summoner at which summons appear.
const SUMMON_RADIUS: f32 = 20.0;

/// Fires every effect `ability` attaches to `trigger`. Scopes are resolved
/// against the live participant list at the moment of firing.
pub(super) fn fire(
    state: &mut BattleState,
    caster: ParticipantId,
    ability: &AbilityDefinition,
    trigger: EffectTrigger,
    cast_target: Option<ParticipantId>,
    ctx: &mut TickCtx<'_>,
) -> Result<(), EngineError> {
    for triggered in ability.effects_for(trigger) {
        let targets = resolve_scope(state, caster, triggered.scope, cast_target);
        trace!(
            tick = ctx.tick,
            %caster,
            ability = %ability.id,
            %trigger,
            targets = targets.len(),
            "firing effect"
        );

        match &triggered.effect {
            AbilityEffect::Damage { multiplier } => {
                let Some(caster_index) = state.index_of(caster) else {
                    continue;
                };
                for target in targets {
                    let kind = AttackKind::Ability {
                        ability: ability.id.clone(),
                        multiplier: *multiplier,
                    };
                    attack(state, caster_index, target, kind, ctx)?;
                }
            }
            AbilityEffect::Heal { amount, target } => {
                for id in targets {
                    let Some(participant) = state.participant_mut(id) else {
                        continue;
                    };
                    let source = AttackSource::Ability(ability.id.clone());
                    if let Some(event) = combat::resolve_heal(
                        caster,
                        participant,
                        *amount,
                        *target,
                        source,
                        ctx.tick,
                        ctx.timestamp_ms,
                    ) {
                        ctx.events.push(BattleEvent::Attack(event));
                    }
                }
            }
            AbilityEffect::ApplyStatus { status } => {
                for id in targets {
                    if let Some(index) = state.index_of(id) {
                        apply_status(state, index, status, Some(caster), ctx)?;
                    }
                }
            }
            AbilityEffect::Summon { template, count } => {
                summon(state, caster, template, *count, ctx)?;
            }
            AbilityEffect::TransformIntoEnemy { template } => {
                transform(state, &targets, template, ctx)?;
            }
            AbilityEffect::RestoreMana { amount } => {
                for id in targets {
                    restore_mana(state, id, *amount, ctx);
                }
            }
        }
    }
    Ok(())
}

fn resolve_scope(
    state: &BattleState,
    caster: ParticipantId,
    scope: EffectScope,
    cast_target: Option<ParticipantId>,
) -> Vec<ParticipantId> {
    let Some(caster) = state.participant(caster) else {
        return Vec::new();
    };
    let faction = caster.faction();
    let origin = caster.position;
    let pick = |hostile: bool, range: Option<f32>| -> Vec<ParticipantId> {
        state
            .participants
            .iter()
            .filter(|p| p.is_alive() && (p.faction() != faction) == hostile)
            .filter(|p| range.is_none_or(|range| origin.distance_to(p.position) <= range))
            .map(|p| p.id)
            .collect()
    };

    match scope {
        EffectScope::SelfOnly => caster.is_alive().then_some(caster.id).into_iter().collect(),
        EffectScope::CurrentTarget => cast_target
            .and_then(|id| state.participant(id))
            .filter(|p| p.is_alive())
            .map(|p| p.id)
            .into_iter()
            .collect(),
        EffectScope::AllEnemies => pick(true, None),
        EffectScope::AllAllies => pick(false, None),
        EffectScope::AllEnemiesInRange(range) => pick(true, Some(range)),
        EffectScope::AllAlliesInRange(range) => pick(false, Some(range)),
    }
}

/// Resolves one attack from the participant at `attacker_index`, then rolls
/// its procs. Ability damage never procs.
pub(super) fn attack(
    state: &mut BattleState,
    attacker_index: usize,
    target: ParticipantId,
    kind: AttackKind,
    ctx: &mut TickCtx<'_>,
) -> Result<(), EngineError> {
    let Some(target_index) = state.index_of(target) else {
        return Ok(());
    };
    let mitigation = ctx.env.mitigation();
    let (tick, timestamp_ms) = (ctx.tick, ctx.timestamp_ms);

    let resolution = {
        let BattleState { participants, rng, .. } = &mut *state;
        with_pair(participants, attacker_index, target_index, |attacker, target| {
            combat::resolve_attack(attacker, target, &kind, rng, mitigation, tick, timestamp_ms)
        })
    };
    let Some(resolution) = resolution else {
        trace!(tick, %target, "attack on a corpse dropped");
        return Ok(());
    };

    let event_index = ctx.events.len();
    ctx.events.push(BattleEvent::Attack(resolution.event));
    if resolution.killed {
        kill(state, target_index, ctx);
        return Ok(());
    }
    if matches!(kind, AttackKind::Ability { .. }) {
        return Ok(());
    }

    let (attacker_id, rolled) = {
        let BattleState { participants, rng, .. } = &mut *state;
        let attacker = &participants[attacker_index];
        let mut rolled: Vec<StatusId> = attacker
            .on_attack_procs
            .iter()
            .filter(|on_attack| rng.roll(on_attack.chance))
            .map(|on_attack| on_attack.status.clone())
            .collect();
        if kind.is_special()
            && let Some(status) = attacker
                .special_attack
                .as_ref()
                .and_then(|s| s.applies_status.clone())
        {
            rolled.push(status);
        }
        (attacker.id, rolled)
    };

    let mut first_applied = None;
    for status in &rolled {
        let applied = apply_status(state, target_index, status, Some(attacker_id), ctx)?;
        if first_applied.is_none() {
            first_applied = applied;
        }
    }
    if let Some(name) = first_applied
        && let Some(BattleEvent::Attack(event)) = ctx.events.get_mut(event_index)
    {
        event.applied_status = Some(name);
    }
    Ok(())
}

/// Instantiates and attaches a status. Returns its name when it landed.
pub(super) fn apply_status(
    state: &mut BattleState,
    index: usize,
    status_id: &StatusId,
    source: Option<ParticipantId>,
    ctx: &mut TickCtx<'_>,
) -> Result<Option<String>, EngineError> {
    let Some(definition) = ctx.content(ctx.env.status(status_id))? else {
        return Ok(None);
    };
    if !state.participants[index].is_alive() {
        return Ok(None);
    }

    let instance = state.allocate_status_id();
    let effect = definition.instantiate(instance, source, ctx.tick);
    let target = &mut state.participants[index];
    let target_id = target.id;
    let Application::Applied { interrupted } = status::apply_effect(target, effect) else {
        return Ok(None);
    };
    let drained = target.refresh_stats(&state.context);

    trace!(tick = ctx.tick, target = %target_id, status = %status_id, %instance, "status applied");
    ctx.events.push(BattleEvent::StatusApplied {
        target: target_id,
        source,
        instance,
        tag: definition.tag(),
        name: definition.name.clone(),
        tick: ctx.tick,
    });
    if let Some(channel) = interrupted {
        interrupt(channel, InterruptCause::Stun, ctx);
    }
    if drained {
        kill(state, index, ctx);
    }
    Ok(Some(definition.name.clone()))
}

/// Recomposes stats. A participant whose maximum HP collapsed to 0 dies like
/// any other.
pub(super) fn refresh(state: &mut BattleState, index: usize, ctx: &mut TickCtx<'_>) {
    let participant = &mut state.participants[index];
    if participant.refresh_stats(&state.context) {
        kill(state, index, ctx);
    }
}

/// Moves the participant into the dying window.
pub(super) fn kill(state: &mut BattleState, index: usize, ctx: &mut TickCtx<'_>) {
    let participant = &mut state.participants[index];
    let id = participant.id;
    let channel = combat::begin_dying(participant, ctx.config.dying_ticks);

    debug!(tick = ctx.tick, participant = %id, "died");
    ctx.events.push(BattleEvent::Died {
        participant: id,
        tick: ctx.tick,
    });
    if let Some(channel) = channel {
        interrupt(channel, InterruptCause::Death, ctx);
    }
}

fn interrupt(channel: ChannelingState, cause: InterruptCause, ctx: &mut TickCtx<'_>) {
    debug!(
        tick = ctx.tick,
        caster = %channel.caster_id,
        ability = %channel.ability_id,
        %cause,
        "channel interrupted"
    );
    ctx.events.push(BattleEvent::ChannelInterrupted {
        caster: channel.caster_id,
        ability: channel.ability_id.clone(),
        cause,
        tick: ctx.tick,
    });
    ctx.interrupts.push_back(channel);
}

fn summon(
    state: &mut BattleState,
    caster: ParticipantId,
    template_id: &TemplateId,
    count: u32,
    ctx: &mut TickCtx<'_>,
) -> Result<(), EngineError> {
    let Some(template) = ctx.content(ctx.env.template(template_id))? else {
        return Ok(());
    };
    let Some(summoner) = state.participant(caster) else {
        return Ok(());
    };
    let kind = match &summoner.kind {
        ParticipantKind::Hero(_) => ParticipantKind::Hero(HeroProfile::default()),
        ParticipantKind::Enemy(profile) => {
            let mut profile = profile.clone();
            profile.is_boss = false;
            ParticipantKind::Enemy(profile)
        }
    };

    for slot in 0..count {
        let angle = TAU * slot as f32 / count as f32;
        let position = clamp_to_arena(
            &state.arena,
            summoner
                .position
                .offset(SUMMON_RADIUS * angle.cos(), SUMMON_RADIUS * angle.sin()),
        );
        let mut participant = template.instantiate(kind.clone(), position);
        participant.summoned_by = Some(caster);
        ctx.spawns.push(PendingSpawn::Summon {
            summoner: caster,
            template: template_id.clone(),
            participant,
        });
    }
    Ok(())
}

fn transform(
    state: &BattleState,
    targets: &[ParticipantId],
    template_id: &TemplateId,
    ctx: &mut TickCtx<'_>,
) -> Result<(), EngineError> {
    let Some(template) = ctx.content(ctx.env.template(template_id))? else {
        return Ok(());
    };
    for &id in targets {
        if ctx.is_transforming(id) {
            continue;
        }
        let Some(original) = state.participant(id) else {
            continue;
        };
        let level = match &original.kind {
            ParticipantKind::Hero(profile) => profile.progression.level,
            ParticipantKind::Enemy(profile) => profile.level,
        };
        let participant = template.instantiate_enemy(level, original.position);
        ctx.spawns.push(PendingSpawn::Transform {
            from: id,
            template: template_id.clone(),
            participant,
        });
    }
    Ok(())
}

fn restore_mana(state: &mut BattleState, id: ParticipantId, amount: f32, ctx: &mut TickCtx<'_>) {
    let Some(participant) = state.participant_mut(id) else {
        return;
    };
    let max_mana = participant.stats.max_mana;
    let Some(mana) = participant.current_mana.as_mut() else {
        return;
    };
    let restored = amount.max(0.0).min((max_mana - *mana).max(0.0));
    *mana += restored;
    ctx.events.push(BattleEvent::ManaRestored {
        target: id,
        amount: restored,
        tick: ctx.tick,
    });
}

/// Calls `f` with the attacker and a mutable target, which may be the same
/// participant.
fn with_pair<R>(
    participants: &mut [Participant],
    attacker: usize,
    target: usize,
    f: impl FnOnce(&Participant, &mut Participant) -> R,
) -> R {
    if attacker == target {
        let snapshot = participants[attacker].clone();
        return f(&snapshot, &mut participants[target]);
    }
    if attacker < target {
        let (head, tail) = participants.split_at_mut(target);
        f(&head[attacker], &mut tail[0])
    } else {
        let (head, tail) = participants.split_at_mut(attacker);
        f(&tail[0], &mut head[target])
    }
}
