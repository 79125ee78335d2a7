//! One tick of the scheduler.
use std::collections::VecDeque;

use tracing::{debug, trace, warn};

use super::effects;
use crate::ai::{self, AiDecision, BattleView, CastRequest};
use crate::channel::{self, CastStart};
use crate::combat::{self, AttackKind};
use crate::config::EngineConfig;
use crate::env::{BattleEnv, EffectTrigger};
use crate::error::{BattleError, ContentError, EngineError};
use crate::event::{AttackEvent, AttackSource, BattleEvent};
use crate::geometry::clamp_to_arena;
use crate::state::{
    AiState, BattleState, BattleStatus, ChannelFlags, ChannelingState, Faction, Participant,
    ParticipantId, TemplateId,
};
use crate::status;

/// Participant created during the tick, appended once the tick ends.
pub(super) enum PendingSpawn {
    Summon {
        summoner: ParticipantId,
        template: TemplateId,
        participant: Participant,
    },
    Transform {
        from: ParticipantId,
        template: TemplateId,
        participant: Participant,
    },
}

/// Scratch data shared by every phase of one tick.
pub(super) struct TickCtx<'e> {
    pub env: BattleEnv<'e>,
    pub config: &'e EngineConfig,
    pub tick: u64,
    pub timestamp_ms: u64,
    pub dt_ms: u32,
    pub events: Vec<BattleEvent>,
    pub spawns: Vec<PendingSpawn>,
    /// Channels cut short this tick whose interrupt effects still have to
    /// fire.
    pub interrupts: VecDeque<ChannelingState>,
}

impl<'e> TickCtx<'e> {
    fn new(state: &BattleState, env: BattleEnv<'e>) -> Self {
        let config = env.config();
        Self {
            env,
            config,
            tick: state.tick,
            timestamp_ms: state.elapsed_ms,
            dt_ms: config.tick_ms,
            events: Vec::new(),
            spawns: Vec::new(),
            interrupts: VecDeque::new(),
        }
    }

    /// Strict configs turn a content error into a failed tick. Lenient ones
    /// log it and skip whatever needed the content.
    pub fn content<T>(&self, lookup: Result<T, ContentError>) -> Result<Option<T>, EngineError> {
        match lookup {
            Ok(found) => Ok(Some(found)),
            Err(err) if self.config.strict_content => Err(err.into()),
            Err(err) => {
                warn!(
                    tick = self.tick,
                    code = err.error_code(),
                    error = %err,
                    "content error, skipping"
                );
                Ok(None)
            }
        }
    }

    pub fn is_transforming(&self, id: ParticipantId) -> bool {
        self.spawns
            .iter()
            .any(|spawn| matches!(spawn, PendingSpawn::Transform { from, .. } if *from == id))
    }
}

/// Runs one tick on `state` and returns its events.
pub(super) fn run(
    state: &mut BattleState,
    env: BattleEnv<'_>,
) -> Result<Vec<BattleEvent>, EngineError> {
    state.tick += 1;
    state.elapsed_ms += u64::from(env.config().tick_ms);
    let mut ctx = TickCtx::new(state, env);
    trace!(tick = ctx.tick, participants = state.participants.len(), "tick start");

    // Participants never move within the Vec during a tick: spawns are
    // deferred and removals happen in `finish`.
    let order: Vec<usize> = state
        .participants
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_alive())
        .map(|(index, _)| index)
        .collect();

    for index in order {
        if !state.participants[index].is_alive() {
            continue;
        }
        step_participant(state, index, &mut ctx)?;
        drain_interrupts(state, &mut ctx)?;
    }

    finish(state, &mut ctx);
    Ok(ctx.events)
}

fn step_participant(
    state: &mut BattleState,
    index: usize,
    ctx: &mut TickCtx<'_>,
) -> Result<(), EngineError> {
    effects::refresh(state, index, ctx);
    if !state.participants[index].is_alive() {
        return Ok(());
    }
    {
        let participant = &mut state.participants[index];
        participant.cooldowns.tick_down();
        combat::regenerate(participant, ctx.dt_ms);
    }

    let mut run_ai = true;
    let mut blocked = ChannelFlags::empty();
    if state.participants[index].channeling.is_some() {
        advance_channel(state, index, ctx)?;
        match &state.participants[index].channeling {
            Some(channel) => blocked = channel.flags,
            // Finished or cut short: that was this tick's action.
            None => run_ai = false,
        }
    }
    // Nothing left for the AI to dispatch.
    if blocked.is_all() {
        run_ai = false;
    }

    let participant = &state.participants[index];
    if run_ai && participant.is_alive() && !ctx.is_transforming(participant.id) {
        let decision = {
            let view = BattleView {
                participants: &state.participants,
                arena: &state.arena,
                config: ctx.config,
                abilities: ctx.env.abilities(),
            };
            ai::decide(&state.participants[index], view)
        };
        apply_decision(state, index, decision, blocked, ctx)?;
    }

    tick_statuses(state, index, ctx)
}

fn advance_channel(
    state: &mut BattleState,
    index: usize,
    ctx: &mut TickCtx<'_>,
) -> Result<(), EngineError> {
    let dt_ms = ctx.dt_ms;
    let participant = &mut state.participants[index];
    let caster = participant.id;
    let Some(channel) = participant.channeling.as_mut() else {
        return Ok(());
    };
    let progress = channel::advance(channel, dt_ms);
    let ability_id = channel.ability_id.clone();
    let cast_target = channel.target_id;

    let Some(ability) = ctx.content(ctx.env.ability(&ability_id))? else {
        channel::end(&mut state.participants[index]);
        return Ok(());
    };

    for _ in 0..progress.ticks {
        ctx.events.push(BattleEvent::ChannelTicked {
            caster,
            ability: ability_id.clone(),
            tick: ctx.tick,
        });
        effects::fire(state, caster, ability, EffectTrigger::OnChannelTick, cast_target, ctx)?;
        if state.participants[index].channeling.is_none() {
            return Ok(());
        }
    }

    if progress.completed {
        channel::end(&mut state.participants[index]);
        debug!(tick = ctx.tick, %caster, ability = %ability_id, "channel completed");
        ctx.events.push(BattleEvent::ChannelCompleted {
            caster,
            ability: ability_id,
            tick: ctx.tick,
        });
        effects::fire(state, caster, ability, EffectTrigger::OnChannelComplete, cast_target, ctx)?;
    }
    Ok(())
}

fn apply_decision(
    state: &mut BattleState,
    index: usize,
    decision: AiDecision,
    blocked: ChannelFlags,
    ctx: &mut TickCtx<'_>,
) -> Result<(), EngineError> {
    let AiDecision {
        target_id,
        target_changed,
        decision_cooldown_ticks,
        intent,
    } = decision;

    {
        let arena = &state.arena;
        let participant = &mut state.participants[index];
        participant.target_id = target_id;
        participant.ai_decision_cooldown_ticks = decision_cooldown_ticks;

        if participant.is_channeling() {
            participant.ai_state = AiState::Channeling;
        } else {
            participant.ai_state = intent.ai_state;
            participant.ai_repositioning_target = intent.repositioning_target;
        }
        if target_changed {
            participant.ai_repositioning_target = None;
        }

        if intent.moves() && !blocked.contains(ChannelFlags::BLOCKS_MOVEMENT) {
            participant.position =
                clamp_to_arena(arena, participant.position.offset(intent.dx, intent.dy));
        }
    }

    if blocked.contains(ChannelFlags::BLOCKS_ACTIONS) {
        return Ok(());
    }
    if let Some(target) = intent.attack_target {
        basic_attack(state, index, target, intent.special_attack, ctx)?;
    }

    if let Some(cast) = intent.cast {
        begin_cast(state, index, cast, ctx)?;
    }
    Ok(())
}

fn basic_attack(
    state: &mut BattleState,
    index: usize,
    target: ParticipantId,
    special: bool,
    ctx: &mut TickCtx<'_>,
) -> Result<(), EngineError> {
    let attacker = &state.participants[index];
    let special = special
        .then(|| attacker.special_attack.as_ref())
        .flatten()
        .filter(|_| attacker.cooldowns.special_attack_ticks == 0);
    let kind = match special {
        Some(special) => AttackKind::Special {
            multiplier: special.damage_multiplier,
        },
        None => AttackKind::Basic,
    };
    let special_cooldown = special.map(|special| ctx.config.ticks_for_ms(special.cooldown_ms));
    let attack_cooldown = attacker
        .stats
        .attack_interval_ms()
        .map_or(0, |interval| ctx.config.ticks_for_ms(interval));

    effects::attack(state, index, target, kind, ctx)?;

    let cooldowns = &mut state.participants[index].cooldowns;
    cooldowns.attack_ticks = attack_cooldown;
    if let Some(ticks) = special_cooldown {
        cooldowns.special_attack_ticks = ticks;
    }
    Ok(())
}

fn begin_cast(
    state: &mut BattleState,
    index: usize,
    cast: CastRequest,
    ctx: &mut TickCtx<'_>,
) -> Result<(), EngineError> {
    let Some(ability) = ctx.content(ctx.env.ability(&cast.ability))? else {
        return Ok(());
    };
    let caster = &mut state.participants[index];
    let caster_id = caster.id;

    let start = match channel::begin(caster, ability, cast.target, ctx.config) {
        Ok(start) => start,
        Err(rejection) => {
            debug!(
                tick = ctx.tick,
                caster = %caster_id,
                code = rejection.error_code(),
                reason = %rejection,
                "cast rejected"
            );
            return Ok(());
        }
    };

    debug!(tick = ctx.tick, caster = %caster_id, ability = %ability.id, "cast started");
    ctx.events.push(BattleEvent::ChannelStarted {
        caster: caster_id,
        ability: ability.id.clone(),
        target: cast.target,
        duration_ms: ability.channel_duration_ms,
        tick: ctx.tick,
    });
    effects::fire(state, caster_id, ability, EffectTrigger::OnChannelStart, cast.target, ctx)?;

    if start == CastStart::Instant {
        ctx.events.push(BattleEvent::ChannelCompleted {
            caster: caster_id,
            ability: ability.id.clone(),
            tick: ctx.tick,
        });
        effects::fire(
            state,
            caster_id,
            ability,
            EffectTrigger::OnChannelComplete,
            cast.target,
            ctx,
        )?;
    }
    Ok(())
}

fn tick_statuses(
    state: &mut BattleState,
    index: usize,
    ctx: &mut TickCtx<'_>,
) -> Result<(), EngineError> {
    let participant = &mut state.participants[index];
    let id = participant.id;
    let report = status::tick_effects(&mut participant.status_effects, ctx.dt_ms, ctx.tick);
    if report.is_empty() {
        return Ok(());
    }

    for hit in report.dot_hits {
        let participant = &mut state.participants[index];
        if !participant.is_alive() {
            break;
        }
        let killed = status::apply_direct_damage(participant, hit.damage);
        ctx.events.push(BattleEvent::Attack(AttackEvent {
            attacker: hit.source.unwrap_or(id),
            target: id,
            damage: hit.damage,
            shield_damage: 0.0,
            heal: 0.0,
            is_crit: false,
            is_heal: false,
            is_special: false,
            source: AttackSource::DamageOverTime(hit.instance),
            applied_status: None,
            tick: ctx.tick,
            timestamp_ms: ctx.timestamp_ms,
        }));
        if killed {
            effects::kill(state, index, ctx);
        }
    }

    for expired in report.expired {
        ctx.events.push(BattleEvent::StatusExpired {
            target: id,
            instance: expired.id,
            name: expired.name,
            tick: ctx.tick,
        });
    }

    if state.participants[index].is_alive() {
        effects::refresh(state, index, ctx);
    }
    Ok(())
}

fn drain_interrupts(state: &mut BattleState, ctx: &mut TickCtx<'_>) -> Result<(), EngineError> {
    while let Some(channel) = ctx.interrupts.pop_front() {
        let Some(ability) = ctx.content(ctx.env.ability(&channel.ability_id))? else {
            continue;
        };
        effects::fire(
            state,
            channel.caster_id,
            ability,
            EffectTrigger::OnChannelInterrupt,
            channel.target_id,
            ctx,
        )?;
    }
    Ok(())
}

/// End-of-tick lifecycle: dying countdown, deferred spawns and the victory
/// check.
fn finish(state: &mut BattleState, ctx: &mut TickCtx<'_>) {
    let mut removed = Vec::new();
    for participant in &mut state.participants {
        if let Some(remaining) = participant.dying_ticks_remaining.as_mut() {
            if *remaining == 0 {
                removed.push(participant.id);
            } else {
                *remaining -= 1;
            }
        }
    }
    for id in &removed {
        ctx.events.push(BattleEvent::Removed {
            participant: *id,
            tick: ctx.tick,
        });
    }

    let transformed: Vec<ParticipantId> = ctx
        .spawns
        .iter()
        .filter_map(|spawn| match spawn {
            PendingSpawn::Transform { from, .. } => Some(*from),
            PendingSpawn::Summon { .. } => None,
        })
        .collect();
    state
        .participants
        .retain(|p| !removed.contains(&p.id) && !transformed.contains(&p.id));

    for spawn in std::mem::take(&mut ctx.spawns) {
        match spawn {
            PendingSpawn::Summon {
                summoner,
                template,
                participant,
            } => {
                let summoned = state.add_participant(participant);
                debug!(tick = ctx.tick, %summoner, %summoned, %template, "summoned");
                ctx.events.push(BattleEvent::Summoned {
                    summoner,
                    summoned,
                    template,
                    tick: ctx.tick,
                });
            }
            PendingSpawn::Transform {
                from,
                template,
                participant,
            } => {
                let into = state.add_participant(participant);
                debug!(tick = ctx.tick, %from, %into, %template, "transformed");
                ctx.events.push(BattleEvent::Transformed {
                    from,
                    into,
                    template,
                    tick: ctx.tick,
                });
            }
        }
    }

    let heroes_alive = state.living(Faction::Heroes).next().is_some();
    let enemies_alive = state.living(Faction::Enemies).next().is_some();
    let status = match (heroes_alive, enemies_alive) {
        (true, true) => BattleStatus::Ongoing,
        (true, false) => BattleStatus::Victory,
        (false, _) => BattleStatus::Defeat,
    };
    if status.is_finished() {
        state.status = status;
        debug!(tick = ctx.tick, %status, "battle ended");
        ctx.events.push(BattleEvent::BattleEnded {
            status,
            tick: ctx.tick,
        });
    }
}
