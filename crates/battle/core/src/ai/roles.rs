//! Role behaviors expressed as behavior trees.
//!
//! Each tree is a selector of guarded branches ending in an unconditional
//! fallback, so evaluating it always leaves an intent in the context.

use behavior_tree::builder::{action, condition, inverter, selector, sequence};
use behavior_tree::{Node, Status};

use super::AiContext;
use crate::geometry::{flee_vector, has_line_of_sight, movement_vector, reposition_point};
use crate::state::{AiState, AttackType, Participant, Position};

/// Behavior family a participant is driven by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Melee,
    Ranged,
    Healer,
}

impl Role {
    pub fn of(participant: &Participant) -> Self {
        if participant.is_healer {
            return Self::Healer;
        }
        match participant.attack_type {
            AttackType::Melee => Self::Melee,
            AttackType::Ranged => Self::Ranged,
        }
    }

    pub fn tree<'a>(self) -> Node<'a, AiContext<'a>> {
        match self {
            Self::Melee => melee(),
            Self::Ranged => ranged(),
            Self::Healer => healer(),
        }
    }
}

fn melee<'a>() -> Node<'a, AiContext<'a>> {
    selector(vec![
        sequence(vec![condition(wants_to_flee), action(flee)]),
        sequence(vec![condition(target_in_range), action(engage)]),
        action(close_distance),
    ])
}

fn ranged<'a>() -> Node<'a, AiContext<'a>> {
    selector(vec![
        sequence(vec![condition(wants_to_flee), action(flee)]),
        sequence(vec![condition(committed_to_reposition), action(continue_reposition)]),
        sequence(vec![condition(target_too_close), action(start_reposition)]),
        sequence(vec![
            condition(target_in_range),
            inverter(condition(target_visible)),
            action(advance_for_sight),
        ]),
        sequence(vec![condition(target_in_range), action(engage)]),
        action(close_distance),
    ])
}

/// Healers only keep their target. Heals come from abilities.
fn healer<'a>() -> Node<'a, AiContext<'a>> {
    action(hold_position)
}

// ===== conditions =====

fn wants_to_flee(ctx: &AiContext<'_>) -> bool {
    let below_threshold = ctx
        .me
        .flee_below_hp_ratio
        .is_some_and(|ratio| ctx.me.hp_ratio() < ratio);
    let committed = ctx.decision_cooldown > 0 && ctx.me.ai_state == AiState::Fleeing;
    below_threshold || committed
}

fn committed_to_reposition(ctx: &AiContext<'_>) -> bool {
    ctx.decision_cooldown > 0
        && ctx.me.ai_state == AiState::Repositioning
        && ctx.me.ai_repositioning_target.is_some()
}

fn target_too_close(ctx: &AiContext<'_>) -> bool {
    ctx.distance_to_target() < ctx.kite_distance()
}

fn target_in_range(ctx: &AiContext<'_>) -> bool {
    ctx.distance_to_target() <= ctx.me.stats.attack_range
}

fn target_visible(ctx: &AiContext<'_>) -> bool {
    has_line_of_sight(ctx.view.arena, ctx.me.position, ctx.target.position)
}

// ===== actions =====

const ARRIVAL_EPSILON: f32 = 0.5;

fn flee(ctx: &mut AiContext<'_>) -> Status {
    let (dx, dy) = flee_vector(
        ctx.me.position,
        ctx.target.position,
        ctx.me.stats.movement_speed,
        ctx.tick_seconds(),
    );
    ctx.intent.dx = dx;
    ctx.intent.dy = dy;
    ctx.intent.ai_state = AiState::Fleeing;
    if ctx.me.ai_state != AiState::Fleeing {
        ctx.intent.decision_cooldown_ticks = Some(ctx.view.config.ai_decision_cooldown_ticks);
    }
    Status::Success
}

fn continue_reposition(ctx: &mut AiContext<'_>) -> Status {
    let Some(point) = ctx.me.ai_repositioning_target else {
        return Status::Failure;
    };
    if ctx.me.position.distance_to(point) <= ARRIVAL_EPSILON {
        return Status::Failure;
    }
    move_to(ctx, point, 0.0);
    ctx.intent.ai_state = AiState::Repositioning;
    ctx.intent.repositioning_target = Some(point);
    Status::Success
}

fn start_reposition(ctx: &mut AiContext<'_>) -> Status {
    let desired = ctx.me.stats.attack_range * 0.9;
    let point = reposition_point(ctx.view.arena, ctx.me.position, ctx.target.position, desired);

    // Cornered: the best reachable spot is still too close, so stand and fight.
    if point.distance_to(ctx.target.position) < ctx.kite_distance()
        || point.distance_to(ctx.me.position) <= ARRIVAL_EPSILON
    {
        return Status::Failure;
    }

    move_to(ctx, point, 0.0);
    ctx.intent.ai_state = AiState::Repositioning;
    ctx.intent.repositioning_target = Some(point);
    ctx.intent.decision_cooldown_ticks = Some(ctx.view.config.reposition_commit_ticks);
    Status::Success
}

fn advance_for_sight(ctx: &mut AiContext<'_>) -> Status {
    let (destination, stop) = (ctx.target.position, ctx.kite_distance());
    move_to(ctx, destination, stop);
    ctx.intent.ai_state = AiState::MovingToEngage;
    Status::Success
}

fn engage(ctx: &mut AiContext<'_>) -> Status {
    let me = ctx.me;
    ctx.intent.ai_state = AiState::Attacking;
    if me.cooldowns.attack_ticks == 0 && me.stats.attack_speed > 0.0 {
        ctx.intent.attack_target = Some(ctx.target.id);
        ctx.intent.special_attack =
            me.special_attack.is_some() && me.cooldowns.special_attack_ticks == 0;
    }
    Status::Success
}

fn close_distance(ctx: &mut AiContext<'_>) -> Status {
    let (destination, stop) = (ctx.target.position, ctx.me.stats.attack_range);
    move_to(ctx, destination, stop);
    ctx.intent.ai_state = AiState::MovingToEngage;
    Status::Success
}

fn hold_position(ctx: &mut AiContext<'_>) -> Status {
    ctx.intent.ai_state = AiState::Idle;
    Status::Success
}

fn move_to(ctx: &mut AiContext<'_>, destination: Position, stop_distance: f32) {
    let (dx, dy) = movement_vector(
        ctx.me.position,
        destination,
        ctx.me.stats.movement_speed,
        ctx.tick_seconds(),
        stop_distance,
    );
    ctx.intent.dx = dx;
    ctx.intent.dy = dy;
}
