//! Channeling state machine: Idle -> Channeling -> {Complete, Interrupted}.
//!
//! This module owns the caster-side bookkeeping (validation, mana, cooldown,
//! progress). Firing the effects attached to each phase needs the whole
//! battle and is done by the scheduler.

use crate::config::EngineConfig;
use crate::env::AbilityDefinition;
use crate::error::{BattleError, ErrorSeverity};
use crate::state::{AbilityId, AiState, ChannelingState, Participant, ParticipantId};

/// Why a cast was refused. Refusals are no-ops for the battle.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ChannelRejection {
    #[error("already channeling '{0}'")]
    AlreadyChanneling(AbilityId),

    #[error("'{ability}' on cooldown for {remaining_ticks} more ticks")]
    OnCooldown {
        ability: AbilityId,
        remaining_ticks: u32,
    },

    #[error("not enough mana for '{ability}': need {required}, have {available}")]
    InsufficientMana {
        ability: AbilityId,
        required: f32,
        available: f32,
    },

    #[error("caster is dead, dying or stunned")]
    Incapacitated,
}

impl BattleError for ChannelRejection {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyChanneling(_) => ErrorSeverity::Validation,
            Self::OnCooldown { .. } | Self::InsufficientMana { .. } | Self::Incapacitated => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyChanneling(_) => "CHANNEL_ALREADY_CHANNELING",
            Self::OnCooldown { .. } => "CHANNEL_ON_COOLDOWN",
            Self::InsufficientMana { .. } => "CHANNEL_INSUFFICIENT_MANA",
            Self::Incapacitated => "CHANNEL_INCAPACITATED",
        }
    }
}

/// How a successful cast started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastStart {
    /// Zero-duration ability; start and complete effects fire immediately.
    Instant,
    /// A [`ChannelingState`] was attached to the caster.
    Channel,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelProgress {
    /// `ON_CHANNEL_TICK` firings due this step.
    pub ticks: u32,
    pub completed: bool,
}

pub fn check_begin(
    caster: &Participant,
    ability: &AbilityDefinition,
) -> Result<(), ChannelRejection> {
    if let Some(channel) = &caster.channeling {
        return Err(ChannelRejection::AlreadyChanneling(channel.ability_id.clone()));
    }
    if !caster.is_alive() || caster.is_stunned() {
        return Err(ChannelRejection::Incapacitated);
    }
    let remaining_ticks = caster.cooldowns.ability_ticks(&ability.id);
    if remaining_ticks > 0 {
        return Err(ChannelRejection::OnCooldown {
            ability: ability.id.clone(),
            remaining_ticks,
        });
    }
    if ability.mana_cost > 0.0 && caster.mana() < ability.mana_cost {
        return Err(ChannelRejection::InsufficientMana {
            ability: ability.id.clone(),
            required: ability.mana_cost,
            available: caster.mana(),
        });
    }
    Ok(())
}

/// Starts a cast: pays mana, starts the ability cooldown and, for channeled
/// abilities, attaches the channel and switches the AI to `CHANNELING`.
pub fn begin(
    caster: &mut Participant,
    ability: &AbilityDefinition,
    target: Option<ParticipantId>,
    config: &EngineConfig,
) -> Result<CastStart, ChannelRejection> {
    check_begin(caster, ability)?;

    if ability.mana_cost > 0.0
        && let Some(mana) = caster.current_mana.as_mut()
    {
        *mana = (*mana - ability.mana_cost).max(0.0);
    }
    caster
        .cooldowns
        .start_ability(&ability.id, config.ticks_for_ms(ability.cooldown_ms));

    if ability.is_instant() {
        return Ok(CastStart::Instant);
    }

    let tick_interval_ms = ability.tick_interval_ms.filter(|interval| *interval > 0);
    caster.channeling = Some(ChannelingState {
        ability_id: ability.id.clone(),
        caster_id: caster.id,
        target_id: target,
        duration_ms: ability.channel_duration_ms,
        elapsed_ms: 0,
        tick_interval_ms,
        until_next_tick_ms: tick_interval_ms.unwrap_or(0),
        flags: ability.flags,
    });
    caster.ai_state = AiState::Channeling;
    caster.ai_repositioning_target = None;
    Ok(CastStart::Channel)
}

/// Accumulates `dt_ms` of progress.
pub fn advance(channel: &mut ChannelingState, dt_ms: u32) -> ChannelProgress {
    channel.elapsed_ms = channel.elapsed_ms.saturating_add(dt_ms).min(channel.duration_ms);

    let mut ticks = 0;
    if let Some(interval) = channel.tick_interval_ms {
        let mut countdown = i64::from(channel.until_next_tick_ms) - i64::from(dt_ms);
        while countdown <= 0 {
            ticks += 1;
            countdown += i64::from(interval.max(1));
        }
        channel.until_next_tick_ms = countdown as u32;
    }

    ChannelProgress {
        ticks,
        completed: channel.elapsed_ms >= channel.duration_ms,
    }
}

/// Detaches the channel after completion or interruption and returns the
/// caster to `IDLE`.
pub fn end(caster: &mut Participant) -> Option<ChannelingState> {
    let channel = caster.channeling.take()?;
    caster.ai_state = AiState::Idle;
    Some(channel)
}
