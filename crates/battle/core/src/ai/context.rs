use crate::config::EngineConfig;
use crate::env::AbilityOracle;
use crate::state::{AiState, Arena, Participant, ParticipantId, Position};

/// Read-only snapshot of the battle handed to the AI.
#[derive(Clone, Copy)]
pub struct BattleView<'a> {
    pub participants: &'a [Participant],
    pub arena: &'a Arena,
    pub config: &'a EngineConfig,
    pub abilities: Option<&'a dyn AbilityOracle>,
}

impl<'a> BattleView<'a> {
    pub fn find(&self, id: ParticipantId) -> Option<&'a Participant> {
        self.participants.iter().find(|p| p.id == id)
    }
}

/// Request to start an ability.
#[derive(Clone, Debug, PartialEq)]
pub struct CastRequest {
    pub ability: crate::state::AbilityId,
    pub target: Option<ParticipantId>,
}

/// What a participant wants to do this tick. Applied by the scheduler.
#[derive(Clone, Debug, PartialEq)]
pub struct AiIntent {
    pub dx: f32,
    pub dy: f32,
    pub attack_target: Option<ParticipantId>,
    pub special_attack: bool,
    pub ai_state: AiState,
    pub repositioning_target: Option<Position>,
    /// Overrides the decremented decision cooldown when set.
    pub decision_cooldown_ticks: Option<u32>,
    pub cast: Option<CastRequest>,
}

impl AiIntent {
    /// IDLE, no movement, no attack, no cast.
    pub const fn idle() -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            attack_target: None,
            special_attack: false,
            ai_state: AiState::Idle,
            repositioning_target: None,
            decision_cooldown_ticks: None,
            cast: None,
        }
    }

    pub fn is_no_op(&self) -> bool {
        self.dx == 0.0
            && self.dy == 0.0
            && self.attack_target.is_none()
            && self.cast.is_none()
            && self.ai_state == AiState::Idle
    }

    pub fn moves(&self) -> bool {
        self.dx != 0.0 || self.dy != 0.0
    }
}

impl Default for AiIntent {
    fn default() -> Self {
        Self::idle()
    }
}

/// Blackboard the role trees read from and write their intent into.
pub struct AiContext<'a> {
    pub me: &'a Participant,
    pub target: &'a Participant,
    pub view: BattleView<'a>,
    /// Decision cooldown after this tick's decrement.
    pub decision_cooldown: u32,
    pub intent: AiIntent,
}

impl AiContext<'_> {
    pub fn distance_to_target(&self) -> f32 {
        self.me.position.distance_to(self.target.position)
    }

    pub fn tick_seconds(&self) -> f32 {
        self.view.config.tick_seconds()
    }

    pub fn kite_distance(&self) -> f32 {
        self.me.stats.attack_range * self.view.config.kite_distance_ratio
    }
}
