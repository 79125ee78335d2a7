use std::collections::BTreeMap;

use crate::stats::{CombatStats, StatModifier, compose};

use super::{
    AbilityId, AttackType, BattleContext, ChannelingState, Faction, ParticipantId, Position,
    StatusEffect, StatusId, TemplateId,
};

/// Decision state of the AI, as reported to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AiState {
    #[default]
    Idle,
    MovingToEngage,
    Attacking,
    Repositioning,
    Fleeing,
    Channeling,
}

/// Persistent progression of a hero, carried into the battle read-only.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Progression {
    pub level: u32,
    /// Fractional growth per level above the first (`0.05` = +5% per level).
    pub level_growth: Vec<StatModifier>,
    pub equipment: Vec<StatModifier>,
    pub shards: Vec<StatModifier>,
    pub skills: Vec<StatModifier>,
    pub permanent_buffs: Vec<StatModifier>,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            level_growth: Vec::new(),
            equipment: Vec::new(),
            shards: Vec::new(),
            skills: Vec::new(),
            permanent_buffs: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroProfile {
    pub progression: Progression,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnemyProfile {
    pub level: u32,
    pub level_growth: Vec<StatModifier>,
    pub is_boss: bool,
}

impl Default for EnemyProfile {
    fn default() -> Self {
        Self {
            level: 1,
            level_growth: Vec::new(),
            is_boss: false,
        }
    }
}

/// Capability tag separating heroes from enemies.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParticipantKind {
    Hero(HeroProfile),
    Enemy(EnemyProfile),
}

impl ParticipantKind {
    pub const fn faction(&self) -> Faction {
        match self {
            Self::Hero(_) => Faction::Heroes,
            Self::Enemy(_) => Faction::Enemies,
        }
    }
}

/// Chance-based status application rolled after each basic attack lands.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackProc {
    pub chance: f32,
    pub status: StatusId,
}

/// A stronger basic attack on its own cooldown.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecialAttack {
    pub damage_multiplier: f32,
    pub cooldown_ms: u32,
    pub applies_status: Option<StatusId>,
}

/// Integer tick counters. They only ever count down and stop at zero.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cooldowns {
    pub attack_ticks: u32,
    pub special_attack_ticks: u32,
    pub abilities: BTreeMap<AbilityId, u32>,
}

impl Cooldowns {
    pub fn tick_down(&mut self) {
        self.attack_ticks = self.attack_ticks.saturating_sub(1);
        self.special_attack_ticks = self.special_attack_ticks.saturating_sub(1);
        for remaining in self.abilities.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
    }

    pub fn ability_ticks(&self, ability: &AbilityId) -> u32 {
        self.abilities.get(ability).copied().unwrap_or(0)
    }

    pub fn ability_ready(&self, ability: &AbilityId) -> bool {
        self.ability_ticks(ability) == 0
    }

    pub fn start_ability(&mut self, ability: &AbilityId, ticks: u32) {
        self.abilities.insert(ability.clone(), ticks);
    }
}

/// A hero or enemy taking part in a battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Participant {
    /// Assigned by [`BattleState::add_participant`](super::BattleState::add_participant).
    pub id: ParticipantId,
    pub name: String,
    pub template_id: Option<TemplateId>,
    pub kind: ParticipantKind,
    pub position: Position,

    pub current_hp: f32,
    pub current_energy_shield: Option<f32>,
    pub current_mana: Option<f32>,
    pub base: CombatStats,
    /// Stat Composer output for the current inputs.
    pub stats: CombatStats,

    pub attack_type: AttackType,
    pub is_healer: bool,
    pub abilities: Vec<AbilityId>,
    pub on_attack_procs: Vec<AttackProc>,
    pub special_attack: Option<SpecialAttack>,
    pub flee_below_hp_ratio: Option<f32>,

    pub target_id: Option<ParticipantId>,
    pub ai_state: AiState,
    pub ai_repositioning_target: Option<Position>,
    pub ai_decision_cooldown_ticks: u32,
    pub cooldowns: Cooldowns,

    pub status_effects: Vec<StatusEffect>,
    pub channeling: Option<ChannelingState>,

    /// `Some` while in the dying grace window.
    pub dying_ticks_remaining: Option<u32>,
    pub shield_recharge_wait_ms: u32,
    pub summoned_by: Option<ParticipantId>,
    pub joined_tick: u64,
}

impl Participant {
    pub fn new(name: impl Into<String>, kind: ParticipantKind, base: CombatStats) -> Self {
        Self {
            id: ParticipantId::default(),
            name: name.into(),
            template_id: None,
            kind,
            position: Position::ORIGIN,
            current_hp: base.max_hp,
            current_energy_shield: None,
            current_mana: None,
            base,
            stats: base,
            attack_type: AttackType::Melee,
            is_healer: false,
            abilities: Vec::new(),
            on_attack_procs: Vec::new(),
            special_attack: None,
            flee_below_hp_ratio: None,
            target_id: None,
            ai_state: AiState::Idle,
            ai_repositioning_target: None,
            ai_decision_cooldown_ticks: 0,
            cooldowns: Cooldowns::default(),
            status_effects: Vec::new(),
            channeling: None,
            dying_ticks_remaining: None,
            shield_recharge_wait_ms: 0,
            summoned_by: None,
            joined_tick: 0,
        }
    }

    pub fn hero(name: impl Into<String>, base: CombatStats) -> Self {
        Self::new(name, ParticipantKind::Hero(HeroProfile::default()), base)
    }

    pub fn enemy(name: impl Into<String>, base: CombatStats) -> Self {
        Self::new(name, ParticipantKind::Enemy(EnemyProfile::default()), base)
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_attack_type(mut self, attack_type: AttackType) -> Self {
        self.attack_type = attack_type;
        self
    }

    pub fn as_healer(mut self) -> Self {
        self.is_healer = true;
        self
    }

    pub fn with_abilities(mut self, abilities: impl IntoIterator<Item = AbilityId>) -> Self {
        self.abilities.extend(abilities);
        self
    }

    pub fn with_proc(mut self, proc_: AttackProc) -> Self {
        self.on_attack_procs.push(proc_);
        self
    }

    pub fn with_special_attack(mut self, special: SpecialAttack) -> Self {
        self.special_attack = Some(special);
        self
    }

    pub fn with_flee_threshold(mut self, hp_ratio: f32) -> Self {
        self.flee_below_hp_ratio = Some(hp_ratio);
        self
    }

    /// Replaces the hero progression. Ignored for enemies.
    pub fn with_progression(mut self, progression: Progression) -> Self {
        if let ParticipantKind::Hero(profile) = &mut self.kind {
            profile.progression = progression;
        }
        self
    }

    // ===== classification =====

    pub fn faction(&self) -> Faction {
        self.kind.faction()
    }

    pub fn is_hero(&self) -> bool {
        matches!(self.kind, ParticipantKind::Hero(_))
    }

    pub fn is_dying(&self) -> bool {
        self.dying_ticks_remaining.is_some()
    }

    /// Positive HP and not in the dying window.
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0.0 && !self.is_dying()
    }

    pub fn is_stunned(&self) -> bool {
        self.status_effects.iter().any(StatusEffect::is_stun)
    }

    pub fn is_channeling(&self) -> bool {
        self.channeling.is_some()
    }

    pub fn is_hostile_to(&self, other: &Participant) -> bool {
        self.faction() != other.faction()
    }

    pub fn hp_ratio(&self) -> f32 {
        if self.stats.max_hp <= 0.0 {
            0.0
        } else {
            self.current_hp / self.stats.max_hp
        }
    }

    pub fn shield(&self) -> f32 {
        self.current_energy_shield.unwrap_or(0.0)
    }

    pub fn mana(&self) -> f32 {
        self.current_mana.unwrap_or(0.0)
    }

    // ===== stat refresh =====

    /// Composes stats and fills every pool to its maximum. Used when a
    /// participant enters the battle.
    pub fn ready(&mut self, context: &BattleContext) {
        self.stats = compose(self, context);
        self.current_hp = self.stats.max_hp;
        self.current_energy_shield =
            (self.stats.max_energy_shield > 0.0).then_some(self.stats.max_energy_shield);
        self.current_mana = (self.stats.max_mana > 0.0).then_some(self.stats.max_mana);
    }

    /// Recomposes stats after an input changed and clamps pools to the new
    /// maxima.
    ///
    /// Returns `true` when the clamp took a living participant to 0 HP. The
    /// caller owns the death transition.
    #[must_use = "a participant drained to 0 HP has to be killed"]
    pub fn refresh_stats(&mut self, context: &BattleContext) -> bool {
        let was_alive = self.is_alive();
        self.stats = compose(self, context);
        self.current_hp = self.current_hp.min(self.stats.max_hp).max(0.0);

        self.current_energy_shield = match self.current_energy_shield {
            _ if self.stats.max_energy_shield <= 0.0 => None,
            Some(shield) => Some(shield.min(self.stats.max_energy_shield)),
            None => Some(0.0),
        };
        self.current_mana = match self.current_mana {
            _ if self.stats.max_mana <= 0.0 => None,
            Some(mana) => Some(mana.min(self.stats.max_mana)),
            None => Some(0.0),
        };
        was_alive && self.current_hp <= 0.0
    }
}
