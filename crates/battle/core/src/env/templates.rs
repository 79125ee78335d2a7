//! Participant templates used by summons, transforms and scenario spawns.
use crate::state::{
    AbilityId, AttackProc, AttackType, EnemyProfile, HeroProfile, Participant, ParticipantKind,
    Position, SpecialAttack, TemplateId,
};
use crate::stats::CombatStats;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticipantTemplate {
    pub id: TemplateId,
    pub name: String,
    pub base: CombatStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack_type: AttackType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_healer: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<AbilityId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_attack_procs: Vec<AttackProc>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub special_attack: Option<SpecialAttack>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flee_below_hp_ratio: Option<f32>,
}

impl ParticipantTemplate {
    /// Builds an unregistered participant of the given kind. The id and stats
    /// are filled in by [`BattleState::add_participant`](crate::BattleState::add_participant).
    pub fn instantiate(&self, kind: ParticipantKind, position: Position) -> Participant {
        let mut participant = Participant::new(self.name.clone(), kind, self.base);
        participant.template_id = Some(self.id.clone());
        participant.position = position;
        participant.attack_type = self.attack_type;
        participant.is_healer = self.is_healer;
        participant.abilities = self.abilities.clone();
        participant.on_attack_procs = self.on_attack_procs.clone();
        participant.special_attack = self.special_attack.clone();
        participant.flee_below_hp_ratio = self.flee_below_hp_ratio;
        participant
    }

    pub fn instantiate_enemy(&self, level: u32, position: Position) -> Participant {
        let profile = EnemyProfile {
            level,
            ..EnemyProfile::default()
        };
        self.instantiate(ParticipantKind::Enemy(profile), position)
    }

    pub fn instantiate_hero(&self, profile: HeroProfile, position: Position) -> Participant {
        self.instantiate(ParticipantKind::Hero(profile), position)
    }
}

/// Lookup of participant templates by id.
pub trait TemplateOracle: Send + Sync {
    fn template(&self, id: &TemplateId) -> Option<&ParticipantTemplate>;
}
