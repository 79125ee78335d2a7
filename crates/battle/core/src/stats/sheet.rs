//! Effective combat stat sheet.

/// Every stat the Stat Composer produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatKind {
    MaxHp,
    Damage,
    Defense,
    /// Probability in `[0, 1]`.
    CritChance,
    /// Damage multiplier applied on a critical hit.
    CritDamage,
    /// Basic attacks per second.
    AttackSpeed,
    AttackRange,
    /// World units per second.
    MovementSpeed,
    MaxEnergyShield,
    /// Shield points restored per second once the recharge delay has passed.
    ShieldRechargeRate,
    /// Milliseconds without taking damage before the shield recharges.
    ShieldRechargeDelay,
    MaxMana,
    /// Mana restored per second.
    ManaRegen,
}

impl StatKind {
    /// Stats gated behind the shield building.
    pub const fn is_energy_shield(self) -> bool {
        matches!(
            self,
            Self::MaxEnergyShield | Self::ShieldRechargeRate | Self::ShieldRechargeDelay
        )
    }

    /// Inclusive clamp bounds applied as the last composition stage.
    pub const fn bounds(self) -> (f32, f32) {
        match self {
            Self::CritChance => (0.0, 1.0),
            _ => (0.0, f32::MAX),
        }
    }
}

/// Output of the Stat Composer. Also used as the base definition of a
/// participant template, in which case it holds unmodified values.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatStats {
    pub max_hp: f32,
    pub damage: f32,
    pub defense: f32,
    pub crit_chance: f32,
    pub crit_damage: f32,
    pub attack_speed: f32,
    pub attack_range: f32,
    pub movement_speed: f32,
    pub max_energy_shield: f32,
    pub shield_recharge_rate: f32,
    pub shield_recharge_delay: f32,
    pub max_mana: f32,
    pub mana_regen: f32,
}

impl CombatStats {
    pub fn get(&self, kind: StatKind) -> f32 {
        match kind {
            StatKind::MaxHp => self.max_hp,
            StatKind::Damage => self.damage,
            StatKind::Defense => self.defense,
            StatKind::CritChance => self.crit_chance,
            StatKind::CritDamage => self.crit_damage,
            StatKind::AttackSpeed => self.attack_speed,
            StatKind::AttackRange => self.attack_range,
            StatKind::MovementSpeed => self.movement_speed,
            StatKind::MaxEnergyShield => self.max_energy_shield,
            StatKind::ShieldRechargeRate => self.shield_recharge_rate,
            StatKind::ShieldRechargeDelay => self.shield_recharge_delay,
            StatKind::MaxMana => self.max_mana,
            StatKind::ManaRegen => self.mana_regen,
        }
    }

    pub fn get_mut(&mut self, kind: StatKind) -> &mut f32 {
        match kind {
            StatKind::MaxHp => &mut self.max_hp,
            StatKind::Damage => &mut self.damage,
            StatKind::Defense => &mut self.defense,
            StatKind::CritChance => &mut self.crit_chance,
            StatKind::CritDamage => &mut self.crit_damage,
            StatKind::AttackSpeed => &mut self.attack_speed,
            StatKind::AttackRange => &mut self.attack_range,
            StatKind::MovementSpeed => &mut self.movement_speed,
            StatKind::MaxEnergyShield => &mut self.max_energy_shield,
            StatKind::ShieldRechargeRate => &mut self.shield_recharge_rate,
            StatKind::ShieldRechargeDelay => &mut self.shield_recharge_delay,
            StatKind::MaxMana => &mut self.max_mana,
            StatKind::ManaRegen => &mut self.mana_regen,
        }
    }

    /// Milliseconds between two basic attacks, or `None` when the participant
    /// cannot attack at all.
    pub fn attack_interval_ms(&self) -> Option<u32> {
        (self.attack_speed > 0.0).then(|| (1000.0 / self.attack_speed).round() as u32)
    }

    // ===== builder helpers, mostly for tests and content defaults =====

    pub fn with(mut self, kind: StatKind, value: f32) -> Self {
        *self.get_mut(kind) = value;
        self
    }
}
