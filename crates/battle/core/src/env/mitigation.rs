//! Defense mitigation models.
//!
//! How `defense` reduces incoming damage is a balance decision, so the
//! resolver only talks to the [`DefenseMitigation`] trait.

/// Maps raw damage and the target's defense to mitigated damage.
pub trait DefenseMitigation: Send + Sync {
    fn mitigate(&self, raw: f32, defense: f32) -> f32;
}

/// Ignores defense entirely.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NoMitigation;

impl DefenseMitigation for NoMitigation {
    fn mitigate(&self, raw: f32, _defense: f32) -> f32 {
        raw.max(0.0)
    }
}

/// Subtracts defense, never dropping below `min_damage`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatReduction {
    pub min_damage: f32,
}

impl DefenseMitigation for FlatReduction {
    fn mitigate(&self, raw: f32, defense: f32) -> f32 {
        if raw <= 0.0 {
            return 0.0;
        }
        (raw - defense.max(0.0)).max(self.min_damage.min(raw))
    }
}

/// `raw * scale / (scale + defense)`: each point of defense is worth less
/// than the previous one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiminishingReturns {
    pub scale: f32,
}

impl DefenseMitigation for DiminishingReturns {
    fn mitigate(&self, raw: f32, defense: f32) -> f32 {
        let defense = defense.max(0.0);
        if raw <= 0.0 || self.scale <= 0.0 {
            return raw.max(0.0);
        }
        raw * self.scale / (self.scale + defense)
    }
}

/// Config-selectable mitigation model.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "model", rename_all = "snake_case"))]
pub enum MitigationModel {
    #[default]
    Identity,
    Flat {
        min_damage: f32,
    },
    Diminishing {
        scale: f32,
    },
}

impl DefenseMitigation for MitigationModel {
    fn mitigate(&self, raw: f32, defense: f32) -> f32 {
        match *self {
            Self::Identity => NoMitigation.mitigate(raw, defense),
            Self::Flat { min_damage } => FlatReduction { min_damage }.mitigate(raw, defense),
            Self::Diminishing { scale } => DiminishingReturns { scale }.mitigate(raw, defense),
        }
    }
}
