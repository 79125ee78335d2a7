use super::{Bonus, StatKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierKind {
    Flat,
    /// Fractional value, `0.1` means +10%.
    Percent,
}

/// One stat adjustment coming from progression, buildings, run buffs or a
/// status effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub stat: StatKind,
    pub kind: ModifierKind,
    pub value: f32,
}

impl StatModifier {
    pub const fn flat(stat: StatKind, value: f32) -> Self {
        Self {
            stat,
            kind: ModifierKind::Flat,
            value,
        }
    }

    pub const fn percent(stat: StatKind, value: f32) -> Self {
        Self {
            stat,
            kind: ModifierKind::Percent,
            value,
        }
    }

    /// Same modifier with its sign flipped. Debuffs are authored with
    /// positive magnitudes and negated when they are folded in.
    pub fn negated(self) -> Self {
        Self {
            value: -self.value,
            ..self
        }
    }

    pub fn bonus(&self) -> Bonus {
        match self.kind {
            ModifierKind::Flat => Bonus::Flat(self.value),
            ModifierKind::Percent => Bonus::Increased(self.value),
        }
    }
}
