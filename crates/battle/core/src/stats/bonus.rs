//! Bonus stacking primitive shared by every composition stage.
//!
//! A stage collects the modifiers that apply to one stat into a
//! [`BonusStack`] and folds them into the running value. Two folding orders
//! exist because progression stages add flat values before percentages while
//! battle-scoped stages (run buffs, status effects) scale first and add flat
//! values afterwards.

/// A single bonus applied to a stat value.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bonus {
    /// Additive bonus.
    Flat(f32),

    /// Fractional increase, summed with other increases then multiplied
    /// once (`0.2` = +20%). Negative values reduce.
    Increased(f32),
}

/// Order in which a stack folds its flat and increased parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StackOrder {
    /// `(base + flat) * (1 + increased)`
    #[default]
    FlatFirst,
    /// `base * (1 + increased) + flat`
    IncreasedFirst,
}

/// A collection of bonuses applied together.
///
/// ```
/// # use battle_core::stats::{BonusStack, StackOrder};
/// let stack = BonusStack::new().flat(5.0).increased(0.2).increased(0.3);
/// assert_eq!(stack.apply(10.0, StackOrder::FlatFirst), 22.5);
/// assert_eq!(stack.apply(10.0, StackOrder::IncreasedFirst), 20.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BonusStack {
    bonuses: Vec<Bonus>,
}

impl BonusStack {
    pub fn new() -> Self {
        Self {
            bonuses: Vec::new(),
        }
    }

    pub fn add(&mut self, bonus: Bonus) {
        self.bonuses.push(bonus);
    }

    pub fn extend(&mut self, bonuses: impl IntoIterator<Item = Bonus>) {
        self.bonuses.extend(bonuses);
    }

    pub fn flat_sum(&self) -> f32 {
        self.bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::Flat(v) => Some(*v),
                Bonus::Increased(_) => None,
            })
            .sum()
    }

    pub fn increased_sum(&self) -> f32 {
        self.bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::Increased(v) => Some(*v),
                Bonus::Flat(_) => None,
            })
            .sum()
    }

    /// Folds the stack into `base`. No clamping happens here; the composer
    /// clamps once after every stage has run.
    pub fn apply(&self, base: f32, order: StackOrder) -> f32 {
        if self.bonuses.is_empty() {
            return base;
        }

        let flat = self.flat_sum();
        let multiplier = 1.0 + self.increased_sum();
        match order {
            StackOrder::FlatFirst => (base + flat) * multiplier,
            StackOrder::IncreasedFirst => base * multiplier + flat,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bonuses.len()
    }
}

impl BonusStack {
    pub fn flat(mut self, value: f32) -> Self {
        self.add(Bonus::Flat(value));
        self
    }

    pub fn increased(mut self, fraction: f32) -> Self {
        self.add(Bonus::Increased(fraction));
        self
    }
}

impl FromIterator<Bonus> for BonusStack {
    fn from_iter<I: IntoIterator<Item = Bonus>>(iter: I) -> Self {
        Self {
            bonuses: iter.into_iter().collect(),
        }
    }
}
