//! Stat composition.
//!
//! [`compose`] folds a participant's base definition, persistent progression,
//! battle-scoped context and active status effects into [`CombatStats`] using
//! the shared [`BonusStack`] primitive.
mod bonus;
mod compose;
mod modifier;
mod sheet;

pub use bonus::{Bonus, BonusStack, StackOrder};
pub use compose::compose;
pub use modifier::{ModifierKind, StatModifier};
pub use sheet::{CombatStats, StatKind};
