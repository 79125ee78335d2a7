//! Decorator behavior nodes.
//!
//! A decorator wraps exactly one child and rewrites its result.

use crate::{Behavior, Node, Status};

/// Inverts the result of its child.
///
/// # Semantics
///
/// - Child `Success` ticks as `Failure`
/// - Child `Failure` ticks as `Success`
///
/// Role trees use it to guard a branch on a condition not holding.
pub struct Inverter<'n, C> {
    child: Node<'n, C>,
}

impl<'n, C> Inverter<'n, C> {
    /// Wraps `child`.
    pub fn new(child: Node<'n, C>) -> Self {
        Self { child }
    }
}

impl<C> Behavior<C> for Inverter<'_, C> {
    fn tick(&self, ctx: &mut C) -> Status {
        self.child.tick(ctx).invert()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Condition;

    #[test]
    fn inverter_flips_condition() {
        let positive = Inverter::new(Box::new(Condition::new(|v: &i32| *v > 0)) as Node<'_, i32>);

        assert_eq!(positive.tick(&mut 3), Status::Failure);
        assert_eq!(positive.tick(&mut -3), Status::Success);
    }
}
