//! Composite behavior nodes.
//!
//! [`Sequence`] is a short-circuiting AND over its children, [`Selector`] a
//! short-circuiting OR. Role behaviors are usually a selector of guarded
//! sequences: the first branch whose guards all pass gets to decide.

use crate::{Behavior, Node, Status};

/// Runs children left to right until one fails.
///
/// # Semantics
///
/// - Returns `Failure` as soon as a child fails; later children are not
///   ticked
/// - Returns `Success` only if every child succeeded
///
/// An empty sequence succeeds.
pub struct Sequence<'n, C> {
    children: Vec<Node<'n, C>>,
}

impl<'n, C> Sequence<'n, C> {
    /// Creates a sequence over `children`, evaluated in order.
    pub fn new(children: Vec<Node<'n, C>>) -> Self {
        Self { children }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<C> Behavior<C> for Sequence<'_, C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            if child.tick(ctx).is_failure() {
                return Status::Failure;
            }
        }
        Status::Success
    }
}

/// Runs children left to right until one succeeds.
///
/// # Semantics
///
/// - Returns `Success` as soon as a child succeeds; later children are not
///   ticked
/// - Returns `Failure` only if every child failed
///
/// An empty selector fails.
pub struct Selector<'n, C> {
    children: Vec<Node<'n, C>>,
}

impl<'n, C> Selector<'n, C> {
    /// Creates a selector over `children`, tried in priority order.
    pub fn new(children: Vec<Node<'n, C>>) -> Self {
        Self { children }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<C> Behavior<C> for Selector<'_, C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            if child.tick(ctx).is_success() {
                return Status::Success;
            }
        }
        Status::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, Condition};

    struct Blackboard {
        value: i32,
        trail: Vec<&'static str>,
    }

    fn bump(ctx: &mut Blackboard) -> Status {
        ctx.value += 1;
        ctx.trail.push("bump");
        Status::Success
    }

    fn refuse(ctx: &mut Blackboard) -> Status {
        ctx.trail.push("refuse");
        Status::Failure
    }

    fn board() -> Blackboard {
        Blackboard {
            value: 0,
            trail: Vec::new(),
        }
    }

    #[test]
    fn sequence_runs_every_child_on_success() {
        let seq = Sequence::new(vec![
            Box::new(Action::new(bump)) as Node<'_, Blackboard>,
            Box::new(Action::new(bump)),
        ]);

        let mut ctx = board();
        assert_eq!(seq.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.value, 2);
    }

    #[test]
    fn sequence_stops_at_first_failure() {
        let seq = Sequence::new(vec![
            Box::new(Action::new(bump)) as Node<'_, Blackboard>,
            Box::new(Action::new(refuse)),
            Box::new(Action::new(bump)),
        ]);

        let mut ctx = board();
        assert_eq!(seq.tick(&mut ctx), Status::Failure);
        assert_eq!(ctx.trail, vec!["bump", "refuse"]);
    }

    #[test]
    fn selector_stops_at_first_success() {
        let sel = Selector::new(vec![
            Box::new(Action::new(refuse)) as Node<'_, Blackboard>,
            Box::new(Action::new(bump)),
            Box::new(Action::new(bump)),
        ]);

        let mut ctx = board();
        assert_eq!(sel.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.value, 1);
    }

    #[test]
    fn guarded_branch_falls_through_when_guard_fails() {
        let tree = Selector::new(vec![
            Box::new(Sequence::new(vec![
                Box::new(Condition::new(|ctx: &Blackboard| ctx.value > 5)) as Node<'_, Blackboard>,
                Box::new(Action::new(refuse)),
            ])) as Node<'_, Blackboard>,
            Box::new(Action::new(bump)),
        ]);

        let mut ctx = board();
        assert_eq!(tree.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.trail, vec!["bump"]);
    }

    #[test]
    fn empty_composites_have_identity_results() {
        let mut ctx = board();
        assert_eq!(Sequence::<'_, Blackboard>::new(Vec::new()).tick(&mut ctx), Status::Success);
        assert_eq!(Selector::<'_, Blackboard>::new(Vec::new()).tick(&mut ctx), Status::Failure);
    }
}
