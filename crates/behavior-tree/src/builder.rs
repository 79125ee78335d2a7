//! Builder utilities for compact behavior tree construction.
//!
//! Role trees nest several levels deep. These helpers return ready-boxed
//! [`Node`]s so a tree reads as nested lists instead of
//! `Box::new(Sequence::new(vec![...]))` chains.

use crate::{Action, Inverter, Node, Selector, Sequence, Status};

/// Creates a sequence node.
///
/// Shorthand for `Box::new(Sequence::new(children))`.
#[inline]
pub fn sequence<'n, C: 'n>(children: Vec<Node<'n, C>>) -> Node<'n, C> {
    Box::new(Sequence::new(children))
}

/// Creates a selector node.
///
/// Shorthand for `Box::new(Selector::new(children))`.
#[inline]
pub fn selector<'n, C: 'n>(children: Vec<Node<'n, C>>) -> Node<'n, C> {
    Box::new(Selector::new(children))
}

/// Creates an inverter node.
///
/// Shorthand for `Box::new(Inverter::new(child))`.
#[inline]
pub fn inverter<'n, C: 'n>(child: Node<'n, C>) -> Node<'n, C> {
    Box::new(Inverter::new(child))
}

/// Creates a condition leaf from a read-only predicate.
///
/// `true` ticks as `Success`, `false` as `Failure`.
#[inline]
pub fn condition<'n, C: 'n>(predicate: fn(&C) -> bool) -> Node<'n, C> {
    Box::new(crate::Condition::new(predicate))
}

/// Creates an action leaf.
///
/// The function may write its decision into the context and reports
/// whether it acted.
#[inline]
pub fn action<'n, C: 'n>(run: fn(&mut C) -> Status) -> Node<'n, C> {
    Box::new(Action::new(run))
}
