//! Core behavior trait.
//!
//! [`Behavior`] is what every node implements. It is generic over the
//! context type `C`, which doubles as the tree's blackboard: conditions read
//! it and actions write their decision into it. [`Node`] is the boxed form
//! composites store their children in.

use crate::Status;

/// A behavior tree node that can be evaluated against a context.
pub trait Behavior<C>: Send + Sync {
    /// Evaluate this node once for the current tick.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The blackboard. Nodes read the world view from it and
    ///   record decisions (movement, attack target, state) in it.
    ///
    /// # Returns
    ///
    /// - `Status::Success` if the condition held or the action decided
    /// - `Status::Failure` otherwise, so a parent selector tries the next
    ///   branch
    fn tick(&self, ctx: &mut C) -> Status;
}

/// Owned, dynamically dispatched node that may borrow data for `'n`.
///
/// The lifetime lets a tree be built around borrowed configuration without
/// forcing `C: 'static`.
pub type Node<'n, C> = Box<dyn Behavior<C> + 'n>;

/// Boxed nodes are nodes too, so composites can hold mixed children.
impl<C> Behavior<C> for Node<'_, C> {
    #[inline]
    fn tick(&self, ctx: &mut C) -> Status {
        (**self).tick(ctx)
    }
}
