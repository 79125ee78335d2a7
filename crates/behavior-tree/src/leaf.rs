//! Leaf nodes built from plain functions.
//!
//! Most battle behaviors are a predicate or a single write into the
//! blackboard, so leaves wrap function pointers instead of requiring a unit
//! struct per node.

use crate::{Behavior, Status};

/// Succeeds when the predicate holds. Never mutates the context.
pub struct Condition<C> {
    predicate: fn(&C) -> bool,
}

impl<C> Condition<C> {
    pub fn new(predicate: fn(&C) -> bool) -> Self {
        Self { predicate }
    }
}

impl<C> Behavior<C> for Condition<C> {
    #[inline]
    fn tick(&self, ctx: &mut C) -> Status {
        (self.predicate)(ctx).into()
    }
}

/// Runs a function that may write a decision into the context.
pub struct Action<C> {
    run: fn(&mut C) -> Status,
}

impl<C> Action<C> {
    pub fn new(run: fn(&mut C) -> Status) -> Self {
        Self { run }
    }
}

impl<C> Behavior<C> for Action<C> {
    #[inline]
    fn tick(&self, ctx: &mut C) -> Status {
        (self.run)(ctx)
    }
}
