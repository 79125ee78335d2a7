//! Lightweight behavior tree library for fixed-timestep battle AI.
//!
//! Trees are re-evaluated from the root on every simulation tick. There is no
//! `Running` status: a node either produces its result this tick or fails, and
//! anything that spans several ticks (a reposition commitment, a channel) is
//! carried in the caller's state rather than inside the tree.
//!
//! Nodes are parameterized by a lifetime so a tree can be built over a context
//! that borrows the current battle snapshot.
//!
//! # Architecture
//!
//! - [`Behavior`]: Core trait for all nodes
//! - [`Status`]: Success or Failure
//! - Composite nodes: [`Sequence`], [`Selector`]
//! - Decorator nodes: [`Inverter`]
//! - Leaf nodes: [`Condition`], [`Action`]

pub mod behavior;
pub mod builder;
pub mod composite;
pub mod decorator;
pub mod leaf;
pub mod status;

pub use behavior::{Behavior, Node};
pub use composite::{Selector, Sequence};
pub use decorator::Inverter;
pub use leaf::{Action, Condition};
pub use status::Status;
