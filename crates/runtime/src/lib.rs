//! Async driver for the deterministic battle engine.
//!
//! This crate owns a [`battle_core::BattleState`] inside a background tokio
//! task and advances it on a fixed-timestep interval. Consumers build a
//! [`Runtime`], subscribe to [`RuntimeEvent`] notifications and steer the
//! battle through the cloneable [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] defines what the driver broadcasts
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{BattleSummary, RuntimeEvent, StopReason, TickReport};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
