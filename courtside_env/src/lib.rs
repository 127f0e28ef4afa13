//! Courtside Environment Abstraction Layer
//!
//! This crate provides the time abstraction that lets the mock live-game
//! projector run against the **Production** wall clock (tokio) or a
//! **Simulation** virtual clock.
//!
//! # Core Concept
//!
//! The projector never calls `SystemTime::now()` itself. Everything that
//! depends on "now" goes through [`CourtsideContext::system_time`], so a
//! replay harness can freeze, step, or jump the clock at will.
//!
//! # Example
//!
//! ```ignore
//! use courtside_env::{CourtsideContext, TokioContext};
//!
//! async fn watch<Ctx: CourtsideContext>(ctx: &Ctx) {
//!     loop {
//!         render(ctx.system_time());
//!         ctx.sleep(Duration::from_secs(1)).await;
//!     }
//! }
//! ```

mod context;
mod types;
mod tokio_impl;

pub use context::CourtsideContext;
pub use types::GameId;
pub use tokio_impl::TokioContext;
