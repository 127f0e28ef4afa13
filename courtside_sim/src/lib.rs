//! Courtside Deterministic Replay Harness
//!
//! This crate drives the projector under a virtual clock, so a whole period
//! of "live" game can be replayed in milliseconds and replayed again with
//! identical output.
//!
//! # Core Principle: Controlled Time
//!
//! Every projector answer is a function of the anchor and "now". The harness
//! owns "now":
//! - **Time**: `SimContext` advances only when a scenario tells it to
//! - **Randomness**: step sizes come from a single 64-bit seed
//! - **Checks**: each snapshot goes through `ValidationSession`
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                    ScenarioRunner                      │
//! │  ┌──────────────┐   advance    ┌────────────────────┐  │
//! │  │  SimContext  │◄─────────────│      scenario      │  │
//! │  │ (virtual ns) │              └─────────┬──────────┘  │
//! │  └──────┬───────┘                        │ snapshot    │
//! │         │ system_time()        ┌─────────▼──────────┐  │
//! │         └─────────────────────►│ MockGameProjector  │  │
//! │                                └─────────┬──────────┘  │
//! │                 ┌────────────────────────┼───────┐     │
//! │        ┌────────▼─────────┐     ┌────────▼─────┐ │     │
//! │        │ ValidationSession│     │TimelineExport│ │     │
//! │        └──────────────────┘     └──────────────┘ │     │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use courtside_sim::{ScenarioRunner, scenarios::ScenarioId};
//!
//! let result = ScenarioRunner::new(42).with_tick(5).run(ScenarioId::FullPeriod);
//! assert!(result.passed);
//! ```

mod context;
mod exporter;
mod runner;
pub mod scenarios;

pub use context::{SimContext, SIM_EPOCH_SECS};
pub use exporter::{TimelineEvent, TimelineExport, TimelineFrame};
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner};
