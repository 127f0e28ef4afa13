//! Core environment context trait for the Courtside projector.

use async_trait::async_trait;
use std::time::{Duration, SystemTime};

/// The central interface for time.
///
/// This trait abstracts the "real world" clock so that the projector can run
/// against wall-clock time in production and against a manually advanced
/// virtual clock in replay tests.
///
/// # Implementations
///
/// - **Production**: `TokioContext` - wraps `SystemTime::now`, `tokio::time`
/// - **Simulation**: `SimContext` - virtual clock advanced by the harness
///
/// # Determinism
///
/// Every projector query is a pure function of the anchor timestamp and
/// `system_time()`. Controlling this one method makes replays reproducible.
#[async_trait]
pub trait CourtsideContext: Send + Sync + 'static {
    /// Returns the current monotonic time since context creation.
    ///
    /// Used for pacing loops and duration measurements.
    /// In simulation, this is the virtual clock time.
    fn now(&self) -> Duration;

    /// Returns the wall-clock time used as "now" by the projector.
    ///
    /// In simulation, this is derived from virtual clock + epoch offset.
    fn system_time(&self) -> SystemTime;

    /// Suspends execution for the given duration.
    ///
    /// In production: wraps `tokio::time::sleep`
    /// In simulation: advances virtual clock
    async fn sleep(&self, duration: Duration);
}
