//! Simulation context implementing CourtsideContext for deterministic replays.

use async_trait::async_trait;
use courtside_env::CourtsideContext;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Virtual time 0 maps to tip-off of the built-in game, 2025-04-13 22:40:00 UTC.
pub const SIM_EPOCH_SECS: u64 = 1_744_584_000;

/// Simulation context backed by deterministic time and RNG.
///
/// This implements `CourtsideContext` using:
/// - A virtual clock that can be advanced manually
/// - A seeded ChaCha8 RNG for scenario step sizes
/// - Simulated sleep that advances virtual time
pub struct SimContext {
    /// Master seed for this simulation
    seed: u64,

    /// Current virtual time (nanoseconds since simulation start)
    virtual_time_ns: Arc<Mutex<u64>>,

    /// Deterministic RNG for scenario decisions
    rng: Arc<Mutex<ChaCha8Rng>>,

    /// Epoch offset (virtual time 0 maps to this wall-clock time)
    epoch: SystemTime,
}

impl SimContext {
    /// Creates a new SimContext with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            virtual_time_ns: Arc::new(Mutex::new(0)),
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
            epoch: UNIX_EPOCH + Duration::from_secs(SIM_EPOCH_SECS),
        }
    }

    /// Creates an Arc-wrapped context for sharing.
    pub fn shared(seed: u64) -> Arc<Self> {
        Arc::new(Self::new(seed))
    }

    /// Master seed of this context.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Advances virtual time by the given duration.
    pub fn advance_time(&self, duration: Duration) {
        let mut time = self
            .virtual_time_ns
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *time = time.saturating_add(duration.as_nanos() as u64);
    }

    /// Sets the virtual time to a specific value.
    pub fn set_time(&self, time_ns: u64) {
        let mut time = self
            .virtual_time_ns
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *time = time_ns;
    }

    /// Returns the current virtual time in nanoseconds.
    pub fn time_ns(&self) -> u64 {
        *self
            .virtual_time_ns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Draws a whole number of seconds in `[min, max]` from the seeded RNG.
    pub fn random_secs(&self, min: u64, max: u64) -> u64 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(min..=max.max(min))
    }
}

impl Clone for SimContext {
    fn clone(&self) -> Self {
        Self {
            seed: self.seed,
            virtual_time_ns: Arc::clone(&self.virtual_time_ns),
            rng: Arc::clone(&self.rng),
            epoch: self.epoch,
        }
    }
}

#[async_trait]
impl CourtsideContext for SimContext {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.time_ns())
    }

    fn system_time(&self) -> SystemTime {
        self.epoch + self.now()
    }

    async fn sleep(&self, duration: Duration) {
        // Sleeping only moves the virtual clock
        self.advance_time(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_context_time() {
        let ctx = SimContext::new(42);
        assert_eq!(ctx.now(), Duration::ZERO);

        ctx.advance_time(Duration::from_secs(1));
        assert_eq!(ctx.now(), Duration::from_secs(1));

        ctx.advance_time(Duration::from_millis(500));
        assert_eq!(ctx.now(), Duration::from_millis(1500));

        ctx.set_time(0);
        assert_eq!(ctx.time_ns(), 0);
    }

    #[test]
    fn test_sim_context_epoch_is_tip_off() {
        let ctx = SimContext::new(7);
        assert_eq!(
            ctx.system_time(),
            UNIX_EPOCH + Duration::from_secs(SIM_EPOCH_SECS)
        );
        ctx.advance_time(Duration::from_secs(81));
        assert_eq!(
            ctx.system_time(),
            UNIX_EPOCH + Duration::from_secs(SIM_EPOCH_SECS + 81)
        );
    }

    #[test]
    fn test_sim_context_deterministic_steps() {
        let ctx1 = SimContext::new(42);
        let ctx2 = SimContext::new(42);

        let a: Vec<u64> = (0..20).map(|_| ctx1.random_secs(1, 60)).collect();
        let b: Vec<u64> = (0..20).map(|_| ctx2.random_secs(1, 60)).collect();

        // Same seed = same steps
        assert_eq!(a, b);
        assert!(a.iter().all(|s| (1..=60).contains(s)));
    }

    #[test]
    fn test_sim_context_clone_shares_time() {
        let ctx1 = SimContext::new(42);
        let ctx2 = ctx1.clone();

        ctx1.advance_time(Duration::from_secs(5));

        // Both should see the same time
        assert_eq!(ctx1.now(), ctx2.now());
        assert_eq!(ctx2.seed(), 42);
    }

    #[tokio::test]
    async fn test_sim_sleep_advances_clock() {
        let ctx = SimContext::new(1);
        ctx.sleep(Duration::from_secs(30)).await;
        assert_eq!(ctx.now(), Duration::from_secs(30));
    }
}
