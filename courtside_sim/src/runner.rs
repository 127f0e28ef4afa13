//! Scenario runner - replays the scripted game under a virtual clock.

use crate::context::SimContext;
use crate::exporter::{TimelineExport, TimelineFrame};
use crate::scenarios::ScenarioId;

use courtside_core::feed::Scoreboard;
use courtside_core::validation::{ValidationReport, ValidationSession};
use courtside_core::{GameFixture, GameSnapshot, GameStatus, MockGameProjector, ProjectorConfig};
use courtside_env::CourtsideContext;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Number of reader threads in the concurrent scenario.
const READER_THREADS: usize = 4;

/// How far past the buzzer the expiry scenario jumps.
const EXPIRY_OVERSHOOT_SECS: u64 = 3 * 3600;

/// Results from running a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether scenario passed all assertions
    pub passed: bool,

    /// Total clock advances executed
    pub total_ticks: u64,

    /// Final virtual time in seconds
    pub final_time_secs: f64,

    /// Game clock at the end, `MM:SS`
    pub final_clock: String,

    /// Score at the end
    pub final_score: Scoreboard,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Metrics collected during run
    pub metrics: ScenarioMetrics,

    /// Invariant checks over every validated snapshot
    pub report: ValidationReport,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScenarioMetrics {
    /// Snapshots validated
    pub snapshots: u64,

    /// Timer resets issued
    pub resets: u64,

    /// Queries repeated at the same instant
    pub repeated_queries: u64,

    /// Plays that had happened by the end
    pub plays_occurred: usize,

    /// Most plays that landed within a single tick
    pub max_plays_per_tick: usize,

    /// Invariant violations found
    pub violations: usize,
}

/// Runs replay scenarios.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,

    /// Virtual seconds per tick
    tick_secs: u64,

    /// Game to replay
    fixture: GameFixture,

    /// Projector settings
    config: ProjectorConfig,
}

impl ScenarioRunner {
    /// Creates a new scenario runner over the built-in game.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            tick_secs: 1,
            fixture: GameFixture::lal_at_por(),
            config: ProjectorConfig::default(),
        }
    }

    /// Sets the virtual seconds per tick.
    pub fn with_tick(mut self, secs: u64) -> Self {
        self.tick_secs = secs.max(1);
        self
    }

    /// Sets the period length in seconds.
    pub fn with_period(mut self, secs: u32) -> Self {
        self.config = self.config.with_period_length(secs);
        self
    }

    /// Replays a different game.
    pub fn with_fixture(mut self, fixture: GameFixture) -> Self {
        self.fixture = fixture;
        self
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        self.run_recorded(scenario).0
    }

    /// Runs a scenario, also returning its timeline.
    pub fn run_recorded(&self, scenario: ScenarioId) -> (ScenarioResult, TimelineExport) {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);

        let mut replay = Replay::new(self, scenario);
        let failure = match scenario {
            ScenarioId::FullPeriod => self.run_full_period(&mut replay),
            ScenarioId::ResetMidGame => self.run_reset_mid_game(&mut replay),
            ScenarioId::ClockExpiry => self.run_clock_expiry(&mut replay),
            ScenarioId::RandomJumps => self.run_random_jumps(&mut replay),
            ScenarioId::RecentWindow => self.run_recent_window(&mut replay),
            ScenarioId::ConcurrentReaders => self.run_concurrent_readers(&mut replay),
        };

        replay.finish(failure)
    }

    /// REPLAY-001: FullPeriod - one tick at a time from tip-off to the buzzer.
    ///
    /// **Assertion**: every snapshot passes validation and the final score
    /// equals the script's total.
    fn run_full_period(&self, replay: &mut Replay) -> Option<String> {
        info!("REPLAY-001: FullPeriod");

        let last = replay.run_to_buzzer(self.tick_secs);
        check_final(&last, replay.expected_final())
    }

    /// REPLAY-002: ResetMidGame - reset at half time, then play out.
    ///
    /// **Assertion**: the reset starts a fresh period and the replayed
    /// second run ends on the same score.
    fn run_reset_mid_game(&self, replay: &mut Replay) -> Option<String> {
        info!("REPLAY-002: ResetMidGame");

        let half = u64::from(self.config.period_length_secs / 2);
        replay.observe();
        while replay.elapsed_secs() < half {
            replay.advance(self.tick_secs.min(half - replay.elapsed_secs()));
            replay.observe();
        }

        let at_half = replay.observe();
        info!(
            "  Half time {}: {}-{}, resetting",
            at_half.clock.label(),
            at_half.scoreboard.home,
            at_half.scoreboard.away
        );
        replay.reset();

        let last = replay.run_to_buzzer(self.tick_secs);
        check_final(&last, replay.expected_final())
    }

    /// REPLAY-003: ClockExpiry - jump hours past the end.
    ///
    /// **Assertion**: remaining stays at 0, status is Final, and every view
    /// matches the one taken at the buzzer.
    fn run_clock_expiry(&self, replay: &mut Replay) -> Option<String> {
        info!("REPLAY-003: ClockExpiry");

        let at_buzzer = replay.run_to_buzzer(self.tick_secs);
        replay.advance(EXPIRY_OVERSHOOT_SECS);
        let later = replay.observe();

        if later.clock.remaining_seconds != 0 || later.status != GameStatus::Final {
            return Some(format!(
                "clock not frozen after expiry: {} remaining, {:?}",
                later.clock.remaining_seconds, later.status
            ));
        }
        if later.play_by_play != at_buzzer.play_by_play || later.box_score != at_buzzer.box_score {
            return Some("views changed after the period ended".to_string());
        }
        check_final(&later, replay.expected_final())
    }

    /// REPLAY-004: RandomJumps - seeded step sizes, every query asked twice.
    ///
    /// **Assertion**: repeated queries agree and progress stays monotonic.
    fn run_random_jumps(&self, replay: &mut Replay) -> Option<String> {
        info!("REPLAY-004: RandomJumps");

        let max_step = (self.tick_secs * 90).max(1);
        loop {
            let first = replay.projector.snapshot();
            let second = replay.projector.snapshot();
            replay.record_repeat(&first, &second);
            if first.clock.is_period_over() {
                return check_final(&first, replay.expected_final());
            }

            let step = replay.ctx.random_secs(0, max_step);
            debug!("  jump {}s from {}", step, first.clock.label());
            replay.advance(step);
        }
    }

    /// REPLAY-005: RecentWindow - the recent-plays query against the feed.
    ///
    /// **Assertion**: the window holds `min(occurred, limit)` plays and its
    /// clock labels match the commentary context.
    fn run_recent_window(&self, replay: &mut Replay) -> Option<String> {
        info!("REPLAY-005: RecentWindow");

        let limit = self.config.recent_plays_limit;
        let game_id = replay.projector.game().game_id.clone();
        loop {
            let snapshot = replay.observe();
            let recent = replay.projector.recent_plays(&game_id);
            let context = replay.projector.game_context(&game_id);

            if recent.len() != snapshot.occurred_count().min(limit) {
                return Some(format!(
                    "window of {} plays with {} occurred at {}",
                    recent.len(),
                    snapshot.occurred_count(),
                    snapshot.clock.label()
                ));
            }
            let window: Vec<&str> = recent.iter().map(|p| p.clock_label.as_str()).collect();
            let shown: Vec<&str> = context.recent_plays.iter().map(|p| p.clock.as_str()).collect();
            if window != shown {
                return Some(format!("context window differs at {}", snapshot.clock.label()));
            }

            if snapshot.clock.is_period_over() {
                return None;
            }
            replay.advance(self.tick_secs);
        }
    }

    /// REPLAY-006: ConcurrentReaders - readers on threads racing resets.
    ///
    /// **Assertion**: every snapshot is internally consistent; no reader ever
    /// sees a view mixed from two anchors.
    fn run_concurrent_readers(&self, replay: &mut Replay) -> Option<String> {
        info!("REPLAY-006: ConcurrentReaders");

        let rounds = 40;
        let projector = &replay.projector;
        let ctx = &replay.ctx;
        let step = Duration::from_secs(self.tick_secs * 17);

        let snapshots: Vec<GameSnapshot> = std::thread::scope(|scope| {
            let readers: Vec<_> = (0..READER_THREADS)
                .map(|_| {
                    scope.spawn(move || {
                        (0..rounds).map(|_| projector.snapshot()).collect::<Vec<_>>()
                    })
                })
                .collect();

            for round in 0..rounds {
                ctx.advance_time(step);
                if round % 5 == 4 {
                    projector.reset_timer();
                }
            }

            readers
                .into_iter()
                .flat_map(|reader| reader.join().unwrap_or_default())
                .collect()
        });

        replay.ticks += rounds as u64;
        replay.metrics.resets += (rounds / 5) as u64;
        let expected = READER_THREADS * rounds;
        if snapshots.len() != expected {
            return Some(format!(
                "{} of {} reader snapshots came back",
                snapshots.len(),
                expected
            ));
        }
        for snapshot in &snapshots {
            replay.session.record_unordered(snapshot);
            replay.metrics.snapshots += 1;
        }
        None
    }
}

/// Compares a final snapshot with the script's full-period score.
fn check_final(snapshot: &GameSnapshot, expected: Scoreboard) -> Option<String> {
    if snapshot.status != GameStatus::Final {
        return Some(format!("game not Final at {}", snapshot.clock.label()));
    }
    if snapshot.scoreboard != expected {
        return Some(format!(
            "final score {}-{} != scripted {}-{}",
            snapshot.scoreboard.home, snapshot.scoreboard.away, expected.home, expected.away
        ));
    }
    None
}

// ============================================================================
// Replay state
// ============================================================================

/// One scenario's projector, clock, validator, and timeline.
struct Replay {
    scenario: ScenarioId,
    seed: u64,
    ctx: Arc<SimContext>,
    projector: MockGameProjector<SimContext>,
    session: ValidationSession,
    export: TimelineExport,
    metrics: ScenarioMetrics,
    ticks: u64,
    last_occurred: usize,
    pending_event: Option<String>,
}

impl Replay {
    fn new(runner: &ScenarioRunner, scenario: ScenarioId) -> Self {
        let ctx = SimContext::shared(runner.seed);
        let projector =
            MockGameProjector::from_fixture(&runner.fixture, Arc::clone(&ctx), runner.config);
        let export = TimelineExport::new(
            scenario.name(),
            runner.seed,
            projector.game().game_id.as_str(),
        );

        Self {
            scenario,
            seed: runner.seed,
            ctx,
            projector,
            session: ValidationSession::new(runner.config.period_length_secs),
            export,
            metrics: ScenarioMetrics::default(),
            ticks: 0,
            last_occurred: 0,
            pending_event: None,
        }
    }

    fn elapsed_secs(&self) -> u64 {
        self.projector.clock_state().elapsed_seconds
    }

    fn advance(&mut self, secs: u64) {
        self.ctx.advance_time(Duration::from_secs(secs));
        self.ticks += 1;
    }

    fn reset(&mut self) {
        let reset = self.projector.reset_timer();
        self.session.mark_reset();
        self.metrics.resets += 1;
        self.pending_event = Some(format!("timer reset at {}", reset.reset_at.to_rfc3339()));
    }

    /// Takes, validates, and records one snapshot.
    fn observe(&mut self) -> GameSnapshot {
        let snapshot = self.projector.snapshot();
        self.session.record(&snapshot);
        self.track(&snapshot);
        snapshot
    }

    fn record_repeat(&mut self, first: &GameSnapshot, second: &GameSnapshot) {
        self.session.record_repeat(first, second);
        self.metrics.repeated_queries += 1;
        self.track(first);
    }

    fn track(&mut self, snapshot: &GameSnapshot) {
        self.metrics.snapshots += 1;

        let occurred = snapshot.occurred_count();
        let landed = occurred.saturating_sub(self.last_occurred);
        self.metrics.max_plays_per_tick = self.metrics.max_plays_per_tick.max(landed);
        self.last_occurred = occurred;

        let mut frame = TimelineFrame::from_snapshot(self.ctx.now().as_secs_f64(), snapshot);
        if let Some(event) = self.pending_event.take() {
            frame = frame.with_event(event);
        }
        self.export.add_frame(frame);

        if self.metrics.snapshots % 60 == 0 {
            debug!(
                "  {} | {}-{} | {} plays",
                snapshot.clock.label(),
                snapshot.scoreboard.home,
                snapshot.scoreboard.away,
                occurred
            );
        }
    }

    /// Ticks until the period is over, returning the last snapshot.
    fn run_to_buzzer(&mut self, tick_secs: u64) -> GameSnapshot {
        let mut snapshot = self.observe();
        while !snapshot.clock.is_period_over() {
            self.advance(tick_secs);
            snapshot = self.observe();
        }
        snapshot
    }

    /// Total points the script awards each team over the period.
    fn expected_final(&self) -> Scoreboard {
        Scoreboard::from_events(self.projector.script())
    }

    fn finish(mut self, failure: Option<String>) -> (ScenarioResult, TimelineExport) {
        let last = self.projector.snapshot();
        let report = self.session.generate_report();

        self.metrics.plays_occurred = last.occurred_count();
        self.metrics.violations = report.violations.len();

        let failure_reason = failure.or_else(|| {
            report
                .violations
                .first()
                .map(|v| format!("{} ({} violations)", v, report.violations.len()))
        });
        let passed = failure_reason.is_none();

        if let Some(reason) = &failure_reason {
            warn!("✗ {} failed: {}", self.scenario.name(), reason);
        } else {
            info!(
                "✓ {} complete: {} snapshots, final {}-{}",
                self.scenario.name(),
                self.metrics.snapshots,
                last.scoreboard.home,
                last.scoreboard.away
            );
        }

        self.export.finalize(passed, report.violations.len());

        let result = ScenarioResult {
            scenario: self.scenario,
            seed: self.seed,
            passed,
            total_ticks: self.ticks,
            final_time_secs: self.ctx.now().as_secs_f64(),
            final_clock: last.clock.label(),
            final_score: last.scoreboard,
            failure_reason,
            metrics: self.metrics,
            report,
        };
        (result, self.export)
    }
}
