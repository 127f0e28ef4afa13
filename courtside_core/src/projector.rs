//! The mock game projector: the query surface over one scripted game.
//!
//! Every query follows the same steps:
//!
//! 1. read the anchor once and "now" once
//! 2. project the clock
//! 3. filter the script to the plays that have happened
//! 4. compose the requested view from that occurred set
//!
//! Nothing is cached, so two queries at the same instant always agree and a
//! concurrent [`MockGameProjector::reset_timer`] can never mix two anchors
//! into one answer.

use crate::clock::{ClockProjector, GameClockState};
use crate::feed::{self, FeedComposer, Leaders, PlayByPlayEntry, Scoreboard, TripleDoubleProgress};
use crate::fixture::GameFixture;
use crate::occurrence::EventFilter;
use crate::roster::{GameInfo, Roster, TeamInfo};
use crate::script::PlayEvent;
use crate::stats::StatLine;
use crate::timer::TimerControl;
use chrono::{DateTime, Utc};
use courtside_env::{CourtsideContext, GameId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info};

// ============================================================================
// Configuration
// ============================================================================

/// Tunables for a projector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectorConfig {
    /// Length of the simulated period in seconds
    pub period_length_secs: u32,

    /// Size of the recent-plays window
    pub recent_plays_limit: usize,

    /// Period number reported in every view
    pub period: u8,

    /// Number of players in the game summary's top scorers
    pub top_scorers_limit: usize,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            period_length_secs: 720,
            recent_plays_limit: 5,
            period: 1,
            top_scorers_limit: 3,
        }
    }
}

impl ProjectorConfig {
    /// Sets the period length in seconds.
    pub fn with_period_length(mut self, secs: u32) -> Self {
        self.period_length_secs = secs;
        self
    }

    /// Sets the recent-plays window size.
    pub fn with_recent_plays_limit(mut self, limit: usize) -> Self {
        self.recent_plays_limit = limit;
        self
    }

    /// Sets the reported period number.
    pub fn with_period(mut self, period: u8) -> Self {
        self.period = period;
        self
    }

    /// Sets the number of top scorers in summaries.
    pub fn with_top_scorers_limit(mut self, limit: usize) -> Self {
        self.top_scorers_limit = limit;
        self
    }
}

// ============================================================================
// Output Types
// ============================================================================

/// Whether the simulated period is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Final,
}

impl GameStatus {
    fn from_clock(clock: &GameClockState) -> Self {
        if clock.is_period_over() {
            GameStatus::Final
        } else {
            GameStatus::InProgress
        }
    }
}

/// Minimal team reference used in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: u32,
    pub name: String,
    pub abbreviation: String,
}

impl From<&TeamInfo> for TeamRef {
    fn from(team: &TeamInfo) -> Self {
        Self {
            id: team.team_id,
            name: team.name.clone(),
            abbreviation: team.abbreviation.clone(),
        }
    }
}

/// Home and away team references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    pub home: TeamRef,
    pub away: TeamRef,
}

/// One entry of today's games list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameListing {
    pub game_id: GameId,
    pub league: String,
    pub status: GameStatus,
    pub period: u8,
    /// Remaining time, `MM:SS`
    pub clock: String,
    pub score: Scoreboard,
    pub teams: Matchup,
}

/// Scoreboard-level details for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDetails {
    pub game_id: GameId,
    pub status: GameStatus,
    pub period: u8,
    pub time_remaining_minutes: u32,
    pub time_remaining_seconds: u32,
    pub home_score: u32,
    pub away_score: u32,
    pub home_team: String,
    pub away_team: String,
    pub home_team_id: u32,
    pub away_team_id: u32,
}

/// Per-player lines, in roster order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxScore {
    pub game_id: GameId,
    pub players: Vec<StatLine>,
}

/// Acknowledgement of a timer reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerReset {
    /// The new anchor, serialized as RFC 3339
    pub reset_at: DateTime<Utc>,
}

/// Compact scoreboard for commentary prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreboardView {
    pub home: String,
    pub away: String,
    pub home_score: u32,
    pub away_score: u32,
    pub quarter: u8,
    /// Remaining time, `MM:SS`
    pub clock: String,
}

/// A recent play, with the team shown by abbreviation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentPlay {
    pub clock: String,
    pub team: String,
    pub description: String,
    pub points: u8,
}

/// Live context handed to the commentary layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameContext {
    pub scoreboard: ScoreboardView,
    pub leaders: Leaders,
    pub recent_plays: Vec<RecentPlay>,
}

/// Top performers and the margin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: GameId,
    pub status: GameStatus,
    pub score: Scoreboard,
    pub top_scorers: Vec<StatLine>,
    pub score_difference: u32,
}

/// Every view of the game at one instant, computed from a single anchor read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub clock: GameClockState,
    pub status: GameStatus,
    pub scoreboard: Scoreboard,
    pub box_score: Vec<StatLine>,
    pub play_by_play: Vec<PlayByPlayEntry>,
    pub recent_plays: Vec<PlayEvent>,
}

impl GameSnapshot {
    /// Number of plays that have happened.
    pub fn occurred_count(&self) -> usize {
        self.play_by_play.len()
    }
}

// ============================================================================
// Projector
// ============================================================================

/// Occurred plays and the clock they were filtered at.
struct Frame<'p> {
    clock: GameClockState,
    occurred: Vec<&'p PlayEvent>,
}

/// Projects a scripted game onto the clock of a [`CourtsideContext`].
pub struct MockGameProjector<C: CourtsideContext> {
    ctx: Arc<C>,
    game: GameInfo,
    roster: Roster,
    script: Arc<[PlayEvent]>,
    config: ProjectorConfig,
    clock: ClockProjector,
    timer: TimerControl,
}

impl<C: CourtsideContext> MockGameProjector<C> {
    /// Creates a projector over a compiled script.
    ///
    /// The anchor starts at the context's current time, so the period begins
    /// at construction.
    pub fn new(
        game: GameInfo,
        roster: Roster,
        script: Vec<PlayEvent>,
        ctx: Arc<C>,
        config: ProjectorConfig,
    ) -> Self {
        let anchor = ctx.system_time();
        info!(
            "Projector for {} ({} @ {}): {} plays, {} players, {}s period",
            game.game_id,
            game.away.abbreviation,
            game.home.abbreviation,
            script.len(),
            roster.len(),
            config.period_length_secs
        );

        Self {
            ctx,
            game,
            roster,
            script: script.into(),
            clock: ClockProjector::new(config.period_length_secs, config.period),
            config,
            timer: TimerControl::new(anchor),
        }
    }

    /// Compiles a fixture and builds a projector over it.
    pub fn from_fixture(fixture: &GameFixture, ctx: Arc<C>, config: ProjectorConfig) -> Self {
        let script = fixture.compile();
        Self::new(fixture.game.clone(), fixture.roster(), script, ctx, config)
    }

    /// The simulated game.
    pub fn game(&self) -> &GameInfo {
        &self.game
    }

    /// The roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The compiled script, in authoring order.
    pub fn script(&self) -> &[PlayEvent] {
        &self.script
    }

    /// The projector configuration.
    pub fn config(&self) -> &ProjectorConfig {
        &self.config
    }

    /// The time source.
    pub fn context(&self) -> &Arc<C> {
        &self.ctx
    }

    /// The current anchor.
    pub fn anchor(&self) -> SystemTime {
        self.timer.anchor()
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// The projected clock right now.
    pub fn clock_state(&self) -> GameClockState {
        self.frame().clock
    }

    /// Today's games: always exactly the simulated one.
    pub fn todays_games(&self) -> Vec<GameListing> {
        let frame = self.frame();
        let composer = self.composer();

        vec![GameListing {
            game_id: self.game.game_id.clone(),
            league: self.game.league.clone(),
            status: GameStatus::from_clock(&frame.clock),
            period: frame.clock.period,
            clock: frame.clock.label(),
            score: composer.scoreboard(&frame.occurred),
            teams: Matchup {
                home: TeamRef::from(&self.game.home),
                away: TeamRef::from(&self.game.away),
            },
        }]
    }

    /// Status, clock, and score.
    pub fn game_details(&self, game_id: &GameId) -> GameDetails {
        self.note_game_id(game_id);
        let frame = self.frame();
        let score = self.composer().scoreboard(&frame.occurred);

        GameDetails {
            game_id: self.game.game_id.clone(),
            status: GameStatus::from_clock(&frame.clock),
            period: frame.clock.period,
            time_remaining_minutes: frame.clock.minutes(),
            time_remaining_seconds: frame.clock.seconds(),
            home_score: score.home,
            away_score: score.away,
            home_team: self.game.home.abbreviation.clone(),
            away_team: self.game.away.abbreviation.clone(),
            home_team_id: self.game.home.team_id,
            away_team_id: self.game.away.team_id,
        }
    }

    /// Stat lines for every rostered player.
    pub fn box_score(&self, game_id: &GameId) -> BoxScore {
        self.note_game_id(game_id);
        let frame = self.frame();

        BoxScore {
            game_id: self.game.game_id.clone(),
            players: self.composer().box_score(&frame.occurred),
        }
    }

    /// Every occurred play with the running score.
    pub fn play_by_play(&self, game_id: &GameId) -> Vec<PlayByPlayEntry> {
        self.note_game_id(game_id);
        let frame = self.frame();
        self.composer().play_by_play(&frame.occurred)
    }

    /// The most recent occurred plays, oldest first.
    pub fn recent_plays(&self, game_id: &GameId) -> Vec<PlayEvent> {
        self.note_game_id(game_id);
        let frame = self.frame();
        feed::recent_plays(&frame.occurred, self.config.recent_plays_limit)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Per-team points leaders.
    pub fn leaders(&self, game_id: &GameId) -> Leaders {
        self.note_game_id(game_id);
        let frame = self.frame();
        let composer = self.composer();
        composer.leaders(&composer.box_score(&frame.occurred))
    }

    /// Scoreboard, leaders, and recent plays for commentary.
    pub fn game_context(&self, game_id: &GameId) -> GameContext {
        self.note_game_id(game_id);
        let frame = self.frame();
        let composer = self.composer();
        let score = composer.scoreboard(&frame.occurred);
        let lines = composer.box_score(&frame.occurred);

        let recent_plays = feed::recent_plays(&frame.occurred, self.config.recent_plays_limit)
            .into_iter()
            .map(|event| RecentPlay {
                clock: event.clock_label.clone(),
                team: self.game.team(event.team).abbreviation.clone(),
                description: event.description.clone(),
                points: event.points,
            })
            .collect();

        GameContext {
            scoreboard: ScoreboardView {
                home: self.game.home.abbreviation.clone(),
                away: self.game.away.abbreviation.clone(),
                home_score: score.home,
                away_score: score.away,
                quarter: frame.clock.period,
                clock: frame.clock.label(),
            },
            leaders: composer.leaders(&lines),
            recent_plays,
        }
    }

    /// Top scorers and the margin.
    pub fn game_summary(&self, game_id: &GameId) -> GameSummary {
        self.note_game_id(game_id);
        let frame = self.frame();
        let composer = self.composer();
        let score = composer.scoreboard(&frame.occurred);
        let lines = composer.box_score(&frame.occurred);

        GameSummary {
            game_id: self.game.game_id.clone(),
            status: GameStatus::from_clock(&frame.clock),
            score,
            top_scorers: feed::top_scorers(&lines, self.config.top_scorers_limit),
            score_difference: score.difference(),
        }
    }

    /// Triple-double progress for one player, `None` if not on the roster.
    pub fn triple_double_progress(
        &self,
        game_id: &GameId,
        player_id: u32,
    ) -> Option<TripleDoubleProgress> {
        self.note_game_id(game_id);
        let frame = self.frame();
        let composer = self.composer();
        let lines = composer.box_score(&frame.occurred);
        composer.triple_double_progress(&lines, player_id)
    }

    /// All views at once, from one anchor read.
    pub fn snapshot(&self) -> GameSnapshot {
        let frame = self.frame();
        let composer = self.composer();

        GameSnapshot {
            clock: frame.clock,
            status: GameStatus::from_clock(&frame.clock),
            scoreboard: composer.scoreboard(&frame.occurred),
            box_score: composer.box_score(&frame.occurred),
            play_by_play: composer.play_by_play(&frame.occurred),
            recent_plays: feed::recent_plays(&frame.occurred, self.config.recent_plays_limit)
                .into_iter()
                .cloned()
                .collect(),
        }
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    /// Restarts the period at the context's current time.
    pub fn reset_timer(&self) -> TimerReset {
        let now = self.ctx.system_time();
        let anchor = self.timer.reset(now);
        TimerReset {
            reset_at: DateTime::<Utc>::from(anchor),
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn frame(&self) -> Frame<'_> {
        let anchor = self.timer.anchor();
        let now = self.ctx.system_time();
        let clock = self.clock.project(anchor, now);
        let occurred = EventFilter::occurred(&self.script, clock.remaining_seconds);

        debug!(
            "Frame at {} remaining: {} of {} plays occurred",
            clock.label(),
            occurred.len(),
            self.script.len()
        );

        Frame { clock, occurred }
    }

    fn composer(&self) -> FeedComposer<'_> {
        FeedComposer::new(&self.game, &self.roster, self.config.period)
    }

    fn note_game_id(&self, game_id: &GameId) {
        if *game_id != self.game.game_id {
            debug!(
                "Requested game {} is served by the simulated game {}",
                game_id, self.game.game_id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::BUILTIN_GAME_ID;
    use crate::roster::TeamSide;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::sync::Mutex;
    use std::time::Duration;

    /// A clock that only moves when told to.
    struct ManualClock {
        now: Mutex<SystemTime>,
    }

    impl ManualClock {
        fn at(secs: u64) -> Arc<Self> {
            Arc::new(Self {
                now: Mutex::new(SystemTime::UNIX_EPOCH + Duration::from_secs(secs)),
            })
        }

        fn advance(&self, by: Duration) {
            *self.now.lock().unwrap() += by;
        }
    }

    #[async_trait]
    impl CourtsideContext for ManualClock {
        fn now(&self) -> Duration {
            self.system_time()
                .duration_since(SystemTime::UNIX_EPOCH)
                .unwrap_or_default()
        }

        fn system_time(&self) -> SystemTime {
            *self.now.lock().unwrap()
        }

        async fn sleep(&self, duration: Duration) {
            self.advance(duration);
        }
    }

    const EPOCH: u64 = 1_744_584_000;

    fn projector() -> (Arc<ManualClock>, MockGameProjector<ManualClock>) {
        let clock = ManualClock::at(EPOCH);
        let projector = MockGameProjector::from_fixture(
            &GameFixture::lal_at_por(),
            Arc::clone(&clock),
            ProjectorConfig::default(),
        );
        (clock, projector)
    }

    fn gid() -> GameId {
        GameId::new(BUILTIN_GAME_ID)
    }

    #[test]
    fn test_first_three_lands_at_640() {
        let (clock, projector) = projector();

        let details = projector.game_details(&gid());
        assert_eq!((details.time_remaining_minutes, details.time_remaining_seconds), (12, 0));
        assert_eq!((details.home_score, details.away_score), (0, 0));
        assert_eq!(projector.play_by_play(&gid()).len(), 1);

        clock.advance(Duration::from_millis(81_500));

        let details = projector.game_details(&gid());
        assert_eq!((details.time_remaining_minutes, details.time_remaining_seconds), (10, 39));
        assert_eq!((details.home_score, details.away_score), (3, 0));
        assert_eq!(details.status, GameStatus::InProgress);

        let camara = projector
            .box_score(&gid())
            .players
            .into_iter()
            .find(|l| l.name == "Toumani Camara")
            .unwrap();
        assert_eq!(camara.points, 3);
    }

    #[test]
    fn test_todays_games_single_listing() {
        let (clock, projector) = projector();
        clock.advance(Duration::from_secs(120));

        let games = projector.todays_games();
        assert_eq!(games.len(), 1);
        let game = &games[0];
        assert_eq!(game.game_id.as_str(), BUILTIN_GAME_ID);
        assert_eq!(game.league, "NBA");
        assert_eq!(game.clock, "10:00");
        assert_eq!(game.score, Scoreboard { home: 5, away: 0 });
        assert_eq!(game.teams.home.abbreviation, "POR");
        assert_eq!(game.teams.away.id, 1610612747);
    }

    #[test]
    fn test_final_after_period_and_clamped() {
        let (clock, projector) = projector();
        clock.advance(Duration::from_secs(10_000));

        let details = projector.game_details(&gid());
        assert_eq!(details.status, GameStatus::Final);
        assert_eq!((details.time_remaining_minutes, details.time_remaining_seconds), (0, 0));
        assert_eq!((details.home_score, details.away_score), (30, 19));
        assert_eq!(projector.play_by_play(&gid()).len(), 75);

        let summary = projector.game_summary(&gid());
        assert_eq!(summary.score_difference, 11);
        assert_eq!(summary.top_scorers.len(), 3);
        assert_eq!(summary.top_scorers[0].name, "Dalton Knecht");
    }

    #[test]
    fn test_reset_restarts_period() {
        let (clock, projector) = projector();
        // 06:40 left
        clock.advance(Duration::from_secs(320));
        assert_eq!(projector.snapshot().scoreboard, Scoreboard { home: 14, away: 6 });

        let reset = projector.reset_timer();
        assert_eq!(reset.reset_at.timestamp(), (EPOCH + 320) as i64);

        let snapshot = projector.snapshot();
        assert_eq!(snapshot.clock.remaining_seconds, 720);
        assert_eq!(snapshot.clock.elapsed_seconds, 0);
        assert_eq!(snapshot.scoreboard, Scoreboard::default());
        assert!(snapshot.box_score.iter().all(|l| l.counts() == [0; 6]));
        // Ties occur, so the pointless marker authored at 12:00 is already
        // in the feed; nothing later is
        assert_eq!(snapshot.occurred_count(), 1);
        let feed = projector.play_by_play(&gid());
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].description, "Q1 start");
        assert_eq!(feed[0].points, 0);
    }

    #[test]
    fn test_config_and_anchor_accessors() {
        let clock = ManualClock::at(EPOCH);
        let config = ProjectorConfig::default()
            .with_period(2)
            .with_top_scorers_limit(1);
        let projector =
            MockGameProjector::from_fixture(&GameFixture::lal_at_por(), Arc::clone(&clock), config);

        assert_eq!(projector.config(), &config);
        assert_eq!(projector.anchor(), SystemTime::UNIX_EPOCH + Duration::from_secs(EPOCH));

        clock.advance(Duration::from_secs(720));
        assert_eq!(projector.context().system_time(), clock.system_time());
        assert_eq!(projector.game_details(&gid()).period, 2);
        assert_eq!(projector.game_context(&gid()).scoreboard.quarter, 2);
        assert!(projector.play_by_play(&gid()).iter().all(|e| e.period == 2));

        let summary = projector.game_summary(&gid());
        assert_eq!(summary.top_scorers.len(), 1);
        assert_eq!(summary.top_scorers[0].name, "Dalton Knecht");

        projector.reset_timer();
        assert_eq!(
            projector.anchor(),
            SystemTime::UNIX_EPOCH + Duration::from_secs(EPOCH + 720)
        );
    }

    #[test]
    fn test_reset_is_idempotent_at_same_instant() {
        let (clock, projector) = projector();
        clock.advance(Duration::from_secs(200));

        let first = projector.reset_timer();
        let after_first = serde_json::to_string(&projector.snapshot()).unwrap();
        let second = projector.reset_timer();
        let after_second = serde_json::to_string(&projector.snapshot()).unwrap();

        assert_eq!(first, second);
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_reset_serializes_rfc3339() {
        let (_clock, projector) = projector();
        let json = serde_json::to_value(projector.reset_timer()).unwrap();
        assert_eq!(json["reset_at"], "2025-04-13T22:40:00Z");
    }

    #[test]
    fn test_queries_are_deterministic() {
        let (clock_a, a) = projector();
        let (clock_b, b) = projector();
        clock_a.advance(Duration::from_secs(333));
        clock_b.advance(Duration::from_secs(333));

        assert_eq!(
            serde_json::to_string(&a.snapshot()).unwrap(),
            serde_json::to_string(&b.snapshot()).unwrap()
        );
        assert_eq!(
            serde_json::to_string(&a.game_context(&gid())).unwrap(),
            serde_json::to_string(&b.game_context(&gid())).unwrap()
        );
    }

    #[test]
    fn test_unknown_game_id_serves_simulated_game() {
        let (_clock, projector) = projector();
        let box_score = projector.box_score(&GameId::new("some_other_game"));
        assert_eq!(box_score.game_id.as_str(), BUILTIN_GAME_ID);
        assert_eq!(box_score.players.len(), 15);
    }

    #[test]
    fn test_game_context_view() {
        let (clock, projector) = projector();
        clock.advance(Duration::from_secs(360));

        let context = projector.game_context(&gid());
        assert_eq!(context.scoreboard.home, "POR");
        assert_eq!(context.scoreboard.away, "LAL");
        assert_eq!((context.scoreboard.home_score, context.scoreboard.away_score), (14, 10));
        assert_eq!(context.scoreboard.clock, "06:00");
        assert_eq!(context.scoreboard.quarter, 1);
        assert_eq!(context.recent_plays.len(), 5);

        let last = context.recent_plays.last().unwrap();
        assert_eq!(last.clock, "06:05");
        assert_eq!(last.team, "LAL");
        assert_eq!(last.points, 2);

        assert_eq!(context.leaders.home.unwrap().name, "Dalano Banton");
    }

    #[test]
    fn test_recent_plays_window_config() {
        let clock = ManualClock::at(EPOCH);
        let projector = MockGameProjector::from_fixture(
            &GameFixture::lal_at_por(),
            Arc::clone(&clock),
            ProjectorConfig::default().with_recent_plays_limit(3),
        );

        assert_eq!(projector.recent_plays(&gid()).len(), 1);
        clock.advance(Duration::from_secs(120));

        let ids: Vec<u32> = projector
            .recent_plays(&gid())
            .iter()
            .map(|e| e.sequence_id)
            .collect();
        assert_eq!(ids, vec![13, 14, 15]);
    }

    #[test]
    fn test_triple_double_progress_query() {
        let (clock, projector) = projector();
        clock.advance(Duration::from_secs(720));

        let progress = projector.triple_double_progress(&gid(), 7).unwrap();
        assert_eq!(progress.current.rebounds, 4);
        assert!(projector.triple_double_progress(&gid(), 42).is_none());
    }

    #[test]
    fn test_shorter_period_uses_same_script() {
        let clock = ManualClock::at(EPOCH);
        let projector = MockGameProjector::from_fixture(
            &GameFixture::lal_at_por(),
            Arc::clone(&clock),
            ProjectorConfig::default().with_period_length(300),
        );

        // A 5 minute period starts with everything at or after 05:00 done
        let snapshot = projector.snapshot();
        assert_eq!(snapshot.clock.label(), "05:00");
        assert_eq!(snapshot.scoreboard, Scoreboard { home: 17, away: 10 });
    }

    #[test]
    fn test_concurrent_readers_and_reset() {
        let (clock, projector) = projector();
        clock.advance(Duration::from_secs(500));
        let projector = Arc::new(projector);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let projector = Arc::clone(&projector);
                scope.spawn(move || {
                    for _ in 0..50 {
                        let snapshot = projector.snapshot();
                        let last = snapshot.play_by_play.last().unwrap();
                        assert_eq!(
                            (last.home_score, last.away_score),
                            (snapshot.scoreboard.home, snapshot.scoreboard.away)
                        );
                        let home: u32 = snapshot
                            .box_score
                            .iter()
                            .filter(|l| l.team == TeamSide::Home)
                            .map(|l| l.points)
                            .sum();
                        assert_eq!(home, snapshot.scoreboard.home);
                    }
                });
            }
            scope.spawn(|| {
                for _ in 0..10 {
                    projector.reset_timer();
                    clock.advance(Duration::from_secs(37));
                }
            });
        });
    }

    proptest! {
        #[test]
        fn prop_views_monotonic_and_consistent(steps in proptest::collection::vec(0u64..90, 1..25)) {
            let (clock, projector) = projector();
            let mut previous = projector.snapshot();

            for step in steps {
                clock.advance(Duration::from_secs(step));
                let snapshot = projector.snapshot();

                prop_assert!(snapshot.clock.remaining_seconds <= previous.clock.remaining_seconds);
                prop_assert!(snapshot.occurred_count() >= previous.occurred_count());
                prop_assert!(snapshot.scoreboard.home >= previous.scoreboard.home);
                prop_assert!(snapshot.scoreboard.away >= previous.scoreboard.away);

                // No player's line ever goes down
                for (now, before) in snapshot.box_score.iter().zip(&previous.box_score) {
                    prop_assert_eq!(now.player_id, before.player_id);
                    let (now, before) = (now.counts(), before.counts());
                    prop_assert!(now.iter().zip(&before).all(|(n, b)| n >= b), "{:?} < {:?}", now, before);
                }

                // Earlier feed is a prefix of the later one
                prop_assert_eq!(
                    &snapshot.play_by_play[..previous.occurred_count()],
                    &previous.play_by_play[..]
                );

                // Window is the tail of the feed
                let n = snapshot.recent_plays.len();
                prop_assert!(n <= 5);
                prop_assert_eq!(n, snapshot.occurred_count().min(5));
                let tail = &snapshot.play_by_play[snapshot.occurred_count() - n..];
                for (play, entry) in snapshot.recent_plays.iter().zip(tail) {
                    prop_assert_eq!(play.sequence_id, entry.sequence_id);
                }

                let away: u32 = snapshot
                    .box_score
                    .iter()
                    .filter(|l| l.team == TeamSide::Away)
                    .map(|l| l.points)
                    .sum();
                prop_assert_eq!(away, snapshot.scoreboard.away);

                previous = snapshot;
            }
        }
    }
}
