//! The authoritative soccer simulation.
//!
//! One [`GameEngine`] lives for a whole session. The host feeds it one tick per
//! camera frame (or per timer tick) and reads back the ball, turn and countdown
//! for drawing. Notifications queue up in [`Events`] and are drained by the host
//! after each call, so nothing can call back into the engine mid-update.

use glam::Vec2;
use hecs::World;
use std::time::Duration;
use tracing::{debug, info};

use crate::associator::closest_candidate;
use crate::motion::{round_down_2, MotionHistory};
use crate::systems::{self, EdgeStatus, Flight, WallContact};
use crate::{
    ball_state, create_ball, with_ball, Ball, Config, ConfigError, Events, Field, GameEvent,
    GameRng, Goal, ModifierId, ModifierKind, Roi, RoiMode, Score, Turn,
};

/// Coarse state of the game, for hosts that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Tracking,
    Passing,
    Bouncing,
    /// Players are handing over the controls; the ball is frozen.
    Swapping,
    GameOver,
}

/// Fastest speed seen per player.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct MaxSpeeds {
    red: f32,
    blue: f32,
}

impl MaxSpeeds {
    fn get(&self, turn: Turn) -> f32 {
        match turn {
            Turn::Red => self.red,
            Turn::Blue => self.blue,
        }
    }

    fn observe(&mut self, turn: Turn, speed: f32) {
        let slot = match turn {
            Turn::Red => &mut self.red,
            Turn::Blue => &mut self.blue,
        };
        if speed > *slot {
            *slot = speed;
        }
    }
}

pub struct GameEngine {
    world: World,
    field: Field,
    config: Config,
    score: Score,
    events: Events,
    rng: GameRng,
    motion: MotionHistory,
    flight: Flight,
    walls: WallContact,
    turn: Turn,
    turn_count: u32,
    time_left: Duration,
    swap_left: Option<Duration>,
    countdown_paused: bool,
    game_over: bool,
    moving: bool,
    last_points: u32,
    max_speeds: MaxSpeeds,
    pass_distance: f32,
    next_modifier_id: u64,
}

impl GameEngine {
    /// Build an engine for a camera frame of `field` size.
    pub fn new(field: Field, config: Config) -> Result<Self, ConfigError> {
        config.validate(&field)?;

        let mut world = World::new();
        create_ball(&mut world, field.center(), config.ball_radius);
        systems::layout_goals(&mut world, &field, &config);

        let engine = Self {
            world,
            field,
            rng: GameRng::new(config.rng_seed),
            score: Score::new(),
            events: Events::new(),
            motion: MotionHistory::new(),
            flight: Flight::Tracking,
            walls: WallContact::default(),
            turn: Turn::Red,
            turn_count: 0,
            time_left: config.turn_duration(),
            swap_left: None,
            countdown_paused: false,
            game_over: false,
            moving: false,
            last_points: 0,
            max_speeds: MaxSpeeds::default(),
            pass_distance: config.pass_distance,
            next_modifier_id: 1,
            config,
        };

        info!(
            width = field.width,
            height = field.height,
            "soccer game created"
        );
        Ok(engine)
    }

    /// Start a new game on the same field.
    ///
    /// Clears score, turn counter, flight, swap pause, smoothing history and any
    /// pending modifier reversals. The countdown pause flag is left alone since it
    /// belongs to the host.
    pub fn reset(&mut self) {
        systems::clear_reversals(&mut self.world);
        let field = self.field;
        let radius = self.config.ball_radius;
        with_ball(&mut self.world, |ball| {
            ball.reset(&field);
            ball.radius = radius;
        });
        systems::layout_goals(&mut self.world, &self.field, &self.config);

        self.score = Score::new();
        self.motion.clear();
        self.flight = Flight::Tracking;
        self.walls.clear();
        self.turn = Turn::Red;
        self.turn_count = 0;
        self.time_left = self.config.turn_duration();
        self.swap_left = None;
        self.game_over = false;
        self.moving = false;
        self.last_points = 0;
        self.max_speeds = MaxSpeeds::default();
        self.pass_distance = self.config.pass_distance;

        info!("game reset");
    }

    /// Full per-frame driver.
    ///
    /// During a pass or bounce the ball moves on its own and `candidates` are
    /// ignored. Otherwise the candidate nearest the ball carries it, unless the
    /// players are swapping, in which case only the swap countdown runs.
    pub fn step(&mut self, candidates: &[Vec2], dt: Duration) {
        if self.game_over {
            return;
        }
        if self.flight.is_active() {
            self.advance_flight(dt);
            return;
        }

        let anchor = self.ball_location();
        let carrier = closest_candidate(anchor, candidates);
        self.update_ball_location(carrier, dt);
    }

    /// Feed one tick of tracking.
    ///
    /// `None` means nothing was detected: the ball stays put, the countdown
    /// still runs and the direction history is dropped. While swapping the
    /// candidate is ignored and only the swap countdown runs.
    pub fn update_ball_location(&mut self, candidate: Option<Vec2>, dt: Duration) {
        if self.game_over {
            return;
        }
        self.tick_modifiers(dt);

        if self.swap_left.is_some() {
            self.advance_swap(dt);
            return;
        }

        let Some(pos) = candidate else {
            self.advance_countdown(dt);
            if !self.game_over {
                self.reset_motion();
            }
            return;
        };

        with_ball(&mut self.world, |ball| ball.pos = pos);

        let in_flight = self.flight.is_active();
        if let Some(points) = systems::check_goal(
            &self.world,
            self.turn,
            in_flight,
            &self.config,
            &mut self.score,
            &mut self.events,
        ) {
            self.on_goal(points);
            return;
        }

        let EdgeStatus {
            out_of_bounds,
            in_bounce_band,
        } = systems::edge_status(pos, &self.field, &self.config);

        if in_flight && in_bounce_band {
            self.bounce_in_flight(pos);
        } else if !in_flight && out_of_bounds {
            info!(turn = ?self.turn, x = pos.x, y = pos.y, "ball out of bounds");
            self.events.push(GameEvent::OutOfBounds { turn: self.turn });
            self.reset_ball();
            self.change_turn();
            return;
        } else if !in_bounce_band {
            self.walls.clear();
        }

        if !in_flight {
            self.track_motion(pos);
        }

        self.advance_countdown(dt);
    }

    /// Advance the clocks without a detection, for timer-driven hosts.
    pub fn update_time(&mut self, dt: Duration) {
        if self.game_over {
            return;
        }
        self.tick_modifiers(dt);

        if self.swap_left.is_some() {
            self.advance_swap(dt);
        } else {
            self.advance_countdown(dt);
        }
    }

    /// Move an in-flight ball one tick. No-op while tracking.
    pub fn advance_flight(&mut self, dt: Duration) {
        if self.game_over || !self.flight.is_active() {
            return;
        }

        if self.time_left.is_zero() {
            self.change_turn();
            return;
        }

        let ball = self.ball();
        let direction = if self.flight.is_bouncing() {
            ball.bounce_direction
        } else {
            ball.direction
        };

        match systems::advance_flight(
            &mut self.flight,
            ball.pos,
            direction,
            self.pass_distance,
            dt,
            &self.config,
        ) {
            Some(next) => self.update_ball_location(Some(next), dt),
            None => {
                debug!(flight = ?self.flight, "flight finished");
                self.flight = Flight::Tracking;
                // Forget the pass direction so the same pass can't be repeated.
                self.reset_motion();
                self.update_time(dt);
            }
        }
    }

    /// Launch the ball along its smoothed direction. Returns false if it can't be passed now.
    pub fn pass_ball(&mut self) -> bool {
        if !matches!(self.phase(), Phase::Tracking) {
            return false;
        }

        self.motion.zero_speed();
        self.set_moving(false);
        self.flight = Flight::pass();
        debug!(direction = ?self.ball().direction, "pass started");
        true
    }

    /// Knock the ball off in a random direction. Returns false if it can't be bounced now.
    pub fn bounce_ball(&mut self) -> bool {
        if !matches!(self.phase(), Phase::Tracking) {
            return false;
        }

        let direction = self.rng.unit_vector();
        with_ball(&mut self.world, |ball| ball.bounce_direction = direction);
        self.motion.zero_speed();
        self.set_moving(false);
        self.flight = Flight::bounce();
        debug!(?direction, "bounce started");
        true
    }

    /// The current player picked the ball up by hand. Costs a penalty.
    pub fn pickup_penalty(&mut self) -> u32 {
        if self.game_over {
            return 0;
        }

        let points = self.score.deduct(self.turn, self.config.pickup_penalty);
        self.events.push(GameEvent::PickupPenalty {
            turn: self.turn,
            points,
        });
        info!(turn = ?self.turn, points, "pickup penalty");
        points
    }

    pub fn pause_countdown(&mut self) {
        self.countdown_paused = true;
    }

    pub fn resume_countdown(&mut self) {
        self.countdown_paused = false;
    }

    pub fn add_time_to_turn(&mut self, extra: Duration) {
        self.time_left += extra;
    }

    /// Apply a power-up or handicap.
    ///
    /// Timed kinds return a handle; their effect is reverted when the duration
    /// runs out, on [`cancel_modifier`](Self::cancel_modifier), or on reset.
    pub fn apply_modifier(&mut self, kind: ModifierKind) -> Option<ModifierId> {
        if self.game_over {
            return None;
        }

        match kind {
            ModifierKind::ExtraTime(extra) => {
                self.add_time_to_turn(extra);
                debug!(?extra, "extra time added");
                None
            }
            timed => {
                let id = ModifierId(self.next_modifier_id);
                self.next_modifier_id += 1;
                let duration = timed.duration().unwrap_or_default();
                systems::schedule_reversal(&mut self.world, id, timed, duration);
                self.refresh_modifier_effects();
                debug!(?id, kind = ?timed, "modifier applied");
                Some(id)
            }
        }
    }

    /// Revert a timed modifier early. Returns false if it already expired.
    pub fn cancel_modifier(&mut self, id: ModifierId) -> bool {
        let cancelled = systems::cancel_reversal(&mut self.world, id);
        if cancelled {
            self.refresh_modifier_effects();
        }
        cancelled
    }

    /// Detection window around the ball for the next frame.
    pub fn region_of_interest(&self, mode: RoiMode) -> Roi {
        let ball = self.ball();
        let half = match mode {
            RoiMode::Tracking => ball.radius,
            RoiMode::Wide => ball.radius * 2.0,
        };
        self.field.roi_around(ball.pos, half)
    }

    /// True when the next `step` will consume detections.
    pub fn needs_detection(&self) -> bool {
        self.phase() == Phase::Tracking
    }

    pub fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else if self.swap_left.is_some() {
            Phase::Swapping
        } else {
            match self.flight {
                Flight::Tracking => Phase::Tracking,
                Flight::Passing { .. } => Phase::Passing,
                Flight::Bouncing { .. } => Phase::Bouncing,
            }
        }
    }

    pub fn ball_location(&self) -> Vec2 {
        self.ball().pos
    }

    pub fn ball_radius(&self) -> f32 {
        self.ball().radius
    }

    /// Smoothed travel direction, or the pass direction while passing. Zero if unknown.
    pub fn passing_direction(&self) -> Vec2 {
        self.ball().direction
    }

    pub fn bouncing_direction(&self) -> Vec2 {
        self.ball().bounce_direction
    }

    pub fn has_passing_direction(&self) -> bool {
        self.ball().direction != Vec2::ZERO
    }

    pub fn is_passing(&self) -> bool {
        self.flight.is_passing()
    }

    pub fn is_bouncing(&self) -> bool {
        self.flight.is_bouncing()
    }

    pub fn current_turn(&self) -> Turn {
        self.turn
    }

    /// Turns completed so far.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn turn_limit_exceeded(&self) -> bool {
        self.turn_count > self.config.turns_per_game
    }

    pub fn time_left_in_turn(&self) -> Duration {
        self.time_left
    }

    pub fn swap_time_left(&self) -> Option<Duration> {
        self.swap_left
    }

    pub fn is_swapping(&self) -> bool {
        self.swap_left.is_some()
    }

    pub fn is_countdown_paused(&self) -> bool {
        self.countdown_paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Points awarded by the most recent goal.
    pub fn points_scored(&self) -> u32 {
        self.last_points
    }

    /// Current speed estimate, truncated to two decimals for display.
    pub fn speed(&self) -> f32 {
        round_down_2(self.motion.speed())
    }

    pub fn max_speed(&self, turn: Turn) -> f32 {
        self.max_speeds.get(turn)
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn goal(&self, owner: Turn) -> Option<Goal> {
        systems::goal_of(&self.world, owner)
    }

    pub fn pass_distance(&self) -> f32 {
        self.pass_distance
    }

    pub fn active_modifiers(&self) -> Vec<ModifierId> {
        systems::active_modifiers(&self.world)
            .into_iter()
            .map(|r| r.id)
            .collect()
    }

    pub fn events(&self) -> &[GameEvent] {
        self.events.as_slice()
    }

    /// Take every notification raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    fn ball(&self) -> Ball {
        ball_state(&self.world)
            .unwrap_or_else(|| Ball::new(self.field.center(), self.config.ball_radius))
    }

    fn on_goal(&mut self, points: u32) {
        self.last_points = points;
        info!(turn = ?self.turn, points, score = ?self.score, "goal scored");
        self.reset_ball();

        let winner = self
            .config
            .winning_score
            .and_then(|win| self.score.has_winner(win));
        if let Some(winner) = winner {
            info!(?winner, "winning score reached");
            self.end_game();
        } else if self.config.goal_changes_turn {
            self.change_turn();
        }
    }

    fn bounce_in_flight(&mut self, pos: Vec2) {
        let bouncing = self.flight.is_bouncing();
        let (field, config) = (self.field, &self.config);
        let walls = &mut self.walls;
        let flipped = with_ball(&mut self.world, |ball| {
            let direction = if bouncing {
                &mut ball.bounce_direction
            } else {
                &mut ball.direction
            };
            systems::bounce_off_walls(pos, direction, walls, &field, config)
        })
        .unwrap_or(false);

        if flipped {
            debug!(x = pos.x, y = pos.y, "ball bounced off wall");
        }
    }

    fn track_motion(&mut self, pos: Vec2) {
        let sample = self.motion.record(pos, &self.config);
        if let Some(direction) = sample.direction {
            with_ball(&mut self.world, |ball| ball.direction = direction);
        }

        let speed = self.motion.speed();
        self.set_moving(speed > 0.0);
        self.max_speeds.observe(self.turn, speed);
    }

    fn set_moving(&mut self, moving: bool) {
        if moving == self.moving {
            return;
        }
        self.moving = moving;
        self.events.push(if moving {
            GameEvent::VelocityNonZero
        } else {
            GameEvent::VelocityZero
        });
    }

    /// Drop direction and speed history, as after a stall or a finished pass.
    fn reset_motion(&mut self) {
        self.motion.clear();
        with_ball(&mut self.world, |ball| ball.direction = Vec2::ZERO);
        self.set_moving(false);
    }

    fn reset_ball(&mut self) {
        let field = self.field;
        with_ball(&mut self.world, |ball| ball.reset(&field));
        self.flight = Flight::Tracking;
        self.walls.clear();
        self.motion.clear();
        self.set_moving(false);
    }

    fn advance_countdown(&mut self, dt: Duration) {
        if !self.countdown_paused {
            self.time_left = self.time_left.saturating_sub(dt);
        }
        if self.time_left.is_zero() {
            self.change_turn();
        }
    }

    fn advance_swap(&mut self, dt: Duration) {
        let Some(left) = self.swap_left else {
            return;
        };
        let left = if self.countdown_paused {
            left
        } else {
            left.saturating_sub(dt)
        };

        if left.is_zero() {
            self.swap_left = None;
            self.events.push(GameEvent::SwapFinished { turn: self.turn });
            debug!(turn = ?self.turn, "swap finished");
        } else {
            self.swap_left = Some(left);
        }
    }

    fn change_turn(&mut self) {
        self.turn_count += 1;
        if self.turn_count > self.config.turns_per_game {
            self.end_game();
            return;
        }

        self.flight = Flight::Tracking;
        self.reset_motion();
        with_ball(&mut self.world, |ball| ball.bounce_direction = Vec2::ZERO);
        self.walls.clear();

        self.turn = self.turn.opponent();
        self.time_left = self.config.turn_duration();
        let swap = self.config.swap_duration();
        self.swap_left = (!swap.is_zero()).then_some(swap);

        self.events.push(GameEvent::TurnChanged { turn: self.turn });
        info!(turn = ?self.turn, turn_count = self.turn_count, "turn changed");
    }

    fn end_game(&mut self) {
        self.game_over = true;
        self.flight = Flight::Tracking;
        self.swap_left = None;
        self.events.push(GameEvent::GameOver { score: self.score });
        info!(score = ?self.score, winner = ?self.score.leader(), "game over");
    }

    fn tick_modifiers(&mut self, dt: Duration) {
        let due = systems::tick_reversals(&mut self.world, dt);
        if due.is_empty() {
            return;
        }

        self.refresh_modifier_effects();
        for reversal in due {
            debug!(id = ?reversal.id, kind = ?reversal.kind, "modifier expired");
            self.events.push(GameEvent::ModifierExpired {
                id: reversal.id,
                kind: reversal.kind,
            });
        }
    }

    /// Recompute modifier-driven values from defaults plus whatever is still active.
    fn refresh_modifier_effects(&mut self) {
        let mut radius = self.config.ball_radius;
        let mut pass_distance = self.config.pass_distance;

        for active in systems::active_modifiers(&self.world) {
            match active.kind {
                ModifierKind::BallRadius { radius: r, .. } => radius = r,
                ModifierKind::PassDistance { distance, .. } => pass_distance = distance,
                ModifierKind::ExtraTime(_) => {}
            }
        }

        with_ball(&mut self.world, |ball| ball.radius = radius);
        self.pass_distance = pass_distance;
    }
}
