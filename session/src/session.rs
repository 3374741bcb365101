use glam::Vec2;
use proto::{DetectionFrame, Notification, Recording, StateFrame, S2U};
use soccer_core::{Config, Field, GameEngine, GameEvent, Phase, RoiMode, Turn};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::{BlobDetector, SessionError};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    /// Tracking runs but the turn countdown is held until `start`
    Waiting,
    Playing,
    GameOver,
}

// Abstract time source for frame deltas
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock, counted from creation.
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// Clock advanced by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

// Abstract connection to the UI thread
pub trait UiSink {
    fn send_bytes(&self, bytes: &[u8]) -> Result<(), SessionError>;
}

pub struct Session<D, C> {
    engine: GameEngine,
    detector: D,
    clock: C,
    sinks: Vec<Box<dyn UiSink>>,
    match_state: MatchState,
    tick: u32,
    last_frame_ms: Option<u64>,
    tracking: bool,
    wide_scan: bool,
    pending: DetectionFrame,
    recording: Option<Recording>,
}

impl<D: BlobDetector, C: Clock> Session<D, C> {
    /// Create the session for the first camera frame's size.
    pub fn new(
        width: u32,
        height: u32,
        config: Config,
        detector: D,
        clock: C,
    ) -> Result<Self, SessionError> {
        if width == 0 || height == 0 {
            return Err(SessionError::EmptyField { width, height });
        }

        let mut engine = GameEngine::new(Field::new(width, height), config)?;
        engine.pause_countdown();
        info!(width, height, "session created");

        Ok(Self {
            engine,
            detector,
            clock,
            sinks: Vec::new(),
            match_state: MatchState::Waiting,
            tick: 0,
            last_frame_ms: None,
            tracking: true,
            wide_scan: false,
            pending: DetectionFrame::default(),
            recording: None,
        })
    }

    pub fn add_sink(&mut self, sink: Box<dyn UiSink>) {
        self.sinks.push(sink);
    }

    /// Release the turn countdown.
    pub fn start(&mut self) {
        if self.match_state != MatchState::Waiting {
            return;
        }
        info!("match started");
        self.pending.start = true;
        self.match_state = MatchState::Playing;
        self.engine.resume_countdown();
    }

    /// Start over on the same field; waits for `start` again.
    pub fn new_game(&mut self) {
        info!("new game");
        self.engine.reset();
        self.engine.pause_countdown();
        self.match_state = MatchState::Waiting;
        self.tick = 0;
        self.wide_scan = false;
        self.pending = DetectionFrame {
            new_game: true,
            tracking: self.pending.tracking,
            ..Default::default()
        };
    }

    /// Run one camera frame through the detector and the engine.
    pub fn process_frame(&mut self) -> Result<(), SessionError> {
        let now = self.clock.now_ms();
        let dt_ms = self
            .last_frame_ms
            .map_or(0, |last| now.saturating_sub(last));
        self.last_frame_ms = Some(now);

        let candidates = self.detect();
        let before = self.engine.ball_location();

        if let Some(recording) = self.recording.as_mut() {
            let mut frame = std::mem::take(&mut self.pending);
            frame.dt_ms = dt_ms;
            frame.candidates = candidates.iter().map(|p| [p.x, p.y]).collect();
            recording.frames.push(frame);
        } else {
            self.pending = DetectionFrame::default();
        }

        self.engine.step(&candidates, Duration::from_millis(dt_ms));
        self.tick = self.tick.wrapping_add(1);

        // Re-acquire with a wider window when the ball stopped following anything.
        self.wide_scan = self.engine.ball_location() == before;

        if self.engine.is_game_over() && self.match_state != MatchState::GameOver {
            self.engine.pause_countdown();
            self.match_state = MatchState::GameOver;
            info!(score = ?self.engine.score(), "match over");
        }

        for event in self.engine.drain_events() {
            self.broadcast(&S2U::Notify(notification(&event)))?;
        }
        self.broadcast(&S2U::State(state_frame(&self.engine, self.tick)))
    }

    /// Player lifted the organism out of the game. Costs a penalty and widens the next scan.
    pub fn pickup_pressed(&mut self) -> u32 {
        self.pending.pickup = true;
        self.wide_scan = true;
        self.engine.pickup_penalty()
    }

    pub fn pass_pressed(&mut self) -> bool {
        self.pending.pass = true;
        self.engine.pass_ball()
    }

    pub fn bounce_pressed(&mut self) -> bool {
        self.pending.bounce = true;
        self.engine.bounce_ball()
    }

    /// With tracking off every frame counts as having no detections.
    pub fn set_tracking(&mut self, tracking: bool) {
        debug!(tracking, "tracking toggled");
        self.pending.tracking = Some(tracking);
        self.tracking = tracking;
    }

    /// Capture every following frame and button press.
    ///
    /// A match already running is recorded as started on the first frame.
    pub fn start_recording(&mut self) {
        let field = self.engine.field();
        self.recording = Some(Recording::new(field.width, field.height));
        if self.match_state == MatchState::Playing {
            self.pending.start = true;
        }
        if !self.tracking {
            self.pending.tracking = Some(false);
        }
    }

    pub fn take_recording(&mut self) -> Option<Recording> {
        self.recording.take()
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    pub fn match_state(&self) -> MatchState {
        self.match_state
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn is_wide_scan(&self) -> bool {
        self.wide_scan
    }

    /// Broadcast a message to every sink. A failing sink is skipped.
    pub fn broadcast(&self, msg: &S2U) -> Result<(), SessionError> {
        let bytes = msg.to_bytes()?;
        for sink in &self.sinks {
            if let Err(e) = sink.send_bytes(&bytes) {
                warn!("UI sink dropped message: {e}");
            }
        }
        Ok(())
    }

    fn detect(&mut self) -> Vec<Vec2> {
        if !self.tracking || !self.engine.needs_detection() {
            return Vec::new();
        }

        let mode = if self.wide_scan {
            RoiMode::Wide
        } else {
            RoiMode::Tracking
        };
        let roi = self.engine.region_of_interest(mode);
        if roi.is_empty() {
            return Vec::new();
        }

        self.detector
            .detect(&roi)
            .into_iter()
            .map(|local| roi.to_field(local))
            .collect()
    }
}

fn turn_code(turn: Turn) -> u8 {
    match turn {
        Turn::Red => proto::TURN_RED,
        Turn::Blue => proto::TURN_BLUE,
    }
}

fn phase_code(phase: Phase) -> u8 {
    match phase {
        Phase::Tracking => proto::PHASE_TRACKING,
        Phase::Passing => proto::PHASE_PASSING,
        Phase::Bouncing => proto::PHASE_BOUNCING,
        Phase::Swapping => proto::PHASE_SWAPPING,
        Phase::GameOver => proto::PHASE_GAME_OVER,
    }
}

fn millis(d: Duration) -> u32 {
    d.as_millis().min(u32::MAX as u128) as u32
}

/// Snapshot of the engine for drawing.
pub fn state_frame(engine: &GameEngine, tick: u32) -> StateFrame {
    let ball = engine.ball_location();
    let dir = engine.passing_direction();
    let score = engine.score();
    StateFrame {
        tick,
        ball_x: ball.x,
        ball_y: ball.y,
        ball_radius: engine.ball_radius(),
        turn: turn_code(engine.current_turn()),
        time_left_ms: millis(engine.time_left_in_turn()),
        swap_left_ms: engine.swap_time_left().map_or(0, millis),
        dir_x: dir.x,
        dir_y: dir.y,
        score_red: score.red,
        score_blue: score.blue,
        speed: engine.speed(),
        phase: phase_code(engine.phase()),
        game_over: engine.is_game_over(),
    }
}

pub fn notification(event: &GameEvent) -> Notification {
    match *event {
        GameEvent::TurnChanged { turn } => Notification::TurnChanged {
            turn: turn_code(turn),
        },
        GameEvent::GoalScored { turn, points } => Notification::GoalScored {
            turn: turn_code(turn),
            points,
        },
        GameEvent::OutOfBounds { turn } => Notification::OutOfBounds {
            turn: turn_code(turn),
        },
        GameEvent::GameOver { score } => Notification::GameOver {
            score_red: score.red,
            score_blue: score.blue,
        },
        GameEvent::PickupPenalty { turn, points } => Notification::PickupPenalty {
            turn: turn_code(turn),
            points,
        },
        GameEvent::VelocityNonZero => Notification::VelocityNonZero,
        GameEvent::VelocityZero => Notification::VelocityZero,
        GameEvent::SwapFinished { turn } => Notification::SwapFinished {
            turn: turn_code(turn),
        },
        GameEvent::ModifierExpired { id, .. } => Notification::ModifierExpired { id: id.0 },
    }
}
