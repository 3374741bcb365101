use crate::{
    load_recording, replay, ManualClock, MatchState, ScriptedDetector, Session, SessionError,
    UiSink,
};
use glam::Vec2;
use proto::{Notification, S2U};
use soccer_core::{Config, Roi};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

struct MockSink {
    msgs: Rc<RefCell<Vec<Vec<u8>>>>,
}

impl UiSink for MockSink {
    fn send_bytes(&self, bytes: &[u8]) -> Result<(), SessionError> {
        self.msgs.borrow_mut().push(bytes.to_vec());
        Ok(())
    }
}

struct BrokenSink;

impl UiSink for BrokenSink {
    fn send_bytes(&self, _bytes: &[u8]) -> Result<(), SessionError> {
        Err(SessionError::Sink("ui thread gone".to_string()))
    }
}

fn decoded(msgs: &Rc<RefCell<Vec<Vec<u8>>>>) -> Vec<S2U> {
    msgs.borrow()
        .iter()
        .map(|b| S2U::from_bytes(b).unwrap())
        .collect()
}

fn scripted_session() -> (Session<ScriptedDetector, ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let session = Session::new(
        1000,
        800,
        Config::new(),
        ScriptedDetector::new(),
        clock.clone(),
    )
    .unwrap();
    (session, clock)
}

#[test]
fn test_session_initialization() {
    let (session, _clock) = scripted_session();
    assert_eq!(session.match_state(), MatchState::Waiting);
    assert!(session.engine().is_countdown_paused());
    assert_eq!(session.tick(), 0);
}

#[test]
fn test_empty_frame_rejected() {
    let result = Session::new(0, 800, Config::new(), ScriptedDetector::new(), ManualClock::new());
    assert!(matches!(
        result.err(),
        Some(SessionError::EmptyField { width: 0, .. })
    ));
}

#[test]
fn test_countdown_held_until_start() {
    let (mut session, clock) = scripted_session();
    session.process_frame().unwrap();
    clock.advance(1000);
    session.process_frame().unwrap();
    assert_eq!(session.engine().time_left_in_turn().as_millis(), 30_000);

    session.start();
    assert_eq!(session.match_state(), MatchState::Playing);
    clock.advance(100);
    session.process_frame().unwrap();
    assert_eq!(session.engine().time_left_in_turn().as_millis(), 29_900);
}

#[test]
fn test_detections_translated_from_roi() {
    let seen = Rc::new(RefCell::new(Vec::<Roi>::new()));
    let log = seen.clone();
    let detector = move |roi: &Roi| {
        log.borrow_mut().push(*roi);
        vec![Vec2::new(70.0, 60.0)]
    };
    let mut session =
        Session::new(1000, 800, Config::new(), detector, ManualClock::new()).unwrap();

    session.process_frame().unwrap();
    assert_eq!(session.engine().ball_location(), Vec2::new(510.0, 400.0));
    assert_eq!(
        seen.borrow()[0],
        Roi {
            x: 440,
            y: 340,
            width: 120,
            height: 120
        }
    );
}

#[test]
fn test_wide_scan_after_stall() {
    let (mut session, _clock) = scripted_session();
    assert!(!session.is_wide_scan());

    // Nothing near the ball: it does not move, so the next scan widens.
    session.process_frame().unwrap();
    assert!(session.is_wide_scan());

    session
        .detector_mut()
        .set_frame([Vec2::new(380.0, 400.0)]);
    session.process_frame().unwrap();
    assert_eq!(session.engine().ball_location(), Vec2::new(380.0, 400.0));
    assert!(!session.is_wide_scan());
}

#[test]
fn test_pickup_penalty_widens_scan() {
    let (mut session, _clock) = scripted_session();
    session.detector_mut().set_frame([Vec2::new(505.0, 400.0)]);
    session.process_frame().unwrap();
    assert!(!session.is_wide_scan());

    assert_eq!(session.pickup_pressed(), 0);
    assert!(session.is_wide_scan());
}

#[test]
fn test_tracking_off_feeds_no_detections() {
    let (mut session, _clock) = scripted_session();
    session.set_tracking(false);
    session.detector_mut().set_frame([Vec2::new(505.0, 400.0)]);
    session.process_frame().unwrap();
    assert_eq!(session.engine().ball_location(), Vec2::new(500.0, 400.0));
}

#[test]
fn test_broadcast_state_and_events() {
    let (mut session, _clock) = scripted_session();
    let messages = Rc::new(RefCell::new(Vec::new()));
    session.add_sink(Box::new(MockSink {
        msgs: messages.clone(),
    }));
    session.add_sink(Box::new(BrokenSink));

    session.start();
    // Walk the organism toward the Blue goal inside the tracking window.
    for x in [550.0, 600.0, 650.0, 700.0, 750.0, 800.0, 850.0, 900.0, 920.0] {
        session.detector_mut().set_frame([Vec2::new(x, 400.0)]);
        session.process_frame().unwrap();
    }

    let msgs = decoded(&messages);
    assert!(msgs.contains(&S2U::Notify(Notification::GoalScored {
        turn: proto::TURN_RED,
        points: 3
    })));
    match msgs.last() {
        Some(S2U::State(frame)) => {
            assert_eq!(frame.score_red, 3);
            assert_eq!(frame.tick, 9);
            assert_eq!((frame.ball_x, frame.ball_y), (500.0, 400.0));
        }
        other => panic!("Expected state frame, got {other:?}"),
    }
}

#[test]
fn test_game_over_moves_match_state() {
    let clock = ManualClock::new();
    let config = Config {
        winning_score: Some(3),
        ..Config::new()
    };
    let mut session = Session::new(
        1000,
        800,
        config,
        ScriptedDetector::new(),
        clock.clone(),
    )
    .unwrap();
    session.start();

    for x in [550.0, 600.0, 650.0, 700.0, 750.0, 800.0, 850.0, 900.0, 920.0] {
        session.detector_mut().set_frame([Vec2::new(x, 400.0)]);
        clock.advance(16);
        session.process_frame().unwrap();
    }
    assert_eq!(session.match_state(), MatchState::GameOver);
    assert!(session.engine().is_countdown_paused());

    session.new_game();
    assert_eq!(session.match_state(), MatchState::Waiting);
    assert!(!session.engine().is_game_over());
}

#[test]
fn test_recording_captures_frames_and_presses() {
    let (mut session, clock) = scripted_session();
    session.start_recording();

    session.detector_mut().set_frame([Vec2::new(510.0, 400.0)]);
    session.process_frame().unwrap();
    clock.advance(33);
    session.pickup_pressed();
    session.process_frame().unwrap();

    let rec = session.take_recording().unwrap();
    assert_eq!((rec.width, rec.height), (1000, 800));
    assert_eq!(rec.frames.len(), 2);
    assert_eq!(rec.frames[0].dt_ms, 0);
    assert_eq!(rec.frames[0].candidates, vec![[510.0, 400.0]]);
    assert_eq!(rec.frames[1].dt_ms, 33);
    assert!(rec.frames[1].pickup);
    assert!(session.take_recording().is_none());
}

#[test]
fn test_replay_reproduces_recorded_match() {
    let (mut session, clock) = scripted_session();
    session.start_recording();

    // Organism tracked while the countdown is still held.
    session.detector_mut().set_frame([Vec2::new(505.0, 400.0)]);
    session.process_frame().unwrap();
    for _ in 0..2 {
        clock.advance(1000);
        session.process_frame().unwrap();
    }

    session.start();
    for x in [550.0, 600.0, 650.0, 700.0, 750.0, 800.0, 850.0, 900.0, 920.0] {
        session.detector_mut().set_frame([Vec2::new(x, 400.0)]);
        clock.advance(16);
        session.process_frame().unwrap();
    }

    session.detector_mut().set_frame([]);
    for _ in 0..4 {
        clock.advance(500);
        session.process_frame().unwrap();
    }

    session.pass_pressed();
    for _ in 0..25 {
        clock.advance(16);
        session.process_frame().unwrap();
    }

    let rec = session.take_recording().unwrap();
    assert!(!rec.frames[2].start);
    assert!(rec.frames[3].start);

    let original = session.engine();
    assert_eq!(original.score().red, 3);
    assert!(original.time_left_in_turn() < Duration::from_secs(30));

    let replayed = replay(&rec, Config::new()).unwrap();
    let engine = replayed.engine();
    assert_eq!(replayed.match_state(), MatchState::Playing);
    assert_eq!(engine.score(), original.score());
    assert_eq!(engine.current_turn(), original.current_turn());
    assert_eq!(engine.turn_count(), original.turn_count());
    assert_eq!(engine.time_left_in_turn(), original.time_left_in_turn());
    assert_eq!(engine.ball_location(), original.ball_location());
}

#[test]
fn test_replay_keeps_new_game_and_tracking_toggles() {
    let (mut session, clock) = scripted_session();
    session.start_recording();
    session.start();
    session.detector_mut().set_frame([Vec2::new(920.0, 400.0)]);
    session.process_frame().unwrap();

    session.new_game();
    session.set_tracking(false);
    clock.advance(100);
    session.process_frame().unwrap();

    let rec = session.take_recording().unwrap();
    assert!(rec.frames[1].new_game);
    assert_eq!(rec.frames[1].tracking, Some(false));

    let replayed = replay(&rec, Config::new()).unwrap();
    assert_eq!(replayed.match_state(), MatchState::Waiting);
    assert_eq!(replayed.engine().score(), session.engine().score());
    assert_eq!(
        replayed.engine().time_left_in_turn(),
        Duration::from_secs(30)
    );
}

#[test]
fn test_load_recording_errors() {
    let missing = std::env::temp_dir().join("soccer-session-no-such-recording.json");
    assert!(matches!(
        load_recording(&missing),
        Err(SessionError::Io(_))
    ));

    let bad = std::env::temp_dir().join(format!("soccer-session-bad-{}.json", std::process::id()));
    std::fs::write(&bad, "{ not json").unwrap();
    let result = load_recording(&bad);
    let _ = std::fs::remove_file(&bad);
    assert!(matches!(result, Err(SessionError::Json(_))));
}
