use glam::Vec2;
use proto::{DetectionFrame, Recording};
use soccer_core::Config;
use std::path::Path;

use crate::{ManualClock, ScriptedDetector, Session, SessionError};

pub type ReplaySession = Session<ScriptedDetector, ManualClock>;

pub fn load_recording(path: &Path) -> Result<Recording, SessionError> {
    let text = std::fs::read_to_string(path)?;
    Ok(Recording::from_json(&text)?)
}

/// Fresh session sized for `recording`, waiting for its first frame.
pub fn replay_session(recording: &Recording, config: Config) -> Result<ReplaySession, SessionError> {
    Session::new(
        recording.width,
        recording.height,
        config,
        ScriptedDetector::new(),
        ManualClock::new(),
    )
}

/// Apply one recorded frame: the presses made before it, then the frame itself.
pub fn replay_frame(session: &mut ReplaySession, frame: &DetectionFrame) -> Result<(), SessionError> {
    if frame.new_game {
        session.new_game();
    }
    if let Some(tracking) = frame.tracking {
        session.set_tracking(tracking);
    }
    if frame.start {
        session.start();
    }
    if frame.pickup {
        session.pickup_pressed();
    }
    if frame.pass {
        session.pass_pressed();
    }
    if frame.bounce {
        session.bounce_pressed();
    }

    session.clock().advance(frame.dt_ms);
    session
        .detector_mut()
        .set_frame(frame.candidates.iter().map(|&[x, y]| Vec2::new(x, y)));
    session.process_frame()
}

/// Run a whole recording and hand back the finished session.
pub fn replay(recording: &Recording, config: Config) -> Result<ReplaySession, SessionError> {
    let mut session = replay_session(recording, config)?;
    for frame in &recording.frames {
        replay_frame(&mut session, frame)?;
    }
    Ok(session)
}
