//! Wire formats for the soccer session
//!
//! Session-to-UI messages use postcard for compact binary frames; recorded
//! detection streams are plain JSON so they can be edited by hand.

use postcard::{from_bytes, to_allocvec};
use serde::{Deserialize, Serialize};

// ============================================================================
// S2U Messages (Session to UI)
// ============================================================================

/// Player colors on the wire: 0 = red, 1 = blue
pub const TURN_RED: u8 = 0;
pub const TURN_BLUE: u8 = 1;

/// Game phase on the wire
pub const PHASE_TRACKING: u8 = 0;
pub const PHASE_PASSING: u8 = 1;
pub const PHASE_BOUNCING: u8 = 2;
pub const PHASE_SWAPPING: u8 = 3;
pub const PHASE_GAME_OVER: u8 = 4;

/// Everything the UI needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFrame {
    pub tick: u32,
    pub ball_x: f32,
    pub ball_y: f32,
    pub ball_radius: f32,
    pub turn: u8,
    pub time_left_ms: u32,
    /// Zero when not swapping
    pub swap_left_ms: u32,
    pub dir_x: f32,
    pub dir_y: f32,
    pub score_red: u32,
    pub score_blue: u32,
    pub speed: f32,
    pub phase: u8,
    pub game_over: bool,
}

/// One-off notifications raised by the game (toasts, sounds, score screen)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    TurnChanged { turn: u8 },
    GoalScored { turn: u8, points: u32 },
    OutOfBounds { turn: u8 },
    GameOver { score_red: u32, score_blue: u32 },
    PickupPenalty { turn: u8, points: u32 },
    VelocityNonZero,
    VelocityZero,
    SwapFinished { turn: u8 },
    ModifierExpired { id: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum S2U {
    State(StateFrame),
    Notify(Notification),
}

impl S2U {
    /// Serialize S2U message to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        to_allocvec(self)
    }

    /// Deserialize S2U message from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        from_bytes(bytes)
    }
}

// ============================================================================
// Recordings
// ============================================================================

/// Detections and button presses for one camera frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionFrame {
    /// Time since the previous frame
    pub dt_ms: u64,
    /// Organism centroids in field coordinates
    pub candidates: Vec<[f32; 2]>,
    pub pass: bool,
    pub bounce: bool,
    pub pickup: bool,
    /// Match countdown released before this frame
    pub start: bool,
    /// Game reset before this frame
    pub new_game: bool,
    /// Tracking switched on or off before this frame
    pub tracking: Option<bool>,
}

/// A captured game: field size plus every frame's detections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<DetectionFrame>,
}

impl Recording {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frames: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Total recorded time
    pub fn duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| f.dt_ms).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_frame_serialization() {
        let msg = S2U::State(StateFrame {
            tick: 100,
            ball_x: 500.0,
            ball_y: 400.0,
            ball_radius: 60.0,
            turn: TURN_BLUE,
            time_left_ms: 29_000,
            swap_left_ms: 0,
            dir_x: 1.0,
            dir_y: 0.0,
            score_red: 3,
            score_blue: 1,
            speed: 12.5,
            phase: PHASE_PASSING,
            game_over: false,
        });
        let bytes = msg.to_bytes().expect("Serialization should succeed");
        let decoded = S2U::from_bytes(&bytes).expect("Deserialization should succeed");
        match decoded {
            S2U::State(frame) => {
                assert_eq!(frame.tick, 100);
                assert_eq!(frame.turn, TURN_BLUE);
                assert_eq!(frame.score_red, 3);
                assert_eq!(frame.phase, PHASE_PASSING);
            }
            _ => panic!("Message type mismatch"),
        }
    }

    #[test]
    fn test_notification_serialization() {
        let msg = S2U::Notify(Notification::GoalScored {
            turn: TURN_RED,
            points: 3,
        });
        let bytes = msg.to_bytes().expect("Serialization should succeed");
        assert_eq!(S2U::from_bytes(&bytes).unwrap(), msg);
    }

    #[test]
    fn test_truncated_bytes_rejected() {
        let bytes = S2U::Notify(Notification::OutOfBounds { turn: TURN_RED })
            .to_bytes()
            .unwrap();
        assert!(S2U::from_bytes(&bytes[..1]).is_err());
    }

    #[test]
    fn test_recording_json_defaults_flags() {
        let text = r#"{
            "width": 1000,
            "height": 800,
            "frames": [
                { "dt_ms": 16, "candidates": [[510.0, 400.0], [700.0, 100.0]] },
                { "dt_ms": 16, "pass": true },
                { "dt_ms": 0, "start": true, "tracking": false }
            ]
        }"#;
        let rec = Recording::from_json(text).expect("valid recording");
        assert_eq!(rec.width, 1000);
        assert_eq!(rec.frames.len(), 3);
        assert_eq!(rec.frames[0].candidates[1], [700.0, 100.0]);
        assert!(!rec.frames[0].pass);
        assert!(rec.frames[1].pass);
        assert!(rec.frames[1].candidates.is_empty());
        assert!(!rec.frames[1].start && !rec.frames[1].new_game);
        assert_eq!(rec.frames[1].tracking, None);
        assert!(rec.frames[2].start);
        assert_eq!(rec.frames[2].tracking, Some(false));
        assert_eq!(rec.duration_ms(), 32);
    }

    #[test]
    fn test_recording_json_written_back() {
        let mut rec = Recording::new(640, 480);
        rec.frames.push(DetectionFrame {
            dt_ms: 33,
            candidates: vec![[1.0, 2.0]],
            pickup: true,
            ..Default::default()
        });
        let text = rec.to_json().unwrap();
        assert!(text.contains("\"pickup\": true"));
        assert_eq!(Recording::from_json(&text).unwrap(), rec);
    }
}
