use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::{ModifierId, ModifierKind};

/// Whose turn it is. Red attacks the Blue goal on the right, Blue the Red goal on the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    Red,
    Blue,
}

impl Turn {
    pub fn opponent(self) -> Self {
        match self {
            Turn::Red => Turn::Blue,
            Turn::Blue => Turn::Red,
        }
    }
}

/// Game score tracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub red: u32,
    pub blue: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self, turn: Turn) -> u32 {
        match turn {
            Turn::Red => self.red,
            Turn::Blue => self.blue,
        }
    }

    pub fn add(&mut self, turn: Turn, points: u32) {
        match turn {
            Turn::Red => self.red += points,
            Turn::Blue => self.blue += points,
        }
    }

    /// Take points away, never below zero. Returns how many were actually removed.
    pub fn deduct(&mut self, turn: Turn, points: u32) -> u32 {
        let slot = match turn {
            Turn::Red => &mut self.red,
            Turn::Blue => &mut self.blue,
        };
        let removed = points.min(*slot);
        *slot -= removed;
        removed
    }

    pub fn total(&self) -> u32 {
        self.red + self.blue
    }

    /// The player ahead, or `None` on a tie.
    pub fn leader(&self) -> Option<Turn> {
        match self.red.cmp(&self.blue) {
            std::cmp::Ordering::Greater => Some(Turn::Red),
            std::cmp::Ordering::Less => Some(Turn::Blue),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn has_winner(&self, win_score: u32) -> Option<Turn> {
        if self.red >= win_score {
            Some(Turn::Red)
        } else if self.blue >= win_score {
            Some(Turn::Blue)
        } else {
            None
        }
    }
}

/// Random number generator
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }

    /// Uniformly random unit vector, never zero.
    pub fn unit_vector(&mut self) -> Vec2 {
        use rand::Rng;
        loop {
            let v = Vec2::new(self.0.gen_range(-0.5..0.5), self.0.gen_range(-0.5..0.5));
            let unit = v.normalize_or_zero();
            if unit != Vec2::ZERO {
                return unit;
            }
        }
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(crate::Params::RNG_SEED)
    }
}

/// Something the host should react to (toast, sound, swap pause, score view).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    TurnChanged { turn: Turn },
    GoalScored { turn: Turn, points: u32 },
    OutOfBounds { turn: Turn },
    GameOver { score: Score },
    PickupPenalty { turn: Turn, points: u32 },
    VelocityNonZero,
    VelocityZero,
    SwapFinished { turn: Turn },
    ModifierExpired { id: ModifierId, kind: ModifierKind },
}

/// Events raised since the host last drained the queue
#[derive(Debug, Clone, Default)]
pub struct Events {
    queue: Vec<GameEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.queue.push(event);
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.queue)
    }

    pub fn as_slice(&self) -> &[GameEvent] {
        &self.queue
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
