/// Game tuning parameters for microscope soccer.
///
/// Distances are in detector pixels, times in milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Turns
    pub const TURN_DURATION_MS: u64 = 30_000;
    pub const TURNS_PER_GAME: u32 = 6;
    pub const SWAP_DURATION_MS: u64 = 5_000;

    // Ball
    pub const BALL_RADIUS: f32 = 60.0;

    // Goals
    pub const GOAL_WIDTH: f32 = 40.0;
    pub const GOAL_HEIGHT: f32 = 400.0;
    pub const GOAL_OFFSET: f32 = 50.0;
    pub const GOAL_ARM_THICKNESS: f32 = 0.0; // 0 = plain rectangular goals

    // Field edges
    pub const BOUNDS_BUFFER: f32 = 20.0;
    pub const BOUNCE_BUFFER: f32 = 85.0;

    // Smoothing windows
    pub const DIRECTION_WINDOW: usize = 15;
    pub const SPEED_WINDOW: usize = 20;
    pub const SPEED_SKIP_HOPS: usize = 2; // leading hops ignored by the speed estimate
    pub const DISCONTINUITY_THRESHOLD: f32 = 15.0;
    pub const VELOCITY_SCALE: f32 = 15.0; // detector px/frame -> um/s on screen

    // Passing (frame-stepped)
    pub const FRAMES_PER_PASS: u32 = 20;
    pub const PASS_DISTANCE: f32 = 500.0;
    pub const FRAMES_PER_BOUNCE: u32 = 10;
    pub const BOUNCE_DISTANCE: f32 = 300.0;

    // Passing (time-stepped)
    pub const PASS_DURATION_MS: u64 = 600;
    pub const PASS_SPEED: f32 = 0.8; // px per ms
    pub const BOUNCE_DURATION_MS: u64 = 300;
    pub const BOUNCE_SPEED: f32 = 1.0;

    // Scoring
    pub const CARRY_POINTS: u32 = 3;
    pub const PASS_POINTS: u32 = 1;
    pub const PICKUP_PENALTY: u32 = 1;

    pub const RNG_SEED: u64 = 12345;
}
