use thiserror::Error;

/// Rejected engine configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("field {width}x{height} is too small for a bounds buffer of {buffer}")]
    FieldTooSmall { width: u32, height: u32, buffer: f32 },

    #[error("goal of {goal_width}x{goal_height} at offset {offset} does not fit a {width}x{height} field")]
    GoalDoesNotFit {
        width: u32,
        height: u32,
        goal_width: f32,
        goal_height: f32,
        offset: f32,
    },

    #[error("goal arms of thickness {thickness} leave no scoring mouth in a goal of height {goal_height}")]
    GoalArmsTooThick { thickness: f32, goal_height: f32 },

    #[error("{name} must be at least {min}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
    },
}
