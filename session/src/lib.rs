//! Frame loop around the soccer engine.
//!
//! A [`Session`] owns the engine plus the platform collaborators it needs: a
//! blob detector that looks inside the ball's region of interest, a clock for
//! frame timing, and sinks that carry encoded state to the UI thread.

mod detector;
mod error;
mod replay;
mod session;

pub use detector::*;
pub use error::*;
pub use replay::*;
pub use session::*;

#[cfg(test)]
mod tests;
