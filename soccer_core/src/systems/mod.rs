pub mod bounds;
pub mod flight;
pub mod goals;
pub mod modifiers;

pub use bounds::*;
pub use flight::*;
pub use goals::*;
pub use modifiers::*;
