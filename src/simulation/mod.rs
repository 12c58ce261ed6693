//! Single-threaded simulation loop and shared context

pub mod context;
pub mod tick;

pub use context::SharedContext;
pub use tick::{GuardRig, GuardWorld, PlayerState};
