//! Request handlers.

pub mod health;
pub mod playback;
pub mod session;

pub use health::*;
pub use playback::*;
pub use session::*;
