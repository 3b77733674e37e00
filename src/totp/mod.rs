//! TOTP crate: sub-modules.

pub mod types;
pub mod base32;
pub mod uri;
pub mod core;
pub mod refresh;

// Re-export top-level items for convenience.
pub use types::*;
pub use uri::parse_otp;
pub use refresh::{Clock, CodeSubscription, SystemClock};
