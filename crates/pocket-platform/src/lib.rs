//! Platform services consumed by the pocket-shell session core.
//!
//! The core only needs two things from its host: somewhere to keep opaque
//! key-value blobs, and a wall clock for the lock-screen time display.

mod services;
mod store;

pub use services::{DesktopPlatform, FixedClock, SystemTime, TimeService};
pub use store::{FileStore, KeyValueStore, MemoryStore};
