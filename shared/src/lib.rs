//! # Mirage Shared
//! Common functionality shared between mirage-server & mirage-client crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod backends;
mod config;
mod messages;
mod state;
mod transport;
mod types;
mod world;

pub use backends::{GameClock, SystemClock, TimeError, TimeQueue, Timer};
pub use config::SyncConfig;
pub use messages::{InputBatch, KeyTable, Packet, Update};
pub use state::{error::StateError, Path, Step, Value};
pub use transport::error::TransportError;
pub use types::Timestamp;
pub use world::World;
