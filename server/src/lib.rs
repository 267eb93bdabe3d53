//! # Mirage Server
//! A server that owns the authoritative world state, captures it on a fixed
//! cadence, and streams each connected observer the deltas past its
//! watermark.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod transport;

mod error;
mod hooks;
mod server;
mod user;

pub use error::MirageServerError;
pub use hooks::ServerHooks;
pub use server::{Server, ServerConfig};
pub use user::UserKey;
