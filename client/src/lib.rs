//! # Mirage Client
//! A client that ingests the authority's delta stream into a local world
//! mirror, samples and batches player input, and renders a smoothly
//! interpolated view of the recent past.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod transport;

mod client;
mod hooks;
mod input;

pub use client::{Client, ClientConfig};
pub use hooks::ClientHooks;
