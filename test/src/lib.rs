pub mod helpers;

pub use helpers::*;
pub use local_socket::{LocalEndpoint, LocalSocket};
