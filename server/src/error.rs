use thiserror::Error;

use mirage_shared::TransportError;

/// An Error type containing the issues the Server can encounter
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MirageServerError {
    /// No User exists for the given key
    #[error("no User exists for the given key")]
    UserNotFound,
    /// The transport failed while talking to a User
    #[error(transparent)]
    Transport(#[from] TransportError),
}
