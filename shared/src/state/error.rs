use thiserror::Error;

use super::value::Path;

/// Errors surfaced while validating received state data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    /// A delta carried a leaf that cannot be merged or interpolated. The
    /// leaf is discarded; the rest of the delta is kept.
    #[error("malformed delta leaf at {path:?}")]
    MalformedLeaf { path: Path },
}
