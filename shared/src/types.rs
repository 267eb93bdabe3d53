/// Logical clock value used throughout the synchronization protocol:
/// milliseconds since an arbitrary epoch, monotonically non-decreasing
/// within a session.
pub type Timestamp = u64;
