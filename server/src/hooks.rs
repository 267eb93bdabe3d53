use mirage_shared::{InputBatch, Value};

use crate::user::UserKey;

/// Extension points the Server invokes at key moments of the session.
///
/// Every method has a no-op default except for its return value contract:
/// the identity object [`ServerHooks::on_connect`] yields is transmitted to
/// the new observer as-is.
pub trait ServerHooks {
    /// A new observer connected; produce the identity object to send it
    fn on_connect(&mut self, user_key: &UserKey) -> Value {
        let _ = user_key;
        Value::Null
    }

    /// The observer's connection was torn down. Its watermark record is
    /// already discarded; this transition is terminal.
    fn on_disconnect(&mut self, user_key: &UserKey) {
        let _ = user_key;
    }

    /// An input batch arrived from an observer
    fn on_input_batch(&mut self, user_key: &UserKey, batch: &InputBatch) {
        let _ = (user_key, batch);
    }
}
