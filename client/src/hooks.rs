use mirage_shared::{InputBatch, KeyTable, Value};

/// Extension points the Client invokes at key moments of the session.
/// Every method has a no-op default.
pub trait ClientHooks {
    /// Declare the input keys the observer will sample. Runs once at
    /// construction; keys not declared here are ignored by
    /// [`crate::Client::set_key`].
    fn on_key_configure(&mut self, keys: &mut KeyTable) {
        let _ = keys;
    }

    /// An input batch is about to be transmitted to the authority; process
    /// it locally first (the client-side prediction seam)
    fn on_input_batch(&mut self, observer: Option<&Value>, batch: &InputBatch) {
        let _ = (observer, batch);
    }

    /// A render-ready snapshot, interpolated from `display_delay` in the
    /// past. Invoked once per [`crate::Client::render`] call.
    fn on_renderable_snapshot(&mut self, snapshot: &Value) {
        let _ = snapshot;
    }
}
