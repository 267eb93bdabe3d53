mod manual_clock;
mod trees;

pub use manual_clock::ManualClock;
pub use recording_hooks::{
    ClientHookLog, RecordingClientHooks, RecordingServerHooks, ServerHookLog,
};
pub use session::{Session, SESSION_START};
pub use trees::{x_delta, x_of};
