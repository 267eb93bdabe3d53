//! Input sampling, batching, and delivery from observer to authority.

use std::time::Duration;

use mirage_shared::{SyncConfig, Value};
use mirage_test::Session;

#[test]
fn pressed_keys_are_sampled_batched_and_delivered() {
    let mut session = Session::start(SyncConfig::default());

    session.tick(30);

    session.client.set_key("left", true);
    session.tick(30); // sample + flush on the observer
    session.tick(30); // ingest on the authority

    let inputs = session.server_log.inputs.lock().unwrap();
    assert_eq!(inputs.len(), 1);
    let (user, batch) = &inputs[0];
    assert_eq!(*user, 1);
    assert!(!batch.is_empty());
    for keys in batch.entries.values() {
        assert_eq!(keys.get("left"), Some(&true));
        assert_eq!(keys.get("right"), Some(&false));
    }

    // the local prediction hook saw the same batch, tagged with the identity
    let flushed = session.client_log.flushed.lock().unwrap();
    assert_eq!(flushed.len(), 1);
    let (observer, local_batch) = &flushed[0];
    assert_eq!(
        observer.as_ref(),
        Some(&Value::from([("id", Value::from(1.0))]))
    );
    assert_eq!(local_batch, batch);
}

#[test]
fn released_keys_stop_sampling() {
    let mut session = Session::start(SyncConfig::default());

    session.tick(30);
    session.client.set_key("left", true);
    session.tick(30); // one sample taken and flushed
    session.client.set_key("left", false);
    session.tick(30); // the in-flight batch lands; nothing new is sampled

    let delivered = session.server_log.inputs.lock().unwrap().len();
    assert_eq!(delivered, 1);

    session.tick(30);
    session.tick(30);

    assert_eq!(
        session.server_log.inputs.lock().unwrap().len(),
        delivered,
        "no batches expected while nothing is pressed"
    );
}

#[test]
fn unconfigured_keys_are_ignored() {
    let mut session = Session::start(SyncConfig::default());

    session.tick(30);
    session.client.set_key("jump", true);
    session.tick(30);
    session.tick(30);

    assert!(session.server_log.inputs.lock().unwrap().is_empty());
}

#[test]
fn input_timestamps_track_the_authority_clock() {
    // with simulated lag the observer's clock offset becomes visible: the
    // update sent at 10030 is released at 10150, so offset = 120
    let sync = SyncConfig {
        artificial_lag: Duration::from_millis(100),
        debug_level: 1,
        ..SyncConfig::default()
    };
    let mut session = Session::start(sync);

    for _ in 0..5 {
        session.tick(30); // 10030 .. 10150; release happens at 10150
    }
    assert_eq!(session.client.clock_offset(), 120);

    session.client.set_key("left", true);
    session.tick(30); // sample at 10180, stamped 10180 - 120
    session.tick(30); // queued on the authority behind its own lag window
    for _ in 0..4 {
        session.tick(30); // released at 10330
    }

    let inputs = session.server_log.inputs.lock().unwrap();
    assert_eq!(inputs.len(), 1);
    let (_, batch) = &inputs[0];
    assert_eq!(
        batch.entries.keys().copied().collect::<Vec<_>>(),
        vec![10_060]
    );
}
