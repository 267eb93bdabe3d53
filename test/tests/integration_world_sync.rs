//! End-to-end replication tests: one authority, one or two observers,
//! in-memory transport, manual clock.

use mirage_client::{Client, ClientConfig};
use mirage_shared::{GameClock, Packet, SyncConfig, Value};
use mirage_test::{x_delta, x_of, RecordingClientHooks, Session};

#[test]
fn observer_converges_on_the_authoritative_state() {
    let mut session = Session::start(SyncConfig::default());

    let now = session.clock.now();
    session.server.world_mut().put(x_delta(5.0), now);

    session.tick(30);

    let now = session.clock.now();
    let expected = session.server.world_mut().snapshot(now);
    let mirrored = session.client.world_mut().snapshot(now);
    assert_eq!(mirrored, expected);
    assert_eq!(x_of(&mirrored), Some(5.0));

    // the identity object produced by the connect hook arrived as well
    assert_eq!(
        session.client.identity(),
        Some(&Value::from([("id", Value::from(1.0))]))
    );
}

#[test]
fn updates_flow_incrementally_with_watermarks() {
    let mut session = Session::start(SyncConfig::default());

    session.tick(30);
    let user_key = session.server.user_keys()[0];

    // the initial resync advanced the watermark to the baseline
    assert_eq!(session.server.watermark(&user_key).unwrap(), 10_000);

    let now = session.clock.now();
    session.server.world_mut().put(x_delta(1.0), now);
    session.tick(30);
    assert_eq!(session.server.watermark(&user_key).unwrap(), now);

    // a quiet tick transmits nothing at all
    session.clock.advance(30);
    session.server.update();
    assert!(
        session.endpoint.pending_incoming().is_empty(),
        "no transmission expected on a tick without changes"
    );
    session.client.update();
    assert_eq!(session.server.watermark(&user_key).unwrap(), now);
}

#[test]
fn watermarked_deltas_are_never_redelivered() {
    let mut session = Session::start(SyncConfig::default());

    let first_put = session.clock.now();
    session.server.world_mut().put(x_delta(1.0), first_put);
    session.tick(30);

    let second_put = session.clock.now();
    session.server.world_mut().put(x_delta(2.0), second_put);

    session.clock.advance(30);
    session.server.update();

    let pending = session.endpoint.pending_incoming();
    assert_eq!(pending.len(), 1);
    let Packet::Update(update) = &pending[0] else {
        panic!("expected an update packet, got {:?}", pending[0]);
    };
    assert!(
        update.deltas.keys().all(|timestamp| *timestamp > first_put),
        "already-acknowledged history must not be resent"
    );
    assert_eq!(update.latest(), Some(second_put));

    session.client.update();
    let now = session.clock.now();
    assert_eq!(x_of(&session.client.world_mut().snapshot(now)), Some(2.0));
}

#[test]
fn disconnect_discards_the_watermark_record() {
    let mut session = Session::start(SyncConfig::default());

    session.tick(30);
    assert_eq!(session.server.users_count(), 1);
    assert_eq!(session.server_log.connects.lock().unwrap().as_slice(), &[1]);

    session.endpoint.close();
    session.tick(30);

    assert_eq!(session.server.users_count(), 0);
    assert_eq!(
        session.server_log.disconnects.lock().unwrap().as_slice(),
        &[1]
    );
    assert!(!session.client.is_connected());
}

#[test]
fn late_joiner_is_resynced_from_the_compacted_baseline() {
    let mut session = Session::start(SyncConfig::default());

    session.tick(30);
    let now = session.clock.now();
    session.server.world_mut().put(x_delta(1.0), now);
    session.tick(30);
    let now = session.clock.now();
    session.server.world_mut().put(x_delta(2.0), now);
    session.tick(30);

    // age every retained delta past the retention window; the broadcast
    // tick's snapshot folds them into the baseline as a side effect
    session.tick(2500);

    let (hooks, _log) = RecordingClientHooks::with_keys(&[]);
    let mut late_client = Client::with_clock(
        ClientConfig {
            sync: SyncConfig::default(),
        },
        Box::new(hooks),
        Box::new(session.clock.clone()),
    );
    let late_endpoint = session.socket.open_connection();
    late_client.connect(late_endpoint);

    session.clock.advance(30);
    session.server.update();
    late_client.update();
    session.client.update();

    let now = session.clock.now();
    let expected = session.server.world_mut().snapshot(now);
    assert_eq!(x_of(&expected), Some(2.0));
    assert_eq!(late_client.world_mut().snapshot(now), expected);
    assert_eq!(session.client.world_mut().snapshot(now), expected);
}
