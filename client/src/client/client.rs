use log::{debug, warn};

use mirage_shared::{
    GameClock, Packet, SystemClock, TimeQueue, Timer, Timestamp, Update, Value, World,
};

use crate::{
    client::ClientConfig, hooks::ClientHooks, input::InputTracker, transport::ClientConnection,
};

/// The observer side of a synchronized session.
///
/// Mirrors the authority's world by ingesting its delta stream, samples
/// and batches player input on its own cadences, and produces render-ready
/// snapshots interpolated from `display_delay` in the past. `update` must
/// be called regularly; `render` is driven by the display refresh.
pub struct Client {
    config: ClientConfig,
    hooks: Box<dyn ClientHooks>,
    clock: Box<dyn GameClock>,
    connection: Option<Box<dyn ClientConnection>>,
    world: World,
    identity: Option<Value>,
    input: InputTracker,
    lagged_updates: TimeQueue<Update>,
    input_timer: Timer,
    send_timer: Timer,
    clock_offset: i64,
}

impl Client {
    /// Create a new Client driven by the system clock
    pub fn new(config: ClientConfig, hooks: Box<dyn ClientHooks>) -> Self {
        Self::with_clock(config, hooks, Box::new(SystemClock))
    }

    /// Create a new Client driven by the given clock
    pub fn with_clock(
        config: ClientConfig,
        mut hooks: Box<dyn ClientHooks>,
        clock: Box<dyn GameClock>,
    ) -> Self {
        let now = clock.now();
        let world = World::new(Value::map(), now, config.sync.retention_window);
        let input_timer = Timer::new(config.sync.input_cadence);
        let send_timer = Timer::new(config.sync.update_cadence);

        let mut input = InputTracker::new();
        hooks.on_key_configure(input.keys_mut());

        Self {
            config,
            hooks,
            clock,
            connection: None,
            world,
            identity: None,
            input,
            lagged_updates: TimeQueue::new(),
            input_timer,
            send_timer,
            clock_offset: 0,
        }
    }

    /// Connect to the authority over the given connection
    pub fn connect<C: Into<Box<dyn ClientConnection>>>(&mut self, connection: C) {
        self.connection = Some(connection.into());
    }

    /// Returns whether or not the Client currently holds a connection
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Must be called regularly: ingests updates from the authority and
    /// drives the input sampling and input flush timers
    pub fn update(&mut self) {
        let now = self.clock.now();
        self.receive_packets(now);
        self.release_updates(now);
        if self.input_timer.ringing(now) {
            self.input_timer.reset(now);
            self.sample_input(now);
        }
        if self.send_timer.ringing(now) {
            self.send_timer.reset(now);
            self.flush_inputs();
        }
    }

    /// Produce a render-ready snapshot and hand it to the render hook.
    /// Drive this from the display refresh callback. The snapshot is the
    /// interpolated state from `display_delay` in the past, so frames fall
    /// between received samples instead of beyond them.
    pub fn render(&mut self) {
        let now = self.clock.now();
        let target = now.saturating_sub(self.config.sync.display_delay.as_millis() as u64);
        let snapshot = self.world.interpolate(target, now);
        self.world.cache_snapshot(snapshot.clone());
        self.hooks.on_renderable_snapshot(&snapshot);
    }

    /// Record a pressed-state change for a key declared at configure time
    pub fn set_key(&mut self, code: &str, pressed: bool) {
        self.input.set_key(code, pressed);
    }

    // World

    /// The local mirror of the authority's World
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The identity object the authority produced for this observer, once
    /// it has arrived
    pub fn identity(&self) -> Option<&Value> {
        self.identity.as_ref()
    }

    /// Latest estimate of `local now - authority send time`, used to stamp
    /// input samples with an approximation of authority time
    pub fn clock_offset(&self) -> i64 {
        self.clock_offset
    }

    // Internals

    fn receive_packets(&mut self, now: Timestamp) {
        let Some(connection) = self.connection.as_mut() else {
            return;
        };
        if !connection.is_open() {
            warn!("Client Error: connection to Server closed");
            self.connection = None;
            return;
        }
        let lag = if self.config.sync.simulates_lag() {
            self.config.sync.artificial_lag.as_millis() as u64
        } else {
            0
        };
        let mut failed = false;
        loop {
            match connection.receive() {
                Ok(Some(Packet::Identity { observer })) => {
                    self.identity = Some(observer);
                }
                Ok(Some(Packet::Update(update))) => {
                    // updates with no simulated lag come due on this very
                    // call, in release_updates
                    self.lagged_updates.add_item(now + lag, update);
                }
                Ok(Some(packet)) => {
                    debug!("Client ignoring unexpected packet: {packet:?}");
                }
                Ok(None) => break,
                Err(error) => {
                    warn!("Client Error: cannot receive from Server: {error}");
                    failed = true;
                    break;
                }
            }
        }
        if failed {
            self.connection = None;
        }
    }

    fn release_updates(&mut self, now: Timestamp) {
        while let Some(update) = self.lagged_updates.pop_item(now) {
            self.apply_update(update, now);
        }
    }

    fn apply_update(&mut self, update: Update, now: Timestamp) {
        self.clock_offset = now as i64 - update.sent_at as i64;
        for (timestamp, mut delta) in update.deltas {
            for error in delta.sanitize() {
                warn!("Client Error: discarding {error}");
            }
            if self.config.sync.debug_level >= 1 {
                debug!("UPD {delta:?} @{timestamp}");
            }
            self.world.put(delta, timestamp);
        }
    }

    fn sample_input(&mut self, now: Timestamp) {
        // stamp samples with an estimate of the authority's clock
        let server_time = now.saturating_add_signed(-self.clock_offset);
        self.input.sample(server_time);
    }

    fn flush_inputs(&mut self) {
        if !self.input.has_pending() {
            return;
        }
        let batch = self.input.flush();
        self.hooks.on_input_batch(self.identity.as_ref(), &batch);
        let Some(connection) = self.connection.as_mut() else {
            return;
        };
        if let Err(error) = connection.send(&Packet::Input(batch)) {
            warn!("Client Error: cannot send input packet to Server: {error}");
            self.connection = None;
        }
    }
}
