use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

use mirage_shared::{GameClock, Packet, SystemClock, Timer, Timestamp, Update, Value, World};

use crate::{
    server::ServerConfig,
    transport::Socket,
    user::{User, UserKey},
    MirageServerError, ServerHooks,
};

/// The authority side of a synchronized session.
///
/// Owns the shared World, captures a snapshot of it on every broadcast
/// tick, and sends each connected observer the retained deltas past that
/// observer's watermark. Application code mutates the world directly
/// through [`Server::world_mut`]; the Server itself only schedules.
pub struct Server {
    config: ServerConfig,
    hooks: Box<dyn ServerHooks>,
    clock: Box<dyn GameClock>,
    socket: Option<Box<dyn Socket>>,
    world: World,
    users: HashMap<UserKey, User>,
    next_user: u64,
    update_timer: Timer,
    logged_snapshot: Option<String>,
}

impl Server {
    /// Create a new Server driven by the system clock
    pub fn new(config: ServerConfig, hooks: Box<dyn ServerHooks>) -> Self {
        Self::with_clock(config, hooks, Box::new(SystemClock))
    }

    /// Create a new Server driven by the given clock
    pub fn with_clock(
        config: ServerConfig,
        hooks: Box<dyn ServerHooks>,
        clock: Box<dyn GameClock>,
    ) -> Self {
        let now = clock.now();
        let world = World::new(Value::map(), now, config.sync.retention_window);
        let update_timer = Timer::new(config.sync.update_cadence);
        Self {
            config,
            hooks,
            clock,
            socket: None,
            world,
            users: HashMap::new(),
            next_user: 0,
            update_timer,
            logged_snapshot: None,
        }
    }

    /// Listen for observer connections arriving on the given socket
    pub fn listen<S: Into<Box<dyn Socket>>>(&mut self, socket: S) {
        self.socket = Some(socket.into());
    }

    /// Returns whether or not the Server is listening for observers
    pub fn is_listening(&self) -> bool {
        self.socket.is_some()
    }

    /// Must be called regularly: maintains connections to observers,
    /// ingests their input batches, and broadcasts world updates whenever
    /// the tick timer rings
    pub fn update(&mut self) {
        let now = self.clock.now();
        self.accept_connections();
        self.receive_packets(now);
        if self.update_timer.ringing(now) {
            self.update_timer.reset(now);
            self.broadcast(now);
        }
    }

    // World

    /// The authoritative World
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The authoritative World, for mutation by application code
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    // Users

    /// Return a list of all currently connected Users' keys
    pub fn user_keys(&self) -> Vec<UserKey> {
        self.users.keys().copied().collect()
    }

    /// Get the number of Users currently connected
    pub fn users_count(&self) -> usize {
        self.users.len()
    }

    /// The replication watermark recorded for the given User
    pub fn watermark(&self, user_key: &UserKey) -> Result<Timestamp, MirageServerError> {
        self.users
            .get(user_key)
            .map(|user| user.watermark)
            .ok_or(MirageServerError::UserNotFound)
    }

    /// Tear down the connection to a User, discarding its watermark record.
    /// The transition is terminal; a reconnecting observer starts over.
    pub fn disconnect_user(&mut self, user_key: &UserKey) -> Result<(), MirageServerError> {
        if self.users.remove(user_key).is_some() {
            self.hooks.on_disconnect(user_key);
            Ok(())
        } else {
            Err(MirageServerError::UserNotFound)
        }
    }

    // Internals

    fn accept_connections(&mut self) {
        let Some(socket) = self.socket.as_mut() else {
            return;
        };
        while let Some(mut connection) = socket.accept() {
            self.next_user += 1;
            let user_key = UserKey::new(self.next_user);
            let observer = self.hooks.on_connect(&user_key);
            match connection.send(&Packet::Identity { observer }) {
                Ok(()) => {
                    if self.config.sync.debug_level >= 1 {
                        debug!("user {} connected", user_key.to_u64());
                    }
                    self.users.insert(user_key, User::new(connection));
                }
                Err(error) => {
                    warn!("Server Error: cannot send identity packet: {error}");
                    self.hooks.on_disconnect(&user_key);
                }
            }
        }
    }

    fn receive_packets(&mut self, now: Timestamp) {
        let user_keys: Vec<UserKey> = self.users.keys().copied().collect();
        let mut dropped = Vec::new();
        for user_key in user_keys {
            let Some(user) = self.users.get_mut(&user_key) else {
                continue;
            };
            if !user.connection.is_open() {
                dropped.push(user_key);
                continue;
            }
            loop {
                match user.connection.receive() {
                    Ok(Some(Packet::Input(batch))) => {
                        if self.config.sync.simulates_lag() {
                            let due = now + self.config.sync.artificial_lag.as_millis() as u64;
                            user.lagged_inputs.add_item(due, batch);
                        } else {
                            self.hooks.on_input_batch(&user_key, &batch);
                        }
                    }
                    Ok(Some(packet)) => {
                        debug!("Server ignoring unexpected packet: {packet:?}");
                    }
                    Ok(None) => break,
                    Err(error) => {
                        warn!("Server Error: cannot receive from user: {error}");
                        dropped.push(user_key);
                        break;
                    }
                }
            }
            // release input batches whose simulated delivery time has passed
            while let Some(batch) = user.lagged_inputs.pop_item(now) {
                self.hooks.on_input_batch(&user_key, &batch);
            }
        }
        for user_key in dropped {
            let _ = self.disconnect_user(&user_key);
        }
    }

    /// One broadcast tick: capture the current snapshot for path queries,
    /// then send every observer the deltas past its watermark
    fn broadcast(&mut self, now: Timestamp) {
        let snapshot = self.world.snapshot(now);
        if self.config.sync.debug_level >= 2 {
            self.log_snapshot_diff(&snapshot);
        }
        self.world.cache_snapshot(snapshot);

        let mut user_keys: Vec<UserKey> = self.users.keys().copied().collect();
        // shuffle order of connections in order to avoid priority among users
        fastrand::shuffle(&mut user_keys);

        let mut dropped = Vec::new();
        for user_key in user_keys {
            let baseline_timestamp = self.world.baseline_timestamp();
            let Some(user) = self.users.get_mut(&user_key) else {
                continue;
            };

            let (deltas, new_watermark) = if user.watermark < baseline_timestamp {
                // The history this observer needs was already compacted away
                // (fresh connections land here too, watermark zero): fall
                // back to the full snapshot as a synthetic delta at the
                // baseline timestamp
                let mut deltas = BTreeMap::new();
                deltas.insert(baseline_timestamp, self.world.cached().clone());
                let new_watermark = self
                    .world
                    .latest_delta_timestamp()
                    .unwrap_or(baseline_timestamp);
                if self.config.sync.debug_level >= 1 {
                    debug!(
                        "RESYNC user={} baseline={baseline_timestamp}",
                        user_key.to_u64()
                    );
                }
                (deltas, new_watermark)
            } else {
                let deltas = self.world.changes_since(user.watermark, now);
                let Some(new_watermark) = deltas.keys().next_back().copied() else {
                    // nothing new for this observer; no transmission
                    continue;
                };
                (deltas, new_watermark)
            };

            let update = Update {
                deltas,
                sent_at: now,
            };
            match user.connection.send(&Packet::Update(update)) {
                Ok(()) => {
                    user.watermark = new_watermark;
                    if self.config.sync.debug_level >= 1 {
                        debug!(
                            "UPD user={} watermark={new_watermark}",
                            user_key.to_u64()
                        );
                    }
                }
                Err(error) => {
                    warn!("Server Error: cannot send update packet: {error}");
                    dropped.push(user_key);
                }
            }
        }

        for user_key in dropped {
            let _ = self.disconnect_user(&user_key);
        }
    }

    /// Log the captured snapshot, but only when it changed since the last
    /// tick that logged one
    fn log_snapshot_diff(&mut self, snapshot: &Value) {
        match serde_json::to_string_pretty(snapshot) {
            Ok(latest) => {
                if self.logged_snapshot.as_deref() != Some(latest.as_str()) {
                    debug!("world snapshot:\n{latest}");
                    self.logged_snapshot = Some(latest);
                }
            }
            Err(error) => {
                warn!("Server Error: cannot serialize snapshot: {error}");
            }
        }
    }
}
