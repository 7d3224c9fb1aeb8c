//! Session registry with idle-time eviction.
//!
//! Sessions live behind their own lock so operations on different sessions
//! never contend. The map lock is held only long enough to clone a session
//! handle, insert, or remove.

use crate::config::{DEFAULT_MAX_PUZZLE_SIZE, DEFAULT_TTL_SECS, SimulatorConfig};
use crate::error::SimulatorError;
use crate::params::{PuzzleParameters, PuzzleType};
use crate::simulator::Simulator;
use parking_lot::{Mutex, RwLock};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Opaque session identifier.
pub type EnvId = String;

/// A simulator owned by the registry.
#[derive(Debug)]
pub struct Session {
    env_id: EnvId,
    simulator: Simulator,
    last_access: Instant,
    evicted: bool,
}

impl Session {
    fn new(env_id: EnvId, simulator: Simulator, now: Instant) -> Self {
        Self {
            env_id,
            simulator,
            last_access: now,
            evicted: false,
        }
    }

    /// Session identifier.
    pub fn env_id(&self) -> &str {
        &self.env_id
    }

    /// Simulator for this session.
    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    /// Mutable simulator for this session.
    pub fn simulator_mut(&mut self) -> &mut Simulator {
        &mut self.simulator
    }

    /// Time of the last operation on this session.
    pub fn last_access(&self) -> Instant {
        self.last_access
    }

    fn idle(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_access)
    }

    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.idle(now) > ttl
    }
}

/// Listing entry for a live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SessionSummary {
    /// Session identifier.
    pub env_id: EnvId,
    /// Puzzle family the session hosts.
    pub puzzle_type: PuzzleType,
    /// Whole seconds since the last operation.
    pub idle_secs: u64,
}

type SessionHandle = Arc<Mutex<Session>>;

/// Maps session ids to simulators and evicts idle ones.
///
/// Cloning the registry yields another handle to the same sessions.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<EnvId, SessionHandle>>>,
    ttl: Duration,
    max_puzzle_size: u32,
}

impl SessionRegistry {
    /// Creates an empty registry evicting sessions idle for longer than `ttl`.
    #[instrument]
    pub fn new(ttl: Duration) -> Self {
        info!(ttl_secs = ttl.as_secs_f64(), "Creating session registry");
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            max_puzzle_size: DEFAULT_MAX_PUZZLE_SIZE,
        }
    }

    /// Creates a registry using the TTL and size limit from `config`.
    pub fn from_config(config: &SimulatorConfig) -> Self {
        Self::new(config.session_ttl()).with_max_puzzle_size(*config.max_puzzle_size())
    }

    /// Sets the largest accepted `N`.
    pub fn with_max_puzzle_size(mut self, max_puzzle_size: u32) -> Self {
        self.max_puzzle_size = max_puzzle_size;
        self
    }

    /// Idle time after which sessions are evicted.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Largest accepted `N`.
    pub fn max_puzzle_size(&self) -> u32 {
        self.max_puzzle_size
    }

    /// Creates a session for `parameters` and returns its fresh id.
    ///
    /// Expired sessions are swept first.
    ///
    /// # Errors
    ///
    /// [`SimulatorError::InvalidParameters`] if the parameters fail
    /// validation. No session is created in that case.
    #[instrument(skip(self))]
    pub fn create(&self, parameters: PuzzleParameters) -> Result<EnvId, SimulatorError> {
        parameters.validate(self.max_puzzle_size)?;
        self.sweep(Instant::now());

        let simulator = Simulator::new(parameters);
        let mut sessions = self.sessions.write();
        let env_id = loop {
            let candidate = uuid::Uuid::new_v4().to_string();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
            warn!(env_id = %candidate, "Generated id collided, retrying");
        };

        let session = Session::new(env_id.clone(), simulator, Instant::now());
        sessions.insert(env_id.clone(), Arc::new(Mutex::new(session)));
        info!(env_id = %env_id, live = sessions.len(), "Created session");
        Ok(env_id)
    }

    /// Runs `f` with exclusive access to a live session and refreshes its
    /// last-access time.
    ///
    /// A session found expired on access is evicted instead.
    ///
    /// # Errors
    ///
    /// [`SimulatorError::UnknownSession`] if the id is absent, deleted, or
    /// expired.
    #[instrument(skip(self, f))]
    pub fn with_session<R>(
        &self,
        env_id: &str,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R, SimulatorError> {
        let handle = self.handle(env_id)?;
        let mut session = handle.lock();

        // Deleted or swept between the map lookup and acquiring the lock.
        if session.evicted {
            debug!(env_id, "Session evicted while waiting for lock");
            return Err(SimulatorError::unknown_session(env_id));
        }

        let now = Instant::now();
        if session.is_expired(now, self.ttl) {
            session.evicted = true;
            drop(session);
            self.remove_if_same(env_id, &handle);
            info!(env_id, "Evicted expired session on access");
            return Err(SimulatorError::unknown_session(env_id));
        }

        session.last_access = now;
        Ok(f(&mut *session))
    }

    /// Copy of a live session's simulator. Refreshes the session.
    pub fn get(&self, env_id: &str) -> Result<Simulator, SimulatorError> {
        self.with_session(env_id, |session| session.simulator.clone())
    }

    /// Refreshes a session's last-access time.
    pub fn touch(&self, env_id: &str) -> Result<(), SimulatorError> {
        self.with_session(env_id, |_| ())
    }

    /// True if the id maps to a session that has not been evicted yet.
    ///
    /// Does not refresh the session.
    pub fn contains(&self, env_id: &str) -> bool {
        self.sessions.read().contains_key(env_id)
    }

    /// Number of sessions currently held.
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// True when no sessions are held.
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Removes a session. Returns whether a session was removed.
    #[instrument(skip(self))]
    pub fn delete(&self, env_id: &str) -> bool {
        let removed = self.sessions.write().remove(env_id);
        match removed {
            Some(handle) => {
                handle.lock().evicted = true;
                info!(env_id, "Deleted session");
                true
            }
            None => {
                debug!(env_id, "Delete of unknown session");
                false
            }
        }
    }

    /// Summaries of live sessions, sorted by id. Does not refresh them.
    #[instrument(skip(self))]
    pub fn list(&self) -> Vec<SessionSummary> {
        let now = Instant::now();
        let handles: Vec<SessionHandle> = self.sessions.read().values().cloned().collect();
        let mut summaries: Vec<SessionSummary> = handles
            .iter()
            .filter_map(|handle| {
                let session = handle.lock();
                if session.evicted || session.is_expired(now, self.ttl) {
                    return None;
                }
                Some(SessionSummary {
                    env_id: session.env_id.clone(),
                    puzzle_type: session.simulator.parameters().puzzle_type(),
                    idle_secs: session.idle(now).as_secs(),
                })
            })
            .collect();
        summaries.sort_by(|a, b| a.env_id.cmp(&b.env_id));
        debug!(count = summaries.len(), "Listed sessions");
        summaries
    }

    /// Evicts every session idle for longer than the TTL as of `now`.
    ///
    /// Sessions locked by an in-flight operation are skipped; they were just
    /// accessed. Returns the number of sessions evicted.
    #[instrument(skip(self))]
    pub fn sweep(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        let ttl = self.ttl;

        sessions.retain(|env_id, handle| match handle.try_lock() {
            Some(mut session) if session.is_expired(now, ttl) => {
                session.evicted = true;
                debug!(env_id = %env_id, "Evicting idle session");
                false
            }
            Some(_) => true,
            None => true,
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, live = sessions.len(), "Swept expired sessions");
        }
        evicted
    }

    /// Spawns a task that sweeps expired sessions every `interval`.
    ///
    /// Must be called from within a Tokio runtime. The task runs until
    /// aborted.
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        info!(interval_secs = interval.as_secs_f64(), "Starting session sweeper");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                registry.sweep(Instant::now());
            }
        })
    }

    fn handle(&self, env_id: &str) -> Result<SessionHandle, SimulatorError> {
        self.sessions.read().get(env_id).cloned().ok_or_else(|| {
            debug!(env_id, "Session not found");
            SimulatorError::unknown_session(env_id)
        })
    }

    fn remove_if_same(&self, env_id: &str, handle: &SessionHandle) {
        let mut sessions = self.sessions.write();
        if sessions
            .get(env_id)
            .is_some_and(|current| Arc::ptr_eq(current, handle))
        {
            sessions.remove(env_id);
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TTL_SECS))
    }
}
