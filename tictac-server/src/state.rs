//! Server state management
//!
//! Every game session lives behind one lock. Engine searches run outside
//! it on a copy of the session board, so a search never blocks other
//! sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tictac_core::{GameConfig, GameSession, Mode};

pub type SessionId = u64;

/// Sessions kept before the least recently used one is evicted
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

struct SessionEntry {
    session: GameSession,
    /// Tick of the last write access
    last_active: u64,
}

/// Server-wide shared state
pub struct ServerState {
    pub config: GameConfig,
    max_sessions: usize,
    sessions: RwLock<HashMap<SessionId, SessionEntry>>,
    next_id: AtomicU64,
    clock: AtomicU64,
}

impl ServerState {
    pub fn new(config: GameConfig) -> Self {
        Self::with_capacity(config, DEFAULT_MAX_SESSIONS)
    }

    /// State holding at most `max_sessions` sessions (at least one)
    pub fn with_capacity(config: GameConfig, max_sessions: usize) -> Self {
        Self {
            config,
            max_sessions: max_sessions.max(1),
            sessions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            clock: AtomicU64::new(0),
        }
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Start a new session, using the configured mode unless one is given.
    ///
    /// At capacity the session idle the longest is dropped first.
    pub fn create_session(&self, mode: Option<Mode>) -> (SessionId, GameSession) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let session = GameSession::new(mode.unwrap_or(self.config.mode));

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        while sessions.len() >= self.max_sessions {
            let idle = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_active)
                .map(|(&idle, _)| idle);
            match idle {
                Some(idle) => {
                    sessions.remove(&idle);
                    tracing::info!(id = idle, "idle session evicted");
                }
                None => break,
            }
        }
        sessions.insert(
            id,
            SessionEntry {
                session: session.clone(),
                last_active: self.tick(),
            },
        );
        drop(sessions);

        tracing::info!(id, mode = %session.mode(), "session created");
        (id, session)
    }

    /// Drop a session. Returns false if it did not exist.
    pub fn remove_session(&self, id: SessionId) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some();
        if removed {
            tracing::info!(id, "session removed");
        }
        removed
    }

    /// Read access to one session
    pub fn with_session<R>(&self, id: SessionId, f: impl FnOnce(&GameSession) -> R) -> Option<R> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions.get(&id).map(|entry| f(&entry.session))
    }

    /// Write access to one session; marks it active
    pub fn with_session_mut<R>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut GameSession) -> R,
    ) -> Option<R> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.get_mut(&id).map(|entry| {
            entry.last_active = self.tick();
            f(&mut entry.session)
        })
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    pub fn session_count(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Restart session `id` after the configured delay, unless it has been
    /// restarted in the meantime.
    pub fn schedule_restart(self: &Arc<Self>, id: SessionId, generation: u64) {
        let delay = self.config.restart_delay();
        let state = Arc::clone(self);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let restarted = state.with_session_mut(id, |session| {
                if session.generation() == generation && session.is_over() {
                    session.restart();
                    true
                } else {
                    false
                }
            });
            if restarted == Some(true) {
                tracing::info!(id, "finished game restarted");
            }
        });
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
