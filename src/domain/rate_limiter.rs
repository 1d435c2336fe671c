//! Fixed-window per-client rate limiter.
//!
//! Each client gets `limit` admissions per `window`. The window starts at the
//! first admitted request and is replaced wholesale once it has elapsed; there
//! is no sliding or token refill inside a window.
//!
//! State lives in a sharded concurrent map. The entry guard for a client key is
//! the critical section for that client, so concurrent admissions for the same
//! client are serialized and can never exceed `limit` in one window.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::time::Duration;
use tokio::time::Instant;

/// Errors raised when constructing a [`RateLimiter`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RateLimiterError {
    #[error("rate limit must be greater than 0")]
    ZeroLimit,

    #[error("rate limit window must be greater than 0")]
    ZeroWindow,
}

/// Window state for a single client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientWindow {
    /// Requests admitted in the current window.
    pub count: u32,
    pub window_start: Instant,
    /// Time of the last admitted request; drives sweeping.
    pub last_seen: Instant,
}

impl ClientWindow {
    fn open(now: Instant) -> Self {
        Self {
            count: 1,
            window_start: now,
            last_seen: now,
        }
    }
}

/// In-memory fixed-window rate limiter keyed by client identifier.
#[derive(Debug)]
pub struct RateLimiter {
    clients: DashMap<String, ClientWindow>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    /// Creates a limiter admitting `limit` requests per `window` per client.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimiterError`] if `limit` or `window` is zero.
    pub fn new(limit: u32, window: Duration) -> Result<Self, RateLimiterError> {
        if limit == 0 {
            return Err(RateLimiterError::ZeroLimit);
        }
        if window.is_zero() {
            return Err(RateLimiterError::ZeroWindow);
        }

        Ok(Self {
            clients: DashMap::new(),
            limit,
            window,
        })
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }

    /// Returns a copy of the window state for a client, if tracked.
    pub fn client_window(&self, client_id: &str) -> Option<ClientWindow> {
        self.clients.get(client_id).map(|entry| *entry)
    }

    /// Decides whether a request from `client_id` is admitted now.
    pub fn admit(&self, client_id: &str) -> bool {
        self.admit_at(client_id, Instant::now())
    }

    /// Decides whether a request from `client_id` is admitted at `now`.
    ///
    /// A rejected request leaves the client's state untouched.
    pub fn admit_at(&self, client_id: &str, now: Instant) -> bool {
        match self.clients.entry(client_id.to_owned()) {
            Entry::Vacant(vacant) => {
                vacant.insert(ClientWindow::open(now));
                true
            }
            Entry::Occupied(mut occupied) => {
                let state = occupied.get_mut();

                if now.saturating_duration_since(state.window_start) > self.window {
                    *state = ClientWindow::open(now);
                    return true;
                }

                if state.count >= self.limit {
                    return false;
                }

                state.count += 1;
                state.last_seen = now;
                true
            }
        }
    }

    /// Removes clients idle for more than twice the window.
    ///
    /// Returns the number of removed entries.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    /// Removes clients whose last admitted request is older than `2 * window`
    /// relative to `now`.
    pub fn sweep_at(&self, now: Instant) -> usize {
        let max_idle = self.window.saturating_mul(2);
        let mut removed = 0;

        self.clients.retain(|_, state| {
            let keep = now.saturating_duration_since(state.last_seen) <= max_idle;
            if !keep {
                removed += 1;
            }
            keep
        });

        removed
    }
}
