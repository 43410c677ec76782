//! # Session Store
//!
//! Owns the authenticated user and its persisted session.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Session Lifecycle                                 │
//! │                                                                         │
//! │  1. RESTORE (process start)                                            │
//! │     └── read "user" + "sessionExpiry"                                  │
//! │         ├── both valid, expiry in future → session restored            │
//! │         └── expired / malformed / partial → both keys cleared          │
//! │                                                                         │
//! │  2. LOGIN                                                              │
//! │     └── latency ──► match demo credentials                             │
//! │         ├── match → session, expiry = now + 24h, persist both keys     │
//! │         └── miss  → false, nothing changes                             │
//! │                                                                         │
//! │  3. UPDATE                                                             │
//! │     └── merge patch into user, re-persist "user"                       │
//! │                                                                         │
//! │  4. LOGOUT                                                             │
//! │     └── clear memory, remove both keys (idempotent)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persisted Format
//! - `user`: JSON `{ "id", "email", "name", "role", "avatar"? }`
//! - `sessionExpiry`: decimal Unix-epoch milliseconds, e.g. `"1793577600000"`

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use turf_core::{Role, User, UserPatch, SESSION_TTL_HOURS};

use crate::clock::Clock;
use crate::delay::simulate_latency;
use crate::storage::KeyValueStorage;

/// Storage key holding the serialized user record.
pub const USER_KEY: &str = "user";

/// Storage key holding the session expiry in epoch milliseconds.
pub const EXPIRY_KEY: &str = "sessionExpiry";

// =============================================================================
// Configuration
// =============================================================================

/// Tunables for the session store.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Absolute session lifetime from login.
    pub ttl: Duration,
    /// Simulated network latency for `login`.
    pub login_latency: StdDuration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            ttl: Duration::hours(SESSION_TTL_HOURS),
            login_latency: StdDuration::from_millis(1000),
        }
    }
}

// =============================================================================
// Demo Credentials
// =============================================================================

/// A fixed account accepted by `login`.
#[derive(Debug, Clone, Copy)]
pub struct DemoAccount {
    pub id: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub name: &'static str,
    pub role: Role,
}

impl DemoAccount {
    fn to_user(self) -> User {
        User {
            id: self.id.to_string(),
            email: self.email.to_string(),
            name: self.name.to_string(),
            role: self.role,
            avatar: None,
        }
    }
}

/// The credential set `login` matches against.
pub const DEMO_ACCOUNTS: &[DemoAccount] = &[
    DemoAccount {
        id: "1",
        email: "player@turf.com",
        password: "player123",
        name: "Demo Player",
        role: Role::Player,
    },
    DemoAccount {
        id: "2",
        email: "owner@turf.com",
        password: "owner123",
        name: "Turf Owner",
        role: Role::TurfOwner,
    },
    DemoAccount {
        id: "3",
        email: "admin@turf.com",
        password: "admin123",
        name: "Platform Admin",
        role: Role::Admin,
    },
];

fn find_account(email: &str, password: &str) -> Option<DemoAccount> {
    DEMO_ACCOUNTS
        .iter()
        .find(|a| a.email == email && a.password == password)
        .copied()
}

// =============================================================================
// Restore
// =============================================================================

/// What the persisted keys held at startup.
#[derive(Debug)]
enum Persisted {
    Active { user: User, expires_at: DateTime<Utc> },
    Absent,
    Expired,
    Corrupt(String),
}

fn read_persisted(storage: &dyn KeyValueStorage, now: DateTime<Utc>) -> Persisted {
    let user_raw = match storage.get(USER_KEY) {
        Ok(v) => v,
        Err(e) => return Persisted::Corrupt(e.to_string()),
    };
    let expiry_raw = match storage.get(EXPIRY_KEY) {
        Ok(v) => v,
        Err(e) => return Persisted::Corrupt(e.to_string()),
    };

    let (user_raw, expiry_raw) = match (user_raw, expiry_raw) {
        (None, None) => return Persisted::Absent,
        (Some(u), Some(e)) => (u, e),
        _ => return Persisted::Corrupt("only one session key present".to_string()),
    };

    let user: User = match serde_json::from_str(&user_raw) {
        Ok(user) => user,
        Err(e) => return Persisted::Corrupt(format!("user record: {}", e)),
    };

    let expires_at = match expiry_raw
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    {
        Some(at) => at,
        None => return Persisted::Corrupt(format!("session expiry: {:?}", expiry_raw)),
    };

    if now >= expires_at {
        return Persisted::Expired;
    }

    Persisted::Active { user, expires_at }
}

// =============================================================================
// Session Store
// =============================================================================

#[derive(Debug, Default)]
struct SessionState {
    user: Option<User>,
    expires_at: Option<DateTime<Utc>>,
}

/// Owns the authenticated user.
///
/// ## Concurrency
/// `loading` is a plain flag: two overlapping `login` calls both run, and the
/// one finishing last decides the session. The state mutex is never held
/// across the simulated latency.
#[derive(Debug)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
    state: Mutex<SessionState>,
    loading: AtomicBool,
    teardown: CancellationToken,
}

impl SessionStore {
    /// Builds the store and restores a persisted session if one is valid.
    ///
    /// Expired, partial or unreadable sessions clear both keys and start
    /// logged out. Nothing here fails.
    pub fn restore(
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
        config: SessionConfig,
    ) -> Self {
        let store = SessionStore {
            storage,
            clock,
            config,
            state: Mutex::new(SessionState::default()),
            loading: AtomicBool::new(false),
            teardown: CancellationToken::new(),
        };

        match read_persisted(store.storage.as_ref(), store.clock.now()) {
            Persisted::Active { user, expires_at } => {
                info!(user_id = %user.id, role = %user.role, %expires_at, "Session restored");
                let mut state = store.lock_state();
                state.user = Some(user);
                state.expires_at = Some(expires_at);
            }
            Persisted::Absent => debug!("No persisted session"),
            Persisted::Expired => {
                info!("Persisted session expired, clearing");
                store.clear_persisted();
            }
            Persisted::Corrupt(reason) => {
                warn!(%reason, "Persisted session unreadable, clearing");
                store.clear_persisted();
            }
        }

        store
    }

    /// Attempts to sign in against the demo credential set.
    ///
    /// ## Returns
    /// - `true`: session established and persisted
    /// - `false`: credentials did not match, or the store was torn down
    ///   while the simulated request was in flight
    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.loading.store(true, Ordering::SeqCst);
        debug!(%email, "Login started");

        let outcome = match simulate_latency(self.config.login_latency, &self.teardown).await {
            Err(_) => {
                debug!(%email, "Login abandoned");
                false
            }
            Ok(()) => match find_account(email, password) {
                Some(account) => {
                    self.establish(account.to_user());
                    true
                }
                None => {
                    info!(%email, "Login rejected");
                    false
                }
            },
        };

        self.loading.store(false, Ordering::SeqCst);
        outcome
    }

    /// Clears the session and both persisted keys. Safe to call repeatedly.
    pub fn logout(&self) {
        let previous = {
            let mut state = self.lock_state();
            state.expires_at = None;
            state.user.take()
        };
        self.clear_persisted();
        if let Some(user) = previous {
            info!(user_id = %user.id, "Logged out");
        }
    }

    /// Merges `patch` into the current user and re-persists it.
    ///
    /// Returns the updated user, or `None` when nobody is signed in.
    pub fn update_user(&self, patch: UserPatch) -> Option<User> {
        let updated = {
            let mut state = self.lock_state();
            let user = state.user.as_mut()?;
            user.apply(patch);
            user.clone()
        };
        self.persist_user(&updated);
        debug!(user_id = %updated.id, "Session user updated");
        Some(updated)
    }

    pub fn current_user(&self) -> Option<User> {
        self.lock_state().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock_state().user.is_some()
    }

    /// True while a `login` call is waiting on its simulated latency.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.lock_state().expires_at
    }

    /// Abandons any in-flight `login`. Later logins fail immediately.
    pub fn teardown(&self) {
        self.teardown.cancel();
    }

    fn establish(&self, user: User) {
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(self.config.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        {
            let mut state = self.lock_state();
            state.user = Some(user.clone());
            state.expires_at = Some(expires_at);
        }
        self.persist_user(&user);
        if let Err(e) = self
            .storage
            .set(EXPIRY_KEY, &expires_at.timestamp_millis().to_string())
        {
            error!(error = %e, "Failed to persist session expiry");
        }
        info!(user_id = %user.id, role = %user.role, %expires_at, "Session established");
    }

    fn persist_user(&self, user: &User) {
        let encoded = match serde_json::to_string(user) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(error = %e, "Failed to encode session user");
                return;
            }
        };
        if let Err(e) = self.storage.set(USER_KEY, &encoded) {
            error!(error = %e, "Failed to persist session user");
        }
    }

    fn clear_persisted(&self) {
        for key in [USER_KEY, EXPIRY_KEY] {
            if let Err(e) = self.storage.remove(key) {
                error!(%key, error = %e, "Failed to clear session key");
            }
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
