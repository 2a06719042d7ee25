//! In-memory doubles for the remote boundary.
//!
//! [`MemoryProvider`] and [`MemoryStore`] implement the boundary
//! traits entirely in memory, with failure and delay injection, so the
//! session and admin layers can be tested without any backend.
//!
//! # Features
//!
//! - Scripted sessions and a role table
//! - Per-call failure injection (transport and rejection failures)
//! - Role-lookup delay injection for timeout tests
//! - A write log for asserting what reorder persistence actually sent
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use vitrine_remote::{testing::MemoryStore, RemoteStore};
//! use vitrine_types::{RecordId, RecordPatch};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let store = MemoryStore::new();
//! store.seed("cards", vec![
//!     json!({"id": "c1", "title": "One", "display_order": 1}),
//!     json!({"id": "c0", "title": "Zero", "display_order": 0}),
//! ]);
//!
//! // list() is ordered by display_order ascending.
//! let rows = store.list("cards").await.expect("list");
//! assert_eq!(rows[0]["id"], "c0");
//!
//! store
//!     .update("cards", &RecordId::new("c1"), RecordPatch::order(0))
//!     .await
//!     .expect("update");
//! assert_eq!(store.write_log().len(), 1);
//! # });
//! ```

use crate::{IdentityProvider, RemoteError, RemoteStore};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;
use vitrine_types::{Identity, IdentityEvent, RecordId, RecordPatch, UserId};

/// Scripted identity provider.
///
/// Holds a current session, a role table, and an event channel. Tests
/// drive it through [`sign_in`](Self::sign_in) /
/// [`sign_out`](Self::sign_out) and the failure/delay knobs.
pub struct MemoryProvider {
    session: Mutex<Option<Identity>>,
    roles: Mutex<HashSet<(String, String)>>,
    fail_sessions: AtomicBool,
    fail_roles: AtomicBool,
    role_delay: Mutex<Option<Duration>>,
    events: broadcast::Sender<IdentityEvent>,
}

impl MemoryProvider {
    /// Creates a provider with no session and no roles.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            session: Mutex::new(None),
            roles: Mutex::new(HashSet::new()),
            fail_sessions: AtomicBool::new(false),
            fail_roles: AtomicBool::new(false),
            role_delay: Mutex::new(None),
            events,
        }
    }

    /// Creates a provider already signed in as `identity`.
    #[must_use]
    pub fn signed_in(identity: Identity) -> Self {
        let provider = Self::new();
        *provider.session.lock() = Some(identity);
        provider
    }

    /// Adds `role` for `user_id` to the role table.
    pub fn grant_role(&self, user_id: &UserId, role: &str) {
        self.roles
            .lock()
            .insert((user_id.as_str().to_string(), role.to_string()));
    }

    /// Signs `identity` in: updates the scripted session and emits
    /// [`IdentityEvent::SignedIn`].
    pub fn sign_in(&self, identity: Identity) {
        *self.session.lock() = Some(identity.clone());
        let _ = self.events.send(IdentityEvent::SignedIn(identity));
    }

    /// Replaces the current token and emits
    /// [`IdentityEvent::TokenRefreshed`].
    pub fn refresh_token(&self, identity: Identity) {
        *self.session.lock() = Some(identity.clone());
        let _ = self.events.send(IdentityEvent::TokenRefreshed(identity));
    }

    /// Ends the session and emits [`IdentityEvent::SignedOut`].
    pub fn sign_out(&self) {
        *self.session.lock() = None;
        let _ = self.events.send(IdentityEvent::SignedOut);
    }

    /// Makes subsequent [`get_session`](IdentityProvider::get_session)
    /// calls fail with a transport error.
    pub fn set_fail_sessions(&self, fail: bool) {
        self.fail_sessions.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent [`has_role`](IdentityProvider::has_role) calls
    /// fail with a transport error.
    pub fn set_fail_roles(&self, fail: bool) {
        self.fail_roles.store(fail, Ordering::SeqCst);
    }

    /// Delays every role lookup by `delay`. Used to force timeouts.
    pub fn set_role_delay(&self, delay: Duration) {
        *self.role_delay.lock() = Some(delay);
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for MemoryProvider {
    async fn get_session(&self) -> Result<Option<Identity>, RemoteError> {
        if self.fail_sessions.load(Ordering::SeqCst) {
            return Err(RemoteError::Transport("scripted session failure".into()));
        }
        Ok(self.session.lock().clone())
    }

    async fn has_role(&self, user_id: &UserId, role: &str) -> Result<bool, RemoteError> {
        let delay = *self.role_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_roles.load(Ordering::SeqCst) {
            return Err(RemoteError::Transport("scripted role failure".into()));
        }
        let held = self
            .roles
            .lock()
            .contains(&(user_id.as_str().to_string(), role.to_string()));
        Ok(held)
    }

    fn subscribe(&self) -> broadcast::Receiver<IdentityEvent> {
        self.events.subscribe()
    }
}

/// One write accepted (or refused) by [`MemoryStore::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    /// Collection that was addressed.
    pub collection: String,
    /// Row that was addressed.
    pub id: RecordId,
    /// Patch that was sent.
    pub patch: RecordPatch,
}

/// In-memory row store with failure injection.
///
/// Rows are kept as raw JSON, matching the boundary contract. Every
/// call to [`update`](RemoteStore::update) is appended to the write
/// log before the failure knobs are consulted, so tests can assert on
/// what was attempted even when the write was scripted to fail.
pub struct MemoryStore {
    rows: Mutex<HashMap<String, Vec<Value>>>,
    fail_lists: AtomicBool,
    fail_updates: AtomicBool,
    fail_update_for: Mutex<Option<RecordId>>,
    write_log: Mutex<Vec<WriteRecord>>,
    list_calls: AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            fail_lists: AtomicBool::new(false),
            fail_updates: AtomicBool::new(false),
            fail_update_for: Mutex::new(None),
            write_log: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Replaces the rows of `collection`.
    pub fn seed(&self, collection: &str, rows: Vec<Value>) {
        self.rows.lock().insert(collection.to_string(), rows);
    }

    /// Makes every list call fail with a transport error.
    pub fn set_fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    /// Makes every update call fail with a rejection.
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Makes updates for one specific row fail, leaving the rest of a
    /// batch to succeed. This is how partial-batch failure is staged.
    pub fn set_fail_update_for(&self, id: Option<RecordId>) {
        *self.fail_update_for.lock() = id;
    }

    /// Returns how many list calls have been made, whether or not
    /// they succeeded. Lets tests prove a collection was never fetched.
    #[must_use]
    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Returns every update attempted so far.
    #[must_use]
    pub fn write_log(&self) -> Vec<WriteRecord> {
        self.write_log.lock().clone()
    }

    /// Returns the rows of `collection` as currently stored, in
    /// insertion order (unsorted).
    #[must_use]
    pub fn raw_rows(&self, collection: &str) -> Vec<Value> {
        self.rows.lock().get(collection).cloned().unwrap_or_default()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteStore for MemoryStore {
    async fn list(&self, collection: &str) -> Result<Vec<Value>, RemoteError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(RemoteError::Transport("scripted list failure".into()));
        }
        let mut rows = self
            .rows
            .lock()
            .get(collection)
            .cloned()
            .unwrap_or_default();
        rows.sort_by_key(|row| row.get("display_order").and_then(Value::as_u64).unwrap_or(0));
        Ok(rows)
    }

    async fn update(
        &self,
        collection: &str,
        id: &RecordId,
        patch: RecordPatch,
    ) -> Result<(), RemoteError> {
        self.write_log.lock().push(WriteRecord {
            collection: collection.to_string(),
            id: id.clone(),
            patch,
        });

        if self.fail_updates.load(Ordering::SeqCst)
            || self.fail_update_for.lock().as_ref() == Some(id)
        {
            return Err(RemoteError::Rejected("scripted update failure".into()));
        }

        let mut rows = self.rows.lock();
        let row = rows
            .get_mut(collection)
            .and_then(|rows| {
                rows.iter_mut()
                    .find(|row| row.get("id").and_then(Value::as_str) == Some(id.as_str()))
            })
            .ok_or_else(|| RemoteError::NotFound {
                collection: collection.to_string(),
                id: id.clone(),
            })?;
        if let Some(order) = patch.display_order {
            row["display_order"] = Value::from(order);
        }
        if let Some(visible) = patch.visible {
            row["visible"] = Value::from(visible);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &RecordId) -> Result<(), RemoteError> {
        let mut rows = self.rows.lock();
        let list = rows
            .get_mut(collection)
            .ok_or_else(|| RemoteError::NotFound {
                collection: collection.to_string(),
                id: id.clone(),
            })?;
        let before = list.len();
        list.retain(|row| row.get("id").and_then(Value::as_str) != Some(id.as_str()));
        if list.len() == before {
            return Err(RemoteError::NotFound {
                collection: collection.to_string(),
                id: id.clone(),
            });
        }
        Ok(())
    }
}
