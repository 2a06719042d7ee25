//! Session store: cached identity plus derived authorization.
//!
//! One [`SessionStore`] is owned by exactly one mounted view. It
//! mirrors the identity provider's state through two write paths that
//! funnel into the same locked slot:
//!
//! - the **listener** (spawned by [`attach`](SessionStore::attach))
//!   applies every [`IdentityEvent`] unconditionally and bumps the
//!   slot's write epoch
//! - the **initial fetch** ([`refresh`](SessionStore::refresh)) seeds
//!   the slot only while the epoch is still zero
//!
//! First writer wins within the mount; a sign-out event that lands
//! while the initial fetch is still in flight cannot be clobbered by
//! the fetch resolving with the stale, signed-in session.

use crate::SessionError;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use vitrine_remote::{IdentityProvider, ROLE_ADMIN};
use vitrine_types::{AuthStatus, ErrorCode, Identity, IdentityEvent, UserId};

/// Session layer tuning.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Hard deadline for the admin role lookup. On expiry the check
    /// fails closed.
    pub role_check_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            role_check_timeout: Duration::from_secs(3),
        }
    }
}

/// Cached identity plus the derived authorization fact.
struct Slot {
    identity: Option<Identity>,
    status: AuthStatus,
    /// Counts writes within this mount. Zero means nothing has written
    /// yet, so the initial fetch may seed.
    write_epoch: u64,
}

impl Slot {
    fn new() -> Self {
        Self {
            identity: None,
            status: AuthStatus::Unknown,
            write_epoch: 0,
        }
    }
}

/// Single source of truth for "who is the current user, and are they
/// an admin".
///
/// # Ownership
///
/// Owned by exactly one subscribing view at a time. A fresh view mount
/// gets a fresh store; the listener registration is once per store
/// lifetime and the guard returned by [`attach`](Self::attach) tears
/// it down on drop.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vitrine_remote::testing::MemoryProvider;
/// use vitrine_session::SessionStore;
/// use vitrine_types::{AuthStatus, Identity, UserId};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let provider = Arc::new(MemoryProvider::signed_in(Identity::new(
///     UserId::new("u1"),
///     "tok",
/// )));
/// let store = Arc::new(SessionStore::new(provider));
///
/// let _guard = store.mount().await.expect("mount");
/// assert!(store.identity().is_some());
/// assert_eq!(store.status(), AuthStatus::Unknown); // role not confirmed yet
/// # });
/// ```
pub struct SessionStore<P> {
    provider: Arc<P>,
    slot: Mutex<Slot>,
    attached: AtomicBool,
    config: SessionConfig,
}

impl<P> SessionStore<P> {
    /// Creates a store with the default config (3 second role
    /// deadline).
    #[must_use]
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_config(provider, SessionConfig::default())
    }

    /// Creates a store with explicit tuning.
    #[must_use]
    pub fn with_config(provider: Arc<P>, config: SessionConfig) -> Self {
        Self {
            provider,
            slot: Mutex::new(Slot::new()),
            attached: AtomicBool::new(false),
            config,
        }
    }

    /// Synchronous read of the cached identity.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.slot.lock().identity.clone()
    }

    /// Synchronous read of the derived authorization status.
    #[must_use]
    pub fn status(&self) -> AuthStatus {
        self.slot.lock().status
    }

    /// Clears identity and status synchronously.
    ///
    /// Called on sign-out; by the time this returns, no identity or
    /// admin fact remains in the store.
    pub fn sign_out(&self) {
        let mut slot = self.slot.lock();
        slot.identity = None;
        slot.status = AuthStatus::Unauthenticated;
        slot.write_epoch += 1;
        debug!("session cleared");
    }

    /// Applies a provider event. Events are authoritative: they always
    /// write, regardless of what seeded the slot.
    fn apply_event(&self, event: IdentityEvent) {
        let mut slot = self.slot.lock();
        slot.write_epoch += 1;
        match event {
            IdentityEvent::SignedIn(identity) => {
                debug!(user = %identity.user_id, "identity event: signed in");
                slot.identity = Some(identity);
                // A new sign-in invalidates any previous role fact.
                slot.status = AuthStatus::Unknown;
            }
            IdentityEvent::TokenRefreshed(identity) => {
                let same_user = slot
                    .identity
                    .as_ref()
                    .is_some_and(|current| current.user_id == identity.user_id);
                slot.identity = Some(identity);
                if !same_user {
                    slot.status = AuthStatus::Unknown;
                }
            }
            IdentityEvent::SignedOut => {
                debug!("identity event: signed out");
                slot.identity = None;
                slot.status = AuthStatus::Unauthenticated;
            }
        }
    }

    /// Seeds the slot from the initial fetch. Applies only while no
    /// other writer has touched the slot in this mount.
    fn seed(&self, fetched: Option<Identity>) {
        let mut slot = self.slot.lock();
        if slot.write_epoch != 0 {
            debug!("initial fetch lost the race, keeping listener state");
            return;
        }
        slot.write_epoch += 1;
        slot.status = if fetched.is_some() {
            AuthStatus::Unknown
        } else {
            AuthStatus::Unauthenticated
        };
        slot.identity = fetched;
    }

    /// Records the outcome of a completed role lookup, but only for
    /// the identity currently in the slot.
    fn confirm_role(&self, user_id: &UserId, is_admin: bool) {
        let mut slot = self.slot.lock();
        let current = slot
            .identity
            .as_ref()
            .is_some_and(|identity| &identity.user_id == user_id);
        if !current {
            debug!(user = %user_id, "discarding role fact for a stale identity");
            return;
        }
        slot.status = if is_admin {
            AuthStatus::Admin
        } else {
            AuthStatus::NonAdmin
        };
    }
}

impl<P: IdentityProvider + 'static> SessionStore<P> {
    /// Registers the identity listener. Exactly once per store
    /// lifetime; a second call is refused.
    ///
    /// The returned [`SessionSubscription`] aborts the listener task
    /// when dropped, which is the teardown path for the owning view.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ListenerAttached`] if a listener was
    /// already registered.
    pub fn attach(self: &Arc<Self>) -> Result<SessionSubscription, SessionError> {
        if self.attached.swap(true, Ordering::SeqCst) {
            warn!("refusing duplicate identity listener registration");
            return Err(SessionError::ListenerAttached);
        }

        let mut rx = self.provider.subscribe();
        let store = Arc::clone(self);
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => store.apply_event(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "identity event stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        Ok(SessionSubscription { handle })
    }

    /// Asks the provider for the current session and reconciles it
    /// into the slot (first writer wins).
    ///
    /// Fails soft: a provider error is logged and the cached state is
    /// left untouched. Returns the slot's identity after
    /// reconciliation, which is `None` when nothing is known.
    pub async fn refresh(&self) -> Option<Identity> {
        match self.provider.get_session().await {
            Ok(fetched) => self.seed(fetched),
            Err(err) => {
                let err = SessionError::ProviderUnreachable(err);
                warn!(code = err.code(), error = %err, "identity refresh failed soft");
            }
        }
        self.identity()
    }

    /// Mounts the store: listener first, then the initial fetch.
    ///
    /// This is the listen-before-poll entry point views should use.
    /// Returns the listener guard; dropping it detaches.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ListenerAttached`] if already mounted.
    pub async fn mount(self: &Arc<Self>) -> Result<SessionSubscription, SessionError> {
        let subscription = self.attach()?;
        let _ = self.refresh().await;
        Ok(subscription)
    }

    /// Looks up whether `user_id` holds the admin role.
    ///
    /// Applies a hard deadline
    /// ([`SessionConfig::role_check_timeout`], 3 s by default) and
    /// fails closed: timeout or provider failure both resolve to
    /// `false`. The confirmed fact is recorded in
    /// [`status`](Self::status) when the slot still holds the same
    /// user.
    pub async fn check_admin_role(&self, user_id: &UserId) -> bool {
        let lookup = self.provider.has_role(user_id, ROLE_ADMIN);
        let is_admin = match tokio::time::timeout(self.config.role_check_timeout, lookup).await {
            Ok(Ok(held)) => held,
            Ok(Err(err)) => {
                let err = SessionError::ProviderUnreachable(err);
                warn!(code = err.code(), error = %err, "role lookup failed, failing closed");
                false
            }
            Err(_) => {
                let err = SessionError::RoleCheckTimeout;
                warn!(
                    code = err.code(),
                    deadline_ms = self.config.role_check_timeout.as_millis() as u64,
                    "role lookup timed out, failing closed"
                );
                false
            }
        };
        self.confirm_role(user_id, is_admin);
        is_admin
    }
}

/// Guard for the spawned identity listener.
///
/// Dropping it aborts the listener task, which is the unsubscribe on
/// view teardown.
pub struct SessionSubscription {
    handle: JoinHandle<()>,
}

impl SessionSubscription {
    /// Detaches the listener now instead of at drop.
    pub fn detach(self) {
        // Drop does the work.
    }
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, Duration};
    use vitrine_remote::testing::MemoryProvider;

    fn identity(user: &str) -> Identity {
        Identity::new(UserId::new(user), format!("tok_{user}"))
    }

    fn store_with(provider: MemoryProvider) -> Arc<SessionStore<MemoryProvider>> {
        Arc::new(SessionStore::new(Arc::new(provider)))
    }

    #[tokio::test]
    async fn refresh_seeds_identity() {
        let store = store_with(MemoryProvider::signed_in(identity("u1")));
        assert_eq!(store.identity(), None);

        let seeded = store.refresh().await;
        assert_eq!(seeded.expect("identity").user_id, UserId::new("u1"));
        assert_eq!(store.status(), AuthStatus::Unknown);
    }

    #[tokio::test]
    async fn refresh_with_no_session_is_unauthenticated() {
        let store = store_with(MemoryProvider::new());
        assert_eq!(store.refresh().await, None);
        assert_eq!(store.status(), AuthStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn refresh_fails_soft_on_provider_error() {
        let provider = MemoryProvider::signed_in(identity("u1"));
        provider.set_fail_sessions(true);
        let store = store_with(provider);

        assert_eq!(store.refresh().await, None);
        // Error is not "signed out": status stays unknown.
        assert_eq!(store.status(), AuthStatus::Unknown);
    }

    #[tokio::test]
    async fn listener_event_beats_initial_fetch() {
        let store = store_with(MemoryProvider::signed_in(identity("stale")));

        // Simulate the race: a sign-out lands before the initial fetch
        // resolves. The fetch must not clobber it.
        store.apply_event(IdentityEvent::SignedOut);
        let after = store.refresh().await;

        assert_eq!(after, None);
        assert_eq!(store.status(), AuthStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn mounted_store_sees_live_events() {
        let provider = Arc::new(MemoryProvider::new());
        let store = Arc::new(SessionStore::new(Arc::clone(&provider)));
        let _guard = store.mount().await.expect("mount");

        provider.sign_in(identity("u1"));
        // Listener runs on a spawned task.
        sleep(Duration::from_millis(20)).await;

        assert_eq!(store.identity().expect("identity").user_id, UserId::new("u1"));

        provider.sign_out();
        sleep(Duration::from_millis(20)).await;
        assert_eq!(store.identity(), None);
        assert_eq!(store.status(), AuthStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn dropped_guard_stops_applying_events() {
        let provider = Arc::new(MemoryProvider::new());
        let store = Arc::new(SessionStore::new(Arc::clone(&provider)));
        let guard = store.mount().await.expect("mount");

        provider.sign_in(identity("u1"));
        sleep(Duration::from_millis(20)).await;
        assert!(store.identity().is_some());

        drop(guard);
        // Let the abort land before the next event fires.
        sleep(Duration::from_millis(20)).await;

        provider.sign_out();
        sleep(Duration::from_millis(20)).await;

        // Listener is gone; the store keeps its last state.
        assert!(store.identity().is_some());
        assert_eq!(store.status(), AuthStatus::Unknown);
    }

    #[tokio::test]
    async fn duplicate_attach_is_refused() {
        let store = store_with(MemoryProvider::new());
        let _first = store.attach().expect("first attach");
        assert!(matches!(
            store.attach(),
            Err(SessionError::ListenerAttached)
        ));
    }

    #[tokio::test]
    async fn role_check_confirms_admin() {
        let provider = MemoryProvider::signed_in(identity("u1"));
        provider.grant_role(&UserId::new("u1"), "admin");
        let store = store_with(provider);
        store.refresh().await;

        assert!(store.check_admin_role(&UserId::new("u1")).await);
        assert_eq!(store.status(), AuthStatus::Admin);
    }

    #[tokio::test]
    async fn role_check_fails_closed_on_error() {
        let provider = MemoryProvider::signed_in(identity("u1"));
        provider.grant_role(&UserId::new("u1"), "admin");
        provider.set_fail_roles(true);
        let store = store_with(provider);
        store.refresh().await;

        assert!(!store.check_admin_role(&UserId::new("u1")).await);
        assert_eq!(store.status(), AuthStatus::NonAdmin);
    }

    #[tokio::test]
    async fn role_check_fails_closed_on_timeout() {
        let provider = MemoryProvider::signed_in(identity("u1"));
        provider.grant_role(&UserId::new("u1"), "admin");
        provider.set_role_delay(Duration::from_millis(250));
        let store = Arc::new(SessionStore::with_config(
            Arc::new(provider),
            SessionConfig {
                role_check_timeout: Duration::from_millis(25),
            },
        ));
        store.refresh().await;

        assert!(!store.check_admin_role(&UserId::new("u1")).await);
    }

    #[tokio::test]
    async fn stale_role_fact_is_discarded() {
        let provider = MemoryProvider::signed_in(identity("u1"));
        provider.grant_role(&UserId::new("u1"), "admin");
        let store = store_with(provider);
        store.refresh().await;

        // The user signs out while their role lookup is in flight;
        // the confirmation must not resurrect an admin status.
        store.sign_out();
        store.confirm_role(&UserId::new("u1"), true);

        assert_eq!(store.status(), AuthStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn sign_out_clears_synchronously() {
        let store = store_with(MemoryProvider::signed_in(identity("u1")));
        store.refresh().await;
        assert!(store.identity().is_some());

        store.sign_out();
        assert_eq!(store.identity(), None);
        assert_eq!(store.status(), AuthStatus::Unauthenticated);
    }
}
