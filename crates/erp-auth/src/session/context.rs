//! Session context: the single owner of the console's sign-in state.
//!
//! `start()` restores a persisted session (validating or refreshing it)
//! and spawns a task that refreshes the access token shortly before it
//! expires. `shutdown()` stops that task. Everything else observes the
//! state through a `watch` receiver of the current session and a
//! `broadcast` stream of [`AuthStateChange`]s.

use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use erp_core::config::AuthConfig;
use erp_core::error::AppError;
use erp_core::events::{AuthEvent, AuthStateChange};
use erp_core::result::AppResult;
use erp_core::traits::{AccessTokenSource, AuthBackend};
use erp_core::types::{Session, SessionUser};

use crate::jwt::JwtDecoder;

/// Capacity of the auth event channel.
const EVENT_BUFFER: usize = 32;

struct Inner {
    backend: Arc<dyn AuthBackend>,
    decoder: Option<JwtDecoder>,
    magic_link_redirect: Option<String>,
    refresh_margin: Duration,
    session: watch::Sender<Option<Session>>,
    events: broadcast::Sender<AuthStateChange>,
    refresher: Mutex<Option<JoinHandle<()>>>,
}

/// Shared handle to the sign-in state. Cheap to clone.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("backend", &self.inner.backend.provider_type())
            .field("local_verification", &self.inner.decoder.is_some())
            .field("signed_in", &self.is_signed_in())
            .finish()
    }
}

impl SessionContext {
    /// Create a context over `backend`. Nothing happens until [`start`](Self::start).
    pub fn new(backend: Arc<dyn AuthBackend>, config: &AuthConfig) -> Self {
        let decoder = config
            .jwt_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|secret| JwtDecoder::new(secret, config.leeway_seconds));
        let (session, _) = watch::channel(None);
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            inner: Arc::new(Inner {
                backend,
                decoder,
                magic_link_redirect: config.magic_link_redirect.clone(),
                refresh_margin: Duration::seconds(60),
                session,
                events,
                refresher: Mutex::new(None),
            }),
        }
    }

    /// Refresh this long before the access token expires. Builder-style,
    /// call before sharing the context.
    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        if let Some(inner) = Arc::get_mut(&mut self.inner) {
            inner.refresh_margin = margin;
        }
        self
    }

    /// Load the current session and start watching its expiry.
    ///
    /// A `restored` session whose token is expired is refreshed; one the
    /// auth service rejects is dropped. Publishes
    /// [`AuthEvent::InitialSession`] either way.
    pub async fn start(&self, restored: Option<Session>) {
        let session = match restored {
            Some(session) => self.validate_restored(session).await,
            None => None,
        };
        let user_id = session.as_ref().map(|s| s.user.id);
        self.inner.session.send_replace(session);
        self.publish(AuthEvent::InitialSession { user_id });
        info!(signed_in = user_id.is_some(), "Session context started");

        let mut refresher = self
            .inner
            .refresher
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if refresher.as_ref().is_none_or(|handle| handle.is_finished()) {
            *refresher = Some(tokio::spawn(refresh_loop(self.clone())));
        }
    }

    /// Stop watching the session. The current session is kept.
    pub fn shutdown(&self) {
        let handle = self
            .inner
            .refresher
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handle) = handle {
            handle.abort();
            info!("Session context stopped");
        }
    }

    async fn validate_restored(&self, session: Session) -> Option<Session> {
        if session.is_expired_at(Utc::now()) {
            return match self.inner.backend.refresh_session(&session.refresh_token).await {
                Ok(fresh) => Some(fresh),
                Err(e) => {
                    warn!(error = %e, "Stored session could not be refreshed");
                    None
                }
            };
        }
        match self.inner.backend.get_user(&session.access_token).await {
            Ok(user) => Some(Session { user, ..session }),
            Err(e) => {
                warn!(error = %e, "Stored session was rejected");
                None
            }
        }
    }

    /// Sign in with e-mail and password, replacing any current session.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Session> {
        let session = self
            .inner
            .backend
            .sign_in_with_password(email, password)
            .await?;
        self.inner.session.send_replace(Some(session.clone()));
        self.publish(AuthEvent::SignedIn {
            user_id: session.user.id,
            email: session.user.email.clone(),
        });
        Ok(session)
    }

    /// Ask the auth service to e-mail a sign-in link.
    pub async fn request_magic_link(&self, email: &str) -> AppResult<()> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::validation("E-mail is required"));
        }
        self.inner
            .backend
            .sign_in_with_otp(email, self.inner.magic_link_redirect.as_deref())
            .await?;
        self.publish(AuthEvent::MagicLinkRequested {
            email: email.to_string(),
        });
        Ok(())
    }

    /// Adopt a session obtained elsewhere (e.g. by following a magic link).
    pub async fn set_session(&self, session: Session) -> AppResult<Session> {
        let user = self.inner.backend.get_user(&session.access_token).await?;
        let session = Session { user, ..session };
        self.inner.session.send_replace(Some(session.clone()));
        self.publish(AuthEvent::SignedIn {
            user_id: session.user.id,
            email: session.user.email.clone(),
        });
        Ok(session)
    }

    /// Exchange the refresh token for a new session.
    pub async fn refresh(&self) -> AppResult<Session> {
        let refresh_token = self
            .current()
            .map(|s| s.refresh_token)
            .ok_or_else(|| AppError::authentication("Not signed in"))?;
        let session = self.inner.backend.refresh_session(&refresh_token).await?;
        self.inner.session.send_replace(Some(session.clone()));
        self.publish(AuthEvent::TokenRefreshed {
            user_id: session.user.id,
        });
        Ok(session)
    }

    /// End the session. The local state is cleared even when the auth
    /// service cannot be told.
    pub async fn sign_out(&self) {
        let Some(session) = self.inner.session.send_replace(None) else {
            return;
        };
        if let Err(e) = self.inner.backend.sign_out(&session.access_token).await {
            warn!(error = %e, "Auth service sign-out failed");
        }
        self.publish(AuthEvent::SignedOut);
    }

    /// Resolve the user of a bearer token presented to the HTTP surface.
    ///
    /// Verified locally when a JWT secret is configured, otherwise by the
    /// auth service.
    pub async fn authenticate(&self, access_token: &str) -> AppResult<SessionUser> {
        match &self.inner.decoder {
            Some(decoder) => decoder.decode_user(access_token),
            None => self.inner.backend.get_user(access_token).await,
        }
    }

    /// The current session, if any.
    pub fn current(&self) -> Option<Session> {
        self.inner.session.borrow().clone()
    }

    /// Whether a session is present.
    pub fn is_signed_in(&self) -> bool {
        self.inner.session.borrow().is_some()
    }

    /// Observe the current session.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.inner.session.subscribe()
    }

    /// Observe sign-in state changes from now on.
    pub fn events(&self) -> broadcast::Receiver<AuthStateChange> {
        self.inner.events.subscribe()
    }

    fn publish(&self, event: AuthEvent) {
        debug!(?event, "Auth state change");
        // No subscribers is fine.
        let _ = self.inner.events.send(AuthStateChange::new(event));
    }
}

impl AccessTokenSource for SessionContext {
    fn access_token(&self) -> Option<String> {
        self.inner
            .session
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone())
    }
}

async fn refresh_loop(ctx: SessionContext) {
    let mut rx = ctx.subscribe();
    loop {
        let expires_at = rx.borrow_and_update().as_ref().and_then(|s| s.expires_at);
        let Some(expires_at) = expires_at else {
            if rx.changed().await.is_err() {
                return;
            }
            continue;
        };

        let wait = (expires_at - ctx.inner.refresh_margin - Utc::now())
            .to_std()
            .unwrap_or_default();
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return;
                }
            }
            _ = tokio::time::sleep(wait) => {
                if let Err(e) = ctx.refresh().await {
                    warn!(error = %e, "Token refresh failed, signing out");
                    ctx.sign_out().await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryAuthBackend;
    use erp_core::error::ErrorKind;

    async fn context(ttl: Duration) -> (SessionContext, Arc<MemoryAuthBackend>) {
        let backend = Arc::new(MemoryAuthBackend::new("ctx-secret", ttl));
        backend.add_user("ops@example.com", "pw").await;
        let ctx = SessionContext::new(backend.clone(), &AuthConfig::default());
        (ctx, backend)
    }

    #[tokio::test]
    async fn test_sign_in_updates_watchers_and_token_source() {
        let (ctx, _) = context(Duration::minutes(60)).await;
        let mut watcher = ctx.subscribe();
        let mut events = ctx.events();
        assert!(ctx.access_token().is_none());

        let session = ctx
            .sign_in_with_password("ops@example.com", "pw")
            .await
            .expect("sign in");
        watcher.changed().await.expect("changed");
        assert_eq!(watcher.borrow().as_ref(), Some(&session));
        assert_eq!(ctx.access_token(), Some(session.access_token.clone()));
        assert!(matches!(
            events.recv().await.expect("event").event,
            AuthEvent::SignedIn { .. }
        ));

        let user = ctx.authenticate(&session.access_token).await.expect("user");
        assert_eq!(user.id, session.user.id);

        ctx.sign_out().await;
        assert!(!ctx.is_signed_in());
        assert_eq!(events.recv().await.expect("event").event, AuthEvent::SignedOut);
    }

    #[tokio::test]
    async fn test_start_restores_valid_and_drops_rejected_sessions() {
        let (ctx, backend) = context(Duration::minutes(60)).await;
        let valid = backend
            .sign_in_with_password("ops@example.com", "pw")
            .await
            .expect("sign in");
        let mut events = ctx.events();
        ctx.start(Some(valid.clone())).await;
        assert_eq!(
            events.recv().await.expect("event").event,
            AuthEvent::InitialSession {
                user_id: Some(valid.user.id)
            }
        );
        ctx.shutdown();

        let (other, _) = context(Duration::minutes(60)).await;
        let forged = Session {
            access_token: "not-a-jwt".into(),
            ..valid
        };
        other.start(Some(forged)).await;
        assert!(other.current().is_none());
        other.shutdown();
    }

    #[tokio::test]
    async fn test_wrong_password_keeps_signed_out() {
        let (ctx, _) = context(Duration::minutes(60)).await;
        let err = ctx
            .sign_in_with_password("ops@example.com", "nope")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert!(!ctx.is_signed_in());
        assert_eq!(ctx.refresh().await.unwrap_err().kind, ErrorKind::Authentication);
    }

    #[tokio::test(start_paused = true)]
    async fn test_token_refreshed_before_expiry() {
        let (ctx, _) = context(Duration::seconds(120)).await;
        ctx.start(None).await;
        let mut events = ctx.events();
        ctx.sign_in_with_password("ops@example.com", "pw")
            .await
            .expect("sign in");

        let refreshed = tokio::time::timeout(std::time::Duration::from_secs(300), async {
            loop {
                match events.recv().await {
                    Ok(change) => {
                        if let AuthEvent::TokenRefreshed { .. } = change.event {
                            return true;
                        }
                    }
                    Err(_) => return false,
                }
            }
        })
        .await
        .unwrap_or(false);
        assert!(refreshed);
        assert!(ctx.is_signed_in());
        ctx.shutdown();
    }

    #[tokio::test]
    async fn test_magic_link_requires_email() {
        let (ctx, backend) = context(Duration::minutes(60)).await;
        assert!(ctx.request_magic_link("  ").await.is_err());
        ctx.request_magic_link("ops@example.com").await.expect("link");
        assert_eq!(backend.magic_links().await.len(), 1);
    }
}
