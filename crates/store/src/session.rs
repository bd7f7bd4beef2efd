//! Authenticated-session store.
//!
//! [`SessionStore`] owns the process's view of "who is logged in":
//! anonymous until the auth service hands over a profile, authenticated
//! until logout. The profile is persisted on login and erased on logout,
//! so a restart resumes the session.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use niba_vision_core::UserProfile;

use crate::observable::{ObservableContainer, Subscription};
use crate::persist::{PersistenceAdapter, SnapshotWriter, keys};

/// Who the current user is. Exactly one variant at any time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Nobody is logged in.
    #[default]
    Anonymous,
    /// A user is logged in with this profile.
    Authenticated(UserProfile),
}

impl SessionState {
    /// Whether a user is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The logged-in profile, if any.
    #[must_use]
    pub const fn profile(&self) -> Option<&UserProfile> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(profile) => Some(profile),
        }
    }
}

/// The process-wide session store.
///
/// The persisted blob is the bare [`UserProfile`] (absence of the blob
/// means anonymous), so the on-disk schema does not depend on the enum's
/// representation.
#[derive(Debug)]
pub struct SessionStore {
    state: ObservableContainer<SessionState>,
    snapshots: SnapshotWriter,
}

impl SessionStore {
    /// Build the store, resuming the persisted session if one exists.
    ///
    /// A missing, unreadable, or incompatible blob hydrates as anonymous;
    /// hydration never fails.
    pub async fn hydrate(adapter: Arc<dyn PersistenceAdapter>) -> Self {
        let initial = match adapter.load(keys::SESSION).await {
            Some(value) => match serde_json::from_value::<UserProfile>(value) {
                Ok(profile) => {
                    debug!(email = %profile.email, "Resumed persisted session");
                    SessionState::Authenticated(profile)
                }
                Err(e) => {
                    warn!(error = %e, "Persisted session is incompatible, starting anonymous");
                    SessionState::Anonymous
                }
            },
            None => SessionState::Anonymous,
        };
        Self {
            state: ObservableContainer::new(initial),
            snapshots: SnapshotWriter::spawn(adapter, keys::SESSION),
        }
    }

    /// Set the session to `profile` and persist it.
    ///
    /// Called with the finished profile the auth service produced; this
    /// store never talks to the auth service itself.
    pub fn login(&self, profile: UserProfile) {
        info!(email = %profile.email, "User logged in");
        let seq = self.state.update_and(|state| {
            *state = SessionState::Authenticated(profile.clone());
            self.snapshots.allocate_seq()
        });
        self.snapshots.save(seq, &profile);
    }

    /// Return to anonymous and erase the persisted profile.
    ///
    /// Logging out while anonymous is a no-op.
    pub fn logout(&self) {
        let seq = self.state.update_and(|state| {
            if state.is_authenticated() {
                info!("User logged out");
            }
            *state = SessionState::Anonymous;
            self.snapshots.allocate_seq()
        });
        self.snapshots.remove(seq);
    }

    /// Latest session state without subscribing.
    #[must_use]
    pub fn current(&self) -> SessionState {
        self.state.get()
    }

    /// Subscribe to session changes: current state first, then every
    /// change.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<SessionState> {
        self.state.subscribe()
    }

    /// Wait for all enqueued session writes to be handled. Shutdown/test
    /// aid.
    pub async fn flushed(&self) {
        self.snapshots.flushed().await;
    }
}
