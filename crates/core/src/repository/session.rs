//! Session store
//!
//! Holds the single signed-in actor and mirrors it to its own blob.

use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::models::{Session, User, UserRole};
use crate::storage::{BlobStore, SESSION_KEY};

pub struct SessionStore<S> {
    store: S,
    session: Session,
}

impl<S: BlobStore> SessionStore<S> {
    /// Load the stored session. A missing or unreadable snapshot is signed out.
    #[instrument(skip(store))]
    pub fn load(store: S) -> Result<Self> {
        let session = match store.load(SESSION_KEY)? {
            None => Session::default(),
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Stored session is malformed, starting signed out");
                Session::default()
            }),
        };

        Ok(Self { store, session })
    }

    /// Write `next` to the store and adopt it only once the write succeeded
    fn commit(&mut self, next: Session) -> Result<()> {
        let raw = serde_json::to_string(&next)?;
        self.store.save(SESSION_KEY, &raw)?;
        self.session = next;
        Ok(())
    }

    /// Sign in, replacing any previous session
    #[instrument(skip(self, name))]
    pub fn login(&mut self, role: UserRole, name: Option<String>) -> Result<User> {
        let user = User::new(role, name);
        self.commit(Session::signed_in(user.clone()))?;
        info!("Signed in");
        Ok(user)
    }

    /// Sign out and clear the stored actor
    #[instrument(skip(self))]
    pub fn logout(&mut self) -> Result<()> {
        self.commit(Session::default())?;
        info!("Signed out");
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    pub fn role(&self) -> Option<UserRole> {
        self.session.role()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    /// True when signed in with the given role
    pub fn has_role(&self, role: UserRole) -> bool {
        self.is_authenticated() && self.role() == Some(role)
    }
}
