//! Login, registration and "who is signed in".
//!
//! The active session is a single token under [`SESSION_TOKEN_KEY`]. The
//! role inside it is trusted as-is; nothing here enforces authorization.

use chrono::{Duration, Utc};

use crate::models::{Fields, User, UserFields};
use crate::repo::{RepoError, Repository};
use crate::store::{read_collection, Collection, KeyValueStore, StoreError, SESSION_TOKEN_KEY};
use crate::token::{self, Claims};

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Same outcome for an unknown email and a wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user already exists")]
    AlreadyExists,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl From<RepoError> for AccessError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Validation(msg) => AccessError::Validation(msg),
            RepoError::Storage(e) => AccessError::Storage(e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

pub struct SessionService<'s> {
    store: &'s mut dyn KeyValueStore,
    ttl: Duration,
}

impl<'s> SessionService<'s> {
    pub fn new(store: &'s mut dyn KeyValueStore, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    fn users(&self) -> Result<Vec<User>, StoreError> {
        read_collection(&*self.store, Collection::Users)
    }

    fn start(&mut self, user: User) -> Result<Session, StoreError> {
        let claims = Claims::for_user(&user, Utc::now(), self.ttl);
        let token = token::encode(&claims);
        self.store.set(SESSION_TOKEN_KEY, &token)?;
        Ok(Session { user, token })
    }

    /// Exact, case-sensitive match on both email and password.
    pub fn authenticate(&mut self, email: &str, password: &str) -> Result<Session, AccessError> {
        let found = self
            .users()?
            .into_iter()
            .find(|u| u.fields.email == email && u.fields.password == password);
        let Some(user) = found else {
            tracing::warn!("login rejected");
            return Err(AccessError::InvalidCredentials);
        };
        tracing::info!(user_id = %user.id, role = %user.fields.role, "login");
        Ok(self.start(user)?)
    }

    pub fn register(&mut self, fields: UserFields) -> Result<Session, AccessError> {
        fields.validate().map_err(AccessError::Validation)?;
        if self.users()?.iter().any(|u| u.fields.email == fields.email) {
            tracing::warn!(role = %fields.role, "registration rejected: email taken");
            return Err(AccessError::AlreadyExists);
        }
        let user = Repository::<UserFields>::new(&mut *self.store).create(fields)?;
        tracing::info!(user_id = %user.id, role = %user.fields.role, "registered");
        Ok(self.start(user)?)
    }

    /// Drops the stored token when it is unreadable or expired. A token for
    /// a user that no longer exists yields `None` but is left in place.
    pub fn current_user(&mut self) -> Result<Option<User>, StoreError> {
        let Some(raw) = self.store.get(SESSION_TOKEN_KEY)? else {
            return Ok(None);
        };
        let claims = match token::decode(&raw) {
            Some(c) if !c.is_expired(Utc::now()) => c,
            _ => {
                tracing::info!("session token invalid or expired; clearing");
                self.store.remove(SESSION_TOKEN_KEY)?;
                return Ok(None);
            }
        };
        Ok(self.users()?.into_iter().find(|u| u.id == claims.id))
    }

    pub fn end_session(&mut self) -> Result<(), StoreError> {
        self.store.remove(SESSION_TOKEN_KEY)?;
        tracing::info!("session ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::seed::seed_demo_data;
    use crate::store::MemoryStore;
    use crate::token::DEFAULT_TTL_HOURS;

    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        seed_demo_data(&mut store).expect("seed");
        store
    }

    fn ttl() -> Duration {
        Duration::hours(DEFAULT_TTL_HOURS)
    }

    fn new_user(email: &str) -> UserFields {
        UserFields {
            email: email.to_string(),
            password: "pw12345".to_string(),
            role: Role::Teacher,
            name: "New Teacher".to_string(),
            phone: Some("555-0100".to_string()),
            subject: Some("History".to_string()),
            student_id: None,
            class: None,
            parent_email: None,
            student_email: None,
        }
    }

    #[test]
    fn demo_admin_can_log_in_and_is_current() {
        let mut store = seeded();
        let mut svc = SessionService::new(&mut store, ttl());
        let session = svc.authenticate("admin@school.com", "admin123").expect("login");
        assert_eq!(session.user.fields.role, Role::Admin);

        let current = svc.current_user().expect("current").expect("signed in");
        assert_eq!(current.id, session.user.id);
        assert_eq!(
            store.get(SESSION_TOKEN_KEY).expect("get"),
            Some(session.token.clone())
        );
    }

    #[test]
    fn wrong_password_and_unknown_email_fail_the_same_way() {
        let mut store = seeded();
        let mut svc = SessionService::new(&mut store, ttl());
        let wrong = svc.authenticate("admin@school.com", "wrong").expect_err("wrong pw");
        let unknown = svc.authenticate("ghost@school.com", "admin123").expect_err("unknown");
        assert!(matches!(wrong, AccessError::InvalidCredentials));
        assert!(matches!(unknown, AccessError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(svc.current_user().expect("current").is_none());
    }

    #[test]
    fn email_match_is_case_sensitive() {
        let mut store = seeded();
        let mut svc = SessionService::new(&mut store, ttl());
        assert!(svc.authenticate("Admin@School.com", "admin123").is_err());
    }

    #[test]
    fn register_duplicate_email_conflicts_without_mutation() {
        let mut store = seeded();
        let before = store.get("users").expect("get");
        let mut svc = SessionService::new(&mut store, ttl());
        let err = svc.register(new_user("admin@school.com")).expect_err("dup");
        assert!(matches!(err, AccessError::AlreadyExists));
        assert_eq!(store.get("users").expect("get"), before);
        assert!(store.get(SESSION_TOKEN_KEY).expect("get").is_none());
    }

    #[test]
    fn register_signs_in_new_user() {
        let mut store = seeded();
        let mut svc = SessionService::new(&mut store, ttl());
        let session = svc.register(new_user("history@school.com")).expect("register");
        assert!(session.user.created_at.is_some());
        let current = svc.current_user().expect("current").expect("signed in");
        assert_eq!(current.id, session.user.id);

        svc.end_session().expect("logout");
        assert!(svc.current_user().expect("current").is_none());
        let again = svc
            .authenticate("history@school.com", "pw12345")
            .expect("login after register");
        assert_eq!(again.user.id, session.user.id);
    }

    #[test]
    fn register_rejects_blank_password() {
        let mut store = seeded();
        let mut svc = SessionService::new(&mut store, ttl());
        let mut fields = new_user("blank@school.com");
        fields.password = String::new();
        assert!(matches!(
            svc.register(fields),
            Err(AccessError::Validation(_))
        ));
    }

    #[test]
    fn expired_or_garbage_tokens_are_cleared() {
        let mut store = seeded();
        let expired = token::encode(&Claims {
            id: "1".to_string(),
            email: "admin@school.com".to_string(),
            role: Role::Admin,
            exp: Utc::now().timestamp_millis() - 1,
        });
        store.set(SESSION_TOKEN_KEY, &expired).expect("set");
        {
            let mut svc = SessionService::new(&mut store, ttl());
            assert!(svc.current_user().expect("current").is_none());
        }
        assert!(store.get(SESSION_TOKEN_KEY).expect("get").is_none());

        store.set(SESSION_TOKEN_KEY, "garbage!").expect("set");
        {
            let mut svc = SessionService::new(&mut store, ttl());
            assert!(svc.current_user().expect("current").is_none());
        }
        assert!(store.get(SESSION_TOKEN_KEY).expect("get").is_none());
    }

    #[test]
    fn token_for_vanished_user_resolves_to_none() {
        let mut store = seeded();
        let stale = token::encode(&Claims {
            id: "999".to_string(),
            email: "gone@school.com".to_string(),
            role: Role::Teacher,
            exp: Utc::now().timestamp_millis() + 60_000,
        });
        store.set(SESSION_TOKEN_KEY, &stale).expect("set");
        let mut svc = SessionService::new(&mut store, ttl());
        assert!(svc.current_user().expect("current").is_none());
    }

    #[test]
    fn end_session_is_idempotent() {
        let mut store = seeded();
        let mut svc = SessionService::new(&mut store, ttl());
        svc.end_session().expect("first");
        svc.end_session().expect("second");
    }
}
