use std::sync::{Arc, PoisonError, RwLock};

use crate::{
    auth::CredentialStore,
    events::{AppEvent, EventBus, Notification},
    models::domain::{Identity, Role},
    storage::{self, Storage, Stored, CURRENT_USER_KEY},
};

/// The one current identity, mirrored to durable storage.
pub struct SessionStore {
    credentials: Arc<CredentialStore>,
    storage: Arc<dyn Storage>,
    events: EventBus,
    current: RwLock<Option<Identity>>,
}

impl SessionStore {
    pub fn new(credentials: Arc<CredentialStore>, storage: Arc<dyn Storage>, events: EventBus) -> Self {
        Self {
            credentials,
            storage,
            events,
            current: RwLock::new(None),
        }
    }

    pub fn current(&self) -> Option<Identity> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// A failed login is an ordinary outcome, not an error: state is left
    /// untouched and the user is told.
    pub fn login(&self, role: Role, id: &str, password: &str) -> bool {
        let Some(identity) = self.credentials.authenticate(role, id, password) else {
            log::info!("Rejected {} login for '{}'", role, id.trim());
            self.events.notify(Notification::error(
                "Login Failed",
                "Invalid ID or password.",
            ));
            return false;
        };

        self.set_current(Some(identity.clone()));
        if let Err(e) = storage::save_json(self.storage.as_ref(), CURRENT_USER_KEY, &identity) {
            log::warn!("Failed to persist session for '{}': {}", identity.id, e);
            self.events
                .notify(Notification::error("Session Not Saved", e.to_string()));
        }

        log::info!("{} '{}' logged in", identity.role, identity.id);
        self.events.notify(Notification::success(
            "Login Successful",
            format!("Welcome, {}!", identity.id),
        ));
        true
    }

    pub fn logout(&self) {
        let previous = self.set_current(None);
        if let Err(e) = self.storage.remove(CURRENT_USER_KEY) {
            log::warn!("Failed to remove persisted session: {}", e);
            self.events
                .notify(Notification::error("Logout Not Saved", e.to_string()));
        }

        if let Some(identity) = previous {
            log::info!("{} '{}' logged out", identity.role, identity.id);
        }
        self.events.notify(Notification::info(
            "Logged Out",
            "You have been successfully logged out.",
        ));
    }

    /// Called once at startup. Corrupt data is dropped and the session starts
    /// unauthenticated; a failed read leaves the stored value in place.
    pub fn restore(&self) -> Option<Identity> {
        let restored = match storage::load_json::<Identity>(self.storage.as_ref(), CURRENT_USER_KEY) {
            Stored::Valid(identity) => Some(identity),
            Stored::Absent => None,
            Stored::Corrupt(reason) => {
                storage::discard_corrupt(self.storage.as_ref(), CURRENT_USER_KEY, &reason);
                None
            }
            Stored::Unreadable(reason) => {
                log::warn!("Could not read persisted session: {}", reason);
                None
            }
        };

        if let Some(identity) = &restored {
            log::info!("Restored session for {} '{}'", identity.role, identity.id);
        }
        self.set_current(restored.clone());
        restored
    }

    fn set_current(&self, identity: Option<Identity>) -> Option<Identity> {
        let previous = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *current, identity.clone())
        };
        self.events.publish(AppEvent::SessionChanged(identity));
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{drain, NotificationLevel};
    use crate::storage::MemoryStorage;

    fn store_with(storage: Arc<dyn Storage>) -> (SessionStore, EventBus) {
        let events = EventBus::new(16);
        let store = SessionStore::new(Arc::new(CredentialStore::builtin()), storage, events.clone());
        (store, events)
    }

    #[test]
    fn login_sets_and_persists_identity() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let (store, events) = store_with(storage.clone());
        let mut rx = events.subscribe();

        assert!(store.login(Role::Teacher, "Vikas Sir", "vikas123"));

        let identity = store.current().unwrap();
        assert_eq!(identity.id, "vikas sir");
        assert_eq!(
            storage.get(CURRENT_USER_KEY).unwrap().as_deref(),
            Some(r#"{"role":"teacher","id":"vikas sir"}"#)
        );

        let events = drain(&mut rx);
        assert!(matches!(&events[0], AppEvent::SessionChanged(Some(_))));
        assert!(matches!(&events[1], AppEvent::Notification(n) if n.level == NotificationLevel::Success));
    }

    #[test]
    fn failed_login_leaves_state_unchanged() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let (store, events) = store_with(storage.clone());
        assert!(store.login(Role::Student, "priyanshu", "21221079"));
        let mut rx = events.subscribe();

        assert!(!store.login(Role::Teacher, "vikas sir", "wrong"));

        assert_eq!(store.current().unwrap().id, "priyanshu");
        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], AppEvent::Notification(n) if n.level == NotificationLevel::Error));
    }

    #[test]
    fn logout_clears_identity_and_persisted_copy() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let (store, _) = store_with(storage.clone());
        store.login(Role::Student, "priyanshu", "21221079");

        store.logout();

        assert_eq!(store.current(), None);
        assert_eq!(storage.get(CURRENT_USER_KEY).unwrap(), None);
    }

    #[test]
    fn restore_reads_persisted_identity() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        store_with(storage.clone()).0.login(Role::Student, "PRIYANSHU", "21221079");

        let (fresh, _) = store_with(storage);
        let restored = fresh.restore();

        assert_eq!(restored, Some(Identity::new(Role::Student, "priyanshu")));
        assert_eq!(fresh.current(), restored);
    }

    #[test]
    fn restore_discards_corrupt_identity() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.set(CURRENT_USER_KEY, r#"{"role":"principal"}"#).unwrap();

        let (store, _) = store_with(storage.clone());

        assert_eq!(store.restore(), None);
        assert_eq!(store.current(), None);
        assert_eq!(storage.get(CURRENT_USER_KEY).unwrap(), None);
    }

    #[test]
    fn persistence_failure_keeps_in_memory_login() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::with_quota(4));
        let (store, events) = store_with(storage.clone());
        let mut rx = events.subscribe();

        assert!(store.login(Role::Teacher, "vikas sir", "vikas123"));

        assert!(store.current().is_some());
        assert_eq!(storage.get(CURRENT_USER_KEY).unwrap(), None);
        assert!(drain(&mut rx).iter().any(
            |e| matches!(e, AppEvent::Notification(n) if n.title == "Session Not Saved")
        ));
    }
}
