use std::sync::{Arc, PoisonError, RwLock};

use crate::{
    events::{AppEvent, EventBus, Notification},
    models::domain::Bundle,
    storage::{self, Storage, Stored, TEACHER_QUIZ_KEY},
};

/// Holds at most one published bundle for the whole installation. There is
/// no per-teacher scoping: the last publish wins for everyone.
pub struct PublicationStore {
    storage: Arc<dyn Storage>,
    events: EventBus,
    current: RwLock<Option<Bundle>>,
}

impl PublicationStore {
    pub fn new(storage: Arc<dyn Storage>, events: EventBus) -> Self {
        Self {
            storage,
            events,
            current: RwLock::new(None),
        }
    }

    pub fn current(&self) -> Option<Bundle> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Overwrites whatever was published before. Callers gate this on
    /// `auth::can_publish`.
    pub fn publish(&self, bundle: Bundle) {
        log::info!(
            "Publishing '{}' ({} questions)",
            bundle.document_name,
            bundle.quiz.len()
        );
        let name = bundle.document_name.clone();
        self.set_current(Some(bundle.clone()));

        if let Err(e) = storage::save_json(self.storage.as_ref(), TEACHER_QUIZ_KEY, &bundle) {
            log::warn!("Failed to persist published quiz '{}': {}", name, e);
            self.events
                .notify(Notification::error("Quiz Not Saved", e.to_string()));
        }
        self.events.notify(Notification::success(
            "Quiz Published",
            format!("'{}' is now available to students.", name),
        ));
    }

    pub fn clear(&self) {
        let previous = self.set_current(None);
        if let Err(e) = self.storage.remove(TEACHER_QUIZ_KEY) {
            log::warn!("Failed to remove published quiz: {}", e);
            self.events
                .notify(Notification::error("Quiz Not Cleared", e.to_string()));
        }

        if let Some(bundle) = previous {
            log::info!("Cleared published quiz '{}'", bundle.document_name);
        }
        self.events.notify(Notification::info(
            "Quiz Cleared",
            "The published quiz has been removed.",
        ));
    }

    pub fn restore(&self) -> Option<Bundle> {
        let restored = match storage::load_json::<Bundle>(self.storage.as_ref(), TEACHER_QUIZ_KEY) {
            Stored::Valid(bundle) => Some(bundle),
            Stored::Absent => None,
            Stored::Corrupt(reason) => {
                storage::discard_corrupt(self.storage.as_ref(), TEACHER_QUIZ_KEY, &reason);
                None
            }
            Stored::Unreadable(reason) => {
                log::warn!("Could not read published quiz: {}", reason);
                None
            }
        };

        if let Some(bundle) = &restored {
            log::info!("Restored published quiz '{}'", bundle.document_name);
        }
        self.set_current(restored.clone());
        restored
    }

    fn set_current(&self, bundle: Option<Bundle>) -> Option<Bundle> {
        let previous = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *current, bundle.clone())
        };
        self.events.publish(AppEvent::PublicationChanged(bundle));
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::drain;
    use crate::storage::MemoryStorage;
    use crate::test_utils::fixtures::sample_bundle;

    #[test]
    fn publish_overwrites_single_slot() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let store = PublicationStore::new(storage.clone(), EventBus::default());

        store.publish(sample_bundle("Algebra"));
        store.publish(sample_bundle("Biology"));

        assert_eq!(store.current().unwrap().document_name, "Biology");
        let persisted: Bundle =
            serde_json::from_str(&storage.get(TEACHER_QUIZ_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted.document_name, "Biology");
    }

    #[test]
    fn clear_removes_bundle_and_notifies() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let events = EventBus::new(8);
        let store = PublicationStore::new(storage.clone(), events.clone());
        store.publish(sample_bundle("Algebra"));
        let mut rx = events.subscribe();

        store.clear();

        assert_eq!(store.current(), None);
        assert_eq!(storage.get(TEACHER_QUIZ_KEY).unwrap(), None);
        let events = drain(&mut rx);
        assert_eq!(events[0], AppEvent::PublicationChanged(None));
        assert!(matches!(&events[1], AppEvent::Notification(n) if n.title == "Quiz Cleared"));
    }

    #[test]
    fn restore_round_trips_bundle() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let bundle = sample_bundle("Chapter 1");
        PublicationStore::new(storage.clone(), EventBus::default()).publish(bundle.clone());

        let fresh = PublicationStore::new(storage, EventBus::default());
        assert_eq!(fresh.restore(), Some(bundle.clone()));
        assert_eq!(fresh.current(), Some(bundle));
    }

    #[test]
    fn restore_self_heals_corrupt_bundle() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage
            .set(TEACHER_QUIZ_KEY, r#"{"quiz":{"questions":"nope"}}"#)
            .unwrap();

        let store = PublicationStore::new(storage.clone(), EventBus::default());
        assert_eq!(store.restore(), None);
        assert_eq!(storage.get(TEACHER_QUIZ_KEY).unwrap(), None);
    }

    #[test]
    fn quota_failure_keeps_in_memory_bundle() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::with_quota(16));
        let events = EventBus::new(8);
        let store = PublicationStore::new(storage.clone(), events.clone());
        let mut rx = events.subscribe();

        store.publish(sample_bundle("Algebra"));

        assert_eq!(store.current().unwrap().document_name, "Algebra");
        assert_eq!(storage.get(TEACHER_QUIZ_KEY).unwrap(), None);
        assert!(drain(&mut rx).iter().any(
            |e| matches!(e, AppEvent::Notification(n) if n.title == "Quiz Not Saved")
        ));
    }
}
