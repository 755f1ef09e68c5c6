//! Durable key/value storage for the three persisted stores.
//!
//! Values are JSON strings. Each store owns exactly one key, so the stores
//! can be restored independently and a crash between two writes only ever
//! leaves one key stale.

pub mod file;
pub mod memory;

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::AppResult;

pub use file::FileStorage;
pub use memory::MemoryStorage;

pub const CURRENT_USER_KEY: &str = "currentUser_v2";
pub const TEACHER_QUIZ_KEY: &str = "teacherQuizData_v2";
pub const STUDENT_ATTEMPTS_KEY: &str = "studentAttempts_v2";

#[cfg_attr(test, mockall::automock)]
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// Result of reading a persisted value.
#[derive(Debug, PartialEq)]
pub enum Stored<T> {
    Absent,
    Valid(T),
    /// Not the expected shape. Callers treat it as absent and discard it.
    Corrupt(String),
    /// The backend failed to read. Callers start empty but keep the durable
    /// value, which may still be valid.
    Unreadable(String),
}

pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Stored<T> {
    match storage.get(key) {
        Ok(None) => Stored::Absent,
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Stored::Valid(value),
            Err(e) => Stored::Corrupt(e.to_string()),
        },
        Err(e) => Stored::Unreadable(e.to_string()),
    }
}

pub fn save_json<T: Serialize + ?Sized>(storage: &dyn Storage, key: &str, value: &T) -> AppResult<()> {
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw)
}

/// Drops a corrupt value so the next start is clean. Removal failures are
/// only logged; the in-memory store is already empty.
pub(crate) fn discard_corrupt(storage: &dyn Storage, key: &str, reason: &str) {
    log::warn!("Discarding corrupt persisted value for '{}': {}", key, reason);
    if let Err(e) = storage.remove(key) {
        log::warn!("Failed to remove corrupt value for '{}': {}", key, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::AppError,
        models::domain::{Identity, Role},
    };

    #[test]
    fn load_json_distinguishes_absent_valid_and_corrupt() {
        let storage = MemoryStorage::new();

        assert_eq!(load_json::<Identity>(&storage, CURRENT_USER_KEY), Stored::Absent);

        save_json(&storage, CURRENT_USER_KEY, &Identity::new(Role::Teacher, "t1")).unwrap();
        assert_eq!(
            load_json::<Identity>(&storage, CURRENT_USER_KEY),
            Stored::Valid(Identity::new(Role::Teacher, "t1"))
        );

        storage.set(CURRENT_USER_KEY, "{not json").unwrap();
        assert!(matches!(
            load_json::<Identity>(&storage, CURRENT_USER_KEY),
            Stored::Corrupt(_)
        ));
    }

    #[test]
    fn wrong_shape_is_corrupt() {
        let storage = MemoryStorage::new();
        storage
            .set(CURRENT_USER_KEY, r#"{"role":"admin","id":"x"}"#)
            .unwrap();
        assert!(matches!(
            load_json::<Identity>(&storage, CURRENT_USER_KEY),
            Stored::Corrupt(_)
        ));
    }

    #[test]
    fn read_failure_is_unreadable_not_corrupt() {
        let mut storage = MockStorage::new();
        storage
            .expect_get()
            .returning(|_| Err(AppError::StorageError("disk unavailable".to_string())));

        assert_eq!(
            load_json::<Identity>(&storage, CURRENT_USER_KEY),
            Stored::Unreadable("Storage error: disk unavailable".to_string())
        );
    }

    #[test]
    fn discard_corrupt_removes_the_key() {
        let storage = MemoryStorage::new();
        storage.set(TEACHER_QUIZ_KEY, "garbage").unwrap();
        discard_corrupt(&storage, TEACHER_QUIZ_KEY, "test");
        assert_eq!(storage.get(TEACHER_QUIZ_KEY).unwrap(), None);
    }
}
