use std::sync::{Arc, PoisonError, RwLock};

use chrono::{SubsecRound, Utc};

use crate::{
    errors::AppResult,
    events::{AppEvent, EventBus, Notification},
    models::domain::AttemptRecord,
    storage::{self, Storage, Stored, STUDENT_ATTEMPTS_KEY},
};

/// Append-only list of submitted attempts, in submission order.
pub struct AttemptLedger {
    storage: Arc<dyn Storage>,
    events: EventBus,
    records: RwLock<Arc<Vec<AttemptRecord>>>,
}

impl AttemptLedger {
    pub fn new(storage: Arc<dyn Storage>, events: EventBus) -> Self {
        Self {
            storage,
            events,
            records: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Appends and persists the whole ledger. A failed write is reported but
    /// the record stays in memory for the rest of the session.
    pub fn record(
        &self,
        student_id: &str,
        score: u32,
        total: u32,
        quiz_name: &str,
    ) -> AppResult<AttemptRecord> {
        let snapshot = {
            let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
            // persisted at millisecond precision; never goes backwards even if
            // the wall clock does
            let now = Utc::now().trunc_subsecs(3);
            let timestamp = records
                .last()
                .map(|last| last.timestamp.max(now))
                .unwrap_or(now);
            let record = AttemptRecord::new(student_id, score, total, quiz_name, timestamp)?;
            Arc::make_mut(&mut *records).push(record);
            Arc::clone(&*records)
        };
        // snapshot is non-empty: the push above succeeded
        let record = snapshot[snapshot.len() - 1].clone();

        if let Err(e) = storage::save_json(self.storage.as_ref(), STUDENT_ATTEMPTS_KEY, snapshot.as_slice()) {
            log::warn!("Failed to persist attempt ledger: {}", e);
            self.events.notify(Notification::error(
                "Attempt Not Saved",
                format!("Your score was recorded for this session only: {}", e),
            ));
        }

        log::info!(
            "Recorded attempt by '{}' on '{}': {}/{}",
            record.student_id,
            record.quiz_name,
            record.score,
            record.total
        );
        self.events.publish(AppEvent::AttemptRecorded(record.clone()));
        self.events.notify(Notification::success(
            "Quiz Submitted",
            format!("You scored {} out of {}.", record.score, record.total),
        ));
        Ok(record)
    }

    pub fn all(&self) -> Vec<AttemptRecord> {
        self.snapshot().as_ref().clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Attempts whose quiz name equals `quiz_name` exactly. The view is a
    /// snapshot: later appends do not show up in it.
    pub fn for_quiz(&self, quiz_name: &str) -> QuizAttempts {
        QuizAttempts {
            records: self.snapshot(),
            quiz_name: quiz_name.to_string(),
        }
    }

    /// A ledger holding any record that breaks the score bounds is corrupt
    /// as a whole and is discarded like unparsable data.
    pub fn restore(&self) -> usize {
        let loaded = match storage::load_json::<Vec<AttemptRecord>>(
            self.storage.as_ref(),
            STUDENT_ATTEMPTS_KEY,
        ) {
            Stored::Valid(records) => match records.iter().try_for_each(AttemptRecord::validate) {
                Ok(()) => Stored::Valid(records),
                Err(e) => Stored::Corrupt(e.to_string()),
            },
            other => other,
        };

        let restored = match loaded {
            Stored::Valid(records) => records,
            Stored::Absent => Vec::new(),
            Stored::Corrupt(reason) => {
                storage::discard_corrupt(self.storage.as_ref(), STUDENT_ATTEMPTS_KEY, &reason);
                Vec::new()
            }
            Stored::Unreadable(reason) => {
                log::warn!("Could not read attempt ledger: {}", reason);
                Vec::new()
            }
        };

        let count = restored.len();
        *self.records.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(restored);
        if count > 0 {
            log::info!("Restored {} recorded attempts", count);
        }
        count
    }

    fn snapshot(&self) -> Arc<Vec<AttemptRecord>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*records)
    }
}

/// Lazy, restartable filter over a ledger snapshot.
#[derive(Clone, Debug)]
pub struct QuizAttempts {
    records: Arc<Vec<AttemptRecord>>,
    quiz_name: String,
}

impl QuizAttempts {
    pub fn quiz_name(&self) -> &str {
        &self.quiz_name
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttemptRecord> + '_ {
        self.records
            .iter()
            .filter(move |r| r.quiz_name == self.quiz_name)
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }
}

impl<'a> IntoIterator for &'a QuizAttempts {
    type Item = &'a AttemptRecord;
    type IntoIter = Box<dyn Iterator<Item = &'a AttemptRecord> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
