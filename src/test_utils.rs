#[cfg(test)]
pub mod fixtures {
    use std::sync::Arc;

    use crate::app_state::AppState;
    use crate::config::Config;
    use crate::events::EventBus;
    use crate::models::domain::{Bundle, Question, Quiz, Summary};
    use crate::services::prompt_service::MockPromptService;
    use crate::services::AttemptLedger;
    use crate::storage::MemoryStorage;

    /// Quiz of `count` four-option questions; the answer is always option B.
    pub fn sample_quiz(count: usize) -> Quiz {
        Quiz::new(
            (1..=count)
                .map(|i| {
                    Question::new(
                        &format!("Question {}?", i),
                        &["A", "B", "C", "D"],
                        "B",
                        &format!("Reason {}", i),
                    )
                })
                .collect(),
        )
    }

    pub fn sample_bundle(document_name: &str) -> Bundle {
        Bundle::new(
            document_name,
            Summary::new("A short summary of the document."),
            sample_quiz(2),
        )
    }

    /// Ledger over volatile storage.
    pub fn memory_ledger() -> AttemptLedger {
        AttemptLedger::new(Arc::new(MemoryStorage::new()), EventBus::default())
    }

    /// App wired to memory storage and a prompt mock with no expectations.
    pub fn memory_app_state() -> AppState {
        AppState::with_parts(
            Config::default(),
            Arc::new(MemoryStorage::new()),
            Arc::new(MockPromptService::new()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_sample_quiz() {
        let quiz = sample_quiz(3);
        assert_eq!(quiz.len(), 3);
        assert!(quiz.questions.iter().all(|q| q.answer_matches_an_option()));
    }

    #[test]
    fn test_fixtures_sample_bundle() {
        let bundle = sample_bundle("Algebra");
        assert_eq!(bundle.document_name, "Algebra");
        assert!(!bundle.is_custom_quiz());
    }
}
