pub mod attempt_ledger;
pub mod export;
pub mod extraction;
pub mod grading;
pub mod prompt_service;
pub mod publication_store;
pub mod session_store;
pub mod study_service;

pub use attempt_ledger::{AttemptLedger, QuizAttempts};
pub use extraction::DocumentExtractor;
pub use grading::{Feedback, GradingSession, QuestionState, QuizMode, QuizResults, ResultRow};
pub use prompt_service::{OpenAiPromptService, PromptService};
pub use publication_store::PublicationStore;
pub use session_store::SessionStore;
pub use study_service::{OperationKind, StudyAidOptions, StudyService};
