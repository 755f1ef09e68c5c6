use std::sync::Arc;

use crate::{
    auth::{self, CredentialStore},
    config::Config,
    errors::AppResult,
    events::EventBus,
    models::domain::{AttemptRecord, Bundle},
    services::{
        AttemptLedger, DocumentExtractor, GradingSession, OpenAiPromptService, PromptService,
        PublicationStore, QuizAttempts, SessionStore, StudyService,
    },
    storage::{FileStorage, Storage},
};

/// Counts of what `restore` brought back, for the startup log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub session: bool,
    pub publication: bool,
    pub attempts: usize,
}

/// Composition root: every store and service is built once here and shared
/// by reference.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub events: EventBus,
    pub credentials: Arc<CredentialStore>,
    pub session: Arc<SessionStore>,
    pub publication: Arc<PublicationStore>,
    pub attempts: Arc<AttemptLedger>,
    pub study: Arc<StudyService>,
    pub extractor: DocumentExtractor,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(&config.storage_dir)?);
        let prompts: Arc<dyn PromptService> = Arc::new(OpenAiPromptService::new(&config));
        Ok(Self::with_parts(config, storage, prompts))
    }

    /// Wires the app around caller-supplied storage and LLM backends.
    pub fn with_parts(config: Config, storage: Arc<dyn Storage>, prompts: Arc<dyn PromptService>) -> Self {
        let events = EventBus::new(config.event_capacity);
        let credentials = Arc::new(CredentialStore::new(config.credentials.clone()));

        let session = Arc::new(SessionStore::new(
            credentials.clone(),
            storage.clone(),
            events.clone(),
        ));
        let publication = Arc::new(PublicationStore::new(storage.clone(), events.clone()));
        let attempts = Arc::new(AttemptLedger::new(storage, events.clone()));
        let study = Arc::new(StudyService::new(prompts, events.clone()));

        Self {
            config: Arc::new(config),
            events,
            credentials,
            session,
            publication,
            attempts,
            study,
            extractor: DocumentExtractor::new(),
        }
    }

    /// Each store restores on its own; one corrupt key does not affect the
    /// others.
    pub fn restore(&self) -> RestoreReport {
        RestoreReport {
            session: self.session.restore().is_some(),
            publication: self.publication.restore().is_some(),
            attempts: self.attempts.restore(),
        }
    }

    /// What the current identity may see of the published bundle.
    pub fn visible_publication(&self) -> Option<Bundle> {
        auth::visible_publication(
            self.session.current().as_ref(),
            self.publication.current().as_ref(),
        )
    }

    /// A fresh grading session for whatever is published, in the mode the
    /// current identity implies. The session holds the full quiz; restricted
    /// sessions keep reasons hidden until submission.
    pub fn begin_quiz(&self) -> Option<GradingSession> {
        let bundle = self.publication.current()?;
        let mode = auth::quiz_mode_for(self.session.current().as_ref());
        Some(GradingSession::new(&bundle.document_name, bundle.quiz, mode))
    }

    /// `Ok(None)` when the session was already submitted.
    pub fn submit_quiz(&self, session: &mut GradingSession) -> AppResult<Option<AttemptRecord>> {
        session.submit(self.session.current().as_ref(), &self.attempts)
    }

    /// Teacher view of attempts on the active quiz.
    pub fn attempts_for_active_quiz(&self) -> Option<QuizAttempts> {
        self.publication
            .current()
            .map(|bundle| self.attempts.for_quiz(&bundle.document_name))
    }

    /// Publishes after checking the current identity may.
    pub fn publish(&self, bundle: Bundle) -> AppResult<()> {
        auth::require_teacher(self.session.current().as_ref())?;
        self.publication.publish(bundle);
        Ok(())
    }

    pub fn clear_publication(&self) -> AppResult<()> {
        auth::require_teacher(self.session.current().as_ref())?;
        self.publication.clear();
        Ok(())
    }
}
