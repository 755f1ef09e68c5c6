use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    events::{EventBus, Notification},
    models::{
        domain::{Bundle, Flashcard, Summary},
        dto::{
            request::{
                ChatRequest, CustomQuizRequest, FlashcardsRequest, HintRequest, SummarizeRequest,
                SummaryLength, DEFAULT_MAX_FLASHCARDS,
            },
            response::QuizVariant,
        },
    },
    services::prompt_service::PromptService,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Summarize,
    Quiz,
    CustomQuiz,
    Flashcards,
    Hint,
    Chat,
}

impl OperationKind {
    const COUNT: usize = 6;

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Summarize => "summarization",
            OperationKind::Quiz => "quiz generation",
            OperationKind::CustomQuiz => "custom quiz generation",
            OperationKind::Flashcards => "flashcard generation",
            OperationKind::Hint => "hint generation",
            OperationKind::Chat => "chat",
        };
        write!(f, "{}", name)
    }
}

/// One loading flag per operation kind.
#[derive(Debug, Default)]
struct InFlight {
    flags: [AtomicBool; OperationKind::COUNT],
}

impl InFlight {
    fn begin(&self, kind: OperationKind) -> AppResult<InFlightGuard<'_>> {
        let flag = &self.flags[kind.index()];
        if flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AppError::Busy(format!("{} is already in progress", kind)));
        }
        Ok(InFlightGuard { flag })
    }

    fn is_busy(&self, kind: OperationKind) -> bool {
        self.flags[kind.index()].load(Ordering::Acquire)
    }
}

struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Default)]
pub struct StudyAidOptions {
    pub length: SummaryLength,
    pub focus: Option<String>,
}

/// Orchestrates the generation calls and turns their output into validated
/// domain data. Each operation kind runs at most once at a time.
pub struct StudyService {
    prompts: Arc<dyn PromptService>,
    events: EventBus,
    in_flight: InFlight,
}

impl StudyService {
    pub fn new(prompts: Arc<dyn PromptService>, events: EventBus) -> Self {
        Self {
            prompts,
            events,
            in_flight: InFlight::default(),
        }
    }

    pub fn is_busy(&self, kind: OperationKind) -> bool {
        self.in_flight.is_busy(kind)
    }

    /// Summarizes the document, then builds a standard quiz from the summary.
    /// The returned bundle is not published.
    pub async fn generate_study_aids(
        &self,
        document_name: &str,
        document_text: &str,
        options: StudyAidOptions,
    ) -> AppResult<Bundle> {
        if document_text.trim().is_empty() {
            self.events.notify(Notification::error(
                "Empty Content",
                "Please provide document content.",
            ));
            return Err(AppError::ValidationError(
                "Document content cannot be empty".to_string(),
            ));
        }

        let summary = self
            .summarize(SummarizeRequest {
                document_text: document_text.to_string(),
                length: options.length,
                focus: options.focus,
            })
            .await?;

        let _guard = self.in_flight.begin(OperationKind::Quiz)?;
        log::info!("Generating quiz for '{}'", document_name);
        let quiz = self
            .prompts
            .generate_quiz(&summary.main_text)
            .await
            .and_then(|output| output.into_quiz(QuizVariant::Standard))
            .inspect_err(|e| {
                log::error!("Quiz generation for '{}' failed: {}", document_name, e);
                self.events.notify(Notification::error(
                    "Quiz Generation Failed",
                    "Could not generate the quiz.",
                ));
            })?;

        log::info!(
            "Generated {} questions for '{}'",
            quiz.len(),
            document_name
        );
        self.events.notify(Notification::success(
            "Quiz Generation Complete",
            "Quiz has been generated based on the summary.",
        ));
        Ok(Bundle::new(document_name, summary, quiz))
    }

    pub async fn summarize(&self, request: SummarizeRequest) -> AppResult<Summary> {
        request.validate()?;
        let _guard = self.in_flight.begin(OperationKind::Summarize)?;

        log::info!(
            "Summarizing document ({} chars, {:?})",
            request.document_text.len(),
            request.length
        );
        let summary = self
            .prompts
            .summarize(&request)
            .await
            .and_then(|output| output.into_summary())
            .inspect_err(|e| {
                log::error!("Summarization failed: {}", e);
                self.events.notify(Notification::error(
                    "Summarization Failed",
                    "Could not summarize the document.",
                ));
            })?;

        self.events.notify(Notification::success(
            "Summarization Complete",
            "Document summary has been generated.",
        ));
        Ok(summary)
    }

    /// Topic quizzes have no source document; the summary slot carries a
    /// short description instead.
    pub async fn generate_custom_quiz(&self, topic: &str, num_questions: u8) -> AppResult<Bundle> {
        let request = CustomQuizRequest {
            topic: topic.trim().to_string(),
            num_questions,
        };
        request.validate()?;
        let _guard = self.in_flight.begin(OperationKind::CustomQuiz)?;

        log::info!(
            "Generating {} question custom quiz on '{}'",
            request.num_questions,
            request.topic
        );
        let quiz = self
            .prompts
            .generate_custom_quiz(&request.topic, request.num_questions)
            .await
            .and_then(|output| output.into_quiz(QuizVariant::Custom))
            .inspect_err(|e| {
                log::error!("Custom quiz on '{}' failed: {}", request.topic, e);
                self.events.notify(Notification::error(
                    "Custom Quiz Failed",
                    "Could not generate the custom quiz.",
                ));
            })?;

        self.events.notify(Notification::success(
            "Custom Quiz Generated",
            format!("A {} question quiz on '{}' is ready.", quiz.len(), request.topic),
        ));
        let summary = Summary::new(&format!("Custom quiz on the topic: {}", request.topic));
        Ok(Bundle::custom(&request.topic, summary, quiz))
    }

    pub async fn generate_flashcards(
        &self,
        summary_text: &str,
        max_flashcards: Option<u8>,
    ) -> AppResult<Vec<Flashcard>> {
        let request = FlashcardsRequest {
            summary_text: summary_text.to_string(),
            max_flashcards: max_flashcards.unwrap_or(DEFAULT_MAX_FLASHCARDS),
        };
        request.validate()?;
        let _guard = self.in_flight.begin(OperationKind::Flashcards)?;

        let flashcards = self
            .prompts
            .generate_flashcards(&request.summary_text, request.max_flashcards)
            .await
            .and_then(|output| output.into_flashcards(request.max_flashcards as usize))
            .inspect_err(|e| {
                log::error!("Flashcard generation failed: {}", e);
                self.events.notify(Notification::error(
                    "Flashcard Generation Failed",
                    "Could not generate flashcards.",
                ));
            })?;

        log::info!("Generated {} flashcards", flashcards.len());
        self.events.notify(Notification::success(
            "Flashcards Generated",
            format!("{} flashcards are ready.", flashcards.len()),
        ));
        Ok(flashcards)
    }

    pub async fn generate_hint(&self, question_text: &str, document_summary: &str) -> AppResult<String> {
        let request = HintRequest {
            question_text: question_text.to_string(),
            document_summary: document_summary.to_string(),
        };
        request.validate()?;
        let _guard = self.in_flight.begin(OperationKind::Hint)?;

        let output = self
            .prompts
            .generate_hint(&request.question_text, &request.document_summary)
            .await
            .and_then(|output| {
                output.validate()?;
                Ok(output)
            })
            .inspect_err(|e| {
                log::error!("Hint generation failed: {}", e);
                self.events.notify(Notification::error(
                    "Hint Failed",
                    "Could not generate a hint for this question.",
                ));
            })?;
        Ok(output.hint)
    }

    pub async fn chat(&self, user_input: &str) -> AppResult<String> {
        let request = ChatRequest {
            user_input: user_input.trim().to_string(),
        };
        request.validate()?;
        let _guard = self.in_flight.begin(OperationKind::Chat)?;

        let output = self
            .prompts
            .chat(&request.user_input)
            .await
            .and_then(|output| {
                output.validate()?;
                Ok(output)
            })
            .inspect_err(|e| {
                log::error!("Chat request failed: {}", e);
                self.events.notify(Notification::error(
                    "Chat Error",
                    "Failed to connect to the chatbot.",
                ));
            })?;
        Ok(output.bot_response)
    }
}
