use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_MAX_FLASHCARDS: u8 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    Medium,
    #[default]
    Detailed,
}

impl SummaryLength {
    pub fn instruction(&self) -> &'static str {
        match self {
            SummaryLength::Short => "a short",
            SummaryLength::Medium => "a medium-length",
            SummaryLength::Detailed => "a **detailed**",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct SummarizeRequest {
    #[validate(length(min = 1, message = "Document content cannot be empty"))]
    pub document_text: String,

    #[serde(default)]
    pub length: SummaryLength,

    #[validate(length(min = 1, max = 200))]
    pub focus: Option<String>,
}

impl SummarizeRequest {
    pub fn new(document_text: &str) -> Self {
        Self {
            document_text: document_text.to_string(),
            length: SummaryLength::default(),
            focus: None,
        }
    }

    pub fn with_length(mut self, length: SummaryLength) -> Self {
        self.length = length;
        self
    }

    pub fn with_focus(mut self, focus: &str) -> Self {
        self.focus = Some(focus.to_string());
        self
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CustomQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub topic: String,

    #[validate(range(min = 5, max = 20))]
    pub num_questions: u8,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct FlashcardsRequest {
    #[validate(length(min = 1))]
    pub summary_text: String,

    #[validate(range(min = 5, max = 20))]
    pub max_flashcards: u8,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct HintRequest {
    #[validate(length(min = 1))]
    pub question_text: String,

    #[validate(length(min = 1))]
    pub document_summary: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 4000))]
    pub user_input: String,
}
