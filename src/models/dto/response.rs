use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::errors::{AppError, AppResult};
use crate::models::domain::quiz::STANDARD_OPTION_COUNT;
use crate::models::domain::{Flashcard, Question, Quiz, Summary};

/// Which shape a generated quiz is held to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizVariant {
    /// Generated from a document summary; exactly four options per question.
    Standard,
    /// Generated from a free-form topic; any non-empty option list.
    Custom,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeDocumentOutput {
    #[validate(custom(function = "not_blank"))]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_summaries: Option<String>,
}

impl SummarizeDocumentOutput {
    pub fn into_summary(self) -> AppResult<Summary> {
        self.validate()?;
        Ok(Summary {
            main_text: self.summary,
            section_text: self
                .section_summaries
                .filter(|s| !s.trim().is_empty()),
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, JsonSchema)]
#[validate(schema(function = "answer_matches_an_option"))]
pub struct QuizQuestionOutput {
    #[validate(custom(function = "not_blank"))]
    pub question: String,
    #[validate(length(min = 1, message = "a question needs at least one option"))]
    pub options: Vec<String>,
    pub answer: String,
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, JsonSchema)]
pub struct GenerateQuizOutput {
    #[validate(length(min = 1, message = "the quiz has no questions"), nested)]
    pub questions: Vec<QuizQuestionOutput>,
}

impl GenerateQuizOutput {
    pub fn into_quiz(self, variant: QuizVariant) -> AppResult<Quiz> {
        self.validate()?;

        if variant == QuizVariant::Standard {
            if let Some((index, q)) = self
                .questions
                .iter()
                .enumerate()
                .find(|(_, q)| q.options.len() != STANDARD_OPTION_COUNT)
            {
                return Err(AppError::ValidationError(format!(
                    "Question {} has {} options, expected {}",
                    index + 1,
                    q.options.len(),
                    STANDARD_OPTION_COUNT
                )));
            }
        }

        let questions = self
            .questions
            .into_iter()
            .map(|q| Question {
                text: q.question,
                options: q.options,
                correct_answer: q.answer,
                reason: q.reason,
            })
            .collect();

        Ok(Quiz::new(questions))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, JsonSchema)]
pub struct FlashcardOutput {
    #[validate(custom(function = "not_blank"))]
    pub term: String,
    #[validate(custom(function = "not_blank"))]
    pub definition: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, JsonSchema)]
pub struct GenerateFlashcardsOutput {
    #[validate(nested)]
    pub flashcards: Vec<FlashcardOutput>,
}

impl GenerateFlashcardsOutput {
    pub fn into_flashcards(self, max: usize) -> AppResult<Vec<Flashcard>> {
        self.validate()?;
        Ok(self
            .flashcards
            .into_iter()
            .take(max)
            .map(|f| Flashcard {
                term: f.term,
                definition: f.definition,
            })
            .collect())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, JsonSchema)]
pub struct GenerateQuizHintOutput {
    #[validate(custom(function = "not_blank"))]
    pub hint: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatOutput {
    #[validate(custom(function = "not_blank"))]
    pub bot_response: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("value cannot be empty".into());
        return Err(err);
    }
    Ok(())
}

fn answer_matches_an_option(question: &QuizQuestionOutput) -> Result<(), ValidationError> {
    if question.options.iter().any(|o| o == &question.answer) {
        return Ok(());
    }
    let mut err = ValidationError::new("answer_not_in_options");
    err.message = Some(format!("answer '{}' matches none of the options", question.answer).into());
    Err(err)
}
