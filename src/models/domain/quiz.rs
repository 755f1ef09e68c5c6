use serde::{Deserialize, Serialize};

/// Standard generated quizzes carry exactly this many options per question.
pub const STANDARD_OPTION_COUNT: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    pub options: Vec<String>,
    #[serde(rename = "answer")]
    pub correct_answer: String,
    pub reason: String,
}

impl Question {
    pub fn new(text: &str, options: &[&str], correct_answer: &str, reason: &str) -> Self {
        Question {
            text: text.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct_answer.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Exact string comparison, no trimming or case folding.
    pub fn is_correct(&self, selection: &str) -> bool {
        self.correct_answer == selection
    }

    pub fn answer_matches_an_option(&self) -> bool {
        self.options.iter().any(|o| o == &self.correct_answer)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn new(questions: Vec<Question>) -> Self {
        Quiz { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Copy of the quiz with every explanation blanked, for students mid-attempt.
    pub fn without_reasons(&self) -> Self {
        Quiz {
            questions: self
                .questions
                .iter()
                .map(|q| Question {
                    reason: String::new(),
                    ..q.clone()
                })
                .collect(),
        }
    }
}
