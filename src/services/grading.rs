use crate::{
    auth::policy,
    errors::{AppError, AppResult},
    models::domain::{AttemptRecord, Identity, Quiz},
    services::attempt_ledger::AttemptLedger,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizMode {
    /// Teacher or guest authoring: text is editable and every selection is
    /// graded on the spot.
    Editable,
    /// Student attempt: choices are recorded silently and revealed only after
    /// a single submission.
    Restricted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub is_correct: bool,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionState {
    Unanswered,
    Answered { selection: String, feedback: Feedback },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub question_number: usize,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResults {
    pub score: u32,
    pub total: u32,
    pub rows: Vec<ResultRow>,
}

/// In-progress answers to one quiz. Never persisted; a new quiz means a new
/// session.
#[derive(Debug, Clone)]
pub struct GradingSession {
    quiz_name: String,
    quiz: Quiz,
    mode: QuizMode,
    answers: Vec<QuestionState>,
    submitted: bool,
}

impl GradingSession {
    pub fn new(quiz_name: &str, quiz: Quiz, mode: QuizMode) -> Self {
        let answers = vec![QuestionState::Unanswered; quiz.len()];
        Self {
            quiz_name: quiz_name.to_string(),
            quiz,
            mode,
            answers,
            submitted: false,
        }
    }

    pub fn quiz_name(&self) -> &str {
        &self.quiz_name
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// The quiz as it may be shown: restricted sessions hide reasons until
    /// submission.
    pub fn visible_quiz(&self) -> Quiz {
        if self.mode == QuizMode::Restricted && !self.submitted {
            return self.quiz.without_reasons();
        }
        self.quiz.clone()
    }

    pub fn into_quiz(self) -> Quiz {
        self.quiz
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn total_questions(&self) -> usize {
        self.quiz.len()
    }

    pub fn answered_count(&self) -> usize {
        self.answers
            .iter()
            .filter(|a| matches!(a, QuestionState::Answered { .. }))
            .count()
    }

    /// An empty quiz is never complete.
    pub fn all_attempted(&self) -> bool {
        self.total_questions() > 0 && self.answered_count() == self.total_questions()
    }

    pub fn score(&self) -> usize {
        self.answers
            .iter()
            .filter(|a| matches!(a, QuestionState::Answered { feedback, .. } if feedback.is_correct))
            .count()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn state(&self, question: usize) -> Option<&QuestionState> {
        self.answers.get(question)
    }

    pub fn selection(&self, question: usize) -> Option<&str> {
        match self.answers.get(question) {
            Some(QuestionState::Answered { selection, .. }) => Some(selection),
            _ => None,
        }
    }

    /// Per-question feedback as the user may see it right now.
    pub fn visible_feedback(&self, question: usize) -> Option<&Feedback> {
        if self.mode == QuizMode::Restricted && !self.submitted {
            return None;
        }
        match self.answers.get(question) {
            Some(QuestionState::Answered { feedback, .. }) => Some(feedback),
            _ => None,
        }
    }

    /// Selecting again replaces the earlier answer; there is no way back to
    /// unanswered.
    pub fn select(&mut self, question: usize, option: usize) -> AppResult<()> {
        self.ensure_open()?;
        let q = self.question_at(question)?;
        let selection = q.options.get(option).cloned().ok_or_else(|| {
            AppError::ValidationError(format!(
                "Question {} has no option {}",
                question + 1,
                option + 1
            ))
        })?;

        self.answer(question, selection);
        log::debug!(
            "Question {} of '{}' answered ({} of {})",
            question + 1,
            self.quiz_name,
            self.answered_count(),
            self.total_questions()
        );
        Ok(())
    }

    pub fn edit_question_text(&mut self, question: usize, text: &str) -> AppResult<()> {
        self.ensure_editable()?;
        self.question_at(question)?;
        self.quiz.questions[question].text = text.to_string();
        self.regrade(question);
        Ok(())
    }

    /// Renaming the option that is the correct answer renames the answer too,
    /// and a selection of that option follows the new text.
    pub fn edit_option_text(&mut self, question: usize, option: usize, text: &str) -> AppResult<()> {
        self.ensure_editable()?;
        let q = self.question_at(question)?;
        if option >= q.options.len() {
            return Err(AppError::ValidationError(format!(
                "Question {} has no option {}",
                question + 1,
                option + 1
            )));
        }

        let q = &mut self.quiz.questions[question];
        let old = std::mem::replace(&mut q.options[option], text.to_string());
        if q.correct_answer == old {
            q.correct_answer = text.to_string();
        }
        if let QuestionState::Answered { selection, .. } = &mut self.answers[question] {
            if *selection == old {
                *selection = text.to_string();
            }
        }

        self.regrade(question);
        Ok(())
    }

    /// No check that the new answer is one of the options: a mismatch simply
    /// grades every selection as incorrect.
    pub fn edit_correct_answer(&mut self, question: usize, answer: &str) -> AppResult<()> {
        self.ensure_editable()?;
        self.question_at(question)?;
        self.quiz.questions[question].correct_answer = answer.to_string();
        self.regrade(question);
        Ok(())
    }

    pub fn edit_reason(&mut self, question: usize, reason: &str) -> AppResult<()> {
        self.ensure_editable()?;
        self.question_at(question)?;
        self.quiz.questions[question].reason = reason.to_string();
        self.regrade(question);
        Ok(())
    }

    /// Editable mode shows results once every question is answered;
    /// restricted mode only after submission.
    pub fn results(&self) -> Option<QuizResults> {
        let visible = match self.mode {
            QuizMode::Editable => self.all_attempted(),
            QuizMode::Restricted => self.submitted,
        };
        if !visible {
            return None;
        }

        let rows = self
            .quiz
            .questions
            .iter()
            .zip(&self.answers)
            .enumerate()
            .map(|(i, (q, state))| {
                let (user_answer, is_correct) = match state {
                    QuestionState::Answered { selection, feedback } => {
                        (Some(selection.clone()), feedback.is_correct)
                    }
                    QuestionState::Unanswered => (None, false),
                };
                ResultRow {
                    question_number: i + 1,
                    user_answer,
                    correct_answer: q.correct_answer.clone(),
                    is_correct,
                    reason: q.reason.clone(),
                }
            })
            .collect();

        Some(QuizResults {
            score: self.score() as u32,
            total: self.total_questions() as u32,
            rows,
        })
    }

    /// One-way. The first successful call appends to the ledger and returns
    /// the record; any later call is a no-op returning `None`.
    pub fn submit(
        &mut self,
        identity: Option<&Identity>,
        ledger: &AttemptLedger,
    ) -> AppResult<Option<AttemptRecord>> {
        if self.submitted {
            log::debug!("Ignoring repeated submission of '{}'", self.quiz_name);
            return Ok(None);
        }

        let student = policy::require_student(identity)?;
        if !policy::can_submit_quiz(identity, self) {
            return Err(AppError::ValidationError(format!(
                "Answer all questions before submitting ({} of {} answered)",
                self.answered_count(),
                self.total_questions()
            )));
        }

        let record = ledger.record(
            &student.id,
            self.score() as u32,
            self.total_questions() as u32,
            &self.quiz_name,
        )?;
        self.submitted = true;
        log::info!(
            "Student '{}' submitted '{}' with {}/{}",
            record.student_id,
            record.quiz_name,
            record.score,
            record.total
        );
        Ok(Some(record))
    }

    fn answer(&mut self, question: usize, selection: String) {
        let q = &self.quiz.questions[question];
        let feedback = Feedback {
            is_correct: q.is_correct(&selection),
            reason: q.reason.clone(),
        };
        self.answers[question] = QuestionState::Answered {
            selection,
            feedback,
        };
    }

    fn regrade(&mut self, question: usize) {
        if let QuestionState::Answered { selection, .. } = &self.answers[question] {
            let selection = selection.clone();
            self.answer(question, selection);
        }
    }

    fn question_at(&self, question: usize) -> AppResult<&crate::models::domain::Question> {
        self.quiz.questions.get(question).ok_or_else(|| {
            AppError::ValidationError(format!(
                "Quiz '{}' has no question {}",
                self.quiz_name,
                question + 1
            ))
        })
    }

    fn ensure_open(&self) -> AppResult<()> {
        if self.submitted {
            return Err(AppError::InvalidState(format!(
                "Quiz '{}' has already been submitted",
                self.quiz_name
            )));
        }
        Ok(())
    }

    fn ensure_editable(&self) -> AppResult<()> {
        if self.mode != QuizMode::Editable {
            return Err(AppError::Unauthorized(
                "Quiz content can only be edited by a teacher or guest".to_string(),
            ));
        }
        self.ensure_open()
    }
}
