use crate::{
    errors::{AppError, AppResult},
    models::domain::{Bundle, Identity},
    services::grading::{GradingSession, QuizMode},
};

/// Teachers and guests author content; students only take quizzes.
pub fn can_edit_content(identity: Option<&Identity>) -> bool {
    !identity.is_some_and(Identity::is_student)
}

pub fn can_publish(identity: Option<&Identity>) -> bool {
    identity.is_some_and(Identity::is_teacher)
}

pub fn can_submit_quiz(identity: Option<&Identity>, session: &GradingSession) -> bool {
    identity.is_some_and(Identity::is_student)
        && session.all_attempted()
        && !session.is_submitted()
}

/// What the current identity gets to see of the active bundle. Students get
/// the quiz without reasons; the results table reveals them after submission.
pub fn visible_publication(identity: Option<&Identity>, bundle: Option<&Bundle>) -> Option<Bundle> {
    let bundle = bundle?;
    if identity.is_some_and(Identity::is_student) {
        return Some(Bundle {
            quiz: bundle.quiz.without_reasons(),
            ..bundle.clone()
        });
    }
    Some(bundle.clone())
}

pub fn quiz_mode_for(identity: Option<&Identity>) -> QuizMode {
    if can_edit_content(identity) {
        QuizMode::Editable
    } else {
        QuizMode::Restricted
    }
}

pub fn require_teacher(identity: Option<&Identity>) -> AppResult<&Identity> {
    match identity {
        Some(identity) if identity.is_teacher() => Ok(identity),
        _ => Err(AppError::Unauthorized(
            "Only teachers can perform this action".to_string(),
        )),
    }
}

pub fn require_student(identity: Option<&Identity>) -> AppResult<&Identity> {
    match identity {
        Some(identity) if identity.is_student() => Ok(identity),
        _ => Err(AppError::Unauthorized(
            "Only students can submit quizzes".to_string(),
        )),
    }
}

pub fn require_editor(identity: Option<&Identity>) -> AppResult<()> {
    if !can_edit_content(identity) {
        return Err(AppError::Unauthorized(
            "Students cannot edit quiz content".to_string(),
        ));
    }
    Ok(())
}
