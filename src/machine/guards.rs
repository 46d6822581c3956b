//! Guard predicates and the ordered rules for answerFeedback's exit

use super::context::SessionContext;
use super::state::QuizState;

/// A guard over the session context
pub type Guard = fn(&SessionContext) -> bool;

/// Lives system on and the wrong-answer budget spent
#[inline]
pub fn lives_exhausted(ctx: &SessionContext) -> bool {
    ctx.config.lives_system && ctx.wrong_answer_count >= ctx.config.max_wrong_answers
}

#[inline]
pub fn is_last_question(ctx: &SessionContext) -> bool {
    ctx.current_question_index + 1 >= ctx.question_len()
}

#[inline]
pub fn pause_allowed(ctx: &SessionContext) -> bool {
    ctx.config.pause_allowed
}

/// Exit rules for answerFeedback, first match wins.
/// Falling through all rules advances to the next question.
pub const FEEDBACK_RULES: [(Guard, QuizState); 2] = [
    (lives_exhausted, QuizState::GameOver),
    (is_last_question, QuizState::QuizComplete),
];

/// Resolve answerFeedback's destination
pub fn resolve_feedback_exit(ctx: &SessionContext) -> QuizState {
    FEEDBACK_RULES
        .iter()
        .find(|(guard, _)| guard(ctx))
        .map(|(_, target)| *target)
        .unwrap_or(QuizState::Playing)
}
