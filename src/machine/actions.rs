//! Transition actions - context mutations applied by the reducer

use super::context::{EndReason, SessionContext};
use crate::config::Question;

/// Score the answer for the current question and update lives and streaks
pub fn record_answer(ctx: &mut SessionContext, answer: usize) {
    let index = ctx.current_question_index;
    let correct = match ctx.quiz_questions.get(index) {
        Some(question) => question.is_correct(answer),
        None => return,
    };

    ctx.user_answers[index] = Some(answer);

    if correct {
        ctx.current_streak += 1;
        ctx.longest_streak = ctx.longest_streak.max(ctx.current_streak);
    } else {
        ctx.wrong_answer_count += 1;
        ctx.current_streak = 0;
    }
}

/// Outcome of one second of clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Clock already at zero, context untouched
    Stopped,
    Running,
    /// This tick drove the clock to zero
    Expired,
}

/// Count one second down and charge it to the current question
pub fn tick(ctx: &mut SessionContext) -> TickOutcome {
    if ctx.time_remaining == 0 {
        return TickOutcome::Stopped;
    }

    ctx.time_remaining -= 1;
    ctx.total_time_elapsed += 1;
    if let Some(spent) = ctx.time_per_question.get_mut(ctx.current_question_index) {
        *spent += 1;
    }

    if ctx.time_remaining == 0 {
        TickOutcome::Expired
    } else {
        TickOutcome::Running
    }
}

/// TIME_UP from the host: stop the clock where it is
#[inline]
pub fn expire_clock(ctx: &mut SessionContext) {
    ctx.time_remaining = 0;
}

#[inline]
pub fn count_pause(ctx: &mut SessionContext) {
    ctx.pauses_used += 1;
}

pub fn count_hint(ctx: &mut SessionContext) {
    if let Some(hints) = ctx.hints_used.get_mut(ctx.current_question_index) {
        *hints += 1;
    }
}

#[inline]
pub fn advance_question(ctx: &mut SessionContext) {
    ctx.current_question_index = (ctx.current_question_index + 1).min(ctx.question_len());
}

/// Record the first reason the playing phase ended
#[inline]
pub fn mark_ended(ctx: &mut SessionContext, reason: EndReason) {
    ctx.ended_by.get_or_insert(reason);
}

/// Point at the first answered question, or 0 when none was answered
pub fn jump_to_first_answered(ctx: &mut SessionContext) {
    ctx.current_question_index = ctx.first_answered_index().unwrap_or(0);
}

#[inline]
pub fn jump_past_end(ctx: &mut SessionContext) {
    ctx.current_question_index = ctx.question_len();
}

#[inline]
pub fn navigate(ctx: &mut SessionContext, index: usize) {
    ctx.current_question_index = index;
}

/// Replace the context wholesale, keeping only the config
pub fn restart(ctx: &mut SessionContext, questions: Vec<Question>) {
    let config = ctx.config.clone();
    *ctx = SessionContext::new(questions, config);
}
