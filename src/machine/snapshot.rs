//! Snapshots and results handed to the host

use serde::Serialize;

use super::context::{EndReason, SessionContext};
use super::state::{QuizState, Scheduled};
use crate::config::Question;
use crate::error::Result;

/// Read-only view of the engine after a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub state: QuizState,
    pub context: SessionContext,
    /// Delayed event the host must deliver to leave this state
    pub scheduled: Option<Scheduled>,
}

impl Snapshot {
    pub fn new(state: QuizState, context: SessionContext) -> Self {
        let scheduled = scheduled_for(state, &context);
        Self {
            state,
            context,
            scheduled,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Whether the host should offer a pause button
    #[inline]
    pub fn can_pause(&self) -> bool {
        self.state == QuizState::Playing && self.context.config.pause_allowed
    }

    #[inline]
    pub fn can_answer(&self) -> bool {
        self.state == QuizState::Playing && self.context.current_question().is_some()
    }

    #[inline]
    pub fn current_question(&self) -> Option<&Question> {
        self.context.current_question()
    }

    #[inline]
    pub fn lives_remaining(&self) -> Option<u32> {
        self.context.lives_remaining()
    }

    #[inline]
    pub fn is_answered(&self, index: usize) -> bool {
        self.context.is_answered(index)
    }
}

/// Delayed transition owed by `state`, sized by the session's timing policy
pub fn scheduled_for(state: QuizState, ctx: &SessionContext) -> Option<Scheduled> {
    state.delay_kind().map(|kind| Scheduled {
        kind,
        delay: kind.delay(&ctx.config.timing),
    })
}

/// Results payload for persistence, built once the session reaches summary.
/// Pass/fail is left to the host; `passing_percentage` is echoed for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResults {
    pub question_ids: Vec<String>,
    pub user_answers: Vec<Option<usize>>,
    pub total_questions: usize,
    pub answered_count: usize,
    pub correct_count: usize,
    pub wrong_answer_count: u32,
    pub score_percentage: f64,
    pub passing_percentage: u32,
    pub time_per_question: Vec<u32>,
    pub total_time_elapsed: u32,
    pub longest_streak: u32,
    pub pauses_used: u32,
    pub hints_used: Vec<u32>,
    pub ended_by: Option<EndReason>,
}

impl SessionResults {
    pub fn from_context(ctx: &SessionContext) -> Self {
        let total = ctx.question_len();
        let correct = ctx.correct_count();
        let score_percentage = if total == 0 {
            0.0
        } else {
            correct as f64 * 100.0 / total as f64
        };

        Self {
            question_ids: ctx.quiz_questions.iter().map(|q| q.id.clone()).collect(),
            user_answers: ctx.user_answers.clone(),
            total_questions: total,
            answered_count: ctx.answered_count(),
            correct_count: correct,
            wrong_answer_count: ctx.wrong_answer_count,
            score_percentage,
            passing_percentage: ctx.config.passing_percentage,
            time_per_question: ctx.time_per_question.clone(),
            total_time_elapsed: ctx.total_time_elapsed,
            longest_streak: ctx.longest_streak,
            pauses_used: ctx.pauses_used,
            hints_used: ctx.hints_used.clone(),
            ended_by: ctx.ended_by,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::machine::state::DelayKind;
    use std::time::Duration;

    fn ctx(n: usize) -> SessionContext {
        let questions = (0..n).map(|i| Question::new(format!("q{}", i), 1)).collect();
        SessionContext::new(questions, SessionConfig::default())
    }

    #[test]
    fn test_pause_affordance() {
        let snap = Snapshot::new(QuizState::Playing, ctx(2));
        assert!(snap.can_pause());

        let mut no_pause = ctx(2);
        no_pause.config.pause_allowed = false;
        assert!(!Snapshot::new(QuizState::Playing, no_pause).can_pause());
        assert!(!Snapshot::new(QuizState::AnswerFeedback, ctx(2)).can_pause());
    }

    #[test]
    fn test_scheduled_follows_state() {
        let snap = Snapshot::new(QuizState::AnswerFeedback, ctx(2));
        let scheduled = snap.scheduled.unwrap();
        assert_eq!(scheduled.kind, DelayKind::Feedback);
        assert_eq!(scheduled.delay, Duration::from_millis(1500));

        assert!(Snapshot::new(QuizState::Playing, ctx(2)).scheduled.is_none());
    }

    #[test]
    fn test_snapshot_json() {
        let json = Snapshot::new(QuizState::GameOver, ctx(1)).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["state"], "gameOver");
        assert_eq!(value["context"]["currentQuestionIndex"], 0);
        assert_eq!(value["context"]["config"]["livesSystem"], true);
        assert_eq!(value["scheduled"]["kind"], "gameOver");
        assert_eq!(value["scheduled"]["delay"], 2000);
    }

    #[test]
    fn test_results_scoring() {
        let mut c = ctx(4);
        c.user_answers = vec![Some(1), Some(0), Some(1), None];
        c.wrong_answer_count = 1;
        c.longest_streak = 1;
        c.ended_by = Some(EndReason::TimeExpired);

        let results = SessionResults::from_context(&c);
        assert_eq!(results.total_questions, 4);
        assert_eq!(results.answered_count, 3);
        assert_eq!(results.correct_count, 2);
        assert!((results.score_percentage - 50.0).abs() < f64::EPSILON);
        assert_eq!(results.passing_percentage, 70);
        assert_eq!(results.question_ids, vec!["q0", "q1", "q2", "q3"]);
        assert_eq!(results.ended_by, Some(EndReason::TimeExpired));
    }
}
