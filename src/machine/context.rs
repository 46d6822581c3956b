//! Session context - the mutable state container owned by the engine

use serde::Serialize;

use crate::config::{Question, SessionConfig};

/// Why the playing phase ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EndReason {
    /// The last question was answered
    Completed,
    /// The countdown reached zero
    TimeExpired,
    /// The wrong-answer budget ran out
    LivesExhausted,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::Completed => "completed",
            EndReason::TimeExpired => "timeExpired",
            EndReason::LivesExhausted => "livesExhausted",
        }
    }
}

/// Session context, read by the host through snapshots
///
/// Per-question vectors (`user_answers`, `time_per_question`, `hints_used`)
/// are always the same length as `quiz_questions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub quiz_questions: Vec<Question>,
    pub user_answers: Vec<Option<usize>>,
    /// 0..=len(quiz_questions); len marks "past the last question"
    pub current_question_index: usize,
    pub wrong_answer_count: u32,
    pub time_remaining: u32,
    pub total_time_elapsed: u32,
    pub time_per_question: Vec<u32>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub pauses_used: u32,
    pub hints_used: Vec<u32>,
    pub ended_by: Option<EndReason>,
    pub config: SessionConfig,
}

impl SessionContext {
    /// Build a fresh context with all counters zeroed
    pub fn new(questions: Vec<Question>, config: SessionConfig) -> Self {
        let len = questions.len();
        Self {
            quiz_questions: questions,
            user_answers: vec![None; len],
            current_question_index: 0,
            wrong_answer_count: 0,
            time_remaining: config.time_limit_seconds,
            total_time_elapsed: 0,
            time_per_question: vec![0; len],
            current_streak: 0,
            longest_streak: 0,
            pauses_used: 0,
            hints_used: vec![0; len],
            ended_by: None,
            config,
        }
    }

    #[inline]
    pub fn question_len(&self) -> usize {
        self.quiz_questions.len()
    }

    /// Question under the pointer, `None` once past the last one
    #[inline]
    pub fn current_question(&self) -> Option<&Question> {
        self.quiz_questions.get(self.current_question_index)
    }

    #[inline]
    pub fn is_answered(&self, index: usize) -> bool {
        matches!(self.user_answers.get(index), Some(Some(_)))
    }

    pub fn first_answered_index(&self) -> Option<usize> {
        self.user_answers.iter().position(Option::is_some)
    }

    pub fn answered_count(&self) -> usize {
        self.user_answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn correct_count(&self) -> usize {
        self.quiz_questions
            .iter()
            .zip(&self.user_answers)
            .filter(|(q, a)| matches!(a, Some(answer) if q.is_correct(*answer)))
            .count()
    }

    /// Remaining wrong answers before game over, `None` without a lives system
    pub fn lives_remaining(&self) -> Option<u32> {
        if !self.config.lives_system {
            return None;
        }
        Some(
            self.config
                .max_wrong_answers
                .saturating_sub(self.wrong_answer_count),
        )
    }
}
