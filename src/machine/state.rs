//! States, events and delayed-transition markers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::config::{Question, TimingPolicy};

/// Machine states. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuizState {
    Countdown,
    Playing,
    AnswerFeedback,
    Paused,
    GameOver,
    QuizComplete,
    ReviewMode,
    Summary,
}

impl QuizState {
    pub const ALL: [QuizState; 8] = [
        QuizState::Countdown,
        QuizState::Playing,
        QuizState::AnswerFeedback,
        QuizState::Paused,
        QuizState::GameOver,
        QuizState::QuizComplete,
        QuizState::ReviewMode,
        QuizState::Summary,
    ];

    /// Tag used on the host side
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizState::Countdown => "countdown",
            QuizState::Playing => "playing",
            QuizState::AnswerFeedback => "answerFeedback",
            QuizState::Paused => "paused",
            QuizState::GameOver => "gameOver",
            QuizState::QuizComplete => "quizComplete",
            QuizState::ReviewMode => "reviewMode",
            QuizState::Summary => "summary",
        }
    }

    /// States in which TICK counts down
    #[inline]
    pub fn is_clock_running(&self) -> bool {
        matches!(self, QuizState::Playing | QuizState::AnswerFeedback)
    }

    /// The automatic transition leaving this state, if any
    pub fn delay_kind(&self) -> Option<DelayKind> {
        match self {
            QuizState::AnswerFeedback => Some(DelayKind::Feedback),
            QuizState::GameOver => Some(DelayKind::GameOver),
            QuizState::QuizComplete => Some(DelayKind::Completion),
            _ => None,
        }
    }
}

impl fmt::Display for QuizState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synthetic events standing in for the machine's timed transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DelayKind {
    /// Leaves answerFeedback
    Feedback,
    /// Leaves gameOver
    GameOver,
    /// Leaves quizComplete for reviewMode
    Completion,
}

impl DelayKind {
    pub fn delay(&self, timing: &TimingPolicy) -> Duration {
        match self {
            DelayKind::Feedback => timing.feedback_delay(),
            DelayKind::GameOver => timing.game_over_delay(),
            DelayKind::Completion => timing.completion_delay(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DelayKind::Feedback => "feedback",
            DelayKind::GameOver => "gameOver",
            DelayKind::Completion => "completion",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "feedback" => Some(DelayKind::Feedback),
            "gameOver" | "game_over" => Some(DelayKind::GameOver),
            "completion" => Some(DelayKind::Completion),
            _ => None,
        }
    }
}

/// A delayed event the host must deliver once `delay` has passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheduled {
    pub kind: DelayKind,
    #[serde(with = "duration_millis")]
    pub delay: Duration,
}

impl Scheduled {
    /// The event to dispatch when the delay expires
    #[inline]
    pub fn event(&self) -> Event {
        Event::DelayElapsed { kind: self.kind }
    }
}

/// Events accepted by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    Start,
    #[serde(rename_all = "camelCase")]
    Answer {
        answer_index: usize,
    },
    Pause,
    Unpause,
    Tick,
    TimeUp,
    HintUsed,
    DelayElapsed {
        kind: DelayKind,
    },
    #[serde(rename_all = "camelCase")]
    NavigateToQuestion {
        question_index: usize,
    },
    ViewSummary,
    Review,
    Restart {
        questions: Vec<Question>,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Start => "START",
            Event::Answer { .. } => "ANSWER",
            Event::Pause => "PAUSE",
            Event::Unpause => "UNPAUSE",
            Event::Tick => "TICK",
            Event::TimeUp => "TIME_UP",
            Event::HintUsed => "HINT_USED",
            Event::DelayElapsed { .. } => "DELAY_ELAPSED",
            Event::NavigateToQuestion { .. } => "NAVIGATE_TO_QUESTION",
            Event::ViewSummary => "VIEW_SUMMARY",
            Event::Review => "REVIEW",
            Event::Restart { .. } => "RESTART",
        }
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(delay.as_millis() as u64)
    }
}
