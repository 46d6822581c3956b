//! Session configuration structures

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{QuizError, Result};

/// Immutable parameters for one quiz session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    pub question_count: u32,
    pub time_limit_seconds: u32,
    /// Score threshold applied by the host, 0..=100
    pub passing_percentage: u32,
    pub lives_system: bool,
    pub max_wrong_answers: u32,
    pub pause_allowed: bool,
    pub timing: TimingPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            question_count: 10,
            time_limit_seconds: 60,
            passing_percentage: 70,
            lives_system: true,
            max_wrong_answers: 3,
            pause_allowed: true,
            timing: TimingPolicy::default(),
        }
    }
}

impl SessionConfig {
    /// Parse a config from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run
    pub fn validate(&self) -> Result<()> {
        if self.time_limit_seconds == 0 {
            return Err(QuizError::InvalidConfig(
                "timeLimitSeconds must be positive".to_string(),
            ));
        }
        if self.passing_percentage > 100 {
            return Err(QuizError::InvalidConfig(format!(
                "passingPercentage must be at most 100, got {}",
                self.passing_percentage
            )));
        }
        if self.lives_system && self.max_wrong_answers == 0 {
            return Err(QuizError::InvalidConfig(
                "maxWrongAnswers must be positive when the lives system is on".to_string(),
            ));
        }
        if self.timing.tick_interval_ms == 0 {
            return Err(QuizError::InvalidConfig(
                "tickIntervalMs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Delays for the machine's automatic transitions, delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimingPolicy {
    pub tick_interval_ms: u64,
    /// answerFeedback -> next state
    pub feedback_delay_ms: u64,
    /// gameOver -> quizComplete
    pub game_over_delay_ms: u64,
    /// quizComplete -> reviewMode
    pub completion_delay_ms: u64,
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            feedback_delay_ms: 1500,
            game_over_delay_ms: 2000,
            completion_delay_ms: 0,
        }
    }
}

impl TimingPolicy {
    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[inline]
    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }

    #[inline]
    pub fn game_over_delay(&self) -> Duration {
        Duration::from_millis(self.game_over_delay_ms)
    }

    #[inline]
    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }
}
