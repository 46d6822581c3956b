//! Configuration module for session data structures
//!
//! Sessions are configured from JSON or, with the `python` feature, from
//! Python dicts and objects.

mod question;
mod session;

pub use question::*;
pub use session::*;

#[cfg(feature = "python")]
pub use python::*;

#[cfg(feature = "python")]
mod python {
    use super::{validate_questions, Question, SessionConfig, TimingPolicy};
    use pyo3::types::{PyAnyMethods, PyDict, PyDictMethods, PyList, PyListMethods};
    use pyo3::Bound;

    /// Helper to get attribute from either dict or object
    fn get_attr<'py>(
        obj: &Bound<'py, pyo3::PyAny>,
        name: &str,
    ) -> pyo3::PyResult<Bound<'py, pyo3::PyAny>> {
        if let Ok(dict) = obj.downcast::<PyDict>() {
            dict.get_item(name)?
                .ok_or_else(|| pyo3::exceptions::PyKeyError::new_err(name.to_string()))
        } else {
            obj.getattr(name)
        }
    }

    /// Helper to get optional attribute from either dict or object
    fn get_attr_opt<'py>(
        obj: &Bound<'py, pyo3::PyAny>,
        name: &str,
    ) -> Option<Bound<'py, pyo3::PyAny>> {
        let value = if let Ok(dict) = obj.downcast::<PyDict>() {
            dict.get_item(name).ok().flatten()
        } else {
            obj.getattr(name).ok()
        };
        value.filter(|v| !v.is_none())
    }

    /// Deserialize a session config, accepting snake_case or camelCase keys
    pub fn deserialize_session_config(
        obj: &Bound<'_, pyo3::PyAny>,
    ) -> pyo3::PyResult<SessionConfig> {
        let defaults = SessionConfig::default();
        let field = |snake: &str, camel: &str| get_attr_opt(obj, snake).or_else(|| get_attr_opt(obj, camel));

        let timing = match field("timing", "timing") {
            Some(timing_obj) => extract_timing(&timing_obj)?,
            None => defaults.timing,
        };

        let config = SessionConfig {
            question_count: match field("question_count", "questionCount") {
                Some(v) => v.extract()?,
                None => defaults.question_count,
            },
            time_limit_seconds: match field("time_limit_seconds", "timeLimitSeconds") {
                Some(v) => v.extract()?,
                None => defaults.time_limit_seconds,
            },
            passing_percentage: match field("passing_percentage", "passingPercentage") {
                Some(v) => v.extract()?,
                None => defaults.passing_percentage,
            },
            lives_system: match field("lives_system", "livesSystem") {
                Some(v) => v.extract()?,
                None => defaults.lives_system,
            },
            max_wrong_answers: match field("max_wrong_answers", "maxWrongAnswers") {
                Some(v) => v.extract()?,
                None => defaults.max_wrong_answers,
            },
            pause_allowed: match field("pause_allowed", "pauseAllowed") {
                Some(v) => v.extract()?,
                None => defaults.pause_allowed,
            },
            timing,
        };

        config.validate()?;
        Ok(config)
    }

    fn extract_timing(obj: &Bound<'_, pyo3::PyAny>) -> pyo3::PyResult<TimingPolicy> {
        let defaults = TimingPolicy::default();
        let millis = |snake: &str, camel: &str, fallback: u64| -> pyo3::PyResult<u64> {
            match get_attr_opt(obj, snake).or_else(|| get_attr_opt(obj, camel)) {
                Some(v) => v.extract(),
                None => Ok(fallback),
            }
        };

        Ok(TimingPolicy {
            tick_interval_ms: millis("tick_interval_ms", "tickIntervalMs", defaults.tick_interval_ms)?,
            feedback_delay_ms: millis("feedback_delay_ms", "feedbackDelayMs", defaults.feedback_delay_ms)?,
            game_over_delay_ms: millis("game_over_delay_ms", "gameOverDelayMs", defaults.game_over_delay_ms)?,
            completion_delay_ms: millis("completion_delay_ms", "completionDelayMs", defaults.completion_delay_ms)?,
        })
    }

    /// Deserialize an ordered question list
    pub fn deserialize_questions(list: &Bound<'_, PyList>) -> pyo3::PyResult<Vec<Question>> {
        let mut questions = Vec::with_capacity(list.len());
        for item in list.iter() {
            questions.push(extract_question(&item)?);
        }
        validate_questions(&questions)?;
        Ok(questions)
    }

    fn extract_question(obj: &Bound<'_, pyo3::PyAny>) -> pyo3::PyResult<Question> {
        // Ids may arrive as ints from some question banks
        let id_obj = get_attr(obj, "id")?;
        let id: String = match id_obj.extract::<String>() {
            Ok(id) => id,
            Err(_) => id_obj.extract::<i64>()?.to_string(),
        };
        let correct_answer: usize = match get_attr_opt(obj, "correct_answer") {
            Some(v) => v.extract()?,
            None => get_attr(obj, "correctAnswer")?.extract()?,
        };
        let prompt: String = get_attr_opt(obj, "prompt")
            .and_then(|v| v.extract().ok())
            .unwrap_or_default();
        let options: Vec<String> = get_attr_opt(obj, "options")
            .map(|v| v.extract())
            .transpose()?
            .unwrap_or_default();
        let explanation: Option<String> =
            get_attr_opt(obj, "explanation").and_then(|v| v.extract().ok());

        Ok(Question {
            id,
            prompt,
            options,
            correct_answer,
            explanation,
        })
    }
}
