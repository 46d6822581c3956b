//! QuizSession - Python handle around a quiz engine
//!
//! The engine lives in Rust heap memory; Python dispatches events through
//! methods and reads state lazily through getters or a snapshot dict.
//! Every event method returns whether the event was applied.

use parking_lot::Mutex;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::config::{deserialize_questions, deserialize_session_config, SessionConfig};
use crate::machine::{DelayKind, Event, QuizEngine, SessionContext, SessionResults, Snapshot};

// ============================================================================
// QuizSession PyClass
// ============================================================================

/// Stateful quiz session driven by the Python host
///
/// # Thread Safety
/// The engine sits behind a mutex, so the handle is Send + Sync and may be
/// shared with a host-side timer thread.
#[pyclass]
pub struct QuizSession {
    engine: Mutex<QuizEngine>,
}

impl QuizSession {
    pub fn from_engine(engine: QuizEngine) -> Self {
        Self {
            engine: Mutex::new(engine),
        }
    }

    fn dispatch(&self, event: Event) -> bool {
        self.engine.lock().send(event).handled
    }
}

// ============================================================================
// PyMethods Implementation
// ============================================================================

#[pymethods]
impl QuizSession {
    /// Create a session in the countdown state
    ///
    /// # Arguments
    /// * `questions` - Ordered list of question dicts/objects
    /// * `config` - Optional session config; falls back to the config cached
    ///   by `init_config`, then to built-in defaults
    #[new]
    #[pyo3(signature = (questions, config=None))]
    fn new(questions: &Bound<'_, PyList>, config: Option<&Bound<'_, PyAny>>) -> PyResult<Self> {
        let questions = deserialize_questions(questions)?;
        let config = match config {
            Some(obj) if !obj.is_none() => deserialize_session_config(obj)?,
            _ => crate::cached_config().unwrap_or_else(SessionConfig::default),
        };
        let engine = QuizEngine::new(questions, config)?;
        Ok(Self::from_engine(engine))
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    fn start(&self) -> bool {
        self.dispatch(Event::Start)
    }

    fn answer(&self, answer_index: usize) -> bool {
        self.dispatch(Event::Answer { answer_index })
    }

    fn pause(&self) -> bool {
        self.dispatch(Event::Pause)
    }

    fn unpause(&self) -> bool {
        self.dispatch(Event::Unpause)
    }

    fn tick(&self) -> bool {
        self.dispatch(Event::Tick)
    }

    fn time_up(&self) -> bool {
        self.dispatch(Event::TimeUp)
    }

    fn hint_used(&self) -> bool {
        self.dispatch(Event::HintUsed)
    }

    /// Deliver a delayed transition: "feedback", "gameOver" or "completion"
    fn delay_elapsed(&self, kind: &str) -> PyResult<bool> {
        let kind = DelayKind::parse(kind).ok_or_else(|| {
            pyo3::exceptions::PyValueError::new_err(format!("Unknown delay kind: {}", kind))
        })?;
        Ok(self.dispatch(Event::DelayElapsed { kind }))
    }

    fn navigate_to_question(&self, question_index: usize) -> bool {
        self.dispatch(Event::NavigateToQuestion { question_index })
    }

    fn view_summary(&self) -> bool {
        self.dispatch(Event::ViewSummary)
    }

    fn review(&self) -> bool {
        self.dispatch(Event::Review)
    }

    /// Start over with a new question list (only from summary)
    fn restart(&self, questions: &Bound<'_, PyList>) -> PyResult<bool> {
        let questions = deserialize_questions(questions)?;
        Ok(self.dispatch(Event::Restart { questions }))
    }

    // ------------------------------------------------------------------------
    // Getter Properties
    // ------------------------------------------------------------------------

    #[getter]
    fn state(&self) -> &'static str {
        self.engine.lock().state().as_str()
    }

    #[getter]
    fn time_remaining(&self) -> u32 {
        self.engine.lock().context().time_remaining
    }

    #[getter]
    fn current_question_index(&self) -> usize {
        self.engine.lock().context().current_question_index
    }

    #[getter]
    fn wrong_answer_count(&self) -> u32 {
        self.engine.lock().context().wrong_answer_count
    }

    /// None when the lives system is off
    #[getter]
    fn lives_remaining(&self) -> Option<u32> {
        self.engine.lock().context().lives_remaining()
    }

    #[getter]
    fn can_pause(&self) -> bool {
        self.engine.lock().snapshot().can_pause()
    }

    /// Pending delayed transition as (kind, delay_ms), or None
    fn pending_delay(&self) -> Option<(&'static str, u64)> {
        self.engine
            .lock()
            .scheduled()
            .map(|s| (s.kind.as_str(), s.delay.as_millis() as u64))
    }

    // ------------------------------------------------------------------------
    // Snapshot Access
    // ------------------------------------------------------------------------

    /// Current state and context as a dict
    fn snapshot(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let snapshot = self.engine.lock().snapshot();
        Ok(snapshot_to_dict(py, &snapshot)?.into())
    }

    /// Current snapshot serialized as camelCase JSON
    fn snapshot_json(&self) -> PyResult<String> {
        Ok(self.engine.lock().snapshot().to_json()?)
    }

    /// Results payload, or None before the summary screen
    fn results(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        match self.engine.lock().results() {
            Some(results) => Ok(results_to_dict(py, &results)?.into()),
            None => Ok(py.None()),
        }
    }
}

// ============================================================================
// Private Helpers
// ============================================================================

fn snapshot_to_dict<'py>(py: Python<'py>, snapshot: &Snapshot) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("state", snapshot.state.as_str())?;
    dict.set_item("context", context_to_dict(py, &snapshot.context)?)?;
    dict.set_item("can_pause", snapshot.can_pause())?;
    dict.set_item("can_answer", snapshot.can_answer())?;

    match snapshot.scheduled {
        Some(scheduled) => {
            let sched = PyDict::new(py);
            sched.set_item("kind", scheduled.kind.as_str())?;
            sched.set_item("delay_ms", scheduled.delay.as_millis() as u64)?;
            dict.set_item("scheduled", sched)?;
        }
        None => dict.set_item("scheduled", py.None())?,
    }

    Ok(dict)
}

fn context_to_dict<'py>(py: Python<'py>, ctx: &SessionContext) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);

    let ids: Vec<&str> = ctx.quiz_questions.iter().map(|q| q.id.as_str()).collect();
    dict.set_item("question_ids", ids)?;
    dict.set_item("user_answers", &ctx.user_answers)?;
    dict.set_item("current_question_index", ctx.current_question_index)?;
    dict.set_item("wrong_answer_count", ctx.wrong_answer_count)?;
    dict.set_item("time_remaining", ctx.time_remaining)?;
    dict.set_item("total_time_elapsed", ctx.total_time_elapsed)?;
    dict.set_item("time_per_question", &ctx.time_per_question)?;
    dict.set_item("current_streak", ctx.current_streak)?;
    dict.set_item("longest_streak", ctx.longest_streak)?;
    dict.set_item("pauses_used", ctx.pauses_used)?;
    dict.set_item("hints_used", &ctx.hints_used)?;
    dict.set_item("lives_remaining", ctx.lives_remaining())?;

    let config = PyDict::new(py);
    config.set_item("question_count", ctx.config.question_count)?;
    config.set_item("time_limit_seconds", ctx.config.time_limit_seconds)?;
    config.set_item("passing_percentage", ctx.config.passing_percentage)?;
    config.set_item("lives_system", ctx.config.lives_system)?;
    config.set_item("max_wrong_answers", ctx.config.max_wrong_answers)?;
    config.set_item("pause_allowed", ctx.config.pause_allowed)?;
    dict.set_item("config", config)?;

    Ok(dict)
}

fn results_to_dict<'py>(py: Python<'py>, results: &SessionResults) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("question_ids", &results.question_ids)?;
    dict.set_item("user_answers", &results.user_answers)?;
    dict.set_item("total_questions", results.total_questions)?;
    dict.set_item("answered_count", results.answered_count)?;
    dict.set_item("correct_count", results.correct_count)?;
    dict.set_item("wrong_answer_count", results.wrong_answer_count)?;
    dict.set_item("score_percentage", results.score_percentage)?;
    dict.set_item("passing_percentage", results.passing_percentage)?;
    dict.set_item("time_per_question", &results.time_per_question)?;
    dict.set_item("total_time_elapsed", results.total_time_elapsed)?;
    dict.set_item("longest_streak", results.longest_streak)?;
    dict.set_item("pauses_used", results.pauses_used)?;
    dict.set_item("hints_used", &results.hints_used)?;

    dict.set_item("ended_by", results.ended_by.map(|reason| reason.as_str()))?;

    Ok(dict)
}
