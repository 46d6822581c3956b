//! Rapid Fire Core - timed quiz session engine
//!
//! A deterministic state machine for bounded-time, limited-mistakes quiz
//! sessions: countdown, per-question timing, a lives budget, streaks,
//! pause/resume, review navigation and restart.
//!
//! The engine never owns a clock. Hosts dispatch `Tick` at the configured
//! interval and deliver the delayed events reported by `QuizEngine::scheduled`;
//! [`driver::SessionDriver`] does both on tokio. With the `python` feature the
//! engine is exposed to Python via PyO3.

pub mod config;
pub mod driver;
pub mod error;
pub mod machine;

#[cfg(feature = "python")]
pub mod session;

pub use config::{Question, SessionConfig, TimingPolicy};
pub use error::{QuizError, Result};
pub use machine::{Event, QuizEngine, QuizState, SessionContext, SessionResults, Snapshot};

#[cfg(feature = "python")]
pub use python::cached_config;

#[cfg(feature = "python")]
mod python {
    use once_cell::sync::OnceCell;
    use parking_lot::RwLock;
    use pyo3::prelude::*;
    use pyo3::types::PyDict;

    use crate::config::{deserialize_session_config, SessionConfig};
    use crate::session::QuizSession;

    // ========================================================================
    // Cached Configuration
    // ========================================================================

    /// Default session config shared by sessions created without one
    static CACHED_CONFIG: OnceCell<RwLock<SessionConfig>> = OnceCell::new();

    /// Config set by `init_config`, if any
    pub fn cached_config() -> Option<SessionConfig> {
        CACHED_CONFIG.get().map(|config| config.read().clone())
    }

    // ========================================================================
    // Python Functions
    // ========================================================================

    /// Cache the default session config (call once at startup)
    ///
    /// Sessions created without an explicit config use this one. Calling it
    /// again replaces the cached value.
    ///
    /// # Arguments
    /// * `config` - Session config dict (snake_case or camelCase keys)
    #[pyfunction]
    fn init_config(config: &Bound<'_, PyDict>) -> PyResult<()> {
        let config = deserialize_session_config(config.as_any())?;

        if let Some(existing) = CACHED_CONFIG.get() {
            *existing.write() = config;
        } else {
            let _ = CACHED_CONFIG.set(RwLock::new(config));
        }

        Ok(())
    }

    /// Check if a default config has been cached
    #[pyfunction]
    fn is_config_initialized() -> bool {
        CACHED_CONFIG.get().is_some()
    }

    // ========================================================================
    // Python Module Definition
    // ========================================================================

    #[pymodule]
    fn rapid_fire_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(init_config, m)?)?;
        m.add_function(wrap_pyfunction!(is_config_initialized, m)?)?;
        m.add_class::<QuizSession>()?;
        Ok(())
    }
}
