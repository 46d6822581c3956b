//! Quiz session engine
//!
//! `reduce` is the whole machine: a pure function over (state, context, event).
//! `QuizEngine` owns one session, counts state entries and fans snapshots out
//! to subscribers. Neither owns a clock; the host delivers `Tick` at the
//! policy's interval and the delayed events named by `scheduled()`.

use tracing::{debug, info, trace};

use super::actions::{self, TickOutcome};
use super::context::{EndReason, SessionContext};
use super::guards;
use super::snapshot::{scheduled_for, SessionResults, Snapshot};
use super::state::{DelayKind, Event, QuizState, Scheduled};
use crate::config::{validate_questions, Question, SessionConfig};
use crate::error::Result;

/// Outcome of dispatching one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: QuizState,
    pub to: QuizState,
    /// False when the event was ignored in `from`
    pub handled: bool,
}

impl Transition {
    #[inline]
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Apply `event` to `(state, ctx)` and return the resulting transition.
///
/// Events with no entry for the current state, or whose guard fails, leave
/// the context untouched.
pub fn reduce(state: QuizState, ctx: &mut SessionContext, event: Event) -> Transition {
    use QuizState::*;

    let next = match (state, event) {
        (Countdown, Event::Start) => Some(Playing),

        (Playing, Event::Answer { answer_index })
            if ctx
                .current_question()
                .is_some_and(|q| q.accepts(answer_index)) =>
        {
            actions::record_answer(ctx, answer_index);
            Some(AnswerFeedback)
        }

        (Playing, Event::Pause) if guards::pause_allowed(ctx) => {
            actions::count_pause(ctx);
            Some(Paused)
        }

        (Playing | AnswerFeedback, Event::Tick) => match actions::tick(ctx) {
            TickOutcome::Stopped => None,
            TickOutcome::Running => Some(state),
            TickOutcome::Expired => {
                actions::mark_ended(ctx, EndReason::TimeExpired);
                Some(QuizComplete)
            }
        },

        (Playing | AnswerFeedback, Event::TimeUp) => {
            actions::expire_clock(ctx);
            actions::mark_ended(ctx, EndReason::TimeExpired);
            Some(QuizComplete)
        }

        (Playing | AnswerFeedback, Event::HintUsed) => {
            actions::count_hint(ctx);
            Some(state)
        }

        (AnswerFeedback, Event::DelayElapsed { kind: DelayKind::Feedback }) => {
            let target = guards::resolve_feedback_exit(ctx);
            match target {
                GameOver => actions::mark_ended(ctx, EndReason::LivesExhausted),
                QuizComplete => actions::mark_ended(ctx, EndReason::Completed),
                _ => actions::advance_question(ctx),
            }
            Some(target)
        }

        (Paused, Event::Unpause) => Some(Playing),

        (GameOver, Event::DelayElapsed { kind: DelayKind::GameOver }) => Some(QuizComplete),

        (QuizComplete, Event::DelayElapsed { kind: DelayKind::Completion }) => {
            actions::jump_to_first_answered(ctx);
            Some(ReviewMode)
        }

        (QuizComplete | ReviewMode, Event::ViewSummary) => {
            actions::jump_past_end(ctx);
            Some(Summary)
        }

        (ReviewMode, Event::NavigateToQuestion { question_index })
            if question_index < ctx.question_len() =>
        {
            actions::navigate(ctx, question_index);
            Some(ReviewMode)
        }

        (Summary, Event::Review) => {
            actions::jump_to_first_answered(ctx);
            Some(ReviewMode)
        }

        (Summary, Event::Restart { questions }) if validate_questions(&questions).is_ok() => {
            actions::restart(ctx, questions);
            Some(Countdown)
        }

        _ => None,
    };

    match next {
        Some(to) => Transition {
            from: state,
            to,
            handled: true,
        },
        None => Transition {
            from: state,
            to: state,
            handled: false,
        },
    }
}

/// Handle returned by [`QuizEngine::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Snapshot) + Send>;

/// Owns one quiz session: the active state plus its context
pub struct QuizEngine {
    state: QuizState,
    context: SessionContext,
    transitions: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl QuizEngine {
    /// Build an engine in `countdown` from a pre-loaded question list
    pub fn new(questions: Vec<Question>, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        validate_questions(&questions)?;

        debug!(
            questions = questions.len(),
            time_limit = config.time_limit_seconds,
            "quiz session created"
        );

        Ok(Self {
            state: QuizState::Countdown,
            context: SessionContext::new(questions, config),
            transitions: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        })
    }

    #[inline]
    pub fn state(&self) -> QuizState {
        self.state
    }

    #[inline]
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Number of state entries so far; self-transitions do not count
    #[inline]
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Delayed event owed by the current state
    #[inline]
    pub fn scheduled(&self) -> Option<Scheduled> {
        scheduled_for(self.state, &self.context)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.state, self.context.clone())
    }

    /// Results payload, available once the session reaches summary
    pub fn results(&self) -> Option<SessionResults> {
        (self.state == QuizState::Summary).then(|| SessionResults::from_context(&self.context))
    }

    /// Dispatch one event. Ignored events return `handled == false`.
    pub fn send(&mut self, event: Event) -> Transition {
        let name = event.name();
        let transition = reduce(self.state, &mut self.context, event);

        if !transition.handled {
            trace!(state = %self.state, event = name, "event ignored");
            return transition;
        }

        if transition.changed() {
            self.state = transition.to;
            self.transitions += 1;
            debug!(from = %transition.from, to = %transition.to, event = name, "state transition");
            self.log_milestone(transition);
        }

        self.notify();
        transition
    }

    /// Register a listener called with a snapshot after every handled event
    ///
    /// Listeners run inside `send`, so whatever lock guards the engine is
    /// still held. A listener must not lock a [`SharedEngine`] it belongs to;
    /// with `parking_lot::Mutex` that deadlocks. Hand the snapshot off
    /// (a channel, a `Notify`) and read the engine afterwards instead.
    ///
    /// [`SharedEngine`]: crate::driver::SharedEngine
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, listener) in self.listeners.iter_mut() {
            listener(&snapshot);
        }
    }

    fn log_milestone(&self, transition: Transition) {
        let ctx = &self.context;
        match transition.to {
            QuizState::GameOver => info!(
                wrong_answers = ctx.wrong_answer_count,
                question = ctx.current_question_index,
                "lives exhausted"
            ),
            QuizState::Summary => info!(
                correct = ctx.correct_count(),
                total = ctx.question_len(),
                elapsed = ctx.total_time_elapsed,
                "session finished"
            ),
            QuizState::Countdown => info!(questions = ctx.question_len(), "session restarted"),
            _ => {}
        }
    }
}
