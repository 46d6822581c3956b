//! Property tests for the quiz state machine
//!
//! Property 1: Context bounds hold for every reachable context
//! Property 2: Longest streak dominates the current streak
//! Property 3: Ticks on a stopped clock are no-ops
//! Property 4: Lives exhaustion wins over the last-question exit
//! Property 5: Restart yields a pristine context

use proptest::prelude::*;

use crate::config::{Question, SessionConfig, TimingPolicy};
use crate::machine::{DelayKind, Event, QuizEngine, QuizState};

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators for property tests
// ═══════════════════════════════════════════════════════════════════════════

/// Questions with four options and a random correct answer
fn questions_strategy() -> impl Strategy<Value = Vec<Question>> {
    prop::collection::vec(0..4usize, 1..=8).prop_map(|answers| {
        answers
            .into_iter()
            .enumerate()
            .map(|(i, correct)| {
                Question::new(format!("q{}", i), correct)
                    .with_options((0..4).map(|o| format!("option {}", o)).collect())
            })
            .collect()
    })
}

fn config_strategy() -> impl Strategy<Value = SessionConfig> {
    (
        1..=30u32,     // time limit
        any::<bool>(), // lives system
        1..=5u32,      // max wrong answers
        any::<bool>(), // pause allowed
    )
        .prop_map(|(time_limit_seconds, lives_system, max_wrong_answers, pause_allowed)| {
            SessionConfig {
                question_count: 8,
                time_limit_seconds,
                passing_percentage: 70,
                lives_system,
                max_wrong_answers,
                pause_allowed,
                timing: TimingPolicy::default(),
            }
        })
}

fn delay_strategy() -> impl Strategy<Value = DelayKind> {
    prop_oneof![
        Just(DelayKind::Feedback),
        Just(DelayKind::GameOver),
        Just(DelayKind::Completion),
    ]
}

/// Any event, including out-of-order and out-of-range ones
fn event_strategy() -> impl Strategy<Value = Event> {
    prop_oneof![
        3 => Just(Event::Start),
        6 => (0..5usize).prop_map(|answer_index| Event::Answer { answer_index }),
        2 => Just(Event::Pause),
        2 => Just(Event::Unpause),
        8 => Just(Event::Tick),
        1 => Just(Event::TimeUp),
        1 => Just(Event::HintUsed),
        6 => delay_strategy().prop_map(|kind| Event::DelayElapsed { kind }),
        2 => (0..10usize).prop_map(|question_index| Event::NavigateToQuestion { question_index }),
        2 => Just(Event::ViewSummary),
        1 => Just(Event::Review),
        1 => questions_strategy().prop_map(|questions| Event::Restart { questions }),
    ]
}

fn events_strategy() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec(event_strategy(), 0..120)
}

// ═══════════════════════════════════════════════════════════════════════════
// Property Tests
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// Property 1: index, clock and counters stay in range under any event stream
    #[test]
    fn prop_context_bounds(
        questions in questions_strategy(),
        config in config_strategy(),
        events in events_strategy()
    ) {
        let mut engine = QuizEngine::new(questions, config).unwrap();

        for event in events {
            engine.send(event);
            let ctx = engine.context();
            let len = ctx.question_len();

            prop_assert!(ctx.current_question_index <= len,
                "index {} past {}", ctx.current_question_index, len);
            prop_assert!(ctx.time_remaining <= ctx.config.time_limit_seconds);
            prop_assert_eq!(ctx.user_answers.len(), len);
            prop_assert_eq!(ctx.time_per_question.len(), len);
            prop_assert_eq!(ctx.hints_used.len(), len);
            // TIME_UP zeroes the clock without charging elapsed time
            prop_assert!(
                ctx.time_remaining + ctx.total_time_elapsed <= ctx.config.time_limit_seconds
            );
            prop_assert!(
                ctx.wrong_answer_count as usize <= ctx.answered_count(),
                "more wrong answers than answers"
            );
        }
    }

    /// Property 2: longest_streak >= current_streak after every event
    #[test]
    fn prop_longest_streak_dominates(
        questions in questions_strategy(),
        config in config_strategy(),
        events in events_strategy()
    ) {
        let mut engine = QuizEngine::new(questions, config).unwrap();

        for event in events {
            engine.send(event);
            let ctx = engine.context();
            prop_assert!(ctx.longest_streak >= ctx.current_streak);
        }
    }

    /// Property 3: with the clock at zero a tick leaves state and context alone
    #[test]
    fn prop_tick_at_zero_is_noop(
        questions in questions_strategy(),
        config in config_strategy(),
        events in events_strategy()
    ) {
        let mut engine = QuizEngine::new(questions, config).unwrap();

        for event in events {
            engine.send(event);
            if engine.context().time_remaining == 0 {
                let state = engine.state();
                let before = engine.context().clone();
                let transition = engine.send(Event::Tick);

                prop_assert!(!transition.handled);
                prop_assert_eq!(engine.state(), state);
                prop_assert_eq!(engine.context(), &before);
            }
        }
    }

    /// Property 3.2: paused sessions ignore ticks entirely
    #[test]
    fn prop_paused_ignores_ticks(
        questions in questions_strategy(),
        ticks in 1..20usize
    ) {
        let mut engine = QuizEngine::new(questions, SessionConfig::default()).unwrap();
        engine.send(Event::Start);
        engine.send(Event::Pause);
        let before = engine.context().clone();

        for _ in 0..ticks {
            engine.send(Event::Tick);
        }

        prop_assert_eq!(engine.state(), QuizState::Paused);
        prop_assert_eq!(engine.context(), &before);
    }

    /// Property 4: running out of lives always lands in gameOver,
    /// even on the final question
    #[test]
    fn prop_lives_exhaustion_wins(
        questions in questions_strategy(),
        max_wrong_answers in 1..=8u32
    ) {
        let len = questions.len();
        let config = SessionConfig {
            lives_system: true,
            max_wrong_answers,
            time_limit_seconds: 600,
            ..SessionConfig::default()
        };
        let mut engine = QuizEngine::new(questions, config).unwrap();
        engine.send(Event::Start);

        // Always answer wrong
        while engine.state() == QuizState::Playing {
            let correct = engine.context().current_question().unwrap().correct_answer;
            engine.send(Event::Answer { answer_index: (correct + 1) % 4 });
            engine.send(Event::DelayElapsed { kind: DelayKind::Feedback });
        }

        if (max_wrong_answers as usize) <= len {
            prop_assert_eq!(engine.state(), QuizState::GameOver);
            prop_assert_eq!(engine.context().wrong_answer_count, max_wrong_answers);
        } else {
            prop_assert_eq!(engine.state(), QuizState::QuizComplete);
            prop_assert_eq!(engine.context().wrong_answer_count as usize, len);
        }
    }

    /// Property 5: restart from summary resets every counter
    #[test]
    fn prop_restart_resets_context(
        questions in questions_strategy(),
        next in questions_strategy(),
        config in config_strategy(),
        events in events_strategy()
    ) {
        let mut engine = QuizEngine::new(questions, config).unwrap();
        for event in events {
            engine.send(event);
        }

        // Drive to summary from wherever the stream left us
        engine.send(Event::Start);
        engine.send(Event::Unpause);
        engine.send(Event::TimeUp);
        engine.send(Event::DelayElapsed { kind: DelayKind::Feedback });
        engine.send(Event::DelayElapsed { kind: DelayKind::GameOver });
        engine.send(Event::ViewSummary);
        prop_assume!(engine.state() == QuizState::Summary);

        let len = next.len();
        engine.send(Event::Restart { questions: next });
        let ctx = engine.context();

        prop_assert_eq!(engine.state(), QuizState::Countdown);
        prop_assert_eq!(&ctx.user_answers, &vec![None; len]);
        prop_assert_eq!(ctx.wrong_answer_count, 0);
        prop_assert_eq!(ctx.current_question_index, 0);
        prop_assert_eq!(ctx.time_remaining, ctx.config.time_limit_seconds);
        prop_assert_eq!(ctx.total_time_elapsed, 0);
        prop_assert_eq!(ctx.current_streak, 0);
        prop_assert_eq!(ctx.longest_streak, 0);
        prop_assert_eq!(ctx.pauses_used, 0);
    }
}
