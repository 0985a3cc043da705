//! Property tests for the timer state machine.

use proptest::prelude::*;
use timekeeper_core::{Command, Mode, SessionPlan, TimerEngine};

fn mode_strategy() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::Timer), Just(Mode::Stopwatch), Just(Mode::Pomodoro)]
}

fn armed_timer(hours: u32, minutes: u32, seconds: u32) -> TimerEngine {
    let mut engine = TimerEngine::new();
    engine.apply(Command::SetDuration {
        hours,
        minutes,
        seconds,
    });
    engine.set_mode(Mode::Timer);
    engine
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn timer_reaches_zero_after_exactly_its_duration(
        hours in 0u32..=1,
        minutes in 0u32..=59,
        seconds in 0u32..=59,
    ) {
        prop_assume!(hours + minutes + seconds > 0);
        let mut engine = armed_timer(hours, minutes, seconds);
        engine.start();
        let total = u64::from(hours) * 3600 + u64::from(minutes) * 60 + u64::from(seconds);

        for _ in 0..total - 1 {
            engine.tick();
        }
        prop_assert_eq!(engine.state().current_time, 1);
        prop_assert!(engine.is_running());

        engine.tick();
        prop_assert_eq!(engine.state().current_time, 0);
        prop_assert!(!engine.is_running());
        prop_assert!(engine.tick().is_empty());
        prop_assert_eq!(engine.state().current_time, 0);
    }

    #[test]
    fn stopwatch_never_goes_backwards(ops in prop::collection::vec(0u8..4, 0..300)) {
        let mut engine = TimerEngine::new();
        engine.set_mode(Mode::Stopwatch);
        let mut previous = 0;
        for op in ops {
            let running = engine.is_running();
            match op {
                0 => { engine.start(); }
                1 => { engine.pause(); }
                _ => { engine.tick(); }
            }
            let current = engine.state().current_time;
            prop_assert!(current >= previous);
            if op >= 2 && !running {
                prop_assert_eq!(current, previous);
            }
            previous = current;
        }
    }

    #[test]
    fn reset_is_idempotent(mode in mode_strategy(), ticks in 0u64..500, more in 0u64..50) {
        let mut engine = TimerEngine::new();
        engine.set_mode(mode);
        engine.start();
        for _ in 0..ticks {
            engine.tick();
        }
        engine.reset();
        let first = engine.state().clone();
        for _ in 0..more {
            engine.tick();
        }
        engine.reset();

        prop_assert_eq!(engine.state(), &first);
        prop_assert!(!first.is_running);
        match mode {
            Mode::Stopwatch => prop_assert_eq!(first.current_time, 0),
            _ => prop_assert_eq!(first.current_time, first.initial_time),
        }
    }

    #[test]
    fn mode_switch_always_stops(from in mode_strategy(), to in mode_strategy(), ticks in 0u64..20) {
        let mut engine = TimerEngine::new();
        engine.set_mode(from);
        engine.start();
        for _ in 0..ticks {
            engine.tick();
        }
        engine.set_mode(to);
        prop_assert!(!engine.is_running());
        if to == Mode::Stopwatch {
            prop_assert_eq!(engine.state().initial_time, 0);
        }
    }

    #[test]
    fn total_sessions_is_a_pure_function_of_its_inputs(
        target in 0.1f64..12.0,
        work in 1u32..=180,
        brk in 1u32..=60,
    ) {
        let mut engine = TimerEngine::new();
        engine.set_mode(Mode::Pomodoro);
        engine.set_pomodoro_settings(work, brk);
        engine.set_target_hours(target);
        let first = engine.state().total_sessions;

        engine.set_target_hours(target);
        engine.set_pomodoro_settings(work, brk);
        prop_assert_eq!(engine.state().total_sessions, first);
        prop_assert_eq!(first, SessionPlan::new(target, work, brk).total_sessions());
    }
}
