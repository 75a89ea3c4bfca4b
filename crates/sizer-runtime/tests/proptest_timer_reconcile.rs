//! Property-based tests for timer reconciliation on the virtual clock.
//!
//! 1. Exactly one timer is scheduled while the model declares one.
//! 2. Ticks only land while the timer is declared.
//! 3. Firings never come early.

use std::time::Duration;

use proptest::prelude::*;
use sizer_core::event::Event;
use sizer_render::frame::Frame;
use sizer_runtime::program::{Cmd, Model};
use sizer_runtime::simulator::ProgramSimulator;
use sizer_runtime::subscription::{Every, Subscription};

const INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug)]
enum Msg {
    Toggle,
    Tick,
}

impl From<Event> for Msg {
    fn from(_: Event) -> Self {
        Msg::Toggle
    }
}

#[derive(Default)]
struct Blinker {
    on: bool,
    ticks_while_off: u32,
    ticks: u32,
}

impl Model for Blinker {
    type Message = Msg;

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Toggle => self.on = !self.on,
            Msg::Tick => {
                self.ticks += 1;
                if !self.on {
                    self.ticks_while_off += 1;
                }
            }
        }
        Cmd::none()
    }

    fn view(&self, _frame: &mut Frame) {}

    fn subscriptions(&self) -> Vec<Box<dyn Subscription<Msg>>> {
        if self.on {
            vec![Box::new(Every::with_id(7, INTERVAL, || Msg::Tick))]
        } else {
            vec![]
        }
    }
}

#[derive(Debug, Clone)]
enum Step {
    Toggle,
    Advance(u64),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Toggle),
        (0u64..=3500).prop_map(Step::Advance),
    ]
}

proptest! {
    #[test]
    fn one_timer_iff_declared(steps in proptest::collection::vec(step_strategy(), 0..40)) {
        let mut sim = ProgramSimulator::new(Blinker::default());
        sim.init();
        for step in steps {
            match step {
                Step::Toggle => sim.inject_event(Event::Tick),
                Step::Advance(ms) => sim.advance(Duration::from_millis(ms)),
            }
            let expected = usize::from(sim.model().on);
            prop_assert_eq!(sim.active_timers(), expected);
        }
        prop_assert_eq!(sim.model().ticks_while_off, 0);
    }

    #[test]
    fn ticks_never_early(run_ms in 0u64..20_000) {
        let mut sim = ProgramSimulator::new(Blinker::default());
        sim.init();
        sim.inject_event(Event::Tick);
        sim.advance(Duration::from_millis(run_ms));
        prop_assert_eq!(u64::from(sim.model().ticks), run_ms / 1000);
    }
}
