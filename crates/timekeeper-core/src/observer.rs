//! Observer seam between the state machine and its side effects.
//!
//! The clock driver hands every transition's events, together with the
//! resulting state, to each registered [`Subscriber`] in registration order.
//! Subscribers never mutate the timer.

use crate::events::Event;
use crate::timer::TimerState;

pub trait Subscriber: Send {
    fn on_update(&mut self, events: &[Event], state: &TimerState);
}

impl<F> Subscriber for F
where
    F: FnMut(&[Event], &TimerState) + Send,
{
    fn on_update(&mut self, events: &[Event], state: &TimerState) {
        self(events, state)
    }
}

/// Fan-out list of subscribers.
#[derive(Default)]
pub struct Subscribers {
    inner: Vec<Box<dyn Subscriber>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<S: Subscriber + 'static>(&mut self, subscriber: S) {
        self.inner.push(Box::new(subscriber));
    }

    pub fn with<S: Subscriber + 'static>(mut self, subscriber: S) -> Self {
        self.push(subscriber);
        self
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn publish(&mut self, events: &[Event], state: &TimerState) {
        if events.is_empty() {
            return;
        }
        for subscriber in &mut self.inner {
            subscriber.on_update(events, state);
        }
    }
}
