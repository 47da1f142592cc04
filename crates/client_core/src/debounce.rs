//! Turns a sampled button level into single advance events.

use std::time::Duration;

use tokio::time::Instant;

use crate::input::{InputEvent, InputSignal, Signal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Released,
    Pressed,
}

/// Two-state press detector with a dead-time after each event.
///
/// While the guard is running the input is not sampled and the state is
/// left untouched, so a button still held when the guard expires is seen
/// as `Pressed` and does not fire again.
#[derive(Debug, Clone)]
pub struct Debouncer {
    state: ButtonState,
    guard: Duration,
    guard_until: Option<Instant>,
}

impl Debouncer {
    pub fn new(guard: Duration) -> Self {
        Self {
            state: ButtonState::Released,
            guard,
            guard_until: None,
        }
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn is_guarded(&self, now: Instant) -> bool {
        self.guard_until.is_some_and(|until| now < until)
    }

    pub fn sample(&mut self, signal: Signal, now: Instant) -> Option<InputEvent> {
        if self.is_guarded(now) {
            return None;
        }
        self.guard_until = None;

        match (self.state, signal) {
            (ButtonState::Released, Signal::Active) => {
                self.state = ButtonState::Pressed;
                self.guard_until = Some(now + self.guard);
                Some(InputEvent::Advance)
            }
            (ButtonState::Pressed, Signal::Active) => None,
            (_, Signal::Inactive) => {
                self.state = ButtonState::Released;
                None
            }
        }
    }

    pub fn poll<I: InputSignal + ?Sized>(
        &mut self,
        input: &mut I,
        now: Instant,
    ) -> Option<InputEvent> {
        if self.is_guarded(now) {
            return None;
        }
        let signal = input.read_signal();
        self.sample(signal, now)
    }
}
