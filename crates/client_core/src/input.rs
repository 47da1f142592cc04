/// Level of the physical (or simulated) advance button at one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Active,
    Inactive,
}

impl From<bool> for Signal {
    fn from(active: bool) -> Self {
        if active {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

/// Logical input produced by the debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Advance,
}

/// Sampled by the display loop once per iteration.
pub trait InputSignal {
    fn read_signal(&mut self) -> Signal;
}
