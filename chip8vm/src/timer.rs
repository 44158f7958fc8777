#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerState {
    On,
    Off,
    Finished,
}

/// 8-bit countdown register, decremented by the timer tick and floored at zero
///
/// Both the delay and the sound timer of a `Machine` are one of these, only the
/// sound timer has an observable side effect while nonzero.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Timer(u8);

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn store(&mut self, value: u8) {
        self.0 = value;
    }

    #[inline]
    pub fn load(&self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.0 != 0
    }

    /// Count down once and report where the countdown ended up
    #[inline]
    pub fn decrement(&mut self) -> TimerState {
        match self.0.checked_sub(1) {
            None => TimerState::Off,
            Some(0) => {
                self.0 = 0;
                TimerState::Finished
            }
            Some(left) => {
                self.0 = left;
                TimerState::On
            }
        }
    }
}
