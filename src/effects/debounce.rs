/// Trailing-edge debounce driven by an external clock: a burst of
/// [`bump`](Debounce::bump) calls fires once, `wait` seconds after the last.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Debounce {
    wait: f64,
    deadline: Option<f64>,
}

impl Debounce {
    pub fn new(wait: f64) -> Self {
        Self { wait, deadline: None }
    }

    pub fn bump(&mut self, now: f64) {
        self.deadline = Some(now + self.wait);
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once per burst, on the first poll at or after the
    /// deadline.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
