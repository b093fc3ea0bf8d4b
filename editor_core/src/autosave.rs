//! Input debounce for autosave

/// Fires once after `idle_ms` without input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveTimer {
    idle_ms: u64,
    deadline: Option<u64>,
}

impl AutosaveTimer {
    pub fn new(idle_ms: u64) -> Self {
        Self {
            idle_ms,
            deadline: None,
        }
    }

    pub fn idle_ms(&self) -> u64 {
        self.idle_ms
    }

    /// Restarts the idle window
    pub fn note_input(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms.saturating_add(self.idle_ms));
    }

    /// True exactly once when the window has elapsed
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
}
