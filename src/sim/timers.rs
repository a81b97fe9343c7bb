//! One-shot deferred actions
//!
//! Timers are owned by the scene that scheduled them and advance with the
//! fixed timestep, so dropping the scene drops every pending action.

/// Cancellation token for a scheduled action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u32);

#[derive(Debug, Clone)]
struct Timer<A> {
    id: TimerId,
    remaining_ms: f32,
    action: A,
}

/// A set of pending one-shot actions, fired in schedule order
#[derive(Debug, Clone)]
pub struct Timers<A> {
    pending: Vec<Timer<A>>,
    next_id: u32,
}

impl<A> Default for Timers<A> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 1,
        }
    }
}

impl<A> Timers<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire after `delay_ms`
    pub fn schedule(&mut self, delay_ms: f32, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Timer {
            id,
            remaining_ms: delay_ms.max(0.0),
            action,
        });
        id
    }

    /// Cancel a pending action. Returns false if it already fired.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advance all timers and return the actions that came due
    pub fn advance(&mut self, dt_ms: f32) -> Vec<A> {
        let mut fired = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            self.pending[i].remaining_ms -= dt_ms;
            if self.pending[i].remaining_ms <= 0.0 {
                fired.push(self.pending.remove(i).action);
            } else {
                i += 1;
            }
        }
        fired
    }
}
