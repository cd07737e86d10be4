// One-shot countdown timers advanced by the frame delta
//
// Timers belong to whoever scheduled them; dropping the `Timers` value
// cancels everything still pending.

/// Handle for cancelling a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<T> {
    id: TimerId,
    remaining: f32,
    payload: T,
}

/// A set of fire-once timers carrying a payload
#[derive(Debug)]
pub struct Timers<T> {
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Timers<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Schedule `payload` to fire after `delay` seconds
    pub fn schedule(&mut self, delay: f32, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            remaining: delay.max(0.0),
            payload,
        });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.pending.iter().position(|timer| timer.id == id) {
            Some(index) => {
                self.pending.remove(index);
                true
            }
            None => false,
        }
    }

    /// Advance every timer by `dt` and return the payloads that came due,
    /// in scheduling order
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        let mut fired = Vec::new();
        let mut index = 0;
        while index < self.pending.len() {
            self.pending[index].remaining -= dt;
            if self.pending[index].remaining <= 0.0 {
                fired.push(self.pending.remove(index).payload);
            } else {
                index += 1;
            }
        }
        fired
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|timer| timer.id == id)
    }

    /// Drop every pending timer without firing it
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let mut timers = Timers::new();
        timers.schedule(0.5, "done");

        assert!(timers.advance(0.3).is_empty());
        assert_eq!(timers.advance(0.3), vec!["done"]);
        assert!(timers.advance(1.0).is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_fire_order_follows_scheduling() {
        let mut timers = Timers::new();
        timers.schedule(0.2, 1);
        timers.schedule(0.1, 2);
        timers.schedule(5.0, 3);

        assert_eq!(timers.advance(0.25), vec![1, 2]);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut timers = Timers::new();
        let id = timers.schedule(1.0, ());
        assert!(timers.is_pending(id));
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.advance(2.0).is_empty());
    }

    #[test]
    fn test_zero_delay_fires_on_next_advance() {
        let mut timers = Timers::new();
        timers.schedule(0.0, 'x');
        assert_eq!(timers.advance(0.0), vec!['x']);
    }

    #[test]
    fn test_clear() {
        let mut timers = Timers::new();
        timers.schedule(0.1, 1);
        timers.schedule(0.2, 2);
        timers.clear();
        assert!(timers.advance(1.0).is_empty());
    }
}
