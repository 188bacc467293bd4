use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

struct PendingTimer<T> {
    handle: TimerHandle,
    remaining: Duration,
    payload: T,
}

/// Fixed-delay, fire-once timers.
///
/// Timers count down on `tick` and hand their payload back once they expire.
/// Setting a timer never touches timers that are already pending, so two
/// requests for the same payload fire twice.
pub struct TimerManager<T> {
    next_handle: u64,
    pending: Vec<PendingTimer<T>>,
}

impl<T> TimerManager<T> {
    pub fn new() -> Self {
        Self {
            next_handle: 0,
            pending: Vec::new(),
        }
    }

    pub fn set_timer(&mut self, delay: Duration, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(PendingTimer {
            handle,
            remaining: delay,
            payload,
        });
        handle
    }

    pub fn clear_timer(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.handle != handle);
        before != self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|timer| timer.handle == handle)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Count every timer down by `elapsed` and return the payloads that
    /// expired, in the order their timers were set.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<T> {
        let mut fired = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());

        for mut timer in self.pending.drain(..) {
            if timer.remaining <= elapsed {
                fired.push(timer.payload);
            } else {
                timer.remaining -= elapsed;
                still_pending.push(timer);
            }
        }

        self.pending = still_pending;
        fired
    }
}

impl<T> Default for TimerManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_once_after_delay() {
        let mut timers = TimerManager::new();
        let handle = timers.set_timer(Duration::from_millis(500), "finish");

        assert!(timers.tick(Duration::from_millis(300)).is_empty());
        assert!(timers.is_pending(handle));

        assert_eq!(timers.tick(Duration::from_millis(200)), vec!["finish"]);
        assert!(!timers.is_pending(handle));
        assert!(timers.tick(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_repeated_requests_are_not_merged() {
        let mut timers = TimerManager::new();
        timers.set_timer(Duration::from_millis(500), 1);
        timers.set_timer(Duration::from_millis(500), 1);

        assert_eq!(timers.pending_count(), 2);
        assert_eq!(timers.tick(Duration::from_millis(600)), vec![1, 1]);
    }

    #[test]
    fn test_clear_timer() {
        let mut timers = TimerManager::new();
        let first = timers.set_timer(Duration::from_millis(100), 'a');
        timers.set_timer(Duration::from_millis(200), 'b');

        assert!(timers.clear_timer(first));
        assert!(!timers.clear_timer(first));
        assert_eq!(timers.tick(Duration::from_millis(250)), vec!['b']);
    }
}
