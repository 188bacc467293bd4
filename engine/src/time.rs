use std::time::Duration;

/// Frame timing handed to every tick: `elapsed` since the previous frame and
/// `total` since play started.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Time {
    pub elapsed: Duration,
    pub total: Duration,
}

impl Time {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame of `elapsed`.
    pub fn advance(&self, elapsed: Duration) -> Time {
        Time {
            elapsed,
            total: self.total + elapsed,
        }
    }

    pub fn delta_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates_total() {
        let frame = Duration::from_millis(16);
        let time = Time::new().advance(frame).advance(frame);

        assert_eq!(time.elapsed, frame);
        assert_eq!(time.total, Duration::from_millis(32));
        assert!((time.delta_seconds() - 0.016).abs() < 1e-6);
    }
}
