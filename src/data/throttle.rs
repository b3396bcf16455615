use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Randomized pause before each provider call.
///
/// The public Trends endpoints block bursts of requests. A uniform jitter
/// lowers the odds of being throttled; it does not prevent it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestDelay {
    min: Duration,
    max: Duration,
}

impl RequestDelay {
    /// Bounds are swapped if given in the wrong order.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Non-positive bounds (or NaN) turn the delay off.
    pub fn from_secs_f64(min_secs: f64, max_secs: f64) -> Self {
        let upper = min_secs.max(max_secs);
        if upper.is_nan() || upper <= 0.0 {
            return Self::disabled();
        }
        Self::new(
            Duration::from_secs_f64(min_secs.max(0.0)),
            Duration::from_secs_f64(max_secs.max(0.0)),
        )
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn is_disabled(&self) -> bool {
        self.max.is_zero()
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let secs = rng.gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    pub async fn wait(&self) {
        if self.is_disabled() {
            return;
        }
        let delay = self.sample(&mut rand::thread_rng());
        debug!("Waiting {:?} before provider call", delay);
        tokio::time::sleep(delay).await;
    }
}

impl Default for RequestDelay {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_secs(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_samples_stay_within_bounds() {
        let delay = RequestDelay::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            let d = delay.sample(&mut rng);
            assert!(d >= Duration::from_millis(500));
            assert!(d <= Duration::from_secs(2));
        }
    }

    #[test]
    fn test_reversed_bounds_are_normalized() {
        let delay = RequestDelay::from_secs_f64(2.0, 1.0);
        assert_eq!(delay, RequestDelay::from_secs_f64(1.0, 2.0));
    }

    #[test]
    fn test_fixed_delay_is_exact() {
        let delay = RequestDelay::from_secs_f64(1.5, 1.5);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(delay.sample(&mut rng), Duration::from_millis(1500));
    }

    #[test]
    fn test_zero_bounds_disable_delay() {
        assert_eq!(RequestDelay::from_secs_f64(0.0, 0.0), RequestDelay::disabled());
        assert!(RequestDelay::from_secs_f64(-1.0, f64::NAN).is_disabled());
        assert!(!RequestDelay::from_secs_f64(0.0, 0.5).is_disabled());
    }

    #[tokio::test]
    async fn test_disabled_delay_returns_immediately() {
        let delay = RequestDelay::disabled();
        assert!(delay.is_disabled());

        let started = std::time::Instant::now();
        delay.wait().await;
        assert!(started.elapsed() < Duration::from_millis(50));
    }
}
