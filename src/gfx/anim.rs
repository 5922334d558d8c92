use std::f32::consts::PI;

/// Accumulates frame time and wraps it into `[0, period)`.
#[derive(Debug, Clone)]
pub struct PeriodicTimer {
    pub period: f32,
    pub elapsed: f32,
}

impl PeriodicTimer {
    pub fn new(period: f32) -> Self {
        Self {
            period,
            elapsed: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.period <= 0.0 {
            return;
        }
        self.elapsed += dt;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
        }
    }

    /// Position within the current period, from 0.0 up to (not including) 1.0.
    pub fn progress(&self) -> f32 {
        if self.period <= 0.0 {
            return 0.0;
        }
        self.elapsed / self.period
    }
}

/// Horizontal swing for a timer whose period is two seconds: one full sine
/// cycle per period, scaled to `[-0.5, 0.5]`.
pub fn sine_swing(elapsed: f32) -> f32 {
    (elapsed * PI).sin() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_past_the_period() {
        let mut timer = PeriodicTimer::new(2.0);
        timer.update(1.5);
        timer.update(1.0);
        assert!((timer.elapsed - 0.5).abs() < 1e-6);

        timer.update(5.0);
        assert!((timer.elapsed - 1.5).abs() < 1e-6);
        assert!((timer.progress() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn zero_period_stays_put() {
        let mut timer = PeriodicTimer::new(0.0);
        timer.update(1.0);
        assert_eq!(timer.elapsed, 0.0);
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn swing_peaks_at_half_and_three_halves() {
        assert!((sine_swing(0.5) - 0.5).abs() < 1e-6);
        assert!((sine_swing(1.5) + 0.5).abs() < 1e-6);
        assert!(sine_swing(0.0).abs() < 1e-6);
    }
}
