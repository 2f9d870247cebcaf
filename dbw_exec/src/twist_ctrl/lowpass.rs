//! # Low pass filter
//!
//! First order exponential smoothing of a noisy scalar signal.

/// A first order low pass filter.
#[derive(Debug, Clone)]
pub struct LowPassFilter {
    /// Weight of each new sample, `ts / (tau + ts)`
    a: f64,

    /// Weight of the previous output, `1 - a`
    b: f64,

    last_val: f64,

    ready: bool,
}

impl LowPassFilter {
    /// Create a filter with time constant `tau_s` for samples nominally `ts_s` apart.
    pub fn new(tau_s: f64, ts_s: f64) -> Self {
        let a = ts_s / (tau_s + ts_s);
        Self {
            a,
            b: 1.0 - a,
            last_val: 0.0,
            ready: false,
        }
    }

    /// Filter a new sample. The first sample after creation or a reset passes straight through.
    pub fn filt(&mut self, val: f64) -> f64 {
        if self.ready {
            self.last_val = self.a * val + self.b * self.last_val;
        } else {
            self.last_val = val;
            self.ready = true;
        }

        self.last_val
    }

    pub fn reset(&mut self) {
        self.last_val = 0.0;
        self.ready = false;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_first_sample_passes_through() {
        let mut lpf = LowPassFilter::new(0.5, 0.02);
        assert_eq!(lpf.filt(7.0), 7.0);
        assert!(lpf.filt(8.0) > 7.0);
    }

    #[test]
    fn test_smoothing() {
        // a = 0.25
        let mut lpf = LowPassFilter::new(3.0, 1.0);
        lpf.filt(0.0);
        assert!((lpf.filt(4.0) - 1.0).abs() < 1e-12);
        assert!((lpf.filt(4.0) - 1.75).abs() < 1e-12);

        // Converges on a constant input
        let mut out = 0.0;
        for _ in 0..200 {
            out = lpf.filt(4.0);
        }
        assert!((out - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset() {
        let mut lpf = LowPassFilter::new(0.5, 0.02);
        lpf.filt(10.0);
        lpf.filt(0.0);
        lpf.reset();
        assert_eq!(lpf.filt(3.0), 3.0);
    }
}
