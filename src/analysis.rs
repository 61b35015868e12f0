// Manowatch — Window Analysis
//
// Sliding-window statistics over raw sensor counts: a fixed-capacity sample
// ring plus the kurtosis estimator that drives the indicator state machine.

use crate::config::WINDOW_SIZE;

// ---------------------------------------------------------------------------
// Sample Window
// ---------------------------------------------------------------------------

/// Fixed-capacity ring of raw counts. Once `N` samples have been pushed the
/// ring overwrites its oldest entry and reports itself full forever after.
pub struct SampleWindow<const N: usize = WINDOW_SIZE> {
    buf: [i32; N],
    index: usize,
    filled: bool,
}

impl<const N: usize> SampleWindow<N> {
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            index: 0,
            filled: false,
        }
    }

    /// Append one sample, overwriting the oldest once the ring has wrapped.
    pub fn push(&mut self, sample: i32) {
        self.buf[self.index] = sample;
        self.index += 1;
        if self.index >= N {
            self.index = 0;
            self.filled = true;
        }
    }

    /// Whether at least `N` samples have ever been pushed.
    pub fn is_full(&self) -> bool {
        self.filled
    }

    /// Number of live samples (`N` once full).
    pub fn len(&self) -> usize {
        if self.filled {
            N
        } else {
            self.index
        }
    }

    /// Samples in insertion order, oldest first (kept for debugging dumps).
    #[allow(dead_code)]
    pub fn values(&self) -> Vec<i32> {
        if self.filled {
            let (newest, oldest) = self.buf.split_at(self.index);
            oldest.iter().chain(newest.iter()).copied().collect()
        } else {
            self.buf[..self.index].to_vec()
        }
    }

    /// Window kurtosis, defined only once the ring has filled.
    pub fn kurtosis(&self) -> Option<f32> {
        if !self.filled {
            return None;
        }
        kurtosis(&self.buf)
    }
}

// ---------------------------------------------------------------------------
// Kurtosis Estimator
// ---------------------------------------------------------------------------

/// Kurtosis of a sample slice: the fourth standardised moment m4 / m2² with
/// population divisors (no −3 "excess" normalisation). Undefined for fewer
/// than four samples or a zero-variance input.
pub fn kurtosis(data: &[i32]) -> Option<f32> {
    let n = data.len();
    if n < 4 {
        return None;
    }
    let n_f = n as f32;

    let mut mean = 0.0f32;
    for &v in data {
        mean += v as f32;
    }
    mean /= n_f;

    let mut m2 = 0.0f32;
    let mut m4 = 0.0f32;
    for &v in data {
        let d = v as f32 - mean;
        m2 += d * d;
        m4 += d * d * d * d;
    }
    m2 /= n_f;
    m4 /= n_f;

    if m2 == 0.0 {
        return None;
    }
    Some(m4 / (m2 * m2))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// f64 reference implementation of the same moment ratio.
    fn reference_kurtosis(data: &[i32]) -> f64 {
        let n = data.len() as f64;
        let mean = data.iter().map(|&v| v as f64).sum::<f64>() / n;
        let m2 = data.iter().map(|&v| (v as f64 - mean).powi(2)).sum::<f64>() / n;
        let m4 = data.iter().map(|&v| (v as f64 - mean).powi(4)).sum::<f64>() / n;
        m4 / (m2 * m2)
    }

    #[test]
    fn undefined_below_four_samples() {
        assert_eq!(kurtosis(&[]), None);
        assert_eq!(kurtosis(&[5]), None);
        assert_eq!(kurtosis(&[5, 9, 7]), None);
    }

    #[test]
    fn undefined_for_zero_variance() {
        assert_eq!(kurtosis(&[3; 50]), None);
    }

    #[test]
    fn uniform_ramp_matches_the_reference() {
        let data: Vec<i32> = (0..50).collect();
        let k = kurtosis(&data).unwrap();
        let expected = reference_kurtosis(&data);
        assert!((k as f64 - expected).abs() < 1e-4);
        // Discrete uniform over 50 points sits just under 1.8.
        assert!((k - 1.79904).abs() < 1e-3);
    }

    #[test]
    fn single_spike_dominates_the_moment_ratio() {
        let mut data = vec![100; 49];
        data.push(5000);
        let k = kurtosis(&data).unwrap();
        let expected = reference_kurtosis(&data);
        assert!((k as f64 - expected).abs() < 1e-2);
        assert!(k > 40.0);
    }

    #[test]
    fn window_reports_undefined_until_filled() {
        let mut window: SampleWindow = SampleWindow::new();
        for v in 0..49 {
            window.push(v);
            assert_eq!(window.kurtosis(), None);
        }
        assert!(!window.is_full());
        window.push(49);
        assert!(window.is_full());
        assert!(window.kurtosis().is_some());
    }

    #[test]
    fn window_with_no_variance_stays_undefined() {
        let mut window: SampleWindow = SampleWindow::new();
        for _ in 0..60 {
            window.push(42);
        }
        assert!(window.is_full());
        assert_eq!(window.kurtosis(), None);
    }

    #[test]
    fn ring_overwrites_oldest_first() {
        let mut window: SampleWindow<4> = SampleWindow::new();
        window.push(1);
        window.push(2);
        assert_eq!(window.len(), 2);
        assert_eq!(window.values(), vec![1, 2]);
        assert!(!window.is_full());

        for v in 3..=6 {
            window.push(v);
        }
        assert_eq!(window.len(), 4);
        assert!(window.is_full());
        assert_eq!(window.values(), vec![3, 4, 5, 6]);
    }
}
