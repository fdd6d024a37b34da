// src/buffer/stats.rs

//! Descriptive statistics over buffer contents.
//!
//! All statistics are computed in `f64`. Mean-based statistics of an empty
//! buffer are NaN. Comparisons between two buffers (`sse`, `mse`,
//! `correlation`, ...) read the overlapping region only.

use super::{Buffer, Sample};
use std::cmp::Ordering;

/// Sorted `(value, occurrences)` pairs.
pub type Histogram<T> = Vec<(T, usize)>;

/// 1 / ln(2), converts natural-log entropy to bits.
const LOG2_E: f64 = 1.4426950;

fn sorted<T: Sample>(values: &[T]) -> Vec<T> {
    let mut values = values.to_vec();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    values
}

impl<T: Sample> Buffer<T> {
    fn reals(&self) -> impl Iterator<Item = f64> + '_ {
        self.data().iter().map(|v| v.to_real())
    }

    /// Visits `(self, other)` sample pairs over the overlapping region.
    fn overlap<F: FnMut(f64, f64)>(&self, other: &Buffer<T>, mut f: F) -> usize {
        let w = self.width().min(other.width());
        let h = self.height().min(other.height());
        for y in 0..h {
            for (a, b) in self.row(y)[..w].iter().zip(&other.row(y)[..w]) {
                f(a.to_real(), b.to_real());
            }
        }
        w * h
    }

    pub fn sum(&self) -> f64 {
        self.reals().sum()
    }

    pub fn mean(&self) -> f64 {
        self.sum() / self.size() as f64
    }

    /// Smallest sample; the type's maximum for an empty buffer.
    pub fn min(&self) -> T {
        self.data()
            .iter()
            .fold(T::max_value(), |acc, &v| if v < acc { v } else { acc })
    }

    /// Largest sample; the type's minimum for an empty buffer.
    pub fn max(&self) -> T {
        self.data()
            .iter()
            .fold(T::min_value(), |acc, &v| if v > acc { v } else { acc })
    }

    pub fn range(&self) -> T {
        self.max() - self.min()
    }

    /// Middle of the sorted samples; the average of the two middle samples
    /// for an even count.
    pub fn median(&self) -> f64 {
        let values = sorted(self.data());
        let n = values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n % 2 != 0 {
            values[n / 2].to_real()
        } else {
            0.5 * (values[n / 2 - 1].to_real() + values[n / 2].to_real())
        }
    }

    /// Most frequent sample. Ties resolve to the largest value.
    pub fn mode(&self) -> T {
        let mut best = (T::zero(), 0);
        for (value, count) in self.histogram() {
            if count >= best.1 {
                best = (value, count);
            }
        }
        best.0
    }

    /// Number of samples equal to `value`.
    pub fn count(&self, value: T) -> usize {
        self.data().iter().filter(|&&v| v == value).count()
    }

    /// True when every sample is zero.
    pub fn is_null(&self) -> bool {
        self.data().iter().all(|v| v.is_zero())
    }

    pub fn histogram(&self) -> Histogram<T> {
        let mut hist: Histogram<T> = Vec::new();
        for v in sorted(self.data()) {
            match hist.last_mut() {
                Some((last, count)) if *last == v => *count += 1,
                _ => hist.push((v, 1)),
            }
        }
        hist
    }

    /// Mean square, `E{X^2}`.
    pub fn energy(&self) -> f64 {
        self.reals().map(|v| v * v).sum::<f64>() / self.size() as f64
    }

    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        self.reals().map(|v| (v - mean) * (v - mean)).sum::<f64>() / self.size() as f64
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Standardized central moment of order `n`.
    pub fn moment(&self, n: i32) -> f64 {
        let mean = self.mean();
        let sum: f64 = self.reals().map(|v| (v - mean).powi(n)).sum();
        sum / self.std_dev().powi(n) / self.size() as f64
    }

    pub fn skewness(&self) -> f64 {
        self.moment(3)
    }

    pub fn kurtosis(&self) -> f64 {
        self.moment(4)
    }

    /// `n`-th root of the sum of the samples raised to `n`. Order 0 yields
    /// 0 and order 1 the plain sum.
    pub fn norm(&self, n: u32) -> f64 {
        match n {
            0 => 0.0,
            1 => self.sum(),
            _ => {
                let sum: f64 = self.reals().map(|v| v.powi(n as i32)).sum();
                sum.powf(1.0 / n as f64)
            }
        }
    }

    pub fn rms(&self) -> f64 {
        self.energy().sqrt()
    }

    /// Sum of squared differences.
    pub fn sse(&self, other: &Buffer<T>) -> f64 {
        let mut sum = 0.0;
        self.overlap(other, |a, b| sum += (a - b) * (a - b));
        sum
    }

    pub fn mse(&self, other: &Buffer<T>) -> f64 {
        let mut sum = 0.0;
        let n = self.overlap(other, |a, b| sum += (a - b) * (a - b));
        sum / n as f64
    }

    pub fn rmse(&self, other: &Buffer<T>) -> f64 {
        self.mse(other).sqrt()
    }

    /// Peak signal-to-noise ratio in dB for 8-bit data.
    pub fn psnr(&self, other: &Buffer<T>) -> f64 {
        10.0 * (65025.0 / self.mse(other)).log10()
    }

    /// Pearson correlation coefficient.
    pub fn correlation(&self, other: &Buffer<T>) -> f64 {
        let (mx, my) = (self.mean(), other.mean());
        let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
        self.overlap(other, |a, b| {
            let (a, b) = (a - mx, b - my);
            sxy += a * b;
            sxx += a * a;
            syy += b * b;
        });
        sxy / (sxx * syy).sqrt()
    }

    pub fn covariance(&self, other: &Buffer<T>) -> f64 {
        let (mx, my) = (self.mean(), other.mean());
        let mut sxy = 0.0;
        let n = self.overlap(other, |a, b| sxy += (a - mx) * (b - my));
        sxy / n as f64
    }

    /// Shannon entropy of the sample histogram, in bits.
    pub fn entropy(&self) -> f64 {
        let size = self.size() as f64;
        let h: f64 = self
            .histogram()
            .into_iter()
            .map(|(_, count)| {
                let p = count as f64 / size;
                p * p.ln()
            })
            .sum();
        -h * LOG2_E
    }

    /// Mean luminance of the display model `(offset + scaling * v) ^ gamma`.
    /// Samples mapping to a non-positive voltage contribute zero.
    pub fn lmean(&self, offset: f64, scaling: f64, gamma: f64) -> f64 {
        let sum: f64 = self
            .reals()
            .map(|v| offset + scaling * v)
            .filter(|&v| v > 0.0)
            .map(|v| (gamma * v.ln()).exp())
            .sum();
        sum / self.size() as f64
    }

    /// Standard deviation of the luminance values.
    pub fn lrms(&self, offset: f64, scaling: f64, gamma: f64) -> f64 {
        self.to_luminance(offset, scaling, gamma).std_dev()
    }

    /// RMS contrast against a background luminance `lmean`.
    pub fn crms(&self, lmean: f64, offset: f64, scaling: f64, gamma: f64) -> f64 {
        self.lrms(offset, scaling, gamma) / lmean
    }
}
