// src/lifting.rs

//! CDF 9/7 biorthogonal wavelet by lifting.
//!
//! The analysis filter bank is factored into two predict/update pairs and a
//! diagonal scaling:
//!
//! ```text
//! D[i] = x[2i+1] + α (x[2i] + x[2i+2])      predict 1
//! S[i] = x[2i]   + β (D[i] + D[i-1])        update 1
//! D[i] += γ (S[i] + S[i+1])                 predict 2
//! S[i] += δ (D[i] + D[i-1])                 update 2
//! S *= low gain, D *= high gain             normalize
//! ```
//!
//! Signals are extended by whole-sample symmetry, which turns the boundary
//! terms into doubled coefficients (`x[2n] = x[2n-2]`, `D[-1] = D[0]`).
//! Synthesis undoes the same steps in reverse order.

use crate::buffer::{Buffer, Sample};
use crate::transform::Kernel;
use crate::utils::error::{Result, WaveError};
use num_traits::Float;

pub const ALPHA: f64 = -1.586134342;
pub const BETA: f64 = -0.052980118;
pub const GAMMA: f64 = 0.882911075;
pub const DELTA: f64 = 0.443506852;
pub const K: f64 = 0.8698643;
pub const K_INV: f64 = 1.1496046;

/// Lowpass gain of the unit-gain normalization.
pub const B0: f64 = 1.0 / 1.23017410558578;
/// Highpass gain of the unit-gain normalization.
pub const B1: f64 = 1.0 / 1.62578613134411;

/// Gain pair applied after analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// `S *= 1/K`, `D *= -K`: orthonormal-like scaling, DC gain √2.
    Standard,
    /// `S *= B0`, `D *= B1`: unit DC gain in the lowpass band.
    UnitGain,
}

impl Default for Normalization {
    fn default() -> Self {
        if cfg!(feature = "unit-gain") {
            Normalization::UnitGain
        } else {
            Normalization::Standard
        }
    }
}

impl Normalization {
    /// `(low, high)` gains applied by analysis.
    fn forward_gains(self) -> (f64, f64) {
        match self {
            Normalization::Standard => (K_INV, -K),
            Normalization::UnitGain => (B0, B1),
        }
    }

    /// `(low, high)` gains applied by synthesis before unlifting.
    fn inverse_gains(self) -> (f64, f64) {
        match self {
            Normalization::Standard => (K, -K_INV),
            Normalization::UnitGain => (1.0 / B0, 1.0 / B1),
        }
    }
}

/// Strided view into a flat sample slice.
#[derive(Debug, Clone, Copy)]
struct Lane {
    offset: usize,
    stride: usize,
}

impl Lane {
    #[inline]
    fn at(self, n: usize) -> usize {
        self.offset + n * self.stride
    }
}

/// One signal of length `2n` and its two half-length subbands.
#[derive(Debug, Clone, Copy)]
struct Line {
    x: Lane,
    s: Lane,
    d: Lane,
    n: usize,
}

/// Lifting coefficients converted to the sample type.
struct Coefficients<T> {
    alpha: T,
    beta: T,
    gamma: T,
    delta: T,
    two: T,
}

impl<T: Sample + Float> Coefficients<T> {
    fn new() -> Self {
        Coefficients {
            alpha: T::from_real(ALPHA),
            beta: T::from_real(BETA),
            gamma: T::from_real(GAMMA),
            delta: T::from_real(DELTA),
            two: T::from_real(2.0),
        }
    }

    fn analyze(&self, x: &[T], s: &mut [T], d: &mut [T], line: Line, gains: (T, T)) {
        let Line { x: xl, s: sl, d: dl, n } = line;
        if n == 0 {
            return;
        }
        let last = n - 1;

        for i in 0..last {
            d[dl.at(i)] =
                x[xl.at(2 * i + 1)] + self.alpha * (x[xl.at(2 * i)] + x[xl.at(2 * i + 2)]);
        }
        d[dl.at(last)] = x[xl.at(2 * last + 1)] + self.two * self.alpha * x[xl.at(2 * last)];

        s[sl.at(0)] = x[xl.at(0)] + self.two * self.beta * d[dl.at(0)];
        for i in 1..n {
            s[sl.at(i)] = x[xl.at(2 * i)] + self.beta * (d[dl.at(i)] + d[dl.at(i - 1)]);
        }

        for i in 0..last {
            d[dl.at(i)] = d[dl.at(i)] + self.gamma * (s[sl.at(i)] + s[sl.at(i + 1)]);
        }
        d[dl.at(last)] = d[dl.at(last)] + self.two * self.gamma * s[sl.at(last)];

        s[sl.at(0)] = s[sl.at(0)] + self.two * self.delta * d[dl.at(0)];
        for i in 1..n {
            s[sl.at(i)] = s[sl.at(i)] + self.delta * (d[dl.at(i)] + d[dl.at(i - 1)]);
        }

        let (low_gain, high_gain) = gains;
        for i in 0..n {
            s[sl.at(i)] = s[sl.at(i)] * low_gain;
            d[dl.at(i)] = d[dl.at(i)] * high_gain;
        }
    }

    /// Inverse of [`analyze`](Self::analyze). `s` and `d` are consumed as
    /// scratch space.
    fn synthesize(&self, x: &mut [T], s: &mut [T], d: &mut [T], line: Line, gains: (T, T)) {
        let Line { x: xl, s: sl, d: dl, n } = line;
        if n == 0 {
            return;
        }
        let last = n - 1;

        let (low_gain, high_gain) = gains;
        for i in 0..n {
            s[sl.at(i)] = s[sl.at(i)] * low_gain;
            d[dl.at(i)] = d[dl.at(i)] * high_gain;
        }

        s[sl.at(0)] = s[sl.at(0)] - self.two * self.delta * d[dl.at(0)];
        for i in 1..n {
            s[sl.at(i)] = s[sl.at(i)] - self.delta * (d[dl.at(i)] + d[dl.at(i - 1)]);
        }

        for i in 0..last {
            d[dl.at(i)] = d[dl.at(i)] - self.gamma * (s[sl.at(i)] + s[sl.at(i + 1)]);
        }
        d[dl.at(last)] = d[dl.at(last)] - self.two * self.gamma * s[sl.at(last)];

        x[xl.at(0)] = s[sl.at(0)] - self.two * self.beta * d[dl.at(0)];
        for i in 1..n {
            x[xl.at(2 * i)] = s[sl.at(i)] - self.beta * (d[dl.at(i)] + d[dl.at(i - 1)]);
        }

        for i in 0..last {
            x[xl.at(2 * i + 1)] =
                d[dl.at(i)] - self.alpha * (x[xl.at(2 * i)] + x[xl.at(2 * i + 2)]);
        }
        x[xl.at(2 * last + 1)] = d[dl.at(last)] - self.two * self.alpha * x[xl.at(2 * last)];
    }
}

fn check_split<T: Sample>(
    full: &Buffer<T>,
    low: &Buffer<T>,
    high: &Buffer<T>,
    along_rows: bool,
) -> Result<()> {
    let expected = if along_rows {
        (2 * low.width(), low.height())
    } else {
        (low.width(), 2 * low.height())
    };
    if full.dimensions() != expected {
        return Err(WaveError::DimensionMismatch {
            expected,
            actual: full.dimensions(),
        });
    }
    if high.dimensions() != low.dimensions() {
        return Err(WaveError::DimensionMismatch {
            expected: low.dimensions(),
            actual: high.dimensions(),
        });
    }
    Ok(())
}

/// Row lines: each row of the full buffer against the same row of the bands.
fn row_lines(width: usize, height: usize) -> impl Iterator<Item = Line> {
    (0..height).map(move |y| Line {
        x: Lane { offset: y * 2 * width, stride: 1 },
        s: Lane { offset: y * width, stride: 1 },
        d: Lane { offset: y * width, stride: 1 },
        n: width,
    })
}

/// Column lines: all three buffers share the same width.
fn col_lines(width: usize, height: usize) -> impl Iterator<Item = Line> {
    (0..width).map(move |x| Line {
        x: Lane { offset: x, stride: width },
        s: Lane { offset: x, stride: width },
        d: Lane { offset: x, stride: width },
        n: height,
    })
}

/// The CDF 9/7 lifting kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cdf97 {
    normalization: Normalization,
}

impl Cdf97 {
    pub fn new(normalization: Normalization) -> Self {
        Cdf97 { normalization }
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    fn gains<T: Sample>(&self, inverse: bool) -> (T, T) {
        let (low, high) = if inverse {
            self.normalization.inverse_gains()
        } else {
            self.normalization.forward_gains()
        };
        (T::from_real(low), T::from_real(high))
    }

    fn forward<T, I>(&self, src: &Buffer<T>, low: &mut Buffer<T>, high: &mut Buffer<T>, lines: I)
    where
        T: Sample + Float,
        I: Iterator<Item = Line>,
    {
        let coefficients = Coefficients::new();
        let gains = self.gains(false);
        let (s, d) = (low.data_mut(), high.data_mut());
        for line in lines {
            coefficients.analyze(src.data(), s, d, line, gains);
        }
    }

    fn inverse<T, I>(&self, dst: &mut Buffer<T>, low: &mut Buffer<T>, high: &mut Buffer<T>, lines: I)
    where
        T: Sample + Float,
        I: Iterator<Item = Line>,
    {
        let coefficients = Coefficients::new();
        let gains = self.gains(true);
        let (s, d) = (low.data_mut(), high.data_mut());
        let x = dst.data_mut();
        for line in lines {
            coefficients.synthesize(x, s, d, line, gains);
        }
    }
}

impl<T: Sample + Float> Kernel<T> for Cdf97 {
    fn transform_rows(
        &self,
        src: &Buffer<T>,
        low: &mut Buffer<T>,
        high: &mut Buffer<T>,
    ) -> Result<()> {
        check_split(src, low, high, true)?;
        let lines = row_lines(low.width(), low.height());
        self.forward(src, low, high, lines);
        Ok(())
    }

    fn transform_cols(
        &self,
        src: &Buffer<T>,
        low: &mut Buffer<T>,
        high: &mut Buffer<T>,
    ) -> Result<()> {
        check_split(src, low, high, false)?;
        let lines = col_lines(low.width(), low.height());
        self.forward(src, low, high, lines);
        Ok(())
    }

    fn untransform_rows(
        &self,
        dst: &mut Buffer<T>,
        low: &mut Buffer<T>,
        high: &mut Buffer<T>,
    ) -> Result<()> {
        check_split(dst, low, high, true)?;
        let lines = row_lines(low.width(), low.height());
        self.inverse(dst, low, high, lines);
        Ok(())
    }

    fn untransform_cols(
        &self,
        dst: &mut Buffer<T>,
        low: &mut Buffer<T>,
        high: &mut Buffer<T>,
    ) -> Result<()> {
        check_split(dst, low, high, false)?;
        let lines = col_lines(low.width(), low.height());
        self.inverse(dst, low, high, lines);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < tol, "index {}: {} vs {}", i, a, e);
        }
    }

    fn split_rows(kernel: &Cdf97, signal: &[f64]) -> (Buffer<f64>, Buffer<f64>) {
        let n = signal.len() / 2;
        let src = Buffer::from_slice(signal.len(), 1, signal).unwrap();
        let mut low = Buffer::new(n, 1);
        let mut high = Buffer::new(n, 1);
        kernel.transform_rows(&src, &mut low, &mut high).unwrap();
        (low, high)
    }

    #[test]
    fn test_forward_ramp() {
        let signal: Vec<f64> = (1..=8).map(f64::from).collect();
        let (low, high) = split_rows(&Cdf97::new(Normalization::Standard), &signal);
        close(
            low.data(),
            &[1.88605282, 4.34625631, 6.99541208, 9.98917257],
            1e-6,
        );
        close(high.data(), &[-0.17677665, 0.0, 0.12907777, -0.61170878], 1e-6);
    }

    #[test]
    fn test_constant_signal_gain() {
        let (low, high) = split_rows(&Cdf97::new(Normalization::Standard), &[10.0; 8]);
        close(low.data(), &[10.0 * 2f64.sqrt(); 4], 1e-5);
        close(high.data(), &[0.0; 4], 1e-6);
    }

    #[test]
    fn test_shortest_signal() {
        let (low, high) = split_rows(&Cdf97::new(Normalization::Standard), &[3.0, 5.0]);
        close(low.data(), &[5.65685522], 1e-6);
        close(high.data(), &[-1.41421330], 1e-6);
    }

    #[test]
    fn test_unit_gain_scales_bands() {
        let signal = [2.0, -1.0, 4.0, 0.5, 3.0, 3.0];
        let (std_low, std_high) = split_rows(&Cdf97::new(Normalization::Standard), &signal);
        let (unit_low, unit_high) = split_rows(&Cdf97::new(Normalization::UnitGain), &signal);
        for i in 0..3 {
            let low_ratio = unit_low.pixel(i, 0) / std_low.pixel(i, 0);
            let high_ratio = unit_high.pixel(i, 0) / std_high.pixel(i, 0);
            assert!((low_ratio - B0 / K_INV).abs() < 1e-9);
            assert!((high_ratio - B1 / -K).abs() < 1e-9);
        }
    }

    #[test]
    fn test_row_roundtrip() {
        for normalization in [Normalization::Standard, Normalization::UnitGain] {
            let kernel = Cdf97::new(normalization);
            let signal = [7.0, -2.0, 0.25, 9.5, 3.0, 3.0, -4.0, 1.0, 8.0, 6.0];
            let (mut low, mut high) = split_rows(&kernel, &signal);
            let mut out = Buffer::new(10, 1);
            kernel.untransform_rows(&mut out, &mut low, &mut high).unwrap();
            close(out.data(), &signal, 1e-6);
        }
    }

    #[test]
    fn test_column_pass_matches_transposed_row_pass() {
        let kernel = Cdf97::default();
        let image = Buffer::from_fn(3, 6, |x, y| ((x * 7 + y * 3) % 5) as f64 - 1.5);

        let mut low = Buffer::new(3, 3);
        let mut high = Buffer::new(3, 3);
        kernel.transform_cols(&image, &mut low, &mut high).unwrap();

        let transposed = image.transpose();
        let mut row_low = Buffer::new(3, 3);
        let mut row_high = Buffer::new(3, 3);
        kernel
            .transform_rows(&transposed, &mut row_low, &mut row_high)
            .unwrap();
        close(low.data(), row_low.transpose().data(), 1e-12);
        close(high.data(), row_high.transpose().data(), 1e-12);

        let mut out = Buffer::new(3, 6);
        kernel.untransform_cols(&mut out, &mut low, &mut high).unwrap();
        close(out.data(), image.data(), 1e-6);
    }

    #[test]
    fn test_f32_roundtrip() {
        let kernel = Cdf97::default();
        let src = Buffer::from_fn(8, 2, |x, y| (x * x) as f32 - y as f32);
        let mut low = Buffer::new(4, 2);
        let mut high = Buffer::new(4, 2);
        kernel.transform_rows(&src, &mut low, &mut high).unwrap();
        let mut out = Buffer::new(8, 2);
        kernel.untransform_rows(&mut out, &mut low, &mut high).unwrap();
        for (a, b) in out.data().iter().zip(src.data()) {
            assert!((a - b).abs() < 1e-3);
        }
    }

    #[test]
    fn test_dimension_mismatch() {
        let kernel = Cdf97::default();
        let src = Buffer::<f64>::new(6, 1);
        let mut low = Buffer::new(4, 1);
        let mut high = Buffer::new(4, 1);
        let err = kernel.transform_rows(&src, &mut low, &mut high).unwrap_err();
        assert!(matches!(
            err,
            WaveError::DimensionMismatch {
                expected: (8, 1),
                actual: (6, 1)
            }
        ));

        let mut short = Buffer::new(3, 1);
        assert!(kernel.transform_rows(&Buffer::new(8, 1), &mut low, &mut short).is_err());
    }
}
