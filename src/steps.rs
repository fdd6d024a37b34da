// src/steps.rs

//! Per-subband quantization steps.

use crate::bands::Orientation;
use crate::utils::error::{Result, WaveError};

/// Number of scales a default table covers.
pub const DEFAULT_NUM_SCALES: usize = 5;

/// A flat table of `1 + 3N` quantization steps for an `N`-scale pyramid.
///
/// Index 0 holds the step of the coarsest LL band. The three detail steps
/// of scale `s` sit at `N₁ - 3s` (LH), `N₁ - 3s + 1` (HL) and
/// `N₁ - 3s + 2` (HH) with `N₁ = 1 + 3N`, so the coarsest scale follows
/// LL directly and scale 1 closes the table.
#[derive(Debug, Clone, PartialEq)]
pub struct StepSizeTable {
    steps: Vec<f64>,
}

impl Default for StepSizeTable {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_SCALES)
    }
}

impl StepSizeTable {
    /// A zero-filled table. A zero step leaves its band unquantized.
    pub fn new(num_scales: usize) -> Self {
        StepSizeTable {
            steps: vec![0.0; 1 + 3 * num_scales],
        }
    }

    /// A table with the same step for every band.
    pub fn uniform(num_scales: usize, step: f64) -> Self {
        StepSizeTable {
            steps: vec![step; 1 + 3 * num_scales],
        }
    }

    /// Wraps steps already laid out in table order.
    pub fn from_steps(steps: Vec<f64>) -> Result<Self> {
        if steps.len() % 3 != 1 {
            return Err(WaveError::InvalidArg(format!(
                "{} steps do not form a 1 + 3N table",
                steps.len()
            )));
        }
        Ok(StepSizeTable { steps })
    }

    pub fn num_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn num_scales(&self) -> usize {
        (self.steps.len() - 1) / 3
    }

    /// Resizes the table for `num_scales` scales and zeroes every step.
    pub fn set_num_scales(&mut self, num_scales: usize) {
        self.steps.clear();
        self.steps.resize(1 + 3 * num_scales, 0.0);
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.steps
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.steps
    }

    fn index(&self, scale: usize, orientation: Orientation) -> Result<usize> {
        let num_scales = self.num_scales();
        if scale == 0 || scale > num_scales {
            return Err(WaveError::InvalidScale { scale, num_scales });
        }
        let base = self.steps.len() - 3 * scale;
        Ok(match orientation {
            Orientation::Lh => base,
            Orientation::Hl => base + 1,
            Orientation::Hh => base + 2,
        })
    }

    /// Step of the coarsest LL band.
    pub fn ll(&self) -> f64 {
        self.steps[0]
    }

    pub fn set_ll(&mut self, step: f64) {
        self.steps[0] = step;
    }

    /// Step of one detail band; `scale` runs from 1 to `num_scales()`.
    pub fn get(&self, scale: usize, orientation: Orientation) -> Result<f64> {
        Ok(self.steps[self.index(scale, orientation)?])
    }

    pub fn set(&mut self, scale: usize, orientation: Orientation, step: f64) -> Result<()> {
        let index = self.index(scale, orientation)?;
        self.steps[index] = step;
        Ok(())
    }

    pub fn lh(&self, scale: usize) -> Result<f64> {
        self.get(scale, Orientation::Lh)
    }

    pub fn hl(&self, scale: usize) -> Result<f64> {
        self.get(scale, Orientation::Hl)
    }

    pub fn hh(&self, scale: usize) -> Result<f64> {
        self.get(scale, Orientation::Hh)
    }

    pub fn set_lh(&mut self, scale: usize, step: f64) -> Result<()> {
        self.set(scale, Orientation::Lh, step)
    }

    pub fn set_hl(&mut self, scale: usize, step: f64) -> Result<()> {
        self.set(scale, Orientation::Hl, step)
    }

    pub fn set_hh(&mut self, scale: usize, step: f64) -> Result<()> {
        self.set(scale, Orientation::Hh, step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = StepSizeTable::default();
        assert_eq!(table.num_steps(), 16);
        assert_eq!(table.num_scales(), 5);
        assert!(table.as_slice().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_layout_two_scales() {
        let mut table = StepSizeTable::new(2);
        table.set_ll(1.0);
        table.set_lh(2, 2.0).unwrap();
        table.set_hl(2, 3.0).unwrap();
        table.set_hh(2, 4.0).unwrap();
        table.set_lh(1, 5.0).unwrap();
        table.set_hl(1, 6.0).unwrap();
        table.set_hh(1, 7.0).unwrap();
        assert_eq!(table.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(table.ll(), 1.0);
        assert_eq!(table.hl(2).unwrap(), 3.0);
        assert_eq!(table.get(1, Orientation::Hh).unwrap(), 7.0);
    }

    #[test]
    fn test_scale_is_checked() {
        let mut table = StepSizeTable::new(3);
        assert!(matches!(
            table.lh(0),
            Err(WaveError::InvalidScale {
                scale: 0,
                num_scales: 3
            })
        ));
        assert!(table.set_hh(4, 1.0).is_err());
        assert!(table.as_slice().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_set_num_scales_resets() {
        let mut table = StepSizeTable::uniform(2, 8.0);
        table.set_num_scales(4);
        assert_eq!(table.num_steps(), 13);
        assert!(table.as_slice().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_from_steps_validates_length() {
        assert!(StepSizeTable::from_steps(vec![1.0; 4]).is_ok());
        assert!(StepSizeTable::from_steps(vec![1.0; 5]).is_err());
        assert!(StepSizeTable::from_steps(Vec::new()).is_err());
    }
}
