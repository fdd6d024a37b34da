// src/host.rs

//! Dense-matrix entry points for host environments.
//!
//! Hosts hand over a flat matrix plus its shape and storage order and get
//! the subband pyramid back as matrices in the same order and element
//! type. A column-major `rows × cols` matrix is read as a `rows`-wide,
//! `cols`-high buffer, so no transposition takes place in either direction.

use crate::bands::{Orientation, SubbandStore};
use crate::buffer::{Buffer, Sample};
use crate::lifting::Cdf97;
use crate::transform::TransformEngine;
use crate::utils::error::{Result, WaveError};
use crate::utils::log::debug;
use num_traits::Float;

/// Number of scales used when the host does not ask for a specific count.
pub const DEFAULT_LEVELS: usize = 5;

/// Storage order of a flat matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixLayout {
    #[default]
    RowMajor,
    ColumnMajor,
}

/// A dense matrix in a host's storage order.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    pub rows: usize,
    pub cols: usize,
    pub layout: MatrixLayout,
    pub data: Vec<T>,
}

impl<T: Sample> Matrix<T> {
    pub fn new(rows: usize, cols: usize, layout: MatrixLayout, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(WaveError::InvalidArg(format!(
                "{} elements cannot fill a {}x{} matrix",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Matrix {
            rows,
            cols,
            layout,
            data,
        })
    }

    /// Element at `(row, col)`.
    pub fn at(&self, row: usize, col: usize) -> T {
        match self.layout {
            MatrixLayout::RowMajor => self.data[row * self.cols + col],
            MatrixLayout::ColumnMajor => self.data[col * self.rows + row],
        }
    }

    fn to_buffer(&self) -> Result<Buffer<T>> {
        let (width, height) = match self.layout {
            MatrixLayout::RowMajor => (self.cols, self.rows),
            MatrixLayout::ColumnMajor => (self.rows, self.cols),
        };
        Buffer::from_slice(width, height, &self.data)
    }

    fn from_buffer(buffer: &Buffer<T>, layout: MatrixLayout) -> Self {
        let (rows, cols) = match layout {
            MatrixLayout::RowMajor => (buffer.height(), buffer.width()),
            MatrixLayout::ColumnMajor => (buffer.width(), buffer.height()),
        };
        Matrix {
            rows,
            cols,
            layout,
            data: buffer.data().to_vec(),
        }
    }
}

/// Decomposes `matrix` into `levels` scales with the default CDF 9/7 kernel.
///
/// Entry `s - 1` of the result holds the `[LH, HL, HH]` bands of scale `s`;
/// the last entry additionally ends with the coarsest LL band.
pub fn decompose_matrix<T>(matrix: &Matrix<T>, levels: usize) -> Result<Vec<Vec<Matrix<T>>>>
where
    T: Sample + Float,
{
    let mut store = SubbandStore::new(matrix.to_buffer()?);
    let engine = TransformEngine::new(Cdf97::default());
    engine.decompose(&mut store, levels)?;
    debug!(
        "decomposed {}x{} matrix into {} levels",
        matrix.rows, matrix.cols, levels
    );

    let mut pyramid = Vec::with_capacity(levels);
    for scale in 1..=levels {
        let mut bands = Vec::with_capacity(4);
        for orientation in Orientation::ALL {
            bands.push(Matrix::from_buffer(
                store.band(scale, orientation)?,
                matrix.layout,
            ));
        }
        if scale == levels {
            bands.push(Matrix::from_buffer(store.ll(levels)?, matrix.layout));
        }
        pyramid.push(bands);
    }
    Ok(pyramid)
}

/// Synthesizes the spatial contribution of one subband of `matrix`.
///
/// `orientation` uses the host codes `0 = LH`, `1 = HL`, `2 = HH`. The
/// result has the shape and layout of the input.
pub fn reconstruct_subband<T>(
    matrix: &Matrix<T>,
    levels: usize,
    scale: usize,
    orientation: u8,
) -> Result<Matrix<T>>
where
    T: Sample + Float,
{
    let orientation = Orientation::try_from(orientation)?;
    let mut store = SubbandStore::new(matrix.to_buffer()?);
    let engine = TransformEngine::new(Cdf97::default());
    engine.decompose(&mut store, levels)?;
    engine.reconstruct_one(&mut store, scale, orientation)?;
    Ok(Matrix::from_buffer(store.image(), matrix.layout))
}
