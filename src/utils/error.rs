// src/utils/error.rs

use thiserror::Error;

/// The primary error type for all fallible operations in the crate.
///
/// Precondition violations (touching a sleeping buffer, mismatched operands of
/// an element-wise operator) are programmer errors and panic instead.
#[derive(Error, Debug)]
pub enum WaveError {
    /// An error occurred while reading or writing a persisted buffer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A linear element index fell outside `0..len`.
    #[error("Index {index} out of range for buffer of {len} elements")]
    IndexOutOfRange { index: usize, len: usize },

    /// A 2-D coordinate fell outside the buffer.
    #[error("Pixel ({x}, {y}) out of range for {width}x{height} buffer")]
    PixelOutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// An orientation code or slot index that does not address a subband.
    #[error("Invalid subband: {0}")]
    InvalidSubband(String),

    /// A scale index outside `1..=num_scales`.
    #[error("Invalid scale {scale} (pyramid has {num_scales} scales)")]
    InvalidScale { scale: usize, num_scales: usize },

    /// Occurs when buffer geometry does not match what an operation expects.
    #[error("Dimension mismatch: expected {expected:?}, but got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// An invalid argument was provided to a function.
    #[error("Invalid argument: {0}")]
    InvalidArg(String),

    /// The requested operation is not supported in the current state.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// A specialized `Result` type for wavelet operations.
pub type Result<T> = std::result::Result<T, WaveError>;
