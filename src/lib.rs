//! Multi-level 2-D discrete wavelet transform with the CDF 9/7 lifting scheme.
//!
//! This crate decomposes an image into a subband pyramid, lets the caller
//! inspect or quantize the subbands, and reconstructs the image (or the
//! contribution of a single subband) from them.
//!
//! # Quick Start
//!
//! ```
//! use wavelift::{Buffer, Cdf97, Orientation, SubbandStore, TransformEngine};
//!
//! let image = Buffer::from_fn(64, 48, |x, y| ((x * y) % 17) as f64);
//! let mut store = SubbandStore::new(image.clone());
//! let engine = TransformEngine::new(Cdf97::default());
//!
//! engine.decompose(&mut store, 3)?;
//! let detail_energy = store.band(1, Orientation::Hh)?.energy();
//! assert!(detail_energy > 0.0);
//!
//! engine.reconstruct(&mut store)?;
//! assert!(store.image().mse(&image) < 1e-12);
//! # Ok::<(), wavelift::WaveError>(())
//! ```
//!
//! # Modules
//!
//! - [`buffer`]: owned 2-D sample buffers with boundary extension, resampling,
//!   quantization, statistics and raw file I/O
//! - [`bands`]: the `(scale, band)`-addressed subband store
//! - [`steps`]: per-subband quantization step tables
//! - [`transform`]: the kernel-independent decomposition engine
//! - [`lifting`]: the CDF 9/7 lifting kernel
//! - [`host`]: dense-matrix entry points for host environments

pub mod bands;
pub mod buffer;
pub mod host;
pub mod lifting;
pub mod steps;
pub mod transform;
pub mod utils;

// Core types
pub use bands::{Band, Orientation, SubbandStore};
pub use buffer::{Buffer, ResizeMode, Sample};
pub use lifting::{Cdf97, Normalization};
pub use steps::StepSizeTable;
pub use transform::{Kernel, TransformEngine};

// Error types
pub use utils::error::{Result, WaveError};
