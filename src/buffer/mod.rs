// src/buffer/mod.rs

//! Owned row-major 2-D sample buffers.
//!
//! [`Buffer`] is the storage unit of the wavelet pyramid: every subband of a
//! [`SubbandStore`](crate::bands::SubbandStore) is one buffer. Besides plain
//! indexed access it offers the boundary-extension readers used by the
//! resampling code, geometric resizing, uniform and dead-zone quantization,
//! and a sleep state that drops the backing storage while keeping the
//! geometry.

pub mod io;
pub mod sample;
pub mod stats;

pub use sample::Sample;

use crate::utils::error::{Result, WaveError};
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

/// Quantization steps with a smaller magnitude leave the buffer untouched.
pub const MIN_STEP_SIZE: f64 = 1e-5;

/// How [`Buffer::resize`] treats the existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeMode {
    /// Discard the content; the new buffer is zero-filled.
    #[default]
    None,
    /// Keep the overlapping region, zero-fill the rest.
    Copy,
    /// Nearest-neighbour resampling.
    Nearest,
    /// Bilinear resampling.
    Bilinear,
    /// Cubic B-spline resampling.
    Bicubic,
}

/// Mirror index for boundaries: even symmetry around 0 and around size-1,
/// i.e. `-1 -> 1` and `size -> size - 2`.
#[inline]
pub(crate) fn mirror(k: isize, size: usize) -> usize {
    if size <= 1 {
        return 0;
    }
    let size = size as isize;
    let period = (size - 1) * 2;
    let mut k = k.rem_euclid(period);
    if k >= size {
        k = period - k;
    }
    k as usize
}

/// Cubic B-spline kernel, already divided by 6.
#[inline]
fn bspline_weight(x: f64) -> f64 {
    let cube = |v: f64| if v > 0.0 { v * v * v } else { 0.0 };
    (cube(x + 2.0) - 4.0 * cube(x + 1.0) + 6.0 * cube(x) - 4.0 * cube(x - 1.0)) / 6.0
}

/// A `width × height` buffer of samples stored row-major.
///
/// The storage is `None` while the buffer sleeps. Geometry queries keep
/// working in that state; element access panics, since touching a sleeping
/// buffer is a sequencing bug in the caller.
#[derive(Clone, Debug)]
pub struct Buffer<T> {
    width: usize,
    height: usize,
    data: Option<Vec<T>>,
    tag_x: i32,
    tag_y: i32,
    name: String,
}

impl<T: Sample> Default for Buffer<T> {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl<T: PartialEq> PartialEq for Buffer<T> {
    /// Buffers are equal when their geometry and samples match. Tags and
    /// names are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.data == other.data
    }
}

impl<T: Sample> Buffer<T> {
    /// Creates a zero-initialized buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(T::zero(), width, height)
    }

    /// Creates a buffer with every sample set to `value`.
    pub fn filled(value: T, width: usize, height: usize) -> Self {
        Buffer {
            width,
            height,
            data: Some(vec![value; width * height]),
            tag_x: 0,
            tag_y: 0,
            name: String::new(),
        }
    }

    /// Wraps row-major samples.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != width * height {
            return Err(WaveError::InvalidArg(format!(
                "{} samples cannot fill a {}x{} buffer",
                data.len(),
                width,
                height
            )));
        }
        Ok(Buffer {
            width,
            height,
            data: Some(data),
            tag_x: 0,
            tag_y: 0,
            name: String::new(),
        })
    }

    /// Copies row-major samples.
    pub fn from_slice(width: usize, height: usize, data: &[T]) -> Result<Self> {
        Self::from_vec(width, height, data.to_vec())
    }

    /// Creates a buffer by calling `f(x, y)` for each sample.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Buffer {
            width,
            height,
            data: Some(data),
            tag_x: 0,
            tag_y: 0,
            name: String::new(),
        }
    }

    // --- Geometry and metadata ---

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the dimensions as a tuple (width, height).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of samples, `width * height`.
    pub fn size(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn tag_x(&self) -> i32 {
        self.tag_x
    }

    pub fn set_tag_x(&mut self, tag: i32) {
        self.tag_x = tag;
    }

    pub fn tag_y(&self) -> i32 {
        self.tag_y
    }

    pub fn set_tag_y(&mut self, tag: i32) {
        self.tag_y = tag;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // --- Storage ---

    #[inline]
    fn storage(&self) -> &[T] {
        match &self.data {
            Some(data) => data,
            None => panic!(
                "buffer {:?} ({}x{}) accessed while asleep",
                self.name, self.width, self.height
            ),
        }
    }

    #[inline]
    fn storage_mut(&mut self) -> &mut [T] {
        match &mut self.data {
            Some(data) => data,
            None => panic!(
                "buffer {:?} ({}x{}) accessed while asleep",
                self.name, self.width, self.height
            ),
        }
    }

    /// Row-major samples. Panics if the buffer is asleep.
    pub fn data(&self) -> &[T] {
        self.storage()
    }

    /// Mutable row-major samples. Panics if the buffer is asleep.
    pub fn data_mut(&mut self) -> &mut [T] {
        self.storage_mut()
    }

    /// Row-major samples, or an error if the buffer is asleep.
    pub fn try_data(&self) -> Result<&[T]> {
        self.data.as_deref().ok_or_else(|| {
            WaveError::InvalidOperation(format!("buffer {:?} is asleep", self.name))
        })
    }

    /// Consumes the buffer and returns its samples (empty if asleep).
    pub fn into_vec(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }

    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.width;
        &self.storage()[start..start + self.width]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        let start = y * self.width;
        let width = self.width;
        &mut self.storage_mut()[start..start + width]
    }

    pub fn is_asleep(&self) -> bool {
        self.data.is_none()
    }

    /// Releases the backing storage. The geometry is kept.
    pub fn sleep(&mut self) {
        self.data = None;
    }

    /// Reallocates zero-filled storage if the buffer is asleep.
    pub fn awaken(&mut self) {
        if self.data.is_none() {
            self.data = Some(vec![T::zero(); self.size()]);
        }
    }

    // --- Checked access ---

    /// Sample at a linear index.
    pub fn get(&self, index: usize) -> Result<T> {
        let data = self.storage();
        data.get(index).copied().ok_or(WaveError::IndexOutOfRange {
            index,
            len: data.len(),
        })
    }

    /// Stores a sample at a linear index.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        let data = self.storage_mut();
        let len = data.len();
        match data.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(WaveError::IndexOutOfRange { index, len }),
        }
    }

    fn check_pixel(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(WaveError::PixelOutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(x + self.width * y)
    }

    /// Sample at `(x, y)`.
    pub fn get_pixel(&self, x: usize, y: usize) -> Result<T> {
        let index = self.check_pixel(x, y)?;
        Ok(self.storage()[index])
    }

    /// Stores a sample at `(x, y)`.
    pub fn set_pixel(&mut self, x: usize, y: usize, value: T) -> Result<()> {
        let index = self.check_pixel(x, y)?;
        self.storage_mut()[index] = value;
        Ok(())
    }

    // --- Hot-loop access ---

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> T {
        self.storage()[x + self.width * y]
    }

    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, value: T) {
        let index = x + self.width * y;
        self.storage_mut()[index] = value;
    }

    #[inline]
    pub fn inc_pixel(&mut self, x: usize, y: usize, value: T) {
        let index = x + self.width * y;
        let slot = &mut self.storage_mut()[index];
        *slot = *slot + value;
    }

    #[inline]
    pub fn dec_pixel(&mut self, x: usize, y: usize, value: T) {
        let index = x + self.width * y;
        let slot = &mut self.storage_mut()[index];
        *slot = *slot - value;
    }

    /// Circular (wrap-around) extension on both axes.
    #[inline]
    pub fn pixel_circular(&self, x: isize, y: isize) -> T {
        let x = x.rem_euclid(self.width as isize) as usize;
        let y = y.rem_euclid(self.height as isize) as usize;
        self.pixel(x, y)
    }

    /// Whole-sample symmetric extension on both axes.
    #[inline]
    pub fn pixel_symmetric(&self, x: isize, y: isize) -> T {
        self.pixel(mirror(x, self.width), mirror(y, self.height))
    }

    /// Out-of-range reads return zero.
    #[inline]
    pub fn pixel_zero_padded(&self, x: isize, y: isize) -> T {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return T::zero();
        }
        self.pixel(x as usize, y as usize)
    }

    /// Symmetric extension on the horizontal axis only; `y` must be in range.
    #[inline]
    pub fn pixel_horz_symmetric(&self, x: isize, y: usize) -> T {
        self.pixel(mirror(x, self.width), y)
    }

    /// Symmetric extension on the vertical axis only; `x` must be in range.
    #[inline]
    pub fn pixel_vert_symmetric(&self, x: usize, y: isize) -> T {
        self.pixel(x, mirror(y, self.height))
    }

    // --- Whole-buffer utilities ---

    pub fn fill(&mut self, value: T) {
        self.storage_mut().fill(value);
    }

    pub fn zero(&mut self) {
        self.fill(T::zero());
    }

    /// Adds `value` to every sample.
    pub fn offset(&mut self, value: T) {
        *self += value;
    }

    /// Multiplies every sample by `value`.
    pub fn scale(&mut self, value: T) {
        *self *= value;
    }

    pub fn abs(&mut self) {
        for v in self.storage_mut() {
            *v = v.magnitude();
        }
    }

    pub fn clip(&mut self, min: T, max: T) {
        for v in self.storage_mut() {
            if *v > max {
                *v = max;
            } else if *v < min {
                *v = min;
            }
        }
    }

    /// Maps samples `>= threshold` to `high` and the rest to `low`.
    pub fn threshold(&mut self, threshold: T, low: T, high: T) {
        for v in self.storage_mut() {
            *v = if *v >= threshold { high } else { low };
        }
    }

    /// Linearly rescales the content to span `[min, max]`. A constant buffer
    /// is set to `min`.
    pub fn normalize(&mut self, min: T, max: T) {
        let lo = self.min().to_real();
        let hi = self.max().to_real();
        let (out_lo, out_hi) = (min.to_real(), max.to_real());
        let span = hi - lo;
        for v in self.storage_mut() {
            *v = if span == 0.0 {
                min
            } else {
                T::from_real(out_lo + (v.to_real() - lo) * (out_hi - out_lo) / span)
            };
        }
    }

    /// Returns the transposed buffer.
    pub fn transpose(&self) -> Buffer<T> {
        let mut out = Buffer::new(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                out.put_pixel(y, x, self.pixel(x, y));
            }
        }
        out
    }

    /// Converts every sample to another sample type.
    ///
    /// Integer targets truncate toward zero and saturate.
    pub fn cast<U: Sample>(&self) -> Buffer<U> {
        Buffer {
            width: self.width,
            height: self.height,
            data: self
                .data
                .as_ref()
                .map(|data| data.iter().map(|v| U::from_real(v.to_real())).collect()),
            tag_x: self.tag_x,
            tag_y: self.tag_y,
            name: self.name.clone(),
        }
    }

    /// Copies the region `(x, y, w, h)` into a new buffer.
    pub fn crop(&self, x: usize, y: usize, w: usize, h: usize) -> Result<Buffer<T>> {
        if x + w > self.width || y + h > self.height {
            return Err(WaveError::InvalidArg(format!(
                "crop ({}, {}, {}x{}) exceeds {}x{} buffer",
                x, y, w, h, self.width, self.height
            )));
        }
        let mut chunk = Buffer::new(w, h);
        for row in 0..h {
            let start = (y + row) * self.width + x;
            chunk
                .row_mut(row)
                .copy_from_slice(&self.storage()[start..start + w]);
        }
        Ok(chunk)
    }

    /// Copies `src` (or the `(x, y, w, h)` region of it) so that its top-left
    /// corner lands on `(x_dst, y_dst)`.
    pub fn blit(
        &mut self,
        x_dst: usize,
        y_dst: usize,
        src: &Buffer<T>,
        region: Option<(usize, usize, usize, usize)>,
    ) -> Result<()> {
        let (x_src, y_src, w, h) = region.unwrap_or((0, 0, src.width, src.height));
        if x_src + w > src.width || y_src + h > src.height {
            return Err(WaveError::InvalidArg(format!(
                "source region ({}, {}, {}x{}) exceeds {}x{} buffer",
                x_src, y_src, w, h, src.width, src.height
            )));
        }
        if x_dst + w > self.width || y_dst + h > self.height {
            return Err(WaveError::InvalidArg(format!(
                "{}x{} block at ({}, {}) exceeds {}x{} target",
                w, h, x_dst, y_dst, self.width, self.height
            )));
        }
        for row in 0..h {
            let from = (y_src + row) * src.width + x_src;
            let to = (y_dst + row) * self.width + x_dst;
            self.storage_mut()[to..to + w].copy_from_slice(&src.storage()[from..from + w]);
        }
        Ok(())
    }

    /// Convolves with the kernel `h`, reading outside the buffer as zero.
    ///
    /// A single-row kernel is applied separably (rows, then columns); any
    /// other kernel shape is applied as a full 2-D filter. Even-length
    /// kernels are anchored at `len / 2`.
    pub fn convolve(&self, h: &Buffer<T>) -> Buffer<T> {
        let (cx, cy) = (self.width as isize, self.height as isize);
        if h.height == 1 {
            let taps = h.row(0);
            let offset = -(taps.len() as isize / 2);
            let mut rows = Buffer::new(self.width, self.height);
            for y in 0..cy {
                for x in 0..cx {
                    let mut acc = T::zero();
                    for (k, &tap) in taps.iter().enumerate() {
                        acc = acc + self.pixel_zero_padded(x + offset + k as isize, y) * tap;
                    }
                    rows.put_pixel(x as usize, y as usize, acc);
                }
            }
            let mut out = Buffer::new(self.width, self.height);
            for x in 0..cx {
                for y in 0..cy {
                    let mut acc = T::zero();
                    for (k, &tap) in taps.iter().enumerate() {
                        acc = acc + rows.pixel_zero_padded(x, y + offset + k as isize) * tap;
                    }
                    out.put_pixel(x as usize, y as usize, acc);
                }
            }
            out
        } else {
            let x_offset = -(h.width as isize / 2);
            let y_offset = -(h.height as isize / 2);
            let mut out = Buffer::new(self.width, self.height);
            for y in 0..cy {
                for x in 0..cx {
                    let mut acc = T::zero();
                    for yh in 0..h.height {
                        for xh in 0..h.width {
                            acc = acc
                                + h.pixel(xh, yh)
                                    * self.pixel_zero_padded(
                                        x + xh as isize + x_offset,
                                        y + yh as isize + y_offset,
                                    );
                        }
                    }
                    out.put_pixel(x as usize, y as usize, acc);
                }
            }
            out
        }
    }

    /// Changes the dimensions; identical dimensions are a no-op.
    ///
    /// A sleeping buffer may only be resized with [`ResizeMode::None`]; it
    /// stays asleep with the new geometry.
    pub fn resize(&mut self, width: usize, height: usize, mode: ResizeMode) {
        if width == self.width && height == self.height {
            return;
        }
        match mode {
            ResizeMode::None => {
                self.width = width;
                self.height = height;
                if self.data.is_some() {
                    self.data = Some(vec![T::zero(); width * height]);
                }
            }
            ResizeMode::Copy => {
                let mut resized = Buffer::new(width, height);
                let w = width.min(self.width);
                for y in 0..height.min(self.height) {
                    resized.row_mut(y)[..w].copy_from_slice(&self.row(y)[..w]);
                }
                self.replace_content(resized);
            }
            ResizeMode::Nearest | ResizeMode::Bilinear | ResizeMode::Bicubic => {
                let resampled = self.resample(width, height, mode);
                self.replace_content(resampled);
            }
        }
    }

    fn replace_content(&mut self, other: Buffer<T>) {
        self.width = other.width;
        self.height = other.height;
        self.data = other.data;
    }

    fn resample(&self, width: usize, height: usize, mode: ResizeMode) -> Buffer<T> {
        let mut out = Buffer::new(width, height);
        if self.is_empty() {
            return out;
        }
        let ratio_x = self.width as f64 / width as f64;
        let ratio_y = self.height as f64 / height as f64;
        let at = |x: isize, y: isize| self.pixel_symmetric(x, y).to_real();

        for y_dst in 0..height {
            let y_f = y_dst as f64 * ratio_y;
            let y_src = y_f as isize;
            let dy = y_f - y_src as f64;
            let row = out.row_mut(y_dst);
            for (x_dst, slot) in row.iter_mut().enumerate() {
                let x_f = x_dst as f64 * ratio_x;
                let x_src = x_f as isize;
                let dx = x_f - x_src as f64;
                let value = match mode {
                    ResizeMode::Nearest => at(x_src, y_src),
                    ResizeMode::Bilinear => {
                        let top = at(x_src, y_src) * (1.0 - dx) + at(x_src + 1, y_src) * dx;
                        let bottom =
                            at(x_src, y_src + 1) * (1.0 - dx) + at(x_src + 1, y_src + 1) * dx;
                        top * (1.0 - dy) + bottom * dy
                    }
                    _ => {
                        let wx = [
                            bspline_weight(1.0 + dx),
                            bspline_weight(dx),
                            bspline_weight(1.0 - dx),
                            bspline_weight(2.0 - dx),
                        ];
                        let wy = [
                            bspline_weight(1.0 + dy),
                            bspline_weight(dy),
                            bspline_weight(1.0 - dy),
                            bspline_weight(2.0 - dy),
                        ];
                        let mut acc = 0.0;
                        for (j, wyj) in wy.iter().enumerate() {
                            for (i, wxi) in wx.iter().enumerate() {
                                acc += at(x_src - 1 + i as isize, y_src - 1 + j as isize)
                                    * wxi
                                    * wyj;
                            }
                        }
                        acc
                    }
                };
                *slot = T::from_real(value);
            }
        }
        out
    }

    // --- Display model ---

    /// Maps pixel values to luminance: `(offset + scaling * v) ^ gamma`.
    pub fn to_luminance(&self, offset: f64, scaling: f64, gamma: f64) -> Buffer<T> {
        let mut out = self.clone();
        for v in out.storage_mut() {
            *v = T::from_real((offset + scaling * v.to_real()).powf(gamma));
        }
        out
    }

    /// Inverse of [`to_luminance`](Self::to_luminance); non-positive
    /// luminances map to 0.
    ///
    /// # Panics
    /// If `gamma` or `scaling` is zero.
    pub fn to_pixel_val(&self, offset: f64, scaling: f64, gamma: f64) -> Buffer<T> {
        assert!(gamma.abs() > f64::EPSILON, "gamma must be nonzero");
        assert!(scaling.abs() > f64::EPSILON, "scaling must be nonzero");
        let inv_gamma = 1.0 / gamma;
        let inv_scaling = 1.0 / scaling;
        let mut out = self.clone();
        for v in out.storage_mut() {
            let lum = v.to_real();
            *v = if lum <= 0.0 {
                T::zero()
            } else {
                T::from_real(inv_scaling * (lum.powf(inv_gamma) - offset))
            };
        }
        out
    }

    // --- Quantization ---

    /// Rounds every sample to the nearest multiple of `step`, halves away
    /// from zero.
    pub fn quantize(&mut self, step: f64) {
        if step.abs() < MIN_STEP_SIZE {
            return;
        }
        let half = 0.5 * step;
        for v in self.storage_mut() {
            let x = v.to_real();
            let biased = if x >= 0.0 { x + half } else { x - half };
            *v = T::from_real(step * (biased / step).trunc());
        }
    }

    /// Like [`quantize`](Self::quantize) but stores the bin index.
    pub fn quantize_int(&mut self, step: f64) {
        if step.abs() < MIN_STEP_SIZE {
            return;
        }
        let half = 0.5 * step;
        let inv_step = 1.0 / step;
        for v in self.storage_mut() {
            let x = v.to_real();
            let biased = if x >= 0.0 { x + half } else { x - half };
            *v = T::from_real((biased * inv_step).trunc());
        }
    }

    /// Maps bin indices written by [`quantize_int`](Self::quantize_int)
    /// back to bin representatives.
    pub fn dequantize_int(&mut self, step: f64) {
        if step.abs() < MIN_STEP_SIZE {
            return;
        }
        for v in self.storage_mut() {
            *v = T::from_real(v.to_real() * step);
        }
    }

    /// Dead-zone quantization: index 0 covers `(-step, step)`, nonzero
    /// indices reconstruct half a step away from zero.
    pub fn quantize_dz(&mut self, step: f64) {
        if step.abs() < MIN_STEP_SIZE {
            return;
        }
        for v in self.storage_mut() {
            let q = (v.to_real() / step).trunc();
            *v = T::from_real(dead_zone_value(q, step));
        }
    }

    /// Dead-zone quantization storing the bin index.
    pub fn quantize_dz_int(&mut self, step: f64) {
        if step.abs() < MIN_STEP_SIZE {
            return;
        }
        for v in self.storage_mut() {
            *v = T::from_real((v.to_real() / step).trunc());
        }
    }

    /// Maps dead-zone indices back to bin representatives.
    pub fn dequantize_dz_int(&mut self, step: f64) {
        if step.abs() < MIN_STEP_SIZE {
            return;
        }
        for v in self.storage_mut() {
            let q = v.to_real().trunc();
            *v = T::from_real(dead_zone_value(q, step));
        }
    }
}

#[inline]
fn dead_zone_value(q: f64, step: f64) -> f64 {
    if q > 0.0 {
        step * (q + 0.5)
    } else if q < 0.0 {
        step * (q - 0.5)
    } else {
        0.0
    }
}

// --- Arithmetic assignment ---

impl<T: Sample> AddAssign<T> for Buffer<T> {
    fn add_assign(&mut self, rhs: T) {
        for v in self.storage_mut() {
            *v = *v + rhs;
        }
    }
}

impl<T: Sample> SubAssign<T> for Buffer<T> {
    fn sub_assign(&mut self, rhs: T) {
        for v in self.storage_mut() {
            *v = *v - rhs;
        }
    }
}

impl<T: Sample> MulAssign<T> for Buffer<T> {
    fn mul_assign(&mut self, rhs: T) {
        for v in self.storage_mut() {
            *v = *v * rhs;
        }
    }
}

impl<T: Sample> DivAssign<T> for Buffer<T> {
    fn div_assign(&mut self, rhs: T) {
        for v in self.storage_mut() {
            *v = *v / rhs;
        }
    }
}

macro_rules! impl_elementwise {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<T: Sample> $trait<&Buffer<T>> for Buffer<T> {
            /// # Panics
            /// If the operands differ in geometry.
            fn $method(&mut self, rhs: &Buffer<T>) {
                assert_eq!(
                    self.dimensions(),
                    rhs.dimensions(),
                    "element-wise operands must share dimensions"
                );
                for (a, &b) in self.storage_mut().iter_mut().zip(rhs.storage()) {
                    *a = *a $op b;
                }
            }
        }
    };
}

impl_elementwise!(AddAssign, add_assign, +);
impl_elementwise!(SubAssign, sub_assign, -);
impl_elementwise!(MulAssign, mul_assign, *);
impl_elementwise!(DivAssign, div_assign, /);
