// src/bands.rs

//! Subband storage for a wavelet pyramid.
//!
//! A [`SubbandStore`] for `L` scales owns `1 + 6L` buffers. Slot 0 is the
//! source image (LL at scale 0). Scale `s` occupies slots `6s-5 ..= 6s`:
//!
//! | slot   | band | content                                   |
//! |--------|------|-------------------------------------------|
//! | `6s-5` | L    | row lowpass of `LL(s-1)` (intermediate)   |
//! | `6s-4` | H    | row highpass of `LL(s-1)` (intermediate)  |
//! | `6s-3` | HH   | column highpass of H                      |
//! | `6s-2` | HL   | column lowpass of H                       |
//! | `6s-1` | LH   | column highpass of L                      |
//! | `6s`   | LL   | column lowpass of L, input of scale `s+1` |
//!
//! One-dimensional signals (height 1) only use L and H; the four 2-D bands
//! of each scale are 0×0 placeholders.

use crate::buffer::{Buffer, ResizeMode, Sample};
use crate::steps::StepSizeTable;
use crate::utils::error::{Result, WaveError};
use crate::utils::log::{debug, trace};
use std::fmt;

/// The six buffers of one scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    L,
    H,
    Hh,
    Hl,
    Lh,
    Ll,
}

impl Band {
    fn offset(self) -> usize {
        match self {
            Band::Ll => 0,
            Band::Lh => 1,
            Band::Hl => 2,
            Band::Hh => 3,
            Band::H => 4,
            Band::L => 5,
        }
    }
}

/// Slot of `band` at `scale`. Only [`Band::Ll`] exists at scale 0.
///
/// # Panics
/// If `scale` is 0 and `band` is not `Ll`.
#[inline]
pub fn slot(scale: usize, band: Band) -> usize {
    assert!(
        scale > 0 || band == Band::Ll,
        "{:?} has no slot at scale 0",
        band
    );
    6 * scale - band.offset()
}

/// Orientation of a detail subband.
///
/// The numeric codes (`LH = 0`, `HL = 1`, `HH = 2`) are the ones host code
/// uses to name a subband; anything else is rejected by `TryFrom<u8>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Lh = 0,
    Hl = 1,
    Hh = 2,
}

impl Orientation {
    /// All orientations in code order.
    pub const ALL: [Orientation; 3] = [Orientation::Lh, Orientation::Hl, Orientation::Hh];

    pub fn band(self) -> Band {
        match self {
            Orientation::Lh => Band::Lh,
            Orientation::Hl => Band::Hl,
            Orientation::Hh => Band::Hh,
        }
    }
}

impl TryFrom<u8> for Orientation {
    type Error = WaveError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Orientation::Lh),
            1 => Ok(Orientation::Hl),
            2 => Ok(Orientation::Hh),
            _ => Err(WaveError::InvalidSubband(format!(
                "orientation code {} (expected 0 = LH, 1 = HL or 2 = HH)",
                code
            ))),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Orientation::Lh => "LH",
            Orientation::Hl => "HL",
            Orientation::Hh => "HH",
        };
        f.write_str(name)
    }
}

/// Borrows three distinct elements mutably.
fn pick3<B>(items: &mut [B], a: usize, b: usize, c: usize) -> Option<(&mut B, &mut B, &mut B)> {
    if a == b || b == c || a == c {
        return None;
    }
    let (mut ra, mut rb, mut rc) = (None, None, None);
    for (index, item) in items.iter_mut().enumerate() {
        if index == a {
            ra = Some(item);
        } else if index == b {
            rb = Some(item);
        } else if index == c {
            rc = Some(item);
        }
    }
    Some((ra?, rb?, rc?))
}

/// An ordered collection of buffers addressed by `(scale, band)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubbandStore<T> {
    bands: Vec<Buffer<T>>,
    pad_x: usize,
    pad_y: usize,
}

impl<T: Sample> Default for SubbandStore<T> {
    fn default() -> Self {
        Self::new(Buffer::default())
    }
}

impl<T: Sample> SubbandStore<T> {
    /// Creates a store holding only the source image.
    pub fn new(image: Buffer<T>) -> Self {
        SubbandStore {
            bands: vec![image],
            pad_x: 0,
            pad_y: 0,
        }
    }

    /// Creates a store with a zero-filled `width × height` image.
    pub fn with_dimensions(width: usize, height: usize) -> Self {
        Self::new(Buffer::new(width, height))
    }

    /// Number of slots, `1 + 6L`.
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Always false: slot 0 exists for the lifetime of the store.
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn num_scales(&self) -> usize {
        (self.bands.len() - 1) / 6
    }

    /// Number of bands a step table must cover, `1 + 3L`.
    pub fn num_bands(&self) -> usize {
        1 + 3 * self.num_scales()
    }

    pub fn pad_x(&self) -> usize {
        self.pad_x
    }

    pub fn pad_y(&self) -> usize {
        self.pad_y
    }

    /// True when the source is a single row.
    pub fn is_one_dimensional(&self) -> bool {
        self.bands[0].height() == 1
    }

    pub fn image(&self) -> &Buffer<T> {
        &self.bands[0]
    }

    pub fn image_mut(&mut self) -> &mut Buffer<T> {
        &mut self.bands[0]
    }

    /// Replaces the source image. Allocated bands are kept and recycled by
    /// the next decomposition if the geometry still matches.
    pub fn set_image(&mut self, image: Buffer<T>) {
        self.bands[0] = image;
    }

    /// Consumes the store and returns slot 0.
    pub fn into_image(mut self) -> Buffer<T> {
        self.bands.swap_remove(0)
    }

    /// All slots in addressing order.
    pub fn buffers(&self) -> &[Buffer<T>] {
        &self.bands
    }

    fn check_scale(&self, scale: usize) -> Result<()> {
        let num_scales = self.num_scales();
        if scale == 0 || scale > num_scales {
            return Err(WaveError::InvalidScale { scale, num_scales });
        }
        Ok(())
    }

    fn slot_of(&self, scale: usize, band: Band) -> Result<usize> {
        if band == Band::Ll && scale == 0 {
            return Ok(0);
        }
        self.check_scale(scale)?;
        Ok(slot(scale, band))
    }

    /// Buffer of `band` at `scale`.
    pub fn get(&self, scale: usize, band: Band) -> Result<&Buffer<T>> {
        let index = self.slot_of(scale, band)?;
        Ok(&self.bands[index])
    }

    pub fn get_mut(&mut self, scale: usize, band: Band) -> Result<&mut Buffer<T>> {
        let index = self.slot_of(scale, band)?;
        Ok(&mut self.bands[index])
    }

    pub fn ll(&self, scale: usize) -> Result<&Buffer<T>> {
        self.get(scale, Band::Ll)
    }

    pub fn l(&self, scale: usize) -> Result<&Buffer<T>> {
        self.get(scale, Band::L)
    }

    pub fn h(&self, scale: usize) -> Result<&Buffer<T>> {
        self.get(scale, Band::H)
    }

    pub fn lh(&self, scale: usize) -> Result<&Buffer<T>> {
        self.get(scale, Band::Lh)
    }

    pub fn hl(&self, scale: usize) -> Result<&Buffer<T>> {
        self.get(scale, Band::Hl)
    }

    pub fn hh(&self, scale: usize) -> Result<&Buffer<T>> {
        self.get(scale, Band::Hh)
    }

    pub fn ll_mut(&mut self, scale: usize) -> Result<&mut Buffer<T>> {
        self.get_mut(scale, Band::Ll)
    }

    pub fn lh_mut(&mut self, scale: usize) -> Result<&mut Buffer<T>> {
        self.get_mut(scale, Band::Lh)
    }

    pub fn hl_mut(&mut self, scale: usize) -> Result<&mut Buffer<T>> {
        self.get_mut(scale, Band::Hl)
    }

    pub fn hh_mut(&mut self, scale: usize) -> Result<&mut Buffer<T>> {
        self.get_mut(scale, Band::Hh)
    }

    /// Detail subband at `(scale, orientation)`.
    pub fn band(&self, scale: usize, orientation: Orientation) -> Result<&Buffer<T>> {
        self.get(scale, orientation.band())
    }

    pub fn band_mut(&mut self, scale: usize, orientation: Orientation) -> Result<&mut Buffer<T>> {
        self.get_mut(scale, orientation.band())
    }

    /// Detail subband addressed by a raw orientation code.
    pub fn band_by_code(&self, scale: usize, code: u8) -> Result<&Buffer<T>> {
        self.band(scale, Orientation::try_from(code)?)
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut Buffer<T> {
        &mut self.bands[index]
    }

    /// Two distinct slots borrowed mutably at once.
    pub(crate) fn slots2_mut(
        &mut self,
        a: usize,
        b: usize,
    ) -> Result<(&mut Buffer<T>, &mut Buffer<T>)> {
        let len = self.bands.len();
        if a == b || a.max(b) >= len {
            return Err(WaveError::InvalidSubband(format!(
                "slots ({}, {}) are not two distinct slots of {}",
                a, b, len
            )));
        }
        if a < b {
            let (head, tail) = self.bands.split_at_mut(b);
            Ok((&mut head[a], &mut tail[0]))
        } else {
            let (head, tail) = self.bands.split_at_mut(a);
            Ok((&mut tail[0], &mut head[b]))
        }
    }

    /// Three distinct slots borrowed mutably at once.
    pub(crate) fn slots3_mut(
        &mut self,
        a: usize,
        b: usize,
        c: usize,
    ) -> Result<(&mut Buffer<T>, &mut Buffer<T>, &mut Buffer<T>)> {
        let len = self.bands.len();
        pick3(&mut self.bands, a, b, c).ok_or_else(|| {
            WaveError::InvalidSubband(format!(
                "slots ({}, {}, {}) are not three distinct slots of {}",
                a, b, c, len
            ))
        })
    }

    // --- Padding ---

    /// Pads the image so that every scale of an `num_scales` decomposition
    /// halves an even length. The width is always padded; the height only
    /// when the image has more than one row. New samples are zero.
    ///
    /// Fails without touching the image when the padded geometry cannot be
    /// represented.
    pub fn add_padding(&mut self, num_scales: usize) -> Result<()> {
        let too_deep = || {
            WaveError::InvalidArg(format!(
                "{} scales exceed the addressable padded image size",
                num_scales
            ))
        };
        let step = u32::try_from(num_scales)
            .ok()
            .and_then(|shift| 1usize.checked_shl(shift))
            .ok_or_else(too_deep)?;
        let (cx, cy) = self.bands[0].dimensions();
        let pad_x = (step - cx % step) % step;
        let pad_y = if cy == 1 { 0 } else { (step - cy % step) % step };
        let width = cx.checked_add(pad_x).ok_or_else(too_deep)?;
        let height = cy.checked_add(pad_y).ok_or_else(too_deep)?;
        width
            .checked_mul(height)
            .and_then(|count| count.checked_mul(std::mem::size_of::<T>()))
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or_else(too_deep)?;

        self.pad_x = pad_x;
        self.pad_y = pad_y;
        if pad_x != 0 || pad_y != 0 {
            debug!("padding {}x{} image by ({}, {})", cx, cy, pad_x, pad_y);
            self.bands[0].resize(width, height, ResizeMode::Copy);
        }
        Ok(())
    }

    /// Crops the padding added by [`add_padding`](Self::add_padding).
    pub fn remove_padding(&mut self) {
        let (cx, cy) = self.bands[0].dimensions();
        let width = cx.saturating_sub(self.pad_x);
        let height = cy.saturating_sub(self.pad_y);
        self.bands[0].resize(width, height, ResizeMode::Copy);
    }

    // --- Allocation ---

    /// Walks the band geometry for `num_scales` scales of the current image,
    /// calling `visit(scale, (l_w, l_h), quad)` with the size of L and H and
    /// the size of the four 2-D bands (`None` for 1-D placeholders).
    fn band_geometry<F>(&self, num_scales: usize, mut visit: F) -> bool
    where
        F: FnMut(usize, (usize, usize), Option<(usize, usize)>) -> bool,
    {
        let (cx, mut cy) = self.bands[0].dimensions();
        let mut half_cx = cx >> 1;
        let mut half_cy = cy >> 1;
        for scale in 1..=num_scales {
            let quad = if cy > 1 { Some((half_cx, half_cy)) } else { None };
            if !visit(scale, (half_cx, cy), quad) {
                return false;
            }
            if cy > 1 {
                cy >>= 1;
                half_cy >>= 1;
            }
            half_cx >>= 1;
        }
        true
    }

    /// True when the allocated bands already fit a `num_scales`
    /// decomposition of the current image.
    pub fn can_recycle_bands(&self, num_scales: usize) -> bool {
        if num_scales != self.num_scales() {
            return false;
        }
        self.band_geometry(num_scales, |scale, row_dims, quad| {
            let dims = |band| self.bands[slot(scale, band)].dimensions();
            if dims(Band::L) != row_dims || dims(Band::H) != row_dims {
                return false;
            }
            match quad {
                Some(quad) => [Band::Hh, Band::Hl, Band::Lh, Band::Ll]
                    .into_iter()
                    .all(|band| dims(band) == quad),
                None => true,
            }
        })
    }

    /// Allocates zero-filled bands for `num_scales` scales, unless the
    /// existing bands can be recycled.
    pub fn alloc_bands(&mut self, num_scales: usize) {
        if self.can_recycle_bands(num_scales) {
            trace!("recycling {} scales of subbands", num_scales);
            return;
        }

        self.bands.truncate(1);
        let mut fresh = Vec::with_capacity(6 * num_scales);
        self.band_geometry(num_scales, |_, (w, h), quad| {
            fresh.push(Buffer::new(w, h));
            fresh.push(Buffer::new(w, h));
            let (qw, qh) = quad.unwrap_or((0, 0));
            for _ in 0..4 {
                fresh.push(Buffer::new(qw, qh));
            }
            true
        });
        self.bands.extend(fresh);

        for scale in 1..=num_scales {
            for (band, name) in [
                (Band::L, "L"),
                (Band::H, "H"),
                (Band::Hh, "HH"),
                (Band::Hl, "HL"),
                (Band::Lh, "LH"),
                (Band::Ll, "LL"),
            ] {
                self.bands[slot(scale, band)].set_name(format!("{}{}", name, scale));
            }
        }
        debug!(
            "allocated {} subbands for {} scales of a {}x{} image",
            self.bands.len() - 1,
            num_scales,
            self.bands[0].width(),
            self.bands[0].height()
        );
    }

    /// Copies the bands needed for reconstruction (every detail band and
    /// the coarsest LL) from `other`. Falls back to a full copy when the
    /// stores differ in slot count.
    pub fn assign(&mut self, other: &SubbandStore<T>) {
        if self.bands.len() != other.bands.len() {
            self.clone_from(other);
            return;
        }
        let num_scales = self.num_scales();
        let top = slot(num_scales, Band::Ll);
        self.bands[top] = other.bands[top].clone();
        for scale in 1..=num_scales {
            for orientation in Orientation::ALL {
                let index = slot(scale, orientation.band());
                self.bands[index] = other.bands[index].clone();
            }
        }
    }

    // --- Quantization ---

    /// Applies `op` with the matching step to the coarsest LL and every
    /// detail band.
    fn quantize_with<F>(&mut self, steps: &StepSizeTable, op: F) -> Result<()>
    where
        F: Fn(&mut Buffer<T>, f64),
    {
        let num_scales = self.num_scales();
        if steps.num_scales() != num_scales {
            return Err(WaveError::InvalidArg(format!(
                "step table covers {} scales, pyramid has {}",
                steps.num_scales(),
                num_scales
            )));
        }
        op(&mut self.bands[slot(num_scales, Band::Ll)], steps.ll());
        for scale in 1..=num_scales {
            for orientation in Orientation::ALL {
                let step = steps.get(scale, orientation)?;
                op(&mut self.bands[slot(scale, orientation.band())], step);
            }
        }
        Ok(())
    }

    pub fn quantize(&mut self, steps: &StepSizeTable) -> Result<()> {
        self.quantize_with(steps, Buffer::quantize)
    }

    pub fn quantize_int(&mut self, steps: &StepSizeTable) -> Result<()> {
        self.quantize_with(steps, Buffer::quantize_int)
    }

    pub fn dequantize_int(&mut self, steps: &StepSizeTable) -> Result<()> {
        self.quantize_with(steps, Buffer::dequantize_int)
    }

    pub fn quantize_dz(&mut self, steps: &StepSizeTable) -> Result<()> {
        self.quantize_with(steps, Buffer::quantize_dz)
    }

    pub fn quantize_dz_int(&mut self, steps: &StepSizeTable) -> Result<()> {
        self.quantize_with(steps, Buffer::quantize_dz_int)
    }

    pub fn dequantize_dz_int(&mut self, steps: &StepSizeTable) -> Result<()> {
        self.quantize_with(steps, Buffer::dequantize_dz_int)
    }
}
