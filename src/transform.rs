// src/transform.rs

//! Wavelet-independent multi-scale decomposition and reconstruction.
//!
//! [`TransformEngine`] walks the scales of a [`SubbandStore`] and delegates
//! the one-dimensional filtering to a [`Kernel`]. Forward scales filter rows
//! first, then columns; inverse scales undo columns first, then rows.
//! Buffers that are no longer needed are put to sleep during decomposition
//! and woken again on reconstruction.

use crate::bands::{slot, Band, Orientation, SubbandStore};
use crate::buffer::{Buffer, Sample};
use crate::utils::error::{Result, WaveError};
use crate::utils::log::{debug, trace};

/// A separable two-band filter bank.
///
/// Forward transforms split `src` into `low` and `high` at half resolution
/// along the filtered axis. Inverse transforms merge `low` and `high` back
/// into `dst`; they may use both inputs as scratch space, so their content
/// is unspecified afterwards.
pub trait Kernel<T: Sample> {
    /// Filters along each row: `low` and `high` have half the width of `src`.
    fn transform_rows(
        &self,
        src: &Buffer<T>,
        low: &mut Buffer<T>,
        high: &mut Buffer<T>,
    ) -> Result<()>;

    /// Filters along each column: `low` and `high` have half the height of
    /// `src`.
    fn transform_cols(
        &self,
        src: &Buffer<T>,
        low: &mut Buffer<T>,
        high: &mut Buffer<T>,
    ) -> Result<()>;

    fn untransform_rows(
        &self,
        dst: &mut Buffer<T>,
        low: &mut Buffer<T>,
        high: &mut Buffer<T>,
    ) -> Result<()>;

    fn untransform_cols(
        &self,
        dst: &mut Buffer<T>,
        low: &mut Buffer<T>,
        high: &mut Buffer<T>,
    ) -> Result<()>;
}

/// Drives a [`Kernel`] over a subband pyramid.
#[derive(Debug, Clone, Default)]
pub struct TransformEngine<K> {
    kernel: K,
}

impl<K> TransformEngine<K> {
    pub fn new(kernel: K) -> Self {
        TransformEngine { kernel }
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Decomposes the image in slot 0 into `num_scales` scales.
    ///
    /// The image is padded first (see [`SubbandStore::add_padding`]) and
    /// stays padded until the store is reconstructed. Bands are allocated or
    /// recycled as needed. A scale count whose padded image cannot be
    /// addressed is rejected before anything is modified.
    pub fn decompose<T: Sample>(
        &self,
        store: &mut SubbandStore<T>,
        num_scales: usize,
    ) -> Result<()>
    where
        K: Kernel<T>,
    {
        store.add_padding(num_scales)?;
        store.alloc_bands(num_scales);
        debug!(
            "decomposing {}x{} image into {} scales",
            store.image().width(),
            store.image().height(),
            num_scales
        );
        for scale in 1..=num_scales {
            if store.is_one_dimensional() {
                self.decompose_scale_1d(store, scale)?;
            } else {
                self.decompose_scale_2d(store, scale)?;
            }
        }
        Ok(())
    }

    fn decompose_scale_2d<T: Sample>(
        &self,
        store: &mut SubbandStore<T>,
        scale: usize,
    ) -> Result<()>
    where
        K: Kernel<T>,
    {
        trace!("forward scale {}", scale);
        let src = slot(scale - 1, Band::Ll);
        let l = slot(scale, Band::L);
        let h = slot(scale, Band::H);

        let (src_buf, l_buf, h_buf) = store.slots3_mut(src, l, h)?;
        l_buf.awaken();
        h_buf.awaken();
        self.kernel.transform_rows(src_buf, l_buf, h_buf)?;
        if scale > 1 {
            src_buf.sleep();
        }

        for (from, low, high) in [
            (h, slot(scale, Band::Hl), slot(scale, Band::Hh)),
            (l, slot(scale, Band::Ll), slot(scale, Band::Lh)),
        ] {
            let (from_buf, low_buf, high_buf) = store.slots3_mut(from, low, high)?;
            low_buf.awaken();
            high_buf.awaken();
            self.kernel.transform_cols(from_buf, low_buf, high_buf)?;
            from_buf.sleep();
        }
        Ok(())
    }

    fn decompose_scale_1d<T: Sample>(
        &self,
        store: &mut SubbandStore<T>,
        scale: usize,
    ) -> Result<()>
    where
        K: Kernel<T>,
    {
        trace!("forward scale {} (1-D)", scale);
        let src = if scale == 1 { 0 } else { slot(scale - 1, Band::L) };
        let (src_buf, l_buf, h_buf) =
            store.slots3_mut(src, slot(scale, Band::L), slot(scale, Band::H))?;
        l_buf.awaken();
        h_buf.awaken();
        self.kernel.transform_rows(src_buf, l_buf, h_buf)?;
        if scale > 1 {
            src_buf.sleep();
        }
        Ok(())
    }

    /// Reconstructs the image in slot 0 from the coarsest LL and the
    /// detail bands, then removes the padding.
    ///
    /// The kernel consumes the bands as scratch space: a decomposition can be
    /// reconstructed once.
    pub fn reconstruct<T: Sample>(&self, store: &mut SubbandStore<T>) -> Result<()>
    where
        K: Kernel<T>,
    {
        let num_scales = store.num_scales();
        debug!("reconstructing {} scales", num_scales);
        for scale in (1..=num_scales).rev() {
            if store.is_one_dimensional() {
                self.reconstruct_scale_1d(store, scale)?;
            } else {
                self.reconstruct_scale_2d(store, scale)?;
            }
        }
        store.remove_padding();
        Ok(())
    }

    fn reconstruct_scale_2d<T: Sample>(
        &self,
        store: &mut SubbandStore<T>,
        scale: usize,
    ) -> Result<()>
    where
        K: Kernel<T>,
    {
        trace!("inverse scale {}", scale);
        let l = slot(scale, Band::L);
        let h = slot(scale, Band::H);
        for (to, low, high) in [
            (h, slot(scale, Band::Hl), slot(scale, Band::Hh)),
            (l, slot(scale, Band::Ll), slot(scale, Band::Lh)),
        ] {
            let (to_buf, low_buf, high_buf) = store.slots3_mut(to, low, high)?;
            to_buf.awaken();
            self.kernel.untransform_cols(to_buf, low_buf, high_buf)?;
        }
        self.untransform_rows_into(store, slot(scale - 1, Band::Ll), scale)
    }

    fn reconstruct_scale_1d<T: Sample>(
        &self,
        store: &mut SubbandStore<T>,
        scale: usize,
    ) -> Result<()>
    where
        K: Kernel<T>,
    {
        trace!("inverse scale {} (1-D)", scale);
        let dst = if scale == 1 { 0 } else { slot(scale - 1, Band::L) };
        store.slot_mut(slot(scale, Band::L)).awaken();
        store.slot_mut(slot(scale, Band::H)).awaken();
        self.untransform_rows_into(store, dst, scale)
    }

    /// Merges `L(scale)` and `H(scale)` into slot `dst`.
    fn untransform_rows_into<T: Sample>(
        &self,
        store: &mut SubbandStore<T>,
        dst: usize,
        scale: usize,
    ) -> Result<()>
    where
        K: Kernel<T>,
    {
        let (dst_buf, l_buf, h_buf) =
            store.slots3_mut(dst, slot(scale, Band::L), slot(scale, Band::H))?;
        dst_buf.awaken();
        self.kernel.untransform_rows(dst_buf, l_buf, h_buf)
    }

    /// Reconstructs the spatial contribution of the single detail band
    /// `(scale, orientation)`; every other band, the coarsest LL included,
    /// is treated as zero.
    ///
    /// The result in slot 0 equals zeroing all other bands and calling
    /// [`reconstruct`](Self::reconstruct), without the wasted work: scales
    /// coarser than `scale` just zero their output, and only the branch
    /// holding the band is filtered at `scale`. Bands other than the
    /// selected one and the LL chain below it are left untouched.
    pub fn reconstruct_one<T: Sample>(
        &self,
        store: &mut SubbandStore<T>,
        scale: usize,
        orientation: Orientation,
    ) -> Result<()>
    where
        K: Kernel<T>,
    {
        let num_scales = store.num_scales();
        if scale == 0 || scale > num_scales {
            return Err(WaveError::InvalidScale { scale, num_scales });
        }
        if store.is_one_dimensional() {
            return Err(WaveError::InvalidOperation(
                "single-subband reconstruction needs a 2-D pyramid".to_string(),
            ));
        }
        debug!(
            "reconstructing {} at scale {} of {}",
            orientation, scale, num_scales
        );

        for current in (1..=num_scales).rev() {
            if current > scale {
                let ll_prev = store.slot_mut(slot(current - 1, Band::Ll));
                ll_prev.awaken();
                ll_prev.zero();
                continue;
            }

            let l = slot(current, Band::L);
            let h = slot(current, Band::H);
            store.slot_mut(l).awaken();
            store.slot_mut(h).awaken();

            // (band that carries the signal, zero sibling, branch output)
            let (to, idle, low, high) = if current < scale {
                (l, h, Some(slot(current, Band::Ll)), None)
            } else {
                match orientation {
                    Orientation::Hl => (h, l, Some(slot(current, Band::Hl)), None),
                    Orientation::Hh => (h, l, None, Some(slot(current, Band::Hh))),
                    Orientation::Lh => (l, h, None, Some(slot(current, Band::Lh))),
                }
            };
            store.slot_mut(idle).zero();
            self.untransform_cols_sparse(store, to, current, low, high)?;
            self.untransform_rows_into(store, slot(current - 1, Band::Ll), current)?;
        }
        store.remove_padding();
        Ok(())
    }

    /// Inverse column transform into slot `to`, substituting a zero buffer
    /// for whichever of `low`/`high` is `None`. Zero buffers take the
    /// geometry of the half-height band of `scale`.
    fn untransform_cols_sparse<T: Sample>(
        &self,
        store: &mut SubbandStore<T>,
        to: usize,
        scale: usize,
        low: Option<usize>,
        high: Option<usize>,
    ) -> Result<()>
    where
        K: Kernel<T>,
    {
        let (w, h) = store.buffers()[slot(scale, Band::Ll)].dimensions();
        match (low, high) {
            (Some(low), None) => {
                let mut zeros = Buffer::new(w, h);
                let (to_buf, low_buf) = store.slots2_mut(to, low)?;
                self.kernel.untransform_cols(to_buf, low_buf, &mut zeros)
            }
            (None, Some(high)) => {
                let mut zeros = Buffer::new(w, h);
                let (to_buf, high_buf) = store.slots2_mut(to, high)?;
                self.kernel.untransform_cols(to_buf, &mut zeros, high_buf)
            }
            _ => Err(WaveError::InvalidOperation(
                "exactly one column band carries the signal".to_string(),
            )),
        }
    }
}
