use std::mem;
use std::ptr::NonNull;
use std::slice;

use bytemuck::allocation::try_zeroed_slice_box;

use super::error::{LayerError, Result};
use crate::types::Pixel;

/// Both frames of a layer, back to back in one allocation.
///
/// Frames are handed out as raw slices because the draw frame and the
/// refresh frame are touched from different contexts at the same time. The
/// swap controller decides which index each context may use; the accessors
/// here are `unsafe` and trust that decision.
pub struct FramePair<P: Pixel> {
    storage: NonNull<[P]>,
    frame_len: usize,
}

// SAFETY: the pair owns its storage; cross-context access is arbitrated by
// the swap controller so each frame has one writer at most.
unsafe impl<P: Pixel> Send for FramePair<P> {}
unsafe impl<P: Pixel> Sync for FramePair<P> {}

impl<P: Pixel> FramePair<P> {
    /// Allocate two zeroed frames of `frame_len` pixels each
    pub fn allocate(frame_len: usize) -> Result<Self> {
        let total = frame_len
            .checked_mul(2)
            .ok_or(LayerError::Allocation { bytes: usize::MAX })?;
        let bytes = total.saturating_mul(mem::size_of::<P>());
        let storage =
            try_zeroed_slice_box::<P>(total).map_err(|_| LayerError::Allocation { bytes })?;
        Ok(Self::from_box(storage, frame_len))
    }

    /// Take ownership of caller-supplied storage holding both frames
    pub fn from_storage(storage: Box<[P]>, frame_len: usize) -> Result<Self> {
        let expected = frame_len * 2;
        if storage.len() != expected {
            return Err(LayerError::StorageSize {
                expected,
                actual: storage.len(),
            });
        }
        Ok(Self::from_box(storage, frame_len))
    }

    fn from_box(storage: Box<[P]>, frame_len: usize) -> Self {
        Self {
            storage: NonNull::from(Box::leak(storage)),
            frame_len,
        }
    }

    /// Pixels per frame
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Bytes per frame
    pub fn frame_bytes(&self) -> usize {
        self.frame_len * mem::size_of::<P>()
    }

    fn frame_ptr(&self, index: usize) -> *mut P {
        assert!(index < 2, "frame index {index} out of range");
        // SAFETY: index < 2 keeps the offset inside the 2 * frame_len allocation
        unsafe { (self.storage.as_ptr() as *mut P).add(index * self.frame_len) }
    }

    /// # Safety
    /// No mutable slice of the same frame may be alive for the returned lifetime.
    pub unsafe fn frame(&self, index: usize) -> &[P] {
        slice::from_raw_parts(self.frame_ptr(index), self.frame_len)
    }

    /// # Safety
    /// The caller must have exclusive access to this frame for the returned lifetime.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn frame_mut(&self, index: usize) -> &mut [P] {
        slice::from_raw_parts_mut(self.frame_ptr(index), self.frame_len)
    }

    /// Copy frame `from` over frame `to`.
    ///
    /// # Safety
    /// Nobody may write `from` or touch `to` during the copy.
    pub unsafe fn copy_frame(&self, from: usize, to: usize) {
        if from == to {
            return;
        }
        let src = self.frame(from);
        let dst = self.frame_mut(to);
        dst.copy_from_slice(src);
    }
}

impl<P: Pixel> Drop for FramePair<P> {
    fn drop(&mut self) {
        // SAFETY: storage came from Box::leak in from_box and is dropped once
        unsafe { drop(Box::from_raw(self.storage.as_ptr())) }
    }
}
