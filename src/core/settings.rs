use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};

use crate::types::{BrightnessShift, Pixel};

/// Configuration cells shared between the writer and the refresher.
///
/// Values are independent of each other and of the frames, so relaxed
/// ordering is enough except for the chroma key, whose color must be visible
/// before the enable flag is.
#[derive(Debug)]
pub(crate) struct LayerSettings {
    brightness: AtomicU8,
    color_correction: AtomicBool,
    pending_shifts: AtomicU8,
    chroma_enabled: AtomicBool,
    chroma_color: AtomicU64,
    // First line in the low half, last line in the high half
    overlay_lines: AtomicU32,
}

const ALL_LINES: (u16, u16) = (0, u16::MAX);

#[inline]
fn pack_lines(first: u16, last: u16) -> u32 {
    first as u32 | (last as u32) << 16
}

impl LayerSettings {
    pub fn new() -> Self {
        Self {
            brightness: AtomicU8::new(u8::MAX),
            color_correction: AtomicBool::new(true),
            pending_shifts: AtomicU8::new(0),
            chroma_enabled: AtomicBool::new(false),
            chroma_color: AtomicU64::new(0),
            overlay_lines: AtomicU32::new(pack_lines(ALL_LINES.0, ALL_LINES.1)),
        }
    }

    #[inline]
    pub fn brightness(&self) -> u8 {
        self.brightness.load(Ordering::Relaxed)
    }

    pub fn set_brightness(&self, brightness: u8) {
        self.brightness.store(brightness, Ordering::Relaxed);
    }

    #[inline]
    pub fn color_correction(&self) -> bool {
        self.color_correction.load(Ordering::Relaxed)
    }

    pub fn set_color_correction(&self, enabled: bool) {
        self.color_correction.store(enabled, Ordering::Relaxed);
    }

    pub fn pending_shifts(&self) -> BrightnessShift {
        BrightnessShift::new(self.pending_shifts.load(Ordering::Relaxed)).unwrap_or_default()
    }

    pub fn set_pending_shifts(&self, shifts: BrightnessShift) {
        self.pending_shifts.store(shifts.into(), Ordering::Relaxed);
    }

    #[inline]
    pub fn chroma_key<P: Pixel>(&self) -> Option<P> {
        if self.chroma_enabled.load(Ordering::Acquire) {
            Some(P::from_bits(self.chroma_color.load(Ordering::Relaxed)))
        } else {
            None
        }
    }

    pub fn set_chroma_key<P: Pixel>(&self, color: Option<P>) {
        match color {
            Some(color) => {
                self.chroma_color.store(color.to_bits(), Ordering::Relaxed);
                self.chroma_enabled.store(true, Ordering::Release);
            }
            None => self.chroma_enabled.store(false, Ordering::Release),
        }
    }

    pub fn overlay_lines(&self) -> (u16, u16) {
        let packed = self.overlay_lines.load(Ordering::Relaxed);
        (packed as u16, (packed >> 16) as u16)
    }

    /// Both bounds change in one store, so readers never see a mixed pair
    pub fn set_overlay_lines(&self, first: u16, last: u16) {
        self.overlay_lines.store(pack_lines(first, last), Ordering::Relaxed);
    }

    pub fn reset_overlay_lines(&self) {
        self.set_overlay_lines(ALL_LINES.0, ALL_LINES.1);
    }

    #[inline]
    pub fn overlay_contains(&self, hardware_y: u16) -> bool {
        let (first, last) = self.overlay_lines();
        (first..=last).contains(&hardware_y)
    }
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self::new()
    }
}
