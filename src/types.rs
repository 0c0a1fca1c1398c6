use bytemuck::{Pod, Zeroable};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::core::error::LayerError;

/// Largest brightness shift the wide-pixel table indexing can absorb
pub const MAX_BRIGHTNESS_SHIFT: u8 = 4;

/// Scale of every color correction table entry (16 bits per channel)
pub const LUT_OUTPUT_MAX: u32 = u16::MAX as u32;

/// Pre-scaling exponent applied to channels before table lookup, in 0..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BrightnessShift(u8);

impl BrightnessShift {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(MAX_BRIGHTNESS_SHIFT);

    pub fn new(shift: u8) -> Result<Self, LayerError> {
        if shift > MAX_BRIGHTNESS_SHIFT {
            return Err(LayerError::InvalidBrightnessShift(shift));
        }
        Ok(Self(shift))
    }

    pub const fn get(self) -> u32 {
        self.0 as u32
    }

    /// All valid shifts, smallest first
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=MAX_BRIGHTNESS_SHIFT).map(Self)
    }
}

impl TryFrom<u8> for BrightnessShift {
    type Error = LayerError;

    fn try_from(shift: u8) -> Result<Self, Self::Error> {
        Self::new(shift)
    }
}

impl From<BrightnessShift> for u8 {
    fn from(shift: BrightnessShift) -> u8 {
        shift.0
    }
}

/// Capability interface over pixel depth.
///
/// Channel width, table size and table indexing are the only things that
/// differ between narrow and wide pixels; the compositor is written once
/// against this trait.
pub trait Pixel: Pod + PartialEq + Debug + Default + Send + Sync {
    /// Bits per channel
    const CHANNEL_BITS: u32;

    /// Entries in the color correction table for this depth
    const LUT_LEN: usize;

    const CHANNEL_MAX: u32 = (1 << Self::CHANNEL_BITS) - 1;

    /// Channels as `[red, green, blue]`
    fn channels(self) -> [u32; 3];

    /// Build from `[red, green, blue]`; bits above the channel width are dropped
    fn from_channels(channels: [u32; 3]) -> Self;

    /// Table index for a channel before it is clamped to the table
    fn raw_lut_index(channel: u32, shift: BrightnessShift) -> usize;

    /// Table index for a channel, always inside `0..LUT_LEN`
    #[inline]
    fn lut_index(channel: u32, shift: BrightnessShift) -> usize {
        Self::raw_lut_index(channel, shift).min(Self::LUT_LEN - 1)
    }

    /// Pack into a single word (red in the low bits)
    fn to_bits(self) -> u64 {
        let [r, g, b] = self.channels();
        let bits = Self::CHANNEL_BITS;
        r as u64 | (g as u64) << bits | (b as u64) << (2 * bits)
    }

    fn from_bits(word: u64) -> Self {
        let bits = Self::CHANNEL_BITS;
        let mask = Self::CHANNEL_MAX as u64;
        Self::from_channels([
            (word & mask) as u32,
            (word >> bits & mask) as u32,
            (word >> (2 * bits) & mask) as u32,
        ])
    }

    #[inline]
    fn to_dvec(self) -> DVec3 {
        let [r, g, b] = self.channels();
        DVec3::new(r as f64, g as f64, b as f64)
    }

    /// Round to the nearest channel value, saturating at the channel range
    #[inline]
    fn from_dvec(v: DVec3) -> Self {
        let v = v.round().clamp(DVec3::ZERO, DVec3::splat(Self::CHANNEL_MAX as f64));
        Self::from_channels([v.x as u32, v.y as u32, v.z as u32])
    }
}

/// Narrow pixel, 8 bits per channel
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgb24 {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb24 {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl Pixel for Rgb24 {
    const CHANNEL_BITS: u32 = 8;
    const LUT_LEN: usize = 256;

    #[inline]
    fn channels(self) -> [u32; 3] {
        [self.red as u32, self.green as u32, self.blue as u32]
    }

    #[inline]
    fn from_channels([r, g, b]: [u32; 3]) -> Self {
        Self::new(r as u8, g as u8, b as u8)
    }

    #[inline]
    fn raw_lut_index(channel: u32, shift: BrightnessShift) -> usize {
        (channel << shift.get()) as usize
    }
}

/// Wide pixel, 16 bits per channel
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgb48 {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl Rgb48 {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(u16::MAX, u16::MAX, u16::MAX);

    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }
}

impl Pixel for Rgb48 {
    const CHANNEL_BITS: u32 = 16;
    const LUT_LEN: usize = 4096;

    #[inline]
    fn channels(self) -> [u32; 3] {
        [self.red as u32, self.green as u32, self.blue as u32]
    }

    #[inline]
    fn from_channels([r, g, b]: [u32; 3]) -> Self {
        Self::new(r as u16, g as u16, b as u16)
    }

    // 16-bit channels drop into the 12-bit table domain; the shift eats the 4 bits of headroom
    #[inline]
    fn raw_lut_index(channel: u32, shift: BrightnessShift) -> usize {
        (channel >> (MAX_BRIGHTNESS_SHIFT as u32 - shift.get())) as usize
    }
}

/// Bit replication: 0xAB becomes 0xABAB so full scale maps to full scale
impl From<Rgb24> for Rgb48 {
    fn from(c: Rgb24) -> Self {
        Self::new(c.red as u16 * 257, c.green as u16 * 257, c.blue as u16 * 257)
    }
}

impl From<Rgb48> for Rgb24 {
    fn from(c: Rgb48) -> Self {
        Self::new((c.red >> 8) as u8, (c.green >> 8) as u8, (c.blue >> 8) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_shift_rejects_out_of_range() {
        assert!(BrightnessShift::new(4).is_ok());
        assert!(matches!(
            BrightnessShift::new(5),
            Err(LayerError::InvalidBrightnessShift(5))
        ));
        assert_eq!(BrightnessShift::all().count(), 5);
    }

    #[test]
    fn pixel_sizes_match_channel_width() {
        assert_eq!(std::mem::size_of::<Rgb24>(), 3);
        assert_eq!(std::mem::size_of::<Rgb48>(), 6);
    }

    #[test]
    fn bits_round_trip() {
        let narrow = Rgb24::new(1, 2, 3);
        assert_eq!(Rgb24::from_bits(narrow.to_bits()), narrow);

        let wide = Rgb48::new(0xFFFF, 0x1234, 0);
        assert_eq!(Rgb48::from_bits(wide.to_bits()), wide);
    }

    #[test]
    fn lut_index_never_leaves_table() {
        for shift in BrightnessShift::all() {
            assert!(Rgb24::lut_index(255, shift) < Rgb24::LUT_LEN);
            assert!(Rgb48::lut_index(u16::MAX as u32, shift) < Rgb48::LUT_LEN);
        }
        assert_eq!(Rgb24::lut_index(255, BrightnessShift::ZERO), 255);
        assert_eq!(Rgb48::lut_index(0xFFFF, BrightnessShift::ZERO), 4095);
    }

    #[test]
    fn from_dvec_rounds_and_saturates() {
        let p = Rgb24::from_dvec(DVec3::new(4.6, -3.0, 300.0));
        assert_eq!(p, Rgb24::new(5, 0, 255));
    }

    #[test]
    fn narrow_to_wide_is_full_scale() {
        assert_eq!(Rgb48::from(Rgb24::WHITE), Rgb48::WHITE);
        assert_eq!(Rgb24::from(Rgb48::WHITE), Rgb24::WHITE);
    }
}
