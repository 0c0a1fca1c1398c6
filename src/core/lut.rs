use crate::math::color::cie_luminance;
use crate::traits::LutGenerator;
use crate::types::LUT_OUTPUT_MAX;

/// Straight ramp from 0 to full scale, scaled by brightness
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearLut;

impl LutGenerator for LinearLut {
    fn fill(&mut self, table: &mut [u16], brightness: u8) {
        let last = table.len().saturating_sub(1).max(1) as u64;
        let scale = LUT_OUTPUT_MAX as u64 * brightness as u64;

        for (i, entry) in table.iter_mut().enumerate() {
            *entry = (i as u64 * scale / (last * 255)) as u16;
        }
    }
}

/// Perceptual correction following the CIE 1931 lightness curve.
///
/// The curve is computed once in [`prepare`](LutGenerator::prepare), or on
/// the first fill if the generator was not prepared; each tick only rescales
/// it by brightness.
#[derive(Debug, Clone, Default)]
pub struct CieLightness {
    curve: Vec<u16>,
}

impl CieLightness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator already prepared for a table of `len` entries
    pub fn with_len(len: usize) -> Self {
        let mut generator = Self::new();
        generator.prepare(len);
        generator
    }
}

impl LutGenerator for CieLightness {
    fn prepare(&mut self, len: usize) {
        let last = len.saturating_sub(1).max(1) as f64;
        self.curve = (0..len)
            .map(|i| (cie_luminance(i as f64 / last) * LUT_OUTPUT_MAX as f64).round() as u16)
            .collect();
    }

    fn fill(&mut self, table: &mut [u16], brightness: u8) {
        // Only allocates when used unprepared or on a table of another size
        if self.curve.len() != table.len() {
            self.prepare(table.len());
        }

        for (entry, &base) in table.iter_mut().zip(&self.curve) {
            *entry = (base as u32 * brightness as u32 / 255) as u16;
        }
    }
}
