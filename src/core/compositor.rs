use glam::DVec3;

use crate::math::color::{rescale, BlendWeights};
use crate::types::{BrightnessShift, Pixel, LUT_OUTPUT_MAX};

/// Per-row compositing inputs, sampled once per scanline
#[derive(Debug, Clone, Copy)]
pub struct RowParams<'a, P> {
    pub brightness: u8,
    pub shift: BrightnessShift,
    /// Color correction table; `None` when correction is disabled
    pub lut: Option<&'a [u16]>,
    /// Source pixels equal to this are left out of the row
    pub chroma_key: Option<P>,
}

/// Blend one source row over an output row.
///
/// `row` holds whatever lower layers already produced. Source and output
/// may have different channel widths. Runs in O(width) without allocating.
/// A table in `params.lut` must be `S::LUT_LEN` entries long.
pub fn composite_row<S: Pixel, O: Pixel>(source: &[S], row: &mut [O], params: &RowParams<'_, S>) {
    if params.brightness == 0 {
        return;
    }
    debug_assert!(params.lut.map_or(true, |lut| lut.len() == S::LUT_LEN));

    let weights = BlendWeights::from_brightness(params.brightness);
    let opaque = params.brightness == u8::MAX;

    for (src, dst) in source.iter().zip(row.iter_mut()) {
        if params.chroma_key == Some(*src) {
            continue;
        }

        let corrected = corrected::<S, O>(*src, params.lut, params.shift);
        *dst = if opaque {
            O::from_dvec(corrected)
        } else {
            O::from_dvec(weights.blend(dst.to_dvec(), corrected))
        };
    }
}

/// Source pixel after shift and optional table lookup, on the output scale
#[inline]
fn corrected<S: Pixel, O: Pixel>(px: S, lut: Option<&[u16]>, shift: BrightnessShift) -> DVec3 {
    let channels = px.channels();
    match lut {
        Some(lut) => {
            let v = channels.map(|c| lut[S::lut_index(c, shift)] as f64);
            rescale(DVec3::from_array(v), LUT_OUTPUT_MAX, O::CHANNEL_MAX)
        }
        None => {
            let v = channels.map(|c| (c << shift.get()) as f64);
            rescale(DVec3::from_array(v), S::CHANNEL_MAX, O::CHANNEL_MAX)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Rgb24, Rgb48};

    fn params<P>(brightness: u8) -> RowParams<'static, P> {
        RowParams {
            brightness,
            shift: BrightnessShift::ZERO,
            lut: None,
            chroma_key: None,
        }
    }

    #[test]
    fn zero_brightness_leaves_row() {
        let source = [Rgb24::WHITE; 4];
        let mut row = [Rgb24::new(1, 2, 3); 4];
        composite_row(&source, &mut row, &params(0));
        assert_eq!(row, [Rgb24::new(1, 2, 3); 4]);
    }

    #[test]
    fn opaque_copies_source() {
        let source = [Rgb24::new(10, 20, 30); 3];
        let mut row = [Rgb24::new(99, 99, 99); 3];
        composite_row(&source, &mut row, &params(255));
        assert_eq!(row, source);
    }

    #[test]
    fn narrow_source_widens_exactly() {
        let source = [Rgb24::new(255, 1, 0)];
        let mut row = [Rgb48::BLACK];
        composite_row(&source, &mut row, &params(255));
        assert_eq!(row[0], Rgb48::new(0xFFFF, 257, 0));
    }

    #[test]
    fn shift_without_lut_saturates() {
        let source = [Rgb24::new(200, 16, 0)];
        let mut row = [Rgb24::BLACK];
        let p = RowParams {
            shift: BrightnessShift::new(2).unwrap(),
            ..params(255)
        };
        composite_row(&source, &mut row, &p);
        assert_eq!(row[0], Rgb24::new(255, 64, 0));
    }

    #[test]
    fn lut_values_are_on_wide_scale() {
        let lut: Vec<u16> = (0..256u32).map(|i| (i * 2) as u16).collect();
        let source = [Rgb24::new(100, 0, 255)];
        let mut row = [Rgb48::BLACK];
        let p = RowParams {
            lut: Some(lut.as_slice()),
            ..params(255)
        };
        composite_row(&source, &mut row, &p);
        assert_eq!(row[0], Rgb48::new(200, 0, 510));
    }

    #[test]
    fn chroma_pixels_are_skipped() {
        let key = Rgb24::new(255, 0, 255);
        let source = [key, Rgb24::new(1, 1, 1)];
        let mut row = [Rgb24::new(7, 7, 7); 2];
        let p = RowParams {
            chroma_key: Some(key),
            ..params(255)
        };
        composite_row(&source, &mut row, &p);
        assert_eq!(row, [Rgb24::new(7, 7, 7), Rgb24::new(1, 1, 1)]);
    }
}
