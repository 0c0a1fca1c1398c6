use glam::DVec3;

/// Weights for blending a layer of a given brightness over what is below it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    pub lower: f64,
    pub upper: f64,
}

impl BlendWeights {
    pub fn from_brightness(brightness: u8) -> Self {
        Self {
            lower: (255.0 - brightness as f64) / 255.0,
            upper: brightness as f64 / 255.0,
        }
    }

    #[inline]
    pub fn blend(&self, below: DVec3, above: DVec3) -> DVec3 {
        (below * self.lower + above * self.upper) / (self.lower + self.upper)
    }
}

/// Move channel values between scales (8-bit to 16-bit is an exact x257)
#[inline]
pub fn rescale(v: DVec3, from_max: u32, to_max: u32) -> DVec3 {
    if from_max == to_max {
        v
    } else {
        v * (to_max as f64 / from_max as f64)
    }
}

/// CIE 1931 lightness to relative luminance, both in [0, 1]
pub fn cie_luminance(lightness: f64) -> f64 {
    let l = lightness.clamp(0.0, 1.0) * 100.0;
    if l <= 8.0 {
        l / 903.3
    } else {
        ((l + 16.0) / 116.0).powi(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_brightness_weights() {
        let w = BlendWeights::from_brightness(255);
        assert_eq!(w.lower, 0.0);
        assert_eq!(w.upper, 1.0);

        let out = w.blend(DVec3::splat(100.0), DVec3::splat(7.0));
        assert_eq!(out, DVec3::splat(7.0));
    }

    #[test]
    fn half_brightness_blend() {
        let w = BlendWeights::from_brightness(128);
        let out = w.blend(DVec3::ZERO, DVec3::new(255.0, 0.0, 10.0));
        assert!((out.x - 128.0).abs() < 0.01);
        assert!(out.y.abs() < 0.01);
        assert!((out.z - 10.0 * 128.0 / 255.0).abs() < 0.01);
    }

    #[test]
    fn rescale_narrow_to_wide() {
        let v = rescale(DVec3::splat(255.0), 255, 65535);
        assert_eq!(v, DVec3::splat(65535.0));
    }

    #[test]
    fn cie_endpoints() {
        assert_eq!(cie_luminance(0.0), 0.0);
        assert!((cie_luminance(1.0) - 1.0).abs() < 1e-9);
        assert!(cie_luminance(0.5) < 0.5);
    }
}
