use std::sync::Arc;

use bytemuck::allocation::try_zeroed_slice_box;
use log::{info, warn};

use super::buffer_pair::FramePair;
use super::config::LayerConfig;
use super::error::{LayerError, Result};
use super::lut::CieLightness;
use super::refresher::LayerRefresher;
use super::settings::LayerSettings;
use super::swap::SwapController;
use super::writer::LayerWriter;
use crate::traits::LutGenerator;
use crate::types::{BrightnessShift, Pixel};

/// State shared by the writer and the refresher of one layer
pub(crate) struct SharedLayer<P: Pixel> {
    pub frames: FramePair<P>,
    pub swap: SwapController,
    pub settings: LayerSettings,
    pub width: u16,
    pub height: u16,
}

impl<P: Pixel> SharedLayer<P> {
    pub fn apply_config(&self, config: &LayerConfig<P>) {
        let settings = &self.settings;
        settings.set_brightness(config.brightness);
        settings.set_color_correction(config.color_correction);
        settings.set_pending_shifts(config.brightness_shifts);
        match &config.chroma_key {
            Some(key) => {
                settings.set_overlay_lines(key.first_line, key.last_line);
                settings.set_chroma_key(Some(key.color));
            }
            None => {
                settings.set_chroma_key::<P>(None);
                settings.reset_overlay_lines();
            }
        }
    }
}

/// Shifted channels past the table top all read its last entry
pub(crate) fn warn_if_shift_clamps<P: Pixel>(shift: BrightnessShift) {
    if P::raw_lut_index(P::CHANNEL_MAX, shift) >= P::LUT_LEN {
        warn!(
            "brightness shift {} saturates the brightest channel values at the end of the {}-entry table",
            shift.get(),
            P::LUT_LEN
        );
    }
}

/// Builds a double-buffered layer and splits it into its two handles.
///
/// The [`LayerWriter`] belongs to the application; the [`LayerRefresher`]
/// belongs to whatever runs the refresh interrupt.
pub struct LayerBuilder<P: Pixel> {
    width: u16,
    height: u16,
    storage: Option<Box<[P]>>,
    lut: Option<Box<[u16]>>,
    generator: Option<Box<dyn LutGenerator>>,
    config: LayerConfig<P>,
}

impl<P: Pixel> LayerBuilder<P> {
    /// Start a layer for a `width` x `height` matrix
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            storage: None,
            lut: None,
            generator: None,
            config: LayerConfig::default(),
        }
    }

    /// Use caller-supplied storage for both frames (`2 * width * height` pixels)
    pub fn storage(mut self, storage: impl Into<Box<[P]>>) -> Self {
        self.storage = Some(storage.into());
        self
    }

    /// Use a caller-supplied color correction table (`P::LUT_LEN` entries)
    pub fn lut_table(mut self, table: impl Into<Box<[u16]>>) -> Self {
        self.lut = Some(table.into());
        self
    }

    /// Replace the default CIE lightness generator
    pub fn lut_generator(mut self, generator: impl LutGenerator + 'static) -> Self {
        self.generator = Some(Box::new(generator));
        self
    }

    pub fn config(mut self, config: LayerConfig<P>) -> Self {
        self.config = config;
        self
    }

    pub fn brightness(mut self, brightness: u8) -> Self {
        self.config.brightness = brightness;
        self
    }

    pub fn rotation(mut self, rotation: crate::math::Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    /// Allocate or adopt both frames and the table, then split the layer
    pub fn build(self) -> Result<(LayerWriter<P>, LayerRefresher<P>)> {
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 {
            return Err(LayerError::InvalidDimensions { width, height });
        }
        self.config.validate(height)?;

        let frame_len = width as usize * height as usize;
        let frames = match self.storage {
            Some(storage) => FramePair::from_storage(storage, frame_len)?,
            None => FramePair::allocate(frame_len)?,
        };

        let lut = match self.lut {
            Some(table) if table.len() != P::LUT_LEN => {
                return Err(LayerError::LutSize {
                    expected: P::LUT_LEN,
                    actual: table.len(),
                });
            }
            Some(table) => table,
            None => try_zeroed_slice_box::<u16>(P::LUT_LEN).map_err(|_| LayerError::Allocation {
                bytes: P::LUT_LEN * std::mem::size_of::<u16>(),
            })?,
        };

        let mut generator = self
            .generator
            .unwrap_or_else(|| Box::new(CieLightness::new()));
        generator.prepare(P::LUT_LEN);

        info!(
            "layer {}x{}: {} bytes per frame, {}-entry color table",
            width,
            height,
            frames.frame_bytes(),
            P::LUT_LEN
        );

        let shared = Arc::new(SharedLayer {
            frames,
            swap: SwapController::new(),
            settings: LayerSettings::new(),
            width,
            height,
        });
        shared.apply_config(&self.config);
        warn_if_shift_clamps::<P>(self.config.brightness_shifts);

        let writer = LayerWriter::new(Arc::clone(&shared), self.config.rotation);
        let refresher = LayerRefresher::new(shared, lut, generator);
        Ok((writer, refresher))
    }
}
