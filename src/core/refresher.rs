use std::sync::Arc;

use log::trace;

use super::compositor::{self, RowParams};
use super::layer::SharedLayer;
use crate::traits::{LutGenerator, RefreshLayer};
use crate::types::{BrightnessShift, Pixel};

/// Refresh-side handle of a layer.
///
/// Owns the color correction table, so the table is only ever written from
/// the refresh context. Only reads the frame currently holding the refresh
/// role.
pub struct LayerRefresher<P: Pixel> {
    shared: Arc<SharedLayer<P>>,
    lut: Box<[u16]>,
    generator: Box<dyn LutGenerator>,
    // Latched with the table so a frame never mixes two brightness values
    brightness: u8,
    requested_shifts: BrightnessShift,
}

impl<P: Pixel> LayerRefresher<P> {
    pub(crate) fn new(
        shared: Arc<SharedLayer<P>>,
        mut lut: Box<[u16]>,
        mut generator: Box<dyn LutGenerator>,
    ) -> Self {
        let brightness = shared.settings.brightness();
        generator.fill(&mut lut, brightness);
        let requested_shifts = shared.settings.pending_shifts();
        Self {
            shared,
            lut,
            generator,
            brightness,
            requested_shifts,
        }
    }

    pub fn matrix_size(&self) -> (u16, u16) {
        (self.shared.width, self.shared.height)
    }

    /// Exchange roles if the writer asked for it. Returns true on a swap.
    pub fn perform_swap(&mut self) -> bool {
        let swapped = self.shared.swap.perform_swap();
        if swapped {
            trace!("buffers swapped, now showing frame {}", self.shared.swap.roles().refresh);
        }
        swapped
    }

    /// Start-of-frame work: swap, latch brightness and the shift request,
    /// refill the table for the latched brightness
    pub fn tick(&mut self) {
        self.perform_swap();
        let settings = &self.shared.settings;
        self.requested_shifts = settings.pending_shifts();
        self.brightness = settings.brightness();
        self.generator.fill(&mut self.lut, self.brightness);
    }

    /// Brightness in effect for the current frame
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// One hardware row of the frame being displayed
    pub fn refresh_row(&self, hardware_y: u16) -> Option<&[P]> {
        if hardware_y >= self.shared.height {
            return None;
        }
        let width = self.shared.width as usize;
        let start = hardware_y as usize * width;
        // SAFETY: the writer never touches the refresh frame, and roles only
        // change in perform_swap, which needs `&mut self`.
        let frame = unsafe { self.shared.frames.frame(self.shared.swap.roles().refresh) };
        Some(&frame[start..start + width])
    }

    /// Color correction table as of the last tick
    pub fn lut(&self) -> &[u16] {
        &self.lut
    }

    /// Blend hardware row `hardware_y` over `row`.
    ///
    /// Uses the brightness latched at the last tick. Does nothing at zero
    /// brightness, or when a chroma key is set and the row lies outside the
    /// overlay lines.
    pub fn composite<O: Pixel>(&self, hardware_y: u16, row: &mut [O], shift: BrightnessShift) {
        let settings = &self.shared.settings;
        let brightness = self.brightness;
        if brightness == 0 {
            return;
        }

        let chroma_key = settings.chroma_key::<P>();
        if chroma_key.is_some() && !settings.overlay_contains(hardware_y) {
            return;
        }

        let Some(source) = self.refresh_row(hardware_y) else {
            return;
        };
        let params = RowParams {
            brightness,
            shift,
            lut: settings.color_correction().then_some(&self.lut[..]),
            chroma_key,
        };
        compositor::composite_row(source, row, &params);
    }
}

impl<P: Pixel, O: Pixel> RefreshLayer<O> for LayerRefresher<P> {
    fn on_refresh_tick(&mut self) {
        self.tick();
    }

    fn composite_row(&self, hardware_y: u16, row: &mut [O], shift: BrightnessShift) {
        self.composite(hardware_y, row, shift);
    }

    fn requested_brightness_shifts(&self) -> BrightnessShift {
        self.requested_shifts
    }

    fn is_layer_changed(&self) -> bool {
        self.shared.swap.is_swap_pending()
    }
}
