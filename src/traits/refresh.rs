use crate::types::{BrightnessShift, Pixel};

/// What a panel driver needs from a layer, per output pixel format
pub trait RefreshLayer<O: Pixel>: Send {
    /// Called once per frame period from the refresh context
    fn on_refresh_tick(&mut self);

    /// Blend this layer's line `hardware_y` into `row`
    fn composite_row(&self, hardware_y: u16, row: &mut [O], shift: BrightnessShift);

    /// Brightness shift the layer would like the driver to use
    fn requested_brightness_shifts(&self) -> BrightnessShift {
        BrightnessShift::ZERO
    }

    /// True while the layer has a new frame waiting to be shown
    fn is_layer_changed(&self) -> bool {
        false
    }
}
