use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use crate::frame::RefreshClock;
use crate::traits::RefreshLayer;
use crate::types::{BrightnessShift, Pixel};

/// Panel combines a stack of layers and the composed output frame.
///
/// Layers are composited bottom to top in the order they were added, each
/// row starting from black. Stands in for the matrix driver's refresh loop.
pub struct Panel<O: Pixel> {
    width: u16,
    height: u16,
    layers: Vec<Box<dyn RefreshLayer<O>>>,
    frame: Vec<O>,
    shift: BrightnessShift,
}

impl<O: Pixel> Panel<O> {
    /// Create an empty panel with a preallocated output frame
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            layers: Vec::new(),
            frame: vec![O::default(); width as usize * height as usize],
            shift: BrightnessShift::ZERO,
        }
    }

    /// Builder pattern: stack a layer on top of the existing ones
    pub fn with_layer(mut self, layer: impl RefreshLayer<O> + 'static) -> Self {
        self.add_layer(Box::new(layer));
        self
    }

    pub fn add_layer(&mut self, layer: Box<dyn RefreshLayer<O>>) {
        self.layers.push(layer);
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Shift in use for the last composed frame
    pub fn brightness_shift(&self) -> BrightnessShift {
        self.shift
    }

    /// True if any layer has a frame waiting for the next tick
    pub fn is_changed(&self) -> bool {
        self.layers.iter().any(|layer| layer.is_layer_changed())
    }

    /// One full refresh: tick every layer, then compose every hardware row
    pub fn refresh(&mut self) {
        for layer in &mut self.layers {
            layer.on_refresh_tick();
        }

        let shift = self
            .layers
            .iter()
            .map(|layer| layer.requested_brightness_shifts())
            .max()
            .unwrap_or_default();
        if shift != self.shift {
            debug!("panel brightness shift {} -> {}", self.shift.get(), shift.get());
            self.shift = shift;
        }

        if self.frame.is_empty() {
            return;
        }
        let width = self.width as usize;
        for (y, row) in self.frame.chunks_exact_mut(width).enumerate() {
            row.fill(O::default());
            for layer in &self.layers {
                layer.composite_row(y as u16, row, shift);
            }
        }
    }

    /// Last composed frame in hardware row-major order
    pub fn frame(&self) -> &[O] {
        &self.frame
    }

    pub fn row(&self, hardware_y: u16) -> Option<&[O]> {
        let width = self.width as usize;
        let start = hardware_y as usize * width;
        self.frame.get(start..start + width)
    }

    /// Refresh once per clock tick until `stop` is raised. Returns the tick count.
    pub fn run(&mut self, clock: RefreshClock, stop: &AtomicBool) -> u64 {
        let mut ticks = 0;
        for _tick in clock {
            if stop.load(Ordering::Acquire) {
                break;
            }
            self.refresh();
            ticks += 1;
        }
        debug!("panel stopped after {ticks} refreshes");
        ticks
    }
}
