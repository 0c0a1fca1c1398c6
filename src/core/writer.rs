use std::sync::Arc;

use log::debug;

use super::config::{validate_overlay_lines, ChromaKey, LayerConfig};
use super::error::Result;
use super::layer::{warn_if_shift_clamps, SharedLayer};
use crate::math::{Rotation, RotationMapper};
use crate::types::{BrightnessShift, Pixel};

/// Application-side handle of a layer: drawing, swap requests, configuration.
///
/// Every pixel access goes through the rotation mapper. Drawing waits out a
/// pending swap first, so nothing written after [`swap_buffers`] lands in
/// the frame that is about to be displayed.
///
/// [`swap_buffers`]: LayerWriter::swap_buffers
pub struct LayerWriter<P: Pixel> {
    shared: Arc<SharedLayer<P>>,
    mapper: RotationMapper,
}

impl<P: Pixel> LayerWriter<P> {
    pub(crate) fn new(shared: Arc<SharedLayer<P>>, rotation: Rotation) -> Self {
        let mapper = RotationMapper::new(rotation, shared.width, shared.height);
        Self { shared, mapper }
    }

    /// Physical matrix size (width, height)
    pub fn matrix_size(&self) -> (u16, u16) {
        self.mapper.matrix_size()
    }

    /// Drawing size (width, height) under the current rotation
    pub fn logical_size(&self) -> (u16, u16) {
        self.mapper.logical_size()
    }

    pub fn rotation(&self) -> Rotation {
        self.mapper.rotation()
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.mapper = self.mapper.with_rotation(rotation);
    }

    pub fn brightness(&self) -> u8 {
        self.shared.settings.brightness()
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.shared.settings.set_brightness(brightness);
    }

    pub fn color_correction(&self) -> bool {
        self.shared.settings.color_correction()
    }

    pub fn enable_color_correction(&mut self, enabled: bool) {
        self.shared.settings.set_color_correction(enabled);
    }

    /// Ask the driver for a brightness shift; takes effect on the next tick
    pub fn set_brightness_shifts(&mut self, shifts: u8) -> Result<()> {
        let shifts = BrightnessShift::new(shifts)?;
        warn_if_shift_clamps::<P>(shifts);
        self.shared.settings.set_pending_shifts(shifts);
        Ok(())
    }

    pub fn chroma_key(&self) -> Option<P> {
        self.shared.settings.chroma_key()
    }

    /// Treat `color` as transparent, or disable the key with `None`
    pub fn set_chroma_key(&mut self, color: Option<P>) {
        self.shared.settings.set_chroma_key(color);
    }

    /// Limit the chroma key (and with it the whole layer) to these hardware lines
    pub fn set_overlay_lines(&mut self, first: u16, last: u16) -> Result<()> {
        validate_overlay_lines(first, last, self.shared.height)?;
        self.shared.settings.set_overlay_lines(first, last);
        Ok(())
    }

    /// Apply a full configuration between frames
    pub fn apply_config(&mut self, config: &LayerConfig<P>) -> Result<()> {
        config.validate(self.shared.height)?;
        self.shared.swap.wait_idle();

        self.shared.apply_config(config);
        self.set_rotation(config.rotation);
        warn_if_shift_clamps::<P>(config.brightness_shifts);
        debug!(
            "layer config applied: brightness {}, rotation {}, correction {}",
            config.brightness,
            config.rotation.degrees(),
            config.color_correction
        );
        Ok(())
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> LayerConfig<P> {
        let settings = &self.shared.settings;
        let (first_line, last_line) = settings.overlay_lines();
        LayerConfig {
            brightness: settings.brightness(),
            rotation: self.rotation(),
            color_correction: settings.color_correction(),
            brightness_shifts: settings.pending_shifts(),
            chroma_key: settings.chroma_key::<P>().map(|color| ChromaKey {
                color,
                first_line,
                last_line,
            }),
        }
    }

    pub fn is_swap_pending(&self) -> bool {
        self.shared.swap.is_swap_pending()
    }

    /// Hand the draw frame to the refresh path at its next tick.
    ///
    /// Spins while an earlier swap is still pending. With `copy`, also spins
    /// until this swap has happened and then copies the newly displayed frame
    /// into the new draw frame, so drawing can continue on top of it.
    pub fn swap_buffers(&mut self, copy: bool) {
        let swap = &self.shared.swap;
        swap.request();
        debug!("swap requested (copy: {copy})");

        if copy {
            swap.wait_idle();
            // Roles must be read after the swap, never before the request.
            let roles = swap.roles();
            // SAFETY: no swap is pending, so roles stay fixed until this writer
            // requests again; the refresher only reads the refresh frame.
            unsafe { self.shared.frames.copy_frame(roles.refresh, roles.draw) };
        }
    }

    /// Copy the frame currently being displayed into the draw frame
    pub fn copy_refresh_to_draw(&mut self) {
        let swap = &self.shared.swap;
        swap.wait_idle();
        let roles = swap.roles();
        // SAFETY: see swap_buffers
        unsafe { self.shared.frames.copy_frame(roles.refresh, roles.draw) };
    }

    #[inline]
    fn draw_frame(&self) -> &[P] {
        let swap = &self.shared.swap;
        swap.wait_idle();
        // SAFETY: with no swap pending the draw frame is never touched by the refresher
        unsafe { self.shared.frames.frame(swap.roles().draw) }
    }

    #[inline]
    fn draw_frame_mut(&mut self) -> &mut [P] {
        let swap = &self.shared.swap;
        swap.wait_idle();
        // SAFETY: roles cannot change until this writer requests a swap, which
        // needs `&mut self` and so cannot overlap the returned borrow.
        unsafe { self.shared.frames.frame_mut(swap.roles().draw) }
    }

    /// Whole draw frame in physical row-major order, for bulk loading
    pub fn back_buffer_mut(&mut self) -> &mut [P] {
        self.draw_frame_mut()
    }

    pub fn back_buffer(&self) -> &[P] {
        self.draw_frame()
    }

    pub fn back_buffer_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.draw_frame())
    }

    /// Write one pixel; out-of-bounds coordinates are ignored
    #[inline]
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: P) {
        let Some((hwx, hwy)) = self.mapper.to_physical(x, y) else {
            return;
        };
        let width = self.shared.width as usize;
        self.draw_frame_mut()[hwy * width + hwx] = color;
    }

    /// Read one pixel from the draw frame; out-of-bounds reads are black
    pub fn read_pixel(&self, x: i32, y: i32) -> P {
        let Some((hwx, hwy)) = self.mapper.to_physical(x, y) else {
            return P::default();
        };
        self.draw_frame()[hwy * self.shared.width as usize + hwx]
    }

    /// Horizontal logical line from `x0` to `x1` inclusive, clipped to the layer
    pub fn draw_fast_hline(&mut self, x0: i32, x1: i32, y: i32, color: P) {
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let (w, h) = self.logical_size();
        if x1 < 0 || x0 >= w as i32 || y < 0 || y >= h as i32 {
            return;
        }
        let (x0, x1) = (x0.max(0), x1.min(w as i32 - 1));

        let mapper = self.mapper;
        if let (Some(a), Some(b)) = (mapper.to_physical(x0, y), mapper.to_physical(x1, y)) {
            self.fill_physical_run(a, b, color);
        }
    }

    /// Vertical logical line from `y0` to `y1` inclusive, clipped to the layer
    pub fn draw_fast_vline(&mut self, x: i32, y0: i32, y1: i32, color: P) {
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        let (w, h) = self.logical_size();
        if y1 < 0 || y0 >= h as i32 || x < 0 || x >= w as i32 {
            return;
        }
        let (y0, y1) = (y0.max(0), y1.min(h as i32 - 1));

        let mapper = self.mapper;
        if let (Some(a), Some(b)) = (mapper.to_physical(x, y0), mapper.to_physical(x, y1)) {
            self.fill_physical_run(a, b, color);
        }
    }

    pub fn fill_rectangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: P) {
        let (_, h) = self.logical_size();
        let (y0, y1) = (y0.min(y1).max(0), y0.max(y1).min(h as i32 - 1));
        for y in y0..=y1 {
            self.draw_fast_hline(x0, x1, y, color);
        }
    }

    pub fn fill_screen(&mut self, color: P) {
        self.draw_frame_mut().fill(color);
    }

    // A logical line maps to one physical row or one physical column
    fn fill_physical_run(&mut self, a: (usize, usize), b: (usize, usize), color: P) {
        let width = self.shared.width as usize;
        let frame = self.draw_frame_mut();

        if a.1 == b.1 {
            let row = a.1 * width;
            let (lo, hi) = (a.0.min(b.0), a.0.max(b.0));
            frame[row + lo..=row + hi].fill(color);
        } else {
            let (lo, hi) = (a.1.min(b.1), a.1.max(b.1));
            for hwy in lo..=hi {
                frame[hwy * width + a.0] = color;
            }
        }
    }
}
