/// Fills the color correction table for a layer.
///
/// Invoked once per refresh tick on the refresh path, so implementations
/// must not block or allocate in [`fill`](LutGenerator::fill). Entries are on
/// the 16-bit output scale.
pub trait LutGenerator: Send {
    /// Called once when the layer is built, with the table length it will use
    fn prepare(&mut self, _len: usize) {}

    /// Rebuild `table` for the given layer brightness
    fn fill(&mut self, table: &mut [u16], brightness: u8);
}
