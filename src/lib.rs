pub mod cli;
pub mod core;
pub mod display;
pub mod frame;
pub mod math;
pub mod traits;
pub mod types;

pub use crate::core::{LayerBuilder, LayerConfig, LayerError, LayerRefresher, LayerWriter};
pub use display::Panel;
pub use frame::{RefreshClock, TickInfo};
pub use math::Rotation;
pub use types::{BrightnessShift, Pixel, Rgb24, Rgb48};
