pub mod buffer_pair;
pub mod compositor;
pub mod config;
pub mod error;
pub mod layer;
pub mod lut;
pub mod refresher;
mod settings;
pub mod swap;
pub mod writer;

pub use buffer_pair::FramePair;
pub use compositor::{composite_row, RowParams};
pub use config::{ChromaKey, LayerConfig};
pub use error::{LayerError, Result};
pub use layer::LayerBuilder;
pub use lut::{CieLightness, LinearLut};
pub use refresher::LayerRefresher;
pub use swap::{Roles, SwapController, SwapState};
pub use writer::LayerWriter;
