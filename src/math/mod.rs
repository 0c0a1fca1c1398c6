pub mod color;
pub mod rotation;

pub use color::{cie_luminance, rescale, BlendWeights};
pub use rotation::{Rotation, RotationMapper};
