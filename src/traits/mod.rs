pub mod lut;
pub mod refresh;

pub use lut::*;
pub use refresh::*;
