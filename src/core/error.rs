use thiserror::Error;

/// Errors surfaced while building or configuring a layer
#[derive(Debug, Error)]
pub enum LayerError {
    #[error("rotation must be 0, 90, 180 or 270 degrees, got {0}")]
    InvalidRotation(u16),

    #[error("brightness shift must be in 0..=4, got {0}")]
    InvalidBrightnessShift(u8),

    #[error("matrix dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: u16, height: u16 },

    #[error("frame storage holds {actual} pixels, expected {expected}")]
    StorageSize { expected: usize, actual: usize },

    #[error("color correction table holds {actual} entries, expected {expected}")]
    LutSize { expected: usize, actual: usize },

    #[error("failed to allocate {bytes} bytes")]
    Allocation { bytes: usize },

    #[error("overlay lines {first}..={last} do not fit a matrix {height} lines tall")]
    InvalidOverlayLines { first: u16, last: u16, height: u16 },

    #[error("invalid layer configuration")]
    Config(#[from] serde_json::Error),

    #[error("failed to read layer configuration")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LayerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        assert!(LayerError::InvalidRotation(45).to_string().contains("45"));
        assert!(LayerError::InvalidBrightnessShift(7).to_string().contains('7'));

        let err = LayerError::StorageSize { expected: 32, actual: 16 };
        let msg = err.to_string();
        assert!(msg.contains("32") && msg.contains("16"));
    }
}
