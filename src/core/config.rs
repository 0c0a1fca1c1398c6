use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::error::{LayerError, Result};
use crate::math::Rotation;
use crate::types::BrightnessShift;

/// Everything an application can tune on a layer between frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig<P> {
    pub brightness: u8,
    pub rotation: Rotation,
    pub color_correction: bool,
    pub brightness_shifts: BrightnessShift,
    pub chroma_key: Option<ChromaKey<P>>,
}

impl<P> Default for LayerConfig<P> {
    fn default() -> Self {
        Self {
            brightness: u8::MAX,
            rotation: Rotation::default(),
            color_correction: true,
            brightness_shifts: BrightnessShift::ZERO,
            chroma_key: None,
        }
    }
}

/// Transparent color and the hardware lines it can appear on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChromaKey<P> {
    pub color: P,
    #[serde(default)]
    pub first_line: u16,
    #[serde(default = "last_line_default")]
    pub last_line: u16,
}

fn last_line_default() -> u16 {
    u16::MAX
}

impl<P> ChromaKey<P> {
    /// Key active on every line
    pub fn new(color: P) -> Self {
        Self {
            color,
            first_line: 0,
            last_line: u16::MAX,
        }
    }

    pub fn lines(self, first_line: u16, last_line: u16) -> Self {
        Self {
            first_line,
            last_line,
            ..self
        }
    }
}

impl<P> LayerConfig<P> {
    /// Check values that depend on the matrix size
    pub fn validate(&self, matrix_height: u16) -> Result<()> {
        if let Some(key) = &self.chroma_key {
            validate_overlay_lines(key.first_line, key.last_line, matrix_height)?;
        }
        Ok(())
    }
}

impl<P: DeserializeOwned> LayerConfig<P> {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

impl<P: Serialize> LayerConfig<P> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub(crate) fn validate_overlay_lines(first: u16, last: u16, height: u16) -> Result<()> {
    if first > last || first >= height {
        return Err(LayerError::InvalidOverlayLines {
            first,
            last,
            height,
        });
    }
    Ok(())
}
