use serde::{Deserialize, Serialize};

use crate::core::error::LayerError;

/// Orientation of the logical drawing space relative to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Rotation0,
    Rotation90,
    Rotation180,
    Rotation270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Rotation0,
        Rotation::Rotation90,
        Rotation::Rotation180,
        Rotation::Rotation270,
    ];

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Rotation0 => 0,
            Rotation::Rotation90 => 90,
            Rotation::Rotation180 => 180,
            Rotation::Rotation270 => 270,
        }
    }

    /// True when logical width and height are the panel's height and width
    pub fn is_transposed(self) -> bool {
        matches!(self, Rotation::Rotation90 | Rotation::Rotation270)
    }
}

impl TryFrom<u16> for Rotation {
    type Error = LayerError;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::Rotation0),
            90 => Ok(Rotation::Rotation90),
            180 => Ok(Rotation::Rotation180),
            270 => Ok(Rotation::Rotation270),
            other => Err(LayerError::InvalidRotation(other)),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> u16 {
        rotation.degrees()
    }
}

/// Maps logical (application) coordinates onto the physical matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationMapper {
    rotation: Rotation,
    matrix_width: u16,
    matrix_height: u16,
}

impl RotationMapper {
    pub fn new(rotation: Rotation, matrix_width: u16, matrix_height: u16) -> Self {
        Self {
            rotation,
            matrix_width,
            matrix_height,
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn with_rotation(self, rotation: Rotation) -> Self {
        Self { rotation, ..self }
    }

    /// Physical matrix size (width, height)
    pub fn matrix_size(&self) -> (u16, u16) {
        (self.matrix_width, self.matrix_height)
    }

    /// Logical drawing size (width, height) under the current rotation
    pub fn logical_size(&self) -> (u16, u16) {
        if self.rotation.is_transposed() {
            (self.matrix_height, self.matrix_width)
        } else {
            (self.matrix_width, self.matrix_height)
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (w, h) = self.logical_size();
        x >= 0 && y >= 0 && x < w as i32 && y < h as i32
    }

    /// Physical coordinate for a logical one, `None` when out of bounds
    #[inline]
    pub fn to_physical(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        if !self.contains(x, y) {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        let w = self.matrix_width as usize;
        let h = self.matrix_height as usize;

        Some(match self.rotation {
            Rotation::Rotation0 => (x, y),
            Rotation::Rotation180 => (w - 1 - x, h - 1 - y),
            Rotation::Rotation90 => (w - 1 - y, x),
            Rotation::Rotation270 => (y, h - 1 - x),
        })
    }

    /// Inverse of [`to_physical`](Self::to_physical)
    pub fn to_logical(&self, hwx: usize, hwy: usize) -> Option<(i32, i32)> {
        let w = self.matrix_width as usize;
        let h = self.matrix_height as usize;
        if hwx >= w || hwy >= h {
            return None;
        }

        let (x, y) = match self.rotation {
            Rotation::Rotation0 => (hwx, hwy),
            Rotation::Rotation180 => (w - 1 - hwx, h - 1 - hwy),
            Rotation::Rotation90 => (hwy, w - 1 - hwx),
            Rotation::Rotation270 => (h - 1 - hwy, hwx),
        };
        Some((x as i32, y as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_from_degrees() {
        assert_eq!(Rotation::try_from(90u16).unwrap(), Rotation::Rotation90);
        assert!(matches!(
            Rotation::try_from(45u16),
            Err(LayerError::InvalidRotation(45))
        ));
    }

    #[test]
    fn transposed_logical_size() {
        let mapper = RotationMapper::new(Rotation::Rotation90, 64, 32);
        assert_eq!(mapper.logical_size(), (32, 64));
        assert_eq!(mapper.matrix_size(), (64, 32));
    }

    #[test]
    fn corners_under_each_rotation() {
        let m = RotationMapper::new(Rotation::Rotation0, 8, 4);
        assert_eq!(m.to_physical(0, 0), Some((0, 0)));

        let m = m.with_rotation(Rotation::Rotation180);
        assert_eq!(m.to_physical(0, 0), Some((7, 3)));

        let m = m.with_rotation(Rotation::Rotation90);
        assert_eq!(m.to_physical(0, 0), Some((7, 0)));
        assert_eq!(m.to_physical(3, 7), Some((0, 3)));

        let m = m.with_rotation(Rotation::Rotation270);
        assert_eq!(m.to_physical(0, 0), Some((0, 3)));
    }

    #[test]
    fn out_of_bounds_is_none() {
        let m = RotationMapper::new(Rotation::Rotation0, 4, 4);
        assert_eq!(m.to_physical(-1, 0), None);
        assert_eq!(m.to_physical(0, 4), None);
        assert_eq!(m.to_logical(4, 0), None);
    }
}
