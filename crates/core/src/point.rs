use crate::rgb::{pack_rgb, unpack_rgb, Rgb};
use crate::traits::{HasColor, HasIntensity, HasPosition};

/// A range-sensor return: position plus return-signal strength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointXYZI {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub intensity: f32,
}

/// Position plus a packed `0x00RRGGBB` color stored in a float field.
///
/// Equality compares the packed field numerically, which is exact for the
/// bit patterns [`pack_rgb`] produces (they are never NaN).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointXYZRGB {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rgb: f32,
}

impl PointXYZI {
    pub fn new(x: f32, y: f32, z: f32, intensity: f32) -> Self {
        Self { x, y, z, intensity }
    }
}

impl PointXYZRGB {
    pub fn new(x: f32, y: f32, z: f32, color: Rgb) -> Self {
        Self {
            x,
            y,
            z,
            rgb: pack_rgb(color),
        }
    }

    /// Builds a point from an already packed color field.
    pub fn from_packed(x: f32, y: f32, z: f32, rgb: f32) -> Self {
        Self { x, y, z, rgb }
    }

    pub fn rgb(&self) -> Rgb {
        unpack_rgb(self.rgb)
    }

    pub fn set_rgb(&mut self, color: Rgb) {
        self.rgb = pack_rgb(color);
    }
}

impl HasPosition for PointXYZI {
    fn position(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl HasIntensity for PointXYZI {
    fn intensity(&self) -> f32 {
        self.intensity
    }
}

impl HasPosition for PointXYZRGB {
    fn position(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl HasColor for PointXYZRGB {
    fn color(&self) -> [u8; 3] {
        self.rgb().to_array()
    }
}
