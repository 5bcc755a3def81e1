//! Packed RGB encoding used by XYZRGB point formats.
//!
//! PCL inherited from ROS the habit of storing a 24-bit color inside the
//! 4th float slot of a point: the color is composed as `0x00RRGGBB` and the
//! resulting 32 bits are stored as-is in an `f32` field. Packing and
//! unpacking here reinterpret bits, they never convert numerically.

/// An 8-bit-per-channel color triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from wide channel values, keeping only the low 8 bits
    /// of each (`value & 0xFF` in two's complement). Out-of-range values
    /// wrap, they are not clamped.
    pub fn from_channels(r: i64, g: i64, b: i64) -> Self {
        Self {
            r: (r & 0xFF) as u8,
            g: (g & 0xFF) as u8,
            b: (b & 0xFF) as u8,
        }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        c.to_array()
    }
}

/// `0x00RRGGBB`; bits 24-31 are always zero.
pub fn rgb_to_bits(color: Rgb) -> u32 {
    (u32::from(color.r) << 16) | (u32::from(color.g) << 8) | u32::from(color.b)
}

/// Extracts the three color bytes from a 32-bit pattern, ignoring bits 24-31.
pub fn bits_to_rgb(bits: u32) -> Rgb {
    Rgb {
        r: ((bits >> 16) & 0xFF) as u8,
        g: ((bits >> 8) & 0xFF) as u8,
        b: (bits & 0xFF) as u8,
    }
}

/// Packs a color into the float field of a point.
pub fn pack_rgb(color: Rgb) -> f32 {
    f32::from_bits(rgb_to_bits(color))
}

/// Inverse of [`pack_rgb`].
pub fn unpack_rgb(packed: f32) -> Rgb {
    bits_to_rgb(packed.to_bits())
}
