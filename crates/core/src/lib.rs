#![forbid(unsafe_code)]

pub mod bbox;
pub mod cloud;
pub mod point;
pub mod rgb;
pub mod traits;

pub use bbox::Aabb;
pub use cloud::PointCloud;
pub use point::{PointXYZI, PointXYZRGB};
pub use rgb::{bits_to_rgb, pack_rgb, rgb_to_bits, unpack_rgb, Rgb};
pub use traits::{HasColor, HasIntensity, HasPosition};
