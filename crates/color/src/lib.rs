#![forbid(unsafe_code)]

pub mod convert;
pub mod ramp;

pub use convert::{xyzi_to_xyzrgb, CloudConverter, ConvertError, Quantization};
pub use ramp::{intensity_to_rgb, ChannelOverflow, ColorRamp};
