use thiserror::Error;
use tracing::{debug, trace};
use xyzi2rgb_core::{pack_rgb, HasIntensity, HasPosition, PointCloud, PointXYZI, PointXYZRGB};

use crate::ramp::ColorRamp;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("point {index} has a non-numeric intensity ({intensity})")]
    InvalidPoint { index: usize, intensity: f32 },
}

/// How a float intensity is reduced to the integer the ramp consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quantization {
    /// Nearest integer. Ties round half away from zero (`f32::round`), so
    /// 66.5 becomes 67. Banker's rounding would give 66; this crate picks
    /// away-from-zero on purpose.
    #[default]
    Round,
    /// Toward zero, like a C-style cast.
    Truncate,
}

impl Quantization {
    /// Saturates to the `i64` range. The caller guarantees `value` is finite.
    pub fn apply(self, value: f32) -> i64 {
        let q = match self {
            Quantization::Round => value.round(),
            Quantization::Truncate => value.trunc(),
        };
        q as i64
    }
}

/// Turns XYZI clouds into packed-color XYZRGB clouds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CloudConverter {
    pub ramp: ColorRamp,
    pub quantization: Quantization,
}

impl CloudConverter {
    pub fn new(ramp: ColorRamp, quantization: Quantization) -> Self {
        Self { ramp, quantization }
    }

    /// Converts a single point. `index` is only used to label errors.
    pub fn convert_point<P: HasPosition + HasIntensity>(
        &self,
        index: usize,
        point: &P,
    ) -> Result<PointXYZRGB, ConvertError> {
        let intensity = point.intensity();
        if !intensity.is_finite() {
            return Err(ConvertError::InvalidPoint { index, intensity });
        }

        let level = self.quantization.apply(intensity);
        trace!(index, intensity = level, "colorizing point");
        let color = self.ramp.map(level);

        let [x, y, z] = point.position();
        Ok(PointXYZRGB::from_packed(x, y, z, pack_rgb(color)))
    }

    /// Converts every point, preserving order, count and cloud shape.
    ///
    /// Fails on the first point whose intensity is NaN or infinite; no
    /// partial cloud is returned.
    pub fn convert<P: HasPosition + HasIntensity>(
        &self,
        cloud: &PointCloud<P>,
    ) -> Result<PointCloud<PointXYZRGB>, ConvertError> {
        let out = cloud.try_map(|i, p| self.convert_point(i, p))?;
        debug!(
            points = out.len(),
            width = out.width(),
            height = out.height(),
            "converted cloud to XYZRGB"
        );
        Ok(out)
    }
}

/// Converts with the reference ramp (8-bit wraparound) and rounding.
pub fn xyzi_to_xyzrgb(
    cloud: &PointCloud<PointXYZI>,
) -> Result<PointCloud<PointXYZRGB>, ConvertError> {
    CloudConverter::default().convert(cloud)
}
