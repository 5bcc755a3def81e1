use std::io;
use std::path::Path;

use tracing::debug;
use xyzi2rgb_core::{PointCloud, PointXYZI};

/// Reads a LAS file into an XYZI cloud. LAS intensities are 16-bit, so
/// values above 255 are common and land in the ramp's last segment.
pub fn read_las(path: impl AsRef<Path>) -> io::Result<PointCloud<PointXYZI>> {
    let path = path.as_ref();
    let mut reader = las::Reader::from_path(path)
        .map_err(|e| io::Error::other(format!("failed to open LAS file: {}", e)))?;

    let declared = usize::try_from(reader.header().number_of_points()).unwrap_or(0);
    let mut cloud = PointCloud::with_capacity(declared);
    for point_result in reader.points() {
        let point = point_result.map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to read LAS point: {}", e),
            )
        })?;
        cloud.push(PointXYZI::new(
            point.x as f32,
            point.y as f32,
            point.z as f32,
            f32::from(point.intensity),
        ));
    }

    debug!(path = %path.display(), points = cloud.len(), "read LAS");
    Ok(cloud)
}
