#![forbid(unsafe_code)]

pub mod las;
pub mod pcd;
pub mod ply;

use std::io;
use std::path::Path;

use xyzi2rgb_core::{PointCloud, PointXYZI, PointXYZRGB};

pub use self::las::read_las;
pub use pcd::{read_pcd_xyzi, read_pcd_xyzrgb, write_pcd, write_pcd_binary, PcdPoint};
pub use ply::{write_ply, write_ply_binary};

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

/// Loads an XYZI cloud, picking the reader from the file extension.
pub fn read_xyzi(path: impl AsRef<Path>) -> io::Result<PointCloud<PointXYZI>> {
    let path = path.as_ref();
    match extension(path).as_str() {
        "pcd" => read_pcd_xyzi(path),
        "las" => read_las(path),
        other => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("cannot read point clouds with extension {:?}", other),
        )),
    }
}

/// Saves a colored cloud, picking the writer from the file extension.
pub fn write_xyzrgb(
    path: impl AsRef<Path>,
    cloud: &PointCloud<PointXYZRGB>,
    binary: bool,
) -> io::Result<()> {
    let path = path.as_ref();
    match (extension(path).as_str(), binary) {
        ("pcd", false) => write_pcd(path, cloud),
        ("pcd", true) => write_pcd_binary(path, cloud),
        ("ply", false) => write_ply(path, cloud),
        ("ply", true) => write_ply_binary(path, cloud),
        (other, _) => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("cannot write point clouds with extension {:?}", other),
        )),
    }
}
