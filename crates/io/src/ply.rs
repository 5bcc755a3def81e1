use std::fs;
use std::io::{self, BufWriter, Write as _};
use std::path::Path;

use xyzi2rgb_core::{PointCloud, PointXYZRGB};

fn header(format: &str, len: usize) -> String {
    let mut out = String::new();
    out.push_str("ply\n");
    out.push_str(&format!("format {} 1.0\n", format));
    out.push_str("comment colorized by intensity\n");
    out.push_str(&format!("element vertex {}\n", len));
    out.push_str("property float x\n");
    out.push_str("property float y\n");
    out.push_str("property float z\n");
    out.push_str("property uchar red\n");
    out.push_str("property uchar green\n");
    out.push_str("property uchar blue\n");
    out.push_str("end_header\n");
    out
}

/// Writes a colored cloud as ASCII PLY with the color unpacked into
/// `uchar red/green/blue` vertex properties.
pub fn write_ply(path: impl AsRef<Path>, cloud: &PointCloud<PointXYZRGB>) -> io::Result<()> {
    let mut out = header("ascii", cloud.len());
    for p in cloud.iter() {
        let c = p.rgb();
        out.push_str(&format!(
            "{} {} {} {} {} {}\n",
            p.x, p.y, p.z, c.r, c.g, c.b
        ));
    }
    fs::write(path, out)
}

/// Binary little-endian variant of [`write_ply`].
pub fn write_ply_binary(
    path: impl AsRef<Path>,
    cloud: &PointCloud<PointXYZRGB>,
) -> io::Result<()> {
    let file = fs::File::create(path)?;
    let mut w = BufWriter::new(file);

    w.write_all(header("binary_little_endian", cloud.len()).as_bytes())?;
    for p in cloud.iter() {
        w.write_all(&p.x.to_le_bytes())?;
        w.write_all(&p.y.to_le_bytes())?;
        w.write_all(&p.z.to_le_bytes())?;
        w.write_all(&p.rgb().to_array())?;
    }

    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;
    use xyzi2rgb_core::Rgb;

    fn sample() -> PointCloud<PointXYZRGB> {
        PointCloud::from_points(vec![
            PointXYZRGB::new(1.0, 2.0, 3.0, Rgb::new(0, 150, 255)),
            PointXYZRGB::new(-1.5, 0.0, 4.25, Rgb::new(255, 111, 0)),
        ])
    }

    #[test]
    fn ascii_ply_unpacks_colors() {
        let tmp = NamedTempFile::new().unwrap();
        write_ply(tmp.path(), &sample()).unwrap();
        let text = fs::read_to_string(tmp.path()).unwrap();

        assert!(text.starts_with("ply\nformat ascii 1.0\n"));
        assert!(text.contains("element vertex 2\n"));
        let body: Vec<&str> = text.split("end_header\n").nth(1).unwrap().lines().collect();
        assert_eq!(body, vec!["1 2 3 0 150 255", "-1.5 0 4.25 255 111 0"]);
    }

    #[test]
    fn binary_ply_layout() {
        let tmp = NamedTempFile::new().unwrap();
        write_ply_binary(tmp.path(), &sample()).unwrap();
        let raw = fs::read(tmp.path()).unwrap();

        let marker = b"end_header\n";
        let start = raw
            .windows(marker.len())
            .position(|w| w == marker)
            .unwrap()
            + marker.len();
        let body = &raw[start..];
        // 3 floats + 3 bytes per vertex
        assert_eq!(body.len(), 2 * 15);
        assert_eq!(&body[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&body[12..15], &[0, 150, 255]);
        assert_eq!(&body[27..30], &[255, 111, 0]);
    }

    #[test]
    fn empty_cloud_writes_header_only() {
        let tmp = NamedTempFile::new().unwrap();
        write_ply(tmp.path(), &PointCloud::new()).unwrap();
        let text = fs::read_to_string(tmp.path()).unwrap();
        assert!(text.contains("element vertex 0\n"));
        assert!(text.ends_with("end_header\n"));
    }
}
