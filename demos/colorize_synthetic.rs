use xyzi2rgb::{CloudViewer, SummaryViewer};
use xyzi2rgb_color::xyzi_to_xyzrgb;
use xyzi2rgb_core::{PointCloud, PointXYZI};

fn main() -> anyhow::Result<()> {
    // A 100 x 100 plane whose intensity sweeps 0..=300 along x
    let n = 100;
    let mut points = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            let intensity = col as f32 * 300.0 / (n - 1) as f32;
            points.push(PointXYZI::new(col as f32 * 0.1, row as f32 * 0.1, 0.0, intensity));
        }
    }
    let cloud = PointCloud::organized(points, n, n);
    println!("Input cloud: {} points", cloud.len());

    let colored = xyzi_to_xyzrgb(&cloud)?;

    let out = std::env::temp_dir().join("colorize_synthetic.ply");
    xyzi2rgb_io::write_xyzrgb(&out, &colored, false)?;
    println!("Wrote {}", out.display());

    SummaryViewer::stdout()
        .with_top_colors(5)
        .show(&colored, "synthetic sweep")?;
    Ok(())
}
