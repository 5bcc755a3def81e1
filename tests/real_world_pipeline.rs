//! Real-world-style integration tests: a synthetic spinning-lidar frame with
//! realistic intensity statistics, pushed through load → colorize → save
//! in every supported encoding.

use std::time::Instant;

use rand::prelude::*;
use xyzi2rgb::{run, Args, SummaryViewer};
use xyzi2rgb_color::{intensity_to_rgb, xyzi_to_xyzrgb};
use xyzi2rgb_core::{PointCloud, PointXYZI};
use xyzi2rgb_io::{read_pcd_xyzi, read_pcd_xyzrgb, write_pcd_binary};

// ────────────────── helpers ──────────────────

/// 16 rings x 1800 azimuth steps, organized like a Velodyne frame. Road
/// returns are dim, lane markings and signs are bright, with a few
/// saturated returns above 255.
fn build_lidar_frame(seed: u64) -> PointCloud<PointXYZI> {
    let mut rng = StdRng::seed_from_u64(seed);
    let rings = 16;
    let steps = 1800;

    let mut points = Vec::with_capacity(rings * steps);
    for ring in 0..rings {
        let elevation = (-15.0f32 + 2.0 * ring as f32).to_radians();
        for step in 0..steps {
            let azimuth = (step as f32 / steps as f32) * std::f32::consts::TAU;
            let range = rng.gen_range(2.0f32..60.0);
            let x = range * elevation.cos() * azimuth.cos();
            let y = range * elevation.cos() * azimuth.sin();
            let z = range * elevation.sin();

            let roll = rng.gen_range(0.0f32..1.0);
            let intensity = if roll < 0.7 {
                rng.gen_range(0.0f32..40.0)
            } else if roll < 0.97 {
                rng.gen_range(40.0f32..255.0)
            } else {
                rng.gen_range(255.0f32..1024.0)
            };
            points.push(PointXYZI::new(x, y, z, intensity));
        }
    }
    PointCloud::organized(points, steps, rings)
}

// ────────────────── tests ──────────────────

#[test]
fn lidar_frame_colorize_end_to_end() {
    let frame = build_lidar_frame(244);
    let raw_count = frame.len();

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("frame_save_244.pcd");
    let output = dir.path().join("frame_save_244_rgb.pcd");
    write_pcd_binary(&input, &frame).unwrap();

    let t0 = Instant::now();
    let argv = [
        "xyzi2rgb",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--binary",
        "--show",
    ];
    let opts = <Args as clap::Parser>::parse_from(argv).options();
    let mut viewer = SummaryViewer::new(Vec::new());
    let summary = run(&opts, &mut viewer).unwrap();
    let elapsed = t0.elapsed();

    assert_eq!(summary.points, raw_count);
    assert!(summary.shown);

    let colored = read_pcd_xyzrgb(&output).unwrap();
    assert_eq!(colored.len(), raw_count);
    assert_eq!(colored.width(), 1800);
    assert_eq!(colored.height(), 16);

    for (src, dst) in frame.iter().zip(colored.iter()) {
        assert_eq!(src.x.to_bits(), dst.x.to_bits());
        assert_eq!(src.y.to_bits(), dst.y.to_bits());
        assert_eq!(src.z.to_bits(), dst.z.to_bits());
        assert_eq!(dst.rgb(), intensity_to_rgb(src.intensity.round() as i64));
    }

    let report = String::from_utf8(viewer.into_inner()).unwrap();
    assert!(report.starts_with(&format!("[cloud] {} points (organized 1800x16)", raw_count)));

    println!("=== Lidar frame colorize ===");
    println!("  Points:  {}", raw_count);
    println!("  Elapsed: {:?}", elapsed);
}

#[test]
fn ascii_and_binary_inputs_give_identical_colors() {
    let frame = build_lidar_frame(7);
    let dir = tempfile::tempdir().unwrap();

    let ascii = dir.path().join("frame.pcd");
    xyzi2rgb_io::write_pcd(&ascii, &frame).unwrap();
    let binary = dir.path().join("frame_bin.pcd");
    write_pcd_binary(&binary, &frame).unwrap();

    let from_ascii = xyzi_to_xyzrgb(&read_pcd_xyzi(&ascii).unwrap()).unwrap();
    let from_binary = xyzi_to_xyzrgb(&read_pcd_xyzi(&binary).unwrap()).unwrap();
    assert_eq!(from_ascii, from_binary);
}

#[test]
fn dim_returns_dominate_the_palette() {
    let frame = build_lidar_frame(11);
    let colored = xyzi_to_xyzrgb(&frame).unwrap();

    // Segment A keeps blue at 255; ~70% of the frame is below intensity 40.
    let bluish = colored.iter().filter(|p| p.rgb().b == 255).count();
    let ratio = bluish as f64 / colored.len() as f64;
    assert!(ratio > 0.5 && ratio < 0.8, "blue ratio {:.2}", ratio);
}
