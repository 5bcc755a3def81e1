//! Display side of the pipeline.
//!
//! [`CloudViewer`] is the seam where an interactive window would plug in.
//! The built-in [`SummaryViewer`] renders a text report instead.

use std::io::{self, Write};

use hashbrown::HashMap;
use xyzi2rgb_core::{HasColor, PointCloud, PointXYZRGB, Rgb};

pub trait CloudViewer {
    fn show(&mut self, cloud: &PointCloud<PointXYZRGB>, label: &str) -> anyhow::Result<()>;
}

/// Writes point count, bounds and the most frequent colors to `out`.
pub struct SummaryViewer<W> {
    out: W,
    top_colors: usize,
}

impl SummaryViewer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> SummaryViewer<W> {
    pub fn new(out: W) -> Self {
        Self { out, top_colors: 8 }
    }

    pub fn with_top_colors(mut self, n: usize) -> Self {
        self.top_colors = n;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Colors sorted by descending count, ties broken by packed value.
pub fn color_histogram<P: HasColor>(cloud: &PointCloud<P>) -> Vec<(Rgb, usize)> {
    let mut counts: HashMap<Rgb, usize> = HashMap::new();
    for p in cloud.iter() {
        *counts.entry(Rgb::from(p.color())).or_insert(0) += 1;
    }
    let mut hist: Vec<(Rgb, usize)> = counts.into_iter().collect();
    hist.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| xyzi2rgb_core::rgb_to_bits(a.0).cmp(&xyzi2rgb_core::rgb_to_bits(b.0)))
    });
    hist
}

impl<W: Write> CloudViewer for SummaryViewer<W> {
    fn show(&mut self, cloud: &PointCloud<PointXYZRGB>, label: &str) -> anyhow::Result<()> {
        let w = &mut self.out;

        write!(w, "[{}] {} points", label, cloud.len())?;
        if cloud.is_organized() {
            write!(w, " (organized {}x{})", cloud.width(), cloud.height())?;
        }
        writeln!(w)?;

        let aabb = cloud.aabb();
        if aabb.is_empty() {
            writeln!(w, "bounds: none")?;
        } else {
            writeln!(
                w,
                "bounds: min [{:.3}, {:.3}, {:.3}] max [{:.3}, {:.3}, {:.3}]",
                aabb.min[0], aabb.min[1], aabb.min[2], aabb.max[0], aabb.max[1], aabb.max[2]
            )?;
            let [dx, dy, dz] = aabb.extent();
            writeln!(w, "extent: [{:.3}, {:.3}, {:.3}]", dx, dy, dz)?;
        }

        let hist = color_histogram(cloud);
        if !hist.is_empty() {
            writeln!(w, "colors ({} distinct):", hist.len())?;
            let total = cloud.len() as f64;
            for (color, count) in hist.iter().take(self.top_colors) {
                writeln!(
                    w,
                    "  #{:02X}{:02X}{:02X} {:>8} {:>6.1}%",
                    color.r,
                    color.g,
                    color.b,
                    count,
                    *count as f64 * 100.0 / total
                )?;
            }
        }

        w.flush()?;
        Ok(())
    }
}
