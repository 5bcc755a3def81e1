use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use xyzi2rgb_color::{ChannelOverflow, CloudConverter, ColorRamp, Quantization};

use crate::viewer::CloudViewer;

/// Colorize an XYZI point cloud by intensity and show or save it as XYZRGB.
///
/// Without `--output` the colored cloud is shown; with it the cloud is
/// written (`.pcd` or `.ply`) and only shown when `--show` is also given.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Input cloud (`.pcd` or `.las`)
    pub input: PathBuf,

    /// Write the colored cloud here (`.pcd` or `.ply`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use the binary encoding for the output file
    #[arg(long)]
    pub binary: bool,

    /// Show the colored cloud even when writing an output file
    #[arg(long)]
    pub show: bool,

    /// Label of the viewer window
    #[arg(long, default_value = "cloud", env = "XYZI2RGB_LABEL")]
    pub label: String,

    /// Saturate out-of-range channels instead of wrapping them (changes
    /// colors for intensities above 255)
    #[arg(long)]
    pub clamp: bool,

    /// Truncate fractional intensities instead of rounding them
    #[arg(long)]
    pub truncate: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn options(&self) -> ColorizeOptions {
        let overflow = if self.clamp {
            ChannelOverflow::Clamp
        } else {
            ChannelOverflow::Wrap
        };
        let quantization = if self.truncate {
            Quantization::Truncate
        } else {
            Quantization::Round
        };

        ColorizeOptions {
            input: self.input.clone(),
            output: self.output.clone(),
            binary: self.binary,
            show: self.show || self.output.is_none(),
            label: self.label.clone(),
            converter: CloudConverter::new(ColorRamp::new(overflow), quantization),
        }
    }

    /// Default log filter for the verbosity flag.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColorizeOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub binary: bool,
    pub show: bool,
    pub label: String,
    pub converter: CloudConverter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub points: usize,
    pub written: Option<PathBuf>,
    pub shown: bool,
}

/// Load, convert, then write and/or show.
pub fn run(opts: &ColorizeOptions, viewer: &mut dyn CloudViewer) -> anyhow::Result<RunSummary> {
    let input = xyzi2rgb_io::read_xyzi(&opts.input).with_context(|| {
        format!("failed to load point cloud from {}", opts.input.display())
    })?;
    info!(path = %opts.input.display(), points = input.len(), "loaded cloud");

    let colored = opts
        .converter
        .convert(&input)
        .with_context(|| format!("failed to colorize {}", opts.input.display()))?;

    if let Some(out) = &opts.output {
        xyzi2rgb_io::write_xyzrgb(out, &colored, opts.binary)
            .with_context(|| format!("failed to write {}", out.display()))?;
        info!(path = %out.display(), binary = opts.binary, "wrote colored cloud");
    }

    if opts.show {
        viewer.show(&colored, &opts.label)?;
    }

    Ok(RunSummary {
        points: colored.len(),
        written: opts.output.clone(),
        shown: opts.show,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_show_without_output() {
        let args = Args::parse_from(["xyzi2rgb", "scan.pcd"]);
        let opts = args.options();
        assert!(opts.show);
        assert_eq!(opts.output, None);
        assert_eq!(opts.converter, CloudConverter::default());
        assert_eq!(args.log_level(), "info");
    }

    #[test]
    fn output_disables_show_unless_requested() {
        let args = Args::parse_from(["xyzi2rgb", "scan.las", "-o", "out.ply", "--binary"]);
        let opts = args.options();
        assert!(!opts.show);
        assert!(opts.binary);

        let args = Args::parse_from(["xyzi2rgb", "scan.las", "-o", "out.ply", "--show"]);
        assert!(args.options().show);
    }

    #[test]
    fn deviation_flags_configure_converter() {
        let args = Args::parse_from(["xyzi2rgb", "scan.pcd", "--clamp", "--truncate", "-vv"]);
        let opts = args.options();
        assert_eq!(opts.converter.ramp.overflow, ChannelOverflow::Clamp);
        assert_eq!(opts.converter.quantization, Quantization::Truncate);
        assert_eq!(args.log_level(), "trace");
    }

    #[test]
    fn input_is_required() {
        assert!(Args::try_parse_from(["xyzi2rgb"]).is_err());
    }
}
