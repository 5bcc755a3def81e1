#![forbid(unsafe_code)]

pub mod app;
pub mod viewer;

pub use app::{run, Args, ColorizeOptions, RunSummary};
pub use viewer::{CloudViewer, SummaryViewer};
