use clap::Parser;
use tracing_subscriber::EnvFilter;
use xyzi2rgb::{run, Args, SummaryViewer};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut viewer = SummaryViewer::stdout();
    run(&args.options(), &mut viewer)?;
    Ok(())
}
