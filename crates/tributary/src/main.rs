use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tributary::config::{OutputFormat, Settings};
use tributary::error::CliError;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    config: Option<String>,

    /// Only analyze the demo query with this name.
    #[arg(short, long)]
    query: Option<String>,

    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
}

fn main() -> Result<(), CliError> {
    let args = Args::parse();
    let settings = Settings::new(args.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = args.format.unwrap_or(settings.format);
    let output = tributary::run(args.query.as_deref(), format, settings.sorted_output)?;
    println!("{output}");
    Ok(())
}
