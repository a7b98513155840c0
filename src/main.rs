use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use friendly_links::{
	Generator, Settings,
	enrich::{EnrichOptions, HttpFeedSource, HttpLinkProbe},
	github,
};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"), about, long_about = None)]
struct Cli {
	/// Path to the YAML configuration file
	#[arg(short, long, default_value = "config.yml")]
	config: PathBuf,

	/// Directory the group files are written into
	#[arg(short, long, default_value = "json")]
	output: PathBuf,

	/// Keep the originating issue under `raw` in every record, overriding the config file
	#[arg(long)]
	keep_raw: bool,

	/// Log as JSON lines instead of human-readable text
	#[arg(long)]
	json_logs: bool,
}

/// `RUST_LOG` first, then directives embedded at build time, then `info`.
/// `FRIENDLY_LINKS_TRACE_FILE` redirects events, as JSON, into that file.
fn init_tracing(json: bool) -> Result<()> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(option_env!("LOG_DIRECTIVES").unwrap_or("info")));

	let layer = match std::env::var_os("FRIENDLY_LINKS_TRACE_FILE") {
		Some(path) => {
			let file = std::fs::File::create(&path).wrap_err_with(|| format!("Failed to create trace file {}", PathBuf::from(&path).display()))?;
			fmt::layer().json().with_writer(std::sync::Mutex::new(file)).boxed()
		}
		None if json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
		None => fmt::layer().with_writer(std::io::stderr).boxed(),
	};

	tracing_subscriber::registry().with(layer).with(filter).init();
	Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	color_eyre::install()?;
	let cli = Cli::parse();
	init_tracing(cli.json_logs)?;

	let mut settings = Settings::load(&cli.config)?;
	if cli.keep_raw {
		settings.issues.keep_raw = true;
	}

	let options = EnrichOptions::default();
	let generator = Generator::new(
		settings,
		github::create_client()?,
		Arc::new(HttpLinkProbe::new(&options)?),
		Arc::new(HttpFeedSource::new(&options)?),
	);

	let grouped = generator.process().await.inspect_err(|e| tracing::error!("Generation failed: {e:#}"))?;
	generator.save(&grouped, &cli.output)?;

	tracing::info!("Friendly links generation completed successfully");
	Ok(())
}
