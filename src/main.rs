use anyhow::Context;
use clap::Parser;
use flyyer::config::Config;
use flyyer::constants::DEFAULT_CONFIG_FILE;
use std::path::PathBuf;

/// Flyyer URL generator - builds signed image-rendering URLs from a config file
#[derive(Parser, Debug)]
#[command(name = "flyyer")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Validate configuration and exit
    #[arg(long)]
    check: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging subsystem
    flyyer::logging::init_subscriber()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialize logging subsystem")?;

    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration from file
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        config_file = %args.config.display(),
        project = config.project.is_some(),
        render = config.render.is_some(),
        strategy = config.strategy.as_deref().unwrap_or("none"),
        "Configuration loaded successfully"
    );

    if args.check {
        return Ok(());
    }

    let href = config.href().context("Failed to build URL")?;
    println!("{}", href);
    Ok(())
}
