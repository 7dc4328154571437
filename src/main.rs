use clap::Parser;
use tradepulse::cli::{Cli, Commands};
use tradepulse::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example")).expect("Invalid default config")
    });

    // Initialize telemetry
    let _guard = tradepulse::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting ingestion pipeline and API server");
            args.execute(config).await?;
        }
        Commands::News(args) => {
            tracing::info!("Starting news headline simulator");
            args.execute().await?;
        }
        Commands::Status => {
            println!("tradepulse status");
            println!("  Feed: {} {}", config.feed.exchange, config.feed.symbol);
            println!("  Status: Not running");
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Feed: {} {}", config.feed.exchange, config.feed.symbol);
            println!(
                "  Server: {}:{} (subscriber queue {})",
                config.server.host, config.server.port, config.server.subscriber_queue_capacity
            );
            println!(
                "  Analytics: window={}, min_samples={}, z_threshold={}",
                config.analytics.window_capacity,
                config.analytics.min_samples,
                config.analytics.z_score_threshold
            );
            println!(
                "  Trading: size={} BTC, starting balance ${}",
                config.trading.trade_size, config.trading.initial_usd
            );
        }
    }

    Ok(())
}
