use clap::{Parser, Subcommand};
use funding_rate_alert::{
    alert::{AlertService, Notifier, TelegramNotifier},
    config::AlertConfig,
    connectors::{ConnectorFactory, Exchange},
    strategy::{interval_mismatches, merge_funding_intervals},
    utils::logger,
    Result,
};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "funding-alert")]
#[command(about = "Cross-exchange funding rate alerts for Binance and Gate.io")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/alert.toml")]
    config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Log file path
    #[arg(long, default_value = "logs/funding-alert.log")]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll both exchanges and alert ahead of each funding settlement
    Run,
    /// Print one summary for the next settlement
    Once {
        /// Also deliver the summary to Telegram
        #[arg(long)]
        send: bool,

        /// Entries per ranking section
        #[arg(long)]
        top_n: Option<usize>,
    },
    /// Look up the current funding rate of one contract
    Rate {
        /// Exchange name (binance, gate)
        exchange: Exchange,

        /// Exchange-native symbol, e.g. BTCUSDT or BTC_USDT
        symbol: String,
    },
    /// List symbols whose funding interval differs between the exchanges
    Intervals,
    /// Validate configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    logger::init(&cli.log_level, &cli.log_file)?;

    info!("Starting {} v{}", funding_rate_alert::APP_NAME, funding_rate_alert::VERSION);

    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Run => run_alerts(config).await,
        Commands::Once { send, top_n } => run_once(config, send, top_n).await,
        Commands::Rate { exchange, symbol } => show_rate(config, exchange, &symbol).await,
        Commands::Intervals => show_interval_mismatches(config).await,
        Commands::Validate => validate_config(config),
    }
}

fn load_config(path: &Path) -> Result<AlertConfig> {
    if path.exists() {
        let config = AlertConfig::from_file(path)?;
        info!("Configuration loaded from: {}", path.display());
        Ok(config)
    } else {
        warn!("{} not found, building configuration from environment", path.display());
        Ok(AlertConfig::from_env())
    }
}

async fn run_alerts(config: AlertConfig) -> Result<()> {
    config.validate()?;
    config.telegram.validate_credentials()?;

    let mut service = AlertService::from_config(&config)?;
    service.run().await;

    Ok(())
}

async fn run_once(config: AlertConfig, send: bool, top_n: Option<usize>) -> Result<()> {
    config.validate()?;
    if send {
        config.telegram.validate_credentials()?;
    }

    let service = AlertService::from_config(&config)?;
    let summary = service.summarize().await?;
    let text = summary.format(top_n.unwrap_or(config.alert.top_n));

    println!("{}", text);
    info!("Seconds until settlement: {}", (summary.next_funding_time - Utc::now()).num_seconds());

    if send {
        TelegramNotifier::new(&config.telegram)?.send(&text).await?;
    }

    Ok(())
}

async fn show_rate(config: AlertConfig, exchange: Exchange, symbol: &str) -> Result<()> {
    let source = ConnectorFactory::create_source(exchange, &config)?;
    let lookup = source.get_funding_rate(symbol).await;

    if lookup.is_fallback() {
        println!("{} {}: {:.6} (fallback)", exchange, symbol, lookup.rate());
    } else {
        println!("{} {}: {:.6}", exchange, symbol, lookup.rate());
    }

    Ok(())
}

async fn show_interval_mismatches(config: AlertConfig) -> Result<()> {
    let binance = ConnectorFactory::create_source(Exchange::Binance, &config)?;
    let gate = ConnectorFactory::create_source(Exchange::Gate, &config)?;

    let pairs = merge_funding_intervals(
        &binance.fetch_funding_intervals().await?,
        &gate.fetch_funding_intervals().await?,
    );
    let mismatches = interval_mismatches(&pairs);

    println!("Compared {} symbols, {} with different funding intervals", pairs.len(), mismatches.len());
    for pair in pairs.iter().filter(|p| p.is_mismatch()) {
        println!(
            "{:<12} binance {:>4}  gate {:>4}",
            pair.canonical_symbol,
            format_interval(pair.binance_interval_secs),
            format_interval(pair.gate_interval_secs)
        );
    }

    Ok(())
}

fn format_interval(secs: u64) -> String {
    if secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}m", secs / 60)
    }
}

fn validate_config(config: AlertConfig) -> Result<()> {
    info!("Validating configuration...");

    match config.validate().and_then(|_| config.telegram.validate_credentials()) {
        Ok(_) => {
            info!("✅ Configuration is valid");
            println!("Configuration validation passed!");
            Ok(())
        }
        Err(e) => {
            error!("❌ Configuration validation failed: {}", e);
            Err(e)
        }
    }
}
