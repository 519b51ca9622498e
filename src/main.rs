//! BETSCOUT: sports-betting opportunity scanner.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds platform clients and runs the scan→rank→size loop with
//! graceful shutdown.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use betscout::api::{self, routes::ApiState};
use betscout::config::{self, AppConfig};
use betscout::data::coingecko::CoinGeckoClient;
use betscout::engine::cycle::{run_cycle, CycleReport};
use betscout::engine::scanner::MarketRouter;
use betscout::platforms::azuro::AzuroCatalog;
use betscout::platforms::overtime::OvertimeClient;
use betscout::platforms::SportsbookPlatform;
use betscout::strategy::odds::OddsEvaluator;
use betscout::strategy::stake::StakeSizer;
use betscout::strategy::{OpportunityScanner, ScanConfig};

const BANNER: &str = r#"
  ___  ___ _____ ___  ___ ___  _   _ _____
 | _ )| __|_   _/ __|/ __/ _ \| | | |_   _|
 | _ \| _|  | | \__ \ (_| (_) | |_| | | |
 |___/|___| |_| |___/\___\___/ \___/  |_|

  Sportsbook odds scanner and stake sizer
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load("config.toml")?;

    init_logging();

    println!("{BANNER}");
    info!(
        agent_name = %cfg.agent.name,
        scan_interval_secs = cfg.agent.scan_interval_secs,
        bankroll = %cfg.agent.bankroll,
        currency = %cfg.agent.currency,
        "BETSCOUT starting up"
    );

    // -- Initialise components -------------------------------------------

    let router = MarketRouter::new(build_platforms(&cfg)?);
    if router.platform_names().is_empty() {
        warn!("No platforms enabled; cycles will find no markets");
    }

    let scanner = OpportunityScanner::new(
        OddsEvaluator::default(),
        StakeSizer::default(),
        ScanConfig::from(&cfg.strategy),
    );

    let coingecko = if cfg.coingecko.enabled {
        let api_key = cfg
            .coingecko
            .api_key_env
            .as_deref()
            .and_then(|env| config::AppConfig::resolve_env(env).ok());
        Some(CoinGeckoClient::new(cfg.coingecko.base_url.clone(), api_key)?)
    } else {
        None
    };

    if let Some(client) = &coingecko {
        match client.trending().await {
            Ok(coins) => {
                let symbols: Vec<_> = coins.iter().take(5).map(|c| c.symbol.as_str()).collect();
                info!(trending = ?symbols, "Crypto market context");
            }
            Err(e) => warn!(error = %e, "CoinGecko unavailable at startup"),
        }
    }

    let state = Arc::new(ApiState::new(router, scanner, coingecko, cfg.agent.bankroll));

    if cfg.api.enabled {
        api::spawn_api(Arc::clone(&state), cfg.api.port);
    }

    // -- Main loop -------------------------------------------------------

    let mut interval = tokio::time::interval(Duration::from_secs(cfg.agent.scan_interval_secs));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_secs = cfg.agent.scan_interval_secs,
        "Entering main loop. Press Ctrl+C to stop."
    );

    let mut cycle_number = 0u64;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                cycle_number += 1;
                match run_cycle(&state.router, &state.scanner, state.bankroll, cycle_number).await {
                    Ok(report) => log_cycle_report(&report),
                    Err(e) => error!(cycle = cycle_number, error = %e, "Cycle failed, continuing to next"),
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!(cycles = cycle_number, "BETSCOUT shut down cleanly.");
    Ok(())
}

/// Enabled platforms in scan order.
fn build_platforms(cfg: &AppConfig) -> Result<Vec<Box<dyn SportsbookPlatform>>> {
    let mut platforms: Vec<Box<dyn SportsbookPlatform>> = Vec::new();

    if cfg.platforms.azuro.enabled {
        let catalog = AzuroCatalog::with_sample_markets();
        let catalog = match &cfg.platforms.azuro.sport {
            Some(sport) => catalog.with_sport_filter(sport.clone()),
            None => catalog,
        };
        platforms.push(Box::new(catalog));
    }

    if cfg.platforms.overtime.enabled {
        platforms.push(Box::new(OvertimeClient::new(
            cfg.platforms.overtime.base_url.clone(),
            cfg.platforms.overtime.network.clone(),
        )?));
    }

    Ok(platforms)
}

/// Log a cycle summary followed by one line per recommendation.
fn log_cycle_report(report: &CycleReport) {
    info!(
        cycle = report.cycle_number,
        scanned = report.markets_scanned,
        scored = report.outcomes_scored,
        rejected = report.outcomes_rejected,
        recommendations = report.recommendations.len(),
        total_stake = %report.total_recommended(),
        bankroll = %report.bankroll,
        "Cycle complete"
    );
    for (rank, rec) in report.recommendations.iter().enumerate() {
        info!(rank = rank + 1, "{rec}");
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("betscout=info"));

    if std::env::var("BETSCOUT_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
