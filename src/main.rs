use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use holdings_pool::{config::Config, functions::run};

fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();

    match run(&config) {
        Ok(report) => {
            if report.summary.clamped_sells > 0 {
                warn!(
                    "{} sells exceeded the held quantity and were clamped",
                    report.summary.clamped_sells
                );
            }
            info!(
                "Done: {} buys, {} sells, {} open positions out of {} pools",
                report.summary.buys,
                report.summary.sells,
                report.summary.open_positions,
                report.summary.pools
            );
        }
        Err(e) => {
            error!("{e}");
            std::process::exit(e.exit_code());
        }
    }
}
