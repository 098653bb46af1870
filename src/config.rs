use std::path::PathBuf;

use clap::Parser;

/* Every option can also come from the environment (or a .env file, loaded in main) */
#[derive(Parser, Debug, Clone)]
#[command(
    name = "holdings-pool",
    about = "Rebuild current holdings from a brokerage activity export using pooled average cost"
)]
pub struct Config {
    /// Directory holding the single activity export of this run
    #[arg(long, env = "HOLDINGS_INBOX_DIR", default_value = "data/inbox")]
    pub inbox_dir: PathBuf,

    /// Explicit activity export, skips the inbox lookup
    #[arg(long, env = "HOLDINGS_INPUT")]
    pub input: Option<PathBuf>,

    #[arg(long, env = "HOLDINGS_OUTPUT", default_value = "data/holdings.csv")]
    pub output: PathBuf,

    /// Also write the snapshot as JSON
    #[arg(long, env = "HOLDINGS_JSON_OUTPUT")]
    pub json_output: Option<PathBuf>,

    #[arg(long, env = "HOLDINGS_ARCHIVE_DIR", default_value = "data/archive")]
    pub archive_dir: PathBuf,

    /// Leave the consumed export where it is
    #[arg(long, env = "HOLDINGS_NO_ARCHIVE")]
    pub no_archive: bool,
}
