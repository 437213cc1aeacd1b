//! RTD CLI - terminal dashboard for radio test executions.

use clap::Parser;
use rtd_cmd::config::DashboardConfig;
use rtd_cmd::error::CommandError;
use rtd_cmd::Output;

#[derive(Parser)]
#[command(
    name = "rtd-cli",
    version,
    about = "Radio test telemetry dashboard"
)]
struct Cli {
    /// Backend base path (overrides RTD_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Rows in the recent-executions table (overrides RTD_RECENT_LIMIT)
    #[arg(long, global = true)]
    recent_limit: Option<usize>,

    /// Print views as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: rtd_cmd::Command,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = DashboardConfig::load();
    if let Some(base) = cli.api_base {
        config.api_base = base;
    }
    if let Some(limit) = cli.recent_limit {
        config.recent_limit = limit;
    }
    log::debug!("{:?}", config);

    let output = if cli.json { Output::Json } else { Output::Text };
    if let Err(err) = rtd_cmd::run(config, output, cli.command).await {
        match err.downcast_ref::<CommandError>() {
            Some(e) => eprintln!("{}", e),
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }
    Ok(())
}
