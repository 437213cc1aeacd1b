//! Command implementations for the RTD CLI.
//!
//! One subcommand per dashboard action, plus `shell` for the interactive
//! multi-section view.

use anyhow::Context;
use clap::{Args, Subcommand};
use log::{error, info};
use rtd_model::client::{Backend, TelemetryClient};
use rtd_model::TestCaseForm;
use rtd_view::text;
use serde::Serialize;
use std::future::Future;
use std::io::{self, Write};

pub mod config;
pub mod dispatch;
pub mod error;
pub mod loader;
pub mod schedule;
pub mod shell;

#[cfg(test)]
mod fake;

use config::DashboardConfig;
use dispatch::{Ack, Dispatcher, Followup, ReportScope};
use loader::Loader;
use schedule::{DeferredRefresh, PollSchedule};

#[derive(Subcommand)]
pub enum Command {
    /// Show stat cards and recent executions
    Dashboard {
        /// Keep refreshing at the poll interval until interrupted
        #[arg(short, long)]
        watch: bool,
    },

    /// List registered test cases
    TestCases {
        /// Only enabled test cases
        #[arg(long)]
        enabled: bool,
    },

    /// List executions, newest first
    Executions {
        /// Only executions with this status (PENDING, RUNNING, PASSED, FAILED)
        #[arg(short, long, conflicts_with = "test_case")]
        status: Option<String>,
        /// Only executions of this test case
        #[arg(short, long)]
        test_case: Option<String>,
    },

    /// Start one test case
    Run {
        /// Test case identifier, e.g. TC-5G-001
        test_case_id: String,
    },

    /// Start every enabled test case
    RunAll,

    /// Start every test case of a technology
    RunTechnology { technology: String },

    /// Start every test case of a category
    RunCategory { category: String },

    /// Register a new test case
    CreateTestCase(CreateArgs),

    /// Enable a test case by database id
    Enable { id: i64 },

    /// Disable a test case by database id
    Disable { id: i64 },

    /// Build a report (weekly unless scoped)
    Report {
        #[arg(long, conflicts_with = "technology")]
        test_case: Option<String>,
        #[arg(long)]
        technology: Option<String>,
    },

    /// Failure prediction for a test case
    Predict {
        test_case_id: String,
        /// Include point predictions for power, EVM and duration
        #[arg(short, long)]
        detail: bool,
    },

    /// Show instrument status with simulated traces
    Instruments,

    /// Interactive dashboard reading commands from stdin
    Shell,
}

/// Fields of the creation form; thresholds are plain text so blanks
/// stay absent.
#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub test_case_id: String,
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub technology: String,
    #[arg(long, default_value = "")]
    pub category: String,
    /// Minimum expected power (dBm)
    #[arg(long, default_value = "")]
    pub power_min: String,
    /// Maximum expected power (dBm)
    #[arg(long, default_value = "")]
    pub power_max: String,
    #[arg(long, default_value = "")]
    pub frequency_hz: String,
    /// Maximum EVM (%)
    #[arg(long, default_value = "")]
    pub evm_max: String,
    /// Maximum ACPR (dB)
    #[arg(long, default_value = "")]
    pub acpr_max: String,
}

impl From<CreateArgs> for TestCaseForm {
    fn from(args: CreateArgs) -> Self {
        TestCaseForm {
            test_case_id: args.test_case_id,
            name: args.name,
            description: args.description,
            technology: args.technology,
            category: args.category,
            power_min: args.power_min,
            power_max: args.power_max,
            frequency_hz: args.frequency_hz,
            evm_max: args.evm_max,
            acpr_max: args.acpr_max,
        }
    }
}

/// How views are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

impl Output {
    fn emit<T: Serialize>(self, view: &T, render: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
        let mut stdout = io::stdout().lock();
        match self {
            Output::Text => write!(stdout, "{}", render(view))?,
            Output::Json => writeln!(stdout, "{}", serde_json::to_string_pretty(view)?)?,
        }
        stdout.flush()?;
        Ok(())
    }

    /// Status text goes to stderr under `--json` so stdout stays parseable.
    fn acknowledge(
        self,
        message: &str,
        stdout: &mut impl Write,
        stderr: &mut impl Write,
    ) -> io::Result<()> {
        match self {
            Output::Text => writeln!(stdout, "{}", message),
            Output::Json => writeln!(stderr, "{}", message),
        }
    }
}

pub async fn run(config: DashboardConfig, output: Output, command: Command) -> anyhow::Result<()> {
    let client = TelemetryClient::new(&config.api_base, config.request_timeout)
        .with_context(|| format!("Cannot use API base {}", config.api_base))?;
    info!("Using backend {}", config.api_base);
    execute(&client, &config, output, command).await
}

async fn execute<B: Backend + ?Sized>(
    backend: &B,
    config: &DashboardConfig,
    output: Output,
    command: Command,
) -> anyhow::Result<()> {
    let loader = Loader::new(backend, config.recent_limit);
    let dispatcher = Dispatcher::new(backend, config.refresh_delay);

    match command {
        Command::Dashboard { watch } => {
            show_dashboard(&loader, output).await?;
            if watch {
                watch_dashboard(&loader, config, output, tokio::signal::ctrl_c()).await?;
            }
        }
        Command::TestCases { enabled } => {
            output.emit(&loader.test_case_table(enabled).await, text::render_table)?;
        }
        Command::Executions { status, test_case } => {
            let table = match test_case {
                Some(id) => loader.executions_for_test_case(&id).await,
                None => loader.executions(status.as_deref()).await,
            }
            .context("Error loading executions")?;
            output.emit(&table, text::render_table)?;
        }
        Command::Run { test_case_id } => {
            let ack = dispatcher.run_test(&test_case_id).await?;
            follow_up(&loader, output, ack).await?;
        }
        Command::RunAll => {
            let ack = dispatcher.run_all().await?;
            follow_up(&loader, output, ack).await?;
        }
        Command::RunTechnology { technology } => {
            let ack = dispatcher.run_technology(&technology).await?;
            follow_up(&loader, output, ack).await?;
        }
        Command::RunCategory { category } => {
            let ack = dispatcher.run_category(&category).await?;
            follow_up(&loader, output, ack).await?;
        }
        Command::CreateTestCase(args) => {
            let (created, ack) = dispatcher.create_test_case(&args.into()).await?;
            info!(
                "Created test case {}",
                rtd_utils::fmt::text(created.test_case_id.as_deref())
            );
            follow_up(&loader, output, ack).await?;
        }
        Command::Enable { id } => {
            let ack = dispatcher.set_enabled(id, true).await?;
            follow_up(&loader, output, ack).await?;
        }
        Command::Disable { id } => {
            let ack = dispatcher.set_enabled(id, false).await?;
            follow_up(&loader, output, ack).await?;
        }
        Command::Report {
            test_case,
            technology,
        } => {
            let scope = match (test_case, technology) {
                (Some(id), _) => ReportScope::TestCase(id),
                (None, Some(t)) => ReportScope::Technology(t),
                (None, None) => ReportScope::Weekly,
            };
            let view = dispatcher.report(&scope).await?;
            output.emit(&view, text::render_report)?;
        }
        Command::Predict {
            test_case_id,
            detail,
        } => {
            let view = dispatcher
                .load_prediction(Some(&test_case_id), detail)
                .await?;
            output.emit(&view, text::render_prediction)?;
        }
        Command::Instruments => {
            let view = instruments::sampled();
            output.emit(&view, text::render_instruments)?;
        }
        Command::Shell => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            shell::Shell::new(backend, config, io::stdout())
                .run(stdin)
                .await?;
        }
    }
    Ok(())
}

async fn show_dashboard<B: Backend + ?Sized>(
    loader: &Loader<'_, B>,
    output: Output,
) -> anyhow::Result<()> {
    match loader.dashboard().await {
        Ok(view) => output.emit(&view, text::render_dashboard),
        Err(e) => {
            error!("Error loading dashboard: {}", e);
            Ok(())
        }
    }
}

/// Redraw the dashboard every poll interval until `stop` resolves.
///
/// `stop` is polled across iterations, so a signal that lands while a
/// redraw is in flight still ends the loop.
async fn watch_dashboard<B: Backend + ?Sized, F: Future>(
    loader: &Loader<'_, B>,
    config: &DashboardConfig,
    output: Output,
    stop: F,
) -> anyhow::Result<()> {
    let mut poll = PollSchedule::new(config.poll_interval);
    poll.apply(rtd_view::state::PollingChange::Start);
    tokio::pin!(stop);
    loop {
        tokio::select! {
            _ = &mut stop => {
                info!("Stopping dashboard refresh");
                return Ok(());
            }
            _ = poll.tick() => show_dashboard(loader, output).await?,
        }
    }
}

/// Print the acknowledgement, then reload what the command changed.
async fn follow_up<B: Backend + ?Sized>(
    loader: &Loader<'_, B>,
    output: Output,
    ack: Ack,
) -> anyhow::Result<()> {
    output.acknowledge(&ack.message, &mut io::stdout().lock(), &mut io::stderr().lock())?;
    match ack.followup {
        Followup::RefreshViews(delay) => {
            let mut refresh = DeferredRefresh::default();
            refresh.schedule(delay);
            refresh.fire().await;
            show_dashboard(loader, output).await?;
            match loader.executions(None).await {
                Ok(table) => output.emit(&table, text::render_table)?,
                Err(e) => error!("Error loading executions: {}", e),
            }
        }
        Followup::ReloadTestCases => {
            output.emit(&loader.test_cases().await, text::render_table)?;
        }
    }
    Ok(())
}

/// The instruments view fed with freshly sampled traces.
pub mod instruments {
    use rtd_data::sample::{signal_generator_trace, spectrum_trace};
    use rtd_data::series::{build_frequency_series, build_time_series};
    use rtd_view::instruments::{instruments_view, InstrumentsView};
    use rtd_view::state::ViewState;

    /// Feed one round of simulated samples into `state`.
    pub fn sample_into(state: &mut ViewState) {
        let mut rng = rand::thread_rng();
        let signal = signal_generator_trace(&mut rng);
        let spectrum = spectrum_trace(&mut rng);
        state.update_signal_chart(build_time_series(Some(&signal)));
        state.update_spectrum_chart(build_frequency_series(None, Some(&spectrum)));
    }

    pub fn sampled() -> InstrumentsView {
        let mut state = ViewState::new();
        sample_into(&mut state);
        instruments_view(state.signal_chart(), state.spectrum_chart())
    }
}
