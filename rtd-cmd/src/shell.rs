//! Interactive shell: one section visible at a time, commands read from
//! a line stream while the dashboard polls in the background.
//!
//! Everything runs on the calling task. Input, the poll timer and the
//! deferred refresh are multiplexed with `tokio::select!`; a slow read
//! only delays the next event.

use crate::config::DashboardConfig;
use crate::dispatch::{Ack, Dispatcher, Followup, ReportScope};
use crate::error::CommandError;
use crate::instruments;
use crate::loader::Loader;
use crate::schedule::{DeferredRefresh, PollSchedule};
use log::{debug, error};
use rtd_model::client::Backend;
use rtd_view::instruments::instruments_view;
use rtd_view::state::{PollingChange, ViewMode, ViewState};
use rtd_view::text;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const HELP: &str = "\
Sections:  dashboard | test-cases | executions | reports | predictions | instruments
Commands:
  filter [STATUS]        status filter for executions (blank clears)
  run <ID>               start one test
  run-all                start every enabled test
  enable <ID>            enable a test case (database id)
  disable <ID>           disable a test case (database id)
  report                 weekly report
  report tc <ID>         report for one test case
  report tech <T>        report for one technology
  predict [ID] [detail]  failure prediction (selects ID)
  refresh                reload the visible section
  help | quit";

/// One parsed line of shell input.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellInput {
    Show(ViewMode),
    Filter(Option<String>),
    Run(String),
    RunAll,
    SetEnabled(i64, bool),
    Report(ReportScope),
    Predict { test_case_id: Option<String>, detail: bool },
    Refresh,
    Help,
    Quit,
    Empty,
    /// Anything else, with the reason it was not understood.
    Invalid(String),
}

pub fn parse_input(line: &str) -> ShellInput {
    let words: Vec<&str> = line.split_whitespace().collect();
    let (head, rest) = match words.split_first() {
        Some((head, rest)) => (head.to_ascii_lowercase(), rest),
        None => return ShellInput::Empty,
    };
    if let Some(mode) = ViewMode::parse(&head) {
        return ShellInput::Show(mode);
    }
    match (head.as_str(), rest) {
        ("filter", []) => ShellInput::Filter(None),
        ("filter", [status]) => ShellInput::Filter(Some(status.to_string())),
        ("run", [id]) => ShellInput::Run(id.to_string()),
        ("run-all", []) => ShellInput::RunAll,
        ("enable" | "disable", [id]) => match id.parse() {
            Ok(id) => ShellInput::SetEnabled(id, head == "enable"),
            Err(_) => ShellInput::Invalid(format!("not a test case id: {}", id)),
        },
        ("report", []) => ShellInput::Report(ReportScope::Weekly),
        ("report", ["tc", id]) => ShellInput::Report(ReportScope::TestCase(id.to_string())),
        ("report", ["tech", t]) => ShellInput::Report(ReportScope::Technology(t.to_string())),
        ("predict", args) => {
            let detail = args.last().is_some_and(|a| a.eq_ignore_ascii_case("detail"));
            let ids = if detail { &args[..args.len() - 1] } else { args };
            match ids {
                [] => ShellInput::Predict {
                    test_case_id: None,
                    detail,
                },
                [id] => ShellInput::Predict {
                    test_case_id: Some(id.to_string()),
                    detail,
                },
                _ => ShellInput::Invalid("usage: predict [ID] [detail]".to_string()),
            }
        }
        ("refresh", []) => ShellInput::Refresh,
        ("help" | "?", _) => ShellInput::Help,
        ("quit" | "exit" | "q", _) => ShellInput::Quit,
        _ => ShellInput::Invalid(format!("unknown command: {}", line.trim())),
    }
}

fn title(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Dashboard => "Dashboard",
        ViewMode::TestCases => "Test Cases",
        ViewMode::Executions => "Test Executions",
        ViewMode::Reports => "Test Reports",
        ViewMode::Predictions => "Predictions",
        ViewMode::Instruments => "Instruments",
    }
}

pub struct Shell<'a, B: Backend + ?Sized, W: Write> {
    backend: &'a B,
    config: &'a DashboardConfig,
    state: ViewState,
    poll: PollSchedule,
    deferred: DeferredRefresh,
    out: W,
}

impl<'a, B: Backend + ?Sized, W: Write> Shell<'a, B, W> {
    pub fn new(backend: &'a B, config: &'a DashboardConfig, out: W) -> Self {
        Self {
            backend,
            config,
            state: ViewState::new(),
            poll: PollSchedule::new(config.poll_interval),
            deferred: DeferredRefresh::default(),
            out,
        }
    }

    fn loader(&self) -> Loader<'a, B> {
        Loader::new(self.backend, self.config.recent_limit)
    }

    fn dispatcher(&self) -> Dispatcher<'a, B> {
        Dispatcher::new(self.backend, self.config.refresh_delay)
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Show the dashboard and process `input` until it ends or a quit.
    pub async fn run<R: AsyncBufRead + Unpin>(mut self, input: R) -> anyhow::Result<W> {
        let mut lines = input.lines();
        self.render().await?;
        if self.state.mode().polls() {
            self.poll.apply(PollingChange::Start);
        }

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if !self.handle(parse_input(&line)).await? {
                        break;
                    }
                }
                _ = self.poll.tick() => {
                    debug!("Poll tick");
                    self.render_dashboard().await?;
                }
                _ = self.deferred.fire() => {
                    self.refresh_after_run().await?;
                }
            }
        }
        Ok(self.out)
    }

    /// Apply one input. Returns `false` when the shell should exit.
    pub async fn handle(&mut self, input: ShellInput) -> anyhow::Result<bool> {
        match input {
            ShellInput::Show(mode) => {
                let change = self.state.navigate(mode);
                self.poll.apply(change);
                self.render().await?;
            }
            ShellInput::Filter(status) => {
                self.state.status_filter = status;
                let change = self.state.navigate(ViewMode::Executions);
                self.poll.apply(change);
                self.render().await?;
            }
            ShellInput::Run(id) => {
                let result = self.dispatcher().run_test(&id).await;
                self.acknowledge(result).await?;
            }
            ShellInput::RunAll => {
                let result = self.dispatcher().run_all().await;
                self.acknowledge(result).await?;
            }
            ShellInput::SetEnabled(id, enabled) => {
                let result = self.dispatcher().set_enabled(id, enabled).await;
                self.acknowledge(result).await?;
            }
            ShellInput::Report(scope) => match self.dispatcher().report(&scope).await {
                Ok(view) => write!(self.out, "{}", text::render_report(&view))?,
                Err(e) => writeln!(self.out, "{}", e)?,
            },
            ShellInput::Predict {
                test_case_id,
                detail,
            } => {
                if test_case_id.is_some() {
                    self.state.selected_test_case = test_case_id;
                }
                let selection = self.state.selected_test_case.clone();
                match self
                    .dispatcher()
                    .load_prediction(selection.as_deref(), detail)
                    .await
                {
                    Ok(view) => write!(self.out, "{}", text::render_prediction(&view))?,
                    Err(e) => writeln!(self.out, "{}", e)?,
                }
            }
            ShellInput::Refresh => self.render().await?,
            ShellInput::Help => writeln!(self.out, "{}", HELP)?,
            ShellInput::Quit => return Ok(false),
            ShellInput::Empty => {}
            ShellInput::Invalid(reason) => writeln!(self.out, "{} (type `help`)", reason)?,
        }
        self.out.flush()?;
        Ok(true)
    }

    async fn acknowledge(&mut self, result: Result<Ack, CommandError>) -> anyhow::Result<()> {
        let ack = match result {
            Ok(ack) => ack,
            Err(e) => {
                writeln!(self.out, "{}", e)?;
                return Ok(());
            }
        };
        writeln!(self.out, "{}", ack.message)?;
        match ack.followup {
            Followup::RefreshViews(delay) => self.deferred.schedule(delay),
            Followup::ReloadTestCases => {
                if self.state.mode() == ViewMode::TestCases {
                    self.render().await?;
                }
            }
        }
        Ok(())
    }

    /// Reload whichever of the dashboard and executions is visible.
    async fn refresh_after_run(&mut self) -> anyhow::Result<()> {
        match self.state.mode() {
            ViewMode::Dashboard | ViewMode::Executions => self.render().await,
            _ => Ok(()),
        }
    }

    async fn render_dashboard(&mut self) -> anyhow::Result<()> {
        match self.loader().dashboard().await {
            Ok(view) => {
                writeln!(self.out, "== {} ==", title(ViewMode::Dashboard))?;
                write!(self.out, "{}", text::render_dashboard(&view))?;
            }
            Err(e) => error!("Error loading dashboard: {}", e),
        }
        Ok(())
    }

    /// Render the visible section from a fresh load.
    async fn render(&mut self) -> anyhow::Result<()> {
        let mode = self.state.mode();
        if mode == ViewMode::Dashboard {
            return self.render_dashboard().await;
        }
        writeln!(self.out, "== {} ==", title(mode))?;
        match mode {
            ViewMode::Dashboard => {}
            ViewMode::TestCases => {
                let table = self.loader().test_cases().await;
                write!(self.out, "{}", text::render_table(&table))?;
            }
            ViewMode::Executions => {
                let filter = self.state.status_filter.clone();
                match self.loader().executions(filter.as_deref()).await {
                    Ok(table) => write!(self.out, "{}", text::render_table(&table))?,
                    Err(e) => error!("Error loading executions: {}", e),
                }
            }
            ViewMode::Reports => writeln!(self.out, "Type `report` to generate the weekly report.")?,
            ViewMode::Predictions => match self.loader().prediction_options().await {
                Ok(options) => writeln!(self.out, "{}", text::render_options(&options))?,
                Err(e) => error!("Error loading test cases: {}", e),
            },
            ViewMode::Instruments => {
                instruments::sample_into(&mut self.state);
                let view = instruments_view(self.state.signal_chart(), self.state.spectrum_chart());
                write!(self.out, "{}", text::render_instruments(&view))?;
            }
        }
        Ok(())
    }
}
