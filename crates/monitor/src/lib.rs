use std::io::Write;
use std::thread::sleep;
use std::time::Duration;

use anyhow::{Context, Result};
use time::OffsetDateTime;
use tracing::{error, info};

use console::{ColumnDisplay, DisplaySample};
use page_fetcher::PageSource;
use routerwatch_core::clock::{format_short, now_local};
use routerwatch_core::config::MonitorConfig;

pub mod status;
pub mod tracker;

pub use status::{RouterStatus, Sections};
pub use tracker::ChangeTracker;

pub const SECTION_TITLE: &str = "Line Monitor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Could not (re)open the router connection.
    ConnectFailed,
    /// Connected, but the line status could not be read; now disconnected.
    Lost,
    /// Nothing worth a new column.
    Unchanged,
    /// A new column was added and drawn.
    Rendered,
}

/// Polls line status and draws a column whenever speed or connect time moves.
pub struct Monitor<S: PageSource> {
    status: RouterStatus<S>,
    display: ColumnDisplay,
    tracker: ChangeTracker,
    state: LinkState,
    interval: Duration,
    redraw: bool,
}

impl<S: PageSource> Monitor<S> {
    pub fn new(status: RouterStatus<S>, config: &MonitorConfig) -> Self {
        let state = if status.is_connected() {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        };
        Self {
            status,
            display: ColumnDisplay::new(SECTION_TITLE, config.columns),
            tracker: ChangeTracker::new(config.connect_drift_secs),
            state,
            interval: Duration::from_secs(config.interval_secs),
            redraw: config.redraw,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn display(&self) -> &ColumnDisplay {
        &self.display
    }

    pub fn status_mut(&mut self) -> &mut RouterStatus<S> {
        &mut self.status
    }

    pub fn tick<W: Write>(&mut self, now: OffsetDateTime, out: &mut W) -> Result<TickOutcome> {
        if !self.status.is_connected() {
            self.state = LinkState::Disconnected;
        }
        if self.state == LinkState::Disconnected {
            if let Err(err) = self.status.open_connection() {
                error!(error = %format!("{err:#}"), "connection failed to router");
                return Ok(TickOutcome::ConnectFailed);
            }
            info!("connected to router");
            self.state = LinkState::Connected;
        }

        let Some(stats) = self.status.reload_status(now) else {
            error!("unable to get router status");
            self.status.close();
            self.state = LinkState::Disconnected;
            return Ok(TickOutcome::Lost);
        };

        if !self.tracker.observe(&stats) {
            return Ok(TickOutcome::Unchanged);
        }

        info!(
            down = stats.down_speed(),
            up = stats.up_speed(),
            connected = %format_short(stats.connected_at),
            "line status changed"
        );
        let sample = DisplaySample::new()
            .with("sample date", format_short(now))
            .with("connect date", format_short(stats.connected_at))
            .with("speed down", stats.down_speed())
            .with("speed up", stats.up_speed());
        self.display.add_column(sample)?;
        self.display
            .render(out, self.redraw)
            .context("draw monitor columns")?;
        Ok(TickOutcome::Rendered)
    }

    /// Ticks forever, or `max_ticks` times. The sleep between ticks is fixed.
    pub fn run<W: Write>(&mut self, out: &mut W, max_ticks: Option<u64>) -> Result<()> {
        let mut ticks = 0u64;
        loop {
            self.tick(now_local(), out)?;
            ticks += 1;
            if max_ticks.is_some_and(|max| ticks >= max) {
                return Ok(());
            }
            sleep(self.interval);
        }
    }
}
