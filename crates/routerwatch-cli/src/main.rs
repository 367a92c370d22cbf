use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use monitor::{RouterStatus, Sections};
use page_fetcher::{DirPageReader, HttpPageReader, PageSource};
use routerwatch_core::config::{Config, ConfigPaths};

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(
    name = "routerwatch",
    version,
    about = "Line status, firmware and attached devices from a Sky DSL router"
)]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,

    /// Display system details
    #[arg(short = 's', long)]
    system_details: bool,
    /// Display line details
    #[arg(short = 'l', long)]
    line_details: bool,
    /// Display attached devices
    #[arg(short = 'a', long)]
    attached_devices: bool,
    /// Display all information
    #[arg(long)]
    all: bool,
    /// Monitor changes in line status
    #[arg(short = 'm', long)]
    monitor: bool,

    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    password: Option<String>,
    /// Seconds between monitor polls
    #[arg(long)]
    interval: Option<u64>,
    /// Samples kept side by side in monitor mode
    #[arg(long)]
    columns: Option<usize>,
    /// Append log events to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Print each monitor update below the last instead of redrawing
    #[arg(long)]
    no_redraw: bool,
    /// Read saved pages from a directory instead of the router
    #[arg(long)]
    pages_dir: Option<PathBuf>,
    /// Print a JSON snapshot instead of tables
    #[arg(long)]
    json: bool,
    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn sections(&self) -> Sections {
        Sections {
            system: self.system_details || self.all,
            line: self.line_details || self.all,
            devices: self.attached_devices || self.all,
        }
    }

    fn apply_overrides(&self, mut config: Config) -> Result<Config> {
        if let Some(url) = &self.url {
            config.router.base_url = url.clone();
        }
        if let Some(username) = &self.username {
            config.router.username = username.clone();
        }
        if let Some(password) = &self.password {
            config.router.password = password.clone();
        }
        if let Some(interval) = self.interval {
            config.monitor.interval_secs = interval;
        }
        if let Some(columns) = self.columns {
            config.monitor.columns = columns;
        }
        if let Some(log_file) = &self.log_file {
            config.logging.log_file = Some(log_file.display().to_string());
        }
        if self.no_redraw {
            config.monitor.redraw = false;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = ConfigPaths::resolve()?;
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&paths.config_path)?,
    };
    let config = cli.apply_overrides(config)?;

    if cli.print_config {
        return commands::config::print_effective(&config);
    }

    let sections = cli.sections();
    if !sections.any() && !cli.monitor {
        return Err(anyhow::anyhow!(
            "nothing to show; pass --system-details, --line-details, --attached-devices, --all or --monitor"
        ));
    }

    logging::init(&config.logging.level, config.log_path(&paths).as_deref())?;
    if !console::enable_ansi() {
        warn!("terminal does not accept ANSI escapes; output may be garbled");
    }

    let source: Box<dyn PageSource> = match &cli.pages_dir {
        Some(dir) => Box::new(DirPageReader::new(dir.clone())),
        None => Box::new(HttpPageReader::new(&config.router)),
    };
    let mut status = RouterStatus::new(source, config.pages.clone());
    status
        .open_connection()
        .context("Unable to open a connection to the router")?;

    if sections.any() {
        commands::show::execute(&mut status, sections, cli.json)?;
    }
    if cli.monitor {
        commands::watch::execute(status, &config.monitor)?;
    }
    Ok(())
}
