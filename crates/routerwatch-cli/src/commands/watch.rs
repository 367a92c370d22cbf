use std::io::{self, Write};

use anyhow::Result;

use monitor::{Monitor, RouterStatus};
use page_fetcher::PageSource;
use routerwatch_core::config::MonitorConfig;

pub fn execute<S: PageSource>(status: RouterStatus<S>, config: &MonitorConfig) -> Result<()> {
    let mut monitor = Monitor::new(status, config);
    let mut stdout = io::stdout();
    writeln!(stdout)?;
    monitor.run(&mut stdout, None)
}
