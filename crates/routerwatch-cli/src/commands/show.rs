use std::io::{self, Write};

use anyhow::Result;
use tracing::warn;

use console::{render_json, write_attached_devices, write_line_details, write_system_details};
use monitor::{RouterStatus, Sections};
use page_fetcher::PageSource;
use routerwatch_core::clock::now_local;

/// One-shot display of the selected sections.
///
/// A failed page read drops the connection, so each section reconnects first.
pub fn execute<S: PageSource>(
    status: &mut RouterStatus<S>,
    sections: Sections,
    json: bool,
) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write_sections(status, sections, json, &mut stdout)
}

fn write_sections<S: PageSource, W: Write>(
    status: &mut RouterStatus<S>,
    sections: Sections,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let now = now_local();

    if json {
        let snapshot = status.snapshot(sections, now);
        writeln!(out, "{}", render_json(&snapshot))?;
        return Ok(());
    }

    if sections.system {
        status.ensure_connected();
        let detail = status.get_system_details();
        if detail.is_empty() {
            warn!("system details unavailable");
        }
        write_system_details(out, &detail)?;
    }

    if sections.line {
        status.ensure_connected();
        match status.get_line_status(now) {
            Some(stats) => write_line_details(out, stats)?,
            None => warn!("line details unavailable"),
        }
    }

    if sections.devices {
        status.ensure_connected();
        match status.get_attached_devices() {
            Some(devices) => write_attached_devices(out, devices)?,
            None => warn!("attached devices unavailable"),
        }
    }

    Ok(())
}
