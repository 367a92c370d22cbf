use anyhow::Result;
use time::OffsetDateTime;
use tracing::{debug, warn};

use page_fetcher::PageSource;
use page_parser::{
    parse_attached_devices, parse_connect_secs, parse_line_readings, parse_system_details,
};
use routerwatch_core::config::PageConfig;
use routerwatch_core::{DeviceTable, LineStats, RouterSnapshot, RouterWatchError, SystemDetail};

/// Which sections a snapshot should read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sections {
    pub system: bool,
    pub line: bool,
    pub devices: bool,
}

impl Sections {
    pub fn all() -> Self {
        Self {
            system: true,
            line: true,
            devices: true,
        }
    }

    pub fn any(&self) -> bool {
        self.system || self.line || self.devices
    }
}

/// The router's pages seen through one page source, plus the latest parsed state.
pub struct RouterStatus<S: PageSource> {
    source: S,
    pages: PageConfig,
    line_stats: Option<LineStats>,
    devices: Option<DeviceTable>,
}

impl<S: PageSource> RouterStatus<S> {
    pub fn new(source: S, pages: PageConfig) -> Self {
        Self {
            source,
            pages,
            line_stats: None,
            devices: None,
        }
    }

    pub fn open_connection(&mut self) -> Result<()> {
        self.source.open()
    }

    pub fn is_connected(&self) -> bool {
        self.source.is_open()
    }

    pub fn close(&mut self) {
        self.source.close();
    }

    /// Reopens a source dropped by an earlier failed read.
    pub fn ensure_connected(&mut self) -> bool {
        if self.source.is_open() {
            return true;
        }
        match self.source.open() {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "reconnect to router failed");
                false
            }
        }
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Empty when the page cannot be read or carries none of the fields.
    pub fn get_system_details(&mut self) -> SystemDetail {
        let page = self.pages.system_details.clone();
        match self.read(&page) {
            Some(lines) => parse_system_details(&lines),
            None => SystemDetail::default(),
        }
    }

    /// Reads speeds from the statistics page and uptime from the WAN page.
    /// Both must parse for the line status to be replaced.
    pub fn get_line_status(&mut self, captured_at: OffsetDateTime) -> Option<&LineStats> {
        let stats_page = self.pages.line_stats.clone();
        let wan_page = self.pages.wan_status.clone();

        let readings = self.read(&stats_page).and_then(|lines| {
            let readings = parse_line_readings(&lines);
            if readings.is_none() {
                warn!(
                    error = %parse_failure(&stats_page, "statistics row not found"),
                    "line status unavailable"
                );
            }
            readings
        })?;
        let connect_secs = self.read(&wan_page).and_then(|lines| {
            let secs = parse_connect_secs(&lines);
            if secs.is_none() {
                warn!(
                    error = %parse_failure(&wan_page, "wanStatus uptime not found"),
                    "line status unavailable"
                );
            }
            secs
        })?;

        self.line_stats = Some(LineStats::new(readings, connect_secs, captured_at));
        self.line_stats.as_ref()
    }

    /// `None` when the page cannot be read or the device list is malformed.
    pub fn get_attached_devices(&mut self) -> Option<&DeviceTable> {
        let page = self.pages.attached_devices.clone();
        let lines = self.read(&page);
        self.devices = match lines.map(|lines| parse_attached_devices(&lines)) {
            Some(Ok(devices)) => Some(devices),
            Some(Err(err)) => {
                warn!(page = %page, error = %err, "device list discarded");
                None
            }
            None => None,
        };
        self.devices.as_ref()
    }

    /// Refreshes line status and the device list for one monitor tick.
    ///
    /// Only the line status decides success; a bad device list is logged and
    /// the connection it dropped is reopened for the next tick.
    pub fn reload_status(&mut self, captured_at: OffsetDateTime) -> Option<LineStats> {
        let stats = self.get_line_status(captured_at)?.clone();
        if self.get_attached_devices().is_none() {
            warn!("attached devices unavailable this cycle");
            self.ensure_connected();
        }
        Some(stats)
    }

    /// Reads the selected sections, reconnecting between them as needed.
    pub fn snapshot(&mut self, sections: Sections, captured_at: OffsetDateTime) -> RouterSnapshot {
        let system = if sections.system && self.ensure_connected() {
            Some(self.get_system_details()).filter(|detail| !detail.is_empty())
        } else {
            None
        };
        let line = if sections.line && self.ensure_connected() {
            self.get_line_status(captured_at).cloned()
        } else {
            None
        };
        let devices = if sections.devices && self.ensure_connected() {
            self.get_attached_devices().cloned()
        } else {
            None
        };
        RouterSnapshot {
            captured_at,
            system,
            line,
            devices,
        }
    }

    fn read(&mut self, page: &str) -> Option<Vec<String>> {
        match self.source.read_page(page) {
            Ok(lines) => Some(lines),
            Err(err) => {
                debug!(page, error = %format!("{err:#}"), "page unavailable");
                None
            }
        }
    }
}

fn parse_failure(page: &str, reason: &str) -> RouterWatchError {
    RouterWatchError::Parse {
        page: page.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use page_fetcher::MemoryPages;
    use routerwatch_core::Config;
    use time::macros::datetime;

    pub(crate) fn stats_page(down: u32, up: u32) -> String {
        format!(
            "<table>\n<tr><td>Connection Speed (Kbps)</td><td>{down}</td><td>{up}</td></tr>\
             <tr><td>Line Attenuation (dB)</td><td>D1:12.5&nbsp;dB&nbsp;D2:20.0&nbsp;dB&nbsp;D3:31.0&nbsp;dB</td>\
             <td>U1:4.0&nbsp;dB&nbsp;U2:8.0&nbsp;dB&nbsp;U3:16.0&nbsp;dB</td></tr>\
             <tr><td>Noise Margin (dB)</td><td>D1:6.1&nbsp;dB&nbsp;D2:6.2&nbsp;dB&nbsp;D3:6.3&nbsp;dB</td>\
             <td>U1:7.1&nbsp;dB&nbsp;U2:7.2&nbsp;dB&nbsp;U3:7.3&nbsp;dB</td></tr>\n</table>"
        )
    }

    pub(crate) fn wan_page(uptime: &str) -> String {
        format!("<script>\nvar wanStatus = '1_0_PPPoE_Connected_a_b_c_d_e_f_g_{uptime}_end';\n</script>")
    }

    pub(crate) const DEVICES_PAGE: &str = "var attach_dev = 'aa:bb:cc:00:00:01<br>laptop<br>192.168.0.2<br>laptop-v6<br>fe80::1<lf>\
        aa:bb:cc:00:00:02<br>-<br>192.168.0.3<br>phone<br>fe80::2<lf>';";

    const STATUS_PAGE: &str = "<tr><td><span>Manufacturer</span>Sky</span></td></tr>\n\
        <tr><td><span>Model</span>SR102</span></td></tr>";

    pub(crate) fn router_pages(down: u32, up: u32, uptime: &str) -> MemoryPages {
        let pages = Config::default_config().pages;
        MemoryPages::new()
            .with_page(&pages.line_stats, &stats_page(down, up))
            .with_page(&pages.wan_status, &wan_page(uptime))
            .with_page(&pages.attached_devices, DEVICES_PAGE)
            .with_page(&pages.system_details, STATUS_PAGE)
    }

    fn status(pages: MemoryPages) -> RouterStatus<MemoryPages> {
        let mut status = RouterStatus::new(pages, Config::default_config().pages);
        status.open_connection().unwrap();
        status
    }

    #[test]
    fn test_line_status_combines_both_pages() {
        let mut status = status(router_pages(17000, 1200, "01:00:00"));
        let now = datetime!(2024-03-05 12:00:00 UTC);

        let stats = status.get_line_status(now).unwrap();
        assert_eq!(stats.down_speed(), 17000);
        assert_eq!(stats.up_speed(), 1200);
        assert_eq!(stats.connect_secs, 3600);
        assert_eq!(stats.connected_at, datetime!(2024-03-05 11:00:00 UTC));
    }

    #[test]
    fn test_missing_wan_page_keeps_previous_stats() {
        let mut status = status(router_pages(17000, 1200, "01:00:00"));
        let now = datetime!(2024-03-05 12:00:00 UTC);
        assert!(status.get_line_status(now).is_some());

        let pages = Config::default_config().pages;
        status.source_mut().set_page(&pages.wan_status, "<html></html>");
        assert!(status.get_line_status(now).is_none());
        assert_eq!(status.line_stats.as_ref().map(LineStats::down_speed), Some(17000));
    }

    #[test]
    fn test_system_details_and_devices() {
        let mut status = status(router_pages(1, 1, "00:00:01"));
        let detail = status.get_system_details();
        assert_eq!(detail.manufacturer.as_deref(), Some("Sky"));
        assert_eq!(detail.model.as_deref(), Some("SR102"));

        let devices = status.get_attached_devices().unwrap();
        assert_eq!(devices.keys().collect::<Vec<_>>(), vec!["laptop", "phone"]);
    }

    #[test]
    fn test_unreadable_pages_degrade_to_empty() {
        let mut status = status(MemoryPages::new());
        assert!(status.get_system_details().is_empty());
        assert!(status.get_attached_devices().is_none());
        assert!(!status.is_connected());
    }

    #[test]
    fn test_snapshot_reopens_closed_source() {
        let pages = Config::default_config().pages;
        let mut source = router_pages(17000, 1200, "00:10:00");
        source.set_page(&pages.system_details, "");
        let mut status = RouterStatus::new(source, pages);
        status.open_connection().unwrap();
        status.source_mut().close();

        let snapshot = status.snapshot(Sections::all(), datetime!(2024-03-05 12:00:00 UTC));
        assert!(snapshot.system.is_none());
        assert!(snapshot.line.is_some());
        assert_eq!(status.source_mut().opens, 2);
    }

    #[test]
    fn test_missing_device_page_keeps_source_open() {
        let pages = Config::default_config().pages;
        let source = MemoryPages::new()
            .with_page(&pages.line_stats, &stats_page(17000, 1200))
            .with_page(&pages.wan_status, &wan_page("01:00:00"));
        let mut status = status(source);

        let now = datetime!(2024-03-05 12:00:00 UTC);
        assert!(status.reload_status(now).is_some());
        assert!(status.is_connected());
        assert_eq!(status.source_mut().opens, 2);
    }

    #[test]
    fn test_snapshot_respects_sections() {
        let mut status = status(router_pages(17000, 1200, "00:10:00"));
        let now = datetime!(2024-03-05 12:00:00 UTC);
        let snapshot = status.snapshot(
            Sections {
                system: false,
                line: true,
                devices: true,
            },
            now,
        );
        assert!(snapshot.system.is_none());
        assert_eq!(snapshot.line.map(|line| line.connect_secs), Some(600));
        assert_eq!(snapshot.devices.map(|devices| devices.len()), Some(2));
    }
}
