use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// Speed, attenuation and SNR cells from the line statistics table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineReadings {
    pub down_speed: u32,
    pub up_speed: u32,
    pub down_attenuation: [f64; 3],
    pub up_attenuation: [f64; 3],
    pub down_snr: [f64; 3],
    pub up_snr: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStats {
    #[serde(flatten)]
    pub readings: LineReadings,
    pub connect_secs: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub connected_at: OffsetDateTime,
}

impl LineStats {
    /// `connected_at` is derived from the capture time, so it jitters by poll latency.
    pub fn new(readings: LineReadings, connect_secs: i64, captured_at: OffsetDateTime) -> Self {
        Self {
            readings,
            connect_secs,
            connected_at: captured_at - Duration::seconds(connect_secs),
        }
    }

    pub fn down_speed(&self) -> u32 {
        self.readings.down_speed
    }

    pub fn up_speed(&self) -> u32 {
        self.readings.up_speed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemDetail {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub firmware_ver: Option<String>,
    pub dsl_firmware_ver: Option<String>,
}

impl SystemDetail {
    pub fn is_empty(&self) -> bool {
        self.manufacturer.is_none()
            && self.model.is_none()
            && self.firmware_ver.is_none()
            && self.dsl_firmware_ver.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedDevice {
    pub mac: String,
    pub ipv4: String,
    pub ipv6: String,
}

/// Devices keyed by display name.
pub type DeviceTable = BTreeMap<String, AttachedDevice>;

/// Everything read from the router in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterSnapshot {
    #[serde(with = "time::serde::rfc3339")]
    pub captured_at: OffsetDateTime,
    pub system: Option<SystemDetail>,
    pub line: Option<LineStats>,
    pub devices: Option<DeviceTable>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn readings() -> LineReadings {
        LineReadings {
            down_speed: 17000,
            up_speed: 1200,
            down_attenuation: [12.5, 20.0, 31.25],
            up_attenuation: [4.0, 8.0, 16.0],
            down_snr: [6.1, 6.2, 6.3],
            up_snr: [7.1, 7.2, 7.3],
        }
    }

    #[test]
    fn test_connected_at_is_capture_minus_elapsed() {
        let captured = datetime!(2024-03-10 12:00:00 UTC);
        let stats = LineStats::new(readings(), 3723, captured);
        assert_eq!(stats.connected_at, datetime!(2024-03-10 10:57:57 UTC));
    }

    #[test]
    fn test_snapshot_json() {
        let snapshot = RouterSnapshot {
            captured_at: datetime!(2024-03-10 12:00:00 UTC),
            system: Some(SystemDetail {
                model: Some("SR102".to_string()),
                ..SystemDetail::default()
            }),
            line: None,
            devices: Some(DeviceTable::new()),
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"captured_at\":\"2024-03-10T12:00:00Z\""));
        assert!(json.contains("\"model\":\"SR102\""));
    }
}
