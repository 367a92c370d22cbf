use tracing::debug;

use routerwatch_core::LineReadings;

use crate::split::split_any;

pub const SPEED_MARKER: &str = "Connection Speed (Kbps)";
pub const WAN_STATUS_MARKER: &str = "var wanStatus =";

const CELL_DELIMS: &[&str] = &["<td>", "</td>"];
const READING_DELIMS: &[&str] = &[":", "&nbsp"];

const DOWN_SPEED_CELL: usize = 3;
const UP_SPEED_CELL: usize = 5;
const DOWN_ATTEN_CELL: usize = 9;
const UP_ATTEN_CELL: usize = 11;
const DOWN_SNR_CELL: usize = 15;
const UP_SNR_CELL: usize = 17;

/// Token positions of the three readings inside an attenuation/SNR cell.
const READING_TOKENS: [usize; 3] = [1, 4, 7];

/// Field index of `HH:MM:SS` in the underscore-separated WAN status string.
const WAN_UPTIME_FIELD: usize = 11;

/// Reads speeds, attenuation and SNR from the first well-formed statistics row.
pub fn parse_line_readings(lines: &[String]) -> Option<LineReadings> {
    lines
        .iter()
        .filter(|line| line.contains(SPEED_MARKER))
        .find_map(|line| {
            let readings = parse_speed_row(line);
            if readings.is_none() {
                debug!(line = %line, "statistics row malformed; skipping");
            }
            readings
        })
}

fn parse_speed_row(line: &str) -> Option<LineReadings> {
    let cells = split_any(line, CELL_DELIMS);
    let cell = |index: usize| cells.get(index).copied();

    Some(LineReadings {
        down_speed: cell(DOWN_SPEED_CELL)?.trim().parse().ok()?,
        up_speed: cell(UP_SPEED_CELL)?.trim().parse().ok()?,
        down_attenuation: parse_reading_triple(cell(DOWN_ATTEN_CELL)?)?,
        up_attenuation: parse_reading_triple(cell(UP_ATTEN_CELL)?)?,
        down_snr: parse_reading_triple(cell(DOWN_SNR_CELL)?)?,
        up_snr: parse_reading_triple(cell(UP_SNR_CELL)?)?,
    })
}

fn parse_reading_triple(cell: &str) -> Option<[f64; 3]> {
    let tokens = split_any(cell, READING_DELIMS);
    let mut values = [0.0; 3];
    for (slot, index) in values.iter_mut().zip(READING_TOKENS) {
        *slot = tokens.get(index)?.trim().parse().ok()?;
    }
    Some(values)
}

/// Seconds the line has been up, from the WAN status script variable.
pub fn parse_connect_secs(lines: &[String]) -> Option<i64> {
    lines
        .iter()
        .filter(|line| line.contains(WAN_STATUS_MARKER))
        .find_map(|line| {
            let field = line.split('_').nth(WAN_UPTIME_FIELD);
            let secs = field.and_then(elapsed_seconds);
            if secs.is_none() {
                debug!(line = %line, "WAN status has no usable uptime");
            }
            secs
        })
}

/// Converts `H:M:S` into seconds. Hours may exceed 24.
pub fn elapsed_seconds(value: &str) -> Option<i64> {
    let mut parts = value.split(':');
    let hours: i64 = parts.next()?.trim().parse().ok()?;
    let minutes: i64 = parts.next()?.trim().parse().ok()?;
    let seconds: i64 = parts.next()?.trim().parse().ok()?;
    Some(hours * 3600 + minutes * 60 + seconds)
}
