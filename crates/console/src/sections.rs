use std::io::{self, Write};

use crossterm::style::Stylize;

use routerwatch_core::clock::format_short;
use routerwatch_core::{DeviceTable, LineStats, SystemDetail};

const MISSING: &str = "-";

pub fn write_system_details<W: Write>(out: &mut W, detail: &SystemDetail) -> io::Result<()> {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| MISSING.to_string());

    writeln!(out, "{}", "Router System Details".bold())?;
    writeln!(out, "  Manufacturer:         {}", field(&detail.manufacturer))?;
    writeln!(out, "  Model:                {}", field(&detail.model))?;
    writeln!(out, "  Firmware Version:     {}", field(&detail.firmware_ver))?;
    writeln!(out, "  DSL Firmware Version: {}", field(&detail.dsl_firmware_ver))?;
    writeln!(out)
}

pub fn write_line_details<W: Write>(out: &mut W, stats: &LineStats) -> io::Result<()> {
    let readings = &stats.readings;
    writeln!(out, "{}", "Line Details".bold())?;
    writeln!(out, "  Connected Date: {}", format_short(stats.connected_at))?;
    writeln!(out, "  Speed Down:     {}", readings.down_speed)?;
    writeln!(out, "  Speed Up:       {}", readings.up_speed)?;
    writeln!(out, "  Atten Down:     {}", triple(&readings.down_attenuation))?;
    writeln!(out, "  Atten Up:       {}", triple(&readings.up_attenuation))?;
    writeln!(out, "  SNR Down:       {}", triple(&readings.down_snr))?;
    writeln!(out, "  SNR Up:         {}", triple(&readings.up_snr))?;
    writeln!(out)
}

pub fn write_attached_devices<W: Write>(out: &mut W, devices: &DeviceTable) -> io::Result<()> {
    writeln!(out, "{}", "Attached Devices".bold())?;
    if devices.is_empty() {
        writeln!(out, "  (none)")?;
        return writeln!(out);
    }

    let width = devices.keys().map(|name| name.chars().count()).max().unwrap_or(0) + 2;
    for (name, device) in devices {
        write!(out, "  {name:<width$}{}, {}", device.mac, device.ipv4)?;
        if !device.ipv6.is_empty() {
            write!(out, ", {}", device.ipv6)?;
        }
        writeln!(out)?;
    }
    writeln!(out)
}

fn triple(values: &[f64; 3]) -> String {
    values
        .iter()
        .map(|value| format!("{value:>5.1}"))
        .collect::<Vec<_>>()
        .join(" ")
}
