use tracing::debug;

use routerwatch_core::SystemDetail;

use crate::split::split_any;

const SPAN_DELIMS: &[&str] = &["<span>", "</span>"];

/// Pulls manufacturer, model and firmware versions out of the router status page.
///
/// The DSL firmware value sits on the line after its label, quoted.
pub fn parse_system_details(lines: &[String]) -> SystemDetail {
    let mut detail = SystemDetail::default();
    let mut dsl_firmware_line = false;

    for line in lines {
        if dsl_firmware_line {
            dsl_firmware_line = false;
            match split_any(line, &["'"]).get(1) {
                Some(value) => detail.dsl_firmware_ver = Some(value.trim().to_string()),
                None => debug!(line = %line, "DSL firmware line has no quoted value"),
            }
        }

        if line.contains("Manufacturer</span>") {
            set_span_value(&mut detail.manufacturer, line);
        } else if line.contains("Model</span>") {
            set_span_value(&mut detail.model, line);
        } else if line.contains(">Firmware Version</span>") {
            set_span_value(&mut detail.firmware_ver, line);
        } else if line.contains("DSL Firmware Version</span>") {
            dsl_firmware_line = true;
        }
    }

    detail
}

fn set_span_value(field: &mut Option<String>, line: &str) {
    match split_any(line, SPAN_DELIMS).get(2) {
        Some(value) => *field = Some(value.trim().to_string()),
        None => debug!(line = %line, "system detail line too short"),
    }
}
