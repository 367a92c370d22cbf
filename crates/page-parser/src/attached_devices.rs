use routerwatch_core::{AttachedDevice, DeviceTable, RouterWatchError};

use crate::split::split_any;

pub const DEVICES_MARKER: &str = "attach_dev =";

const DEVICE_DELIMS: &[&str] = &["<br>", "'", "<lf>"];
const BLOCK_LEN: usize = 5;
/// An IPv4 name starting with this means the IPv6 name is the one to show.
const NO_IPV4_NAME_FLAG: char = '-';

/// Decodes the `attach_dev` script variable into a table keyed by device name.
///
/// Tokens come in blocks of `[mac, ipv4 name or flag, ipv4, ipv6 name, ipv6]`.
/// A missing marker gives an empty table; a malformed block rejects the whole
/// list.
pub fn parse_attached_devices(lines: &[String]) -> Result<DeviceTable, RouterWatchError> {
    let mut devices = DeviceTable::new();

    for line in lines.iter().filter(|line| line.contains(DEVICES_MARKER)) {
        let tokens = split_any(line, DEVICE_DELIMS);

        let mut index = 1;
        while index + BLOCK_LEN - 1 < tokens.len() {
            let block = &tokens[index..index + BLOCK_LEN];
            let ipv4_name = block[1];
            let flagged = match ipv4_name.chars().next() {
                Some(first) => first == NO_IPV4_NAME_FLAG,
                None => {
                    return Err(RouterWatchError::DeviceList(format!(
                        "empty name field for {} at token {}",
                        block[0],
                        index + 1
                    )))
                }
            };
            let name = if flagged { block[3] } else { ipv4_name };

            devices.insert(
                name.to_string(),
                AttachedDevice {
                    mac: block[0].to_string(),
                    ipv4: block[2].to_string(),
                    ipv6: block[4].to_string(),
                },
            );
            index += BLOCK_LEN;
        }
    }

    Ok(devices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(page: &str) -> Vec<String> {
        page.lines().map(str::to_string).collect()
    }

    const DEVICES_PAGE: &str = "<script>\n\
        var attach_dev = 'aa:bb:cc:00:00:01<br>laptop<br>192.168.0.2<br>laptop-v6<br>fe80::1<lf>\
        aa:bb:cc:00:00:02<br>-<br>192.168.0.3<br>phone<br>fe80::2<lf>';\n\
        </script>";

    #[test]
    fn test_two_devices_keyed_by_flag_rule() {
        let devices = parse_attached_devices(&lines(DEVICES_PAGE)).unwrap();
        assert_eq!(devices.len(), 2);

        let laptop = &devices["laptop"];
        assert_eq!(laptop.mac, "aa:bb:cc:00:00:01");
        assert_eq!(laptop.ipv4, "192.168.0.2");
        assert_eq!(laptop.ipv6, "fe80::1");

        let phone = &devices["phone"];
        assert_eq!(phone.mac, "aa:bb:cc:00:00:02");
        assert_eq!(phone.ipv4, "192.168.0.3");
        assert_eq!(phone.ipv6, "fe80::2");
        assert!(!devices.contains_key("laptop-v6"));
    }

    #[test]
    fn test_empty_ipv6_allowed() {
        let page = "var attach_dev = 'aa:bb:cc:00:00:03<br>tv<br>192.168.0.9<br><br><lf>';";
        let devices = parse_attached_devices(&lines(page)).unwrap();
        assert_eq!(devices["tv"].ipv6, "");
    }

    #[test]
    fn test_empty_name_rejects_whole_list() {
        let page = "var attach_dev = 'aa:bb:cc:00:00:01<br>laptop<br>192.168.0.2<br>x<br>fe80::1<lf>\
                    aa:bb:cc:00:00:02<br><br>192.168.0.3<br>phone<br>fe80::2<lf>';";
        assert!(matches!(
            parse_attached_devices(&lines(page)),
            Err(RouterWatchError::DeviceList(_))
        ));
    }

    #[test]
    fn test_trailing_partial_block_ignored() {
        let page = "var attach_dev = 'aa:bb:cc:00:00:01<br>laptop<br>192.168.0.2';";
        let devices = parse_attached_devices(&lines(page)).unwrap();
        assert!(devices.is_empty());
    }

    #[test]
    fn test_missing_marker_yields_empty() {
        let devices = parse_attached_devices(&lines("<html>\n</html>")).unwrap();
        assert!(devices.is_empty());
    }
}
