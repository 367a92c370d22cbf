//! Extractors for the router's status pages.
//!
//! The pages are not parsed as HTML. Each extractor looks for a literal
//! marker on a line and slices values out of it by delimiter position, so
//! the token offsets here are tied to the router firmware's markup.

pub mod attached_devices;
pub mod line_stats;
pub mod split;
pub mod system_detail;

pub use attached_devices::parse_attached_devices;
pub use line_stats::{elapsed_seconds, parse_connect_secs, parse_line_readings};
pub use split::split_any;
pub use system_detail::parse_system_details;
