pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, ConfigPaths};
pub use error::RouterWatchError;
pub use types::{AttachedDevice, DeviceTable, LineReadings, LineStats, RouterSnapshot, SystemDetail};
