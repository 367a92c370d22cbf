use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterWatchError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("no usable data on {page}: {reason}")]
    Parse { page: String, reason: String },
    #[error("malformed device list: {0}")]
    DeviceList(String),
    #[error("sample keys differ from the displayed columns: {0}")]
    SampleKeys(String),
}
