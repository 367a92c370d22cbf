pub mod config;
pub mod show;
pub mod watch;
