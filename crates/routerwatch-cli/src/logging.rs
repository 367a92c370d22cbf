use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::Layered;
use tracing_subscriber::registry::{LookupSpan, Registry};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Warnings and errors go to stderr. With `log_path`, every event at the
/// configured level is also appended to that file, one line per event.
pub fn init(level: &str, log_path: Option<&Path>) -> Result<()> {
    let file = match log_path {
        Some(path) => Some(file_layer::<Layered<EnvFilter, Registry>>(path)?),
        None => None,
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(LevelFilter::WARN);

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).with_context(|| format!("parse log level {level}"))?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file)
        .with(stderr_layer)
        .try_init()
        .context("install log subscriber")?;
    Ok(())
}

/// Plain-text layer appending to `path`; an existing file is never truncated.
fn file_layer<S>(path: &Path) -> Result<impl Layer<S>>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow::anyhow!("log file {} has no file name", path.display()))?;
    fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .with_context(|| format!("open log file {}", path.display()))?;
    Ok(fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_appended_to_existing_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routerwatch.log");
        fs::write(&path, "earlier run\n").unwrap();

        let layer = file_layer::<Registry>(&path).unwrap();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(down = 17000, "line status changed");
            tracing::warn!("attached devices unavailable this cycle");
        });

        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains('\u{1b}'));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "earlier run");
        assert!(lines[1].contains("INFO"));
        assert!(lines[1].contains("line status changed down=17000"));
        assert!(lines[2].contains("WARN"));
        assert!(lines[2].contains("attached devices unavailable this cycle"));
        for line in &lines[1..] {
            // RFC 3339 timestamp leads each event
            assert!(line.starts_with("20"), "{line}");
            assert!(line.contains('T'), "{line}");
        }
    }

    #[test]
    fn test_log_dir_created_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("routerwatch.log");

        let layer = file_layer::<Registry>(&path).unwrap();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("connection failed to router");
        });

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("ERROR"));
        assert!(text.contains("connection failed to router"));
    }
}
