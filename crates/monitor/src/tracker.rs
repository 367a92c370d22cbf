use time::{Duration, OffsetDateTime};

use routerwatch_core::LineStats;

/// Decides whether a fresh reading is worth a new display column.
///
/// Speeds must match exactly. The connect time is recomputed from the poll
/// time on every read, so it only counts as changed past `drift`.
#[derive(Debug, Clone)]
pub struct ChangeTracker {
    last_down: Option<u32>,
    last_up: Option<u32>,
    last_connected: Option<OffsetDateTime>,
    drift: Duration,
}

impl ChangeTracker {
    pub fn new(drift_secs: i64) -> Self {
        Self {
            last_down: None,
            last_up: None,
            last_connected: None,
            drift: Duration::seconds(drift_secs),
        }
    }

    pub fn observe(&mut self, stats: &LineStats) -> bool {
        let mut changed = false;

        let (down, up) = (stats.down_speed(), stats.up_speed());
        if self.last_down != Some(down) || self.last_up != Some(up) {
            self.last_down = Some(down);
            self.last_up = Some(up);
            changed = true;
        }

        let reconnected = match self.last_connected {
            Some(last) => (stats.connected_at - last).abs() > self.drift,
            None => true,
        };
        if reconnected {
            self.last_connected = Some(stats.connected_at);
            changed = true;
        }

        changed
    }
}
