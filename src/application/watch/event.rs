//! Watch event types and options

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// Debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = 250;

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Quiet period after the last change before rebuilding
    pub debounce: Duration,
    /// How often change tokens are checked
    pub poll_interval: Duration,
    /// Map the selected modules after each rebuild
    pub load_extensions: bool,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEBOUNCE_MS),
            poll_interval: Duration::from_millis(50),
            load_extensions: true,
        }
    }
}

impl WatchOptions {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_load_extensions(mut self, load: bool) -> Self {
        self.load_extensions = load;
        self
    }
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    /// Initial rebuild done, paths registered
    WatchStarted { modules: usize, watching: Vec<String> },
    /// A monitored virtual path changed
    PathChanged { path: String },
    /// Rebuild started
    RebuildStarted,
    /// Rebuild committed
    RebuildComplete {
        copied: usize,
        deleted: usize,
        loaded: usize,
    },
    /// A loaded binary changed; the host must restart
    RestartRequired { reasons: Vec<String> },
    /// Error occurred
    Error { message: String },
    /// Watch stopped
    Shutdown,
}

impl WatchEvent {
    /// Convert to JSON string with "command": "watch" field included
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("watch"));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Watcher state for debouncing
#[derive(Debug)]
pub struct WatcherState {
    debounce: Duration,
    pending_changes: BTreeSet<String>,
    last_change: Option<Instant>,
}

impl WatcherState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending_changes: BTreeSet::new(),
            last_change: None,
        }
    }

    /// Record a changed path. Returns false if it was already pending.
    pub fn add_change(&mut self, path: impl Into<String>) -> bool {
        self.last_change = Some(Instant::now());
        self.pending_changes.insert(path.into())
    }

    /// Debounce period has passed and there are pending changes
    pub fn should_rebuild(&self) -> bool {
        match self.last_change {
            Some(last) => !self.pending_changes.is_empty() && last.elapsed() >= self.debounce,
            None => false,
        }
    }

    /// Take all pending changes, resetting state
    pub fn take_changes(&mut self) -> Vec<String> {
        self.last_change = None;
        std::mem::take(&mut self.pending_changes).into_iter().collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_changes.is_empty()
    }
}
