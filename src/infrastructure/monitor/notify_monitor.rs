//! Virtual path monitor backed by `notify`
//!
//! Each watched path gets a `ChangeToken`. The parent directory of a
//! watched file is watched non-recursively, so creating, replacing or
//! deleting the file all invalidate its token. A watched directory
//! invalidates on any change directly inside it.
//!
//! The OS drops a watch together with its directory. A directory that is
//! removed, renamed or replaced by a new one at the same path is watched
//! again on the next registration. The monitor holds tokens weakly: a
//! token every caller has dropped is forgotten without waiting for its
//! path to change.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, trace};

use crate::domain::ports::{VirtualPathMonitor, VirtualPathProvider};
use crate::domain::value_objects::{ChangeToken, WeakChangeToken};
use crate::error::{LoaderError, LoaderResult};

type Registrations = Arc<Mutex<Vec<(PathBuf, WeakChangeToken)>>>;
type WatchedDirs = Arc<Mutex<HashMap<PathBuf, Option<DirIdentity>>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Tells a directory apart from a later one created at the same path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DirIdentity {
    inode: u64,
    created: Option<SystemTime>,
}

impl DirIdentity {
    fn of(path: &Path) -> Option<Self> {
        let metadata = fs::metadata(path).ok()?;
        Some(Self {
            inode: inode(&metadata),
            created: metadata.created().ok(),
        })
    }
}

#[cfg(unix)]
fn inode(metadata: &fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.ino()
}

#[cfg(not(unix))]
fn inode(_metadata: &fs::Metadata) -> u64 {
    0
}

pub struct NotifyPathMonitor {
    paths: Arc<dyn VirtualPathProvider>,
    registrations: Registrations,
    watched_dirs: WatchedDirs,
    watcher: Mutex<RecommendedWatcher>,
}

impl NotifyPathMonitor {
    pub fn new(paths: Arc<dyn VirtualPathProvider>) -> LoaderResult<Self> {
        let registrations: Registrations = Arc::new(Mutex::new(Vec::new()));
        let watched_dirs: WatchedDirs = Arc::new(Mutex::new(HashMap::new()));
        let sink = registrations.clone();
        let dirs = watched_dirs.clone();

        let watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    if matches!(event.kind, EventKind::Access(_)) {
                        return;
                    }
                    if removes_paths(&event.kind) {
                        forget_removed(&dirs, &event.paths);
                    }
                    for path in &event.paths {
                        invalidate_matching(&sink, path);
                    }
                }
            },
            Config::default(),
        )
        .map_err(|e| LoaderError::Watch {
            path: paths.map_path("~/"),
            message: e.to_string(),
        })?;

        Ok(Self {
            paths,
            registrations,
            watched_dirs,
            watcher: Mutex::new(watcher),
        })
    }

    /// Number of live tokens still waiting for a change
    pub fn pending(&self) -> usize {
        lock(&self.registrations)
            .iter()
            .filter(|(_, handle)| handle.is_alive())
            .count()
    }

    fn ensure_watched(&self, directory: &Path) -> LoaderResult<()> {
        let identity = DirIdentity::of(directory);
        // Not held across `watch`: the event thread takes it too
        let known = lock(&self.watched_dirs).get(directory).copied();
        match known {
            Some(Some(known)) if Some(known) == identity => return Ok(()),
            Some(_) => {
                debug!(
                    "Directory {} was replaced, watching it again",
                    directory.display()
                );
                if let Err(e) = lock(&self.watcher).unwatch(directory) {
                    trace!("Stale watch on {}: {e}", directory.display());
                }
            }
            None => {}
        }

        lock(&self.watcher)
            .watch(directory, RecursiveMode::NonRecursive)
            .map_err(|e| LoaderError::Watch {
                path: directory.to_path_buf(),
                message: e.to_string(),
            })?;
        debug!("Watching directory {}", directory.display());
        lock(&self.watched_dirs).insert(directory.to_path_buf(), identity);
        Ok(())
    }
}

fn removes_paths(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_))
    )
}

/// Forget watched directories at or below a removed or renamed path
fn forget_removed(watched_dirs: &WatchedDirs, removed: &[PathBuf]) {
    lock(watched_dirs).retain(|dir, _| {
        let gone = removed.iter().any(|path| dir.starts_with(path));
        if gone {
            debug!("Watched directory {} is gone", dir.display());
        }
        !gone
    });
}

/// Invalidate and drop every token whose path is `changed` or contains it.
/// Tokens nobody holds any more are dropped too.
fn invalidate_matching(registrations: &Registrations, changed: &Path) {
    lock(registrations).retain(|(watched, handle)| {
        let Some(token) = handle.upgrade() else {
            return false;
        };
        let hit = changed == watched || changed.parent() == Some(watched.as_path());
        if hit {
            trace!("{} changed, invalidating {}", changed.display(), token.path());
            token.invalidate();
        }
        !hit
    });
}

impl VirtualPathMonitor for NotifyPathMonitor {
    fn when_path_changes(&self, virtual_path: &str) -> LoaderResult<ChangeToken> {
        let mapped = self.paths.map_path(virtual_path);
        // Events carry canonical paths
        let (directory, physical) = if mapped.is_dir() {
            let directory = mapped.canonicalize().unwrap_or(mapped);
            (directory.clone(), directory)
        } else {
            let parent = mapped.parent().map(Path::to_path_buf).unwrap_or_default();
            let directory = parent.canonicalize().unwrap_or(parent);
            let physical = match mapped.file_name() {
                Some(name) => directory.join(name),
                None => mapped.clone(),
            };
            (directory, physical)
        };
        self.ensure_watched(&directory)?;

        let token = ChangeToken::new(virtual_path);
        let mut registrations = lock(&self.registrations);
        registrations.retain(|(_, handle)| handle.is_alive());
        registrations.push((physical, token.downgrade()));
        Ok(token)
    }
}
