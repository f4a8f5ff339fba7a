//! Watch Use Case implementation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::application::rebuild::RebuildUseCase;
use crate::domain::ports::ExtensionFolders;
use crate::domain::value_objects::ChangeToken;
use crate::error::LoaderResult;

use super::event::{WatchEvent, WatchOptions, WatcherState};

/// Why `WatchUseCase::start` returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The running flag was cleared
    Stopped,
    /// A rebuild needs the host to restart
    RestartRequired { reasons: Vec<String> },
}

enum Cycle {
    Watching { modules: usize, tokens: Vec<ChangeToken> },
    Restart(Vec<String>),
}

/// Watch Use Case
///
/// Rebuilds the catalog, then waits for any change token to be invalidated
/// and rebuilds again. This is the main entry point for `modhost watch`.
pub struct WatchUseCase {
    rebuild: RebuildUseCase,
    folders: Arc<dyn ExtensionFolders>,
    options: WatchOptions,
}

impl WatchUseCase {
    pub fn new(
        rebuild: RebuildUseCase,
        folders: Arc<dyn ExtensionFolders>,
        options: WatchOptions,
    ) -> Self {
        Self {
            rebuild,
            folders,
            options,
        }
    }

    /// Start watching (blocking)
    ///
    /// Blocks until the running flag is set to false or a rebuild requires
    /// a restart. Errors stop the loop after an `Error` event.
    pub fn start<F>(&self, running: Arc<AtomicBool>, on_event: F) -> LoaderResult<WatchOutcome>
    where
        F: Fn(WatchEvent),
    {
        let (modules, mut tokens) = match self.run_cycle(&on_event)? {
            Cycle::Watching { modules, tokens } => (modules, tokens),
            Cycle::Restart(reasons) => return Ok(self.restart(reasons, &on_event)),
        };
        on_event(WatchEvent::WatchStarted {
            modules,
            watching: tokens.iter().map(|t| t.path().to_string()).collect(),
        });

        let mut state = WatcherState::new(self.options.debounce);
        while running.load(Ordering::SeqCst) {
            tokens.retain(|token| {
                if token.is_current() {
                    return true;
                }
                if state.add_change(token.path()) {
                    on_event(WatchEvent::PathChanged {
                        path: token.path().to_string(),
                    });
                }
                false
            });

            if state.should_rebuild() {
                let changes = state.take_changes();
                info!("Rebuilding after {} change(s)", changes.len());
                match self.run_cycle(&on_event)? {
                    Cycle::Watching {
                        tokens: fresh, ..
                    } => tokens = fresh,
                    Cycle::Restart(reasons) => return Ok(self.restart(reasons, &on_event)),
                }
            }

            std::thread::sleep(self.options.poll_interval);
        }

        on_event(WatchEvent::Shutdown);
        Ok(WatchOutcome::Stopped)
    }

    fn restart(&self, reasons: Vec<String>, on_event: &impl Fn(WatchEvent)) -> WatchOutcome {
        on_event(WatchEvent::RestartRequired {
            reasons: reasons.clone(),
        });
        WatchOutcome::RestartRequired { reasons }
    }

    fn run_cycle(&self, on_event: &impl Fn(WatchEvent)) -> LoaderResult<Cycle> {
        on_event(WatchEvent::RebuildStarted);
        match self.perform_cycle() {
            Ok((cycle, event)) => {
                if let Some(event) = event {
                    on_event(event);
                }
                Ok(cycle)
            }
            Err(e) => {
                on_event(WatchEvent::Error {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn perform_cycle(&self) -> LoaderResult<(Cycle, Option<WatchEvent>)> {
        let descriptors = self.folders.available_extensions()?;
        let (plan, report) = self.rebuild.rebuild(&descriptors)?;
        if report.restart_required {
            return Ok((Cycle::Restart(report.restart_reasons), None));
        }

        let loaded = if self.options.load_extensions {
            self.rebuild.load(&plan.selections)?.extensions.len()
        } else {
            0
        };

        let mut tokens = Vec::new();
        self.folders.monitor(&mut |t| tokens.push(t))?;
        self.rebuild.monitor(&descriptors, &mut |t| tokens.push(t))?;

        let event = WatchEvent::RebuildComplete {
            copied: report.copied.len(),
            deleted: report.deleted.len(),
            loaded,
        };
        Ok((
            Cycle::Watching {
                modules: plan.selections.len(),
                tokens,
            },
            Some(event),
        ))
    }
}
