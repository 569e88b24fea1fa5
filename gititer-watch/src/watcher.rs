use gititer_core::FileEvent;
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, FileIdMap};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Watches repository roots and forwards debounced [`FileEvent`]s.
///
/// Events stop when the watcher is dropped.
pub struct FileWatcher {
    _debouncer: Debouncer<notify::RecommendedWatcher, FileIdMap>,
}

impl FileWatcher {
    pub fn new(
        roots: &[PathBuf],
        ignore_patterns: &[String],
        debounce: Duration,
        tx: mpsc::Sender<FileEvent>,
    ) -> anyhow::Result<Self> {
        let watched_roots = roots.to_vec();
        let ignore_patterns = ignore_patterns.to_vec();

        let mut debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    for event in events {
                        let Some(file_event) =
                            Self::translate(&event.event, &watched_roots, &ignore_patterns)
                        else {
                            continue;
                        };
                        debug!("File event: {:?}", file_event);
                        if let Err(e) = tx.blocking_send(file_event) {
                            error!("Failed to send event: {}", e);
                        }
                    }
                }
                Err(errors) => {
                    for error in errors {
                        error!("Watch error: {:?}", error);
                    }
                }
            }
        })?;

        for root in roots {
            debouncer.watcher().watch(root, RecursiveMode::Recursive)?;
            info!("File watcher started for {:?}", root);
        }

        Ok(Self {
            _debouncer: debouncer,
        })
    }

    fn translate(
        event: &Event,
        roots: &[PathBuf],
        ignore_patterns: &[String],
    ) -> Option<FileEvent> {
        let paths: Vec<PathBuf> = event
            .paths
            .iter()
            .filter(|path| !Self::should_ignore(path, roots, ignore_patterns))
            .cloned()
            .collect();

        if paths.is_empty() {
            return None;
        }

        match event.kind {
            EventKind::Create(_) => Some(FileEvent::Created(paths)),
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                if paths.len() == 2 {
                    Some(FileEvent::Renamed(vec![(paths[0].clone(), paths[1].clone())]))
                } else {
                    Some(FileEvent::Saved(paths))
                }
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                Some(FileEvent::Deleted(paths))
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Some(FileEvent::Created(paths)),
            EventKind::Modify(_) => Some(FileEvent::Saved(paths)),
            EventKind::Remove(_) => Some(FileEvent::Deleted(paths)),
            _ => None,
        }
    }

    fn should_ignore(path: &Path, roots: &[PathBuf], ignore_patterns: &[String]) -> bool {
        let relative_path = roots
            .iter()
            .find_map(|root| path.strip_prefix(root).ok())
            .unwrap_or(path);
        relative_path.components().any(|component| {
            ignore_patterns
                .iter()
                .any(|pattern| component.as_os_str() == pattern.as_str())
        })
    }
}
