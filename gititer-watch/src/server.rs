use crate::git::GitRepository;
use crate::watcher::FileWatcher;
use gititer_core::{Assistant, Config, FileEvent, PromptService, Repository, Storage};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Owns the repository set and feeds file events through the dispatch gate,
/// one event at a time.
pub struct WatchServer<P> {
    assistant: Assistant<Storage, P>,
    repositories: Vec<GitRepository>,
    config: Config,
}

impl<P: PromptService> WatchServer<P> {
    pub fn new(
        assistant: Assistant<Storage, P>,
        repositories: Vec<GitRepository>,
        config: Config,
    ) -> Self {
        Self {
            assistant,
            repositories,
            config,
        }
    }

    pub fn roots(&self) -> Vec<PathBuf> {
        self.repositories
            .iter()
            .map(|repo| repo.workdir().to_path_buf())
            .collect()
    }

    pub fn repositories(&self) -> &[GitRepository] {
        &self.repositories
    }

    pub fn assistant(&self) -> &Assistant<Storage, P> {
        &self.assistant
    }

    /// Runs the initialization workflow on every repository, as when they are
    /// first opened.
    pub fn activate(&mut self) {
        for repo in self.repositories.iter_mut() {
            if let Err(e) = self.assistant.initialize(repo) {
                error!("Failed to initialize {}: {}", repo.id(), e);
            }
        }
    }

    pub fn handle(&mut self, event: &FileEvent) {
        self.assistant.dispatch(&mut self.repositories, event);
    }

    /// Watches every repository until `shutdown` is cancelled.
    ///
    /// Handlers, prompts included, run on a blocking worker; an event queued
    /// behind a prompt waits for the user to answer it.
    pub async fn serve(mut self, shutdown: CancellationToken) -> anyhow::Result<()>
    where
        P: Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel(100);
        let watcher = FileWatcher::new(
            &self.roots(),
            &self.config.ignore_patterns,
            Duration::from_millis(self.config.debounce_ms),
            tx,
        )?;

        let worker = tokio::task::spawn_blocking(move || {
            self.activate();
            while let Some(event) = rx.blocking_recv() {
                self.handle(&event);
            }
        });

        shutdown.cancelled().await;
        info!("Stopping file watcher");
        drop(watcher);
        worker.await?;

        Ok(())
    }
}
