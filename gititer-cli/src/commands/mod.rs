pub mod cancel;
pub mod init;
pub mod iter;
pub mod status;
pub mod watch;

use crate::display;
use crate::prompt::TerminalPrompt;
use anyhow::{Context, Result};
use colored::Colorize;
use gititer_core::{Assistant, ChangeStore, Config, Error, KeyValueStore, Repository, Storage};
use gititer_watch::GitRepository;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const STATE_DIR: &str = ".gititer";

pub fn get_db_path(workspace_root: &Path, custom_path: Option<PathBuf>) -> PathBuf {
    custom_path.unwrap_or_else(|| workspace_root.join(STATE_DIR).join("gititer.db"))
}

/// The repositories one invocation works on, plus where their state lives.
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
    pub db_path: PathBuf,
    pub repositories: Vec<GitRepository>,
}

impl Workspace {
    /// Opens every root as a git repository. The first root holds the state
    /// directory. `selected` names the repository commands should target;
    /// otherwise the one containing the current directory is selected.
    pub fn open(roots: &[PathBuf], db: Option<PathBuf>, selected: Option<PathBuf>) -> Result<Self> {
        let cwd = std::env::current_dir().context("reading current directory")?;
        let roots = if roots.is_empty() {
            vec![cwd.clone()]
        } else {
            roots.to_vec()
        };

        let root = std::fs::canonicalize(&roots[0])
            .with_context(|| format!("resolving {}", roots[0].display()))?;
        let config = Config::load(&root.join(STATE_DIR))?;
        let db_path = get_db_path(&root, db);

        let focus = match selected {
            Some(path) => std::fs::canonicalize(&path)
                .with_context(|| format!("resolving {}", path.display()))?,
            None => std::fs::canonicalize(&cwd).unwrap_or(cwd),
        };

        let mut repositories: Vec<GitRepository> = Vec::new();
        for path in &roots {
            match GitRepository::open(path) {
                Ok(repo) => {
                    if repositories.iter().any(|r| r.id() == repo.id()) {
                        continue;
                    }
                    let is_focused = repo.contains(&focus);
                    repositories.push(repo.with_selected(is_focused));
                }
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }

        if repositories.is_empty() {
            return Err(Error::HostUnavailable(format!(
                "no git repository found under {}",
                roots
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
            .into());
        }

        Ok(Self {
            root,
            config,
            db_path,
            repositories,
        })
    }

    pub fn change_store(&self) -> Result<ChangeStore<Storage>> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let storage = Storage::new(&self.db_path)
            .with_context(|| format!("opening {}", self.db_path.display()))?;
        Ok(ChangeStore::with_namespace(storage, &self.config.namespace))
    }

    pub fn assistant(&self) -> Result<Assistant<Storage, TerminalPrompt>> {
        let assistant = Assistant::new(self.change_store()?, TerminalPrompt::default())
            .with_initial_suggestion(&self.config.initial_suggestion);
        Ok(assistant)
    }
}

/// Prints the message and covered file count of every repository with
/// something tracked.
pub fn print_tracking<S: KeyValueStore>(
    store: &ChangeStore<S>,
    repositories: &[GitRepository],
) -> Result<()> {
    for repo in repositories {
        let pending = store.pending_changes(repo.id())?;
        let message = repo.message_input();
        if pending.is_empty() && message.is_empty() {
            continue;
        }
        println!("  {}", repo.id().to_string().bold());
        println!("    {}: {}", "Message".bold(), display::message_line(&message));
        println!(
            "    {}: {}",
            "Covered files".bold(),
            pending.len().to_string().cyan()
        );
    }

    Ok(())
}
