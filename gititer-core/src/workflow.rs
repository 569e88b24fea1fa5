//! The iteration-tracking state machine.
//!
//! [`Assistant`] decides, for every file event, whether the commit message in
//! progress still covers the working tree. Per-repository state is keyed
//! independently; nothing here is atomic across repositories, and a second
//! event for the same repository that overlaps the read-modify-persist cycle
//! of [`Assistant::iterate`] simply wins last.

use crate::change_store::ChangeStore;
use crate::config::DEFAULT_INITIAL_SUGGESTION;
use crate::error::Result;
use crate::models::{non_empty, FileEvent, PendingChangeSet, RepositoryId, WorkingTreeChange};
use crate::prompt::{ChoiceItem, PromptService, TextPrompt};
use crate::repository::Repository;
use crate::session::{Initialization, SessionState};
use crate::storage::KeyValueStore;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// User-invocable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Init,
    Iterate,
    Cancel,
}

impl Command {
    pub fn as_str(&self) -> &str {
        match self {
            Command::Init => "init",
            Command::Iterate => "iter",
            Command::Cancel => "cancel",
        }
    }

}

/// What a workflow run did to a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The message and its coverage were written.
    Updated,
    /// No message covers the tree, so tracking was reset.
    Reverted,
    /// Nothing applied: the event missed every change, or an initial
    /// message is still being decided.
    Skipped,
}

/// Answers of the picker shown when new changes arrive under an existing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Continuation {
    Keep,
    Replace,
    Typed,
}

impl Continuation {
    const ALL: [Continuation; 3] = [
        Continuation::Keep,
        Continuation::Replace,
        Continuation::Typed,
    ];

    fn item(&self, message: &str) -> ChoiceItem {
        match self {
            Continuation::Keep => ChoiceItem::new("Yes", format!("Yes, continue with [{message}]")),
            Continuation::Replace => ChoiceItem::new("No", "No, enter new message"),
            Continuation::Typed => {
                ChoiceItem::new("+", "Use entered text as new message").with_text_entry()
            }
        }
    }
}

/// Progress of resolving a possibly-updated message for new changes.
enum Resolution {
    AwaitingChoice,
    AwaitingText,
    Resolved(Option<String>),
}

fn plural(count: usize) -> &'static str {
    if count > 1 {
        "s"
    } else {
        ""
    }
}

fn initial_prompt(change_count: usize, suggestion: &str) -> TextPrompt {
    TextPrompt {
        prompt: format!(
            "Your working tree seems to have [{change_count}] change{}, let's add a commit message for {}",
            plural(change_count),
            if change_count > 1 { "these" } else { "this" },
        ),
        placeholder: "Initial commit message".to_string(),
        default: suggestion.to_string(),
    }
}

fn iteration_prompt(count: usize) -> TextPrompt {
    TextPrompt {
        prompt: "What's going to change?".to_string(),
        placeholder: "New commit message".to_string(),
        default: format!("{count} new message{}", plural(count)),
    }
}

pub struct Assistant<S, P> {
    store: ChangeStore<S>,
    prompt: P,
    session: SessionState,
    initial_suggestion: String,
}

impl<S: KeyValueStore, P: PromptService> Assistant<S, P> {
    pub fn new(store: ChangeStore<S>, prompt: P) -> Self {
        Self {
            store,
            prompt,
            session: SessionState::new(),
            initial_suggestion: DEFAULT_INITIAL_SUGGESTION.to_string(),
        }
    }

    pub fn with_initial_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.initial_suggestion = suggestion.into();
        self
    }

    pub fn store(&self) -> &ChangeStore<S> {
        &self.store
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Decides whether `repo` needs an initial commit message and seeds one
    /// when its working tree is dirty.
    pub fn initialize<R: Repository + ?Sized>(&mut self, repo: &mut R) -> Result<()> {
        repo.refresh_status()?;
        let id = repo.id().clone();
        let change_count = repo.working_tree_changes().len();

        if change_count == 0 {
            self.session.mark(&id, Initialization::Ready);
            self.store.set_initial_message(None)?;
            info!("Repository {} is clean, tracking iterations", id);
            return Ok(());
        }

        let known = match non_empty(repo.message_input()) {
            Some(message) => Some(message),
            None => match self.store.iteration_message(&id)? {
                Some(message) => Some(message),
                None => self.store.initial_message()?,
            },
        };

        let message = match known {
            Some(message) => Some(message),
            None => self
                .prompt
                .ask_text(&initial_prompt(change_count, &self.initial_suggestion))?
                .and_then(non_empty),
        };

        match message {
            Some(message) => {
                if non_empty(repo.message_input()).is_none() {
                    repo.set_message_input(&message)?;
                    self.store.set_initial_message(Some(&message))?;
                }
                self.session.mark(&id, Initialization::Seeded);
                info!("Seeded {} with initial message {:?}", id, message);
            }
            None => {
                self.session.mark(&id, Initialization::Pending);
                debug!("Initial message for {} dismissed", id);
            }
        }

        Ok(())
    }

    /// Runs `callback` on every initialized repository with a dirty tree,
    /// reverts initialized repositories that went clean, and initializes the
    /// rest.
    ///
    /// Repositories are visited in order, one at a time. A failure in one is
    /// logged and does not stop the others.
    pub fn for_each_repository<R, F>(&mut self, repos: &mut [R], mut callback: F)
    where
        R: Repository,
        F: FnMut(&mut Self, &mut R) -> Result<()>,
    {
        for repo in repos.iter_mut() {
            if let Err(e) = self.gate(repo, &mut callback) {
                error!("Error handling repository {}: {}", repo.id(), e);
            }
        }
    }

    fn gate<R, F>(&mut self, repo: &mut R, callback: &mut F) -> Result<()>
    where
        R: Repository,
        F: FnMut(&mut Self, &mut R) -> Result<()>,
    {
        repo.refresh_status()?;
        let id = repo.id().clone();

        match self.session.state(&id) {
            Initialization::Pending => return self.initialize(repo),
            Initialization::Seeded => self.hand_over(&id)?,
            Initialization::Ready => {}
        }

        if repo.working_tree_changes().is_empty() {
            self.revert(repo)
        } else {
            callback(self, repo)
        }
    }

    /// Ends the bootstrap of `id`: later events iterate instead of seeding.
    fn hand_over(&mut self, id: &RepositoryId) -> Result<()> {
        self.session.mark(id, Initialization::Ready);
        self.store.set_initial_message(None)?;
        debug!("Handing {} over to iteration", id);
        Ok(())
    }

    /// Routes a file event through the gate into [`Assistant::iterate`].
    pub fn dispatch<R: Repository>(&mut self, repos: &mut [R], event: &FileEvent) {
        let affected = event.affected_paths();
        debug!("Dispatching {} of {} path(s)", event.kind(), affected.len());
        self.for_each_repository(repos, |assistant, repo| {
            assistant.iterate(repo, Some(affected.as_slice())).map(|_| ())
        });
    }

    /// Reconciles the message in progress with the working-tree changes at
    /// `affected` (or all of them when `None`).
    pub fn iterate<R: Repository + ?Sized>(
        &self,
        repo: &mut R,
        affected: Option<&[PathBuf]>,
    ) -> Result<Outcome> {
        if self.store.initial_message()?.is_some() {
            debug!("Initial message still being decided, skipping {}", repo.id());
            return Ok(Outcome::Skipped);
        }

        let resolved: Vec<WorkingTreeChange> = match affected {
            Some(paths) => {
                let matching: Vec<_> = repo
                    .working_tree_changes()
                    .iter()
                    .filter(|change| change.matches_any(paths))
                    .cloned()
                    .collect();
                if matching.is_empty() {
                    return Ok(Outcome::Skipped);
                }
                matching
            }
            None => repo.working_tree_changes().to_vec(),
        };

        let id = repo.id().clone();
        let mut pending = self.store.pending_changes(&id)?;
        let mut message = match non_empty(repo.message_input()) {
            Some(message) => Some(message),
            None => self.store.iteration_message(&id)?,
        };
        let covered = pending.covers_all(&resolved);

        let mut from_input = false;
        if message.is_none() && (resolved.is_empty() || !covered) {
            message = self
                .prompt
                .ask_text(&iteration_prompt(pending.len().max(1)))?
                .and_then(non_empty);
            from_input = true;
        }

        if let Some(current) = message.clone() {
            if !resolved.is_empty() {
                if !covered {
                    debug!("{} new change(s) in {}", resolved.len(), id);
                    if !from_input {
                        if let Some(updated) = self.resolve_new_changes(&current, pending.len())? {
                            message = Some(updated);
                        }
                    }
                    pending.extend_from(&resolved);
                }
                self.store.set_pending_changes(&id, &pending)?;
            }
        }

        match message {
            Some(message) => {
                self.store.set_iteration_message(&id, &message)?;
                repo.set_message_input(&message)?;
                Ok(Outcome::Updated)
            }
            None => {
                self.revert(repo)?;
                self.store
                    .set_pending_changes(&id, &PendingChangeSet::from_changes(&resolved))?;
                Ok(Outcome::Reverted)
            }
        }
    }

    /// Asks whether `current` still describes the work now that new changes
    /// arrived. Returns a replacement only when the user produced one.
    fn resolve_new_changes(&self, current: &str, pending_count: usize) -> Result<Option<String>> {
        let items: Vec<ChoiceItem> = Continuation::ALL.iter().map(|c| c.item(current)).collect();
        let mut state = Resolution::AwaitingChoice;

        loop {
            state = match state {
                Resolution::AwaitingChoice => match self.prompt.ask_choice(&items)? {
                    None => Resolution::Resolved(None),
                    Some(pick) => match Continuation::ALL.get(pick.index) {
                        Some(Continuation::Keep) => Resolution::Resolved(None),
                        Some(Continuation::Replace) => Resolution::AwaitingText,
                        Some(Continuation::Typed) => Resolution::Resolved(non_empty(pick.text)),
                        None => {
                            debug!("Choice {} is out of range, keeping message", pick.index);
                            Resolution::Resolved(None)
                        }
                    },
                },
                Resolution::AwaitingText => Resolution::Resolved(
                    self.prompt
                        .ask_text(&iteration_prompt(pending_count))?
                        .and_then(non_empty),
                ),
                Resolution::Resolved(updated) => return Ok(updated),
            };
        }
    }

    /// Clears the message input and everything tracked for `repo`.
    pub fn revert<R: Repository + ?Sized>(&self, repo: &mut R) -> Result<()> {
        let id = repo.id().clone();
        repo.set_message_input("")?;
        self.store.set_pending_changes(&id, &PendingChangeSet::new())?;
        self.store.set_iteration_message(&id, "")?;
        debug!("Reverted {}", id);
        Ok(())
    }

    /// Picks the repository a command applies to: the selected ones if any are
    /// selected, otherwise all of them, asking the user when that leaves more
    /// than one. `None` when there is nothing to pick or the user cancelled.
    pub fn select_repository<R: Repository>(&self, repos: &[R]) -> Result<Option<usize>> {
        let selected: Vec<usize> = (0..repos.len()).filter(|&i| repos[i].is_selected()).collect();
        let candidates = if selected.is_empty() {
            (0..repos.len()).collect()
        } else {
            selected
        };

        match candidates.len() {
            0 => Ok(None),
            1 => Ok(Some(candidates[0])),
            _ => {
                let items: Vec<ChoiceItem> = candidates
                    .iter()
                    .map(|&i| ChoiceItem::new(repos[i].id().to_string(), ""))
                    .collect();
                let pick = self.prompt.ask_choice(&items)?;
                Ok(pick.and_then(|p| candidates.get(p.index).copied()))
            }
        }
    }

    /// Runs a named action. `Init` initializes every repository given;
    /// `Iterate` and `Cancel` act on the selected one. `None` when the user
    /// backed out of choosing a repository.
    ///
    /// A command is a bootstrap of its own: `Init` drops the global fallback
    /// once every repository has been seeded, and `Iterate` hands the
    /// repository over to iteration first.
    pub fn run_command<R: Repository>(
        &mut self,
        command: Command,
        repos: &mut [R],
    ) -> Result<Option<Outcome>> {
        if command == Command::Init {
            for repo in repos.iter_mut() {
                self.initialize(repo)?;
            }
            self.store.set_initial_message(None)?;
            return Ok(Some(Outcome::Updated));
        }

        let Some(index) = self.select_repository(repos)? else {
            debug!("No repository selected for {}", command.as_str());
            return Ok(None);
        };
        let repo = &mut repos[index];

        let outcome = match command {
            Command::Iterate => {
                repo.refresh_status()?;
                let id = repo.id().clone();
                if !self.session.is_initialized(&id) {
                    self.hand_over(&id)?;
                }
                self.iterate(repo, None)?
            }
            Command::Cancel => {
                self.revert(repo)?;
                Outcome::Reverted
            }
            Command::Init => Outcome::Updated,
        };

        Ok(Some(outcome))
    }
}
