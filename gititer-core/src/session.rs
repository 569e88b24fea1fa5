use crate::models::RepositoryId;
use std::collections::HashMap;

/// Where a repository stands in the initial commit-message workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Initialization {
    /// Not walked through initialization yet, or the prompt was dismissed.
    #[default]
    Pending,
    /// The tree was dirty and an initial message has been recorded.
    Seeded,
    /// Clean at the last check, or seeding has been handed over to iteration.
    Ready,
}

/// Per-process initialization state for every repository seen so far.
///
/// Lives from activation to shutdown and is never persisted.
#[derive(Debug, Default)]
pub struct SessionState {
    repositories: HashMap<RepositoryId, Initialization>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, repo: &RepositoryId) -> Initialization {
        self.repositories.get(repo).copied().unwrap_or_default()
    }

    pub fn is_initialized(&self, repo: &RepositoryId) -> bool {
        self.state(repo) == Initialization::Ready
    }

    pub fn mark(&mut self, repo: &RepositoryId, state: Initialization) {
        self.repositories.insert(repo.clone(), state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_repository_is_pending() {
        let session = SessionState::new();
        let repo = RepositoryId::new("/work/app");

        assert_eq!(session.state(&repo), Initialization::Pending);
        assert!(!session.is_initialized(&repo));
    }

    #[test]
    fn test_only_ready_counts_as_initialized() {
        let mut session = SessionState::new();
        let repo = RepositoryId::new("/work/app");

        session.mark(&repo, Initialization::Seeded);
        assert!(!session.is_initialized(&repo));

        session.mark(&repo, Initialization::Ready);
        assert!(session.is_initialized(&repo));
    }
}
