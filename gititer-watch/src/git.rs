use gititer_core::{ChangeKind, Error, Repository, RepositoryId, Result, WorkingTreeChange};
use git2::{Status, StatusOptions};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the file inside the git dir that holds the message in progress.
pub const MESSAGE_FILE: &str = "ITERATION_MSG";

const STATE_DIR: &str = ".gititer";

fn git_error(e: git2::Error) -> Error {
    Error::Git(e.message().to_string())
}

/// A working copy backed by libgit2.
pub struct GitRepository {
    id: RepositoryId,
    workdir: PathBuf,
    repo: git2::Repository,
    changes: Vec<WorkingTreeChange>,
    selected: bool,
}

impl GitRepository {
    /// Opens the repository containing `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = git2::Repository::discover(path).map_err(|e| {
            Error::HostUnavailable(format!("{}: {}", path.display(), e.message()))
        })?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| {
                Error::HostUnavailable(format!("{}: bare repository", path.display()))
            })?
            .to_path_buf();
        let workdir = fs::canonicalize(&workdir)?;

        info!("Opened repository {:?}", workdir);

        Ok(Self {
            id: RepositoryId::from_path(&workdir),
            workdir,
            repo,
            changes: Vec::new(),
            selected: false,
        })
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Whether `path` lies inside this working copy.
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.workdir)
    }

    fn message_path(&self) -> PathBuf {
        self.repo.path().join(MESSAGE_FILE)
    }

    fn change_kind(status: Status) -> Option<ChangeKind> {
        if status.contains(Status::WT_RENAMED) {
            Some(ChangeKind::Renamed)
        } else if status.contains(Status::WT_DELETED) {
            Some(ChangeKind::Deleted)
        } else if status.contains(Status::WT_NEW) {
            Some(ChangeKind::Added)
        } else if status.intersects(Status::WT_MODIFIED | Status::WT_TYPECHANGE) {
            Some(ChangeKind::Modified)
        } else {
            None
        }
    }
}

impl Repository for GitRepository {
    fn id(&self) -> &RepositoryId {
        &self.id
    }

    fn refresh_status(&mut self) -> Result<()> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .include_ignored(false)
            .recurse_untracked_dirs(true)
            .renames_index_to_workdir(true);

        let statuses = self.repo.statuses(Some(&mut opts)).map_err(git_error)?;

        let mut changes = Vec::new();
        for entry in statuses.iter() {
            let Some(kind) = Self::change_kind(entry.status()) else {
                continue;
            };
            let Some(path) = entry.path() else {
                continue;
            };
            if Path::new(path).starts_with(STATE_DIR) {
                continue;
            }
            changes.push(WorkingTreeChange::new(self.workdir.join(path), kind));
        }

        debug!("{} has {} working tree change(s)", self.id, changes.len());
        self.changes = changes;
        Ok(())
    }

    fn working_tree_changes(&self) -> &[WorkingTreeChange] {
        &self.changes
    }

    fn message_input(&self) -> String {
        fs::read_to_string(self.message_path())
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    fn set_message_input(&mut self, message: &str) -> Result<()> {
        let path = self.message_path();
        if message.is_empty() {
            match fs::remove_file(&path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
                _ => return Ok(()),
            }
        }
        fs::write(&path, format!("{message}\n"))?;
        Ok(())
    }

    fn is_selected(&self) -> bool {
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_git_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        let repo = git2::Repository::init(dir.path()).unwrap();

        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test").unwrap();
        config.set_str("user.email", "test@test.com").unwrap();

        fs::write(dir.path().join("tracked.txt"), "one\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("tracked.txt")).unwrap();
        index.write().unwrap();
        let tree_oid = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_oid).unwrap();
        let sig = repo.signature().unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
            .unwrap();

        dir
    }

    fn kinds(repo: &GitRepository) -> Vec<(String, ChangeKind)> {
        repo.working_tree_changes()
            .iter()
            .map(|c| {
                let name = c.path.strip_prefix(repo.workdir()).unwrap();
                (name.to_string_lossy().into_owned(), c.kind)
            })
            .collect()
    }

    #[test]
    fn test_open_outside_repository_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let result = GitRepository::open(dir.path());

        assert!(matches!(result, Err(Error::HostUnavailable(_))));
    }

    #[test]
    fn test_clean_repository_has_no_changes() {
        let dir = temp_git_repo();
        let mut repo = GitRepository::open(dir.path()).unwrap();

        repo.refresh_status().unwrap();

        assert!(repo.working_tree_changes().is_empty());
    }

    #[test]
    fn test_working_tree_change_kinds() {
        let dir = temp_git_repo();
        let mut repo = GitRepository::open(dir.path()).unwrap();

        fs::write(dir.path().join("tracked.txt"), "two\n").unwrap();
        fs::write(dir.path().join("new.txt"), "new\n").unwrap();
        repo.refresh_status().unwrap();

        let mut found = kinds(&repo);
        found.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            found,
            vec![
                ("new.txt".to_string(), ChangeKind::Added),
                ("tracked.txt".to_string(), ChangeKind::Modified),
            ]
        );
        assert!(repo.working_tree_changes()[0].path.is_absolute());
    }

    #[test]
    fn test_deleted_file() {
        let dir = temp_git_repo();
        let mut repo = GitRepository::open(dir.path()).unwrap();

        fs::remove_file(dir.path().join("tracked.txt")).unwrap();
        repo.refresh_status().unwrap();

        assert_eq!(
            kinds(&repo),
            vec![("tracked.txt".to_string(), ChangeKind::Deleted)]
        );
    }

    #[test]
    fn test_state_dir_is_not_a_change() {
        let dir = temp_git_repo();
        let mut repo = GitRepository::open(dir.path()).unwrap();

        fs::create_dir_all(dir.path().join(".gititer")).unwrap();
        fs::write(dir.path().join(".gititer").join("gititer.db"), "x").unwrap();
        repo.refresh_status().unwrap();

        assert!(repo.working_tree_changes().is_empty());
    }

    #[test]
    fn test_message_input_round_trip() {
        let dir = temp_git_repo();
        let mut repo = GitRepository::open(dir.path()).unwrap();

        assert_eq!(repo.message_input(), "");

        repo.set_message_input("feat: x").unwrap();
        assert_eq!(repo.message_input(), "feat: x");
        assert!(dir.path().join(".git").join(MESSAGE_FILE).exists());

        repo.set_message_input("").unwrap();
        assert_eq!(repo.message_input(), "");
        assert!(!dir.path().join(".git").join(MESSAGE_FILE).exists());

        repo.set_message_input("").unwrap();
    }

    #[test]
    fn test_contains_and_selection() {
        let dir = temp_git_repo();
        let repo = GitRepository::open(dir.path()).unwrap().with_selected(true);

        assert!(repo.contains(&repo.workdir().join("src").join("main.rs")));
        assert!(!repo.contains(Path::new("/definitely/elsewhere")));
        assert!(repo.is_selected());
    }
}
