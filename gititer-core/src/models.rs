use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Stable identity of a working copy: the location of its root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryId(String);

impl RepositoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_path(root: &Path) -> Self {
        Self(root.to_string_lossy().into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Modified,
    Added,
    Deleted,
    Renamed,
}

/// A file that differs between the last commit and the working tree.
///
/// Owned by the repository; the workflows only read these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingTreeChange {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl WorkingTreeChange {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// True when this change is about one of `paths`.
    pub fn matches_any(&self, paths: &[PathBuf]) -> bool {
        paths.iter().any(|p| p == &self.path)
    }
}

/// Paths whose changes the current iteration message already covers.
///
/// A running log rather than a mirror of the working tree. Order of insertion
/// is kept and a path appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingChangeSet {
    paths: Vec<PathBuf>,
}

impl PendingChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_changes(changes: &[WorkingTreeChange]) -> Self {
        let mut set = Self::new();
        set.extend_from(changes);
        set
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// Whether every change in `changes` is already accounted for.
    pub fn covers_all(&self, changes: &[WorkingTreeChange]) -> bool {
        changes.iter().all(|c| self.contains(&c.path))
    }

    /// Appends the paths of `changes` that are not yet tracked.
    pub fn extend_from(&mut self, changes: &[WorkingTreeChange]) {
        for change in changes {
            if !self.contains(&change.path) {
                self.paths.push(change.path.clone());
            }
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// A file mutation reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    Saved(Vec<PathBuf>),
    Created(Vec<PathBuf>),
    Deleted(Vec<PathBuf>),
    /// `(old, new)` pairs.
    Renamed(Vec<(PathBuf, PathBuf)>),
}

impl FileEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            FileEvent::Saved(_) => "save",
            FileEvent::Created(_) => "create",
            FileEvent::Deleted(_) => "delete",
            FileEvent::Renamed(_) => "rename",
        }
    }

    /// The paths the event addresses. Renames address their old path, which
    /// is where the working tree reports the change.
    pub fn affected_paths(&self) -> Vec<PathBuf> {
        match self {
            FileEvent::Saved(paths) | FileEvent::Created(paths) | FileEvent::Deleted(paths) => {
                paths.clone()
            }
            FileEvent::Renamed(pairs) => pairs.iter().map(|(old, _)| old.clone()).collect(),
        }
    }
}

/// Treats an empty message as no message at all.
pub fn non_empty(message: impl Into<String>) -> Option<String> {
    let message = message.into();
    if message.trim().is_empty() {
        None
    } else {
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_set_skips_duplicates() {
        let changes = vec![
            WorkingTreeChange::new("/repo/a.txt", ChangeKind::Modified),
            WorkingTreeChange::new("/repo/b.txt", ChangeKind::Added),
        ];
        let mut set = PendingChangeSet::from_changes(&changes[..1]);
        set.extend_from(&changes);

        assert_eq!(
            set.paths(),
            &[PathBuf::from("/repo/a.txt"), PathBuf::from("/repo/b.txt")]
        );
        assert!(set.covers_all(&changes));
    }

    #[test]
    fn test_pending_set_coverage() {
        let set = PendingChangeSet::from_changes(&[WorkingTreeChange::new(
            "/repo/a.txt",
            ChangeKind::Modified,
        )]);
        let new_change = WorkingTreeChange::new("/repo/b.txt", ChangeKind::Modified);

        assert!(!set.covers_all(&[new_change]));
        assert!(set.covers_all(&[]));
    }

    #[test]
    fn test_pending_set_serializes_as_list() {
        let set = PendingChangeSet::from_changes(&[WorkingTreeChange::new(
            "/repo/a.txt",
            ChangeKind::Modified,
        )]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["/repo/a.txt"]"#);
    }

    #[test]
    fn test_rename_addresses_old_path() {
        let event = FileEvent::Renamed(vec![(
            PathBuf::from("/repo/old.rs"),
            PathBuf::from("/repo/new.rs"),
        )]);
        assert_eq!(event.affected_paths(), vec![PathBuf::from("/repo/old.rs")]);
        assert_eq!(event.kind(), "rename");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("feat: x"), Some("feat: x".to_string()));
        assert_eq!(non_empty("   "), None);
        assert_eq!(non_empty(""), None);
    }
}
