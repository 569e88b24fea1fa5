use crate::error::Result;
use crate::models::{RepositoryId, WorkingTreeChange};

/// A working copy as seen by the workflows.
///
/// Implementations own the change list; the workflows read it after
/// [`Repository::refresh_status`] and only ever write the message input.
pub trait Repository {
    fn id(&self) -> &RepositoryId;

    /// Re-reads the working tree status from the version-control backend.
    fn refresh_status(&mut self) -> Result<()>;

    fn working_tree_changes(&self) -> &[WorkingTreeChange];

    /// Current content of the commit message input, empty when unset.
    fn message_input(&self) -> String;

    fn set_message_input(&mut self, message: &str) -> Result<()>;

    /// Whether the user currently has this repository in focus.
    fn is_selected(&self) -> bool {
        false
    }
}
