//! # gititer-watch
//!
//! Host side of gititer: git-backed repositories, a debounced file watcher,
//! and the server loop that feeds file events to the iteration workflows.

pub mod git;
pub mod server;
pub mod watcher;

pub use git::GitRepository;
pub use server::WatchServer;
pub use watcher::FileWatcher;
