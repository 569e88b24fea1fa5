//! # gititer-core
//!
//! Core library for gititer - incremental commit message tracking.
//!
//! This crate holds the iteration-tracking state machine: deciding, for every
//! file mutation, whether the commit message currently being built still covers
//! the working tree, and recording which changes it already accounts for.
//! Version-control access, prompts and persistence are reached through the
//! [`Repository`], [`PromptService`] and [`KeyValueStore`] traits.

pub mod change_store;
pub mod config;
pub mod error;
pub mod models;
pub mod prompt;
pub mod repository;
pub mod session;
pub mod storage;
pub mod workflow;

pub use change_store::{ChangeStore, StoreKey, DEFAULT_NAMESPACE};
pub use config::Config;
pub use error::{Error, Result};
pub use models::{ChangeKind, FileEvent, PendingChangeSet, RepositoryId, WorkingTreeChange};
pub use prompt::{ChoiceItem, ChoicePick, PromptService, TextPrompt};
pub use repository::Repository;
pub use session::{Initialization, SessionState};
pub use storage::{KeyValueStore, Storage};
pub use workflow::{Assistant, Command, Outcome};
