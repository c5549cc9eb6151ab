//! skillsync - install and update agent skills from a shared git repository.

pub mod app;
pub mod cli;
pub mod config;
pub mod deps;
pub mod discovery;
pub mod error;
pub mod fetch;
pub mod locale;
pub mod selector;
pub mod sync;

#[cfg(test)]
pub mod test_utils;

pub use error::{Result, SkillSyncError};
