//! Error types for skillsync

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillSyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// Remote unreachable or git client unavailable. Fatal to the current operation.
    #[error("Failed to fetch repository: {0}")]
    Fetch(String),

    #[error("Skill not found: {0}")]
    SkillNotFound(String),

    #[error("Failed to copy skill '{skill}': {reason}")]
    Copy { skill: String, reason: String },

    #[error("Dependency installation failed for '{skill}': {reason}")]
    Dependency { skill: String, reason: String },

    #[error("Could not save configuration: {0}")]
    ConfigPersist(String),

    #[error("Cancelled by user")]
    Cancelled,

    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl SkillSyncError {
    /// Process exit code for errors that reach `main`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Cancelled => 130,
            _ => 1,
        }
    }

    /// Stable machine-readable code used by robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::Config(_) | Self::MissingConfig(_) => "config",
            Self::Fetch(_) => "fetch_failed",
            Self::SkillNotFound(_) => "skill_not_found",
            Self::Copy { .. } => "copy_failed",
            Self::Dependency { .. } => "dependency_failed",
            Self::ConfigPersist(_) => "config_persist_failed",
            Self::Cancelled => "cancelled",
            Self::ValidationFailed(_) => "validation_failed",
        }
    }
}

pub type Result<T> = std::result::Result<T, SkillSyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_maps_to_interrupt_exit_code() {
        assert_eq!(SkillSyncError::Cancelled.exit_code(), 130);
        assert_eq!(SkillSyncError::Fetch("offline".into()).exit_code(), 1);
    }

    #[test]
    fn copy_error_mentions_skill() {
        let err = SkillSyncError::Copy {
            skill: "alpha".into(),
            reason: "source missing".into(),
        };
        assert_eq!(err.to_string(), "Failed to copy skill 'alpha': source missing");
        assert_eq!(err.code(), "copy_failed");
    }
}
