//! Core types for the skills system.
//!
//! A skill is a directory containing a `SKILL.md` file whose YAML frontmatter
//! describes the tool it exposes: a name, a description, a parameter mapping,
//! and optionally the commands that implement it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Marker file that identifies a directory as a skill.
pub const SKILL_FILE: &str = "SKILL.md";

/// Prefix for the environment variables carrying call arguments to skill
/// commands: argument `who` becomes `SKILL_ARG_WHO`.
pub const ARG_ENV_PREFIX: &str = "SKILL_ARG_";

/// Placeholder name for skills whose header omits `name`.
pub const UNNAMED_SKILL: &str = "Unnamed Skill";

/// Placeholder description for skills whose header omits `description`.
pub const NO_DESCRIPTION: &str = "No description provided";

/// Location of a discovered skill directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillLocation {
    /// The skill directory itself
    pub path: PathBuf,

    /// Path to the `SKILL.md` marker inside it
    pub skill_md_path: PathBuf,
}

/// Metadata about a skill, extracted from SKILL.md frontmatter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillMeta {
    /// Tool name the skill is registered under
    pub name: String,

    /// Human-readable description served to clients
    pub description: String,

    /// Parameter name to JSON Schema descriptor; every key is a required
    /// tool argument
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,

    /// Commands the skill can run; the first one is the invocation entry
    /// point, an empty list marks a prompt-only skill
    #[serde(default)]
    pub scripts: Vec<String>,
}

impl SkillMeta {
    /// Whether invoking this skill returns its instructions instead of
    /// running a command.
    pub fn is_prompt_only(&self) -> bool {
        self.scripts.is_empty()
    }
}

/// Errors that can occur while discovering or parsing skills.
#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    /// The metadata file does not start with the delimited header block
    #[error("missing frontmatter header in {path}")]
    MissingHeader { path: PathBuf },

    /// The header block is present but is not valid YAML
    #[error("invalid frontmatter in {path}: {message}")]
    InvalidFrontmatter { path: PathBuf, message: String },

    /// Lookup of an unregistered skill
    #[error("skill not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for skill operations.
pub type Result<T> = std::result::Result<T, SkillError>;

impl From<SkillError> for skillrouter_core::Error {
    fn from(err: SkillError) -> Self {
        skillrouter_core::Error::Skill(err.to_string())
    }
}
