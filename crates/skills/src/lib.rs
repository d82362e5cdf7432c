//! Skillrouter skills system
//!
//! Discovery, metadata parsing, and execution of skills: directories holding
//! a `SKILL.md` marker file whose frontmatter describes a callable tool.

mod executor;
mod parser;
mod scanner;
mod types;

pub use executor::{EXECUTION_FAILED, Executor, NO_OUTPUT};
pub use parser::{parse_skill_md, skill_body, strip_frontmatter};
pub use scanner::scan;
pub use types::{
    ARG_ENV_PREFIX, NO_DESCRIPTION, Result, SKILL_FILE, SkillError, SkillLocation, SkillMeta, UNNAMED_SKILL,
};
