//! Skillrouter server: the name-keyed skill registry and the MCP protocol
//! adapter that serves it over stdio.

mod mcp;
mod registry;

pub use mcp::SkillsServer;
pub use registry::{RegisteredSkill, SkillRegistry};
