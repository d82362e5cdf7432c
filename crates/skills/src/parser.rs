//! Parser for SKILL.md files with YAML frontmatter.
//!
//! SKILL.md format:
//! ```markdown
//! ---
//! name: greet
//! description: says hi
//! parameters:
//!   who:
//!     type: string
//! scripts:
//!   - run.sh
//! ---
//!
//! Free-form instructions follow the header.
//! ```

use crate::types::{NO_DESCRIPTION, Result, SkillError, SkillMeta, UNNAMED_SKILL};
use std::fs;
use std::path::Path;

/// Parse the frontmatter of a `SKILL.md` file into a [`SkillMeta`].
///
/// Fields absent from the header take documented defaults; a file without the
/// delimiter pair fails with [`SkillError::MissingHeader`].
pub fn parse_skill_md(path: &Path) -> Result<SkillMeta> {
    let content = fs::read_to_string(path)?;
    let header = extract_header(&content).ok_or_else(|| SkillError::MissingHeader { path: path.to_path_buf() })?;

    let frontmatter: Frontmatter = serde_yml::from_str(header).map_err(|e| SkillError::InvalidFrontmatter {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(SkillMeta {
        name: frontmatter.name.unwrap_or_else(|| UNNAMED_SKILL.to_string()),
        description: frontmatter.description.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        parameters: frontmatter.parameters.unwrap_or_default(),
        scripts: frontmatter.scripts.unwrap_or_default(),
    })
}

/// Read a skill's `SKILL.md` and return the instructional body: everything
/// after the header block, with surrounding whitespace trimmed.
///
/// Reads the file fresh each call so edits on disk are reflected without a
/// registry refresh.
pub fn skill_body(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)?;
    Ok(strip_frontmatter(&content).trim().to_string())
}

/// Remove the frontmatter block (the delimiter pair and everything between)
/// from the front of `content`.
///
/// Content without a recognizable header is returned unchanged.
pub fn strip_frontmatter(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("---") else {
        return content;
    };

    match rest.find("\n---") {
        Some(end) => {
            let after = &rest[end + "\n---".len()..];
            let after = after.strip_prefix('\r').unwrap_or(after);
            after.strip_prefix('\n').unwrap_or(after)
        }
        None => content,
    }
}

/// Split out the YAML text between the delimiter pair at the top of the file.
fn extract_header(content: &str) -> Option<&str> {
    let rest = content.strip_prefix("---")?;
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))?;
    let end = rest.find("\n---")?;
    let header = &rest[..end];
    Some(header.strip_suffix('\r').unwrap_or(header))
}

/// YAML frontmatter structure. Every field is optional; defaults are applied
/// in [`parse_skill_md`].
#[derive(Debug, serde::Deserialize)]
struct Frontmatter {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    parameters: Option<serde_json::Map<String, serde_json::Value>>,

    #[serde(default)]
    scripts: Option<Vec<String>>,
}
