//! In-memory registry of discovered skills.

use skillrouter_skills::{SKILL_FILE, SkillMeta, parse_skill_md, scan};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// A skill admitted to the registry: parsed metadata plus the directory its
/// commands run in.
#[derive(Debug, Clone)]
pub struct RegisteredSkill {
    /// Metadata from the skill's frontmatter
    pub meta: SkillMeta,

    /// The skill directory
    pub path: PathBuf,
}

impl RegisteredSkill {
    /// Path to the skill's `SKILL.md`.
    pub fn skill_md_path(&self) -> PathBuf {
        self.path.join(SKILL_FILE)
    }
}

/// Name-keyed snapshot of every currently known skill.
///
/// The registry is an explicit value with an init/refresh lifecycle: create
/// it with [`SkillRegistry::new`], populate it with [`SkillRegistry::refresh`],
/// read it through [`SkillRegistry::snapshot`] or [`SkillRegistry::get`].
/// `refresh` builds a complete replacement map and publishes it with a single
/// swap, so readers always observe one whole scan, never a mix of two.
#[derive(Debug)]
pub struct SkillRegistry {
    skills_dir: PathBuf,
    skills: RwLock<Arc<HashMap<String, RegisteredSkill>>>,
}

impl SkillRegistry {
    /// Create an empty registry rooted at `skills_dir`.
    pub fn new(skills_dir: impl Into<PathBuf>) -> Self {
        Self { skills_dir: skills_dir.into(), skills: RwLock::new(Arc::new(HashMap::new())) }
    }

    /// The root directory this registry scans.
    pub fn skills_dir(&self) -> &Path {
        &self.skills_dir
    }

    /// Rescan the skills directory and publish a fresh snapshot.
    ///
    /// Skills whose metadata fails to parse are skipped with a diagnostic;
    /// the rest still load. When two skills share a name the one scanned
    /// later wins, which the sorted walk makes deterministic: the
    /// lexicographically last directory is kept.
    pub fn refresh(&self) {
        let discovered = scan(&self.skills_dir);
        info!(count = discovered.len(), dir = %self.skills_dir.display(), "discovered skill directories");

        let mut fresh: HashMap<String, RegisteredSkill> = HashMap::new();
        for location in discovered {
            match parse_skill_md(&location.skill_md_path) {
                Ok(meta) => {
                    let name = meta.name.clone();
                    if let Some(previous) = fresh.insert(name.clone(), RegisteredSkill { meta, path: location.path }) {
                        warn!(
                            name = %name,
                            replaced = %previous.path.display(),
                            "duplicate skill name, keeping the later one"
                        );
                    }
                }
                Err(err) => {
                    warn!(path = %location.path.display(), error = %err, "skipping unparsable skill");
                }
            }
        }

        info!(count = fresh.len(), "skill registry refreshed");
        *self.skills.write().unwrap() = Arc::new(fresh);
    }

    /// The current snapshot. Cheap to take and stays coherent across a
    /// concurrent refresh.
    pub fn snapshot(&self) -> Arc<HashMap<String, RegisteredSkill>> {
        Arc::clone(&self.skills.read().unwrap())
    }

    /// Look up a skill in the current snapshot without refreshing.
    pub fn get(&self, name: &str) -> Option<RegisteredSkill> {
        self.snapshot().get(name).cloned()
    }

    /// Number of registered skills in the current snapshot.
    pub fn count(&self) -> usize {
        self.snapshot().len()
    }
}
