//! Discovery of skill directories under a root.

use crate::types::{SKILL_FILE, SkillLocation};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Walk `root` and collect every outermost directory containing a `SKILL.md`.
///
/// A matching directory is recorded and not descended into, so marker files
/// nested inside an already-matched skill do not produce additional entries.
/// Siblings are visited in file-name order, which makes the result
/// deterministic for any given tree. Unreadable entries are logged and
/// skipped; the walk itself never fails, in the worst case it returns an
/// empty list.
pub fn scan(root: &Path) -> Vec<SkillLocation> {
    let mut found = Vec::new();
    let mut walker = WalkDir::new(root).follow_links(true).sort_by_file_name().into_iter();

    loop {
        let entry = match walker.next() {
            None => break,
            Some(Ok(entry)) => entry,
            Some(Err(err)) => {
                warn!(error = %err, "skipping unreadable entry during skill scan");
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        let skill_md_path = entry.path().join(SKILL_FILE);
        if skill_md_path.is_file() {
            debug!(path = %entry.path().display(), "discovered skill directory");
            found.push(SkillLocation { path: entry.path().to_path_buf(), skill_md_path });
            walker.skip_current_dir();
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn add_skill(root: &Path, rel: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(SKILL_FILE), "---\nname: test\n---\n").unwrap();
    }

    #[test]
    fn test_scan_finds_skill_directories() {
        let temp = TempDir::new().unwrap();
        add_skill(temp.path(), "cap1");
        add_skill(temp.path(), "group/cap2");
        fs::write(temp.path().join("notes.txt"), "not a skill").unwrap();

        let found = scan(temp.path());
        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|loc| loc.path.ends_with("cap1")));
        assert!(found.iter().any(|loc| loc.path.ends_with("group/cap2")));
        for loc in &found {
            assert!(loc.skill_md_path.ends_with(SKILL_FILE));
        }
    }

    #[test]
    fn test_scan_does_not_descend_into_skills() {
        let temp = TempDir::new().unwrap();
        add_skill(temp.path(), "outer");
        add_skill(temp.path(), "outer/inner");

        let found = scan(temp.path());
        assert_eq!(found.len(), 1);
        assert!(found[0].path.ends_with("outer"));
    }

    #[test]
    fn test_scan_root_itself_is_a_skill() {
        let temp = TempDir::new().unwrap();
        add_skill(temp.path(), ".");
        add_skill(temp.path(), "nested");

        let found = scan(temp.path());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, temp.path());
    }

    #[test]
    fn test_scan_missing_root_returns_empty() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("does-not-exist");
        assert!(scan(&missing).is_empty());
    }

    #[test]
    fn test_scan_order_is_deterministic() {
        let temp = TempDir::new().unwrap();
        add_skill(temp.path(), "zeta");
        add_skill(temp.path(), "alpha");
        add_skill(temp.path(), "mid/beta");

        let first = scan(temp.path());
        let second = scan(temp.path());
        assert_eq!(first, second);

        let names: Vec<_> = first
            .iter()
            .map(|loc| loc.path.strip_prefix(temp.path()).unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["alpha", "mid/beta", "zeta"]);
    }

    #[test]
    fn test_scan_ignores_empty_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("empty/deeper")).unwrap();
        add_skill(temp.path(), "real");

        let found = scan(temp.path());
        assert_eq!(found.len(), 1);
        assert!(found[0].path.ends_with("real"));
    }
}
