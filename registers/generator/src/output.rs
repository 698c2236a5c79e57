// Licensed under the Apache-2.0 license

//! The in-memory set of generated files and how it reaches disk.

use crate::error::{ExportError, ExportResult};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Generated files keyed by path relative to the output directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GeneratedUnits {
    files: BTreeMap<PathBuf, String>,
}

impl GeneratedUnits {
    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: String) {
        self.files.insert(path.into(), contents);
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.files.contains_key(path.as_ref())
    }

    /// Files in path order.
    pub fn files(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.files.iter().map(|(p, c)| (p.as_path(), c.as_str()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Writes every file under `dir`.
    ///
    /// Each file is first written next to its destination with a `.tmp`
    /// suffix. Only when all of them were written are they renamed into
    /// place, each existing destination being moved aside to `.bak` first.
    /// If a rename fails the files already installed are put back, so `dir`
    /// holds either the complete new output or the previous contents.
    pub fn write_to(&self, dir: &Path) -> ExportResult<Vec<PathBuf>> {
        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(self.files.len());
        let result = self.stage(dir, &mut staged);
        if let Err(e) = result {
            discard(&staged);
            return Err(e);
        }

        let mut installed: Vec<Installed> = Vec::with_capacity(staged.len());
        for (i, (tmp, dest)) in staged.iter().enumerate() {
            if let Err(source) = install(tmp, dest, &mut installed) {
                warn!("Could not replace {}: {source}; restoring previous output", dest.display());
                roll_back(&installed);
                discard(&staged[i..]);
                return Err(ExportError::Io {
                    path: dest.clone(),
                    source,
                });
            }
            debug!("Wrote {}", dest.display());
        }
        for backup in installed.iter().filter_map(|f| f.backup.as_ref()) {
            if let Err(e) = fs::remove_file(backup) {
                warn!("Could not remove {}: {e}", backup.display());
            }
        }
        info!("Wrote {} files to {}", installed.len(), dir.display());
        Ok(installed.into_iter().map(|f| f.dest).collect())
    }

    fn stage(&self, dir: &Path, staged: &mut Vec<(PathBuf, PathBuf)>) -> ExportResult<()> {
        for (rel, contents) in &self.files {
            let dest = dir.join(rel);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(ExportError::io(parent))?;
            }
            let tmp = with_suffix(&dest, ".tmp");
            fs::write(&tmp, contents).map_err(ExportError::io(&tmp))?;
            staged.push((tmp, dest));
        }
        Ok(())
    }
}

/// A file renamed into place, and where its predecessor was moved.
struct Installed {
    dest: PathBuf,
    backup: Option<PathBuf>,
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}

fn install(tmp: &Path, dest: &Path, installed: &mut Vec<Installed>) -> std::io::Result<()> {
    let backup = if dest.is_file() {
        let backup = with_suffix(dest, ".bak");
        fs::rename(dest, &backup)?;
        Some(backup)
    } else {
        None
    };
    if let Err(e) = fs::rename(tmp, dest) {
        if let Some(backup) = &backup {
            restore(backup, dest);
        }
        return Err(e);
    }
    installed.push(Installed {
        dest: dest.to_path_buf(),
        backup,
    });
    Ok(())
}

/// Undoes [`install`] in reverse order.
fn roll_back(installed: &[Installed]) {
    for file in installed.iter().rev() {
        match &file.backup {
            Some(backup) => restore(backup, &file.dest),
            None => {
                if let Err(e) = fs::remove_file(&file.dest) {
                    warn!("Could not remove {}: {e}", file.dest.display());
                }
            }
        }
    }
}

fn restore(backup: &Path, dest: &Path) {
    if let Err(e) = fs::rename(backup, dest) {
        warn!("Could not restore {} from {}: {e}", dest.display(), backup.display());
    }
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        if let Err(e) = fs::remove_file(tmp) {
            warn!("Could not remove {}: {e}", tmp.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units() -> GeneratedUnits {
        let mut units = GeneratedUnits::default();
        units.insert("b.rs", "b".to_string());
        units.insert("a.rs", "a".to_string());
        units.insert("masters/x.rs", "x".to_string());
        units
    }

    #[test]
    fn test_order_and_lookup() {
        let units = units();
        let paths: Vec<_> = units.paths().map(|p| p.to_string_lossy().into_owned()).collect();
        assert_eq!(paths, vec!["a.rs", "b.rs", "masters/x.rs"]);
        assert_eq!(units.get("a.rs"), Some("a"));
        assert!(units.get("c.rs").is_none());
    }

    #[test]
    fn test_write_to() {
        let dir = tempfile::tempdir().unwrap();
        let written = units().write_to(dir.path()).unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(fs::read_to_string(dir.path().join("masters/x.rs")).unwrap(), "x");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|x| x == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_failed_write_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        // A plain file where a directory is needed makes staging fail.
        fs::write(dir.path().join("masters"), "").unwrap();
        assert!(matches!(units().write_to(dir.path()), Err(ExportError::Io { .. })));
        let mut names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["masters"]);
    }

    #[test]
    fn test_failed_rename_restores_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.rs"), "old a").unwrap();
        // A non-empty directory where b.rs goes cannot be renamed over, so
        // the commit fails after a.rs was already replaced.
        fs::create_dir(dir.path().join("b.rs")).unwrap();
        fs::write(dir.path().join("b.rs").join("keep"), "").unwrap();

        match units().write_to(dir.path()) {
            Err(ExportError::Io { path, .. }) => assert_eq!(path, dir.path().join("b.rs")),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(fs::read_to_string(dir.path().join("a.rs")).unwrap(), "old a");
        assert!(dir.path().join("b.rs").join("keep").exists());
        assert!(!dir.path().join("masters/x.rs").exists());
        let mut names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.rs", "b.rs", "masters"]);
        assert_eq!(fs::read_dir(dir.path().join("masters")).unwrap().count(), 0);
    }

    #[test]
    fn test_rewrite_removes_backups() {
        let dir = tempfile::tempdir().unwrap();
        units().write_to(dir.path()).unwrap();
        let mut changed = units();
        changed.insert("a.rs", "new a".to_string());
        changed.write_to(dir.path()).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("a.rs")).unwrap(), "new a");
        assert!(!dir.path().join("a.rs.bak").exists());
        assert!(!dir.path().join("masters/x.rs.bak").exists());
    }
}
