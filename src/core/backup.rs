//! Timestamped backup mirror for files about to be modified.
//!
//! Backups live under `<root>/.backups/<YYYYMMDD-HHMMSS>/`, mirroring each
//! changed file's path relative to the run root. The directory is created
//! lazily on the first preserved file, so runs that change nothing leave
//! no trace.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const BACKUP_DIR_NAME: &str = ".backups";

/// One run's backup destination.
#[derive(Debug)]
pub struct BackupSet {
    root: PathBuf,
    dir: PathBuf,
    preserved: usize,
}

impl BackupSet {
    /// Plan a backup set for a run rooted at `root`. Nothing is written
    /// until the first call to [`preserve`](Self::preserve).
    pub fn plan(root: &Path) -> Self {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
        Self {
            root: root.to_path_buf(),
            dir: root.join(BACKUP_DIR_NAME).join(stamp),
            preserved: 0,
        }
    }

    /// Copy `file`'s current bytes into the mirror, creating intermediate
    /// directories as needed. `file` must live under the run root.
    pub fn preserve(&mut self, file: &Path) -> Result<()> {
        let relative = file.strip_prefix(&self.root).map_err(|_| {
            Error::Other(format!(
                "File outside run root: {}",
                file.display()
            ))
        })?;

        let target = self.dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(file, &target)?;
        self.preserved += 1;
        Ok(())
    }

    /// Backup directory path, if any file was preserved this run.
    pub fn dir(&self) -> Option<&Path> {
        (self.preserved > 0).then_some(self.dir.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn preserve_mirrors_relative_path() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("blog").join("2024")).unwrap();
        let file = root.join("blog").join("2024").join("post.html");
        fs::write(&file, "original bytes").unwrap();

        let mut set = BackupSet::plan(root);
        set.preserve(&file).unwrap();

        let backup_dir = set.dir().expect("backup dir after preserve");
        let mirrored = backup_dir.join("blog").join("2024").join("post.html");
        assert_eq!(fs::read_to_string(mirrored).unwrap(), "original bytes");
        assert!(backup_dir.starts_with(root.join(BACKUP_DIR_NAME)));
    }

    #[test]
    fn nothing_is_written_until_first_preserve() {
        let dir = tempdir().unwrap();
        let set = BackupSet::plan(dir.path());

        assert!(set.dir().is_none());
        assert!(!dir.path().join(BACKUP_DIR_NAME).exists());
    }

    #[test]
    fn preserve_rejects_files_outside_root() {
        let dir = tempdir().unwrap();
        let other = tempdir().unwrap();
        let stray = other.path().join("file.txt");
        fs::write(&stray, "x").unwrap();

        let mut set = BackupSet::plan(dir.path());
        assert!(set.preserve(&stray).is_err());
    }
}
