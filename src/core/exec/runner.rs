// src/core/exec/runner.rs

use crate::core::error::VifiError;
use crate::core::exec::Executor;
use crate::core::tree::{hex_width, EntryId};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Executor that runs file operations against the real filesystem.
///
/// All staged content lives directly under a single temporary directory,
/// each entry under its zero-padded hex id. The constructor creates the
/// directory; [`FsOpRunner::finish`] removes it again once it is empty. A
/// run that stops halfway leaves its staged state behind for inspection.
#[derive(Debug)]
pub struct FsOpRunner {
    /// Directory used as temporary space.
    temp_dir: PathBuf,
    /// Hex digits per staging name.
    width: usize,
}

impl FsOpRunner {
    /// File operation runner using the given temporary directory.
    ///
    /// The parent of the directory must exist; the directory itself is
    /// created if missing. `max_entry` fixes the width of the staging
    /// names.
    pub fn new(temp_dir: impl Into<PathBuf>, max_entry: EntryId) -> Result<Self, VifiError> {
        let temp_dir = temp_dir.into();
        let parent_exists = temp_dir.parent().is_some_and(Path::exists);
        if temp_dir.as_os_str().is_empty() || !parent_exists {
            return Err(VifiError::TempDir { path: temp_dir });
        }
        if !temp_dir.exists() {
            fs::create_dir(&temp_dir)?;
        }
        Ok(FsOpRunner {
            temp_dir,
            width: hex_width(max_entry),
        })
    }

    /// Finish operation execution, clearing the temporary space.
    ///
    /// The temporary directory is only removed when it is empty, so an
    /// incomplete run keeps its staged state.
    pub fn finish(&mut self) -> Result<(), VifiError> {
        if self.temp_dir.exists() && fs::read_dir(&self.temp_dir)?.next().is_none() {
            fs::remove_dir(&self.temp_dir)?;
        }
        Ok(())
    }

    /// Directory used as temporary space.
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }
}

impl Executor for FsOpRunner {
    fn temporary(&self, entry: EntryId) -> PathBuf {
        self.temp_dir
            .join(format!("{:0width$x}", entry, width = self.width))
    }

    fn copy_out(&mut self, entry: EntryId, source: &Path) -> Result<(), VifiError> {
        copy_recursive(source, &self.temporary(entry))
    }

    fn move_out(&mut self, entry: EntryId, source: &Path) -> Result<(), VifiError> {
        fs::rename(source, self.temporary(entry))?;
        Ok(())
    }

    fn remove(&mut self, source: &Path) -> Result<(), VifiError> {
        if fs::symlink_metadata(source)?.is_dir() {
            fs::remove_dir_all(source)?;
        } else {
            fs::remove_file(source)?;
        }
        Ok(())
    }

    fn copy_in(&mut self, entry: EntryId, target: &Path) -> Result<(), VifiError> {
        copy_recursive(&self.temporary(entry), target)
    }

    fn move_in(&mut self, entry: EntryId, target: &Path) -> Result<(), VifiError> {
        fs::rename(self.temporary(entry), target)?;
        Ok(())
    }

    fn create_dir(&mut self, target: &Path) -> Result<(), VifiError> {
        fs::create_dir(target)?;
        Ok(())
    }
}

/// Recursively copy a file or directory from source to target path.
fn copy_recursive(source: &Path, target: &Path) -> Result<(), VifiError> {
    if source.is_dir() {
        fs::create_dir(target)?;
        for entry in WalkDir::new(source).min_depth(1) {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(source)
                .expect("walked paths stay below their root");
            let destination = target.join(relative);
            if entry.file_type().is_dir() {
                fs::create_dir(&destination)?;
            } else {
                fs::copy(entry.path(), &destination)?;
            }
        }
    } else {
        fs::copy(source, target)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn rejects_missing_parent() {
        let err = FsOpRunner::new("/definitely/not/there/tmp", 1).unwrap_err();
        assert!(matches!(err, VifiError::TempDir { .. }));
    }

    #[test]
    fn finish_removes_only_empty_temp_space() -> anyhow::Result<()> {
        let scratch = tempfile::tempdir()?;
        let temp_dir = scratch.path().join("staging");
        let mut runner = FsOpRunner::new(&temp_dir, 1)?;
        assert!(temp_dir.is_dir());

        File::create(temp_dir.join("01"))?.write_all(b"staged")?;
        runner.finish()?;
        assert!(temp_dir.is_dir());

        fs::remove_file(temp_dir.join("01"))?;
        runner.finish()?;
        assert!(!temp_dir.exists());
        Ok(())
    }

    #[test]
    fn copy_out_keeps_the_source() -> anyhow::Result<()> {
        let scratch = tempfile::tempdir()?;
        let mut runner = FsOpRunner::new(scratch.path().join("staging"), 2)?;

        let dir = scratch.path().join("tree");
        fs::create_dir_all(dir.join("sub"))?;
        File::create(dir.join("sub/file.txt"))?.write_all(b"content")?;

        runner.copy_out(2, &dir)?;
        assert!(dir.join("sub/file.txt").is_file());
        assert_eq!(
            fs::read_to_string(runner.temporary(2).join("sub/file.txt"))?,
            "content"
        );
        Ok(())
    }

    #[test]
    fn move_out_and_in_are_renames() -> anyhow::Result<()> {
        let scratch = tempfile::tempdir()?;
        let mut runner = FsOpRunner::new(scratch.path().join("staging"), 1)?;

        let source = scratch.path().join("a.txt");
        File::create(&source)?.write_all(b"payload")?;
        runner.move_out(1, &source)?;
        assert!(!source.exists());

        let target = scratch.path().join("b.txt");
        runner.move_in(1, &target)?;
        assert_eq!(fs::read_to_string(&target)?, "payload");
        assert!(fs::read_dir(runner.temp_dir())?.next().is_none());
        Ok(())
    }
}
