// tests/common.rs
use anyhow::Result;
use std::path::{Path, PathBuf};
use vifi::{EntryId, Executor, FileTree, FsOpRunner, OpSequence, VifiError};

pub mod common_test_utils {
    use super::*;

    /// Build a combined tree from original and edited manifest text.
    #[allow(dead_code)] // Used by other test files
    pub fn read_tree(original: &str, edited: &str) -> Result<FileTree> {
        let mut tree = FileTree::new();
        vifi::read_manifest_text(original, &mut tree)?;
        tree.end_original()?;
        vifi::read_manifest_text(edited, &mut tree)?;
        tree.end_target()?;
        Ok(tree)
    }

    /// Generate and prepare the operation sequence for a manifest edit.
    #[allow(dead_code)]
    pub fn plan(original: &str, edited: &str) -> Result<OpSequence> {
        let tree = read_tree(original, edited)?;
        let mut sequence = OpSequence::new();
        tree.generate(&mut sequence);
        sequence.prepare()?;
        Ok(sequence)
    }

    /// Plan a manifest edit and run it against the real filesystem, staging
    /// under `staging_parent`. Returns the staging directory path.
    #[allow(dead_code)]
    pub fn plan_and_run(original: &str, edited: &str, staging_parent: &Path) -> Result<PathBuf> {
        let tree = read_tree(original, edited)?;
        let mut sequence = OpSequence::new();
        tree.generate(&mut sequence);
        sequence.prepare()?;
        let staging = staging_parent.join(".vifi-tmp");
        let mut runner = FsOpRunner::new(&staging, sequence.max_entry_id())?;
        sequence.run(&mut runner)?;
        runner.finish()?;
        Ok(staging)
    }

    /// Executor that records every call instead of touching a filesystem.
    #[allow(dead_code)]
    #[derive(Debug, Default)]
    pub struct RecordingExecutor {
        pub calls: Vec<String>,
    }

    impl Executor for RecordingExecutor {
        fn temporary(&self, entry: EntryId) -> PathBuf {
            PathBuf::from(format!("{entry:02x}"))
        }

        fn copy_out(&mut self, entry: EntryId, source: &Path) -> Result<(), VifiError> {
            self.calls.push(format!("copy_out {entry} {}", source.display()));
            Ok(())
        }

        fn move_out(&mut self, entry: EntryId, source: &Path) -> Result<(), VifiError> {
            self.calls.push(format!("move_out {entry} {}", source.display()));
            Ok(())
        }

        fn remove(&mut self, source: &Path) -> Result<(), VifiError> {
            self.calls.push(format!("remove {}", source.display()));
            Ok(())
        }

        fn copy_in(&mut self, entry: EntryId, target: &Path) -> Result<(), VifiError> {
            self.calls.push(format!("copy_in {entry} {}", target.display()));
            Ok(())
        }

        fn move_in(&mut self, entry: EntryId, target: &Path) -> Result<(), VifiError> {
            self.calls.push(format!("move_in {entry} {}", target.display()));
            Ok(())
        }

        fn create_dir(&mut self, target: &Path) -> Result<(), VifiError> {
            self.calls.push(format!("create_dir {}", target.display()));
            Ok(())
        }
    }
}
