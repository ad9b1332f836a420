// tests/move_flow_tests.rs
//
// End-to-end coverage: scan a real directory, edit the manifest text, plan
// the changes and run them against the filesystem.

use anyhow::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use vifi::{manifest_to_string, scan_directory, FileTree};

mod common;
use common::common_test_utils;

fn write_file(path: &Path, content: &str) -> Result<()> {
    File::create(path)?.write_all(content.as_bytes())?;
    Ok(())
}

/// Scan a scratch directory and return its canonical base and manifest text.
fn scan_to_manifest(dir: &Path) -> Result<(PathBuf, String)> {
    let mut tree = FileTree::new();
    scan_directory(dir, &mut tree)?;
    Ok((tree.base_path().to_path_buf(), manifest_to_string(&tree)))
}

#[test]
fn rename_up_moves_the_file() -> Result<()> {
    let scratch = tempfile::tempdir()?;
    let base = scratch.path();
    fs::create_dir(base.join("dir2"))?;
    write_file(&base.join("dir2/file2.txt"), "two")?;
    write_file(&base.join("dir2/file3.txt"), "three")?;
    write_file(&base.join("file1.txt"), "one")?;

    let (canonical, manifest) = scan_to_manifest(base)?;
    let edited = manifest.replace("02\tdir2/file2.txt", "02\tfile2.txt");
    let staging = common_test_utils::plan_and_run(&manifest, &edited, &canonical)?;

    assert_eq!(fs::read_to_string(canonical.join("file2.txt"))?, "two");
    assert!(!canonical.join("dir2/file2.txt").exists());
    assert_eq!(fs::read_to_string(canonical.join("dir2/file3.txt"))?, "three");
    assert!(!staging.exists());
    Ok(())
}

#[test]
fn swapped_directories_exchange_content() -> Result<()> {
    let scratch = tempfile::tempdir()?;
    let base = scratch.path();
    fs::create_dir(base.join("dirA"))?;
    fs::create_dir(base.join("dirB"))?;
    write_file(&base.join("dirA/file1.txt"), "one")?;
    write_file(&base.join("dirB/file2.txt"), "two")?;

    let (canonical, manifest) = scan_to_manifest(base)?;
    let edited = format!(
        "# ViFi@{}\n01\tdirB\n02\tdirA/file1.txt\n03\tdirA\n04\tdirB/file2.txt\n",
        canonical.display()
    );
    let staging = common_test_utils::plan_and_run(&manifest, &edited, &canonical)?;

    assert_eq!(fs::read_to_string(canonical.join("dirB/file1.txt"))?, "one");
    assert_eq!(fs::read_to_string(canonical.join("dirA/file2.txt"))?, "two");
    assert!(!staging.exists());
    Ok(())
}

#[test]
fn duplicated_line_copies_the_file() -> Result<()> {
    let scratch = tempfile::tempdir()?;
    let base = scratch.path();
    write_file(&base.join("tool.txt"), "alpha")?;

    let (canonical, manifest) = scan_to_manifest(base)?;
    let edited = format!("{manifest}01\tcopy.txt\n");
    let staging = common_test_utils::plan_and_run(&manifest, &edited, &canonical)?;

    assert_eq!(fs::read_to_string(canonical.join("tool.txt"))?, "alpha");
    assert_eq!(fs::read_to_string(canonical.join("copy.txt"))?, "alpha");
    assert!(!staging.exists());
    Ok(())
}

#[test]
fn duplicated_directory_copies_its_content() -> Result<()> {
    let scratch = tempfile::tempdir()?;
    let base = scratch.path();
    fs::create_dir(base.join("pack"))?;
    write_file(&base.join("pack/a.txt"), "payload")?;

    let (canonical, manifest) = scan_to_manifest(base)?;
    let edited = format!("{manifest}01\tbackup\n");
    let staging = common_test_utils::plan_and_run(&manifest, &edited, &canonical)?;

    assert_eq!(fs::read_to_string(canonical.join("pack/a.txt"))?, "payload");
    assert_eq!(fs::read_to_string(canonical.join("backup/a.txt"))?, "payload");
    assert!(!staging.exists());
    Ok(())
}

#[test]
fn dropped_line_deletes_the_file() -> Result<()> {
    let scratch = tempfile::tempdir()?;
    let base = scratch.path();
    write_file(&base.join("junk.txt"), "junk")?;
    write_file(&base.join("keep.txt"), "keep")?;

    let (canonical, manifest) = scan_to_manifest(base)?;
    let edited = manifest.replace("01\tjunk.txt\n", "");
    let staging = common_test_utils::plan_and_run(&manifest, &edited, &canonical)?;

    assert!(!canonical.join("junk.txt").exists());
    assert_eq!(fs::read_to_string(canonical.join("keep.txt"))?, "keep");
    assert!(!staging.exists());
    Ok(())
}

#[test]
fn new_depth_is_materialized() -> Result<()> {
    let scratch = tempfile::tempdir()?;
    let base = scratch.path();
    write_file(&base.join("file.txt"), "deep")?;

    let (canonical, manifest) = scan_to_manifest(base)?;
    let edited = manifest.replace("01\tfile.txt", "01\tdirA/dirB/dirC/file.txt");
    let staging = common_test_utils::plan_and_run(&manifest, &edited, &canonical)?;

    assert_eq!(
        fs::read_to_string(canonical.join("dirA/dirB/dirC/file.txt"))?,
        "deep"
    );
    assert!(!canonical.join("file.txt").exists());
    assert!(!staging.exists());
    Ok(())
}

#[test]
fn unchanged_manifest_plans_nothing() -> Result<()> {
    let scratch = tempfile::tempdir()?;
    let base = scratch.path();
    write_file(&base.join("file.txt"), "same")?;

    let (_, manifest) = scan_to_manifest(base)?;
    let sequence = common_test_utils::plan(&manifest, &manifest)?;
    assert!(sequence.is_empty());
    Ok(())
}
