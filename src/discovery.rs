//! File discovery for batch runs.
//!
//! Given a directory and a comma-separated list of glob patterns (e.g.
//! `"*.mp3,*.wav"`), produce the set of files whose *names* match at least one
//! pattern. Matching is non-recursive and case-sensitive, and the result is
//! deduplicated and sorted so repeated runs over an unchanged directory are
//! byte-for-byte identical.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::{Error, Result};

/// Find files in `dir` whose names match at least one of the comma-separated
/// glob `patterns`.
///
/// Behavior:
/// - Non-recursive: only direct children of `dir` are considered.
/// - Directories are never returned, even when their names match.
/// - An empty result is valid; the caller decides whether that is fatal.
///
/// Errors:
/// - Invalid glob syntax is a configuration error (fatal to the run).
/// - An unreadable directory surfaces as an IO error.
pub fn find_media_files(dir: impl AsRef<Path>, patterns: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let matcher = build_matcher(patterns)?;

    // BTreeSet gives us dedup + lexicographic order in one step.
    let mut found = BTreeSet::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        if matcher.is_match(Path::new(&entry.file_name())) {
            found.insert(entry.path());
        }
    }

    debug!(
        dir = %dir.display(),
        patterns,
        matched = found.len(),
        "file discovery finished"
    );

    Ok(found.into_iter().collect())
}

/// Compile the comma-separated pattern list into a single matcher.
fn build_matcher(patterns: &str) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    let mut any = false;

    for pattern in patterns.split(',') {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            continue;
        }

        builder.add(Glob::new(pattern)?);
        any = true;
    }

    if !any {
        return Err(Error::config("no glob patterns provided"));
    }

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").expect("failed to create test file");
    }

    #[test]
    fn matches_only_requested_extensions_sorted() -> Result<()> {
        let dir = tempfile::tempdir()?;
        touch(dir.path(), "b.wav");
        touch(dir.path(), "a.mp3");
        touch(dir.path(), "c.txt");

        let files = find_media_files(dir.path(), "*.mp3,*.wav")?;
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.mp3", "b.wav"]);
        Ok(())
    }

    #[test]
    fn empty_directory_yields_empty_result() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let files = find_media_files(dir.path(), "*.mp3")?;
        assert!(files.is_empty());
        Ok(())
    }

    #[test]
    fn discovery_is_deterministic_across_runs() -> Result<()> {
        let dir = tempfile::tempdir()?;
        touch(dir.path(), "x.mp3");
        touch(dir.path(), "y.mp3");

        let first = find_media_files(dir.path(), "*.mp3")?;
        let second = find_media_files(dir.path(), "*.mp3")?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn overlapping_patterns_do_not_duplicate() -> Result<()> {
        let dir = tempfile::tempdir()?;
        touch(dir.path(), "a.mp3");

        let files = find_media_files(dir.path(), "*.mp3,a.*")?;
        assert_eq!(files.len(), 1);
        Ok(())
    }

    #[test]
    fn subdirectories_are_not_descended_into() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir(dir.path().join("nested"))?;
        touch(&dir.path().join("nested"), "deep.mp3");
        touch(dir.path(), "top.mp3");

        let files = find_media_files(dir.path(), "*.mp3")?;
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("top.mp3"));
        Ok(())
    }

    #[test]
    fn matching_directory_names_are_skipped() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir(dir.path().join("folder.mp3"))?;
        touch(dir.path(), "real.mp3");

        let files = find_media_files(dir.path(), "*.mp3")?;
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("real.mp3"));
        Ok(())
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_media_files(dir.path(), "*.{mp3").unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn blank_pattern_list_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_media_files(dir.path(), " , ").unwrap_err();
        assert!(err.is_config());
    }
}
