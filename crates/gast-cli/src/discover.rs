//! Expand command-line patterns into source file paths.

use anyhow::{Context, Result};
use gast_parser::Language;
use globset::{GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

const GLOB_CHARS: &[char] = &['*', '?', '[', '{'];

/// Split a pattern at its first glob metacharacter into the directory to walk
/// and the glob to match beneath it. Plain paths have no glob.
pub fn split_pattern(pattern: &str) -> (PathBuf, Option<&str>) {
    let Some(meta) = pattern.find(GLOB_CHARS) else {
        return (PathBuf::from(pattern), None);
    };
    match pattern[..meta].rfind('/') {
        Some(0) => (PathBuf::from("/"), Some(&pattern[1..])),
        Some(slash) => (PathBuf::from(&pattern[..slash]), Some(&pattern[slash + 1..])),
        None => (PathBuf::from("."), Some(pattern)),
    }
}

fn matcher(glob: &str) -> Result<GlobMatcher> {
    Ok(GlobBuilder::new(glob)
        .literal_separator(true)
        .build()
        .with_context(|| format!("invalid glob '{glob}'"))?
        .compile_matcher())
}

fn exclude_set(exclude: &[String]) -> Result<Option<GlobSet>> {
    if exclude.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for p in exclude {
        builder.add(
            GlobBuilder::new(p)
                .literal_separator(true)
                .build()
                .with_context(|| format!("invalid --exclude glob '{p}'"))?,
        );
    }
    Ok(Some(builder.build().context("invalid --exclude glob set")?))
}

/// Collect the files named by `patterns`, sorted and deduplicated.
///
/// A plain file is taken as is. A plain directory is walked for files of a
/// supported language (or any file when `language` is forced). A glob is
/// matched against paths relative to its walk root.
pub fn discover(
    patterns: &[String],
    exclude: &[String],
    language: Option<Language>,
) -> Result<Vec<PathBuf>> {
    let exclude = exclude_set(exclude)?;
    let mut found = BTreeSet::new();

    for pattern in patterns {
        let (root, glob) = split_pattern(pattern);
        let glob = glob.map(matcher).transpose()?;

        if glob.is_none() && root.is_file() {
            found.insert(root);
            continue;
        }
        if !root.is_dir() {
            tracing::warn!("no such file or directory: {}", root.display());
            continue;
        }

        let walker = ignore::WalkBuilder::new(&root)
            .hidden(true)
            .git_ignore(true)
            .add_custom_ignore_filename(".gastignore")
            .build();

        for entry in walker.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let rel = path.strip_prefix(&root).unwrap_or(path);
            let wanted = match &glob {
                Some(glob) => glob.is_match(rel),
                None => language.is_some() || Language::from_path(path).is_some(),
            };
            if !wanted {
                continue;
            }
            if let Some(ref exc) = exclude
                && (exc.is_match(rel) || exc.is_match(path))
            {
                continue;
            }
            found.insert(display_path(&root, path));
        }
    }
    Ok(found.into_iter().collect())
}

/// Drop the leading `./` a walk rooted at `.` adds.
fn display_path(root: &Path, path: &Path) -> PathBuf {
    if root == Path::new(".") {
        path.strip_prefix(".").unwrap_or(path).to_path_buf()
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_split_pattern() {
        assert_eq!(split_pattern("src/a.py"), (PathBuf::from("src/a.py"), None));
        assert_eq!(
            split_pattern("data/**/*.py"),
            (PathBuf::from("data"), Some("**/*.py"))
        );
        assert_eq!(split_pattern("*.c"), (PathBuf::from("."), Some("*.c")));
        assert_eq!(
            split_pattern("a/b/c?.java"),
            (PathBuf::from("a/b"), Some("c?.java"))
        );
        assert_eq!(split_pattern("/src/*.h"), (PathBuf::from("/src"), Some("*.h")));
        assert_eq!(split_pattern("/*.h"), (PathBuf::from("/"), Some("*.h")));
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pkg/sub")).unwrap();
        fs::write(dir.path().join("top.py"), "x = 1\n").unwrap();
        fs::write(dir.path().join("pkg/a.py"), "y = 2\n").unwrap();
        fs::write(dir.path().join("pkg/sub/b.py"), "z = 3\n").unwrap();
        fs::write(dir.path().join("pkg/sub/c.c"), "int c;\n").unwrap();
        fs::write(dir.path().join("pkg/readme.md"), "# hi\n").unwrap();
        dir
    }

    fn names(files: &[PathBuf], root: &Path) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_recursive_glob() {
        let dir = fixture();
        let pattern = format!("{}/**/*.py", dir.path().display());
        let files = discover(&[pattern], &[], None).unwrap();
        assert_eq!(names(&files, dir.path()), vec!["pkg/a.py", "pkg/sub/b.py", "top.py"]);
    }

    #[test]
    fn test_single_star_does_not_cross_directories() {
        let dir = fixture();
        let pattern = format!("{}/pkg/*.py", dir.path().display());
        let files = discover(&[pattern], &[], None).unwrap();
        assert_eq!(names(&files, dir.path()), vec!["pkg/a.py"]);
    }

    #[test]
    fn test_directory_walk_keeps_supported_languages() {
        let dir = fixture();
        let pattern = dir.path().join("pkg").display().to_string();
        let files = discover(&[pattern], &[], None).unwrap();
        assert_eq!(
            names(&files, dir.path()),
            vec!["pkg/a.py", "pkg/sub/b.py", "pkg/sub/c.c"]
        );
    }

    #[test]
    fn test_exclude_and_dedup() {
        let dir = fixture();
        let all = format!("{}/**/*.py", dir.path().display());
        let single = dir.path().join("top.py").display().to_string();
        let files = discover(&[all, single], &["**/sub/**".to_string()], None).unwrap();
        assert_eq!(names(&files, dir.path()), vec!["pkg/a.py", "top.py"]);
    }
}
