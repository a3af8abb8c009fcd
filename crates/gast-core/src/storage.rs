//! Batch output layout and readers for the three output streams.
//!
//! A run writing to stem `out` produces `out.json` (one node table per line),
//! `out.txt` (the matching filename per line) and `out_failed.txt`
//! (`filename<TAB>reason` per line).

use crate::node::NodeTable;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Paths of the three streams derived from one output stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub tables: PathBuf,
    pub names: PathBuf,
    pub failures: PathBuf,
}

impl OutputPaths {
    /// Derive stream paths by appending suffixes to `stem`. Dots already in
    /// the stem are kept (`run.v2` → `run.v2.json`).
    pub fn from_stem(stem: &Path) -> Self {
        let with_suffix = |suffix: &str| {
            let mut s: OsString = stem.as_os_str().to_owned();
            s.push(suffix);
            PathBuf::from(s)
        };
        Self {
            tables: with_suffix(".json"),
            names: with_suffix(".txt"),
            failures: with_suffix("_failed.txt"),
        }
    }

    /// Create the parent directory of the streams if it is missing.
    pub fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.tables.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create output directory {}", parent.display()))?;
        }
        Ok(())
    }
}

/// A failure record read back from `<stem>_failed.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureLine {
    pub filename: String,
    pub reason: String,
}

fn open_lines(path: &Path) -> Result<impl Iterator<Item = std::io::Result<String>>> {
    let file =
        fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file).lines())
}

/// Visit each node table of a JSON Lines stream with its 1-based line number.
/// Blank lines are skipped.
pub fn for_each_table(
    path: &Path,
    mut visit: impl FnMut(usize, Result<NodeTable>) -> Result<()>,
) -> Result<()> {
    for (idx, line) in open_lines(path)?.enumerate() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed = NodeTable::from_json(&line)
            .with_context(|| format!("{}:{}: invalid node table", path.display(), idx + 1));
        visit(idx + 1, parsed)?;
    }
    Ok(())
}

/// Read every table of a JSON Lines stream.
pub fn read_tables(path: &Path) -> Result<Vec<NodeTable>> {
    let mut tables = Vec::new();
    for_each_table(path, |_, table| {
        tables.push(table?);
        Ok(())
    })?;
    Ok(tables)
}

/// Read the filename stream.
pub fn read_names(path: &Path) -> Result<Vec<String>> {
    open_lines(path)?
        .filter(|l| l.as_ref().map_or(true, |l| !l.is_empty()))
        .map(|l| l.with_context(|| format!("failed to read {}", path.display())))
        .collect()
}

/// Read the failure stream.
pub fn read_failures(path: &Path) -> Result<Vec<FailureLine>> {
    let mut out = Vec::new();
    for line in open_lines(path)? {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        if line.is_empty() {
            continue;
        }
        let (filename, reason) = line.split_once('\t').unwrap_or((line.as_str(), ""));
        out.push(FailureLine {
            filename: filename.to_string(),
            reason: reason.to_string(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_from_stem() {
        let paths = OutputPaths::from_stem(Path::new("data/run.v2"));
        assert_eq!(paths.tables, PathBuf::from("data/run.v2.json"));
        assert_eq!(paths.names, PathBuf::from("data/run.v2.txt"));
        assert_eq!(paths.failures, PathBuf::from("data/run.v2_failed.txt"));
    }

    #[test]
    fn test_read_streams() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::from_stem(&dir.path().join("nested").join("out"));
        paths.ensure_parent().unwrap();

        fs::write(
            &paths.tables,
            "[{\"id\":0,\"type\":\"root\"}]\n\n[{\"id\":0,\"type\":\"root\",\"children\":[1]},{\"id\":1,\"type\":\"pass\"}]\n",
        )
        .unwrap();
        fs::write(&paths.names, "a.py\nb.py\n").unwrap();
        fs::write(&paths.failures, "c.py\tline 1:4: syntax error\n").unwrap();

        let tables = read_tables(&paths.tables).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].len(), 2);
        assert_eq!(read_names(&paths.names).unwrap(), vec!["a.py", "b.py"]);
        assert_eq!(
            read_failures(&paths.failures).unwrap(),
            vec![FailureLine {
                filename: "c.py".into(),
                reason: "line 1:4: syntax error".into()
            }]
        );
    }

    #[test]
    fn test_for_each_table_reports_line_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.json");
        fs::write(&path, "[{\"id\":0,\"type\":\"root\"}]\nnot json\n").unwrap();

        let mut bad = Vec::new();
        for_each_table(&path, |line, table| {
            if table.is_err() {
                bad.push(line);
            }
            Ok(())
        })
        .unwrap();
        assert_eq!(bad, vec![2]);
    }
}
