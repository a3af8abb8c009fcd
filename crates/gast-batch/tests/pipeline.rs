use gast_batch::BatchOrchestrator;
use gast_core::config::{BatchConfig, GenerateConfig, Granularity};
use gast_core::node::NodeValue;
use gast_core::storage::{OutputPaths, read_failures, read_names, read_tables};
use gast_core::validate::validate;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

fn batch_config(workers: usize, channel_capacity: usize) -> BatchConfig {
    BatchConfig {
        workers,
        channel_capacity,
        ..BatchConfig::default()
    }
}

#[test]
fn test_one_syntax_error_among_three_files() {
    let dir = tempfile::tempdir().unwrap();
    let files: Vec<PathBuf> = [
        ("a.py", "x = 1\n"),
        ("b.java", "class B { void m( }\n"),
        ("c.c", "int main(void) { return 0; }\n"),
    ]
    .iter()
    .map(|(name, source)| {
        let path = dir.path().join(name);
        fs::write(&path, source).unwrap();
        path
    })
    .collect();

    let stem = dir.path().join("out").join("run");
    let summary = BatchOrchestrator::new(batch_config(2, 1), GenerateConfig::default())
        .run(&files, &stem)
        .unwrap();
    assert_eq!(summary.success_count, 2);
    assert_eq!(summary.failure_count, 1);
    assert_eq!(summary.write_errors, 0);

    let paths = OutputPaths::from_stem(&stem);
    let tables = read_tables(&paths.tables).unwrap();
    let names = read_names(&paths.names).unwrap();
    let failures = read_failures(&paths.failures).unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(names.len(), 2);
    assert_eq!(failures.len(), 1);

    let failed = files[1].display().to_string();
    assert_eq!(failures[0].filename, failed);
    assert!(!failures[0].reason.is_empty());
    assert!(!names.contains(&failed));

    let succeeded: HashSet<String> = names.iter().cloned().collect();
    let expected: HashSet<String> = [&files[0], &files[2]]
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    assert_eq!(succeeded, expected);

    // Line i of the tables stream belongs to line i of the names stream.
    for (table, name) in tables.iter().zip(&names) {
        validate(table).unwrap();
        if name.ends_with("a.py") {
            assert_eq!(table.get(1).unwrap().kind, "assignment");
        } else {
            assert_eq!(table.get(1).unwrap().kind, "funcdef");
            assert_eq!(table.get(1).unwrap().value, Some(NodeValue::from("main")));
        }
    }
}

#[test]
fn test_many_files_through_a_small_channel() {
    let dir = tempfile::tempdir().unwrap();
    let files: Vec<PathBuf> = (0..40)
        .map(|i| {
            let path = dir.path().join(format!("m{i}.py"));
            let source = if i % 10 == 0 {
                "def broken(:\n".to_string()
            } else {
                format!("def f{i}(a):\n    return a + {i}\n")
            };
            fs::write(&path, source).unwrap();
            path
        })
        .collect();

    let stem = dir.path().join("many");
    let generate = GenerateConfig {
        granularity: Granularity::Coarse,
        ..GenerateConfig::default()
    };
    let summary = BatchOrchestrator::new(batch_config(4, 2), generate)
        .run(&files, &stem)
        .unwrap();
    assert_eq!(summary.success_count, 36);
    assert_eq!(summary.failure_count, 4);

    let paths = OutputPaths::from_stem(&stem);
    assert_eq!(read_tables(&paths.tables).unwrap().len(), 36);
    assert_eq!(read_names(&paths.names).unwrap().len(), 36);
    assert_eq!(read_failures(&paths.failures).unwrap().len(), 4);
}

#[test]
fn test_empty_file_list_writes_empty_streams() {
    let dir = tempfile::tempdir().unwrap();
    let stem = dir.path().join("empty");
    let summary = BatchOrchestrator::new(batch_config(1, 1), GenerateConfig::default())
        .run(&[], &stem)
        .unwrap();
    assert_eq!(summary.success_count, 0);
    assert_eq!(summary.failure_count, 0);

    let paths = OutputPaths::from_stem(&stem);
    assert!(paths.tables.exists());
    assert!(paths.names.exists());
    assert!(paths.failures.exists());
    assert_eq!(fs::read_to_string(&paths.tables).unwrap(), "");
}
