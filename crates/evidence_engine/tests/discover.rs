use std::fs;

use evidence_engine::{discover_files, DiscoverError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn single_file_has_no_relative_path() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("deposition.pdf");
    fs::write(&file, "x").unwrap();

    let found = discover_files(&file).unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].file_name, "deposition.pdf");
    assert_eq!(found[0].path, file);
    assert_eq!(found[0].relative_path, None);
}

#[test]
fn folder_is_walked_in_order_with_relative_paths() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("case-42");
    fs::create_dir_all(root.join("scans")).unwrap();
    fs::create_dir_all(root.join(".cache")).unwrap();
    fs::write(root.join("scans/page2.png"), "2").unwrap();
    fs::write(root.join("scans/page1.png"), "1").unwrap();
    fs::write(root.join("complaint.pdf"), "c").unwrap();
    fs::write(root.join(".DS_Store"), "junk").unwrap();
    fs::write(root.join(".cache/blob"), "junk").unwrap();

    let found = discover_files(&root).unwrap();
    let relative: Vec<_> = found
        .iter()
        .map(|file| file.relative_path.clone().unwrap())
        .collect();

    assert_eq!(
        relative,
        vec![
            "case-42/complaint.pdf",
            "case-42/scans/page1.png",
            "case-42/scans/page2.png",
        ]
    );
    assert_eq!(found[1].file_name, "page1.png");
    assert_eq!(found[1].path, root.join("scans/page1.png"));
}

#[test]
fn empty_folder_yields_nothing() {
    let temp = TempDir::new().unwrap();
    assert!(discover_files(temp.path()).unwrap().is_empty());
}

#[test]
fn missing_path_is_an_error() {
    let temp = TempDir::new().unwrap();
    let err = discover_files(&temp.path().join("nope")).unwrap_err();
    assert!(matches!(err, DiscoverError::Io { .. }));
}
