use inception::error::Error;
use inception::loader::{get_loader, EntryKind, PathEntry};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn build_zip(path: &Path, members: &[(&str, &str)]) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    for (name, content) in members {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
    }
    zip.finish().unwrap();
}

fn summary(entries: Vec<PathEntry>) -> Vec<(EntryKind, String)> {
    entries.into_iter().map(|e| (e.kind, e.relative_path)).collect()
}

#[test]
fn test_get_loader_selection() {
    let temp_dir = TempDir::new().unwrap();
    let archive = temp_dir.path().join("template.zip");
    build_zip(&archive, &[("files/a.txt", "a")]);
    let text = temp_dir.path().join("notes.txt");
    fs::write(&text, "not an archive").unwrap();

    assert_eq!(get_loader(temp_dir.path()).unwrap().root(), temp_dir.path());
    assert_eq!(get_loader(&archive).unwrap().root(), archive);
    assert!(matches!(get_loader(&text), Err(Error::UnsupportedSourceError { .. })));
    assert!(matches!(
        get_loader(temp_dir.path().join("missing")),
        Err(Error::UnsupportedSourceError { .. })
    ));
}

#[test]
fn test_path_walk() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "files/a.txt", "a");
    write(temp_dir.path(), "files/sub/b.txt", "b");
    write(temp_dir.path(), "other/c.txt", "c");

    let template = get_loader(temp_dir.path()).unwrap();
    let entries: Vec<PathEntry> =
        template.walk("files").unwrap().collect::<Result<_, _>>().unwrap();

    assert_eq!(
        summary(entries.clone()),
        vec![
            (EntryKind::File, "a.txt".to_string()),
            (EntryKind::Directory, "sub".to_string()),
            (EntryKind::File, "sub/b.txt".to_string()),
        ]
    );
    assert_eq!(entries[0].content, b"a".to_vec());
    assert!(entries[1].content.is_empty());
    if cfg!(unix) {
        assert!(entries.iter().all(|e| e.permissions.is_some()));
    }
}

#[test]
fn test_walk_is_restartable() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "files/a.txt", "a");
    write(temp_dir.path(), "files/sub/b.txt", "b");

    let template = get_loader(temp_dir.path()).unwrap();
    let first: Vec<PathEntry> = template.walk("files").unwrap().map(Result::unwrap).collect();
    let second: Vec<PathEntry> = template.walk("files").unwrap().map(Result::unwrap).collect();

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[test]
fn test_walk_missing_sub_path_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let template = get_loader(temp_dir.path()).unwrap();
    assert_eq!(template.walk("files").unwrap().count(), 0);

    let archive = temp_dir.path().join("template.zip");
    build_zip(&archive, &[("settings.yml", "")]);
    let template = get_loader(&archive).unwrap();
    assert_eq!(template.walk("files").unwrap().count(), 0);
}

#[test]
fn test_archive_walk_synthesizes_directories() {
    let temp_dir = TempDir::new().unwrap();
    let archive = temp_dir.path().join("template.zip");
    build_zip(
        &archive,
        &[
            ("settings.yml", ""),
            ("files/a/b/c.txt", "c"),
            ("files/top.txt", "top"),
            ("files/a/d.txt", "d"),
        ],
    );

    let template = get_loader(&archive).unwrap();
    let entries: Vec<PathEntry> =
        template.walk("files").unwrap().collect::<Result<_, _>>().unwrap();

    assert_eq!(
        summary(entries.clone()),
        vec![
            (EntryKind::Directory, "a".to_string()),
            (EntryKind::Directory, "a/b".to_string()),
            (EntryKind::File, "a/b/c.txt".to_string()),
            (EntryKind::File, "top.txt".to_string()),
            (EntryKind::File, "a/d.txt".to_string()),
        ]
    );
    assert_eq!(entries[2].content, b"c".to_vec());
    assert!(entries.iter().all(|e| e.permissions.is_none()));
}

#[test]
fn test_archive_walk_deduplicates_directory_members() {
    let temp_dir = TempDir::new().unwrap();
    let archive = temp_dir.path().join("template.zip");
    build_zip(&archive, &[("files/", ""), ("files/x/", ""), ("files/x/y.txt", "y")]);

    let template = get_loader(&archive).unwrap();
    let entries: Vec<PathEntry> =
        template.walk("files").unwrap().collect::<Result<_, _>>().unwrap();

    assert_eq!(
        summary(entries),
        vec![
            (EntryKind::Directory, "x".to_string()),
            (EntryKind::File, "x/y.txt".to_string()),
        ]
    );
}

#[test]
fn test_settings_are_loaded_once() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "settings.yml", "questions: questions.json\n");

    let template = get_loader(temp_dir.path()).unwrap();
    assert!(template.settings().unwrap().questions.is_some());

    write(temp_dir.path(), "settings.yml", "program: [broken");
    assert!(template.settings().unwrap().questions.is_some());

    let fresh = get_loader(temp_dir.path()).unwrap();
    assert!(matches!(fresh.settings(), Err(Error::SettingsParseError(_))));
}

#[test]
fn test_missing_settings_are_empty() {
    let temp_dir = TempDir::new().unwrap();
    let template = get_loader(temp_dir.path()).unwrap();
    let settings = template.settings().unwrap();

    assert!(settings.program.is_none());
    assert!(settings.questions.is_none());
}

#[test]
fn test_archive_settings_and_metadata() {
    let temp_dir = TempDir::new().unwrap();
    let archive = temp_dir.path().join("template.zip");
    build_zip(
        &archive,
        &[
            ("settings.json", r#"{"program": ["copy"]}"#),
            ("metadata.yml", "name: basic\nversion: 1.0.0\n"),
        ],
    );

    let template = get_loader(&archive).unwrap();
    assert_eq!(template.settings().unwrap().program.as_ref().unwrap().len(), 1);

    let metadata = template.validate().unwrap();
    assert_eq!(metadata.name, "basic");
    assert_eq!(metadata.version, "1.0.0");
}

#[test]
fn test_missing_metadata() {
    let temp_dir = TempDir::new().unwrap();
    let template = get_loader(temp_dir.path()).unwrap();
    assert!(matches!(template.metadata(), Err(Error::ConfigError(_))));
}
