use inception::commands::Context;
use inception::error::Error;
use inception::loader::get_loader;
use inception::prompt::PresetPrompter;
use inception::renderer::MiniJinjaRenderer;
use inception::runner::Runner;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn basic_template() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join("basic")
}

fn apply(template_path: &Path, output: &Path, answers: Value) -> Result<(), Error> {
    let template = get_loader(template_path)?;
    let prompter = PresetPrompter::new(answers.as_object().cloned().unwrap());
    let renderer = MiniJinjaRenderer::new();
    let mut context = Context::new(&prompter, &renderer);
    Runner::new(&template).run(output, &mut context)
}

#[test_log::test]
fn test_basic_template() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("output");

    apply(&basic_template(), &output, json!({"name": "foo", "surname": "bar"})).unwrap();

    assert!(output.join("example1.txt").is_file());
    assert_eq!(
        fs::read_to_string(output.join("example2.txt")).unwrap(),
        "this is a template file foo"
    );
    assert!(output.join("foo/bar/bazz.txt").is_file());
    assert!(output.join("foo/bar/foo.txt").is_file());
    assert!(!output.join("example2.txt.jinja").exists());
}

#[test]
fn test_basic_template_matches_expected_tree() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("output");
    let expected = temp_dir.path().join("expected");
    let source = basic_template().join("files");
    write(&expected, "example1.txt", &fs::read_to_string(source.join("example1.txt")).unwrap());
    write(&expected, "example2.txt", "this is a template file foo");
    write(
        &expected,
        "foo/bar/bazz.txt",
        &fs::read_to_string(source.join("{{name}}/{{surname}}/bazz.txt")).unwrap(),
    );
    write(
        &expected,
        "foo/bar/foo.txt",
        &fs::read_to_string(source.join("{{name}}/{{surname}}/{{name}}.txt")).unwrap(),
    );

    apply(&basic_template(), &output, json!({"name": "foo", "surname": "bar"})).unwrap();

    assert!(!dir_diff::is_different(&output, &expected).unwrap());
}

#[test_log::test]
fn test_rerun_keeps_existing_files() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("output");

    apply(&basic_template(), &output, json!({"name": "foo", "surname": "bar"})).unwrap();
    fs::write(output.join("example1.txt"), "edited").unwrap();
    let first = fs::read_to_string(output.join("example2.txt")).unwrap();

    apply(&basic_template(), &output, json!({"name": "foo", "surname": "baz"})).unwrap();

    assert_eq!(fs::read_to_string(output.join("example1.txt")).unwrap(), "edited");
    assert_eq!(fs::read_to_string(output.join("example2.txt")).unwrap(), first);
    assert!(output.join("foo/bar/foo.txt").is_file());
    assert!(output.join("foo/baz/foo.txt").is_file());
}

#[test]
fn test_default_program_prompts_before_copy() {
    let template_dir = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(
        template_dir.path(),
        "settings.json",
        r#"{"program": [], "questions": [{"name": "project", "message": "project:"}]}"#,
    );
    write(template_dir.path(), "files/{{ project }}/README.md.jinja", "# {{ project }}");

    apply(template_dir.path(), output.path(), json!({"project": "demo"})).unwrap();

    assert_eq!(fs::read_to_string(output.path().join("demo/README.md")).unwrap(), "# demo");
}

#[cfg(unix)]
#[test_log::test]
fn test_explicit_program_skips_unsupported_steps() {
    let template_dir = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(
        template_dir.path(),
        "settings.yml",
        r#"
questions:
  - name: name
    message: "name:"
program:
  - prompt
  - deploy
  - copy: skel
  - run: "test -f {{ name }}.txt && touch done"
  - {run: 42}
"#,
    );
    write(template_dir.path(), "skel/{{ name }}.txt", "skeleton");

    apply(template_dir.path(), output.path(), json!({"name": "foo"})).unwrap();

    assert!(output.path().join("foo.txt").is_file());
    assert!(output.path().join("done").is_file());
}

#[cfg(unix)]
#[test]
fn test_failing_command_stops_the_program() {
    let template_dir = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(template_dir.path(), "settings.yml", "program:\n  - run: 'exit 1'\n  - copy\n");
    write(template_dir.path(), "files/a.txt", "a");

    let result = apply(template_dir.path(), output.path(), json!({}));

    assert!(matches!(result, Err(Error::CommandFailure { .. })));
    assert!(!output.path().join("a.txt").exists());
}

#[test]
fn test_malformed_settings_abort_before_output() {
    let template_dir = TempDir::new().unwrap();
    let output = template_dir.path().join("output");
    write(template_dir.path(), "settings.yml", "program: [copy");
    write(template_dir.path(), "files/a.txt", "a");

    let result = apply(template_dir.path(), &output, json!({}));

    assert!(matches!(result, Err(Error::SettingsParseError(_))));
    assert!(!output.exists());
}
