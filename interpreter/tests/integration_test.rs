use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use knot::Repl;
use walkdir::WalkDir;

const SCRIPT_DIR: &str = "tests/scripts";

// `foo.knot` is paired with `foo.knot.out`, scripts without one are skipped.
fn expected_output_path(script: &Path) -> Option<PathBuf> {
    let mut name = script.file_name()?.to_os_string();
    name.push(".out");

    let path = script.with_file_name(name);
    path.exists().then_some(path)
}

fn scripts() -> Vec<(PathBuf, PathBuf)> {
    let mut scripts: Vec<(PathBuf, PathBuf)> = WalkDir::new(SCRIPT_DIR)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.into_path())
        .filter(|path| matches!(path.extension(), Some(ext) if ext == "knot"))
        .filter_map(|path| expected_output_path(&path).map(|out| (path, out)))
        .collect();
    scripts.sort();
    scripts
}

// Feeds the whole script to a prompt-less session, so the output holds only results.
fn run_script(script: &Path) -> String {
    let src = fs::read(script).unwrap();
    let output = Rc::new(RefCell::new(Vec::new()));

    let mut repl = Repl::with_prompt(output.clone(), "");
    repl.run(&src[..]).unwrap();

    let bytes = output.borrow().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_scripts() {
    let scripts = scripts();
    assert!(!scripts.is_empty(), "no scripts found under {}", SCRIPT_DIR);

    for (script, expected) in &scripts {
        println!("🕑 Running script: {}", script.display());

        assert_eq!(
            fs::read_to_string(expected).unwrap(),
            run_script(script),
            "output mismatch for {}",
            script.display()
        );
    }

    println!("✅ Ran {} scripts", scripts.len())
}
