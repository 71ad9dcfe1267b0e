//! Common test utilities

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// The signature used across the integration tests
pub const DEMO_SIGNATURE: &str = r#"
name: demo
doc: |
  A very useful function.

  It does many things.
  :param x: the first param
  :param things: variable length!
  :param y: the last param
params:
  - name: x
    type: int
  - name: things
    type: Optional[Sequence[int]]
    default: null
  - name: y
    type: str
    default: test
  - name: z
    type: bool
    default: false
"#;

/// Create a temporary directory with an autoargs.yml file
pub fn create_signature_file(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("autoargs.yml");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

/// Create a signature file in a directory and return a subdirectory below it
pub fn create_signature_file_in_parent(content: &str) -> (TempDir, PathBuf, PathBuf) {
    let (temp_dir, path) = create_signature_file(content);
    let sub_dir = temp_dir.path().join("subdir");
    fs::create_dir(&sub_dir).unwrap();
    (temp_dir, path, sub_dir)
}

/// Prepend a program name to test tokens
pub fn tokens<'a>(program: &'a str, args: &[&'a str]) -> Vec<&'a str> {
    std::iter::once(program).chain(args.iter().copied()).collect()
}
