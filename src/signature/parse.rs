//! Signature file parsing and discovery

use crate::error::{AutoArgsError, SignatureError, SignatureResult};
use crate::signature::types::Signature;
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default signature file names to search for
const SIGNATURE_FILE_NAMES: &[&str] = &["autoargs.yml", "autoargs.yaml"];

/// Find the signature file by searching current and parent directories,
/// then the user configuration directory
pub fn find_signature_file() -> SignatureResult<PathBuf> {
    let start_dir = env::current_dir().map_err(|e| {
        SignatureError::Invalid(format!("Failed to get current directory: {}", e))
    })?;

    match find_signature_file_from(start_dir) {
        Ok(path) => Ok(path),
        Err(SignatureError::NotFound(searched)) => {
            let mut searched = vec![searched];
            if let Some(dirs) = ProjectDirs::from("", "", "autoargs") {
                for file_name in SIGNATURE_FILE_NAMES {
                    let candidate = dirs.config_dir().join(file_name);
                    if candidate.is_file() {
                        return Ok(candidate);
                    }
                    searched.push(candidate.display().to_string());
                }
            }
            Err(SignatureError::NotFound(searched.join(", ")))
        }
        Err(e) => Err(e),
    }
}

/// Find the signature file starting from a specific directory
pub fn find_signature_file_from(start_dir: PathBuf) -> SignatureResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in SIGNATURE_FILE_NAMES {
            let path = current_dir.join(file_name);
            searched_paths.push(path.display().to_string());

            if path.is_file() {
                return Ok(path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(SignatureError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Parse a signature file from a path
pub fn parse_signature_file(path: &Path) -> Result<Signature, AutoArgsError> {
    let contents = fs::read_to_string(path).map_err(|e| SignatureError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    parse_signature(&contents)
}

/// Parse a signature from a YAML string
pub fn parse_signature(yaml: &str) -> Result<Signature, AutoArgsError> {
    let signature: Signature = serde_yaml::from_str(yaml)?;
    Ok(signature)
}

/// Parse a signature with automatic file discovery
pub fn parse_signature_auto() -> Result<(Signature, PathBuf), AutoArgsError> {
    let path = find_signature_file()?;
    let signature = parse_signature_file(&path)?;
    Ok((signature, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::TypeTag;
    use std::fs;
    use tempfile::TempDir;

    const SIMPLE: &str = r#"
name: demo
params:
  - name: x
    type: int
"#;

    #[test]
    fn test_parse_simple_signature() {
        let signature = parse_signature(SIMPLE).unwrap();
        assert_eq!(signature.name, "demo");
        assert_eq!(signature.params[0].declared_type, TypeTag::int());
    }

    #[test]
    fn test_find_signature_in_current_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("autoargs.yml");
        fs::write(&path, SIMPLE).unwrap();

        let found = find_signature_file_from(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(found, path);
    }

    #[test]
    fn test_find_signature_in_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("autoargs.yaml");
        let sub_dir = temp_dir.path().join("subdir");

        fs::create_dir(&sub_dir).unwrap();
        fs::write(&path, SIMPLE).unwrap();

        let found = find_signature_file_from(sub_dir).unwrap();
        assert_eq!(found, path);
    }

    #[test]
    fn test_signature_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = find_signature_file_from(temp_dir.path().to_path_buf());
        assert!(matches!(result, Err(SignatureError::NotFound(_))));
    }

    #[test]
    fn test_parse_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = parse_signature_file(&temp_dir.path().join("missing.yml"));
        assert!(matches!(
            result,
            Err(AutoArgsError::Signature(SignatureError::ReadFile { .. }))
        ));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = parse_signature("params: [");
        assert!(matches!(result, Err(AutoArgsError::Yaml(_))));
    }
}
