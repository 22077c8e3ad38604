// ABOUTME: Snippet registry resolving snippet names to Jsonnet entry files
// ABOUTME: Checks the explicit allow-list first, then snippet directories in order

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use super::error::{Result, SnippetError};

/// File name looked up inside `{directory}/{snippet}/`
pub const SNIPPET_ENTRY_FILE: &str = "main.jsonnet";

/// Read-only lookup table built once at startup.
///
/// Both lists keep their configured order. Allow-list entries are usable
/// file paths in their own right, directory entries hold one subdirectory
/// per snippet.
#[derive(Debug, Clone, Default)]
pub struct SnippetRegistry {
    snippets: Vec<String>,
    directories: Vec<PathBuf>,
    strict: bool,
}

impl SnippetRegistry {
    pub fn new(snippets: Vec<String>, directories: Vec<PathBuf>) -> Self {
        Self {
            snippets,
            directories,
            strict: false,
        }
    }

    /// Reject snippet names that could escape the snippet directories
    pub fn with_strict_names(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Resolve a snippet name to the file that should be evaluated.
    ///
    /// An exact allow-list match returns the name itself. Otherwise the first
    /// directory containing `{name}/main.jsonnet` wins. Strict mode only
    /// guards the directory lookup.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        if self.snippets.iter().any(|snippet| snippet == name) {
            debug!(snippet_name = name, "Found exact match for snippet name");
            return Ok(PathBuf::from(name));
        }

        if self.strict {
            validate_name(name)?;
        }

        for directory in &self.directories {
            let candidate = entry_file(directory, name);
            if candidate.exists() {
                debug!(
                    snippet_name = name,
                    file_name = %candidate.display(),
                    "Found snippet in directory"
                );
                return Ok(candidate);
            }
        }

        Err(SnippetError::NotFound(name.to_string()))
    }
}

/// `{directory}/{name}/main.jsonnet`, with the name appended verbatim so an
/// absolute-looking name does not replace the directory
fn entry_file(directory: &Path, name: &str) -> PathBuf {
    let mut path = OsString::from(directory.as_os_str());
    path.push("/");
    path.push(name);
    path.push("/");
    path.push(SNIPPET_ENTRY_FILE);
    PathBuf::from(path)
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SnippetError::InvalidName(name.to_string()));
    }

    let only_normal = Path::new(name)
        .components()
        .all(|component| matches!(component, Component::Normal(_)));

    if only_normal {
        Ok(())
    } else {
        Err(SnippetError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_snippet(root: &Path, name: &str, content: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join(SNIPPET_ENTRY_FILE);
        fs::write(&file, content).unwrap();
        file
    }

    #[test]
    fn test_allow_list_returns_name_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        write_snippet(temp_dir.path(), "hello", "{}");

        let registry = SnippetRegistry::new(
            vec!["hello".to_string()],
            vec![temp_dir.path().to_path_buf()],
        );

        assert_eq!(registry.resolve("hello").unwrap(), PathBuf::from("hello"));
    }

    #[test]
    fn test_allow_list_does_not_touch_filesystem() {
        let registry = SnippetRegistry::new(vec!["does/not/exist.jsonnet".to_string()], vec![]);
        assert_eq!(
            registry.resolve("does/not/exist.jsonnet").unwrap(),
            PathBuf::from("does/not/exist.jsonnet")
        );
    }

    #[test]
    fn test_directory_lookup() {
        let temp_dir = TempDir::new().unwrap();
        let expected = write_snippet(temp_dir.path(), "greet", "{}");

        let registry = SnippetRegistry::new(vec![], vec![temp_dir.path().to_path_buf()]);

        assert_eq!(registry.resolve("greet").unwrap(), expected);
    }

    #[test]
    fn test_first_directory_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let in_first = write_snippet(first.path(), "shared", "1");
        let in_second = write_snippet(second.path(), "shared", "2");

        let registry = SnippetRegistry::new(
            vec![],
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
        );
        assert_eq!(registry.resolve("shared").unwrap(), in_first);

        let reversed = SnippetRegistry::new(
            vec![],
            vec![second.path().to_path_buf(), first.path().to_path_buf()],
        );
        assert_eq!(reversed.resolve("shared").unwrap(), in_second);
    }

    #[test]
    fn test_skips_directories_without_snippet() {
        let empty = TempDir::new().unwrap();
        let populated = TempDir::new().unwrap();
        let expected = write_snippet(populated.path(), "greet", "{}");

        let registry = SnippetRegistry::new(
            vec![],
            vec![empty.path().to_path_buf(), populated.path().to_path_buf()],
        );

        assert_eq!(registry.resolve("greet").unwrap(), expected);
    }

    #[test]
    fn test_not_found() {
        let registry = SnippetRegistry::default();
        assert_eq!(
            registry.resolve("missing"),
            Err(SnippetError::NotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_nested_snippet_names() {
        let temp_dir = TempDir::new().unwrap();
        let expected = write_snippet(temp_dir.path(), "team/app", "{}");

        let registry = SnippetRegistry::new(vec![], vec![temp_dir.path().to_path_buf()]);

        assert_eq!(registry.resolve("team/app").unwrap(), expected);
    }

    #[test]
    fn test_traversal_allowed_by_default() {
        let root = TempDir::new().unwrap();
        let outside = write_snippet(root.path(), "outside", "{}");
        let snippets = root.path().join("snippets");
        fs::create_dir_all(&snippets).unwrap();

        let registry = SnippetRegistry::new(vec![], vec![snippets.clone()]);
        let resolved = registry.resolve("../outside").unwrap();

        assert_eq!(
            fs::canonicalize(resolved).unwrap(),
            fs::canonicalize(outside).unwrap()
        );
    }

    #[test]
    fn test_strict_mode_rejects_traversal() {
        let root = TempDir::new().unwrap();
        write_snippet(root.path(), "outside", "{}");
        let snippets = root.path().join("snippets");
        fs::create_dir_all(&snippets).unwrap();

        let registry = SnippetRegistry::new(vec![], vec![snippets]).with_strict_names(true);

        assert_eq!(
            registry.resolve("../outside"),
            Err(SnippetError::InvalidName("../outside".to_string()))
        );
        assert!(matches!(
            registry.resolve("/etc/passwd"),
            Err(SnippetError::InvalidName(_))
        ));
        assert!(matches!(
            registry.resolve(""),
            Err(SnippetError::InvalidName(_))
        ));
    }

    #[test]
    fn test_strict_mode_keeps_allow_list_entries() {
        let registry = SnippetRegistry::new(
            vec!["./hello.jsonnet".to_string(), "/srv/x.jsonnet".to_string()],
            vec![],
        )
        .with_strict_names(true);

        assert_eq!(
            registry.resolve("./hello.jsonnet").unwrap(),
            PathBuf::from("./hello.jsonnet")
        );
        assert_eq!(
            registry.resolve("/srv/x.jsonnet").unwrap(),
            PathBuf::from("/srv/x.jsonnet")
        );
        assert!(matches!(
            registry.resolve("../x.jsonnet"),
            Err(SnippetError::InvalidName(_))
        ));
    }

    #[test]
    fn test_strict_mode_accepts_plain_names() {
        let temp_dir = TempDir::new().unwrap();
        let expected = write_snippet(temp_dir.path(), "greet", "{}");

        let registry = SnippetRegistry::new(vec![], vec![temp_dir.path().to_path_buf()])
            .with_strict_names(true);

        assert_eq!(registry.resolve("greet").unwrap(), expected);
    }
}
