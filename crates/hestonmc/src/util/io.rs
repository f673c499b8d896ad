//! I/O utility functions

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Write content to a file atomically using write-then-rename pattern.
///
/// The content goes to `<path>.tmp` first and is then renamed over `path`, so
/// readers never observe a half-written results file.
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = temp_path_for(path);
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Remove each of `names` from `dir` if present; returns the paths removed.
pub fn remove_if_present(dir: &Path, names: &[&str]) -> io::Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for name in names {
        let path = dir.join(name);
        match fs::remove_file(&path) {
            Ok(()) => removed.push(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");

        atomic_write(&path, "{}\n").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{}\n");
        assert!(!dir.path().join("results.json.tmp").exists());
    }

    #[test]
    fn test_atomic_write_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");

        atomic_write(&path, "first").unwrap();
        atomic_write(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_remove_if_present() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), "x").unwrap();

        let removed = remove_if_present(dir.path(), &["a.json", "b.json"]).unwrap();
        assert_eq!(removed, vec![dir.path().join("a.json")]);
        assert!(!dir.path().join("a.json").exists());

        let removed = remove_if_present(dir.path(), &["a.json"]).unwrap();
        assert!(removed.is_empty());
    }
}
